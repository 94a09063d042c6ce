use crate::api::{ComponentId, ComponentKey};
use serde::{Deserialize, Serialize};

/// The file an overlay is opened for.
///
/// The analysis server addresses a component by key for measures and by id
/// for issues and tests, so both are carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub key: ComponentKey,
    pub id: ComponentId,
    #[serde(default)]
    pub is_unit_test: bool,
}

impl Component {
    pub fn new(key: impl Into<ComponentKey>, id: impl Into<ComponentId>) -> Self {
        Self {
            key: key.into(),
            id: id.into(),
            is_unit_test: false,
        }
    }

    pub fn unit_test(mut self) -> Self {
        self.is_unit_test = true;
        self
    }
}

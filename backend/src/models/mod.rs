pub mod component;
pub mod issue;
pub mod macros;
pub mod metric;
pub mod test_case;

pub use component::*;
pub use issue::*;
pub use metric::*;
pub use test_case::*;

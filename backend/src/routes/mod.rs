pub mod issues;
pub mod measures;
pub mod overlay;
pub mod test_results;

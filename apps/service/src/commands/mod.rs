pub mod analyze;
pub mod lookup;

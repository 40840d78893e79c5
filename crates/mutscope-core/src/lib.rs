pub mod error;
pub mod impact;
pub mod matcher;
pub mod motif;
pub mod mutation;
pub mod report;
pub mod scoring;
pub mod sequence;

pub use error::*;
pub use mutation::*;
pub use scoring::*;
pub use sequence::*;

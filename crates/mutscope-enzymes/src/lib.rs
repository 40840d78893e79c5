//! Enzyme reference data and the lookup seam used to identify the enzyme
//! behind a protein sequence.

pub mod cancel;
pub mod catalog;
pub mod enzyme;
pub mod identify;
pub mod lookup;

pub use cancel::CancelToken;
pub use catalog::EnzymeCatalog;
pub use enzyme::*;
pub use lookup::*;

//! File and HTTP backed implementations of the manifest's external sources.

pub mod atomic_write;
pub mod baseline;
pub mod draft_store;
pub mod error;
pub mod extraction;

pub use baseline::{FileBaselineSource, HttpBaselineSource};
pub use draft_store::FileDraftStore;
pub use error::StorageError;
pub use extraction::ExtractionFileGenerator;

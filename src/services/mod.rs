//! Business logic services.

pub mod files;
pub mod submissions;

pub use files::FileStore;
pub use submissions::{create_or_revise, StagedUpload};

//! Authentication module for the User-ID header gate.

mod extractor;

pub use extractor::UserIdentity;

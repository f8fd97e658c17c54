//! Workspace facade for the restbridge crates.
//!
//! Re-exports the two member crates so integration tests and downstream
//! consumers can depend on a single package.

pub use restbridge_openapi as openapi;
pub use restbridge_requester as requester;

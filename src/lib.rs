//! File manager core for blobs stored in an AT Protocol repository.
//!
//! Pin records in `com.fusionstrings.pins` give blobs a name and type; raw
//! blobs without a pin show up as orphans. [`session::Session`] ties the
//! pieces together for a host UI.

pub mod delete;
pub mod error;
pub mod format;
pub mod inspect;
pub mod model;
pub mod reconcile;
pub mod remote;
pub mod selection;
pub mod session;
pub mod store;
pub mod upload;
pub mod view;

#[cfg(test)]
#[path = "tests/fake_repo.rs"]
pub(crate) mod fake_repo;

pub use self::error::{PinsError, Result};
pub use self::remote::{RepoClient, XrpcClient};
pub use self::session::Session;

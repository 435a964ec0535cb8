//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod email;
mod profile;

pub use access::{Capability, Role};
pub use email::EmailAddress;
pub use profile::{ExternalId, Profile, ProfileContact, ProfileId, SyncTrust};

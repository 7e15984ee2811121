// Internal types - never serialized over the API
pub mod auth;
pub mod context;
pub mod identity;

pub use identity::{Identity, IdentitySlot};

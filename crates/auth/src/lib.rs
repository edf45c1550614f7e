//! Identity-provider boundary for oneiro.
//!
//! A bearer token goes out, a verified user identity comes back.
//! The provider owns sign-up, sessions, and token issuance; this crate
//! only asks "who is this token?".

mod client;
#[cfg(test)]
mod client_tests;
mod error;

pub use client::{AuthClient, AuthUser};
pub use error::AuthError;

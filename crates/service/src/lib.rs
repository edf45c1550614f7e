//! Service layer for oneiro
//!
//! Centralizes business logic between the HTTP handlers and the
//! storage / gateway / identity crates: quota admission, the
//! interpretation orchestration state machine, and journal reads.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]

mod error;
mod fallback;
mod interpret;
mod journal;
mod quota;

#[cfg(test)]
mod quota_tests;
#[cfg(test)]
mod test_support;

pub use error::ServiceError;
pub use interpret::{InterpretOutcome, InterpretRequest, InterpretationService};
pub use journal::JournalService;
pub use quota::QuotaLedger;

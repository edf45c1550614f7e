//! Core types and constants for oneiro
//!
//! This crate contains domain types shared across all other crates.

pub mod constants;
mod dream;
mod env_config;
mod interpretation;
mod json_utils;
mod quota;
mod subscription;

pub use dream::*;
pub use env_config::*;
pub use interpretation::*;
pub use json_utils::*;
pub use quota::*;
pub use subscription::*;

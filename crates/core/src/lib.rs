//! NexusShop Accounts Core - Shared types library.
//!
//! This crate provides the types used across all NexusShop account components:
//! - `client` - Supabase-backed account and profile client
//! - `cli` - Command-line access to every client operation
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere,
//! including by fake backends in tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, and password rules
//! - [`models`] - Remote records (account, session, profile, preferences, address)
//! - [`messages`] - Localized user-facing messages for known error codes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod messages;
pub mod models;
pub mod types;

pub use messages::{ErrorCode, error_message};
pub use models::*;
pub use types::*;

//! Core types for NexusShop accounts.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod password;

pub use email::{Email, EmailError, validate_email};
pub use id::*;
pub use password::{PasswordError, check_password, validate_password};

//! Core types for CardVault.
//!
//! This module provides type-safe wrappers for the payment API wire contract.

pub mod card;
pub mod envelope;
pub mod id;
pub mod payment;

pub use card::{CardSummary, SavedPaymentMethod};
pub use envelope::{ApiError, ApiResponse};
pub use id::*;
pub use payment::*;

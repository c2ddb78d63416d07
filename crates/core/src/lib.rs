//! CardVault Core - Shared wire types.
//!
//! This crate provides the types shared between the CardVault components:
//! - `server` - The payment API binary that proxies to Stripe
//! - `client` - Typed HTTP client for the payment API
//! - `integration-tests` - End-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Everything
//! here describes the wire contract of the payment API: the uniform response
//! envelope, the payloads of the four operations, and the narrow card-display
//! types forwarded from Stripe.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the response envelope, and operation payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! CardVault server library.
//!
//! This crate provides the payment API as a library, allowing the router to
//! be mounted in integration tests without spawning the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
pub mod stripe;

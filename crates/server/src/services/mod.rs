//! Business logic services.

pub mod payments;

pub use payments::PaymentService;

//! Payment processor client
//!
//! The storefront only needs two calls from its processor: register a
//! customer, then open a payment intent for that customer and hand the
//! client secret back to the browser. [`PaymentProcessor`] is that seam;
//! [`StripeClient`] implements it against the Stripe REST API.

mod client;
mod error;
mod types;

pub use client::{PaymentProcessor, StripeClient};
pub use error::{PaymentError, Result};
pub use types::{Address, NewCustomer};

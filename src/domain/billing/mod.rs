//! Checkout billing
//!
//! Pure conversion of raw usage into billable minutes and a base price.

pub mod usage;

pub use usage::{base_value, billable_minutes, used_minutes, UsageCharge, BILLING_BLOCK_MINUTES};

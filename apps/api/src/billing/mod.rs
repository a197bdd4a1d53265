//! Billing boundary: checkout-session creation and the payment webhook.

pub mod checkout;
pub mod handlers;
pub mod webhook;

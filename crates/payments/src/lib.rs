//! Payment intent creation and webhook-driven reconciliation.
//!
//! The external payment processor is consumed through two contracts only:
//! opening a payment intent ([`PaymentProcessor`]) and delivering signed
//! payment-outcome events ([`WebhookReconciler`]). Nothing here reimplements
//! the processor itself.

pub mod bridge;
pub mod error;
pub mod processor;
pub mod signature;
pub mod webhook;

pub use bridge::{IntentHandle, PaymentIntentBridge};
pub use error::PaymentError;
pub use processor::{PaymentIntent, PaymentProcessor, SimulatedProcessor};
pub use signature::{SignatureVerifier, sign};
pub use webhook::{PaymentIntentObject, WebhookEvent, WebhookReconciler};

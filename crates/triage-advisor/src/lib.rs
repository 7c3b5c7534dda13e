//! Genetics referral triage advisor.
//!
//! The [`referral`] module holds the decision engine: a static indicator registry,
//! literal phrase detection over the intake text, and confirmation-gated scoring.
//! Everything else in the crate (configuration, telemetry, the HTTP router and the
//! optional narrative collaborator) is a thin shell around it.

pub mod config;
pub mod error;
pub mod referral;
pub mod telemetry;

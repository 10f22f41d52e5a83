//! Shared domain types for the Pulse lead pipeline.
//!
//! Everything downstream crates agree on lives here: branded ids, the
//! [`Lead`](lead::Lead) entity and its status lifecycle, and the
//! [`Recommendation`](lead::Recommendation) produced by inference.

pub mod ids;
pub mod lead;

//! AWS-oriented adapters and handlers for the random fan-out gateway.
//!
//! This crate owns runtime integration details (the batch request handler,
//! concurrent dispatch, and the Lambda invoker seam) and exposes a single
//! runtime module boundary for the contract, aggregation, and rendering
//! primitives.

pub mod adapters;
pub mod handlers;
pub mod runtime;

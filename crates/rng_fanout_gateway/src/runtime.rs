//! Single module boundary over the core domain crate.

pub use rng_fanout_core::{aggregate, contract, render};

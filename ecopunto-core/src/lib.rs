//! Core types, filter engine, and location plumbing for the ecopunto recycling point browser.

/// Simulated distances and distance ordering.
pub mod distance;
/// Controller that owns filter selections and the point collection.
pub mod engine;
/// Filter selections and the visibility predicate.
pub mod filter;
/// Single-slot location lookup.
pub mod locate;
/// Domain models and identifiers shared by all providers.
pub mod model;
/// Bundle of ports handed to front ends.
pub mod plugin;
/// Traits describing the provider interfaces.
pub mod ports;

pub use distance::*;
pub use engine::*;
pub use filter::*;
pub use locate::*;
pub use model::*;
pub use plugin::*;
pub use ports::*;

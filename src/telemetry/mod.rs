//! Observability surface for the auto-calibration session.
//!
//! Reports are read-only projections of gate + engine state, recomputed
//! every tick with no caching; events are the serialized per-tick stream
//! the CLI prints for monitoring and fixture comparison.

mod events;

pub use events::{GateEvent, TickReport};

//! Hackulus - hackathon registration and judging-panel assignment
//!
//! Teams register under a track. The scheduler gives the largest track panel 4
//! to itself and packs the remaining tracks two per panel onto panels 1-3,
//! wrapping round-robin when they run out. The store keeps registrations,
//! submissions and reviews in SQLite.

pub mod clock;
pub mod domain;
pub mod error;
pub mod reconcile;
pub mod scheduler;
pub mod store;

pub use error::{HackulusError, Result};

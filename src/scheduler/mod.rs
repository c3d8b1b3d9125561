//! Panel assignment scheduler.
//!
//! Distributes teams over exactly four judging panels, grouped by track:
//! - **Census**: one pass over the teams counts each track and records where
//!   its first team appears.
//! - **Dominant track**: the largest track (earliest first occurrence on ties)
//!   gets panel 4 to itself.
//! - **Packing**: the remaining tracks, largest first, fill panels 1-3 two at a
//!   time, then round-robin from panel 1.
//!
//! The scheduler is pure. It reads nothing but its arguments and writes
//! nothing; persisting the result is the caller's job (see `reconcile`).
//!
//! # Example
//!
//! ```
//! use hackulus::domain::{Panel, Team};
//! use hackulus::scheduler::assign;
//!
//! let panels: Vec<Panel> = [10, 20, 30, 40].iter().map(|&id| Panel::new(id, "")).collect();
//! let teams = vec![Team::new(1, 5), Team::new(2, 5), Team::new(3, 6)];
//!
//! let assignments = assign(&panels, &teams)?;
//! assert_eq!(assignments[0].panel_id, 40);
//! assert_eq!(assignments[2].panel_id, 10);
//! # Ok::<(), hackulus::HackulusError>(())
//! ```

mod assign;
mod tracks;
mod validate;

pub use assign::{PANEL_COUNT, SLOTS_PER_PANEL, assign, map_tracks, panel_loads};
pub use tracks::{TrackCensus, TrackTally, rank};
pub use validate::{SchedulerInput, panels_from_value, teams_from_value};

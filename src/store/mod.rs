//! Storage layer for Hackulus.
//!
//! One SQLite database holds the whole hackathon:
//! - **Registration**: panels, tracks, teams, members
//! - **Judging**: submission windows, submissions, judges, reviews
//!
//! # Example
//!
//! ```no_run
//! use hackulus::store::{HackStore, TeamFilter};
//! use std::path::Path;
//!
//! let store = HackStore::open(Path::new("/tmp/hackulus.db"))?;
//! let track = store.add_track("Fintech", None)?;
//! store.add_team("Ledger Lads", track.track_id)?;
//!
//! let teams = store.list_teams(&TeamFilter::default())?;
//! # Ok::<(), hackulus::HackulusError>(())
//! ```

mod hack_store;
mod judging;
mod records;

pub use hack_store::{CycleOutcome, HackStore, TeamDetail, TeamFilter, TeamScope};
pub use judging::{NewReview, NewSubmission, SubmissionDetail, SubmissionEdit, SubmissionFilter};

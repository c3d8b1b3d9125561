//! Domain types for Hackulus
//!
//! This module contains the core domain types:
//! - Panel, Track, Team, Member: who is competing and who judges them
//! - Assignment: the scheduler's (team, panel) output
//! - SubmissionWindow, Submission, Judge, Review: the judging workflow

pub mod assignment;
pub mod judging;
pub mod team;

pub use assignment::Assignment;
pub use judging::{Judge, JudgeRole, Review, Submission, SubmissionKind, SubmissionWindow};
pub use team::{Member, Panel, PanelId, Team, TeamId, TeamStatus, Track, TrackId};

//! Panels, tracks, teams and their members
//!
//! Identifiers are the SQLite rowids of the corresponding tables.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::HackulusError;

pub type PanelId = i64;
pub type TeamId = i64;
pub type TrackId = i64;

/// A fixed judging group. Exactly four exist when panels are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub panel_id: PanelId,
    #[serde(default)]
    pub name: String,
}

impl Panel {
    pub fn new(panel_id: PanelId, name: impl Into<String>) -> Self {
        Self {
            panel_id,
            name: name.into(),
        }
    }
}

/// The theme a team's project belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub track_id: TrackId,
    pub name: String,
    pub problem_statement: Option<String>,
}

/// A registered team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: TeamId,

    #[serde(default)]
    pub team_name: String,

    pub track_id: TrackId,

    /// Judging panel; None until the scheduler or an admin assigns one
    #[serde(default)]
    pub panel_id: Option<PanelId>,

    #[serde(default)]
    pub status: TeamStatus,

    /// The team's own take on its track, set by the leader
    #[serde(default)]
    pub problem_statement: Option<String>,

    /// Unix timestamp in milliseconds
    #[serde(default)]
    pub created_at: i64,
}

impl Team {
    /// A bare team as the scheduler sees it: identity and track only.
    pub fn new(team_id: TeamId, track_id: TrackId) -> Self {
        Self {
            team_id,
            team_name: String::new(),
            track_id,
            panel_id: None,
            status: TeamStatus::Pending,
            problem_statement: None,
            created_at: 0,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.panel_id.is_some()
    }
}

/// Review outcome of a team
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamStatus {
    #[default]
    Pending,
    Shortlisted,
    Accepted,
    Rejected,
}

impl TeamStatus {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamStatus::Pending => "pending",
            TeamStatus::Shortlisted => "shortlisted",
            TeamStatus::Accepted => "accepted",
            TeamStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TeamStatus {
    type Err = HackulusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TeamStatus::Pending),
            "shortlisted" => Ok(TeamStatus::Shortlisted),
            "accepted" => Ok(TeamStatus::Accepted),
            "rejected" => Ok(TeamStatus::Rejected),
            other => Err(HackulusError::invalid("status", format!("unknown team status '{}'", other))),
        }
    }
}

/// A participant belonging to a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: i64,
    pub team_id: TeamId,
    pub name: String,
    pub email: String,
    pub is_leader: bool,
}

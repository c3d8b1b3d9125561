//! Submission windows, submissions, judges and reviews

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::team::{PanelId, TeamId};
use crate::error::{HackulusError, Result};

/// Which review round a submission belongs to. Each kind has its own window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Review1,
    Review2,
    Final,
}

impl SubmissionKind {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Review1 => "review1",
            SubmissionKind::Review2 => "review2",
            SubmissionKind::Final => "final",
        }
    }
}

impl std::fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubmissionKind {
    type Err = HackulusError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "review1" => Ok(SubmissionKind::Review1),
            "review2" => Ok(SubmissionKind::Review2),
            "final" => Ok(SubmissionKind::Final),
            other => Err(HackulusError::invalid("kind", format!("unknown submission kind '{}'", other))),
        }
    }
}

/// Time range in which submissions of one kind are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionWindow {
    pub kind: SubmissionKind,
    /// Manual override: open regardless of the bounds
    pub open: bool,
    /// Unix timestamp in milliseconds
    pub start_at: Option<i64>,
    /// Unix timestamp in milliseconds
    pub end_at: Option<i64>,
}

impl SubmissionWindow {
    /// Whether the window accepts submissions at `now_ms`.
    ///
    /// The manual flag wins. Otherwise both bounds must be set and `now_ms`
    /// must fall within them, inclusive.
    pub fn is_open_at(&self, now_ms: i64) -> bool {
        if self.open {
            return true;
        }
        match (self.start_at, self.end_at) {
            (Some(start), Some(end)) => start <= now_ms && now_ms <= end,
            _ => false,
        }
    }
}

/// Work handed in by a team leader for one review round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub submission_id: i64,
    pub team_id: TeamId,
    pub submitted_by: i64,
    pub kind: SubmissionKind,
    pub title: String,
    pub description: String,
    pub link_url: Option<String>,
    pub created_at: i64,
}

impl Submission {
    pub const TITLE_LEN: std::ops::RangeInclusive<usize> = 3..=100;
    pub const DESCRIPTION_LEN: std::ops::RangeInclusive<usize> = 10..=1000;

    /// Check title and description lengths (in characters).
    pub fn validate_text(title: &str, description: &str) -> Result<()> {
        let title_len = title.chars().count();
        if !Self::TITLE_LEN.contains(&title_len) {
            return Err(HackulusError::invalid(
                "title",
                format!("length {} outside {:?}", title_len, Self::TITLE_LEN),
            ));
        }
        let description_len = description.chars().count();
        if !Self::DESCRIPTION_LEN.contains(&description_len) {
            return Err(HackulusError::invalid(
                "description",
                format!("length {} outside {:?}", description_len, Self::DESCRIPTION_LEN),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeRole {
    /// Reviews only teams on their own panel
    Judge,
    /// Reviews anything and may set team status
    Superadmin,
}

impl JudgeRole {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            JudgeRole::Judge => "judge",
            JudgeRole::Superadmin => "superadmin",
        }
    }
}

impl std::fmt::Display for JudgeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JudgeRole {
    type Err = HackulusError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "judge" => Ok(JudgeRole::Judge),
            "superadmin" => Ok(JudgeRole::Superadmin),
            other => Err(HackulusError::invalid("role", format!("unknown judge role '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judge {
    pub judge_id: i64,
    pub name: String,
    pub email: String,
    pub role: JudgeRole,
    pub panel_id: Option<PanelId>,
}

impl Judge {
    pub fn is_superadmin(&self) -> bool {
        self.role == JudgeRole::Superadmin
    }

    /// Check that this judge may review a team sitting on `team_panel`.
    pub fn check_can_review(&self, team_panel: Option<PanelId>) -> Result<()> {
        if self.is_superadmin() {
            return Ok(());
        }
        let Some(own_panel) = self.panel_id else {
            return Err(HackulusError::Forbidden(format!("judge {} has no panel", self.judge_id)));
        };
        if team_panel != Some(own_panel) {
            return Err(HackulusError::Forbidden(format!(
                "submission not in panel {} of judge {}",
                own_panel, self.judge_id
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: i64,
    pub submission_id: i64,
    pub judge_id: i64,
    pub score: Option<f64>,
    pub comments: Option<String>,
    pub created_at: i64,
}

//! Error types for Hackulus
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::domain::{PanelId, TeamId, TrackId};

/// All error types that can occur in Hackulus
#[derive(Debug, Error)]
pub enum HackulusError {
    /// Malformed scheduler input; `field` is the offending path, e.g. `teams[2].track_id`
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// A team's track never received a panel. Indicates a scheduler bug.
    #[error("No panel mapping for team {team_id} (track {track_id})")]
    Mapping { team_id: TeamId, track_id: TrackId },

    /// Record not found in storage
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Write rejected because it clashes with stored state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Submission attempted while its window is closed
    #[error("{0} submissions are closed")]
    WindowClosed(String),

    /// Caller lacks the rights for the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Panel update touched an unexpected number of rows
    #[error("Update of team {team_id} to panel {panel_id} affected {rows} rows")]
    UpdateMismatch {
        team_id: TeamId,
        panel_id: PanelId,
        rows: usize,
    },

    /// SQLite error
    #[error("Storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HackulusError {
    /// Shorthand for an `InvalidInput` error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a `NotFound` error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// True when the caller supplied bad input or lacks rights; false for internal failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::NotFound { .. }
                | Self::Conflict(_)
                | Self::WindowClosed(_)
                | Self::Forbidden(_)
        )
    }
}

/// Result type alias for Hackulus operations
pub type Result<T> = std::result::Result<T, HackulusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_names_field() {
        let err = HackulusError::invalid("teams[2].track_id", "must be a number");
        assert_eq!(err.to_string(), "Invalid input: teams[2].track_id: must be a number");
    }

    #[test]
    fn test_mapping_error_names_team_and_track() {
        let err = HackulusError::Mapping { team_id: 7, track_id: 3 };
        assert_eq!(err.to_string(), "No panel mapping for team 7 (track 3)");
    }

    #[test]
    fn test_not_found_error() {
        let err = HackulusError::not_found("team", 42);
        assert_eq!(err.to_string(), "team not found: 42");
    }

    #[test]
    fn test_window_closed_error() {
        let err = HackulusError::WindowClosed("review1".to_string());
        assert_eq!(err.to_string(), "review1 submissions are closed");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(HackulusError::invalid("panels", "bad").is_client_error());
        assert!(HackulusError::Forbidden("x".into()).is_client_error());
        assert!(HackulusError::Conflict("x".into()).is_client_error());
        assert!(!HackulusError::Mapping { team_id: 1, track_id: 2 }.is_client_error());
        let io_err = std::io::Error::other("disk");
        assert!(!HackulusError::from(io_err).is_client_error());
    }

    #[test]
    fn test_sqlite_error_conversion() {
        let err: HackulusError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, HackulusError::Sqlite(_)));
        assert!(err.to_string().starts_with("Storage error"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: HackulusError = json_err.into();
        assert!(matches!(err, HackulusError::Json(_)));
    }
}

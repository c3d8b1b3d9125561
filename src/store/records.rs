//! Row mapping between SQLite and the domain types.
//!
//! Enums are stored as their lowercase string form; timestamps as Unix
//! milliseconds in INTEGER columns.

use rusqlite::Row;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::domain::{
    Judge, JudgeRole, Member, Panel, PanelId, Review, Submission, SubmissionKind, SubmissionWindow, Team,
    TeamId, TeamStatus, Track, TrackId,
};

macro_rules! sql_text_enum {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

sql_text_enum!(TeamStatus);
sql_text_enum!(SubmissionKind);
sql_text_enum!(JudgeRole);

pub const PANEL_COLUMNS: &str = "panel_id, name";
pub const TRACK_COLUMNS: &str = "track_id, name, problem_statement";
pub const TEAM_COLUMNS: &str = "team_id, team_name, track_id, panel_id, status, problem_statement, created_at";
pub const MEMBER_COLUMNS: &str = "member_id, team_id, name, email, is_leader";
pub const WINDOW_COLUMNS: &str = "kind, open, start_at, end_at";
pub const SUBMISSION_COLUMNS: &str =
    "submission_id, team_id, submitted_by, kind, title, description, link_url, created_at";
pub const JUDGE_COLUMNS: &str = "judge_id, name, email, role, panel_id";
pub const REVIEW_COLUMNS: &str = "review_id, submission_id, judge_id, score, comments, created_at";

pub fn panel_from_row(row: &Row<'_>) -> rusqlite::Result<Panel> {
    Ok(Panel {
        panel_id: row.get::<_, PanelId>(0)?,
        name: row.get(1)?,
    })
}

pub fn track_from_row(row: &Row<'_>) -> rusqlite::Result<Track> {
    Ok(Track {
        track_id: row.get::<_, TrackId>(0)?,
        name: row.get(1)?,
        problem_statement: row.get(2)?,
    })
}

pub fn team_from_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        team_id: row.get::<_, TeamId>(0)?,
        team_name: row.get(1)?,
        track_id: row.get(2)?,
        panel_id: row.get(3)?,
        status: row.get(4)?,
        problem_statement: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub fn member_from_row(row: &Row<'_>) -> rusqlite::Result<Member> {
    Ok(Member {
        member_id: row.get(0)?,
        team_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        is_leader: row.get(4)?,
    })
}

pub fn window_from_row(row: &Row<'_>) -> rusqlite::Result<SubmissionWindow> {
    Ok(SubmissionWindow {
        kind: row.get(0)?,
        open: row.get(1)?,
        start_at: row.get(2)?,
        end_at: row.get(3)?,
    })
}

pub fn submission_from_row(row: &Row<'_>) -> rusqlite::Result<Submission> {
    Ok(Submission {
        submission_id: row.get(0)?,
        team_id: row.get(1)?,
        submitted_by: row.get(2)?,
        kind: row.get(3)?,
        title: row.get(4)?,
        description: row.get(5)?,
        link_url: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn judge_from_row(row: &Row<'_>) -> rusqlite::Result<Judge> {
    Ok(Judge {
        judge_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: row.get(3)?,
        panel_id: row.get(4)?,
    })
}

pub fn review_from_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        review_id: row.get(0)?,
        submission_id: row.get(1)?,
        judge_id: row.get(2)?,
        score: row.get(3)?,
        comments: row.get(4)?,
        created_at: row.get(5)?,
    })
}

//! Submission windows, submissions, judges and reviews.

use log::info;
use rusqlite::{OptionalExtension, params, params_from_iter, types::Value};

use crate::clock::now_ms;
use crate::domain::{
    Judge, JudgeRole, PanelId, Review, Submission, SubmissionKind, SubmissionWindow, TeamId, TeamStatus,
};
use crate::error::{HackulusError, Result};
use crate::store::hack_store::{HackStore, unique_conflict};
use crate::store::records::{
    JUDGE_COLUMNS, REVIEW_COLUMNS, SUBMISSION_COLUMNS, WINDOW_COLUMNS, judge_from_row, review_from_row,
    submission_from_row, window_from_row,
};

/// Optional filters for [`HackStore::list_submissions`].
#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    pub kind: Option<SubmissionKind>,
    pub team_id: Option<TeamId>,
    pub panel_id: Option<PanelId>,
}

/// Fields of a new submission.
#[derive(Debug, Clone)]
pub struct NewSubmission<'a> {
    pub member_id: i64,
    pub kind: SubmissionKind,
    pub title: &'a str,
    pub description: &'a str,
    pub link_url: Option<&'a str>,
}

/// Changes to an existing submission; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SubmissionEdit<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub link_url: Option<&'a str>,
}

/// A submission with the reviews it has received.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SubmissionDetail {
    pub submission: Submission,
    pub reviews: Vec<Review>,
}

/// Fields of a new review.
#[derive(Debug, Clone, Default)]
pub struct NewReview<'a> {
    pub submission_id: i64,
    pub judge_id: i64,
    pub score: Option<f64>,
    pub comments: Option<&'a str>,
    /// Superadmin only: also move the team to this status
    pub set_team_status: Option<TeamStatus>,
}

impl HackStore {
    // === Windows ===

    /// Create or replace the window for `window.kind`.
    pub fn upsert_window(&self, window: &SubmissionWindow) -> Result<()> {
        if let (Some(start), Some(end)) = (window.start_at, window.end_at)
            && start > end
        {
            return Err(HackulusError::invalid("start_at", "window starts after it ends"));
        }
        self.db.execute(
            r#"
            INSERT INTO submission_windows (kind, open, start_at, end_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(kind) DO UPDATE SET
                open = excluded.open,
                start_at = excluded.start_at,
                end_at = excluded.end_at,
                updated_at = excluded.updated_at
            "#,
            params![window.kind, window.open, window.start_at, window.end_at, now_ms()],
        )?;
        Ok(())
    }

    pub fn window(&self, kind: SubmissionKind) -> Result<Option<SubmissionWindow>> {
        let sql = format!("SELECT {} FROM submission_windows WHERE kind = ?1", WINDOW_COLUMNS);
        Ok(self.db.query_row(&sql, [kind], window_from_row).optional()?)
    }

    pub fn list_windows(&self) -> Result<Vec<SubmissionWindow>> {
        let sql = format!("SELECT {} FROM submission_windows ORDER BY kind", WINDOW_COLUMNS);
        let mut stmt = self.db.prepare(&sql)?;
        let windows = stmt.query_map([], window_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(windows)
    }

    // === Submissions ===

    /// Record a submission at the current time.
    pub fn submit(&self, new: &NewSubmission<'_>) -> Result<Submission> {
        self.submit_at(new, now_ms())
    }

    /// Record a submission as of `now`.
    ///
    /// Only a team leader may submit, and only while the window for the kind
    /// is open. A kind with no window configured is closed.
    pub fn submit_at(&self, new: &NewSubmission<'_>, now: i64) -> Result<Submission> {
        Submission::validate_text(new.title, new.description)?;

        let member = self.require_leader(new.member_id)?;

        let open = self.window(new.kind)?.is_some_and(|w| w.is_open_at(now));
        if !open {
            return Err(HackulusError::WindowClosed(new.kind.to_string()));
        }

        self.db.execute(
            r#"
            INSERT INTO submissions (team_id, submitted_by, kind, title, description, link_url, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![member.team_id, member.member_id, new.kind, new.title, new.description, new.link_url, now],
        )?;
        let submission_id = self.db.last_insert_rowid();
        info!("Team {} submitted {} ({})", member.team_id, new.kind, submission_id);

        self.submission(submission_id)?
            .ok_or_else(|| HackulusError::not_found("submission", submission_id))
    }

    /// Edit a submission of the leader's own team.
    ///
    /// `None` fields keep their stored value. A submission of another team is
    /// reported as not found. Edits are not gated by the submission window.
    pub fn update_submission(
        &self,
        member_id: i64,
        submission_id: i64,
        edit: &SubmissionEdit<'_>,
    ) -> Result<Submission> {
        let leader = self.require_leader(member_id)?;
        let existing = self
            .submission(submission_id)?
            .filter(|s| s.team_id == leader.team_id)
            .ok_or_else(|| HackulusError::not_found("submission", submission_id))?;

        let title = edit.title.unwrap_or(existing.title.as_str());
        let description = edit.description.unwrap_or(existing.description.as_str());
        let link_url = edit.link_url.or(existing.link_url.as_deref());
        Submission::validate_text(title, description)?;

        self.db.execute(
            "UPDATE submissions SET title = ?1, description = ?2, link_url = ?3 WHERE submission_id = ?4",
            params![title, description, link_url, submission_id],
        )?;
        info!("Team {} edited submission {}", leader.team_id, submission_id);

        self.submission(submission_id)?
            .ok_or_else(|| HackulusError::not_found("submission", submission_id))
    }

    /// A submission with its reviews, oldest review first.
    pub fn submission_detail(&self, submission_id: i64) -> Result<SubmissionDetail> {
        let submission = self
            .submission(submission_id)?
            .ok_or_else(|| HackulusError::not_found("submission", submission_id))?;
        let reviews = self.reviews_for(submission_id)?;
        Ok(SubmissionDetail { submission, reviews })
    }

    pub fn submission(&self, submission_id: i64) -> Result<Option<Submission>> {
        let sql = format!("SELECT {} FROM submissions WHERE submission_id = ?1", SUBMISSION_COLUMNS);
        Ok(self.db.query_row(&sql, [submission_id], submission_from_row).optional()?)
    }

    /// Submissions matching `filter`, newest first.
    pub fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>> {
        let mut conditions = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(kind) = filter.kind {
            values.push(Value::Text(kind.as_str().to_string()));
            conditions.push(format!("kind = ?{}", values.len()));
        }
        if let Some(team_id) = filter.team_id {
            values.push(Value::Integer(team_id));
            conditions.push(format!("team_id = ?{}", values.len()));
        }
        if let Some(panel_id) = filter.panel_id {
            values.push(Value::Integer(panel_id));
            conditions.push(format!(
                "team_id IN (SELECT team_id FROM teams WHERE panel_id = ?{})",
                values.len()
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT {} FROM submissions {} ORDER BY created_at DESC, submission_id DESC",
            SUBMISSION_COLUMNS, where_clause
        );

        let mut stmt = self.db.prepare(&sql)?;
        let submissions = stmt
            .query_map(params_from_iter(values.iter()), submission_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(submissions)
    }

    // === Judges ===

    pub fn add_judge(&self, name: &str, email: &str, role: JudgeRole, panel_id: Option<PanelId>) -> Result<Judge> {
        if let Some(panel_id) = panel_id {
            self.require_panel(panel_id)?;
        }
        self.db
            .execute(
                "INSERT INTO judges (name, email, role, panel_id) VALUES (?1, ?2, ?3, ?4)",
                params![name, email, role, panel_id],
            )
            .map_err(|e| unique_conflict(e, format!("email {} already registered", email)))?;
        Ok(Judge {
            judge_id: self.db.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            panel_id,
        })
    }

    pub fn judge(&self, judge_id: i64) -> Result<Option<Judge>> {
        let sql = format!("SELECT {} FROM judges WHERE judge_id = ?1", JUDGE_COLUMNS);
        Ok(self.db.query_row(&sql, [judge_id], judge_from_row).optional()?)
    }

    // === Reviews ===

    /// Record a judge's review of a submission.
    ///
    /// A `judge` may only review submissions of teams on their own panel. Only
    /// a `superadmin` may set the team status; the review and the status
    /// change commit together.
    pub fn add_review(&mut self, new: &NewReview<'_>) -> Result<Review> {
        let submission = self
            .submission(new.submission_id)?
            .ok_or_else(|| HackulusError::not_found("submission", new.submission_id))?;
        let judge = self
            .judge(new.judge_id)?
            .ok_or_else(|| HackulusError::not_found("judge", new.judge_id))?;
        let team = self
            .team(submission.team_id)?
            .ok_or_else(|| HackulusError::not_found("team", submission.team_id))?;

        judge.check_can_review(team.panel_id)?;
        if new.set_team_status.is_some() && !judge.is_superadmin() {
            return Err(HackulusError::Forbidden(format!(
                "judge {} may not change team status",
                judge.judge_id
            )));
        }

        let now = now_ms();
        let tx = self.db.transaction()?;
        tx.execute(
            "INSERT INTO reviews (submission_id, judge_id, score, comments, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![new.submission_id, new.judge_id, new.score, new.comments, now],
        )?;
        let review_id = tx.last_insert_rowid();
        if let Some(status) = new.set_team_status {
            tx.execute(
                "UPDATE teams SET status = ?1, updated_at = ?2 WHERE team_id = ?3",
                params![status, now, team.team_id],
            )?;
        }
        tx.commit()?;

        Ok(Review {
            review_id,
            submission_id: new.submission_id,
            judge_id: new.judge_id,
            score: new.score,
            comments: new.comments.map(str::to_string),
            created_at: now,
        })
    }

    /// Reviews of one submission, oldest first.
    pub fn reviews_for(&self, submission_id: i64) -> Result<Vec<Review>> {
        let sql = format!(
            "SELECT {} FROM reviews WHERE submission_id = ?1 ORDER BY created_at, review_id",
            REVIEW_COLUMNS
        );
        let mut stmt = self.db.prepare(&sql)?;
        let reviews = stmt
            .query_map([submission_id], review_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reviews)
    }
}

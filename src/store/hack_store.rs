//! HackStore: SQLite persistence for panels, tracks, teams and members.
//!
//! All panel writes made on behalf of the scheduler go through
//! [`HackStore::run_assignment_cycle`], which reads and writes inside one
//! IMMEDIATE transaction so a cycle either lands completely or not at all.

use log::{debug, warn};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params, params_from_iter, types::Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::clock::now_ms;
use crate::domain::{Assignment, Member, Panel, PanelId, Submission, Team, TeamId, TeamStatus, Track, TrackId};
use crate::error::{HackulusError, Result};
use crate::store::records::{
    MEMBER_COLUMNS, PANEL_COLUMNS, SUBMISSION_COLUMNS, TEAM_COLUMNS, TRACK_COLUMNS, member_from_row,
    panel_from_row, submission_from_row, team_from_row, track_from_row,
};

/// How long a writer waits for another writer's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Which teams an assignment cycle reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamScope {
    /// Teams with no panel yet
    Unassigned,
    /// Every team, recomputing existing assignments
    All,
}

/// Optional filters for [`HackStore::list_teams`].
#[derive(Debug, Clone, Default)]
pub struct TeamFilter {
    pub track_id: Option<TrackId>,
    pub panel_id: Option<PanelId>,
    pub status: Option<TeamStatus>,
}

/// A team with its members and submissions.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TeamDetail {
    pub team: Team,
    pub members: Vec<Member>,
    pub submissions: Vec<Submission>,
}

/// What a committed assignment cycle read and wrote.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub panels: Vec<Panel>,
    pub teams_considered: usize,
    pub assignments: Vec<Assignment>,
}

/// HackStore owns the SQLite connection for one hackathon database.
pub struct HackStore {
    path: PathBuf,
    pub(crate) db: Connection,
}

impl HackStore {
    /// Open or create the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let db = Connection::open(path)?;
        db.execute_batch("PRAGMA foreign_keys = ON;")?;
        db.busy_timeout(BUSY_TIMEOUT)?;
        Self::init_schema(&db)?;

        debug!("Opened store at {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            db,
        })
    }

    /// Initialize the SQLite schema.
    fn init_schema(db: &Connection) -> Result<()> {
        db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS panels (
                panel_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tracks (
                track_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                problem_statement TEXT
            );

            CREATE TABLE IF NOT EXISTS teams (
                team_id INTEGER PRIMARY KEY,
                team_name TEXT NOT NULL,
                track_id INTEGER NOT NULL REFERENCES tracks(track_id),
                panel_id INTEGER REFERENCES panels(panel_id),
                status TEXT NOT NULL DEFAULT 'pending',
                problem_statement TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_teams_panel ON teams(panel_id);
            CREATE INDEX IF NOT EXISTS idx_teams_track ON teams(track_id);
            CREATE INDEX IF NOT EXISTS idx_teams_created ON teams(created_at);

            CREATE TABLE IF NOT EXISTS members (
                member_id INTEGER PRIMARY KEY,
                team_id INTEGER NOT NULL REFERENCES teams(team_id),
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                is_leader INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS submission_windows (
                kind TEXT PRIMARY KEY,
                open INTEGER NOT NULL DEFAULT 0,
                start_at INTEGER,
                end_at INTEGER,
                updated_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS submissions (
                submission_id INTEGER PRIMARY KEY,
                team_id INTEGER NOT NULL REFERENCES teams(team_id),
                submitted_by INTEGER NOT NULL REFERENCES members(member_id),
                kind TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                link_url TEXT,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_submissions_team ON submissions(team_id);

            CREATE TABLE IF NOT EXISTS judges (
                judge_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                role TEXT NOT NULL,
                panel_id INTEGER REFERENCES panels(panel_id)
            );

            CREATE TABLE IF NOT EXISTS reviews (
                review_id INTEGER PRIMARY KEY,
                submission_id INTEGER NOT NULL REFERENCES submissions(submission_id),
                judge_id INTEGER NOT NULL REFERENCES judges(judge_id),
                score REAL,
                comments TEXT,
                created_at INTEGER NOT NULL
            );
            "#,
        )?;

        let has_team_statement: bool = db.query_row(
            "SELECT EXISTS(SELECT 1 FROM pragma_table_info('teams') WHERE name = 'problem_statement')",
            [],
            |row| row.get(0),
        )?;
        if !has_team_statement {
            debug!("Adding teams.problem_statement column");
            db.execute_batch("ALTER TABLE teams ADD COLUMN problem_statement TEXT;")?;
        }

        Ok(())
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // === Panels ===

    pub fn add_panel(&self, name: &str) -> Result<Panel> {
        self.db.execute("INSERT INTO panels (name) VALUES (?1)", [name])?;
        Ok(Panel::new(self.db.last_insert_rowid(), name))
    }

    /// All panels by ascending id, the order the scheduler treats as positions 1-4.
    pub fn list_panels(&self) -> Result<Vec<Panel>> {
        select_panels(&self.db)
    }

    pub fn panel(&self, panel_id: PanelId) -> Result<Option<Panel>> {
        let sql = format!("SELECT {} FROM panels WHERE panel_id = ?1", PANEL_COLUMNS);
        Ok(self.db.query_row(&sql, [panel_id], panel_from_row).optional()?)
    }

    // === Tracks ===

    pub fn add_track(&self, name: &str, problem_statement: Option<&str>) -> Result<Track> {
        self.db
            .execute(
                "INSERT INTO tracks (name, problem_statement) VALUES (?1, ?2)",
                params![name, problem_statement],
            )
            .map_err(|e| unique_conflict(e, format!("track '{}' already exists", name)))?;
        Ok(Track {
            track_id: self.db.last_insert_rowid(),
            name: name.to_string(),
            problem_statement: problem_statement.map(str::to_string),
        })
    }

    pub fn list_tracks(&self) -> Result<Vec<Track>> {
        let sql = format!("SELECT {} FROM tracks ORDER BY track_id", TRACK_COLUMNS);
        let mut stmt = self.db.prepare(&sql)?;
        let tracks = stmt.query_map([], track_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tracks)
    }

    // === Teams ===

    /// Register a team on `track_id`. New teams start unassigned and pending.
    pub fn add_team(&self, team_name: &str, track_id: TrackId) -> Result<Team> {
        self.require_track(track_id)?;
        let now = now_ms();
        self.db.execute(
            "INSERT INTO teams (team_name, track_id, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
            params![team_name, track_id, TeamStatus::Pending, now],
        )?;
        let team_id = self.db.last_insert_rowid();
        self.team(team_id)?.ok_or_else(|| HackulusError::not_found("team", team_id))
    }

    pub fn team(&self, team_id: TeamId) -> Result<Option<Team>> {
        let sql = format!("SELECT {} FROM teams WHERE team_id = ?1", TEAM_COLUMNS);
        Ok(self.db.query_row(&sql, [team_id], team_from_row).optional()?)
    }

    /// Teams matching `filter`, newest first.
    pub fn list_teams(&self, filter: &TeamFilter) -> Result<Vec<Team>> {
        let mut conditions = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(track_id) = filter.track_id {
            values.push(Value::Integer(track_id));
            conditions.push(format!("track_id = ?{}", values.len()));
        }
        if let Some(panel_id) = filter.panel_id {
            values.push(Value::Integer(panel_id));
            conditions.push(format!("panel_id = ?{}", values.len()));
        }
        if let Some(status) = filter.status {
            values.push(Value::Text(status.as_str().to_string()));
            conditions.push(format!("status = ?{}", values.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT {} FROM teams {} ORDER BY created_at DESC, team_id DESC",
            TEAM_COLUMNS, where_clause
        );

        let mut stmt = self.db.prepare(&sql)?;
        let teams = stmt
            .query_map(params_from_iter(values.iter()), team_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(teams)
    }

    /// Teams judged by `panel_id`, newest first.
    pub fn teams_for_panel(&self, panel_id: PanelId) -> Result<Vec<Team>> {
        self.require_panel(panel_id)?;
        self.list_teams(&TeamFilter {
            panel_id: Some(panel_id),
            ..TeamFilter::default()
        })
    }

    pub fn set_team_status(&self, team_id: TeamId, status: TeamStatus) -> Result<()> {
        let rows = self.db.execute(
            "UPDATE teams SET status = ?1, updated_at = ?2 WHERE team_id = ?3",
            params![status, now_ms(), team_id],
        )?;
        if rows == 0 {
            return Err(HackulusError::not_found("team", team_id));
        }
        Ok(())
    }

    /// Manually put one team on a panel, bypassing the scheduler.
    pub fn assign_team(&self, team_id: TeamId, panel_id: PanelId) -> Result<Team> {
        self.require_panel(panel_id)?;
        let rows = self.db.execute(
            "UPDATE teams SET panel_id = ?1, updated_at = ?2 WHERE team_id = ?3",
            params![panel_id, now_ms(), team_id],
        )?;
        if rows == 0 {
            return Err(HackulusError::not_found("team", team_id));
        }
        self.team(team_id)?.ok_or_else(|| HackulusError::not_found("team", team_id))
    }

    pub fn team_detail(&self, team_id: TeamId) -> Result<TeamDetail> {
        let team = self.team(team_id)?.ok_or_else(|| HackulusError::not_found("team", team_id))?;
        let members = self.members(team_id)?;
        let submissions = self.submissions_for_team(team_id)?;
        Ok(TeamDetail {
            team,
            members,
            submissions,
        })
    }

    // === Members ===

    pub fn add_member(&self, team_id: TeamId, name: &str, email: &str, is_leader: bool) -> Result<Member> {
        if self.team(team_id)?.is_none() {
            return Err(HackulusError::not_found("team", team_id));
        }
        self.db
            .execute(
                "INSERT INTO members (team_id, name, email, is_leader) VALUES (?1, ?2, ?3, ?4)",
                params![team_id, name, email, is_leader],
            )
            .map_err(|e| unique_conflict(e, format!("email {} already registered", email)))?;
        Ok(Member {
            member_id: self.db.last_insert_rowid(),
            team_id,
            name: name.to_string(),
            email: email.to_string(),
            is_leader,
        })
    }

    pub fn member(&self, member_id: i64) -> Result<Option<Member>> {
        let sql = format!("SELECT {} FROM members WHERE member_id = ?1", MEMBER_COLUMNS);
        Ok(self.db.query_row(&sql, [member_id], member_from_row).optional()?)
    }

    /// Set the problem statement of the member's team. Leader only.
    pub fn set_problem_statement(&self, member_id: i64, text: &str) -> Result<Team> {
        let leader = self.require_leader(member_id)?;
        if text.trim().is_empty() {
            return Err(HackulusError::invalid("problem_statement", "cannot be empty"));
        }
        self.db.execute(
            "UPDATE teams SET problem_statement = ?1, updated_at = ?2 WHERE team_id = ?3",
            params![text, now_ms(), leader.team_id],
        )?;
        self.team(leader.team_id)?
            .ok_or_else(|| HackulusError::not_found("team", leader.team_id))
    }

    pub fn members(&self, team_id: TeamId) -> Result<Vec<Member>> {
        let sql = format!("SELECT {} FROM members WHERE team_id = ?1 ORDER BY member_id", MEMBER_COLUMNS);
        let mut stmt = self.db.prepare(&sql)?;
        let members = stmt
            .query_map([team_id], member_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(members)
    }

    // === Submissions (read side used by team_detail) ===

    /// Submissions of one team, newest first.
    pub fn submissions_for_team(&self, team_id: TeamId) -> Result<Vec<Submission>> {
        let sql = format!(
            "SELECT {} FROM submissions WHERE team_id = ?1 ORDER BY created_at DESC, submission_id DESC",
            SUBMISSION_COLUMNS
        );
        let mut stmt = self.db.prepare(&sql)?;
        let submissions = stmt
            .query_map([team_id], submission_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(submissions)
    }

    // === Assignment cycle ===

    /// Read panels and scoped teams, compute assignments, and apply them, all in
    /// one IMMEDIATE transaction.
    ///
    /// Teams are handed to `compute` in creation order (`created_at`, then
    /// `team_id`), which is what makes the scheduler's first-occurrence
    /// tie-break mean "registered first". Every update must touch exactly one
    /// row; any error drops the transaction and leaves the store unchanged.
    pub fn run_assignment_cycle<F>(&mut self, scope: TeamScope, compute: F) -> Result<CycleOutcome>
    where
        F: FnOnce(&[Panel], &[Team]) -> Result<Vec<Assignment>>,
    {
        let tx = self.db.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let panels = select_panels(&tx)?;
        let teams = select_teams_in_creation_order(&tx, scope)?;
        debug!(
            "Assignment cycle ({:?}): {} panels, {} teams",
            scope,
            panels.len(),
            teams.len()
        );

        let assignments = compute(&panels, &teams)?;

        let now = now_ms();
        {
            let mut stmt = tx.prepare("UPDATE teams SET panel_id = ?1, updated_at = ?2 WHERE team_id = ?3")?;
            for a in &assignments {
                let rows = stmt.execute(params![a.panel_id, now, a.team_id])?;
                if rows != 1 {
                    warn!("Rolling back assignment cycle: team {} matched {} rows", a.team_id, rows);
                    return Err(HackulusError::UpdateMismatch {
                        team_id: a.team_id,
                        panel_id: a.panel_id,
                        rows,
                    });
                }
            }
        }

        tx.commit()?;

        Ok(CycleOutcome {
            panels,
            teams_considered: teams.len(),
            assignments,
        })
    }

    // === Helpers ===

    pub(crate) fn require_panel(&self, panel_id: PanelId) -> Result<Panel> {
        self.panel(panel_id)?.ok_or_else(|| HackulusError::not_found("panel", panel_id))
    }

    /// The member, provided they lead their team.
    pub(crate) fn require_leader(&self, member_id: i64) -> Result<Member> {
        let member = self
            .member(member_id)?
            .ok_or_else(|| HackulusError::not_found("member", member_id))?;
        if !member.is_leader {
            return Err(HackulusError::Forbidden(format!(
                "member {} is not the team leader",
                member.member_id
            )));
        }
        Ok(member)
    }

    fn require_track(&self, track_id: TrackId) -> Result<()> {
        let exists: bool = self.db.query_row(
            "SELECT EXISTS(SELECT 1 FROM tracks WHERE track_id = ?1)",
            [track_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(HackulusError::not_found("track", track_id));
        }
        Ok(())
    }
}

fn select_panels(db: &Connection) -> Result<Vec<Panel>> {
    let sql = format!("SELECT {} FROM panels ORDER BY panel_id", PANEL_COLUMNS);
    let mut stmt = db.prepare(&sql)?;
    let panels = stmt.query_map([], panel_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(panels)
}

fn select_teams_in_creation_order(db: &Connection, scope: TeamScope) -> Result<Vec<Team>> {
    let where_clause = match scope {
        TeamScope::Unassigned => "WHERE panel_id IS NULL",
        TeamScope::All => "",
    };
    let sql = format!(
        "SELECT {} FROM teams {} ORDER BY created_at ASC, team_id ASC",
        TEAM_COLUMNS, where_clause
    );
    let mut stmt = db.prepare(&sql)?;
    let teams = stmt.query_map([], team_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(teams)
}

/// Turn a UNIQUE violation into a `Conflict`; pass other errors through.
pub(crate) fn unique_conflict(err: rusqlite::Error, message: String) -> HackulusError {
    match err.sqlite_error_code() {
        Some(rusqlite::ErrorCode::ConstraintViolation) => HackulusError::Conflict(message),
        _ => HackulusError::Sqlite(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler;
    use tempfile::TempDir;

    fn create_temp_store() -> (HackStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = HackStore::open(&temp_dir.path().join("hackulus.db")).unwrap();
        (store, temp_dir)
    }

    /// Four panels and one track; returns the track id.
    fn seed(store: &HackStore) -> TrackId {
        for name in ["Alpha", "Beta", "Gamma", "Delta"] {
            store.add_panel(name).unwrap();
        }
        store.add_track("AI", None).unwrap().track_id
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/hackulus.db");
        let store = HackStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hackulus.db");
        {
            let store = HackStore::open(&path).unwrap();
            seed(&store);
        }
        let store = HackStore::open(&path).unwrap();
        assert_eq!(store.list_panels().unwrap().len(), 4);
    }

    #[test]
    fn test_panels_listed_by_id() {
        let (store, _temp) = create_temp_store();
        seed(&store);
        let names: Vec<String> = store.list_panels().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma", "Delta"]);
    }

    #[test]
    fn test_duplicate_track_is_conflict() {
        let (store, _temp) = create_temp_store();
        store.add_track("Web", Some("Build for the web")).unwrap();
        let err = store.add_track("Web", None).unwrap_err();
        assert!(matches!(err, HackulusError::Conflict(_)));
    }

    #[test]
    fn test_add_team_requires_track() {
        let (store, _temp) = create_temp_store();
        let err = store.add_team("Orphans", 99).unwrap_err();
        assert!(matches!(err, HackulusError::NotFound { entity: "track", .. }));
    }

    #[test]
    fn test_add_and_get_team() {
        let (store, _temp) = create_temp_store();
        let track = seed(&store);
        let team = store.add_team("Rustaceans", track).unwrap();
        let loaded = store.team(team.team_id).unwrap().unwrap();
        assert_eq!(loaded.team_name, "Rustaceans");
        assert_eq!(loaded.status, TeamStatus::Pending);
        assert!(loaded.panel_id.is_none());
    }

    #[test]
    fn test_list_teams_filters() {
        let (store, _temp) = create_temp_store();
        let ai = seed(&store);
        let web = store.add_track("Web", None).unwrap().track_id;
        let a = store.add_team("A", ai).unwrap();
        store.add_team("B", web).unwrap();
        store.set_team_status(a.team_id, TeamStatus::Accepted).unwrap();

        let all = store.list_teams(&TeamFilter::default()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].team_name, "B", "newest first");

        let on_web = store
            .list_teams(&TeamFilter {
                track_id: Some(web),
                ..TeamFilter::default()
            })
            .unwrap();
        assert_eq!(on_web.len(), 1);

        let accepted_ai = store
            .list_teams(&TeamFilter {
                track_id: Some(ai),
                status: Some(TeamStatus::Accepted),
                ..TeamFilter::default()
            })
            .unwrap();
        assert_eq!(accepted_ai.len(), 1);
        assert_eq!(accepted_ai[0].team_id, a.team_id);
    }

    #[test]
    fn test_set_status_unknown_team() {
        let (store, _temp) = create_temp_store();
        let err = store.set_team_status(5, TeamStatus::Rejected).unwrap_err();
        assert!(matches!(err, HackulusError::NotFound { entity: "team", .. }));
    }

    #[test]
    fn test_manual_assignment() {
        let (store, _temp) = create_temp_store();
        let track = seed(&store);
        let team = store.add_team("A", track).unwrap();
        let panel = store.list_panels().unwrap()[1].panel_id;

        let updated = store.assign_team(team.team_id, panel).unwrap();
        assert_eq!(updated.panel_id, Some(panel));
        assert_eq!(store.teams_for_panel(panel).unwrap().len(), 1);

        assert!(matches!(
            store.assign_team(team.team_id, 999),
            Err(HackulusError::NotFound { entity: "panel", .. })
        ));
        assert!(matches!(
            store.assign_team(999, panel),
            Err(HackulusError::NotFound { entity: "team", .. })
        ));
    }

    #[test]
    fn test_duplicate_member_email_is_conflict() {
        let (store, _temp) = create_temp_store();
        let track = seed(&store);
        let team = store.add_team("A", track).unwrap();
        store.add_member(team.team_id, "Ada", "ada@example.com", true).unwrap();
        let err = store.add_member(team.team_id, "Ada 2", "ada@example.com", false).unwrap_err();
        assert!(matches!(err, HackulusError::Conflict(_)));
    }

    #[test]
    fn test_leader_sets_problem_statement() {
        let (store, _temp) = create_temp_store();
        let track = seed(&store);
        let team = store.add_team("A", track).unwrap();
        let leader = store.add_member(team.team_id, "Ada", "ada@example.com", true).unwrap();

        let updated = store.set_problem_statement(leader.member_id, "Queue-free triage").unwrap();
        assert_eq!(updated.problem_statement.as_deref(), Some("Queue-free triage"));
        let reread = store.team(team.team_id).unwrap().unwrap();
        assert_eq!(reread.problem_statement.as_deref(), Some("Queue-free triage"));
    }

    #[test]
    fn test_problem_statement_only_touches_own_team() {
        let (store, _temp) = create_temp_store();
        let track = seed(&store);
        let mine = store.add_team("Mine", track).unwrap();
        let other = store.add_team("Other", track).unwrap();
        let leader = store.add_member(mine.team_id, "Ada", "ada@example.com", true).unwrap();

        store.set_problem_statement(leader.member_id, "Ours").unwrap();
        assert!(store.team(other.team_id).unwrap().unwrap().problem_statement.is_none());
    }

    #[test]
    fn test_non_leader_cannot_set_problem_statement() {
        let (store, _temp) = create_temp_store();
        let track = seed(&store);
        let team = store.add_team("A", track).unwrap();
        let bob = store.add_member(team.team_id, "Bob", "bob@example.com", false).unwrap();

        let err = store.set_problem_statement(bob.member_id, "Hijack").unwrap_err();
        assert!(matches!(err, HackulusError::Forbidden(_)));
        assert!(store.team(team.team_id).unwrap().unwrap().problem_statement.is_none());
    }

    #[test]
    fn test_empty_problem_statement_rejected() {
        let (store, _temp) = create_temp_store();
        let track = seed(&store);
        let team = store.add_team("A", track).unwrap();
        let leader = store.add_member(team.team_id, "Ada", "ada@example.com", true).unwrap();

        let err = store.set_problem_statement(leader.member_id, "  ").unwrap_err();
        assert!(matches!(err, HackulusError::InvalidInput { ref field, .. } if field == "problem_statement"));
        let err = store.set_problem_statement(999, "Anything").unwrap_err();
        assert!(matches!(err, HackulusError::NotFound { entity: "member", .. }));
    }

    #[test]
    fn test_open_adds_problem_statement_to_old_teams_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("old.db");
        {
            let db = Connection::open(&path).unwrap();
            db.execute_batch(
                r#"
                CREATE TABLE tracks (track_id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE, problem_statement TEXT);
                CREATE TABLE teams (
                    team_id INTEGER PRIMARY KEY,
                    team_name TEXT NOT NULL,
                    track_id INTEGER NOT NULL,
                    panel_id INTEGER,
                    status TEXT NOT NULL DEFAULT 'pending',
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                INSERT INTO tracks (name) VALUES ('AI');
                INSERT INTO teams (team_name, track_id, created_at, updated_at) VALUES ('Legacy', 1, 1, 1);
                "#,
            )
            .unwrap();
        }

        let store = HackStore::open(&path).unwrap();
        let team = store.team(1).unwrap().unwrap();
        assert_eq!(team.team_name, "Legacy");
        assert!(team.problem_statement.is_none());
    }

    #[test]
    fn test_team_detail_includes_members() {
        let (store, _temp) = create_temp_store();
        let track = seed(&store);
        let team = store.add_team("A", track).unwrap();
        store.add_member(team.team_id, "Ada", "ada@example.com", true).unwrap();
        store.add_member(team.team_id, "Bob", "bob@example.com", false).unwrap();

        let detail = store.team_detail(team.team_id).unwrap();
        assert_eq!(detail.members.len(), 2);
        assert!(detail.members[0].is_leader);
        assert!(detail.submissions.is_empty());
    }

    #[test]
    fn test_cycle_reads_unassigned_in_creation_order() {
        let (mut store, _temp) = create_temp_store();
        let track = seed(&store);
        let first = store.add_team("first", track).unwrap();
        let second = store.add_team("second", track).unwrap();
        let third = store.add_team("third", track).unwrap();
        store.assign_team(second.team_id, 1).unwrap();

        let mut seen = Vec::new();
        store
            .run_assignment_cycle(TeamScope::Unassigned, |_, teams| {
                seen = teams.iter().map(|t| t.team_id).collect();
                Ok(Vec::new())
            })
            .unwrap();
        assert_eq!(seen, vec![first.team_id, third.team_id]);
    }

    #[test]
    fn test_cycle_applies_scheduler_output() {
        let (mut store, _temp) = create_temp_store();
        let track = seed(&store);
        let a = store.add_team("a", track).unwrap();
        let b = store.add_team("b", track).unwrap();

        let outcome = store.run_assignment_cycle(TeamScope::All, scheduler::assign).unwrap();
        assert_eq!(outcome.teams_considered, 2);
        let last_panel = outcome.panels[3].panel_id;
        assert_eq!(store.team(a.team_id).unwrap().unwrap().panel_id, Some(last_panel));
        assert_eq!(store.team(b.team_id).unwrap().unwrap().panel_id, Some(last_panel));
    }

    #[test]
    fn test_cycle_rolls_back_on_missing_team() {
        let (mut store, _temp) = create_temp_store();
        let track = seed(&store);
        let a = store.add_team("a", track).unwrap();

        let err = store
            .run_assignment_cycle(TeamScope::Unassigned, |panels, teams| {
                Ok(vec![
                    Assignment::new(teams[0].team_id, panels[0].panel_id),
                    Assignment::new(4242, panels[0].panel_id),
                ])
            })
            .unwrap_err();
        assert!(matches!(err, HackulusError::UpdateMismatch { team_id: 4242, rows: 0, .. }));
        assert!(store.team(a.team_id).unwrap().unwrap().panel_id.is_none());
    }

    #[test]
    fn test_cycle_rolls_back_on_unknown_panel() {
        let (mut store, _temp) = create_temp_store();
        let track = seed(&store);
        let a = store.add_team("a", track).unwrap();
        let b = store.add_team("b", track).unwrap();

        let result = store.run_assignment_cycle(TeamScope::Unassigned, |panels, _| {
            Ok(vec![
                Assignment::new(a.team_id, panels[0].panel_id),
                Assignment::new(b.team_id, 777),
            ])
        });
        assert!(matches!(result, Err(HackulusError::Sqlite(_))));
        assert!(store.team(a.team_id).unwrap().unwrap().panel_id.is_none());
    }

    #[test]
    fn test_cycle_propagates_compute_error() {
        let (mut store, _temp) = create_temp_store();
        store.add_panel("only one").unwrap();
        let track = store.add_track("AI", None).unwrap().track_id;
        store.add_team("a", track).unwrap();

        let err = store.run_assignment_cycle(TeamScope::All, scheduler::assign).unwrap_err();
        assert!(matches!(err, HackulusError::InvalidInput { .. }));
    }
}

//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - panel, track, team: registration
//! - assign, reassign, assign-team, preview: panel assignment
//! - window, submit, submission, judge, review: judging

use clap::{Parser, Subcommand};
use hackulus::domain::{JudgeRole, PanelId, SubmissionKind, TeamId, TeamStatus, TrackId};
use std::path::PathBuf;

/// Hackulus - hackathon registration and judging-panel assignment
#[derive(Parser, Debug)]
#[command(name = "hackulus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Judging panels
    Panel {
        #[command(subcommand)]
        command: PanelCommands,
    },

    /// Problem-statement tracks
    Track {
        #[command(subcommand)]
        command: TrackCommands,
    },

    /// Teams and their members
    Team {
        #[command(subcommand)]
        command: TeamCommands,
    },

    /// Assign every team that has no panel yet
    Assign,

    /// Recompute the panel of every team
    Reassign {
        /// Confirm that existing assignments may move
        #[arg(long)]
        yes: bool,
    },

    /// Put one team on a panel by hand
    AssignTeam {
        team_id: TeamId,
        panel_id: PanelId,
    },

    /// Run the scheduler on a JSON file without touching the database
    Preview {
        /// File holding {"panels": [...], "teams": [...]}
        file: PathBuf,
    },

    /// Submission windows
    Window {
        #[command(subcommand)]
        command: WindowCommands,
    },

    /// Hand in work for a review round (team leader only)
    Submit {
        /// Submitting member
        #[arg(short, long)]
        member: i64,

        /// Round: review1, review2, final
        kind: SubmissionKind,

        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        description: String,

        #[arg(short, long)]
        link: Option<String>,
    },

    /// Read and edit submissions
    Submission {
        #[command(subcommand)]
        command: SubmissionCommands,
    },

    /// Judges
    Judge {
        #[command(subcommand)]
        command: JudgeCommands,
    },

    /// Review a submission
    Review {
        submission_id: i64,

        /// Reviewing judge
        #[arg(short, long)]
        judge: i64,

        #[arg(short, long)]
        score: Option<f64>,

        #[arg(long)]
        comments: Option<String>,

        /// Also set the team status (superadmin only)
        #[arg(long)]
        set_status: Option<TeamStatus>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum PanelCommands {
    /// Add a panel
    Add { name: String },

    /// List panels in id order
    List,

    /// Teams assigned to a panel
    Teams { panel_id: PanelId },
}

#[derive(Subcommand, Debug, Clone)]
pub enum TrackCommands {
    /// Add a track
    Add {
        name: String,

        #[arg(short = 's', long)]
        problem_statement: Option<String>,
    },

    /// List tracks
    List,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TeamCommands {
    /// Register a team
    Add {
        name: String,

        #[arg(short, long)]
        track: TrackId,
    },

    /// List teams, newest first
    List {
        #[arg(short, long)]
        track: Option<TrackId>,

        #[arg(short, long)]
        panel: Option<PanelId>,

        /// pending, shortlisted, accepted, rejected
        #[arg(short, long)]
        status: Option<TeamStatus>,
    },

    /// Show a team with members and submissions
    Show { team_id: TeamId },

    /// Set a team's status
    Status { team_id: TeamId, status: TeamStatus },

    /// Set your team's problem statement (team leader only)
    ProblemStatement {
        text: String,

        /// Leader of the team
        #[arg(short, long)]
        member: i64,
    },

    /// Add a member to a team
    Member {
        team_id: TeamId,
        name: String,
        email: String,

        #[arg(short, long)]
        leader: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubmissionCommands {
    /// List submissions, newest first
    List {
        /// review1, review2, final
        #[arg(short, long)]
        kind: Option<SubmissionKind>,

        #[arg(short, long)]
        team: Option<TeamId>,

        #[arg(short, long)]
        panel: Option<PanelId>,
    },

    /// Show a submission with its reviews
    Show { submission_id: i64 },

    /// Edit a submission of your own team (team leader only)
    Edit {
        submission_id: i64,

        /// Editing member
        #[arg(short, long)]
        member: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        link: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum WindowCommands {
    /// Create or replace the window for a round
    Set {
        kind: SubmissionKind,

        /// Open regardless of the time bounds
        #[arg(long)]
        open: bool,

        /// RFC 3339 start, e.g. 2026-03-01T09:00:00Z
        #[arg(long)]
        start: Option<String>,

        /// RFC 3339 end
        #[arg(long)]
        end: Option<String>,
    },

    /// List windows
    List,
}

#[derive(Subcommand, Debug, Clone)]
pub enum JudgeCommands {
    /// Add a judge
    Add {
        name: String,
        email: String,

        /// judge or superadmin
        #[arg(short, long, default_value = "judge")]
        role: JudgeRole,

        #[arg(short, long)]
        panel: Option<PanelId>,
    },
}

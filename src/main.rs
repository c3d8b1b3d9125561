use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use hackulus::HackulusError;
use hackulus::clock::{format_timestamp, now_ms, parse_timestamp};
use hackulus::domain::{SubmissionWindow, Team};
use hackulus::reconcile::{PanelReconciler, ReconcileReport};
use hackulus::scheduler::{SchedulerInput, panel_loads};
use hackulus::store::{HackStore, NewReview, NewSubmission, SubmissionEdit, SubmissionFilter, TeamFilter};

mod cli;
mod config;

use cli::Cli;
use cli::commands::{
    Commands, JudgeCommands, PanelCommands, SubmissionCommands, TeamCommands, TrackCommands, WindowCommands,
};
use config::Config;

fn setup_logging(level: &str) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hackulus")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("hackulus.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn open_store(config: &Config) -> Result<HackStore> {
    let path = &config.storage.db_path;
    HackStore::open(path).context(format!("Failed to open database at {}", path.display()))
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{} {}", "Database:".yellow(), config.storage.db_path.display());
    }

    // Preview never opens the database
    let store = || open_store(config);

    match &cli.command {
        Commands::Panel { command } => handle_panel_command(command, &store()?),
        Commands::Track { command } => handle_track_command(command, &store()?),
        Commands::Team { command } => handle_team_command(command, &store()?),
        Commands::Assign => handle_assign_command(&mut store()?),
        Commands::Reassign { yes } => handle_reassign_command(*yes, &mut store()?),
        Commands::AssignTeam { team_id, panel_id } => {
            let team = store()?.assign_team(*team_id, *panel_id)?;
            println!("{} team {} -> panel {}", "Assigned".green(), team.team_id, panel_id);
            Ok(())
        }
        Commands::Preview { file } => handle_preview_command(file),
        Commands::Window { command } => handle_window_command(command, &store()?),
        Commands::Submission { command } => handle_submission_command(command, &store()?),
        Commands::Submit {
            member,
            kind,
            title,
            description,
            link,
        } => {
            let submission = store()?.submit(&NewSubmission {
                member_id: *member,
                kind: *kind,
                title,
                description,
                link_url: link.as_deref(),
            })?;
            println!(
                "{} {} submission {} for team {}",
                "Recorded".green(),
                submission.kind,
                submission.submission_id,
                submission.team_id
            );
            Ok(())
        }
        Commands::Judge { command } => handle_judge_command(command, &store()?),
        Commands::Review {
            submission_id,
            judge,
            score,
            comments,
            set_status,
        } => {
            let review = store()?.add_review(&NewReview {
                submission_id: *submission_id,
                judge_id: *judge,
                score: *score,
                comments: comments.as_deref(),
                set_team_status: *set_status,
            })?;
            println!("{} review {}", "Recorded".green(), review.review_id);
            if let Some(status) = set_status {
                println!("Team status set to {}", status.to_string().cyan());
            }
            Ok(())
        }
    }
}

fn handle_panel_command(command: &PanelCommands, store: &HackStore) -> Result<()> {
    match command {
        PanelCommands::Add { name } => {
            let panel = store.add_panel(name)?;
            println!("{} panel {} ({})", "Added".green(), panel.panel_id, panel.name);
        }
        PanelCommands::List => {
            let panels = store.list_panels()?;
            if panels.is_empty() {
                println!("{}", "No panels".dimmed());
            }
            for panel in panels {
                let count = store.teams_for_panel(panel.panel_id)?.len();
                println!("{:>4}  {:<24} {} teams", panel.panel_id, panel.name, count);
            }
        }
        PanelCommands::Teams { panel_id } => {
            let panel = store
                .panel(*panel_id)?
                .ok_or_else(|| HackulusError::not_found("panel", panel_id))?;
            println!("{}", format!("Panel {} ({})", panel.panel_id, panel.name).bold());
            print_teams(&store.teams_for_panel(*panel_id)?);
        }
    }
    Ok(())
}

fn handle_track_command(command: &TrackCommands, store: &HackStore) -> Result<()> {
    match command {
        TrackCommands::Add {
            name,
            problem_statement,
        } => {
            let track = store.add_track(name, problem_statement.as_deref())?;
            println!("{} track {} ({})", "Added".green(), track.track_id, track.name);
        }
        TrackCommands::List => {
            for track in store.list_tracks()? {
                println!("{:>4}  {}", track.track_id, track.name);
                if let Some(statement) = &track.problem_statement {
                    println!("      {}", statement.dimmed());
                }
            }
        }
    }
    Ok(())
}

fn handle_team_command(command: &TeamCommands, store: &HackStore) -> Result<()> {
    match command {
        TeamCommands::Add { name, track } => {
            let team = store.add_team(name, *track)?;
            println!("{} team {} ({})", "Registered".green(), team.team_id, team.team_name);
        }
        TeamCommands::List { track, panel, status } => {
            let teams = store.list_teams(&TeamFilter {
                track_id: *track,
                panel_id: *panel,
                status: *status,
            })?;
            print_teams(&teams);
        }
        TeamCommands::Show { team_id } => {
            let detail = store.team_detail(*team_id)?;
            let team = &detail.team;
            println!("{}", format!("Team {} ({})", team.team_id, team.team_name).bold());
            println!("  Track:      {}", team.track_id);
            println!("  Panel:      {}", panel_label(team));
            println!("  Status:     {}", team.status);
            if let Some(statement) = &team.problem_statement {
                println!("  Problem:    {}", statement);
            }
            println!("  Registered: {}", format_timestamp(team.created_at));
            println!("  Members:");
            for member in &detail.members {
                let leader = if member.is_leader { " (leader)".cyan().to_string() } else { String::new() };
                println!("    {:>4}  {} <{}>{}", member.member_id, member.name, member.email, leader);
            }
            println!("  Submissions:");
            for sub in &detail.submissions {
                println!("    {:>4}  [{}] {} {}", sub.submission_id, sub.kind, sub.title, format_timestamp(sub.created_at).dimmed());
            }
        }
        TeamCommands::Status { team_id, status } => {
            store.set_team_status(*team_id, *status)?;
            println!("Team {} is now {}", team_id, status.to_string().cyan());
        }
        TeamCommands::ProblemStatement { text, member } => {
            let team = store.set_problem_statement(*member, text)?;
            println!("{} problem statement of team {}", "Updated".green(), team.team_id);
        }
        TeamCommands::Member {
            team_id,
            name,
            email,
            leader,
        } => {
            let member = store.add_member(*team_id, name, email, *leader)?;
            println!("{} member {} to team {}", "Added".green(), member.member_id, team_id);
        }
    }
    Ok(())
}

fn handle_assign_command(store: &mut HackStore) -> Result<()> {
    let report = PanelReconciler::new(store)
        .assign_unassigned()
        .context("Batch assignment failed")?;
    print_report(&report);
    Ok(())
}

fn handle_reassign_command(yes: bool, store: &mut HackStore) -> Result<()> {
    if !yes {
        println!(
            "{}",
            "Reassigning moves every team, including ones already assigned. Re-run with --yes.".yellow()
        );
        return Ok(());
    }
    let report = PanelReconciler::new(store)
        .reassign_all()
        .context("Full reassignment failed")?;
    print_report(&report);
    Ok(())
}

fn handle_preview_command(file: &Path) -> Result<()> {
    let text = fs::read_to_string(file).context(format!("Failed to read {}", file.display()))?;
    let input = SchedulerInput::from_json(&text)?;
    let assignments = input.assign()?;
    info!("Preview: {} assignments, loads {:?}", assignments.len(), panel_loads(&assignments));
    println!("{}", serde_json::to_string_pretty(&assignments)?);
    Ok(())
}

fn handle_window_command(command: &WindowCommands, store: &HackStore) -> Result<()> {
    match command {
        WindowCommands::Set { kind, open, start, end } => {
            let start_at = start.as_deref().map(|s| parse_timestamp("start", s)).transpose()?;
            let end_at = end.as_deref().map(|s| parse_timestamp("end", s)).transpose()?;
            store.upsert_window(&SubmissionWindow {
                kind: *kind,
                open: *open,
                start_at,
                end_at,
            })?;
            println!("{} {} window", "Updated".green(), kind);
        }
        WindowCommands::List => {
            let now = now_ms();
            for window in store.list_windows()? {
                let state = if window.is_open_at(now) { "open".green() } else { "closed".red() };
                let bound = |b: Option<i64>| b.map(format_timestamp).unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<8} {:<7} {} .. {}",
                    window.kind,
                    state,
                    bound(window.start_at),
                    bound(window.end_at)
                );
            }
        }
    }
    Ok(())
}

fn handle_submission_command(command: &SubmissionCommands, store: &HackStore) -> Result<()> {
    match command {
        SubmissionCommands::List { kind, team, panel } => {
            let submissions = store.list_submissions(&SubmissionFilter {
                kind: *kind,
                team_id: *team,
                panel_id: *panel,
            })?;
            if submissions.is_empty() {
                println!("{}", "No submissions".dimmed());
            }
            for sub in submissions {
                println!(
                    "{:>4}  team {:<4} {:<8} {} {}",
                    sub.submission_id,
                    sub.team_id,
                    sub.kind,
                    sub.title,
                    format_timestamp(sub.created_at).dimmed()
                );
            }
        }
        SubmissionCommands::Show { submission_id } => {
            let detail = store.submission_detail(*submission_id)?;
            let sub = &detail.submission;
            println!("{}", format!("Submission {} ({})", sub.submission_id, sub.kind).bold());
            println!("  Team:      {}", sub.team_id);
            println!("  Title:     {}", sub.title);
            println!("  Link:      {}", sub.link_url.as_deref().unwrap_or("-"));
            println!("  Submitted: {}", format_timestamp(sub.created_at));
            println!("  {}", sub.description);
            println!("  Reviews:");
            if detail.reviews.is_empty() {
                println!("    {}", "none yet".dimmed());
            }
            for review in &detail.reviews {
                let score = review.score.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
                println!(
                    "    judge {:<4} score {:<5} {} {}",
                    review.judge_id,
                    score,
                    review.comments.as_deref().unwrap_or(""),
                    format_timestamp(review.created_at).dimmed()
                );
            }
        }
        SubmissionCommands::Edit {
            submission_id,
            member,
            title,
            description,
            link,
        } => {
            let sub = store.update_submission(
                *member,
                *submission_id,
                &SubmissionEdit {
                    title: title.as_deref(),
                    description: description.as_deref(),
                    link_url: link.as_deref(),
                },
            )?;
            println!("{} submission {}", "Updated".green(), sub.submission_id);
        }
    }
    Ok(())
}

fn handle_judge_command(command: &JudgeCommands, store: &HackStore) -> Result<()> {
    match command {
        JudgeCommands::Add {
            name,
            email,
            role,
            panel,
        } => {
            let judge = store.add_judge(name, email, *role, *panel)?;
            println!("{} {} {} ({})", "Added".green(), judge.role, judge.judge_id, judge.name);
        }
    }
    Ok(())
}

fn panel_label(team: &Team) -> String {
    team.panel_id.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string())
}

fn print_teams(teams: &[Team]) {
    if teams.is_empty() {
        println!("{}", "No teams".dimmed());
        return;
    }
    for team in teams {
        println!(
            "{:>4}  {:<24} track {:<4} panel {:<4} {}",
            team.team_id,
            team.team_name,
            team.track_id,
            panel_label(team),
            team.status
        );
    }
}

fn print_report(report: &ReconcileReport) {
    if report.is_noop() {
        println!("{}", "Nothing to assign".dimmed());
        return;
    }
    println!(
        "{} {} of {} teams ({})",
        "Assigned".green(),
        report.assigned(),
        report.teams_considered,
        report.mode
    );
    for (panel_id, count) in &report.loads {
        println!("  panel {:>4}: {} teams", panel_id, count);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref())
        .context("Failed to load configuration")?
        .with_db_path(cli.db.as_ref());
    config.validate()?;

    setup_logging(&config.log_level).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    if let Err(e) = run_application(&cli, &config) {
        if let Some(err) = e.downcast_ref::<HackulusError>()
            && err.is_client_error()
        {
            eprintln!("{} {}", "error:".red().bold(), err);
            std::process::exit(2);
        }
        return Err(e.wrap_err("Application failed"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(db: &Path) -> Config {
        Config::default().with_db_path(Some(&db.to_path_buf()))
    }

    #[test]
    fn test_preview_does_not_open_database() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("hackulus.db");
        let input = temp.path().join("input.json");
        fs::write(
            &input,
            r#"{"panels": [{"panel_id": 1}, {"panel_id": 2}, {"panel_id": 3}, {"panel_id": 4}],
                "teams": [{"team_id": 1, "track_id": 9}]}"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from(["hackulus", "preview", input.to_str().unwrap()]).unwrap();
        run_application(&cli, &config_for(&db)).unwrap();
        assert!(!db.exists());
    }

    #[test]
    fn test_store_commands_open_database() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("hackulus.db");

        let cli = Cli::try_parse_from(["hackulus", "panel", "add", "North"]).unwrap();
        run_application(&cli, &config_for(&db)).unwrap();
        assert!(db.exists());

        let store = HackStore::open(&db).unwrap();
        assert_eq!(store.list_panels().unwrap().len(), 1);
    }
}

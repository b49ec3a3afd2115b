use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::persist::FileStore;
use crate::io::recovery;
use crate::model::{Day, Priority, TaskPatch, normalize_text};
use crate::ops::clock::SystemClock;
use crate::ops::sort::display_order;
use crate::ops::store::{LoadOutcome, TaskStore};
use crate::ops::summary::{DaySummary, task_noun, week_summary};

/// Errors surfaced to the command line user
#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown day '{0}' (expected monday..sunday or mon..sun)")]
    UnknownDay(String),
    #[error("unknown priority '{0}' (expected high, medium or low)")]
    UnknownPriority(String),
    #[error("task not found on {day}: {id}")]
    TaskNotFound { day: Day, id: String },
    #[error("id '{id}' is ambiguous on {day} ({count} matches); use more characters")]
    AmbiguousId { day: Day, id: String, count: usize },
    #[error("task text must not be empty")]
    EmptyText,
    #[error("nothing to change; pass --text and/or --priority")]
    NothingToChange,
    #[error("clearing {day} removes every task ({count}); rerun with --yes")]
    ConfirmationRequired { day: Day, count: usize },
    #[error("could not save tasks: {0}")]
    SaveFailed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run a subcommand against the resolved data directory
pub fn dispatch(command: Commands, data_dir: &Path, json: bool) -> Result<(), CliError> {
    match command {
        // Read commands
        Commands::List(args) => cmd_list(args, data_dir, json),
        Commands::Week => cmd_week(data_dir, json),
        Commands::Recovery(args) => cmd_recovery(args, data_dir),

        // Write commands
        Commands::Add(args) => cmd_add(args, data_dir),
        Commands::Toggle(args) => cmd_toggle(args, data_dir),
        Commands::Edit(args) => cmd_edit(args, data_dir),
        Commands::Rm(args) => cmd_rm(args, data_dir),
        Commands::Clear(args) => cmd_clear(args, data_dir),
    }
}

/// Data directory from the flag, `$WEEKPLAN_DIR`, or the platform default
pub fn data_dir(cli_flag: Option<&Path>) -> PathBuf {
    config_io::resolve_data_dir(cli_flag)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store(data_dir: &Path) -> Result<TaskStore, CliError> {
    let store = TaskStore::open(FileStore::open(data_dir)?, SystemClock).finish();
    if let LoadOutcome::Recovered { reason } = store.load_outcome() {
        eprintln!(
            "warning: {}; starting from an empty week (see `wk recovery`)",
            reason
        );
    }
    Ok(store)
}

fn parse_day(s: &str) -> Result<Day, CliError> {
    Day::parse(s).ok_or_else(|| CliError::UnknownDay(s.to_string()))
}

fn parse_priority(s: &str) -> Result<Priority, CliError> {
    Priority::parse(s).ok_or_else(|| CliError::UnknownPriority(s.to_string()))
}

/// Resolve a full id or a unique prefix of one (hyphens optional)
fn resolve_id(store: &TaskStore, day: Day, input: &str) -> Result<Uuid, CliError> {
    let needle: String = input
        .trim()
        .chars()
        .filter(|c| *c != '-')
        .collect::<String>()
        .to_ascii_lowercase();
    let not_found = || CliError::TaskNotFound {
        day,
        id: input.to_string(),
    };
    if needle.is_empty() {
        return Err(not_found());
    }

    let matches: Vec<Uuid> = store
        .tasks_for_day(day)
        .iter()
        .filter(|t| t.id.simple().to_string().starts_with(&needle))
        .map(|t| t.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(not_found()),
        _ => Err(CliError::AmbiguousId {
            day,
            id: input.to_string(),
            count: matches.len(),
        }),
    }
}

/// A mutation that reported success but didn't reach disk is still an error here
fn ensure_saved(store: &TaskStore) -> Result<(), CliError> {
    match store.last_save_error() {
        Some(err) => Err(CliError::SaveFailed(err.to_string())),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, data_dir: &Path, json: bool) -> Result<(), CliError> {
    let day = match args.day.as_deref() {
        Some(s) => parse_day(s)?,
        None => Day::today(),
    };
    let store = open_store(data_dir)?;
    let summary = DaySummary::for_day(&store, day);
    let tasks = display_order(store.tasks_for_day(day));

    if json {
        let out = DayListJson {
            day,
            total: summary.total,
            completed: summary.completed,
            progress: summary.progress_display(),
            tasks,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", format_day_heading(&summary));
        for task in tasks {
            println!("  {}", format_task_line(task));
        }
    }
    Ok(())
}

fn cmd_week(data_dir: &Path, json: bool) -> Result<(), CliError> {
    let store = open_store(data_dir)?;
    let week = week_summary(&store);

    if json {
        let out: Vec<DaySummaryJson> = week.iter().map(DaySummaryJson::from).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for summary in &week {
            println!("{}", format_week_row(summary));
        }
        let (done, total) = store.week_totals();
        println!();
        println!("{} of {} {} completed this week", done, total, task_noun(total));
    }
    Ok(())
}

fn cmd_recovery(args: RecoveryCmd, data_dir: &Path) -> Result<(), CliError> {
    if let Some(RecoveryAction::Path) = args.action {
        println!("{}", recovery::recovery_log_path(data_dir).display());
        return Ok(());
    }

    let entries = recovery::read_recovery_entries(data_dir, Some(args.limit.unwrap_or(10)));
    if entries.is_empty() {
        println!("recovery log is empty");
        return Ok(());
    }
    for entry in entries {
        print!("{}", entry.to_markdown());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, data_dir: &Path) -> Result<(), CliError> {
    let day = parse_day(&args.day)?;
    let priority = parse_priority(&args.priority)?;
    let mut store = open_store(data_dir)?;

    let id = store
        .add_task(day, &args.text, priority)
        .ok_or(CliError::EmptyText)?;
    ensure_saved(&store)?;
    println!("{}", &id.simple().to_string()[..8]);
    Ok(())
}

fn cmd_toggle(args: TaskRef, data_dir: &Path) -> Result<(), CliError> {
    let day = parse_day(&args.day)?;
    let mut store = open_store(data_dir)?;
    let id = resolve_id(&store, day, &args.id)?;

    store.toggle_task(day, id);
    ensure_saved(&store)?;
    if let Some(task) = store.find_task(day, id) {
        let verb = if task.completed { "completed" } else { "reopened" };
        println!("{} {}", verb, task.short_id());
    }
    Ok(())
}

fn cmd_edit(args: EditArgs, data_dir: &Path) -> Result<(), CliError> {
    let day = parse_day(&args.task.day)?;
    let priority = args.priority.as_deref().map(parse_priority).transpose()?;
    if let Some(text) = &args.text
        && normalize_text(text).is_none()
    {
        return Err(CliError::EmptyText);
    }
    let patch = TaskPatch {
        text: args.text,
        priority,
        completed: None,
    };
    if patch.is_empty() {
        return Err(CliError::NothingToChange);
    }

    let mut store = open_store(data_dir)?;
    let id = resolve_id(&store, day, &args.task.id)?;
    store.update_task(day, id, patch);
    ensure_saved(&store)?;
    println!("updated {}", &id.simple().to_string()[..8]);
    Ok(())
}

fn cmd_rm(args: TaskRef, data_dir: &Path) -> Result<(), CliError> {
    let day = parse_day(&args.day)?;
    let mut store = open_store(data_dir)?;
    let id = resolve_id(&store, day, &args.id)?;

    store.delete_task(day, id);
    ensure_saved(&store)?;
    println!("deleted {}", &id.simple().to_string()[..8]);
    Ok(())
}

fn cmd_clear(args: ClearArgs, data_dir: &Path) -> Result<(), CliError> {
    let day = parse_day(&args.day)?;
    let mut store = open_store(data_dir)?;

    let removed = if args.completed {
        store.clear_completed(day)
    } else {
        let count = store.total_count(day);
        if count > 0 && !args.yes {
            return Err(CliError::ConfirmationRequired { day, count });
        }
        store.clear_day(day)
    };
    ensure_saved(&store)?;

    let what = if args.completed { " completed" } else { "" };
    println!(
        "cleared {}{} {} from {}",
        removed,
        what,
        task_noun(removed),
        day.label()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::persist::MemoryStore;
    use crate::ops::clock::SystemClock;

    fn store_with(texts: &[&str]) -> (TaskStore, Vec<Uuid>) {
        let mut store = TaskStore::open(MemoryStore::new(), SystemClock).finish();
        let ids = texts
            .iter()
            .map(|t| store.add_task(Day::Monday, t, Priority::Medium).unwrap())
            .collect();
        (store, ids)
    }

    #[test]
    fn resolve_full_and_prefix_ids() {
        let (store, ids) = store_with(&["a", "b"]);
        let full = ids[0].to_string();
        assert_eq!(resolve_id(&store, Day::Monday, &full).unwrap(), ids[0]);
        let short = &ids[1].simple().to_string()[..8];
        assert_eq!(resolve_id(&store, Day::Monday, short).unwrap(), ids[1]);
        let upper = short.to_ascii_uppercase();
        assert_eq!(resolve_id(&store, Day::Monday, &upper).unwrap(), ids[1]);
    }

    #[test]
    fn resolve_is_scoped_to_the_day() {
        let (store, ids) = store_with(&["a"]);
        let err = resolve_id(&store, Day::Tuesday, &ids[0].to_string()).unwrap_err();
        assert!(matches!(err, CliError::TaskNotFound { day: Day::Tuesday, .. }));
    }

    #[test]
    fn empty_prefix_is_not_a_match() {
        let (store, _) = store_with(&["a"]);
        assert!(matches!(
            resolve_id(&store, Day::Monday, " - "),
            Err(CliError::TaskNotFound { .. })
        ));
    }

    #[test]
    fn single_char_prefix_can_be_ambiguous() {
        let (store, ids) = store_with(&["a"; 40]);
        // 40 ids over 16 leading hex digits: some digit repeats
        let first = ids[0].simple().to_string()[..1].to_string();
        let count = ids
            .iter()
            .filter(|id| id.simple().to_string().starts_with(&first))
            .count();
        let result = resolve_id(&store, Day::Monday, &first);
        if count > 1 {
            assert!(matches!(result, Err(CliError::AmbiguousId { count: c, .. }) if c == count));
        } else {
            assert_eq!(result.unwrap(), ids[0]);
        }
    }

    #[test]
    fn parse_helpers() {
        assert_eq!(parse_day("FRI").unwrap(), Day::Friday);
        assert!(matches!(parse_day("someday"), Err(CliError::UnknownDay(_))));
        assert_eq!(parse_priority("h").unwrap(), Priority::High);
        assert!(matches!(parse_priority("urgent"), Err(CliError::UnknownPriority(_))));
    }

    #[test]
    fn error_messages() {
        let err = CliError::ConfirmationRequired {
            day: Day::Monday,
            count: 1,
        };
        assert_eq!(
            err.to_string(),
            "clearing Monday removes every task (1); rerun with --yes"
        );
    }
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wk", about = concat!("wk v", env!("CARGO_PKG_VERSION"), " - plan your week, one day at a time"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Keep tasks in this directory instead of the default data directory
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List a day's tasks in display order
    List(ListArgs),
    /// Show counts and progress for every day
    Week,
    /// Add a task to a day
    Add(AddArgs),
    /// Mark a task done, or not done
    Toggle(TaskRef),
    /// Change a task's text or priority
    Edit(EditArgs),
    /// Delete a task
    Rm(TaskRef),
    /// Remove completed tasks, or all tasks, from a day
    Clear(ClearArgs),
    /// View the recovery log
    Recovery(RecoveryCmd),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Day to list (default: today)
    pub day: Option<String>,
}

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Print the absolute path to the recovery log
    Path,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Day to add the task to (monday..sunday, or mon..sun)
    pub day: String,
    /// Task text
    pub text: String,
    /// high, medium or low
    #[arg(short, long, default_value = "medium")]
    pub priority: String,
}

/// A task addressed by day and id (or a unique id prefix)
#[derive(Args)]
pub struct TaskRef {
    pub day: String,
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    #[command(flatten)]
    pub task: TaskRef,
    /// New text
    #[arg(long)]
    pub text: Option<String>,
    /// New priority
    #[arg(short, long)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct ClearArgs {
    pub day: String,
    /// Only remove completed tasks
    #[arg(long)]
    pub completed: bool,
    /// Skip the confirmation when removing every task
    #[arg(short, long)]
    pub yes: bool,
}

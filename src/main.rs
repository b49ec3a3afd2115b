use clap::Parser;
use weekplan::cli::commands::Cli;
use weekplan::cli::handlers;

fn main() {
    let cli = Cli::parse();
    let data_dir = handlers::data_dir(cli.data_dir.as_deref());

    let result = match cli.command {
        // No subcommand → launch TUI
        None => weekplan::tui::run(&data_dir),
        Some(command) => handlers::dispatch(command, &data_dir, cli.json).map_err(Into::into),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

use clap::Parser;
use hrdesk::cli::commands::{Cli, Commands};
use hrdesk::cli::handlers;

fn main() {
    let cli = Cli::parse();
    let desk_dir = cli.desk_dir.clone();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = hrdesk::tui::run(desk_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Init(args)) => {
            hrdesk::logging::init_cli();
            // Init is handled before desk discovery
            if let Err(e) = handlers::cmd_init(args, desk_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            hrdesk::logging::init_cli();
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

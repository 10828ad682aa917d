use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use posematch::config::Config;
use std::process;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file. Explicit CLI flags override its values.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Compare(cmd::compare::CompareArgs),
    Replay(cmd::replay::ReplayArgs),
    Inspect(cmd::inspect::InspectArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 Initializing PoseMatch...");

    let (cli_config, sub_name) = match &cli.command {
        Commands::Compare(args) => (&args.config, "compare"),
        Commands::Replay(args) => (&args.config, "replay"),
        Commands::Inspect(args) => (&args.config, "inspect"),
    };

    let config = match &cli.config {
        Some(path) => {
            info!("⚖️  Loading Config from: {}", path);
            let mut file_config = Config::load_from_file(path).unwrap_or_else(|e| {
                error!("❌ Failed to load config '{}': {}", path, e);
                process::exit(1);
            });
            if let Some(sub_matches) = matches.subcommand_matches(sub_name) {
                file_config.merge_from_cli(cli_config, sub_matches);
            }
            file_config
        }
        None => {
            warn!("⚠️  No config file given. Using defaults and CLI flags.");
            cli_config.clone()
        }
    };

    if let Err(e) = config.validate() {
        error!("❌ Invalid configuration: {}", e);
        process::exit(1);
    }

    let result = match cli.command {
        Commands::Compare(args) => cmd::compare::run(args, &config),
        Commands::Replay(args) => cmd::replay::run(args, &config),
        Commands::Inspect(args) => cmd::inspect::run(args, &config),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}

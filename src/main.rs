//! sofash - CLI

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sofash::repl::{LineREPL, REPLConfig, REPL};
use sofash::util::config::{self, UserConfig};
use sofash::util::logger::{self, LogLevel};
use sofash::{evaluator_for, NAME, VERSION};

/// An interactive shell for HTTP document stores
#[derive(Parser, Debug)]
#[command(name = "sofash")]
#[command(version = VERSION)]
#[command(about = "An interactive shell for HTTP document stores", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Server base URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Use the plain loop even on a terminal
    #[arg(long)]
    plain: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the interactive shell (the default)
    Repl,

    /// Run a script file
    Run {
        /// Script file to run
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Evaluate code from the command line
    Eval {
        /// Code to evaluate
        #[arg(value_name = "CODE")]
        code: String,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    logger::init_with_level(if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    });

    let config = config::load_user_config().context("Failed to load configuration")?;
    let server = args
        .server
        .clone()
        .unwrap_or_else(|| config.server.url.clone());

    match args.command.unwrap_or(Commands::Repl) {
        Commands::Repl => repl(&config, &server, args.plain)?,
        Commands::Run { file } => {
            sofash::run_file(&file, &server)
                .with_context(|| format!("Failed to run: {}", file.display()))?;
        }
        Commands::Eval { code } => {
            sofash::run(&code, &server).context("Failed to evaluate code")?;
        }
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
        }
    }

    Ok(())
}

/// Start the interactive shell
fn repl(
    config: &UserConfig,
    server: &str,
    plain: bool,
) -> Result<()> {
    let repl_config = REPLConfig {
        prompt: config.repl.prompt.clone(),
        continuation_prompt: config.repl.continuation_prompt.clone(),
        vi_mode: config.repl.vi_mode,
        history_file: config
            .repl
            .history_file
            .clone()
            .or_else(config::default_history_path),
        history_size: config.repl.history_size,
    };
    if let Some(dir) = repl_config
        .history_file
        .as_ref()
        .and_then(|path| path.parent())
    {
        let _ = std::fs::create_dir_all(dir);
    }
    let backend = evaluator_for(server);

    if plain || !std::io::stdin().is_terminal() {
        REPL::stdio(backend, repl_config).run()?;
    } else {
        LineREPL::with_config(backend, repl_config)?.run()?;
    }

    Ok(())
}

mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tdd",
    about = "Checklist-driven TDD onboarding: generate checklists, scaffold task stubs, bootstrap tests",
    version,
    propagate_version = true
)]
struct Cli {
    /// Repository root (default: current directory)
    #[arg(long, global = true, env = "MCP_REPO_PATH")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe the engine and list the checklists it found
    Introduce,

    /// Create a checklist from the README unless one already exists
    Ensure {
        /// Print the checklist that would be written without writing it
        #[arg(long)]
        dry_run: bool,

        /// Language hint recorded in the checklist metadata
        #[arg(long)]
        language: Option<String>,
    },

    /// Show the selected checklist and its progress document preview
    Show,

    /// Regenerate the checklist and rewrite the progress document
    Refresh {
        #[arg(long)]
        language: Option<String>,
    },

    /// Write the progress document, task stubs, and aggregator module
    Scaffold,

    /// Check or uncheck a task in the progress document
    Mark {
        /// Task id, as shown in parentheses in CHECKLIST.md
        id: String,

        /// Clear the checkbox instead of setting it
        #[arg(long)]
        uncheck: bool,
    },

    /// Report which tasks have a stub and are wired into the aggregator
    Status,

    /// Install dependencies and run the test suite
    Bootstrap {
        /// Ecosystem to use (python, node, go, rust, java, cpp); auto-detect if omitted
        #[arg(long)]
        language: Option<String>,

        /// Run one focused test file after the suite
        #[arg(long)]
        test_path: Option<String>,

        /// Run tests matching this name after the suite
        #[arg(long)]
        test_filter: Option<String>,
    },

    /// Run the generated aggregator module
    Orchestrate,

    /// Serve the operations over HTTP
    Serve {
        #[arg(long, env = "TDD_PORT", default_value = "8000")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Introduce => cmd::checklist::introduce(&root, cli.json),
        Commands::Ensure { dry_run, language } => {
            cmd::checklist::ensure(&root, dry_run, language.as_deref(), cli.json)
        }
        Commands::Show => cmd::checklist::show(&root, cli.json),
        Commands::Refresh { language } => {
            cmd::checklist::refresh(&root, language.as_deref(), cli.json)
        }
        Commands::Scaffold => cmd::scaffold::run(&root, cli.json),
        Commands::Mark { id, uncheck } => cmd::mark::run(&root, &id, !uncheck, cli.json),
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Bootstrap {
            language,
            test_path,
            test_filter,
        } => cmd::bootstrap::run(&root, language.as_deref(), test_path, test_filter, cli.json),
        Commands::Orchestrate => cmd::orchestrate::run(&root, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

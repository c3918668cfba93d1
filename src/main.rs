use clap::{Parser, Subcommand};

use lectern::config::ConsoleOptions;
use lectern::console;

#[derive(Parser, Debug)]
#[command(name = "lectern", about = "Query console for a document answer service", version)]
struct Cli {
    /// Answer service endpoint; overrides LECTERN_ENDPOINT.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Source document label used in citations and saved notes.
    #[arg(long, global = true)]
    source: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the interactive query console (the default).
    Console {
        /// Typewriter interval in milliseconds; 0 disables the animation.
        #[arg(long, default_value_t = 10)]
        type_ms: u64,
        /// Hide the recent-queries panel.
        #[arg(long)]
        no_history: bool,
    },
    /// Ask a single question and print the answer.
    Ask {
        question: String,
        /// Emit JSON instead of human-readable output.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    // Bridge log crate -> tracing (so log::info! etc. work)
    // tracing_log::LogTracer::init()?;

    let cli = Cli::parse();
    let mut options = ConsoleOptions::from_config();
    if let Some(endpoint) = cli.endpoint {
        options.endpoint = endpoint;
    }
    if let Some(source) = cli.source {
        options.source_label = source;
    }

    match cli.command.unwrap_or(Command::Console {
        type_ms: 10,
        no_history: false,
    }) {
        Command::Console {
            type_ms,
            no_history,
        } => {
            options.type_interval_ms = type_ms;
            options.show_history = !no_history;
            console::run(options).await
        }
        Command::Ask { question, json } => {
            options.type_interval_ms = 0;
            console::ask_once(&options, &question, json).await
        }
    }
}

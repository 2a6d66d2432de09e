use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use translator_core::logging::{init_logging, LogConfig, LogFormat};
use translator_core::protocol::{self, Request, Response};
use translator_core::{MappingStore, StoreConfig};

/// Drives a mapping store over stdin/stdout, one request per line.
#[derive(Parser)]
#[command(name = "translator_pipe", version)]
struct Args {
    #[arg(
        long,
        value_name = "PATH",
        env = "ASCII_TRANSLATOR_MAPPINGS",
        default_value = "textas.txt"
    )]
    mappings: PathBuf,

    /// Translation history file.
    #[arg(
        long,
        value_name = "PATH",
        env = "ASCII_TRANSLATOR_HISTORY",
        default_value = "translations.txt"
    )]
    history: PathBuf,

    /// Do not append translations to the history file.
    #[arg(long)]
    no_history: bool,

    /// Append logs here instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(
        &LogConfig::default()
            .with_format(LogFormat::Compact)
            .with_log_file(args.log_file.clone()),
    )?;
    tracing::info!("translator pipe starting");

    let config = StoreConfig::new(&args.mappings);
    let config = if args.no_history {
        config
    } else {
        config.with_history_path(&args.history)
    };
    let store = MappingStore::open(&config)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let input = line?;
        tracing::debug!(request = ?input, "request");

        let responses = match Request::parse(&input) {
            Ok(request) => match protocol::handle(&store, request) {
                Some(responses) => responses,
                None => {
                    tracing::info!("received EXIT");
                    break;
                }
            },
            Err(message) => vec![Response::Error(message)],
        };

        for response in &responses {
            writeln!(stdout, "{response}")?;
        }
        stdout.flush()?;
    }

    tracing::info!("translator pipe shutting down");
    Ok(())
}

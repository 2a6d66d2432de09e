use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, stdin, stdout, IsTerminal, Read, Write};
use std::path::PathBuf;
use translator_core::logging::{init_logging, LogConfig, LogFormat};
use translator_core::{Direction, MappingStore, StoreConfig, StoreError, Translation};

#[derive(Parser)]
#[command(
    name = "translator",
    version,
    about = "Translate text to ASCII-art tokens and back using a user-maintained mapping"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Mapping file, one '<token> <character>' per line.
    #[arg(
        long,
        value_name = "PATH",
        env = "ASCII_TRANSLATOR_MAPPINGS",
        default_value = "textas.txt",
        global = true
    )]
    mappings: PathBuf,

    /// Translation history file.
    #[arg(
        long,
        value_name = "PATH",
        env = "ASCII_TRANSLATOR_HISTORY",
        default_value = "translations.txt",
        global = true
    )]
    history: PathBuf,

    /// Do not append translations to the history file.
    #[arg(long, global = true)]
    no_history: bool,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,

    /// Log output format.
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Add or replace a mapping: everything before the last space is the token.
    Add {
        #[arg(
            required = true,
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "TOKEN CHARACTER"
        )]
        raw: Vec<String>,
    },
    /// Delete the most recently added mapping.
    DeleteLast,
    /// Translate TEXT (or stdin) in the given direction.
    Translate {
        /// char-to-token (letters-to-ascii) or token-to-char (ascii-to-letters).
        #[arg(short, long, default_value = "char-to-token")]
        direction: Direction,
        /// Text to translate; read from stdin when omitted.
        #[arg(allow_hyphen_values = true)]
        text: Option<String>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print every mapping in insertion order.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Interactive session.
    Interactive,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn main() {
    let cli = Cli::parse();
    let log_config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !cli.verbosity.is_present(),
        with_ansi: cli.log_file.is_none() && io::stderr().is_terminal(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
        log_file: cli.log_file.clone(),
    };
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            match error.downcast_ref::<StoreError>() {
                Some(e) if e.is_user_facing() => 2,
                _ => 1,
            }
        }
    };
    std::process::exit(exit_code);
}

fn store_config(cli: &Cli) -> StoreConfig {
    let config = StoreConfig::new(&cli.mappings);
    if cli.no_history {
        config
    } else {
        config.with_history_path(&cli.history)
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = store_config(cli);
    let store = MappingStore::open(&config)
        .with_context(|| format!("could not open mappings at {}", config.mappings_path.display()))?;

    match &cli.command {
        Command::Add { raw } => {
            let (token, character) = store.add_mapping(&raw.join(" "))?;
            println!("Mapping added: '{token}' -> '{character}'");
        }
        Command::DeleteLast => {
            let (token, character) = store.delete_last_mapping()?;
            println!("Last mapping deleted: '{token}' -> '{character}'");
        }
        Command::Translate { direction, text, json } => {
            let text = match text {
                Some(text) => text.clone(),
                None => {
                    let mut buf = String::new();
                    stdin().read_to_string(&mut buf).context("could not read stdin")?;
                    buf.trim().to_string()
                }
            };
            let translation = store.translate(*direction, &text);
            if *json {
                println!("{}", serde_json::to_string_pretty(&translation)?);
            } else {
                println!("{}", translation.output);
                warn_unknowns(&translation);
            }
        }
        Command::List { json } => {
            let snapshot = store.snapshot();
            if *json {
                let entries: Vec<_> = snapshot
                    .iter()
                    .map(|(token, character)| serde_json::json!({ "token": token, "character": character }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for (token, character) in snapshot.iter() {
                    println!("{token} {character}");
                }
            }
        }
        Command::Interactive => interactive(&store)?,
    }
    Ok(())
}

fn warn_unknowns(translation: &Translation) {
    if translation.has_unknowns() {
        eprintln!("warning: {} unit(s) could not be translated", translation.unknown_count);
    }
}

fn interactive(store: &MappingStore) -> anyhow::Result<()> {
    let mut direction = Direction::CharToToken;
    let mut status = String::from("Type text and press [Enter] to translate.");
    let mut last: Option<Translation> = None;

    loop {
        print_ui(store, direction, &status, last.as_ref())?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();

        match line {
            "exit" | ":q" => break,
            ":swap" => {
                direction = match direction {
                    Direction::CharToToken => Direction::TokenToChar,
                    Direction::TokenToChar => Direction::CharToToken,
                };
                status = format!("Direction is now {direction}.");
            }
            ":del" => {
                status = match store.delete_last_mapping() {
                    Ok((token, character)) => format!("Last mapping deleted: '{token}' -> '{character}'"),
                    Err(e) => report(e)?,
                };
            }
            s if s.starts_with(":add") => {
                status = match store.add_mapping(&s[":add".len()..]) {
                    Ok((token, character)) => format!("Mapping added: '{token}' -> '{character}'"),
                    Err(e) => report(e)?,
                };
            }
            "" => {}
            s => {
                let translation = store.translate(direction, s);
                status = if translation.has_unknowns() {
                    format!("{} unit(s) could not be translated.", translation.unknown_count)
                } else {
                    String::from("Translated.")
                };
                last = Some(translation);
            }
        }
    }
    Ok(())
}

/// User-facing errors become the status line; anything else ends the session.
fn report(error: StoreError) -> anyhow::Result<String> {
    if error.is_user_facing() {
        Ok(error.to_string())
    } else {
        Err(error.into())
    }
}

fn print_ui(
    store: &MappingStore,
    direction: Direction,
    status: &str,
    last: Option<&Translation>,
) -> io::Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    writeln!(out, "{}", "ASCII Translator".bold())?;
    writeln!(out, "---------------------------------------------------------------")?;
    writeln!(out, "':add <token> <character>' adds a mapping, ':del' deletes the last one.")?;
    writeln!(out, "':swap' changes direction. 'exit' to quit.\n")?;
    writeln!(out, "Mappings: {}  Direction: {}", store.len(), direction.to_string().cyan())?;

    if let Some(translation) = last {
        writeln!(out, "\nOutput:")?;
        if translation.has_unknowns() {
            writeln!(out, "{}", translation.output.as_str().yellow())?;
        } else {
            writeln!(out, "{}", translation.output.as_str().green())?;
        }
    }
    writeln!(out, "\n{status}")?;
    write!(out, "\n> ")?;
    out.flush()
}

//! Family Chat CLI
//!
//! Command-line front end for a local family chat:
//! - Interactive chat session (default)
//! - One-shot send
//! - Display name setup
//! - History export

use anyhow::Context;
use clap::{Parser, Subcommand};
use family_chat::chat::{
    format_timestamp, ChatApp, ChatEvent, ChatStore, ChatView, EventOutcome, IdentityError,
    IdentityManager, ViewRenderer,
};
use family_chat::config::{generate_default_config, Config, ConfigError, LoggingConfig};
use family_chat::storage::FileSlotStore;
use family_chat::terminal::{write_history, HistoryFormat, TerminalView};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "family-chat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A local chat log for everyone sharing one data directory")]
#[command(long_about = "Family Chat keeps its messages in a local data directory.\nThere is no server: everyone who opens the same directory shares the chat.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (overrides config and FAMILY_CHAT_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (default: platform config dir, then ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show times in UTC
    #[arg(long, global = true)]
    pub utc: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive chat (default)
    Chat,

    /// Send one message as the stored display name
    Send {
        /// Message text
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Set the display name for this data directory
    Name {
        /// Display name
        name: String,
    },

    /// Show the stored display name
    Whoami,

    /// Print the message history
    History {
        /// Only show the newest N messages
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        last: Option<u64>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = HistoryFormat::Table)]
        format: HistoryFormat,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let Cli {
        command,
        data_dir,
        config,
        utc,
    } = Cli::parse();

    match command.unwrap_or(Commands::Chat) {
        Commands::Config { output } => write_default_config(output.as_deref())?,

        Commands::Chat => {
            let (config, slots) = open_session(config.as_deref(), data_dir, utc)?;
            run_interactive(slots, &config)?;
        }

        Commands::Send { text } => {
            let (config, mut slots) = open_session(config.as_deref(), data_dir, utc)?;
            let identity = IdentityManager::load(&slots);
            let Some(user) = identity.resolve() else {
                eprintln!("No display name set for {:?}", slots.dir());
                eprintln!();
                eprintln!("Choose one with:");
                eprintln!("  family-chat name <NAME>");
                std::process::exit(1);
            };

            let mut store = ChatStore::load(&slots);
            match store.append(&mut slots, user, &text.join(" "))? {
                Some(msg) => println!(
                    "Sent as {} at {}",
                    msg.author,
                    format_timestamp(msg.created_at, config.display.time_display())
                ),
                None => println!("Nothing to send"),
            }
        }

        Commands::Name { name } => {
            let (_, mut slots) = open_session(config.as_deref(), data_dir, utc)?;
            let mut identity = IdentityManager::load(&slots);
            match identity.set(&mut slots, &name) {
                Ok(()) => println!("Display name set to {}", name.trim()),
                Err(e @ (IdentityError::EmptyName | IdentityError::AlreadySet(_))) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Whoami => {
            let (_, slots) = open_session(config.as_deref(), data_dir, utc)?;
            match IdentityManager::load(&slots).resolve() {
                Some(name) => println!("{}", name),
                None => {
                    println!("No display name set yet.");
                    println!();
                    println!("Choose one with:");
                    println!("  family-chat name <NAME>");
                }
            }
        }

        Commands::History { last, format } => {
            let (config, slots) = open_session(config.as_deref(), data_dir, utc)?;
            let store = ChatStore::load(&slots);
            let messages = match last {
                Some(n) => store.newest(usize::try_from(n).unwrap_or(usize::MAX)),
                None => store.messages(),
            };

            write_history(
                &mut io::stdout().lock(),
                messages,
                format,
                config.display.time_display(),
            )?;
        }
    }

    Ok(())
}

/// Load config, apply CLI overrides, start logging and open the data directory
fn open_session(
    config_path: Option<&Path>,
    data_dir: Option<PathBuf>,
    utc: bool,
) -> anyhow::Result<(Config, FileSlotStore)> {
    let (mut config, config_errors) = match config_path {
        Some(path) => (Config::load_with_env(path)?, Vec::new()),
        None => Config::load_default(),
    };
    if let Some(dir) = data_dir {
        config.storage.data_dir = dir.to_string_lossy().into_owned();
    }
    if utc {
        config.display.utc = true;
    }

    init_logging(&config.logging);
    report_config_errors(&mut io::stderr().lock(), &config_errors)?;

    let data_path = config.storage.data_path();
    tracing::debug!("Data directory: {:?}", data_path);
    let slots = FileSlotStore::open(&data_path)
        .with_context(|| format!("Cannot open data directory {:?}", data_path))?;

    Ok((config, slots))
}

/// Tell the user about config files that were skipped
fn report_config_errors<W: Write>(out: &mut W, errors: &[ConfigError]) -> io::Result<()> {
    for error in errors {
        tracing::debug!(%error, "Skipped config file");
        writeln!(out, "Warning: {}", error)?;
    }
    if !errors.is_empty() {
        writeln!(out, "Warning: falling back to default settings")?;
    }
    Ok(())
}

/// Interactive loop: one stdin line per UI event
fn run_interactive(slots: FileSlotStore, config: &Config) -> anyhow::Result<()> {
    let view = TerminalView::new(io::stdout().lock(), config.display.clear_screen);
    let renderer = ViewRenderer::new(config.display.time_display());
    let mut app = ChatApp::start(slots, view, renderer)?;

    let mut lines = io::stdin().lock().lines();
    loop {
        if !app.needs_username() {
            app.view_mut().prompt_input()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim() == "/quit" {
            break;
        }

        let event = if app.needs_username() {
            ChatEvent::SubmitUsername(line)
        } else {
            ChatEvent::SendMessage(line)
        };

        let outcome = app.handle(event)?;
        tracing::debug!(?outcome, "Handled event");

        if outcome == EventOutcome::UsernameRejected && app.needs_username() {
            app.view_mut().prompt_username()?;
        }
    }

    app.view_mut().notice("")?;
    tracing::debug!("Chat session closed with {} messages", app.messages().len());
    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("family_chat={}", config.level)));

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so they never mix with the chat on stdout
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn write_default_config(output: Option<&Path>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }

    Ok(())
}

//! Storyreel command line entry point.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use storyreel_content::application::loader::load_storyboard_file;
use storyreel_core::analytics::{AnalyticsSink, DiscardingSink};
use tracing_subscriber::{EnvFilter, fmt};

mod report;
mod simulate;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate a storyboard, then print its summary
    Validate {
        #[arg(value_name = "STORYBOARD")]
        file: PathBuf,
    },
    /// List every viewer path with its choices and duration
    Paths {
        #[arg(value_name = "STORYBOARD")]
        file: PathBuf,
    },
    /// Print timed captions for every scene, or one
    Captions {
        #[arg(value_name = "STORYBOARD")]
        file: PathBuf,
        /// Only this scene
        scene: Option<String>,
    },
    /// Walk a session headlessly, printing analytics events as JSON lines
    Simulate {
        #[arg(value_name = "STORYBOARD")]
        file: PathBuf,
        /// Option to take at each prompt, in order; prompts past the list take
        /// their default
        #[arg(long = "choose", value_name = "OPTION_ID")]
        choices: Vec<String>,
        /// Click the call to action once the path finishes
        #[arg(long)]
        click_cta: bool,
        /// Drop analytics events instead of printing them
        #[arg(long)]
        no_events: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

fn init_tracing(level: LogLevel, format: LogFormat) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.to_string().parse()?)
        .from_env_lossy();

    // Logs go to stderr; stdout carries command output.
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_level, cli.log_format)?;

    match cli.command {
        Command::Validate { file } => {
            let loaded = load_storyboard_file(&file)?;
            report::print_summary(&loaded)?;
        }
        Command::Paths { file } => {
            let loaded = load_storyboard_file(&file)?;
            report::print_paths(&loaded.storyboard);
        }
        Command::Captions { file, scene } => {
            let loaded = load_storyboard_file(&file)?;
            report::print_captions(&loaded.storyboard, scene.as_deref())?;
        }
        Command::Simulate {
            file,
            choices,
            click_cta,
            no_events,
        } => {
            let loaded = load_storyboard_file(&file)?;
            let sink: Arc<dyn AnalyticsSink> = if no_events {
                Arc::new(DiscardingSink)
            } else {
                Arc::new(simulate::JsonLinesSink)
            };
            let view = simulate::run_simulation(loaded.storyboard, sink, &choices, click_cta).await?;
            tracing::info!(
                scene_id = %view.scene_id,
                choices = ?view.choices,
                total_duration = view.total_duration,
                "simulation finished"
            );
        }
    }

    Ok(())
}

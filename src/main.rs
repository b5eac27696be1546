//! @ai:module:intent CLI entry point for codemark
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on document, project, output, config

use codemark::{
    output, scan_project, AnnotatedDocument, CodemarkConfig, Direction, OutputFormat, Severity,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "codemark")]
#[command(author, version, about = "Line-level review markings embedded in source files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the markings of every file in a project tree
    Status {
        /// Project root
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Configuration file (defaults to <path>/.codemark.toml)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Print the clean buffer of a file with its severities
    Show {
        /// Path to file
        path: PathBuf,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Set the severity of a range of lines (1-based, inclusive)
    Mark {
        /// Path to file
        path: PathBuf,

        /// First buffer line
        start: usize,

        /// Last buffer line (defaults to START)
        end: Option<usize>,

        /// Severity to apply
        #[arg(long, short, value_enum)]
        severity: Level,
    },

    /// Print or replace the comment block of a file
    Comments {
        /// Path to file
        path: PathBuf,

        /// New comment text
        #[arg(long, conflicts_with = "clear")]
        set: Option<String>,

        /// Remove the comment block
        #[arg(long)]
        clear: bool,
    },

    /// Translate a line or offset between file and buffer coordinates
    Translate {
        /// Path to file
        path: PathBuf,

        /// Line number (1-based)
        #[arg(long, conflicts_with = "position", required_unless_present = "position")]
        line: Option<usize>,

        /// Character offset (0-based)
        #[arg(long)]
        position: Option<usize>,

        /// Coordinate space to translate into
        #[arg(long, value_enum)]
        to: Space,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Green,
    Yellow,
    Red,
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Green => Severity::Green,
            Level::Yellow => Severity::Yellow,
            Level::Red => Severity::Red,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Space {
    File,
    Buffer,
}

impl From<Space> for Direction {
    fn from(space: Space) -> Self {
        match space {
            Space::File => Direction::BufferToFile,
            Space::Buffer => Direction::FileToBuffer,
        }
    }
}

/// Outcome of a command that completed without an error.
enum Outcome {
    Done,
    NotADocument(PathBuf),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("codemark=warn".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::NotADocument(path)) => {
            eprintln!("{} is binary, not an annotated document", path.display());
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands) -> codemark::Result<Outcome> {
    match command {
        Commands::Status {
            path,
            config,
            format,
        } => {
            let config = match config {
                Some(file) => CodemarkConfig::load(&file)?,
                None => CodemarkConfig::discover(&path)?,
            };
            let report = scan_project(&path, &config)?;
            println!("{}", output::format_project(&report, format.into()));
            Ok(Outcome::Done)
        }

        Commands::Show { path, format } => with_document(&path, |doc| {
            print!("{}", output::format_document(doc, format.into()));
            Ok(())
        }),

        Commands::Mark {
            path,
            start,
            end,
            severity,
        } => with_document(&path, |doc| {
            let first = start.saturating_sub(1);
            let last = end.unwrap_or(start).max(start);
            let changed = doc.set_severity(first..last, severity.into());

            if doc.is_dirty() {
                doc.save()?;
            }
            println!("{} lines marked {}", changed, Severity::from(severity));
            Ok(())
        }),

        Commands::Comments { path, set, clear } => with_document(&path, |doc| {
            if clear {
                doc.set_comments(None);
            } else if let Some(text) = set {
                doc.set_comments(Some(text));
            } else {
                if let Some(comments) = doc.comments() {
                    println!("{}", comments);
                }
                return Ok(());
            }

            if doc.is_dirty() {
                doc.save()?;
            }
            Ok(())
        }),

        Commands::Translate {
            path,
            line,
            position,
            to,
        } => with_document(&path, |doc| {
            let direction = Direction::from(to);
            match (line, position) {
                (Some(line), _) => match line
                    .checked_sub(1)
                    .and_then(|l| doc.translate_line(direction, l))
                {
                    Some(target) => println!("{}", target + 1),
                    None => println!("-"),
                },
                (None, Some(position)) => {
                    println!("{}", doc.translate_position(direction, position))
                }
                (None, None) => {}
            }
            Ok(())
        }),
    }
}

fn with_document<F>(path: &Path, action: F) -> codemark::Result<Outcome>
where
    F: FnOnce(&mut AnnotatedDocument) -> codemark::Result<()>,
{
    match AnnotatedDocument::load(path)? {
        Some(mut doc) => {
            action(&mut doc)?;
            Ok(Outcome::Done)
        }
        None => Ok(Outcome::NotADocument(path.to_path_buf())),
    }
}

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use log::info;
use thiserror::Error;

use quiz_core::model::{PracticeSettings, QuizDefinition};
use services::{PracticeError, PracticeSession};

mod player;

const SAMPLE_QUIZ: &str = include_str!("../fixtures/sample_quiz.json");

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTimeLow { raw: String },
    InvalidQuizPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTimeLow { raw } => write!(f, "invalid --time-low value: {raw}"),
            ArgsError::InvalidQuizPath { raw } => write!(f, "invalid --quiz value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Args(#[from] ArgsError),
    #[error("could not read quiz file {}: {source}", path.display())]
    ReadQuiz {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Model(#[from] quiz_core::Error),
    #[error(transparent)]
    Practice(#[from] PracticeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play [--quiz <path>] [--time-low <secs>] [--no-shuffle]");
    eprintln!();
    eprintln!("Defaults for play:");
    eprintln!("  built-in sample quiz, --time-low 5, shuffled");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_FILE, QUIZ_TIME_LOW_SECS, QUIZ_NO_SHUFFLE, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    quiz_path: Option<PathBuf>,
    time_low_secs: u32,
    shuffle: bool,
}

impl Default for Args {
    fn default() -> Self {
        let settings = PracticeSettings::default();
        Self {
            quiz_path: None,
            time_low_secs: settings.time_low_secs(),
            shuffle: settings.shuffle(),
        }
    }
}

fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Args {
    /// Defaults overridden by `QUIZ_*` environment variables.
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            quiz_path: std::env::var("QUIZ_FILE")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            time_low_secs: std::env::var("QUIZ_TIME_LOW_SECS")
                .ok()
                .and_then(|value| value.trim().parse::<u32>().ok())
                .unwrap_or(defaults.time_low_secs),
            shuffle: !std::env::var("QUIZ_NO_SHUFFLE")
                .ok()
                .is_some_and(|value| env_flag(&value)),
        }
    }

    fn parse_play(mut self, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--quiz" => {
                    let value = require_value(args, "--quiz")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidQuizPath { raw: value });
                    }
                    self.quiz_path = Some(PathBuf::from(value));
                }
                "--time-low" => {
                    let value = require_value(args, "--time-low")?;
                    self.time_low_secs = value
                        .trim()
                        .parse()
                        .map_err(|_| ArgsError::InvalidTimeLow { raw: value.clone() })?;
                }
                "--no-shuffle" => self.shuffle = false,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(self)
    }

    fn settings(&self) -> Result<PracticeSettings, quiz_core::Error> {
        Ok(PracticeSettings::new(self.time_low_secs, self.shuffle)?)
    }
}

fn load_quiz(path: Option<&PathBuf>) -> Result<QuizDefinition, AppError> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| AppError::ReadQuiz {
            path: path.clone(),
            source,
        })?,
        None => SAMPLE_QUIZ.to_string(),
    };
    QuizDefinition::from_json(&raw).map_err(|err| AppError::Model(err.into()))
}

async fn run() -> Result<(), AppError> {
    let mut argv = std::env::args().skip(1).peekable();
    let first = argv.peek().cloned();

    match first.as_deref() {
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some("play") => {
            argv.next();
        }
        Some(first) if !first.starts_with("--") => {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            return Err(ArgsError::UnknownArg(first.to_string()).into());
        }
        _ => {}
    }

    let args = Args::from_env().parse_play(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let settings = args.settings()?;
    let quiz = load_quiz(args.quiz_path.as_ref())?;
    info!(
        "loaded quiz {} \"{}\" ({} multiple choice, {} matching)",
        quiz.id(),
        quiz.title(),
        quiz.multiple_choice().len(),
        quiz.matching().len()
    );

    let mut session =
        PracticeSession::start(&quiz, settings).with_observer(Arc::new(player::TerminalCues));
    if session.is_empty() {
        println!("\"{}\" has no questions yet.", quiz.title());
        return Ok(());
    }

    println!("{}", quiz.title());
    player::play(&mut session).await?;
    let summary = session.finish()?;
    player::print_summary(summary);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = raw.iter().map(|s| (*s).to_string());
        Args::default().parse_play(&mut iter)
    }

    #[test]
    fn sample_quiz_is_valid() {
        let quiz = QuizDefinition::from_json(SAMPLE_QUIZ).unwrap();
        assert_eq!(quiz.multiple_choice().len(), 3);
        assert_eq!(quiz.matching_groups().len(), 2);
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&["--quiz", "quiz.json", "--time-low", "8", "--no-shuffle"]).unwrap();
        assert_eq!(args.quiz_path, Some(PathBuf::from("quiz.json")));
        assert_eq!(args.time_low_secs, 8);
        assert!(!args.shuffle);
    }

    #[test]
    fn bad_flags_are_reported() {
        assert!(matches!(
            parse(&["--time-low", "soon"]),
            Err(ArgsError::InvalidTimeLow { .. })
        ));
        assert!(matches!(
            parse(&["--quiz"]),
            Err(ArgsError::MissingValue { flag: "--quiz" })
        ));
        assert!(matches!(parse(&["--fast"]), Err(ArgsError::UnknownArg(_))));
    }

    #[test]
    fn oversized_time_low_fails_settings_validation() {
        let args = parse(&["--time-low", "100000"]).unwrap();
        assert!(args.settings().is_err());
    }

    #[test]
    fn env_flags_accept_common_spellings() {
        assert!(env_flag("1"));
        assert!(env_flag(" TRUE "));
        assert!(!env_flag("0"));
    }
}

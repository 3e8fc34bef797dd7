mod play;
mod render;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use content::{ContentConfig, ContentSource, ContentStore, FsSource, HttpSource, InMemoryProgress};
use lesson_core::model::{LessonId, Level};
use services::{LessonService, PracticeService, QuizService};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::play::Pacing;

const DEFAULT_CONTENT_DIR: &str = "assets/data";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLevel { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    NeedsDirectory,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLevel { raw } => {
                write!(f, "invalid --level value: {raw} (expected 1-5)")
            }
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::NeedsDirectory => write!(f, "validate needs a content directory, not --url"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_positive(flag: &'static str, raw: String) -> Result<u32, ArgsError> {
    match raw.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ArgsError::InvalidNumber { flag, raw }),
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app quiz      [--level <1-5>] [--quiz <n>] [--no-delay]");
    eprintln!("  app lessons   [--level <1-5>] [--lesson <id>]");
    eprintln!("  app practice  [--level <1-5>] [--batch <n>] [--reset]");
    eprintln!("  app validate  [--content <dir>]");
    eprintln!();
    eprintln!("Content (all commands):");
    eprintln!("  --content <dir>   read JSON files from a directory (default {DEFAULT_CONTENT_DIR})");
    eprintln!("  --url <base>      fetch JSON files over HTTP instead");
    eprintln!();
    eprintln!("Without --quiz, `quiz` lists the quizzes of the level.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ILM_CONTENT_DIR, ILM_CONTENT_URL, ILM_PRACTICE_BATCH, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Lessons,
    Practice,
    Validate,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "lessons" => Some(Self::Lessons),
            "practice" => Some(Self::Practice),
            "validate" | "validate-json" => Some(Self::Validate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SourceSpec {
    Dir(PathBuf),
    Url(String),
}

#[derive(Debug)]
struct Args {
    source: SourceSpec,
    level: Option<Level>,
    quiz: Option<u32>,
    lesson: Option<LessonId>,
    batch: Option<usize>,
    pacing: bool,
    reset: bool,
}

impl Args {
    fn from_env() -> Self {
        let source = match std::env::var("ILM_CONTENT_URL") {
            Ok(url) if !url.trim().is_empty() => SourceSpec::Url(url),
            _ => SourceSpec::Dir(
                std::env::var("ILM_CONTENT_DIR")
                    .map_or_else(|_| PathBuf::from(DEFAULT_CONTENT_DIR), PathBuf::from),
            ),
        };
        let batch = std::env::var("ILM_PRACTICE_BATCH")
            .ok()
            .and_then(|value| value.parse::<usize>().ok());

        Self {
            source,
            level: None,
            quiz: None,
            lesson: None,
            batch,
            pacing: true,
            reset: false,
        }
    }

    fn parse(mut self, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--content" => {
                    self.source = SourceSpec::Dir(require_value(args, "--content")?.into());
                }
                "--url" => self.source = SourceSpec::Url(require_value(args, "--url")?),
                "--level" => {
                    let value = require_value(args, "--level")?;
                    let level = value
                        .parse::<Level>()
                        .map_err(|_| ArgsError::InvalidLevel { raw: value.clone() })?;
                    self.level = Some(level);
                }
                "--quiz" => {
                    self.quiz = Some(parse_positive("--quiz", require_value(args, "--quiz")?)?);
                }
                "--lesson" => self.lesson = Some(LessonId::new(require_value(args, "--lesson")?)),
                "--batch" => {
                    let value = parse_positive("--batch", require_value(args, "--batch")?)?;
                    self.batch = Some(value as usize);
                }
                "--no-delay" => self.pacing = false,
                "--reset" => self.reset = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(self)
    }

    fn level_or_first(&self) -> Level {
        self.level.unwrap_or(Level::FIRST)
    }

    fn store(&self) -> Result<ContentStore, Box<dyn std::error::Error>> {
        let source: Arc<dyn ContentSource> = match &self.source {
            SourceSpec::Dir(dir) => Arc::new(FsSource::new(dir)),
            SourceSpec::Url(url) => Arc::new(HttpSource::new(url)?),
        };
        let mut config = ContentConfig::default();
        if let Some(batch) = self.batch {
            config = config.with_practice_batch_size(batch);
        }
        log::debug!("[APP] content source: {:?}", self.source);
        Ok(ContentStore::new(source, config))
    }
}

async fn run() -> Result<i32, Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => {
            print_usage();
            return Ok(2);
        }
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(0);
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            print_usage();
            ArgsError::UnknownArg(first)
        })?,
    };

    let args = Args::from_env().parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    match cmd {
        Command::Quiz => quiz(&args).await,
        Command::Lessons => lessons(&args).await,
        Command::Practice => practice(&args).await,
        Command::Validate => validate(&args),
    }
}

async fn quiz(args: &Args) -> Result<i32, Box<dyn std::error::Error>> {
    let level = args.level_or_first();
    let quizzes = QuizService::new(Arc::new(args.store()?));

    let Some(number) = args.quiz else {
        println!("Level {level}: {}", level.title());
        let available = quizzes.available(level).await;
        if available.is_empty() {
            println!("  no quizzes yet");
        }
        for summary in &available {
            println!("{}", render::quiz_summary(summary));
        }
        return Ok(0);
    };

    let mut session = quizzes.start(level, number).await?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut out = std::io::stdout();
    match play::run_quiz(&mut session, &mut input, &mut out, Pacing::new(args.pacing)).await? {
        Some(_) => Ok(0),
        None => {
            println!("Back to lessons.");
            Ok(0)
        }
    }
}

async fn lessons(args: &Args) -> Result<i32, Box<dyn std::error::Error>> {
    let store = args.store()?;
    let mut lessons = LessonService::load(&store).await;

    if let Some(id) = &args.lesson {
        let item = lessons.set_current(id)?;
        print!("{}", render::lesson_detail(item));
        if let Some(previous) = lessons.previous() {
            println!("previous: {}", previous.id);
        }
        if let Some(next) = lessons.next() {
            println!("next: {}", next.id);
        }
        return Ok(0);
    }

    let levels: Vec<Level> = match args.level {
        Some(level) => vec![level],
        None => Level::all().collect(),
    };
    for level in levels {
        println!("Level {level}: {}", level.title());
        for group in store.lesson_groups(level).await {
            println!("{}", render::lesson_group(&group.metadata()));
        }
        for item in lessons.by_level(level) {
            println!("{}", render::lesson_line(item));
        }
    }
    Ok(0)
}

async fn practice(args: &Args) -> Result<i32, Box<dyn std::error::Error>> {
    let level = args.level_or_first();
    let practice = PracticeService::new(Arc::new(args.store()?), Arc::new(InMemoryProgress::new()));
    if args.reset {
        practice.reset_progress(level).await?;
    }

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut out = std::io::stdout();
    let marked = play::run_practice(&practice, level, &mut input, &mut out).await?;
    println!("Marked {marked} item(s) read.");
    Ok(0)
}

fn validate(args: &Args) -> Result<i32, Box<dyn std::error::Error>> {
    let SourceSpec::Dir(dir) = &args.source else {
        return Err(ArgsError::NeedsDirectory.into());
    };
    let report = content::scan_json_tree(dir)?;
    println!("{}", render::scan_report(&report));
    if report.is_ok() {
        Ok(0)
    } else {
        log::warn!("[APP] {} invalid JSON file(s)", report.invalid.len());
        Ok(1)
    }
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    match run().await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            // At this layer (binary glue), printing once is fine.
            eprintln!("{err}");
            std::process::exit(2);
        }
    }
}

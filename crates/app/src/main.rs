use std::fmt;

use course_core::certificate::PlainTextRenderer;
use course_core::grading::QuizAnswers;
use course_core::model::{LessonId, ModuleId};
use services::{AppServices, Clock, CourseOutline, CourseViewer, ViewerError};
use tracing::debug;

mod telemetry;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingOperand { command: &'static str, what: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidId { raw: String },
    InvalidAnswer { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingOperand { command, what } => {
                write!(f, "{command} requires {what}")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidId { raw } => write!(f, "invalid id: {raw:?}"),
            ArgsError::InvalidAnswer { raw } => {
                write!(f, "invalid answer {raw:?}, expected <question>=<option>")
            }
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [options] [command]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  outline                          course tree with progress (default)");
    eprintln!("  lesson <module-id> <lesson-id>   show a lesson and its quiz");
    eprintln!("  complete <lesson-id>             mark a lesson complete");
    eprintln!("  quiz <lesson-id> [<q>=<o> ...]   submit quiz answers (0-based indices)");
    eprintln!("  reset                            forget all progress");
    eprintln!("  certificate                      print the certificate once complete");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>   progress database (default: sqlite://course.sqlite3)");
    eprintln!("  --memory            keep progress in memory only");
    eprintln!("  --name <name>       name printed on the certificate");
    eprintln!("  --json              print the outline as JSON");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COURSE_DB_URL, LOG_LEVEL, LOG_FORMAT=json");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DbTarget {
    Sqlite(String),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Outline,
    Lesson { module: ModuleId, lesson: LessonId },
    Complete(LessonId),
    Quiz { lesson: LessonId, answers: QuizAnswers },
    Reset,
    Certificate,
}

struct Args {
    db: DbTarget,
    name: Option<String>,
    json: bool,
    command: Command,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut db = std::env::var("COURSE_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(
                || DbTarget::Sqlite("sqlite://course.sqlite3".into()),
                |value| DbTarget::Sqlite(normalize_sqlite_url(value)),
            );
        let mut name = None;
        let mut json = false;
        let mut positional = Vec::new();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db = DbTarget::Sqlite(normalize_sqlite_url(value));
                }
                "--memory" => db = DbTarget::Memory,
                "--name" => name = Some(require_value(&mut args, "--name")?),
                "--json" => json = true,
                "--help" | "-h" => return Ok(None),
                flag if flag.starts_with("--") => {
                    return Err(ArgsError::UnknownArg(flag.to_owned()));
                }
                _ => positional.push(arg),
            }
        }

        let command = Command::from_positional(positional)?;
        Ok(Some(Self {
            db,
            name,
            json,
            command,
        }))
    }
}

impl Command {
    fn from_positional(positional: Vec<String>) -> Result<Self, ArgsError> {
        let mut words = positional.into_iter();
        let Some(first) = words.next() else {
            return Ok(Self::Outline);
        };

        let command = match first.as_str() {
            "outline" => Self::Outline,
            "lesson" => {
                let module = parse_id(words.next(), "lesson", "<module-id> <lesson-id>")?;
                let lesson = parse_id(words.next(), "lesson", "<module-id> <lesson-id>")?;
                Self::Lesson { module, lesson }
            }
            "complete" => Self::Complete(parse_id(words.next(), "complete", "<lesson-id>")?),
            "quiz" => {
                let lesson = parse_id(words.next(), "quiz", "<lesson-id>")?;
                let answers = words
                    .by_ref()
                    .map(|raw| parse_answer(&raw))
                    .collect::<Result<QuizAnswers, _>>()?;
                Self::Quiz { lesson, answers }
            }
            "reset" => Self::Reset,
            "certificate" => Self::Certificate,
            _ => return Err(ArgsError::UnknownCommand(first)),
        };

        if let Some(extra) = words.next() {
            return Err(ArgsError::UnknownArg(extra));
        }
        Ok(command)
    }
}

fn parse_id<T: std::str::FromStr>(
    raw: Option<String>,
    command: &'static str,
    what: &'static str,
) -> Result<T, ArgsError> {
    let raw = raw.ok_or(ArgsError::MissingOperand { command, what })?;
    raw.parse().map_err(|_| ArgsError::InvalidId { raw })
}

fn parse_answer(raw: &str) -> Result<(usize, usize), ArgsError> {
    let invalid = || ArgsError::InvalidAnswer { raw: raw.to_owned() };
    let (question, option) = raw.split_once('=').ok_or_else(invalid)?;
    let question = question.trim().parse().map_err(|_| invalid())?;
    let option = option.trim().parse().map_err(|_| invalid())?;
    Ok((question, option))
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

//
// ─── OUTPUT ────────────────────────────────────────────────────────────────────
//

fn print_outline(outline: &CourseOutline) {
    println!("{}", outline.title);
    if !outline.subtitle.is_empty() {
        println!("{}", outline.subtitle);
    }
    println!(
        "Progress: {}% ({}/{} lessons)",
        outline.completion_percent, outline.completed_lessons, outline.total_lessons
    );
    for module in &outline.modules {
        println!();
        println!("{} [{}]", module.title, module.id);
        if module.lessons.is_empty() {
            println!("    (no lessons yet)");
        }
        for lesson in &module.lessons {
            let mark = if lesson.completed { "x" } else { " " };
            let score = lesson
                .quiz_score
                .map(|s| format!("  quiz {}/{}", s.score(), s.out_of()))
                .unwrap_or_default();
            println!("  [{mark}] {} ({}){score}", lesson.title, lesson.id);
        }
    }
    if outline.certificate_eligible {
        println!();
        println!("All lessons complete. Run `certificate` to print your certificate.");
    }
}

fn print_lesson(viewer: &CourseViewer) {
    let Some(lesson) = viewer.active_lesson() else {
        println!("Lesson not found.");
        return;
    };

    let done = if viewer.progress().is_complete(lesson.id()) {
        " (completed)"
    } else {
        ""
    };
    println!("{}{done}", lesson.title());
    println!();
    println!("{}", lesson.content());
    if let Some(video) = lesson.video() {
        println!();
        println!("Video: {video}");
    }
    if lesson.has_quiz() {
        println!();
        println!("Quiz:");
        for (qi, question) in lesson.quiz().iter().enumerate() {
            println!("  {qi}. {}", question.text());
            for (oi, option) in question.options().iter().enumerate() {
                println!("       {oi}) {option}");
            }
        }
        if let Some(score) = viewer.progress().quiz_score(lesson.id()) {
            println!();
            println!("Last score: {}/{}", score.score(), score.out_of());
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = match Args::parse(std::env::args().skip(1)) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return Err(err.into());
        }
    };

    telemetry::init_tracing();

    let clock = Clock::default();
    let mut app = match &parsed.db {
        DbTarget::Sqlite(url) => {
            prepare_sqlite_file(url)?;
            AppServices::new_sqlite(url, clock).await?
        }
        DbTarget::Memory => AppServices::new_in_memory(clock).await?,
    };
    let viewer = app.viewer_mut();
    if let Some(name) = parsed.name {
        viewer.set_profile_name(name);
    }

    debug!(command = ?parsed.command, "dispatching");
    match parsed.command {
        Command::Outline => {
            let outline = viewer.outline();
            if parsed.json {
                println!("{}", serde_json::to_string_pretty(&outline)?);
            } else {
                print_outline(&outline);
            }
        }
        Command::Lesson { module, lesson } => {
            viewer.select_lesson(module, lesson);
            print_lesson(viewer);
        }
        Command::Complete(lesson) => {
            if viewer.course().find_lesson(&lesson).is_none() {
                return Err(ViewerError::UnknownLesson(lesson).into());
            }
            let newly = viewer.mark_complete(lesson.clone()).await?;
            if newly {
                println!("Marked {lesson} complete.");
            } else {
                println!("{lesson} was already complete.");
            }
            println!("Progress: {}%", viewer.completion_percent());
        }
        Command::Quiz { lesson, answers } => {
            let submission = viewer.submit_quiz(&lesson, &answers).await?;
            println!(
                "Score: {}/{}",
                submission.score.score(),
                submission.score.out_of()
            );
            if submission.newly_completed {
                println!("Passed. {lesson} is now complete.");
            } else if !submission.score.is_passing() {
                println!("Not passed yet. Score at least half to complete the lesson.");
            }
            println!("Progress: {}%", viewer.completion_percent());
        }
        Command::Reset => {
            viewer.reset_progress().await?;
            println!("Progress reset.");
        }
        Command::Certificate => match viewer.print_certificate(&PlainTextRenderer::default()) {
            Ok(text) => print!("{text}"),
            Err(ViewerError::NotEligible { percent }) => {
                println!("Complete every lesson to unlock your certificate ({percent}% done).");
            }
            Err(err) => return Err(err.into()),
        },
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

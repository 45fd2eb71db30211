use std::fmt;

use learn_core::Clock;
use learn_core::model::{EngineSettingsDraft, UserDraft};
use services::{CatalogService, SessionController};
use storage::repository::{Storage, load_catalog};
use storage::sample::SampleCatalog;
use storage::sqlite::SqliteRepository;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod driver;
mod intent;

use driver::{Driver, Flow};
use intent::{HELP, Intent};

const MEMORY_DB: &str = "sqlite::memory:";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidBonusXp { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidBonusXp { raw } => write!(f, "invalid --bonus-xp value: {raw}"),
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Backend {
    /// Plain in-process repository, no SQL involved.
    Memory,
    Sqlite(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    backend: Backend,
    user_name: Option<String>,
    bonus_xp: Option<u32>,
    badge: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [run]  [options]");
    eprintln!("  cargo run -p app -- seed   [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url|memory>  Content database (default: {MEMORY_DB}, seeded)");
    eprintln!("  --user <name>             Display name for the learner");
    eprintln!("  --bonus-xp <n>            XP granted on lesson completion (default: 30)");
    eprintln!("  --badge <name>            Badge granted on lesson completion");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  LEARN_DB_URL, LEARN_USER_NAME, LEARN_BONUS_XP, LEARN_REWARD_BADGE, RUST_LOG");
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut backend =
            env("LEARN_DB_URL").map_or_else(|| Backend::Sqlite(MEMORY_DB.into()), parse_backend);
        let mut user_name = env("LEARN_USER_NAME");
        let mut bonus_xp = match env("LEARN_BONUS_XP") {
            Some(raw) => Some(parse_bonus(raw)?),
            None => None,
        };
        let mut badge = env("LEARN_REWARD_BADGE");

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    backend = parse_backend(value);
                }
                "--user" => user_name = Some(require_value(args, "--user")?),
                "--bonus-xp" => bonus_xp = Some(parse_bonus(require_value(args, "--bonus-xp")?)?),
                "--badge" => badge = Some(require_value(args, "--badge")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            backend,
            user_name,
            bonus_xp,
            badge,
        })
    }
}

fn parse_bonus(raw: String) -> Result<u32, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidBonusXp { raw })
}

fn parse_backend(raw: String) -> Backend {
    if raw.trim() == "memory" {
        Backend::Memory
    } else {
        Backend::Sqlite(normalize_sqlite_url(raw))
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == MEMORY_DB || raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:") {
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
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
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

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn open_storage(backend: &Backend) -> Result<Storage, Box<dyn std::error::Error>> {
    match backend {
        Backend::Memory => Ok(Storage::in_memory()?),
        Backend::Sqlite(url) => {
            prepare_sqlite_file(url)?;
            Ok(Storage::sqlite(url).await?)
        }
    }
}

fn build_session(args: &Args) -> Result<SessionController, Box<dyn std::error::Error>> {
    let settings = EngineSettingsDraft {
        lesson_complete_bonus: args.bonus_xp,
        reward_badge: args.badge.clone(),
        total_topics: None,
    }
    .validate()?;

    let mut user = UserDraft::starter();
    if let Some(name) = &args.user_name {
        user.name.clone_from(name);
    }
    Ok(SessionController::new(user.validate()?, settings, Clock::system()))
}

async fn run_prompt(mut driver: Driver) -> Result<(), Box<dyn std::error::Error>> {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let intent = match Intent::parse(&line) {
            Ok(Some(intent)) => intent,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        let mut out = Vec::new();
        match driver.handle(intent, &mut out).await {
            Ok(flow) => {
                for line in out {
                    println!("{line}");
                }
                if flow == Flow::Quit {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(%err, "intent rejected");
                println!("{err}");
            }
        }
    }
    tracing::info!(
        xp = driver.session().user().xp(),
        level = driver.session().user().level(),
        "session ended"
    );
    Ok(())
}

async fn seed(backend: &Backend) -> Result<(), Box<dyn std::error::Error>> {
    let Backend::Sqlite(url) = backend else {
        eprintln!("seed: nothing to do for the in-memory backend");
        return Ok(());
    };
    prepare_sqlite_file(url)?;
    let repo = SqliteRepository::connect(url).await?;
    repo.migrate().await?;
    let catalog = SampleCatalog::budgeting()?;
    load_catalog(&repo, &catalog).await?;
    println!(
        "Seeded {} lessons and {} quizzes into {url}",
        catalog.lessons.len(),
        catalog.quizzes.len()
    );
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means `run`.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Run,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Run,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let args = Args::parse(&mut argv.into_iter(), |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();
    tracing::debug!(?args, ?cmd, "starting");

    match cmd {
        Command::Run => {
            let storage = open_storage(&args.backend).await?;
            let session = build_session(&args)?;
            let catalog = CatalogService::from_storage(&storage);
            run_prompt(Driver::new(session, catalog)).await
        }
        Command::Seed => seed(&args.backend).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str], env: &[(&str, &str)]) -> Result<Args, ArgsError> {
        let env: Vec<(String, String)> = env
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut args = argv.iter().map(|s| (*s).to_string());
        Args::parse(&mut args, |key| {
            env.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn defaults_to_seeded_in_memory_sqlite() {
        let args = parse(&[], &[]).unwrap();
        assert_eq!(args.backend, Backend::Sqlite(MEMORY_DB.into()));
        assert_eq!(args.bonus_xp, None);
    }

    #[test]
    fn flags_override_environment() {
        let args = parse(
            &["--bonus-xp", "50", "--db", "memory"],
            &[("LEARN_BONUS_XP", "10"), ("LEARN_USER_NAME", "Ada")],
        )
        .unwrap();
        assert_eq!(args.bonus_xp, Some(50));
        assert_eq!(args.backend, Backend::Memory);
        assert_eq!(args.user_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            parse(&["--bonus-xp", "lots"], &[]),
            Err(ArgsError::InvalidBonusXp { .. })
        ));
        assert!(matches!(
            parse(&["--db"], &[]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(
            parse(&["--wat"], &[]),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn relative_sqlite_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:dev.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("dev.sqlite3"));
        assert_eq!(normalize_sqlite_url(MEMORY_DB.into()), MEMORY_DB);
    }

    #[test]
    fn session_uses_configured_reward() {
        let args = parse(&["--bonus-xp", "5", "--badge", "Saver", "--user", "Ada"], &[]).unwrap();
        let session = build_session(&args).unwrap();
        assert_eq!(session.settings().lesson_complete_bonus(), 5);
        assert_eq!(session.settings().reward_badge(), "Saver");
        assert_eq!(session.user().name(), "Ada");
    }
}

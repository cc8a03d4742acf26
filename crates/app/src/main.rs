use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::api::ApiConfig;
use services::study_service::DEFAULT_QUIZ_MINUTES;
use services::{AppServices, AuthService, Clock, LibraryService, StudyService, UploadService};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt};
use ui::{App, DesktopLinkOpener, LinkOpenerRef, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite:study.sqlite3";

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidApiUrl { raw: String },
    InvalidTimeLimit { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw}"),
            ArgsError::InvalidTimeLimit { raw } => {
                write!(f, "invalid --time-limit value: {raw} (expected whole minutes)")
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

struct DesktopApp {
    services: AppServices,
    link_opener: LinkOpenerRef,
}

impl UiApp for DesktopApp {
    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn library(&self) -> Arc<LibraryService> {
        self.services.library()
    }

    fn study(&self) -> Arc<StudyService> {
        self.services.study()
    }

    fn uploads(&self) -> Arc<UploadService> {
        self.services.uploads()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    db_url: String,
    api: ApiConfig,
    quiz_minutes: u32,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  study ui     [--api <url>] [--db <sqlite_url>] [--time-limit <minutes>]");
    eprintln!("  study logout [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api {}", services::api::DEFAULT_API_URL);
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --time-limit {DEFAULT_QUIZ_MINUTES}   (0 disables the quiz countdown)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_API_URL, STUDY_API_TIMEOUT_SECS, STUDY_DB_URL, STUDY_QUIZ_MINUTES, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Logout,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "logout" => Some(Self::Logout),
            _ => None,
        }
    }
}

/// Environment values the parser falls back to before flags apply.
#[derive(Debug, Default)]
struct EnvDefaults {
    db_url: Option<String>,
    quiz_minutes: Option<String>,
}

impl EnvDefaults {
    fn from_env() -> Self {
        Self {
            db_url: std::env::var("STUDY_DB_URL").ok(),
            quiz_minutes: std::env::var("STUDY_QUIZ_MINUTES").ok(),
        }
    }
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: EnvDefaults,
        api: ApiConfig,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env
            .db_url
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| normalize_sqlite_url(DEFAULT_DB_URL.into()), normalize_sqlite_url);
        let mut quiz_minutes = match env.quiz_minutes {
            Some(raw) => parse_minutes(raw)?,
            None => DEFAULT_QUIZ_MINUTES,
        };
        let mut api = api;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--api" => {
                    let value = require_value(args, "--api")?;
                    let trimmed = value.trim();
                    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    api.base_url = trimmed.trim_end_matches('/').to_string();
                }
                "--time-limit" => {
                    quiz_minutes = parse_minutes(require_value(args, "--time-limit")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            api,
            quiz_minutes,
        })
    }
}

fn parse_minutes(raw: String) -> Result<u32, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidTimeLimit { raw })
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

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            print_usage();
            ArgsError::UnknownArg(first.to_string())
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter, EnvDefaults::from_env(), ApiConfig::from_env())
        .inspect_err(|_| print_usage())?;

    init_tracing();

    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(
        &parsed.db_url,
        parsed.api.clone(),
        Clock::default_clock(),
        parsed.quiz_minutes,
    )
    .await?;

    match cmd {
        Command::Ui => {
            match services.restored_user() {
                Some(user) => info!(user = %user.email, "restored session"),
                None => info!("no stored session"),
            }
            info!(
                api = %parsed.api.base_url,
                db = %parsed.db_url,
                quiz_minutes = parsed.quiz_minutes,
                "launching"
            );

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                services,
                link_opener: Arc::new(DesktopLinkOpener),
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Study")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Logout => {
            services.auth().logout().await?;
            eprintln!("signed out");
            Ok(())
        }
    }
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

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

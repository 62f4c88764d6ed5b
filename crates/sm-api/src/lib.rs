use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::header::CONTENT_TYPE,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use clap::Parser;
use dotenvy::dotenv;
use sm_common::logging::{init_tracing_subscriber, install_tracing_panic_hook, LogSettings};
use sm_common::{CatalogFile, ConfigError, SkillMatcher};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub mod error;
pub mod handlers;

use error::ApiError;
use handlers::{health, jobs, matches};

#[derive(Debug, Clone, Parser)]
#[command(name = "sm-api", about = "HTTP API for candidate/job skill matching")]
struct Cli {
    /// Server port
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// JSON file with synonym groups, job profiles and scoring thresholds
    #[arg(long, env = "SM_CATALOG_PATH")]
    catalog: Option<PathBuf>,

    /// Override the score at which a required skill counts as matched
    #[arg(long, env = "SM_MATCH_THRESHOLD")]
    match_threshold: Option<f64>,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "SM_CORS_ORIGINS", default_value = "http://localhost:3000")]
    cors_origins: String,

    /// Write daily-rotated log files here instead of stdout
    #[arg(long, env = "SM_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Keep the default panic output next to the tracing event
    #[arg(
        long,
        env = "SM_LOG_INCLUDE_BACKTRACE",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    log_include_backtrace: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub catalog_path: Option<PathBuf>,
    pub match_threshold: Option<f64>,
    pub cors_origins: Vec<String>,
    pub log: LogSettings,
}

impl AppConfig {
    fn from_cli(cli: Cli) -> Self {
        let cors_origins = cli
            .cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self {
            port: cli.port,
            catalog_path: cli.catalog,
            match_threshold: cli.match_threshold,
            cors_origins,
            log: LogSettings {
                dir: cli.log_dir,
                include_backtrace: cli.log_include_backtrace,
            },
        }
    }

    pub fn for_tests() -> Self {
        Self {
            port: 0,
            catalog_path: None,
            match_threshold: None,
            cors_origins: Vec::new(),
            log: LogSettings::default(),
        }
    }
}

/// Build the engine once at start-up; it is never reloaded while serving.
pub fn load_matcher(
    catalog_path: Option<&Path>,
    match_threshold: Option<f64>,
) -> Result<SkillMatcher, ConfigError> {
    let mut file = match catalog_path {
        Some(path) => CatalogFile::load(path)?,
        None => CatalogFile::default(),
    };

    if let Some(threshold) = match_threshold {
        let mut scoring = file.scoring.unwrap_or_default();
        scoring.match_threshold = threshold;
        file.scoring = Some(scoring);
    }

    file.into_matcher()
}

pub struct AppState {
    pub matcher: SkillMatcher,
    pub config: AppConfig,
}

pub type SharedState = Arc<AppState>;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let api_routes = Router::new()
        .route("/jobs", get(jobs::list_jobs))
        .route("/match/score", post(matches::score_profile))
        .route("/match/best", post(matches::best_job))
        .route("/match/rank", post(matches::rank_jobs));

    Router::new()
        .route("/livez", get(health::livez))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub fn test_state(matcher: SkillMatcher) -> SharedState {
    Arc::new(AppState {
        matcher,
        config: AppConfig::for_tests(),
    })
}

pub async fn run() -> Result<(), ApiError> {
    dotenv().ok();
    let config = AppConfig::from_cli(Cli::parse());

    let _log_guard = init_tracing_subscriber(env!("CARGO_PKG_NAME"), &config.log);
    install_tracing_panic_hook(env!("CARGO_PKG_NAME"), config.log.include_backtrace);
    info!(
        log_dir = ?config.log.dir,
        include_backtrace = config.log.include_backtrace,
        "logging initialised"
    );

    // Reported here so the event is written before the log guard drops.
    let result = serve(config).await;
    if let Err(err) = &result {
        tracing::error!(error = %err, "sm-api failed");
    }
    result
}

async fn serve(config: AppConfig) -> Result<(), ApiError> {
    let matcher = load_matcher(config.catalog_path.as_deref(), config.match_threshold)?;

    info!(
        jobs = matcher.catalog().len(),
        synonym_groups = matcher.synonyms().len(),
        match_threshold = matcher.scoring_config().match_threshold,
        "skill matcher ready"
    );

    let state = Arc::new(AppState {
        matcher,
        config: config.clone(),
    });

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let app = create_router(state);

    info!(%addr, "sm-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

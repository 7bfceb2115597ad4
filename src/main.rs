use std::sync::Arc;

use support_triage::config::{AppConfig, ReplyConfig, ReplyStrategy, SentimentConfig};
use support_triage::dashboard::dashboard_routes;
use support_triage::enrich::Enricher;
use support_triage::ingest;
use support_triage::services::{
    HttpSentimentClassifier, LlmReplyGenerator, ReplyGenerator, SentimentService,
    TemplateReplyGenerator,
};
use support_triage::session::SessionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    // Tracing goes to stderr, plus a daily-rolling file when a log
    // directory is configured. The guard must outlive main.
    let _log_guard = match config.log_dir.as_deref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "support-triage.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .with_target(false)
                .init();
            None
        }
    };

    // A bad reply configuration is a startup error, not a per-row one.
    let reply_config = ReplyConfig::from_env()?;
    let reply: Arc<dyn ReplyGenerator> = match reply_config.strategy {
        ReplyStrategy::Generated => Arc::new(LlmReplyGenerator::from_config(&reply_config)?),
        ReplyStrategy::Templated => Arc::new(TemplateReplyGenerator::new()),
    };

    let sentiment: Option<Arc<dyn SentimentService>> = match SentimentConfig::from_env() {
        Some(sentiment_config) => Some(Arc::new(HttpSentimentClassifier::new(sentiment_config)?)),
        None => None,
    };

    eprintln!("📬 Support Triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://0.0.0.0:{}/api/records", config.port);
    eprintln!(
        "   Sentiment: {}",
        if sentiment.is_some() {
            "enabled"
        } else {
            "disabled (labels default to UNKNOWN)"
        }
    );
    eprintln!(
        "   Replies: {}",
        match reply_config.strategy {
            ReplyStrategy::Templated => "templated",
            ReplyStrategy::Generated => "generated",
        }
    );

    let enricher = Arc::new(Enricher::new(sentiment, reply, &config));
    let store = SessionStore::new();

    // ── Startup load ─────────────────────────────────────────────────────
    if let Some(path) = config.input_path.as_deref() {
        match ingest::load_csv(path) {
            Ok(records) => {
                let table = enricher.enrich(records, path).await;
                let summary = store.replace(table).await;
                eprintln!("   Loaded: {} ({} records)", path, summary.total);
            }
            Err(e) => {
                eprintln!("Error: failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        }
    } else {
        eprintln!("   No input file; load one via POST /api/session/load\n");
    }

    // ── Server ────────────────────────────────────────────────────────────
    let app = dashboard_routes(store, enricher);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "dashboard server started");
    axum::serve(listener, app).await?;

    Ok(())
}

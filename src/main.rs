use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use release_notifier::core::config::{parse_project_list, AppConfig};
use release_notifier::core::feed::fetcher::build_http_client;
use release_notifier::core::notify::LarkNotifier;
use release_notifier::core::scanner::ReleaseScanner;
use release_notifier::core::store::FileSeenStore;

const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "release_notifier=info".into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// Errors are logged and the process still exits 0; only the narrowest
// scope (one project, one notification) is ever abandoned.
#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();

    tracing::info!("starting release monitoring");
    check_releases().await;
    tracing::info!("monitoring completed");
}

async fn check_releases() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("{error}; set it in the .env file");
            return;
        }
    };

    let project_list = parse_project_list(&config.projects_raw);
    for item in &project_list.skipped {
        tracing::warn!("invalid project configuration: {item}");
    }

    let client = match build_http_client(HTTP_TIMEOUT) {
        Ok(client) => client,
        Err(error) => {
            tracing::error!("failed to build http client: {error}");
            return;
        }
    };
    let store = FileSeenStore::new(&config.seen_releases_path);
    let notifier = LarkNotifier::new(client.clone(), config.webhook_url.clone());
    let mut scanner = ReleaseScanner::new(client, store, notifier);

    match scanner.run(&project_list.projects).await {
        Ok(summary) => {
            tracing::info!(
                notified = summary.notified,
                notify_failures = summary.notify_failures,
                quiet = summary.quiet,
                without_timestamps = summary.without_timestamps,
                skipped_malformed = summary.skipped_malformed,
                failed = summary.failed,
                "scan finished"
            );
        }
        Err(error) => {
            tracing::error!("failed to load seen releases: {error}");
        }
    }
}

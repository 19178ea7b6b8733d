// ScaleUp Hub entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Ensure config files exist, then load config
// 3. Build the API client from config
// 4. Create mpsc channels
// 5. Spawn app logic task
// 6. Run the TUI event loop until the user quits
// 7. Cleanup on exit

use scaleup_hub::api;
use scaleup_hub::app;
use scaleup_hub::config;
use scaleup_hub::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("ScaleUp Hub starting up");

    // 2. Load config (copies defaults into config/ on first run)
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: base_url={}, {} research categories",
        config.api.base_url,
        config.research.categories.len()
    );

    // 3. Build the API client
    let client = api::ApiClient::from_config(&config);
    if client.is_configured() {
        info!("API client initialized (credentials configured)");
    } else {
        info!("API client disabled (credentials missing); remote calls will be logged as errors");
    }

    // 4. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);
    let (events_tx, event_rx) = mpsc::channel(64);

    let app_state = app::AppState::new(config.clone(), client, events_tx);

    // 5. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, event_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. Run the TUI event loop (blocking until user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx, config.ui.clone()).await {
        error!("TUI error: {}", e);
    }

    // 7. Cleanup: wait for the app task to drain (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("ScaleUp Hub shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("scaleup.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scaleup_hub=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

use anyhow::{Context, Result};
use dotenvy::dotenv;
use url::Url;

use tubedeck::api::{ApiClient, FormatSelection};
use tubedeck::channel::StatusChannel;
use tubedeck::cli::{Cli, Commands};
use tubedeck::config;
use tubedeck::core::init_logger;
use tubedeck::render::ConsoleView;
use tubedeck::session::{FollowUp, Session, UiState, View};

/// Main entry point for the client
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, server URL parsing).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present (before config reads)
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    let base_str = cli
        .server
        .clone()
        .unwrap_or_else(|| config::SERVER_URL.clone());
    let base = Url::parse(&base_str)
        .with_context(|| format!("Invalid server URL: {}", base_str))?;
    let api = ApiClient::new(base.clone())?;

    match cli.command {
        Commands::Info { url } => run_info(api, base, &url).await,
        Commands::Download { url, quality, audio, audio_quality, no_preview } => {
            let selection = FormatSelection {
                audio_only: audio,
                quality,
                audio_quality,
            };
            run_download(api, base, &url, selection, no_preview).await
        }
        Commands::History { limit } => run_history(api, base, limit).await,
        Commands::Watch => run_watch(api, base).await,
    }
}

/// `tubedeck info <URL>` — metadata preview only.
async fn run_info(api: ApiClient, base: Url, url: &str) -> Result<()> {
    let mut session = Session::new(api, ConsoleView::new(base));
    if session.fetch_video_info(url).await.is_err() {
        // The session already rendered the error view.
        std::process::exit(1);
    }
    Ok(())
}

/// `tubedeck download <URL>` — preview (unless skipped), start, then follow
/// the live channel until a terminal event, and reload history on success.
async fn run_download(
    api: ApiClient,
    base: Url,
    url: &str,
    selection: FormatSelection,
    no_preview: bool,
) -> Result<()> {
    let mut session = Session::new(api.clone(), ConsoleView::new(base));

    // Open the channel before asking the backend to start, so the earliest
    // progress events are not missed.
    let mut channel = StatusChannel::connect(api.ws_url()?, config::channel::reconnect_delay());

    if !no_preview {
        if let Err(e) = session.fetch_video_info(url).await {
            if e.is_validation() {
                std::process::exit(1);
            }
            // A failed preview does not block the download: the protocol
            // allows starting without a prior successful info fetch.
            log::warn!("Preview failed, starting download anyway: {}", e);
        }
    }

    if session.start_download(url, selection).await.is_err() {
        channel.shutdown().await;
        std::process::exit(1);
    }

    let mut failed = false;
    loop {
        tokio::select! {
            maybe_event = channel.next_event() => match maybe_event {
                Some(event) => {
                    if session.apply_event(event) == Some(FollowUp::ReloadHistory) {
                        session.load_history().await;
                    }
                    match session.state() {
                        UiState::Completed => break,
                        UiState::Error => {
                            failed = true;
                            break;
                        }
                        _ => {}
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                // The backend runs the download to completion regardless;
                // there is no cancellation in the protocol.
                log::info!("Interrupted; download continues on the server");
                break;
            }
        }
    }

    channel.shutdown().await;
    if failed {
        std::process::exit(1);
    }
    Ok(())
}

/// `tubedeck history` — one-shot history listing.
async fn run_history(api: ApiClient, base: Url, limit: Option<usize>) -> Result<()> {
    let mut view = ConsoleView::new(base);
    match api.history().await {
        Ok(mut entries) => {
            entries.truncate(limit.unwrap_or(config::history::DEFAULT_LIMIT));
            view.show_history(&entries);
            Ok(())
        }
        Err(e) => {
            view.show_error(&e.user_message());
            std::process::exit(1);
        }
    }
}

/// `tubedeck watch` — passively render whatever the server broadcasts until
/// interrupted. Terminal events reset the session back to idle so the next
/// download renders cleanly.
async fn run_watch(api: ApiClient, base: Url) -> Result<()> {
    let mut session = Session::new(api.clone(), ConsoleView::new(base));
    let mut channel = StatusChannel::connect(api.ws_url()?, config::channel::reconnect_delay());

    println!("👀 サーバーの状態を監視中... (Ctrl+C で終了)");

    loop {
        tokio::select! {
            maybe_event = channel.next_event() => match maybe_event {
                Some(event) => {
                    if session.apply_event(event) == Some(FollowUp::ReloadHistory) {
                        session.load_history().await;
                    }
                    if matches!(session.state(), UiState::Completed | UiState::Error) {
                        session.reset();
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    channel.shutdown().await;
    Ok(())
}

pub mod models;
pub mod services;
pub mod api;

use api::{BackgroundService, ContentAnalyzer, Response, ServiceError, ServiceHandle, ServiceRouter};
use models::ServiceEvent;
use services::{DetectionRepository, EventNotifier, FileDocument, JsonFileStore, StoreError};

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

static PROCESS_START: OnceLock<Instant> = OnceLock::new();
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_PREFIX: &str = "ai-detector_";
const LOG_FILES_KEPT: usize = 30;
const RELAY_CAPACITY: usize = 32;
const EVENT_CAPACITY: usize = 64;

fn startup_elapsed_ms() -> u128 {
    PROCESS_START
        .get()
        .map(|t| t.elapsed().as_millis())
        .unwrap_or(0)
}

/// Process-level settings read from the environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeConfig {
    pub log_dir: Option<PathBuf>,
    pub disable_file_log: bool,
    pub disable_log_cleanup: bool,
    pub data_dir: Option<PathBuf>,
    /// Document analyzed by a bare `analyzePage`
    pub document: Option<PathBuf>,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| matches!(lookup(key).as_deref(), Some("1") | Some("true") | Some("TRUE"));
        let path = |key: &str| {
            lookup(key)
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
        };

        Self {
            log_dir: path("AIDETECT_LOG_DIR"),
            disable_file_log: flag("AIDETECT_DISABLE_FILE_LOG"),
            disable_log_cleanup: flag("AIDETECT_DISABLE_LOG_CLEANUP"),
            data_dir: path("AIDETECT_DATA_DIR"),
            document: path("AIDETECT_DOCUMENT"),
        }
    }
}

/// Initialize logging system with timestamped log files
pub fn init_logging(config: &RuntimeConfig) {
    // Configure subscriber filter as early as possible (so fallback logging is consistent).
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.disable_file_log {
        init_console_only_logging(env_filter);
        info!("File logging disabled via AIDETECT_DISABLE_FILE_LOG");
        return;
    }

    let logs_dir = config.log_dir.clone().unwrap_or_else(get_logs_dir);

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Failed to create logs directory: {}", e);
        init_console_only_logging(env_filter);
        info!("Falling back to console-only logging (log dir not writable)");
        return;
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("{}{}.log", LOG_FILE_PREFIX, timestamp);

    // One file per session; writes stay non-blocking.
    let file_appender = rolling::never(&logs_dir, &log_filename);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(file_guard);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    // stdout carries protocol lines, so the console layer writes to stderr
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions))
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    info!("=== AI Content Detector Started ===");
    info!("Log file: {}/{}", logs_dir.display(), log_filename);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if !config.disable_log_cleanup {
        std::thread::spawn(move || {
            cleanup_old_logs(&logs_dir, LOG_FILES_KEPT);
        });
    }
}

/// Get the logs directory path
fn get_logs_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("logs")
    }

    #[cfg(not(debug_assertions))]
    {
        if let Some(data_dir) = dirs::data_local_dir() {
            return data_dir.join("ai-detector").join("logs");
        }
        PathBuf::from("logs")
    }
}

fn cleanup_old_logs(logs_dir: &Path, keep: usize) {
    let mut entries: Vec<_> = match fs::read_dir(logs_dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
        Err(_) => return,
    };

    entries.retain(|e| {
        let name = e.file_name().to_string_lossy().to_string();
        name.starts_with(LOG_FILE_PREFIX) && name.ends_with(".log")
    });

    if entries.len() <= keep {
        return;
    }

    entries.sort_by_key(|e| {
        e.metadata()
            .and_then(|m| m.modified())
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
    });

    let remove_count = entries.len().saturating_sub(keep);
    for entry in entries.into_iter().take(remove_count) {
        let _ = fs::remove_file(entry.path());
    }
}

fn init_console_only_logging(env_filter: EnvFilter) {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions))
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

fn encode_line<T: serde::Serialize>(value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(line) => Some(line),
        Err(e) => {
            warn!(error = %e, "transport.encode_failed");
            None
        }
    }
}

/// Answer one protocol line; undecodable input becomes a failed response.
async fn handle_line(raw: &[u8], handle: &ServiceHandle) -> Option<Response> {
    let line = match std::str::from_utf8(raw) {
        Ok(line) => line.trim(),
        Err(e) => {
            warn!(error = %e, "transport.invalid_utf8");
            return Some(Response::from(ServiceError::InvalidRequest(e.to_string())));
        }
    };
    if line.is_empty() {
        return None;
    }
    Some(match serde_json::from_str(line) {
        Ok(value) => handle.request_value(value).await,
        Err(e) => Response::from(ServiceError::InvalidRequest(e.to_string())),
    })
}

/// Read newline-delimited requests until EOF, queueing one response per line.
async fn serve_lines<R>(mut reader: R, handle: &ServiceHandle, out: &mpsc::Sender<String>)
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "transport.read_failed");
                break;
            }
        }

        let Some(response) = handle_line(&buf, handle).await else {
            continue;
        };
        if let Some(encoded) = encode_line(&response) {
            if out.send(encoded).await.is_err() {
                warn!("transport.output_closed");
                break;
            }
        }
    }
}

/// Serve the request protocol as JSON lines on stdin/stdout until stdin closes.
pub async fn run() -> anyhow::Result<()> {
    PROCESS_START.get_or_init(Instant::now);

    let config = RuntimeConfig::from_env();
    let logging_t0 = Instant::now();
    init_logging(&config);
    info!(
        startup_ms = startup_elapsed_ms(),
        logging_ms = logging_t0.elapsed().as_millis(),
        "logging.initialized"
    );

    let storage_dir = match config.data_dir.clone() {
        Some(dir) => dir,
        None => JsonFileStore::default_storage_dir().ok_or(StoreError::NoStorageDir)?,
    };
    let store = JsonFileStore::new(storage_dir);
    info!(path = %store.storage_file().display(), "store.opened");

    let repo = DetectionRepository::new(Arc::new(store));
    let (events, _) = broadcast::channel::<ServiceEvent>(EVENT_CAPACITY);
    let background = BackgroundService::new(
        repo,
        Arc::new(EventNotifier::new(events.clone())),
        events.clone(),
    );
    background
        .initialize()
        .await
        .context("failed to initialize storage")?;
    let mut event_rx = background.subscribe();

    let content = match &config.document {
        Some(path) => {
            info!(path = %path.display(), "document.attached");
            ContentAnalyzer::with_source(Arc::new(FileDocument::new(path.clone())))
        }
        None => ContentAnalyzer::new(),
    };

    let (handle, router_task) = ServiceRouter::new(background, content).spawn(RELAY_CAPACITY);
    drop(events);

    // Single writer keeps responses and events from interleaving mid-line
    let (out_tx, mut out_rx) = mpsc::channel::<String>(RELAY_CAPACITY);
    let writer_task = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = out_rx.recv().await {
            if stdout.write_all(line.as_bytes()).await.is_err()
                || stdout.write_all(b"\n").await.is_err()
                || stdout.flush().await.is_err()
            {
                warn!("transport.stdout_closed");
                break;
            }
        }
    });

    let event_tx = out_tx.clone();
    let event_task = tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    if let Some(line) = encode_line(&event) {
                        if event_tx.send(line).await.is_err() {
                            break;
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "transport.events_lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    info!(startup_ms = startup_elapsed_ms(), "transport.ready");

    serve_lines(BufReader::new(tokio::io::stdin()), &handle, &out_tx).await;

    drop(handle);
    router_task.await.context("router task failed")?;
    event_task.await.context("event task failed")?;
    drop(out_tx);
    writer_task.await.context("writer task failed")?;

    info!("=== AI Content Detector Exited ===");
    Ok(())
}

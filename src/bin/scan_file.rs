use ai_detector_lib::api::{BackgroundService, ContentAnalyzer, DashboardController, ScanTarget, ServiceRouter};
use ai_detector_lib::models::{Alert, DetectionResult, TextSample};
use ai_detector_lib::services::{
    analyze_sample, extract_text_content, DetectionRepository, DocumentSource, FileDocument,
    LogNotifier, MemoryStore, ScanReport, SystemClock,
};
use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  cargo run --bin scan_file -- <path.(txt|md|docx|pdf)> [--preview <n>] [--quiet] [--verify] [--export <dir>] [--out <json_path>]\n\nNotes:\n  - State is kept in memory; nothing is written to the detector store.\n  - `--verify` records a mocked verification of the scanned content.\n  - `--export` writes the dashboard log export (ai-detector-logs-<millis>.json) into <dir>.\n  - `--out` writes the detection record, alerts and indicator contributions as JSON."
        );
        return Ok(());
    }

    let path = args[1].clone();
    let preview_n: usize = parse_arg_value(&args, "--preview")
        .and_then(|s| s.parse().ok())
        .unwrap_or(200);
    let quiet = has_flag(&args, "--quiet");
    let out_path = parse_arg_value(&args, "--out");
    let export_dir = parse_arg_value(&args, "--export");
    let verify = has_flag(&args, "--verify");

    if !quiet {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }

    let elements = FileDocument::new(&path)
        .visible_elements()
        .await
        .with_context(|| format!("failed to read {}", path))?;
    let text = extract_text_content(&elements);
    let report = analyze_sample(&TextSample::new(text.as_str()));

    // Same request flow a dashboard uses, against an in-memory store
    let repo = DetectionRepository::new(Arc::new(MemoryStore::new()));
    let (events, _) = broadcast::channel(8);
    let background = BackgroundService::new(repo.clone(), Arc::new(LogNotifier), events);
    background.initialize().await?;
    let (handle, _router) = ServiceRouter::new(background, ContentAnalyzer::new()).spawn(8);
    let dashboard = DashboardController::new(handle, repo, Arc::new(SystemClock));
    let outcome = dashboard.scan(ScanTarget::Text(text.clone())).await?;
    let detection = &outcome.detection;

    println!("File: {}", path);
    println!("Elements: {} visible", elements.len());
    println!("Extracted: {} chars", text.chars().count());
    println!("Preview: {}", preview(&text, preview_n));
    println!();
    println!("Words analyzed: {}", detection.words_analyzed);
    println!(
        "AI content: {}%  Human content: {}%",
        detection.ai_content_percent, detection.human_content_percent
    );
    println!("Confidence: {}", detection.confidence.as_str());
    println!(
        "Risk: {} (score {})",
        detection.risk_level.as_str(),
        detection.risk_score
    );
    println!();

    println!("Indicators (composite {:.3}):", report.score);
    for r in &report.indicators {
        println!(
            "  {:<22} {:.3} / {:.2}",
            r.name.as_str(),
            r.contribution,
            r.name.max_contribution()
        );
    }
    println!();

    if verify {
        dashboard.verify().await?;
    }

    let snapshot = dashboard.snapshot().await?;
    println!(
        "Dashboard: {} risk, last scan {}",
        snapshot.risk_label,
        snapshot.last_scan_label.as_deref().unwrap_or("never")
    );
    for alert in &snapshot.alerts {
        println!(
            "[{}] {}: {}",
            alert.alert_type.as_str(),
            alert.title,
            alert.message
        );
    }
    println!(
        "Verification: {} {} {}",
        snapshot.blockchain.status, snapshot.blockchain.hash, snapshot.blockchain.timestamp
    );

    if let Some(dir) = export_dir {
        let file = dashboard.export_to_dir(std::path::Path::new(&dir)).await?;
        println!("Exported logs: {}", file.display());
    }

    if let Some(out_path) = out_path {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Output<'a> {
            file: &'a str,
            extracted_chars: usize,
            detection: &'a DetectionResult,
            alerts: &'a [Alert],
            report: &'a ScanReport,
        }

        let out = Output {
            file: &path,
            extracted_chars: text.chars().count(),
            detection,
            alerts: &outcome.alerts,
            report: &report,
        };

        let json = serde_json::to_string_pretty(&out)?;
        std::fs::write(&out_path, json).with_context(|| format!("write out failed: {}", out_path))?;
        println!();
        println!("Wrote JSON: {}", out_path);
    }

    Ok(())
}

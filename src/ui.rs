use colored::*;

use crate::pipeline::types::WorkflowInfo;
use crate::sanitize;

/// Environment variable that enables machine-readable JSON events when set to "1" or "true".
const MACHINE_LOG_ENV: &str = "ASKRS_MACHINE_LOG";

pub fn init_logging() {
    // Internal logs are opt-in via RUST_LOG. Console output stays separate.
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var("RUST_LOG").is_err() {
        builder.filter_level(log::LevelFilter::Warn);
    }
    let _ = builder.try_init();
}

fn machine_log_enabled() -> bool {
    matches!(
        std::env::var(MACHINE_LOG_ENV)
            .ok()
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref(),
        Some("1") | Some("true")
    )
}

fn emit_machine_event(kind: &str, data: serde_json::Value) {
    if !machine_log_enabled() {
        return;
    }

    let event = serde_json::json!({
        "kind": kind,
        "data": data,
    });

    if let Ok(line) = serde_json::to_string(&event) {
        eprintln!("{line}");
    }
}

pub fn header(info: &WorkflowInfo) {
    let p = sanitize::sanitize_preview_for_console(&info.provider);
    let m = sanitize::sanitize_preview_for_console(&info.model);

    println!(
        "{} {} | {}",
        ">>".bold(),
        "askrs".bold(),
        format!("{p}/{m}").cyan()
    );
    emit_machine_event(
        "header",
        serde_json::json!({
            "provider": info.provider,
            "model": info.model,
        }),
    );
}

pub fn workflow_status(info: &WorkflowInfo) {
    kv_preview("nodes", &info.nodes.join(" -> "));
    kv_preview("entry_point", info.entry_point);
    kv_preview("provider", &format!("{}/{}", info.provider, info.model));
    kv_preview("search", &info.backend);
    kv_preview("status", info.status);
}

pub fn answer(text: &str) {
    let safe = sanitize::sanitize_preview_for_console(text);
    println!("\n{} {}", "●".blue().bold(), safe.blue());
    emit_machine_event("answer", serde_json::json!({ "text": text }));
}

pub fn query_used(query: &str) {
    let safe = sanitize::sanitize_preview_for_console(query);
    println!("  {} {}", "└─".dimmed(), format!("query: {safe}").dimmed());
    emit_machine_event("query_used", serde_json::json!({ "query": query }));
}

pub fn turn_error(msg: &str) {
    let safe = sanitize::sanitize_preview_for_console(msg);
    eprintln!("\n{} {}", "✗".red().bold(), safe.red());
    emit_machine_event("turn_error", serde_json::json!({ "error": msg }));
}

pub fn kv_preview(key: &str, value_preview: &str) {
    let k = sanitize::sanitize_preview_for_console(key);
    let v = sanitize::sanitize_preview_for_console(value_preview);
    println!("  {} {}", k.cyan(), v.dimmed());
}

pub fn goodbye() {
    println!("\n{}", "Goodbye!".dimmed());
    emit_machine_event("goodbye", serde_json::json!({}));
}

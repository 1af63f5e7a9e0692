//! Reading and writing graph files.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;
use weave_canvas::prelude::*;

use crate::config::CliConfig;

/// A store loaded from disk, with the diagnostics the load produced.
pub struct Loaded {
    pub store: Store,
    pub report: BatchReport,
    pub diagnostics: Arc<MemoryLogger>,
}

/// Read a graph file. Accepts a graph object or a bare item array.
pub fn read_graph(path: &Path) -> Result<GraphToken> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))?;
    let graph = match value {
        Value::Array(items) => GraphToken {
            items,
            ..GraphToken::default()
        },
        other => serde_json::from_value(other)
            .with_context(|| format!("{} is not a graph file", path.display()))?,
    };
    Ok(graph)
}

pub fn load(path: &Path, config: &CliConfig) -> Result<Loaded> {
    let graph = read_graph(path)?;
    let diagnostics = Arc::new(MemoryLogger::new());
    let mut store = Store::new()
        .with_config(config.canvas.clone())
        .with_logger(diagnostics.clone());
    let report = store
        .load_graph_token(&graph)
        .with_context(|| format!("failed to load graph properties from {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        items = report.items.len(),
        failures = report.failures.len(),
        "graph loaded"
    );
    Ok(Loaded {
        store,
        report,
        diagnostics,
    })
}

/// Write pretty JSON to `output`, or stdout when `None`.
pub fn write_json(value: &impl serde::Serialize, output: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to encode JSON")?;
    match output {
        Some(path) => std::fs::write(path, text + "\n")
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

/// Print load failures and diagnostics to stderr.
pub fn report_problems(loaded: &Loaded) {
    for failure in &loaded.report.failures {
        match failure.id {
            Some(id) => eprintln!("error: item {id}: {}", failure.error),
            None => eprintln!("error: item without id: {}", failure.error),
        }
    }
    for diagnostic in loaded.diagnostics.entries() {
        eprintln!("{}: {}", diagnostic.severity, diagnostic.text);
    }
}

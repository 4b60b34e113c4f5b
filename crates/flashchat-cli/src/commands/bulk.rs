//! Bulk sends from a JSON job file.

use crate::error::AppResult;
use flashchat_client::{BulkJob, BulkOutcome, BulkRecord, BulkRunner, BulkSummary, DispatchClient};
use serde::Deserialize;
use std::path::Path;

/// Job file layout: `{"job": {...}, "records": [...]}`.
#[derive(Debug, Deserialize)]
pub struct BulkFile {
    pub job: BulkJob,
    pub records: Vec<BulkRecord>,
}

impl BulkFile {
    pub fn parse(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub async fn run(client: DispatchClient, file: &Path) -> AppResult<String> {
    let contents = tokio::fs::read_to_string(file).await?;
    let bulk = BulkFile::parse(&contents)?;

    let runner = BulkRunner::new(client);
    let outcomes = runner.run(&bulk.job, &bulk.records).await;
    Ok(render(&outcomes))
}

pub fn render(outcomes: &[BulkOutcome]) -> String {
    let mut lines: Vec<String> = outcomes
        .iter()
        .map(|o| match &o.outcome {
            Ok(result) if result.success => format!("{}: sent", o.record_id),
            Ok(result) => format!("{}: failed ({})", o.record_id, result.error()),
            Err(e) => format!("{}: skipped ({})", o.record_id, e.kind()),
        })
        .collect();

    let summary = BulkSummary::from_outcomes(outcomes);
    lines.push(format!(
        "{} sent, {} failed, {} skipped",
        summary.sent, summary.failed, summary.invalid
    ));
    lines.join("\n")
}

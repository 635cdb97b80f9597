use strum::IntoEnumIterator;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::domain::MarkerType;
use crate::engine::PipelineResult;
use crate::utils::{format_duration, span_secs};

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Trajectory")]
    pub label: String,
    #[tabled(rename = "Fixes")]
    pub fixes: String,
    #[tabled(rename = "Kept")]
    pub kept: String,
    #[tabled(rename = "Duration")]
    pub duration: String,
    #[tabled(rename = "Stops")]
    pub stops: String,
    #[tabled(rename = "Left")]
    pub left_turns: String,
    #[tabled(rename = "Right")]
    pub right_turns: String,
    #[tabled(rename = "U-Turns")]
    pub u_turns: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

/// One row per input trajectory, in input order. Marker counts are local, before reconciliation.
pub fn summary_rows(result: &PipelineResult) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = result
        .reports
        .iter()
        .zip(&result.trajectories)
        .map(|(report, trajectory)| {
            let first = trajectory.positions.first().map(|p| p.timestamp);
            let last = trajectory.positions.last().map(|p| p.timestamp);
            SummaryRow {
                index: report.index,
                label: report.label.clone(),
                fixes: report.sanitize.input_len.to_string(),
                kept: report.sanitize.output_len.to_string(),
                duration: format_duration(span_secs(first, last)),
                stops: report.stops.to_string(),
                left_turns: report.left_turns.to_string(),
                right_turns: report.right_turns.to_string(),
                u_turns: report.u_turns.to_string(),
                status: "ok".to_string(),
            }
        })
        .collect();

    let dash = || "-".to_string();
    rows.extend(result.failures.iter().map(|failure| SummaryRow {
        index: failure.index,
        label: failure.label.clone(),
        fixes: dash(),
        kept: dash(),
        duration: dash(),
        stops: dash(),
        left_turns: dash(),
        right_turns: dash(),
        u_turns: dash(),
        status: format!("failed: {}", failure.reason),
    }));

    rows.sort_by_key(|row| row.index);
    rows
}

/// Per-trajectory table followed by the reconciled marker totals.
pub fn render_summary(result: &PipelineResult) -> String {
    let mut table = Table::new(summary_rows(result));
    table.with(Style::rounded());

    let totals = MarkerType::iter()
        .map(|t| format!("{}: {}", t, result.markers.count(t)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{}\nReconciled markers ({} total): {}",
        table,
        result.markers.total(),
        totals
    )
}

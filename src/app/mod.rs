mod report;
mod runner;

pub use report::{SummaryRow, render_summary, summary_rows};
pub use runner::run;

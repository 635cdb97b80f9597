use std::io::Write;

use anyhow::{Context, Result};

use crate::engine::PipelineResult;

/// Pretty-printed JSON of the full result, failures and per-trajectory reports included.
pub fn write_json<W: Write>(mut writer: W, result: &PipelineResult) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, result).context("serializing result to JSON")?;
    writeln!(writer).context("writing JSON")?;
    writer.flush().context("flushing JSON")?;
    Ok(())
}

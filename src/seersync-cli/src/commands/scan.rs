//! Scan command - list the named segments of a container

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use seersync::{output_name, extract::ZLIB_MAGIC};

#[derive(Serialize)]
struct SegmentRow {
    symbol: String,
    size: usize,
    packed: bool,
    output: String,
}

pub fn run(input: &Path, json: bool) -> Result<()> {
    let data = std::fs::read(input)
        .with_context(|| format!("cannot read {}", input.display()))?;
    let body = seersync_swf::decompress(&data).context("corrupt container")?;
    let segments = seersync_swf::extract_segments(&body);

    let rows: Vec<SegmentRow> = segments
        .iter()
        .map(|segment| SegmentRow {
            symbol: segment.symbol.clone(),
            size: segment.bytes.len(),
            packed: segment.bytes.starts_with(&ZLIB_MAGIC),
            output: output_name(&segment.symbol),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{:<52} {:>10} {:>7}  {}", "Symbol", "Bytes", "Packed", "Output");
    println!("{}", "-".repeat(100));
    for row in &rows {
        println!(
            "{:<52} {:>10} {:>7}  {}",
            row.symbol,
            row.size,
            if row.packed { "yes" } else { "no" },
            row.output
        );
    }
    println!("{}", "-".repeat(100));
    println!("{} segments", rows.len());

    Ok(())
}

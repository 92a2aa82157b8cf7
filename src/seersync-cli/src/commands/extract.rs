//! Extract command - container to normalized XML tree

use std::path::Path;

use anyhow::{Context, Result};

use seersync::{extract_container, output_name, write_outputs, OutputFile, Registry};

pub fn run(input: &Path, output: &Path, raw: bool) -> Result<()> {
    let data = std::fs::read(input)
        .with_context(|| format!("cannot read {}", input.display()))?;

    let files = if raw {
        raw_segments(&data)?
    } else {
        extract_container(&data, &Registry::default()).context("extraction failed")?
    };

    write_outputs(&files, output)
        .with_context(|| format!("cannot write to {}", output.display()))?;

    println!("Extracted {} files to {}", files.len(), output.display());
    Ok(())
}

/// Undecoded segment bytes, still under their derived filenames
fn raw_segments(data: &[u8]) -> Result<Vec<OutputFile>> {
    let body = seersync_swf::decompress(data).context("corrupt container")?;
    Ok(seersync_swf::extract_segments(&body)
        .into_iter()
        .map(|segment| OutputFile {
            name: output_name(&segment.symbol),
            bytes: segment.bytes,
        })
        .collect())
}

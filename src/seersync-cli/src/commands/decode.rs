//! Decode command - single object-stream payload to XML or JSON

use std::path::Path;

use anyhow::{Context, Result};

use seersync::{decode_segment, normalize_segment, Registry};

pub fn run(input: &Path, symbol: Option<&str>, json: bool) -> Result<()> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("cannot read {}", input.display()))?;

    // The handler registry dispatches on the symbol; without one, the file
    // stem stands in (pass-through for anything unregistered).
    let stem;
    let symbol = match symbol {
        Some(symbol) => symbol,
        None => {
            stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            &stem
        }
    };

    let registry = Registry::default();

    if json {
        let tree = normalize_segment(&bytes, symbol, &registry)
            .with_context(|| format!("cannot decode {}", input.display()))?;
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        let document = decode_segment(&bytes, symbol, &registry)
            .with_context(|| format!("cannot decode {}", input.display()))?;
        println!("{document}");
    }

    Ok(())
}

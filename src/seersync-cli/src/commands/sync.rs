//! Sync command - mirror every platform whose remote version changed
//!
//! Version markers are only written after a successful mirror, so a failed
//! platform is retried on the next run. One failing platform does not stop
//! the others.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use seersync::VersionFile;

use crate::cli::PlatformKind;
use crate::config::Config;
use crate::platform::{Flash, Html5, Platform};

pub fn run(dir: &Path, platforms: &[PlatformKind], force: bool, check: bool) -> Result<()> {
    let config = Config::load()?;
    let agent = ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(60))
        .build();

    let mut selected: Vec<PlatformKind> = Vec::new();
    for kind in platforms {
        if !selected.contains(kind) {
            selected.push(*kind);
        }
    }

    let mut failures = 0;
    for kind in selected {
        let platform: Box<dyn Platform> = match kind {
            PlatformKind::Flash => Box::new(Flash::new(agent.clone(), &config)),
            PlatformKind::Html5 => Box::new(Html5::new(agent.clone(), &config)),
        };

        if let Err(err) = sync_platform(platform.as_ref(), dir, force, check) {
            eprintln!("{}: {err:#}", platform.name());
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{failures} platform(s) failed to sync");
    }
    Ok(())
}

fn sync_platform(platform: &dyn Platform, root: &Path, force: bool, check: bool) -> Result<()> {
    let work_dir = root.join(platform.name());
    let version = VersionFile::new(&work_dir);

    let remote = platform.remote_version().context("version check failed")?;

    if !force && !version.needs_update(&remote)? {
        println!("{}: already at version {remote}", platform.name());
        return Ok(());
    }

    if check {
        let local = version.load()?.unwrap_or_else(|| "none".to_string());
        println!("{}: update available ({local} -> {remote})", platform.name());
        return Ok(());
    }

    println!("{}: mirroring version {remote}...", platform.name());
    let count = platform.fetch(&work_dir)?;

    // Only mark the tree current once everything landed
    version.store(&remote)?;
    println!("{}: wrote {count} files", platform.name());

    Ok(())
}

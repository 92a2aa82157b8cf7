//! Flash platform: one packed container holding every config segment

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use seersync::{extract_container, write_outputs, Registry};

use crate::config::Config;
use crate::platform::Platform;

pub struct Flash {
    agent: ureq::Agent,
    version_url: String,
    container_url: String,
}

impl Flash {
    pub fn new(agent: ureq::Agent, config: &Config) -> Self {
        Self {
            agent,
            version_url: config.flash_version_url.clone(),
            container_url: config.flash_container_url.clone(),
        }
    }
}

impl Platform for Flash {
    fn name(&self) -> &'static str {
        "flash"
    }

    fn remote_version(&self) -> Result<String> {
        let text = self
            .agent
            .get(&self.version_url)
            .call()
            .with_context(|| format!("version check failed: {}", self.version_url))?
            .into_string()?;
        Ok(text.trim().to_string())
    }

    fn fetch(&self, work_dir: &Path) -> Result<usize> {
        let response = self
            .agent
            .get(&self.container_url)
            .call()
            .with_context(|| format!("container download failed: {}", self.container_url))?;

        let mut container = Vec::new();
        response.into_reader().read_to_end(&mut container)?;

        let files = extract_container(&container, &Registry::default())
            .context("container extraction failed")?;
        write_outputs(&files, work_dir)
            .with_context(|| format!("cannot write to {}", work_dir.display()))?;

        Ok(files.len())
    }
}

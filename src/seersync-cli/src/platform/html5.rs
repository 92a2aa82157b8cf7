//! Html5 platform: per-file assets listed by a versioned manifest
//!
//! `version.json` carries a nested `files.resource.config` tree mapping
//! clean filenames to their hashed on-CDN names. Leaves are downloaded
//! individually; the work dir mirrors the tree with clean names.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};

use crate::config::Config;
use crate::download::{download_all, DownloadTask};
use crate::platform::Platform;

pub struct Html5 {
    agent: ureq::Agent,
    base_url: String,
    workers: usize,
    retries: u32,
}

impl Html5 {
    pub fn new(agent: ureq::Agent, config: &Config) -> Self {
        Self {
            agent,
            base_url: config.html5_base_url.trim_end_matches('/').to_string(),
            workers: config.download_workers,
            retries: config.download_retries,
        }
    }

    fn version_json(&self) -> Result<serde_json::Value> {
        // Cache-busting query param; the CDN serves stale manifests otherwise
        let bust = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        let url = format!("{}/version/version.json?t={}", self.base_url, bust);

        Ok(self
            .agent
            .get(&url)
            .call()
            .with_context(|| format!("version manifest download failed: {url}"))?
            .into_json()?)
    }

    /// Walk the config subtree, turning leaves into download tasks
    fn collect_tasks(
        &self,
        tree: &serde_json::Value,
        rel: &mut Vec<String>,
        out: &mut Vec<DownloadTask>,
    ) {
        let Some(entries) = tree.as_object() else {
            return;
        };

        for (key, value) in entries {
            match value {
                serde_json::Value::Object(_) => {
                    rel.push(key.clone());
                    self.collect_tasks(value, rel, out);
                    rel.pop();
                }
                serde_json::Value::String(hashed) => {
                    let mut url = format!("{}/resource/config", self.base_url);
                    for part in rel.iter() {
                        url.push('/');
                        url.push_str(part);
                    }
                    url.push('/');
                    url.push_str(hashed);

                    let mut dest: PathBuf = rel.iter().collect();
                    dest.push(key);
                    out.push(DownloadTask { url, dest });
                }
                other => {
                    tracing::debug!(%key, ?other, "unexpected manifest entry");
                }
            }
        }
    }
}

impl Platform for Html5 {
    fn name(&self) -> &'static str {
        "html5"
    }

    fn remote_version(&self) -> Result<String> {
        let manifest = self.version_json()?;
        match &manifest["version"] {
            serde_json::Value::String(version) => Ok(version.clone()),
            serde_json::Value::Null => Err(anyhow!("manifest has no version field")),
            other => Ok(other.to_string()),
        }
    }

    fn fetch(&self, work_dir: &Path) -> Result<usize> {
        let manifest = self.version_json()?;
        let config_tree = &manifest["files"]["resource"]["config"];
        if config_tree.is_null() {
            return Err(anyhow!("manifest has no files.resource.config tree"));
        }

        let mut tasks = Vec::new();
        self.collect_tasks(config_tree, &mut Vec::new(), &mut tasks);
        let total = tasks.len();

        let report = download_all(&self.agent, tasks, work_dir, self.workers, self.retries);
        if !report.failed.is_empty() {
            return Err(anyhow!(
                "{} of {} downloads failed",
                report.failed.len(),
                total
            ));
        }

        Ok(report.downloaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html5() -> Html5 {
        Html5::new(ureq::AgentBuilder::new().build(), &Config::default())
    }

    #[test]
    fn test_collect_tasks_walks_nested_tree() {
        let manifest: serde_json::Value = serde_json::from_str(
            r#"{
                "items.json": "items_abc123.json",
                "pets": {
                    "pets.json": "pets_def456.json"
                }
            }"#,
        )
        .unwrap();

        let mut tasks = Vec::new();
        html5().collect_tasks(&manifest, &mut Vec::new(), &mut tasks);
        tasks.sort_by(|a, b| a.dest.cmp(&b.dest));

        assert_eq!(tasks.len(), 2);
        assert_eq!(
            tasks[0].url,
            "https://seerh5.61.com/resource/config/items_abc123.json"
        );
        assert_eq!(tasks[0].dest, PathBuf::from("items.json"));
        assert_eq!(
            tasks[1].url,
            "https://seerh5.61.com/resource/config/pets/pets_def456.json"
        );
        assert_eq!(tasks[1].dest, PathBuf::from("pets/pets.json"));
    }

    #[test]
    fn test_collect_tasks_skips_non_string_leaves() {
        let manifest: serde_json::Value =
            serde_json::from_str(r#"{"weird": 42, "ok.json": "ok_1.json"}"#).unwrap();

        let mut tasks = Vec::new();
        html5().collect_tasks(&manifest, &mut Vec::new(), &mut tasks);
        assert_eq!(tasks.len(), 1);
    }
}

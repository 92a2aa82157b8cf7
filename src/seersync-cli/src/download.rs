//! Bounded-concurrency asset downloader
//!
//! A fixed set of worker threads drains a shared task queue. Transport
//! errors retry with doubling backoff; HTTP status errors are final for
//! that file. One failed file never aborts the batch.

use std::collections::VecDeque;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};

/// Initial retry backoff, doubled per attempt
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// One file to fetch
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub url: String,
    /// Destination path relative to the batch output dir
    pub dest: PathBuf,
}

/// Outcome of a batch download
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub downloaded: usize,
    pub failed: Vec<String>,
}

/// Download a batch of tasks into `output_dir` with at most `workers`
/// concurrent requests.
pub fn download_all(
    agent: &ureq::Agent,
    tasks: Vec<DownloadTask>,
    output_dir: &Path,
    workers: usize,
    max_retries: u32,
) -> DownloadReport {
    let queue = Mutex::new(VecDeque::from(tasks));
    let report = Mutex::new(DownloadReport::default());

    std::thread::scope(|scope| {
        for _ in 0..workers.max(1) {
            scope.spawn(|| loop {
                let task = {
                    let Ok(mut queue) = queue.lock() else { break };
                    queue.pop_front()
                };
                let Some(task) = task else { break };

                match fetch_one(agent, &task, output_dir, max_retries) {
                    Ok(()) => {
                        if let Ok(mut report) = report.lock() {
                            report.downloaded += 1;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(url = %task.url, %err, "download failed");
                        if let Ok(mut report) = report.lock() {
                            report.failed.push(task.url.clone());
                        }
                    }
                }
            });
        }
    });

    report.into_inner().unwrap_or_default()
}

fn fetch_one(
    agent: &ureq::Agent,
    task: &DownloadTask,
    output_dir: &Path,
    max_retries: u32,
) -> Result<()> {
    let bytes = fetch_with_retry(agent, &task.url, max_retries)?;

    let dest = output_dir.join(&task.dest);
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&dest, bytes)?;
    Ok(())
}

/// Fetch a URL, retrying transport errors with doubling backoff
pub fn fetch_with_retry(agent: &ureq::Agent, url: &str, max_retries: u32) -> Result<Vec<u8>> {
    let mut backoff = INITIAL_BACKOFF;
    let mut attempt = 0;

    loop {
        match agent.get(url).call() {
            Ok(response) => {
                let mut bytes = Vec::new();
                response.into_reader().read_to_end(&mut bytes)?;
                return Ok(bytes);
            }
            // A definite server answer is not retried
            Err(ureq::Error::Status(code, _)) => {
                return Err(anyhow!("HTTP status {code} for {url}"));
            }
            Err(err) => {
                attempt += 1;
                if attempt > max_retries {
                    return Err(err.into());
                }
                std::thread::sleep(backoff);
                backoff *= 2;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch() {
        let agent = ureq::AgentBuilder::new().build();
        let dir = tempfile::tempdir().unwrap();

        let report = download_all(&agent, Vec::new(), dir.path(), 4, 0);
        assert_eq!(report.downloaded, 0);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_unreachable_host_is_reported_not_fatal() {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(200))
            .build();
        let dir = tempfile::tempdir().unwrap();

        let tasks = vec![DownloadTask {
            url: "http://127.0.0.1:1/never.json".to_string(),
            dest: PathBuf::from("never.json"),
        }];

        let report = download_all(&agent, tasks, dir.path(), 2, 0);
        assert_eq!(report.downloaded, 0);
        assert_eq!(report.failed.len(), 1);
    }
}

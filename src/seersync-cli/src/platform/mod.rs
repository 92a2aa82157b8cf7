//! Distribution platform collaborators
//!
//! Each platform knows how to report its published version and mirror its
//! configuration assets into a work dir. The extraction pipeline itself
//! lives in the `seersync` crate; platforms are transport glue.

mod flash;
mod html5;

pub use flash::Flash;
pub use html5::Html5;

use std::path::Path;

use anyhow::Result;

pub trait Platform {
    /// Platform name, doubling as the work dir name under the mirror root
    fn name(&self) -> &'static str;

    /// Currently published remote version string
    fn remote_version(&self) -> Result<String>;

    /// Mirror all configuration assets into `work_dir`, returning the
    /// number of files written
    fn fetch(&self, work_dir: &Path) -> Result<usize>;
}

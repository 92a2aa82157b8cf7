//! Extraction and transform pipeline for versioned game-configuration
//! assets
//!
//! This library turns a platform's packed configuration container into a
//! set of normalized XML files:
//!
//! 1. Decompress the container (`seersync-swf`)
//! 2. Scan out named binary segments (`seersync-swf`)
//! 3. Decode embedded object streams (`seersync-amf`)
//! 4. Normalize per record kind ([`normalize`])
//! 5. Mark attribute keys ([`annotate`])
//! 6. Serialize ([`xml`])
//!
//! ## Example
//!
//! ```no_run
//! use seersync::{extract_container, write_outputs, Registry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let container = std::fs::read("RobotCoreDLL.swf")?;
//! let files = extract_container(&container, &Registry::default())?;
//! write_outputs(&files, "flash".as_ref())?;
//! # Ok(())
//! # }
//! ```

pub mod annotate;
pub mod extract;
pub mod node;
pub mod normalize;
pub mod version;
pub mod xml;

// Re-export commonly used items
#[doc(inline)]
pub use annotate::{annotate, ATTR_MARKER};
#[doc(inline)]
pub use extract::{
    decode_segment, extract_container, normalize_segment, output_name, write_outputs,
    Error as ExtractError, OutputFile, SegmentError,
};
#[doc(inline)]
pub use node::{Map, Node, CLASS_KEY};
#[doc(inline)]
pub use normalize::{Registry, GOLD_PRODUCT_CLASS, ITEM_CLASS, SKILL_CLASS};
#[doc(inline)]
pub use version::VersionFile;
#[doc(inline)]
pub use xml::{write_document, ROOT_ELEMENT};

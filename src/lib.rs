/*!
 * repodump - Dump a directory or git repository into a single document
 *
 * Walks a directory tree, drops excluded, oversized and binary entries, and
 * serializes what remains as XML or delimited plain text for use as context
 * for Large Language Models.
 */

pub mod config;
pub mod error;
pub mod filter;
pub mod git;
pub mod report;
pub mod scanner;
pub mod session;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use config::{Config, Source, DEFAULT_EXCLUDES, DEFAULT_FILE_SIZE_LIMIT};
pub use error::{DumpError, Result};
pub use filter::{is_excluded, BinaryDetector, ContentFilter, TextHeuristic};
pub use scanner::{ScanStatistics, Scanner};
pub use session::{dump, RunSummary, Session};
pub use types::{DirectoryNode, FileNode, Node};
pub use writer::{render, OutputFormat, TextWriter, XmlWriter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/*!
 * Directory walking and tree construction
 */

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::filter::{is_excluded, BinaryDetector, ContentFilter, Skip};
use crate::types::{DirectoryNode, FileNode, Node};
use crate::utils::{file_name, format_file_size, relative_path};

/// Scanner statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStatistics {
    /// Files whose content made it into the tree
    pub files_included: usize,
    /// Total bytes of included content
    pub bytes_included: u64,
    /// Entries dropped by an exclusion token
    pub excluded: usize,
    /// Files over the size limit
    pub oversized: usize,
    /// Files detected as binary
    pub binary: usize,
    /// Entries that could not be listed, stat'ed or read
    pub failed: usize,
}

/// Walks a directory tree, applying exclusion and content filtering
pub struct Scanner {
    /// Traversal root; every node path is relative to it
    root: PathBuf,
    /// Exclusion tokens
    excludes: BTreeSet<String>,
    /// Size and binary filtering
    filter: ContentFilter,
    /// Absolute path never to include (the output file)
    skip_path: Option<PathBuf>,
    /// Scanner statistics
    statistics: RefCell<ScanStatistics>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(root: impl Into<PathBuf>, excludes: BTreeSet<String>, size_limit: u64) -> Self {
        Self {
            root: root.into(),
            excludes,
            filter: ContentFilter::new(size_limit),
            skip_path: None,
            statistics: RefCell::new(ScanStatistics::default()),
        }
    }

    /// Replace the binary detector used by the content filter
    pub fn with_detector<D: BinaryDetector + 'static>(mut self, detector: D) -> Self {
        self.filter = self.filter.with_detector(detector);
        self
    }

    /// Never include the file at `path`, e.g. the output file of a previous run
    pub fn skip_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.skip_path = Some(path.into());
        self
    }

    /// Get scanner statistics
    pub fn statistics(&self) -> ScanStatistics {
        self.statistics.borrow().clone()
    }

    /// Walk the traversal root
    pub fn scan(&self) -> Vec<Node> {
        info!("Scanning {}", self.root.display());
        self.walk(&self.root)
    }

    /// Walk `dir` and return its children, in listing order
    ///
    /// Every failure below this point is logged and costs only the entry
    /// it happened on.
    pub fn walk(&self, dir: &Path) -> Vec<Node> {
        let mut nodes = Vec::new();

        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false);

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    error!("Failed to list {}: {}", dir.display(), e);
                    self.statistics.borrow_mut().failed += 1;
                    continue;
                }
            };

            if let Some(node) = self.visit(entry.path(), entry.path_is_symlink()) {
                nodes.push(node);
            }
        }

        nodes
    }

    /// Turn a single directory entry into a node, if it survives filtering
    fn visit(&self, path: &Path, is_symlink: bool) -> Option<Node> {
        let rel_path = relative_path(&self.root, path);

        if is_excluded(&rel_path, &self.excludes) {
            info!("Excluding {}", rel_path);
            self.statistics.borrow_mut().excluded += 1;
            return None;
        }

        if self.skip_path.as_deref() == Some(path) {
            debug!("Skipping output file {}", rel_path);
            return None;
        }

        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                error!("Failed to stat {}: {}", rel_path, e);
                self.statistics.borrow_mut().failed += 1;
                return None;
            }
        };

        if metadata.is_dir() {
            if is_symlink {
                warn!("Skipping symlinked directory {}", rel_path);
                return None;
            }

            debug!("Entering {}", rel_path);
            return Some(Node::Directory(DirectoryNode {
                name: file_name(path),
                path: rel_path,
                children: self.walk(path),
            }));
        }

        if !metadata.is_file() {
            debug!("Skipping special file {}", rel_path);
            return None;
        }

        match self.filter.check(path, metadata.len()) {
            Ok(content) => {
                let mut stats = self.statistics.borrow_mut();
                stats.files_included += 1;
                stats.bytes_included += content.len() as u64;
                Some(Node::File(FileNode {
                    name: file_name(path),
                    path: rel_path,
                    content,
                }))
            }
            Err(Skip::TooLarge(size)) => {
                warn!(
                    "Skipping {}: {} exceeds the {} limit",
                    rel_path,
                    format_file_size(size),
                    format_file_size(self.filter.size_limit())
                );
                self.statistics.borrow_mut().oversized += 1;
                None
            }
            Err(Skip::Binary) => {
                warn!("Skipping binary file {}", rel_path);
                self.statistics.borrow_mut().binary += 1;
                None
            }
            Err(Skip::Unreadable(e)) => {
                error!("Failed to read {}: {}", rel_path, e);
                self.statistics.borrow_mut().failed += 1;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::tempdir;

    #[test]
    fn test_empty_directory() -> io::Result<()> {
        let dir = tempdir()?;
        let scanner = Scanner::new(dir.path(), BTreeSet::new(), 1024);

        assert!(scanner.scan().is_empty());
        assert_eq!(scanner.statistics(), ScanStatistics::default());
        Ok(())
    }

    #[test]
    fn test_empty_subdirectory_is_kept() -> io::Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("empty"))?;

        let nodes = Scanner::new(dir.path(), BTreeSet::new(), 1024).scan();
        assert_eq!(
            nodes,
            vec![Node::Directory(DirectoryNode {
                name: "empty".to_string(),
                path: "empty".to_string(),
                children: vec![],
            })]
        );
        Ok(())
    }

    #[test]
    fn test_custom_detector() -> io::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("notes.md"), "# notes")?;

        let scanner =
            Scanner::new(dir.path(), BTreeSet::new(), 1024).with_detector(|_: &[u8]| true);
        assert!(scanner.scan().is_empty());
        assert_eq!(scanner.statistics().binary, 1);
        Ok(())
    }

    #[test]
    fn test_skip_path() -> io::Result<()> {
        let dir = tempdir()?;
        let output = dir.path().join("out.xml");
        fs::write(&output, "<repository/>")?;
        fs::write(dir.path().join("keep.txt"), "keep")?;

        let nodes = Scanner::new(dir.path(), BTreeSet::new(), 1024)
            .skip_path(&output)
            .scan();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name(), "keep.txt");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_not_followed() -> io::Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("sub"))?;
        fs::write(dir.path().join("sub").join("a.txt"), "a")?;
        std::os::unix::fs::symlink("..", dir.path().join("sub").join("up"))?;

        let scanner = Scanner::new(dir.path(), BTreeSet::new(), 1024);
        let nodes = scanner.scan();
        assert_eq!(crate::types::count_files(&nodes), 1);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_followed() -> io::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("real.txt"), "real")?;
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt"))?;

        let nodes = Scanner::new(dir.path(), BTreeSet::new(), 1024).scan();
        assert_eq!(crate::types::count_files(&nodes), 2);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_counts_as_failure() -> io::Result<()> {
        let dir = tempdir()?;
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling"))?;
        fs::write(dir.path().join("ok.txt"), "ok")?;

        let scanner = Scanner::new(dir.path(), BTreeSet::new(), 1024);
        let nodes = scanner.scan();
        assert_eq!(nodes.len(), 1);
        assert_eq!(scanner.statistics().failed, 1);
        Ok(())
    }
}

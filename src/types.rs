/*!
 * Core types and data structures for repodump
 */

/// Represents a directory in the scanned tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    /// Directory name
    pub name: String,
    /// Path relative to the scan root
    pub path: String,
    /// Directory contents, in filesystem listing order
    pub children: Vec<Node>,
}

/// Represents an included text file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    /// File name
    pub name: String,
    /// Path relative to the scan root
    pub path: String,
    /// Full UTF-8 content of the file
    pub content: String,
}

/// A node of the scanned tree
///
/// Only entries that survived exclusion and content filtering ever become
/// nodes; skipped entries leave no trace in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Directory node
    Directory(DirectoryNode),
    /// Text file node
    File(FileNode),
}

impl Node {
    /// Entry name (last path component)
    pub fn name(&self) -> &str {
        match self {
            Node::Directory(dir) => &dir.name,
            Node::File(file) => &file.name,
        }
    }

    /// Path relative to the scan root
    pub fn path(&self) -> &str {
        match self {
            Node::Directory(dir) => &dir.path,
            Node::File(file) => &file.path,
        }
    }
}

/// Number of file nodes in a tree, at any depth
pub fn count_files(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            Node::Directory(dir) => count_files(&dir.children),
            Node::File(_) => 1,
        })
        .sum()
}

/*!
 * Progress reporting for Git operations
 */

use crate::utils::format_file_size;

/// Trait for reporting Git operation progress
pub trait ProgressReporter {
    /// Called with progress information during Git operations
    fn report(&self, progress: &GitProgress);
}

/// Progress information for a clone
#[derive(Debug, Clone, Default)]
pub struct GitProgress {
    /// Total number of objects to download
    pub total_objects: usize,
    /// Number of received objects
    pub received_objects: usize,
    /// Number of indexed objects
    pub indexed_objects: usize,
    /// Number of bytes received
    pub received_bytes: usize,
}

impl GitProgress {
    /// Build from libgit2 transfer statistics
    pub fn from_stats(stats: &git2::Progress<'_>) -> Self {
        Self {
            total_objects: stats.total_objects(),
            received_objects: stats.received_objects(),
            indexed_objects: stats.indexed_objects(),
            received_bytes: stats.received_bytes(),
        }
    }

    /// Get a formatted string of received bytes
    pub fn formatted_bytes(&self) -> String {
        format_file_size(self.received_bytes as u64)
    }
}

// Implement ProgressReporter for closures
impl<F> ProgressReporter for F
where
    F: Fn(&GitProgress),
{
    fn report(&self, progress: &GitProgress) {
        self(progress)
    }
}

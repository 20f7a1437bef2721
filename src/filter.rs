/*!
 * Exclusion matching and content filtering
 */

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// Number of leading bytes inspected by the binary heuristic
const SAMPLE_SIZE: usize = 8192;

/// Returns true if any exclusion token occurs anywhere in `rel_path`.
///
/// Tokens are plain, case-sensitive substrings: `git` matches `.git` as
/// well as `tools/gitignore-helper`.
pub fn is_excluded(rel_path: &str, excludes: &BTreeSet<String>) -> bool {
    excludes
        .iter()
        .any(|token| rel_path.contains(token.as_str()))
}

/// Decides whether a sample of file bytes looks binary
pub trait BinaryDetector {
    /// Returns true if `sample` (the leading bytes of a file) is likely binary
    fn is_binary(&self, sample: &[u8]) -> bool;
}

impl<F> BinaryDetector for F
where
    F: Fn(&[u8]) -> bool,
{
    fn is_binary(&self, sample: &[u8]) -> bool {
        self(sample)
    }
}

/// Default binary heuristic: invalid UTF-8 or any C0 control character
/// other than tab, line feed and carriage return marks a sample as binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextHeuristic;

impl BinaryDetector for TextHeuristic {
    fn is_binary(&self, sample: &[u8]) -> bool {
        if sample.is_empty() {
            return false;
        }

        // A multi-byte character cut off by the sample boundary is fine
        if let Err(e) = std::str::from_utf8(sample) {
            if e.error_len().is_some() {
                return true;
            }
        }

        // XML 1.0 admits no C0 control character besides \t \n \r
        sample.iter().any(|&b| is_forbidden_control(b))
    }
}

fn is_forbidden_control(b: u8) -> bool {
    b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r')
}

/// Why a file's content was left out
#[derive(Debug)]
pub enum Skip {
    /// File is larger than the limit; carries the actual size
    TooLarge(u64),
    /// Content looks binary
    Binary,
    /// Content could not be read or is not valid UTF-8
    Unreadable(io::Error),
}

/// Applies the size limit, binary detection and UTF-8 decoding, in that order
pub struct ContentFilter {
    size_limit: u64,
    detector: Box<dyn BinaryDetector>,
}

impl ContentFilter {
    /// Create a filter using the default binary heuristic
    pub fn new(size_limit: u64) -> Self {
        Self {
            size_limit,
            detector: Box::new(TextHeuristic),
        }
    }

    /// Replace the binary detector
    pub fn with_detector<D: BinaryDetector + 'static>(mut self, detector: D) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Configured size limit in bytes
    pub fn size_limit(&self) -> u64 {
        self.size_limit
    }

    /// Read the content of `path` if it passes every rule
    pub fn check(&self, path: &Path, size: u64) -> Result<String, Skip> {
        if size > self.size_limit {
            return Err(Skip::TooLarge(size));
        }

        let sample = read_sample(path).map_err(Skip::Unreadable)?;
        if self.detector.is_binary(&sample) {
            return Err(Skip::Binary);
        }

        fs::read_to_string(path).map_err(Skip::Unreadable)
    }
}

fn read_sample(path: &Path) -> io::Result<Vec<u8>> {
    let mut sample = Vec::with_capacity(SAMPLE_SIZE);
    File::open(path)?
        .take(SAMPLE_SIZE as u64)
        .read_to_end(&mut sample)?;
    Ok(sample)
}

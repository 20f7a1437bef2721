/*!
 * Run orchestration: acquire the source, walk, serialize, persist
 */

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tracing::info;

use crate::config::{Config, Source};
use crate::error::Result;
use crate::git::{self, ProgressReporter};
use crate::scanner::{ScanStatistics, Scanner};
use crate::writer::{self, OutputFormat};

/// Walk `dir` and serialize the resulting tree, without persisting anything
pub fn dump(
    dir: &Path,
    excludes: &BTreeSet<String>,
    size_limit: u64,
    format: OutputFormat,
) -> Result<String> {
    let scanner = Scanner::new(dir, excludes.clone(), size_limit);
    writer::render(format, &scanner.scan())
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Where the document was written
    pub output_file: PathBuf,
    /// Size of the written document
    pub bytes_written: usize,
    /// Walk statistics
    pub statistics: ScanStatistics,
    /// Time spent walking, serializing and writing
    pub duration: Duration,
}

/// One run over a materialized source directory
///
/// A cloned repository lives in a temporary directory owned by the session
/// and is removed when the session is dropped.
pub struct Session {
    config: Config,
    root: PathBuf,
    _clone_dir: Option<TempDir>,
}

impl Session {
    /// Validate the configuration and materialize the source directory
    pub fn prepare<P: ProgressReporter>(config: Config, progress: Option<&P>) -> Result<Self> {
        config.validate()?;

        let (root, clone_dir) = match &config.source {
            Source::Local(path) => (path.canonicalize()?, None),
            Source::Remote(info) => {
                let clone_dir = tempfile::Builder::new().prefix("repodump-").tempdir()?;
                let root = clone_dir.path().join(&info.name);
                git::clone_repository(info, &root, config.token.as_deref(), progress)?;
                (root, Some(clone_dir))
            }
        };

        Ok(Self {
            config,
            root,
            _clone_dir: clone_dir,
        })
    }

    /// Walk, serialize and write the output file
    pub fn run(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let output_file = self.config.output_path();

        let mut scanner = Scanner::new(
            &self.root,
            self.config.excludes.clone(),
            self.config.file_size_limit,
        );
        if let Some(output) = absolute_output_path(&output_file) {
            scanner = scanner.skip_path(output);
        }

        let nodes = scanner.scan();
        let document = writer::render(self.config.format, &nodes)?;

        fs::write(&output_file, &document)?;
        info!("Wrote {}", output_file.display());

        Ok(RunSummary {
            output_file,
            bytes_written: document.len(),
            statistics: scanner.statistics(),
            duration: start_time.elapsed(),
        })
    }
}

/// Canonical form of a possibly not-yet-existing output file
fn absolute_output_path(output: &Path) -> Option<PathBuf> {
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.canonicalize().ok()?,
        _ => std::env::current_dir().ok()?.canonicalize().ok()?,
    };
    Some(parent.join(output.file_name()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::GitProgress;
    use tempfile::tempdir;

    const NO_PROGRESS: Option<&fn(&GitProgress)> = None;

    #[cfg(unix)]
    #[test]
    fn test_dump_text() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("src"))?;
        fs::write(dir.path().join("src").join("a.txt"), "hello")?;

        let text = dump(dir.path(), &BTreeSet::new(), 1024, OutputFormat::Text)?;
        assert_eq!(text, "--- FILE: src/a.txt ---\nhello\n\n");
        Ok(())
    }

    #[test]
    fn test_prepare_rejects_missing_directory() {
        let dir = tempdir().unwrap();
        let config = Config::new(Source::Local(dir.path().join("missing")));
        assert!(Session::prepare(config, NO_PROGRESS).is_err());
    }

    #[test]
    fn test_run_writes_output_and_skips_it() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.txt"), "alpha")?;

        let mut config = Config::new(Source::Local(dir.path().to_path_buf()));
        config.output_file = Some(dir.path().join("dump.txt"));
        config.format = OutputFormat::Text;

        let session = Session::prepare(config.clone(), NO_PROGRESS)?;
        let first = session.run()?;
        assert_eq!(first.statistics.files_included, 1);
        assert_eq!(
            fs::read_to_string(&first.output_file)?,
            "--- FILE: a.txt ---\nalpha\n\n"
        );

        // The previous output now sits under the root and must not be dumped
        let second = Session::prepare(config, NO_PROGRESS)?.run()?;
        assert_eq!(second.statistics.files_included, 1);
        assert_eq!(second.bytes_written, first.bytes_written);
        Ok(())
    }

    #[test]
    fn test_absolute_output_path() {
        let dir = tempdir().unwrap();
        let path = absolute_output_path(&dir.path().join("out.xml")).unwrap();
        assert_eq!(path, dir.path().canonicalize().unwrap().join("out.xml"));
        assert!(absolute_output_path(Path::new("/no/such/dir/out.xml")).is_none());
    }
}

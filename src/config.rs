/*!
 * Configuration handling for repodump
 */

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_complete::Shell;

use crate::error::Result;
use crate::git::{self, GitRepoInfo, GitResult};
use crate::writer::OutputFormat;
use crate::{bail, ensure};

/// Default maximum size of an included file, in bytes
pub const DEFAULT_FILE_SIZE_LIMIT: u64 = 1_048_576;

/// Exclusion tokens applied unless `--no-default-excludes` is given
///
/// Matching is by substring, so only names unlikely to occur inside an
/// ordinary source path belong here. Generic words such as `build` or
/// `target` would also drop `build.rs` or `target_os.rs`.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    // Dependencies
    "node_modules",
    "bower_components",
    ".venv",
    // Caches
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".gradle",
    ".terraform",
    // Editors and OS clutter
    ".idea",
    ".vscode",
    ".DS_Store",
    // Lock files
    "package-lock.json",
    "yarn.lock",
    "Cargo.lock",
];

/// Verbosity of diagnostic output on stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Option<tracing::Level> {
        match self {
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}

/// Command-line arguments for repodump
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "repodump",
    version = env!("CARGO_PKG_VERSION"),
    about = "Dump a directory or git repository into one XML or text document",
    long_about = "Walks a local directory or a freshly cloned git repository and writes every included text file, with its path, into a single XML or plain-text document suitable as context for Large Language Models."
)]
pub struct Args {
    /// Local directory or Git repository URL to process
    #[clap(default_value = ".")]
    pub source: String,

    /// Output file (defaults to <source-name>.xml or .txt)
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Comma-separated substrings; any path containing one is skipped
    #[clap(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Do not apply the built-in exclusion list
    #[clap(long)]
    pub no_default_excludes: bool,

    /// Skip files larger than this many bytes
    #[clap(long, default_value_t = DEFAULT_FILE_SIZE_LIMIT, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_file_size: u64,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::default())]
    pub format: OutputFormat,

    /// Access token for cloning private repositories
    #[clap(long, env = "REPODUMP_GIT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Diagnostic log level
    #[clap(long, value_enum, default_value_t = LogLevel::default())]
    pub log_level: LogLevel,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Where the tree to dump comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A directory already on disk
    Local(PathBuf),
    /// A repository to clone first
    Remote(GitRepoInfo),
}

impl Source {
    /// Classify a source argument: git URLs are remote, anything else is a path
    ///
    /// An argument written as a URL that does not name a repository is an
    /// error rather than a local path.
    pub fn parse(arg: &str) -> GitResult<Self> {
        if git::looks_like_git_url(arg) {
            return git::parse_git_url(arg).map(Source::Remote);
        }
        Ok(Source::Local(PathBuf::from(arg)))
    }

    /// Short name used for default output files
    pub fn name(&self) -> String {
        match self {
            Source::Remote(info) => info.name.clone(),
            Source::Local(path) => path
                .canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .unwrap_or_else(|| "repodump".to_string()),
        }
    }
}

/// Run configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory or repository to dump
    pub source: Source,

    /// Output file; `None` means `<source-name>.<ext>` in the working directory
    pub output_file: Option<PathBuf>,

    /// Exclusion tokens
    pub excludes: BTreeSet<String>,

    /// Maximum size of an included file, in bytes
    pub file_size_limit: u64,

    /// Output format
    pub format: OutputFormat,

    /// Access token for cloning private repositories
    pub token: Option<String>,
}

impl Config {
    /// Configuration with every default applied
    pub fn new(source: Source) -> Self {
        Self {
            source,
            output_file: None,
            excludes: default_excludes(),
            file_size_limit: DEFAULT_FILE_SIZE_LIMIT,
            format: OutputFormat::default(),
            token: None,
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let mut excludes = if args.no_default_excludes {
            BTreeSet::new()
        } else {
            default_excludes()
        };
        excludes.extend(
            args.exclude
                .into_iter()
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty()),
        );

        Ok(Self {
            source: Source::parse(&args.source)?,
            output_file: args.output,
            excludes,
            file_size_limit: args.max_file_size,
            format: args.format,
            token: args.token.filter(|token| !token.is_empty()),
        })
    }

    /// Output path, resolving the default name when none was given
    pub fn output_path(&self) -> PathBuf {
        self.output_file.clone().unwrap_or_else(|| {
            PathBuf::from(format!("{}.{}", self.source.name(), self.format.extension()))
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.file_size_limit > 0,
            Config,
            "file size limit must be a positive number of bytes"
        );

        if let Source::Local(path) = &self.source {
            if !path.is_dir() {
                bail!(Config, "Source directory not found: {}", path.display());
            }
        }

        let output = self.output_path();
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!(Config, "Output directory not found: {}", parent.display());
            }
        }

        Ok(())
    }
}

/// The built-in exclusion tokens as an owned set
pub fn default_excludes() -> BTreeSet<String> {
    DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
}

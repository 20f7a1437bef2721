/*!
 * Cloning remote repositories
 */

use std::path::Path;

use git2::build::RepoBuilder;
use git2::{Cred, FetchOptions, RemoteCallbacks};
use tracing::{debug, info};

use super::error::{GitError, GitResult};
use super::progress::{GitProgress, ProgressReporter};
use super::url::GitRepoInfo;

/// Builder for cloning a remote repository into a local directory
pub struct CloneBuilder<'a> {
    /// Repository information
    info: &'a GitRepoInfo,
    /// Access token for private repositories
    token: Option<&'a str>,
}

impl<'a> CloneBuilder<'a> {
    /// Create a new clone builder
    pub fn new(info: &'a GitRepoInfo) -> Self {
        Self { info, token: None }
    }

    /// Authenticate with an access token
    pub fn with_token(mut self, token: Option<&'a str>) -> Self {
        self.token = token;
        self
    }

    /// Clone the repository into `dest`, which must be empty or absent
    pub fn clone_into<P: ProgressReporter>(self, dest: &Path, progress: Option<&P>) -> GitResult<()> {
        std::fs::create_dir_all(dest)?;

        let mut callbacks = RemoteCallbacks::new();

        if let Some(token) = self.token {
            debug!("Using token authentication for {}", self.info);
            let mut attempted = false;
            callbacks.credentials(move |_url, username, _allowed| {
                // libgit2 keeps asking after a rejected credential
                if attempted {
                    return Err(git2::Error::from_str("token was rejected by the remote"));
                }
                attempted = true;
                // GitHub and GitLab accept any user name alongside a token
                Cred::userpass_plaintext(username.unwrap_or("git"), token)
            });
        }

        if let Some(reporter) = progress {
            callbacks.transfer_progress(move |stats| {
                reporter.report(&GitProgress::from_stats(&stats));
                true
            });
        }

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        info!("Cloning {} into {}", self.info.url, dest.display());
        RepoBuilder::new()
            .fetch_options(fetch_options)
            .clone(&self.info.url, dest)
            .map_err(GitError::CloneError)?;

        Ok(())
    }
}

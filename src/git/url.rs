/*!
 * Git URL parsing and handling
 */

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::error::{GitError, GitResult};

// Compiled once; the patterns are literals
static HTTP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^/]+/[^/]+/[^/]+?(?:\.git)?/?$").expect("valid regex")
});

static SSH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^git@([^:]+):([^/]+)/([^/]+?)(?:\.git)?$").expect("valid regex")
});

/// Git hosting platform types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHost {
    /// GitHub repository
    GitHub,
    /// GitLab repository
    GitLab,
    /// Bitbucket repository
    Bitbucket,
    /// Other Git hosting
    Other(String),
}

impl GitHost {
    fn from_host(host: &str) -> Self {
        match host.strip_prefix("www.").unwrap_or(host) {
            "github.com" => GitHost::GitHub,
            "gitlab.com" => GitHost::GitLab,
            "bitbucket.org" => GitHost::Bitbucket,
            other => GitHost::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for GitHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitHost::GitHub => write!(f, "GitHub"),
            GitHost::GitLab => write!(f, "GitLab"),
            GitHost::Bitbucket => write!(f, "Bitbucket"),
            GitHost::Other(host) => write!(f, "{}", host),
        }
    }
}

/// Information about a remote Git repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRepoInfo {
    /// Original URL
    pub url: String,
    /// Git hosting platform
    pub host: GitHost,
    /// Repository owner/username
    pub owner: String,
    /// Repository name, without a `.git` suffix
    pub name: String,
}

impl std::fmt::Display for GitRepoInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.owner, self.name)
    }
}

impl FromStr for GitRepoInfo {
    type Err = GitError;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        if HTTP_REGEX.is_match(url) {
            return parse_http(url);
        }

        if let Some(captures) = SSH_REGEX.captures(url) {
            return Ok(GitRepoInfo {
                url: url.to_string(),
                host: GitHost::from_host(&captures[1]),
                owner: captures[2].to_string(),
                name: captures[3].to_string(),
            });
        }

        Err(GitError::InvalidUrl(url.to_string()))
    }
}

fn parse_http(url: &str) -> GitResult<GitRepoInfo> {
    let parsed_url = Url::parse(url).map_err(|e| GitError::InvalidUrl(format!("{}: {}", url, e)))?;

    let host_str = parsed_url
        .host_str()
        .ok_or_else(|| GitError::InvalidUrl(format!("Invalid host in URL: {}", url)))?;

    let mut segments = parsed_url
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|segment| !segment.is_empty());

    let (owner, name) = match (segments.next(), segments.next()) {
        (Some(owner), Some(name)) => (owner, name),
        _ => {
            return Err(GitError::InvalidUrl(format!(
                "Missing owner or repository in URL: {}",
                url
            )))
        }
    };

    Ok(GitRepoInfo {
        url: url.to_string(),
        host: GitHost::from_host(host_str),
        owner: owner.to_string(),
        name: name.strip_suffix(".git").unwrap_or(name).to_string(),
    })
}

/// Check if a source argument is written as a remote URL, well-formed or not
pub fn looks_like_git_url(arg: &str) -> bool {
    ["http://", "https://", "git@"]
        .iter()
        .any(|scheme| arg.starts_with(scheme))
}

/// Parse a Git repository URL into components
pub fn parse_git_url(url: &str) -> GitResult<GitRepoInfo> {
    url.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_urls() {
        for url in [
            "https://github.com/username/repo",
            "https://github.com/username/repo.git",
            "git@github.com:username/repo.git",
            "https://gitlab.com/username/repo",
            "git@gitlab.com:username/repo.git",
            "https://bitbucket.org/username/repo.git",
            "git@bitbucket.org:username/repo.git",
            "https://git.example.com/username/repo",
            "git@git.example.com:username/repo.git",
        ] {
            assert!(looks_like_git_url(url), "{}", url);
            assert!(parse_git_url(url).is_ok(), "{}", url);
        }

        // URL-shaped but incomplete
        for url in ["https://github.com", "https://github.com/username", "git@github.com"] {
            assert!(looks_like_git_url(url), "{}", url);
            assert!(parse_git_url(url).is_err(), "{}", url);
        }

        for path in ["/path/to/local/directory", "username/repo", ".", "github.com/a/b"] {
            assert!(!looks_like_git_url(path), "{}", path);
        }
    }

    #[test]
    fn test_parse_git_url() {
        let repo = parse_git_url("https://github.com/username/repo").unwrap();
        assert_eq!(repo.url, "https://github.com/username/repo");
        assert_eq!(repo.host, GitHost::GitHub);
        assert_eq!(repo.owner, "username");
        assert_eq!(repo.name, "repo");

        let repo = parse_git_url("git@github.com:username/repo.git").unwrap();
        assert_eq!(repo.host, GitHost::GitHub);
        assert_eq!(repo.owner, "username");
        assert_eq!(repo.name, "repo");

        let repo = parse_git_url("https://www.gitlab.com/group/project.git").unwrap();
        assert_eq!(repo.host, GitHost::GitLab);
        assert_eq!(repo.name, "project");

        let repo = parse_git_url("https://git.example.com/team/tool/").unwrap();
        assert_eq!(repo.host, GitHost::Other("git.example.com".to_string()));
        assert_eq!(repo.name, "tool");
    }

    #[test]
    fn test_parse_invalid_url() {
        let err = parse_git_url("not a url").unwrap_err();
        assert!(matches!(err, GitError::InvalidUrl(_)));
    }

    #[test]
    fn test_display() {
        assert_eq!(GitHost::Bitbucket.to_string(), "Bitbucket");
        assert_eq!(
            GitHost::Other("custom.com".to_string()).to_string(),
            "custom.com"
        );

        let info = parse_git_url("https://github.com/username/repo").unwrap();
        assert_eq!(info.to_string(), "GitHub/username/repo");
    }
}

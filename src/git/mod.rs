/*!
 * Remote repository acquisition
 */

mod error;
mod progress;
mod repository;
mod url;

// Re-export public items
pub use self::error::{GitError, GitResult};
pub use self::progress::{GitProgress, ProgressReporter};
pub use self::repository::CloneBuilder;
pub use self::url::{looks_like_git_url, parse_git_url, GitHost, GitRepoInfo};

use std::path::Path;

/// Clone `info` into `dest`, optionally authenticating with `token`
pub fn clone_repository<P: ProgressReporter>(
    info: &GitRepoInfo,
    dest: &Path,
    token: Option<&str>,
    progress: Option<&P>,
) -> GitResult<()> {
    CloneBuilder::new(info)
        .with_token(token)
        .clone_into(dest, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_clone_local_repository() -> GitResult<()> {
        let origin = tempdir()?;
        let repo = git2::Repository::init(origin.path()).map_err(GitError::CloneError)?;
        std::fs::write(origin.path().join("hello.txt"), "hello")?;

        let mut index = repo.index().map_err(GitError::CloneError)?;
        index
            .add_path(Path::new("hello.txt"))
            .map_err(GitError::CloneError)?;
        index.write().map_err(GitError::CloneError)?;
        let tree_id = index.write_tree().map_err(GitError::CloneError)?;
        let tree = repo.find_tree(tree_id).map_err(GitError::CloneError)?;
        let sig = git2::Signature::now("test", "test@example.com").map_err(GitError::CloneError)?;
        repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[])
            .map_err(GitError::CloneError)?;

        let info = GitRepoInfo {
            url: origin.path().to_string_lossy().into_owned(),
            host: GitHost::Other("local".to_string()),
            owner: "test".to_string(),
            name: "origin".to_string(),
        };

        let dest = tempdir()?;
        let target = dest.path().join("clone");
        clone_repository(&info, &target, None, None::<&fn(&GitProgress)>)?;

        assert_eq!(std::fs::read_to_string(target.join("hello.txt"))?, "hello");
        Ok(())
    }

    #[test]
    fn test_clone_failure() {
        let info = GitRepoInfo {
            url: "/definitely/not/a/repository".to_string(),
            host: GitHost::Other("local".to_string()),
            owner: "nobody".to_string(),
            name: "nothing".to_string(),
        };
        let dest = tempdir().unwrap();

        let result = clone_repository(
            &info,
            &dest.path().join("clone"),
            None,
            None::<&fn(&GitProgress)>,
        );
        assert!(matches!(result, Err(GitError::CloneError(_))));
    }
}

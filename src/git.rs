use crate::changeset::{ChangeSet, StagedDiff, StagedEntry};
use crate::error::GitError;
use crate::workflow::Vcs;
use git2::{Delta, DiffFormat, DiffOptions, Repository, RepositoryState, Status, StatusOptions};
use std::path::{Path, PathBuf};
use std::process::Command;

/// an opened working tree, located from somewhere inside it
pub struct GitRepo {
    repo: Repository,
    root: PathBuf,
}

/// which ChangeSet class a status entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeKind {
    Untracked,
    DeletedStaged,
    ModifiedUnstaged,
    Staged,
}

impl GitRepo {
    /// find the enclosing working tree (can be anywhere within the repo)
    pub fn discover(start: &Path) -> Result<Self, GitError> {
        let not_a_repo = || GitError::NotARepository(start.to_path_buf());
        let repo = Repository::discover(start).map_err(|_| not_a_repo())?;
        // bare repositories have nothing to commit from
        let root = repo.workdir().ok_or_else(not_a_repo)?.to_path_buf();
        Ok(Self { repo, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// check the repository is in a state we can commit in
    pub fn sanity_check(&self) -> Result<(), GitError> {
        // check we're not in the middle of a git operation
        if self.repo.state() != RepositoryState::Clean {
            return Err(GitError::RepositoryBusy);
        }

        // check we're not on a detached HEAD
        if self.repo.head_detached().unwrap_or(false) {
            return Err(GitError::DetachedHead);
        }

        Ok(())
    }

    /// add or remove each path in a single index write, rolling back on any failure
    fn update_index(&self, paths: &[String]) -> Result<(), GitError> {
        let mut index = self.repo.index().map_err(GitError::git("failed to get git index"))?;

        // collect all errors before writing index
        let mut errors = Vec::new();
        for path in paths {
            let relative = Path::new(path);
            let result = if self.root.join(relative).symlink_metadata().is_ok() {
                index.add_path(relative)
            } else {
                // gone from the working tree: stage the deletion
                index.remove_path(relative)
            };
            if let Err(e) = result {
                errors.push(format!("{path}: {e}"));
            }
        }

        if !errors.is_empty() {
            // rollback by reloading from disk
            if let Err(e) = index.read(true) {
                crate::warning!("failed to reload index during rollback: {}", e);
            }
            return Err(GitError::Stage(errors));
        }

        index.write().map_err(GitError::git("failed to write git index"))
    }

    fn head_tree(&self) -> Result<Option<git2::Tree<'_>>, GitError> {
        // handle unborn branch (no commits yet) - compare against empty tree
        match self.repo.head() {
            Ok(head) => head
                .peel_to_tree()
                .map(Some)
                .map_err(GitError::git("failed to get HEAD tree")),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => Ok(None),
            Err(e) => Err(GitError::Git {
                action: "failed to get HEAD",
                source: e,
            }),
        }
    }

    /// run the git binary in the repository root with inherited stdio
    fn run_git(&self, command: &'static str, args: &[&str]) -> Result<(), GitError> {
        let status = Command::new("git")
            .arg(command)
            .args(args)
            .current_dir(&self.root)
            .status()
            .map_err(|source| GitError::Spawn { command, source })?;

        if status.success() {
            Ok(())
        } else {
            Err(GitError::CommandFailed { command, status })
        }
    }
}

impl Vcs for GitRepo {
    fn scan(&self) -> Result<ChangeSet, GitError> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .exclude_submodules(true);
        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(GitError::git("failed to read repository status"))?;

        let mut changes = ChangeSet::default();
        for entry in statuses.iter() {
            let Some(path) = entry.path() else {
                crate::warning!("skipping path that is not valid utf-8");
                continue;
            };
            let bucket = match classify(entry.status()) {
                Some(ChangeKind::Untracked) => &mut changes.untracked,
                Some(ChangeKind::DeletedStaged) => &mut changes.deleted_staged,
                Some(ChangeKind::ModifiedUnstaged) => &mut changes.modified_unstaged,
                Some(ChangeKind::Staged) => &mut changes.staged,
                None => continue,
            };
            bucket.push(path.to_string());
        }

        Ok(changes)
    }

    fn stage_untracked(&self, paths: &[String]) -> Result<(), GitError> {
        self.update_index(paths)
    }

    fn stage_paths(&self, paths: &[String]) -> Result<(), GitError> {
        self.update_index(paths)
    }

    fn staged_changes(&self) -> Result<Vec<StagedEntry>, GitError> {
        let tree = self.head_tree()?;
        let diff = self
            .repo
            .diff_tree_to_index(tree.as_ref(), None, None)
            .map_err(GitError::git("failed to create diff"))?;

        let mut entries = Vec::new();
        for delta in diff.deltas() {
            let status = match delta.status() {
                Delta::Deleted => 'D',
                Delta::Modified | Delta::Typechange => 'M',
                Delta::Renamed => 'R',
                Delta::Added | Delta::Copied => 'A',
                _ => continue, // skip ignored, unmodified, etc.
            };
            let file = if delta.status() == Delta::Deleted {
                delta.old_file()
            } else {
                delta.new_file()
            };
            let Some(path) = file.path().and_then(Path::to_str) else {
                crate::warning!("skipping path that is not valid utf-8");
                continue;
            };
            entries.push(StagedEntry::new(status, path));
        }

        Ok(entries)
    }

    fn staged_diff(&self, path: &str) -> Result<StagedDiff, GitError> {
        let tree = self.head_tree()?;
        let mut opts = DiffOptions::new();
        opts.pathspec(path).disable_pathspec_match(true);
        let diff = self
            .repo
            .diff_tree_to_index(tree.as_ref(), None, Some(&mut opts))
            .map_err(GitError::git("failed to create diff"))?;

        let deleted = diff.deltas().any(|d| d.status() == Delta::Deleted);

        // lock files and minified assets only add noise to the prompt
        if should_ignore_diff(path) {
            return Ok(StagedDiff {
                text: format!("(diff omitted for {path})"),
                deleted,
            });
        }

        Ok(StagedDiff {
            text: format_diff(&diff)?,
            deleted,
        })
    }

    /// uses the git binary rather than git2 to ensure commit signing (gpg/ssh)
    /// and git hooks (pre-commit, commit-msg, etc.) work as expected
    fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run_git("commit", &["--message", message])
    }

    fn has_remote(&self, name: &str) -> Result<bool, GitError> {
        let remotes = self
            .repo
            .remotes()
            .map_err(GitError::git("failed to list remotes"))?;
        Ok(remotes.iter().flatten().any(|remote| remote == name))
    }

    fn push(&self, remote: &str) -> Result<(), GitError> {
        self.run_git("push", &[remote, "HEAD"])
    }
}

/// precedence when several flags are set: untracked, deleted-staged, modified-unstaged, staged
fn classify(status: Status) -> Option<ChangeKind> {
    if status.is_wt_new() {
        Some(ChangeKind::Untracked)
    } else if status.is_index_deleted() {
        Some(ChangeKind::DeletedStaged)
    } else if status.intersects(
        Status::WT_MODIFIED | Status::WT_DELETED | Status::WT_TYPECHANGE | Status::WT_RENAMED,
    ) {
        Some(ChangeKind::ModifiedUnstaged)
    } else if status.intersects(
        Status::INDEX_NEW | Status::INDEX_MODIFIED | Status::INDEX_RENAMED | Status::INDEX_TYPECHANGE,
    ) {
        Some(ChangeKind::Staged)
    } else {
        None
    }
}

/// check if file diff should be ignored (lock files, minified files, etc.)
fn should_ignore_diff(path: &str) -> bool {
    let path_lower = path.to_lowercase();

    // lock files - check full filename patterns
    if path_lower.ends_with("-lock.json") || path_lower.ends_with("-lock.yaml") {
        return true;
    }

    // check file extension for .lock files
    if Path::new(&path_lower)
        .extension()
        .is_some_and(|ext| ext == "lock")
    {
        return true;
    }

    // minified files
    [".min.js", ".min.css", "-min.js", "-min.css"]
        .iter()
        .any(|suffix| path_lower.ends_with(suffix))
}

/// format a diff object into a unified diff string
fn format_diff(diff: &git2::Diff) -> Result<String, GitError> {
    let mut output = String::new();

    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        // diff line types that need the origin character
        if matches!(origin, '+' | '-' | ' ') {
            output.push(origin);
        }
        output.push_str(&String::from_utf8_lossy(line.content()));
        true
    })
    .map_err(GitError::git("failed to format diff"))?;

    Ok(output.trim_end_matches('\n').to_string())
}

#[cfg(test)]
mod tests;

use super::*;
use std::fs;
use tempfile::TempDir;

/// helper to initialise a test git repository
fn setup_test_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = Repository::init(temp_dir.path()).unwrap();

    // configure git user for commits
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    (temp_dir, repo)
}

/// helper to create a file with content
fn create_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// helper to commit all changes
fn commit_all(repo: &Repository, message: &str) {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = repo.signature().unwrap();

    let parent_commit = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent_commit.iter().collect();
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap();
}

fn open(temp_dir: &TempDir) -> GitRepo {
    GitRepo::discover(temp_dir.path()).unwrap()
}

#[test]
fn test_discover_from_subdirectory() {
    let (temp_dir, _repo) = setup_test_repo();
    let nested = temp_dir.path().join("src/deep");
    fs::create_dir_all(&nested).unwrap();

    let git = GitRepo::discover(&nested).unwrap();

    assert_eq!(
        git.root().canonicalize().unwrap(),
        temp_dir.path().canonicalize().unwrap()
    );
}

#[test]
fn test_discover_outside_repository() {
    let temp_dir = TempDir::new().unwrap();

    let result = GitRepo::discover(temp_dir.path());

    assert!(matches!(result, Err(GitError::NotARepository(_))));
}

#[test]
fn test_sanity_check_on_fresh_repository() {
    let (temp_dir, _repo) = setup_test_repo();
    assert!(open(&temp_dir).sanity_check().is_ok());
}

#[test]
fn test_scan_classifies_every_status() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("to_modify.txt"), "original");
    create_file(&repo_path.join("to_delete_staged.txt"), "delete me");
    create_file(&repo_path.join("to_delete_unstaged.txt"), "delete me too");
    create_file(&repo_path.join("to_stage.txt"), "stage me");
    commit_all(&repo, "initial commit");

    create_file(&repo_path.join("to_modify.txt"), "modified content");
    create_file(&repo_path.join("to_stage.txt"), "staged change");
    create_file(&repo_path.join("dir/new_file.txt"), "new");
    fs::remove_file(repo_path.join("to_delete_staged.txt")).unwrap();
    fs::remove_file(repo_path.join("to_delete_unstaged.txt")).unwrap();

    let mut index = repo.index().unwrap();
    index.remove_path(Path::new("to_delete_staged.txt")).unwrap();
    index.add_path(Path::new("to_stage.txt")).unwrap();
    index.write().unwrap();

    let changes = open(&temp_dir).scan().unwrap();

    assert_eq!(changes.untracked, vec!["dir/new_file.txt"]);
    assert_eq!(
        changes.modified_unstaged,
        vec!["to_delete_unstaged.txt", "to_modify.txt"]
    );
    assert_eq!(changes.deleted_staged, vec!["to_delete_staged.txt"]);
    assert_eq!(changes.staged, vec!["to_stage.txt"]);

    // the classes are disjoint and together cover the whole status
    let mut all: Vec<&String> = changes
        .untracked
        .iter()
        .chain(&changes.modified_unstaged)
        .chain(&changes.deleted_staged)
        .chain(&changes.staged)
        .collect();
    let total = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), total, "classes must not overlap");

    let mut opts = StatusOptions::new();
    opts.include_untracked(true).recurse_untracked_dirs(true);
    let status_count = repo.statuses(Some(&mut opts)).unwrap().len();
    assert_eq!(total, status_count, "classes must cover every status entry");
}

#[test]
fn test_partially_staged_file_needs_confirmation() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("file.txt"), "one");
    commit_all(&repo, "initial commit");

    create_file(&repo_path.join("file.txt"), "two");
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("file.txt")).unwrap();
    index.write().unwrap();
    create_file(&repo_path.join("file.txt"), "three, unstaged");

    let changes = open(&temp_dir).scan().unwrap();

    assert_eq!(changes.modified_unstaged, vec!["file.txt"]);
    assert!(changes.staged.is_empty());
}

#[test]
fn test_staged_changes_reflect_the_index() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("file.txt"), "one");
    create_file(&repo_path.join("old.txt"), "old");
    commit_all(&repo, "initial commit");

    // partially staged: index holds "two", worktree holds something else
    create_file(&repo_path.join("file.txt"), "two");
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("file.txt")).unwrap();
    index.remove_path(Path::new("old.txt")).unwrap();
    index.write().unwrap();
    create_file(&repo_path.join("file.txt"), "three, unstaged");
    create_file(&repo_path.join("untracked.txt"), "not staged");

    let entries = open(&temp_dir).staged_changes().unwrap();

    assert_eq!(
        entries,
        vec![
            StagedEntry::new('M', "file.txt"),
            StagedEntry::new('D', "old.txt"),
        ]
    );
}

#[test]
fn test_staged_changes_on_unborn_branch() {
    let (temp_dir, repo) = setup_test_repo();
    create_file(&temp_dir.path().join("a.py"), "print('a')\n");
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("a.py")).unwrap();
    index.write().unwrap();

    let entries = open(&temp_dir).staged_changes().unwrap();

    assert_eq!(entries, vec![StagedEntry::new('A', "a.py")]);
}

#[test]
fn test_clean_repository_has_no_changes() {
    let (temp_dir, repo) = setup_test_repo();
    create_file(&temp_dir.path().join("file.txt"), "content");
    commit_all(&repo, "initial commit");

    let git = open(&temp_dir);
    assert!(git.scan().unwrap().is_empty());
    assert!(git.staged_changes().unwrap().is_empty());
}

#[test]
fn test_stage_paths_with_modifications_and_deletions() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("to_modify.txt"), "original");
    create_file(&repo_path.join("to_delete.txt"), "delete me");
    commit_all(&repo, "initial commit");

    create_file(&repo_path.join("to_modify.txt"), "modified content");
    fs::remove_file(repo_path.join("to_delete.txt")).unwrap();

    let git = open(&temp_dir);
    let changes = git.scan().unwrap();
    git.stage_paths(&changes.modified_unstaged).unwrap();

    let after = git.scan().unwrap();
    assert!(after.modified_unstaged.is_empty());
    assert_eq!(after.staged, vec!["to_modify.txt"]);
    assert_eq!(after.deleted_staged, vec!["to_delete.txt"]);
}

#[test]
fn test_stage_untracked_only_touches_given_paths() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("tracked.txt"), "original");
    commit_all(&repo, "initial commit");

    create_file(&repo_path.join("tracked.txt"), "modified content");
    create_file(&repo_path.join("a.py"), "print('a')\n");

    let git = open(&temp_dir);
    let changes = git.scan().unwrap();
    git.stage_untracked(&changes.untracked).unwrap();

    let after = git.scan().unwrap();
    assert!(after.untracked.is_empty());
    assert_eq!(after.staged, vec!["a.py"]);
    assert_eq!(after.modified_unstaged, vec!["tracked.txt"]);
}

#[test]
fn test_staged_diff_on_unborn_branch() {
    let (temp_dir, repo) = setup_test_repo();
    create_file(&temp_dir.path().join("a.py"), "print('a')\n");
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("a.py")).unwrap();
    index.write().unwrap();

    let diff = open(&temp_dir).staged_diff("a.py").unwrap();

    assert!(!diff.deleted);
    assert!(diff.text.contains("+print('a')"), "diff was: {}", diff.text);
}

#[test]
fn test_staged_diff_for_deleted_file() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();
    create_file(&repo_path.join("old.txt"), "farewell\n");
    create_file(&repo_path.join("keep.txt"), "stay\n");
    commit_all(&repo, "initial commit");

    fs::remove_file(repo_path.join("old.txt")).unwrap();
    let mut index = repo.index().unwrap();
    index.remove_path(Path::new("old.txt")).unwrap();
    index.write().unwrap();

    let diff = open(&temp_dir).staged_diff("old.txt").unwrap();

    assert!(diff.deleted);
    assert!(diff.text.contains("-farewell"), "diff was: {}", diff.text);
    assert!(!diff.text.contains("keep.txt"));
}

#[test]
fn test_lock_file_diff_is_omitted() {
    let (temp_dir, repo) = setup_test_repo();
    create_file(&temp_dir.path().join("Cargo.lock"), "lock content");
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("Cargo.lock")).unwrap();
    index.write().unwrap();

    let diff = open(&temp_dir).staged_diff("Cargo.lock").unwrap();

    assert!(diff.text.contains("diff omitted"));
    assert!(!diff.text.contains("lock content"));
}

#[test]
fn test_should_ignore_diff() {
    assert!(should_ignore_diff("Cargo.lock"));
    assert!(should_ignore_diff("web/package-lock.json"));
    assert!(should_ignore_diff("pnpm-lock.yaml"));
    assert!(should_ignore_diff("static/app.min.js"));
    assert!(should_ignore_diff("static/STYLE-MIN.CSS"));
    assert!(!should_ignore_diff("src/lock.rs"));
    assert!(!should_ignore_diff("README.md"));
}

#[test]
fn test_has_remote() {
    let (temp_dir, repo) = setup_test_repo();
    assert!(!open(&temp_dir).has_remote("origin").unwrap());

    repo.remote("origin", "https://example.com/project.git")
        .unwrap();
    let git = open(&temp_dir);
    assert!(git.has_remote("origin").unwrap());
    assert!(!git.has_remote("upstream").unwrap());
}

#[test]
fn test_classify_precedence() {
    assert_eq!(
        classify(Status::WT_NEW | Status::INDEX_DELETED),
        Some(ChangeKind::Untracked)
    );
    assert_eq!(
        classify(Status::INDEX_DELETED),
        Some(ChangeKind::DeletedStaged)
    );
    assert_eq!(
        classify(Status::INDEX_MODIFIED | Status::WT_MODIFIED),
        Some(ChangeKind::ModifiedUnstaged)
    );
    assert_eq!(classify(Status::WT_DELETED), Some(ChangeKind::ModifiedUnstaged));
    assert_eq!(classify(Status::INDEX_NEW), Some(ChangeKind::Staged));
    assert_eq!(classify(Status::CURRENT), None);
    assert_eq!(classify(Status::IGNORED), None);
}

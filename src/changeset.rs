use std::collections::BTreeMap;

/// working tree status split into mutually exclusive classes, paths relative to the repo root
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub untracked: Vec<String>,
    pub modified_unstaged: Vec<String>, // includes unstaged deletions
    pub deleted_staged: Vec<String>,
    pub staged: Vec<String>, // index-only changes, no prompt needed
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.untracked.is_empty()
            && self.modified_unstaged.is_empty()
            && self.deleted_staged.is_empty()
            && self.staged.is_empty()
    }
}

/// the user's answers to the two staging prompts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StagingDecision {
    pub stage_untracked: bool,
    pub stage_modified: bool,
}

impl StagingDecision {
    /// paths the user chose not to stage
    pub fn declined<'a>(&self, changes: &'a ChangeSet) -> Vec<&'a str> {
        let mut paths = Vec::new();
        if !self.stage_untracked {
            paths.extend(changes.untracked.iter().map(String::as_str));
        }
        if !self.stage_modified {
            paths.extend(changes.modified_unstaged.iter().map(String::as_str));
        }
        paths
    }
}

/// one path whose index entry differs from HEAD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedEntry {
    /// 'A', 'M', 'D' or 'R'
    pub status: char,
    pub path: String,
}

impl StagedEntry {
    pub fn new(status: char, path: impl Into<String>) -> Self {
        Self {
            status,
            path: path.into(),
        }
    }
}

/// cached diff of one staged path
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StagedDiff {
    pub text: String,
    pub deleted: bool,
}

/// staged diffs keyed by path
pub type FileDiffMap = BTreeMap<String, StagedDiff>;

/// combined size of all diff texts, in bytes
pub fn diff_size(diffs: &FileDiffMap) -> usize {
    diffs.values().map(|d| d.text.len()).sum()
}

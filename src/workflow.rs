use crate::changeset::{
    ChangeSet, FileDiffMap, StagedDiff, StagedEntry, StagingDecision, diff_size,
};
use crate::constants::{DIFF_SIZE_MAXIMUM_BYTES, DIFF_SIZE_WARNING_BYTES, PUSH_REMOTE};
use crate::context::AppContext;
use crate::editor::CommitTemplate;
use crate::error::{EditorError, GitError};
use crate::message::{self, Generation};
use crate::provider::Provider;
use crate::{info, status, ui, warning};
use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use num_format::{Locale, ToFormattedString};
use std::time::Duration;

/// the version-control operations the pipeline needs
#[cfg_attr(test, mockall::automock)]
pub trait Vcs {
    fn scan(&self) -> Result<ChangeSet, GitError>;

    /// stage every untracked path in one index write
    fn stage_untracked(&self, paths: &[String]) -> Result<(), GitError>;

    /// stage exactly these paths, including deletions
    fn stage_paths(&self, paths: &[String]) -> Result<(), GitError>;

    /// every path whose index entry differs from HEAD
    fn staged_changes(&self) -> Result<Vec<StagedEntry>, GitError>;

    fn staged_diff(&self, path: &str) -> Result<StagedDiff, GitError>;

    fn commit(&self, message: &str) -> Result<(), GitError>;

    fn has_remote(&self, name: &str) -> Result<bool, GitError>;

    fn push(&self, remote: &str) -> Result<(), GitError>;
}

/// yes/no questions to the user
#[cfg_attr(test, mockall::automock)]
pub trait Interaction {
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// lets the user revise the generated message
#[cfg_attr(test, mockall::automock)]
pub trait MessageEditor {
    fn edit(&self, template: &CommitTemplate) -> Result<String, EditorError>;
}

/// how a run ended, when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NothingToCommit,
    /// the user stopped at a prompt
    Aborted,
    /// the edited message was empty
    EmptyMessage,
    Committed { pushed: bool },
}

/// one pass of scan, stage, diff, generate, edit, commit and push
pub struct Workflow<'a> {
    pub vcs: &'a dyn Vcs,
    pub interaction: &'a dyn Interaction,
    pub provider: &'a dyn Provider,
    pub editor: &'a dyn MessageEditor,
    pub ctx: &'a AppContext,
}

impl Workflow<'_> {
    pub fn run(&self) -> Result<Outcome> {
        let changes = self.vcs.scan()?;
        if changes.is_empty() {
            status!("no changes found");
            return Ok(Outcome::NothingToCommit);
        }

        status!(
            "generating commit message in {} with {}...",
            self.ctx.language,
            self.provider.name()
        );

        let decision = self.stage(&changes)?;

        // the index decides what gets committed, not the answers above
        let staged = self.vcs.staged_changes()?;
        if staged.is_empty() {
            status!("nothing to commit");
            return Ok(Outcome::NothingToCommit);
        }
        let declined = decision.declined(&changes);
        for entry in staged.iter().filter(|e| declined.contains(&e.path.as_str())) {
            warning!(
                "{}: staging was declined, but changes already in the index will be committed",
                entry.path
            );
        }

        let diffs = self.collect_diffs(&staged)?;

        if !self.check_diff_size(&diffs)? {
            status!("aborted");
            return Ok(Outcome::Aborted);
        }

        let message = self.generate(&diffs)?;
        let final_message = self.editor.edit(&CommitTemplate::new(message, diffs))?;

        self.commit_and_push(&final_message, &staged)
    }

    /// offer to stage untracked and modified files, one question per category
    fn stage(&self, changes: &ChangeSet) -> Result<StagingDecision> {
        let mut decision = StagingDecision::default();

        if !changes.untracked.is_empty() {
            info!();
            ui::list_files("untracked files:", &changes.untracked);
            decision.stage_untracked = self.interaction.confirm("stage all untracked files?")?;
            if decision.stage_untracked {
                self.vcs.stage_untracked(&changes.untracked)?;
                status!("untracked files staged");
            }
        }

        if !changes.modified_unstaged.is_empty() {
            info!();
            ui::list_files("modified files not staged for commit:", &changes.modified_unstaged);
            decision.stage_modified = self.interaction.confirm("stage these files?")?;
            if decision.stage_modified {
                self.vcs.stage_paths(&changes.modified_unstaged)?;
                status!("modified files staged");
            }
        }

        Ok(decision)
    }

    /// cached diff for everything that will be part of the commit
    fn collect_diffs(&self, staged: &[StagedEntry]) -> Result<FileDiffMap> {
        let mut diffs = FileDiffMap::new();
        for entry in staged {
            let diff = self.vcs.staged_diff(&entry.path)?;
            diffs.insert(entry.path.clone(), diff);
        }
        Ok(diffs)
    }

    /// refuse huge diffs and ask before sending large ones
    fn check_diff_size(&self, diffs: &FileDiffMap) -> Result<bool> {
        let size = diff_size(diffs);
        let pretty = size.to_formatted_string(&Locale::en);
        if size > DIFF_SIZE_MAXIMUM_BYTES {
            bail!(
                "diff is too large ({pretty} bytes, max {})",
                DIFF_SIZE_MAXIMUM_BYTES.to_formatted_string(&Locale::en)
            );
        }
        if size > DIFF_SIZE_WARNING_BYTES {
            warning!("diff is large ({pretty} bytes), this may use many tokens");
            return self.interaction.confirm("continue?");
        }
        Ok(true)
    }

    /// generate commit message with spinner
    fn generate(&self, diffs: &FileDiffMap) -> Result<String> {
        let prompt = message::build_prompt(&self.ctx.language, self.ctx.style, diffs);
        if self.ctx.show_prompt {
            use colored::Colorize;
            info!("\n{}", prompt.dimmed());
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("asking {}...", self.provider.name()));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let generation = message::generate(self.provider, &prompt);

        spinner.finish_and_clear();

        match generation {
            Generation::Generated(message) => Ok(message),
            Generation::Degraded { message, reason } => {
                warning!("{}, using fallback message", reason);
                Ok(message)
            }
            Generation::RateLimited(e) => Err(e.into()),
        }
    }

    fn commit_and_push(&self, message: &str, staged: &[StagedEntry]) -> Result<Outcome> {
        if message.trim().is_empty() {
            warning!("commit message is empty, nothing was committed");
            return Ok(Outcome::EmptyMessage);
        }

        info!();
        status!("files to be committed:");
        for line in ui::staged_overview(staged) {
            info!("  {}", line);
        }
        info!();
        status!("commit message:");
        info!(message);
        info!();

        if !self.interaction.confirm("commit these changes?")? {
            status!("commit aborted");
            return Ok(Outcome::Aborted);
        }

        self.vcs.commit(message)?;
        status!("changes committed");

        if !self.vcs.has_remote(PUSH_REMOTE)? {
            info!("no '{}' remote configured, skipping push", PUSH_REMOTE);
            return Ok(Outcome::Committed { pushed: false });
        }

        status!("pushing to {}...", PUSH_REMOTE);
        self.vcs
            .push(PUSH_REMOTE)
            .with_context(|| format!("commit was created but pushing to {PUSH_REMOTE} failed"))?;
        status!("pushed to {}", PUSH_REMOTE);

        Ok(Outcome::Committed { pushed: true })
    }
}

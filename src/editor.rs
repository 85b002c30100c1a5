use crate::changeset::FileDiffMap;
use crate::constants::{COMMENT_CHAR, DEFAULT_EDITOR};
use crate::error::EditorError;
use crate::interrupt::DeferredInterrupt;
use crate::workflow::MessageEditor;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::{Builder, NamedTempFile};

/// the proposed message plus the context shown as comments below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitTemplate {
    pub message: String,
    pub diffs: FileDiffMap,
}

impl CommitTemplate {
    pub fn new(message: String, diffs: FileDiffMap) -> Self {
        Self { message, diffs }
    }

    /// render the editable template, every context line commented out
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CommitTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = COMMENT_CHAR;
        writeln!(f, "{}\n", self.message)?;
        writeln!(
            f,
            "{c} Please enter the commit message for your changes. Lines starting\n\
             {c} with '{c}' will be ignored, and an empty message aborts the commit.\n\
             {c}\n\
             {c} Changes to be committed:\n\
             {c}"
        )?;

        let (deleted, modified): (Vec<_>, Vec<_>) =
            self.diffs.iter().partition(|(_, diff)| diff.deleted);
        for (path, _) in &modified {
            writeln!(f, "{c}\t{path}")?;
        }
        if !deleted.is_empty() {
            writeln!(f, "{c}\n{c} Deleted files:")?;
            for (path, _) in &deleted {
                writeln!(f, "{c}\t{path} (deleted)")?;
            }
        }

        writeln!(f, "{c}")?;
        for (path, diff) in &self.diffs {
            writeln!(f, "{c} Changes in {path}:")?;
            for line in diff.text.lines() {
                if line.is_empty() {
                    writeln!(f, "{c}")?;
                } else {
                    writeln!(f, "{c} {line}")?;
                }
            }
            writeln!(f, "{c}")?;
        }
        Ok(())
    }
}

/// strip comment lines from an edited template
///
/// leading and trailing blank lines are dropped and runs of blank lines
/// between paragraphs become a single separator, as `git commit --cleanup=strip` does.
pub fn parse_message(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut pending_blank = false;

    for line in text.lines() {
        if line.starts_with(COMMENT_CHAR) {
            continue;
        }
        let line = line.trim_end();
        if line.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }
        if pending_blank {
            lines.push("");
            pending_blank = false;
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// a template written to a temporary file, removed when dropped
pub struct TemplateFile {
    file: NamedTempFile,
}

impl TemplateFile {
    pub fn create(contents: &str) -> Result<Self, EditorError> {
        let mut file = Builder::new()
            .prefix("COMMIT_EDITMSG-")
            .suffix(".txt")
            .tempfile()
            .map_err(EditorError::Template)?;
        file.write_all(contents.as_bytes())
            .and_then(|()| file.flush())
            .map_err(EditorError::Template)?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// open the file in `editor` and return the cleaned up message
    ///
    /// consumes the file so it is deleted on every return path. ctrl-c while
    /// the editor runs is reported as `EditorError::Interrupted`.
    pub fn edit_with(self, editor: &str) -> Result<String, EditorError> {
        // run the editor via shell to properly handle arguments in EDITOR
        let quoted = shlex::try_quote(&self.path().to_string_lossy())
            .map(|q| q.into_owned())
            .unwrap_or_else(|_| self.path().to_string_lossy().into_owned());
        let editor_command = format!("{editor} {quoted}");

        let interrupt = DeferredInterrupt::install();
        let status = Command::new("sh")
            .arg("-c")
            .arg(&editor_command)
            .status()
            .map_err(|source| EditorError::Spawn {
                editor: editor.to_string(),
                source,
            })?;
        if interrupt.received() {
            return Err(EditorError::Interrupted);
        }
        drop(interrupt);

        if !status.success() {
            return Err(EditorError::Failed {
                editor: editor.to_string(),
                status,
            });
        }

        // the editor may have replaced the file, so read it back by path
        let edited = fs::read_to_string(self.path()).map_err(EditorError::Read)?;
        Ok(parse_message(&edited))
    }
}

/// the user's `$EDITOR`, falling back to vim
pub struct ExternalEditor {
    command: String,
}

impl ExternalEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn from_env() -> Self {
        let command = std::env::var("EDITOR")
            .ok()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string());
        Self::new(command)
    }
}

impl MessageEditor for ExternalEditor {
    fn edit(&self, template: &CommitTemplate) -> Result<String, EditorError> {
        TemplateFile::create(&template.render())?.edit_with(&self.command)
    }
}

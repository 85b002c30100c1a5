mod changeset;
mod cli;
mod config;
mod constants;
mod context;
mod editor;
mod error;
mod git;
mod interrupt;
mod message;
mod provider;
mod ui;
mod workflow;

use crate::cli::Cli;
use crate::config::ProviderConfig;
use crate::context::AppContext;
use crate::editor::ExternalEditor;
use crate::error::Interrupted;
use crate::git::GitRepo;
use crate::ui::Terminal;
use crate::workflow::{Outcome, Workflow};
use anyhow::{Result, bail};
use std::io::IsTerminal;

fn main() {
    if let Err(e) = run() {
        // the prompt already echoed ^C
        if !e.is::<Interrupted>() {
            error!("{:#}", e);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // sanity checks
    if !std::io::stdin().is_terminal()
        || !std::io::stdout().is_terminal()
        || !std::io::stderr().is_terminal()
    {
        bail!("interactive terminal required");
    }
    let cli = Cli::parse_args();

    let repo = GitRepo::discover(&std::env::current_dir()?)?;
    for path in config::load_env_files(repo.root())? {
        info!("loaded {}", path.display());
    }
    let config = ProviderConfig::from_env(&cli)?;
    repo.sanity_check()?;

    // main
    let provider = provider::from_config(&config);
    let ctx = AppContext::new(&config, cli.debug_prompt);
    let editor = ExternalEditor::from_env();
    let workflow = Workflow {
        vcs: &repo,
        interaction: &Terminal,
        provider: provider.as_ref(),
        editor: &editor,
        ctx: &ctx,
    };

    match workflow.run()? {
        Outcome::Committed { pushed: true } => status!("done"),
        Outcome::Committed { pushed: false } => status!("done, nothing pushed"),
        Outcome::NothingToCommit | Outcome::Aborted | Outcome::EmptyMessage => {}
    }

    Ok(())
}

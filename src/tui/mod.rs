// Terminal viewer for conversation transcripts
mod app;
mod events;
mod layout;
mod rendering;
mod terminal;
mod timestamps;

use anyhow::Result;
pub use app::{App, Loader};
use terminal::TerminalManager;

use crate::navigation::SessionSync;

/// Run the interactive viewer until the user quits
pub fn run_interactive(
    loader: Loader,
    session_sync: SessionSync,
    base_url: &str,
    source_label: &str,
) -> Result<()> {
    let mut manager = TerminalManager::new()?;

    let mut app = App::new(loader, session_sync, base_url, source_label);
    app.start_load();
    let res = app.run(manager.terminal_mut());

    manager.restore()?;
    res
}

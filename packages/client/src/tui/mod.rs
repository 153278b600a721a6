//! Terminal surface: welcome prompt, chat screen, drawing.

pub mod app;
pub mod render;
pub mod welcome;

use std::{
    io::{self, Stdout},
    panic,
};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use crate::{channel::ChannelNotice, view::RenderCommand};

pub use app::App;

/// Take over the terminal, run the chat screen, and give the terminal back.
pub async fn run(
    app: &mut App,
    notices: mpsc::UnboundedReceiver<ChannelNotice>,
    renders: mpsc::UnboundedReceiver<RenderCommand>,
) -> io::Result<()> {
    // put the terminal back before the panic message is printed
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let result = app.run(&mut terminal, notices, renders).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

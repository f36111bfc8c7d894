use std::io::{self, Stdout};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use crate::error::Result;

/// Terminal session guard: raw mode and the alternate screen are entered on
/// construction and left again in `restore` (or by `Drop` as a last resort,
/// so an early `?` in the event loop still puts the shell back together).
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    mouse: bool,
    restored: bool,
}

impl Tui {
    pub fn new(mouse: bool) -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        if mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout))?,
            mouse,
            restored: false,
        })
    }

    /// Draw one frame.
    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// Leave the alternate screen and hand the terminal back to the shell.
    pub fn restore(&mut self) -> Result<()> {
        self.restored = true;
        leave_terminal(self.mouse)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if !self.restored {
            let _ = leave_terminal(self.mouse);
        }
    }
}

fn leave_terminal(mouse: bool) -> Result<()> {
    terminal::disable_raw_mode()?;
    if mouse {
        execute!(io::stdout(), DisableMouseCapture)?;
    }
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing panic info.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = leave_terminal(true);
        original_hook(panic_info);
    }));
}

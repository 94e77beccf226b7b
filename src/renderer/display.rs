use anyhow::Result;
use crossterm::{
    cursor,
    style::Print,
    terminal::{Clear, ClearType},
    ExecutableCommand, QueueableCommand,
};
use std::io::{Stdout, Write};

/// Full-screen dialog on stdout, redrawn only when its text changes.
pub struct DisplayManager {
    stdout: Stdout,
    last_screen: Option<String>,
}

impl DisplayManager {
    pub fn new() -> Result<Self> {
        let mut stdout = std::io::stdout();
        stdout.execute(cursor::Hide)?;
        Ok(Self {
            stdout,
            last_screen: None,
        })
    }

    /// Draw `screen` unless it is already on the terminal. Returns whether it was redrawn.
    pub fn show(&mut self, screen: &str) -> Result<bool> {
        let changed = self.last_screen.as_deref() != Some(screen);
        if !changed {
            return Ok(false);
        }

        self.stdout.queue(Clear(ClearType::All))?;
        self.stdout.queue(cursor::MoveTo(0, 0))?;
        // not in raw mode, but keep carriage returns explicit
        self.stdout.queue(Print(screen.replace('\n', "\r\n")))?;
        self.stdout.queue(Print("\r\n"))?;
        self.stdout.flush()?;

        self.last_screen = Some(screen.to_string());
        Ok(true)
    }
}

impl Drop for DisplayManager {
    fn drop(&mut self) {
        let _ = self.stdout.execute(cursor::Show);
    }
}

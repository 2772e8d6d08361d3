//! Console stand-ins for the lamps and the character LCD

use std::io::Write;

use beacon_core::{Channel, HalError, SignalOutput, StatusDisplay};

/// Lay `text` out on a `columns` x `rows` character display
///
/// Lines past `rows` are dropped, each line is cut or space-padded to
/// exactly `columns` characters, and missing rows are blank.
pub fn lcd_frame(text: &str, columns: usize, rows: usize) -> Vec<String> {
    let mut frame: Vec<String> = text
        .lines()
        .take(rows)
        .map(|line| {
            let mut row: String = line.chars().take(columns).collect();
            let used = row.chars().count();
            row.extend(std::iter::repeat(' ').take(columns - used));
            row
        })
        .collect();

    while frame.len() < rows {
        frame.push(" ".repeat(columns));
    }
    frame
}

/// Two lamps reported through the log: red for dots, blue for dashes
#[derive(Debug, Default)]
pub struct ConsoleLamps {
    red: bool,
    blue: bool,
}

impl ConsoleLamps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_lit(&self, channel: Channel) -> bool {
        match channel {
            Channel::Dot => self.red,
            Channel::Dash => self.blue,
        }
    }

    fn set(&mut self, channel: Channel, on: bool) {
        let (lamp, name) = match channel {
            Channel::Dot => (&mut self.red, "red"),
            Channel::Dash => (&mut self.blue, "blue"),
        };
        *lamp = on;
        log::info!("{} lamp {}", name, if on { "ON" } else { "off" });
    }
}

impl SignalOutput for ConsoleLamps {
    type Error = HalError;

    fn activate(&mut self, channel: Channel) -> Result<(), Self::Error> {
        self.set(channel, true);
        Ok(())
    }

    fn deactivate(&mut self, channel: Channel) -> Result<(), Self::Error> {
        self.set(channel, false);
        Ok(())
    }
}

/// Boxed LCD-style frame written to any `Write`
pub struct ConsoleDisplay<W: Write> {
    out: W,
    columns: usize,
    rows: usize,
}

impl ConsoleDisplay<std::io::Stdout> {
    /// Display on standard output
    pub fn stdout(columns: usize, rows: usize) -> Self {
        Self::new(std::io::stdout(), columns, rows)
    }
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W, columns: usize, rows: usize) -> Self {
        Self { out, columns, rows }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, text: &str) -> std::io::Result<()> {
        let border = format!("+{}+", "-".repeat(self.columns));
        writeln!(self.out, "{}", border)?;
        for row in lcd_frame(text, self.columns, self.rows) {
            writeln!(self.out, "|{}|", row)?;
        }
        writeln!(self.out, "{}", border)?;
        self.out.flush()
    }
}

impl<W: Write> StatusDisplay for ConsoleDisplay<W> {
    type Error = HalError;

    fn render(&mut self, text: &str) -> Result<(), Self::Error> {
        self.write_frame(text).map_err(|_| HalError::DisplayError)
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.write_frame("").map_err(|_| HalError::DisplayError)
    }
}

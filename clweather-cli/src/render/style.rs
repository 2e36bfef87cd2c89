use std::io::IsTerminal;

use clweather_core::model::FlightCategory;
use crossterm::style::Stylize;

/// How styled text reaches the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Ansi,
    Plain,
}

impl Palette {
    /// ANSI styling unless disabled, `NO_COLOR` is set or stdout is not a terminal.
    pub fn detect(no_color: bool) -> Self {
        let disabled = no_color || std::env::var_os("NO_COLOR").is_some();
        if disabled || !std::io::stdout().is_terminal() {
            Palette::Plain
        } else {
            Palette::Ansi
        }
    }

    pub fn heading(&self, text: &str) -> String {
        match self {
            Palette::Ansi => text.bold().to_string(),
            Palette::Plain => text.to_string(),
        }
    }

    /// The highlighted cell of the flight-category table.
    pub fn emphasis(&self, text: &str) -> String {
        match self {
            Palette::Ansi => text.bold().red().to_string(),
            Palette::Plain => format!("[{text}]"),
        }
    }

    /// Columns [`Palette::emphasis`] adds beyond the text itself.
    pub fn emphasis_margin(&self) -> usize {
        match self {
            Palette::Ansi => 0,
            Palette::Plain => 2,
        }
    }

    pub fn category(&self, category: &FlightCategory) -> String {
        let text = category.as_str();
        match self {
            Palette::Plain => text.to_string(),
            Palette::Ansi => match category {
                FlightCategory::Vfr => text.green().to_string(),
                FlightCategory::Mvfr => text.blue().to_string(),
                FlightCategory::Ifr => text.red().to_string(),
                FlightCategory::Lifr => text.magenta().to_string(),
                FlightCategory::Unrecognized(_) => text.to_string(),
            },
        }
    }
}

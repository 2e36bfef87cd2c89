use std::io::{self, Write};

use clweather_core::model::FlightCategory;

use super::style::Palette;

pub const COLUMNS: usize = 9;

const HEADER: [&str; COLUMNS] = ["PIREP/SIGMET", "", "", "", "", "FltCat", "", "", ""];
const GROUPS: [&str; COLUMNS] = ["Turb", "", "", "Ice", "", "", "", "", ""];
const LABELS: [&str; COLUMNS] = ["MOD", "SEV", "LLWS", "MOD", "SEV", "LIFR", "IFR", "MVFR", "VFR"];

/// Space between columns.
const GUTTER: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub label: &'static str,
    pub emphasized: bool,
}

/// Hazard and flight-category indicator grid shown under a METAR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightCategoryTable {
    pub rows: [[Cell; COLUMNS]; 2],
}

impl FlightCategoryTable {
    pub fn for_category(category: Option<&FlightCategory>) -> Self {
        let active = category.and_then(column_for);

        let groups = GROUPS.map(|label| Cell { label, emphasized: false });
        let mut labels = LABELS.map(|label| Cell { label, emphasized: false });
        if let Some(col) = active {
            labels[col].emphasized = true;
        }

        Self { rows: [groups, labels] }
    }

    #[cfg(test)]
    pub fn emphasized(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten().filter(|c| c.emphasized)
    }

    pub fn write(&self, out: &mut impl Write, palette: Palette) -> io::Result<()> {
        let widths = self.column_widths(palette);

        let header: Vec<String> =
            HEADER.iter().zip(widths).map(|(label, w)| pad(label, w)).collect();
        writeln!(out, "{}", palette.heading(header.concat().trim_end()))?;

        for row in &self.rows {
            let mut line = String::new();
            for (cell, w) in row.iter().zip(widths) {
                if cell.emphasized {
                    // Pad by visible width so ANSI codes don't shift the columns.
                    let shown = cell.label.len() + palette.emphasis_margin();
                    line.push_str(&palette.emphasis(cell.label));
                    line.push_str(&" ".repeat(w.saturating_sub(shown)));
                } else {
                    line.push_str(&pad(cell.label, w));
                }
            }
            writeln!(out, "{}", line.trim_end())?;
        }

        writeln!(out)
    }

    fn column_widths(&self, palette: Palette) -> [usize; COLUMNS] {
        let mut widths = HEADER.map(str::len);
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                let margin = if cell.emphasized { palette.emphasis_margin() } else { 0 };
                *w = (*w).max(cell.label.len() + margin);
            }
        }
        widths.map(|w| w + GUTTER)
    }
}

fn column_for(category: &FlightCategory) -> Option<usize> {
    let label = match category {
        FlightCategory::Unrecognized(_) => return None,
        known => known.as_str(),
    };
    LABELS.iter().rposition(|l| *l == label)
}

fn pad(label: &str, width: usize) -> String {
    format!("{label:<width$}")
}

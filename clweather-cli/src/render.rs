//! Presentation of parsed bulletins: human, raw and JSON.

use std::io::{self, Write};

use clweather_core::{Bulletin, BulletinKind, FetchError, OutputMode};
use serde_json::{Map, Value};

mod human;
mod style;
mod table;

pub use style::Palette;
pub use table::FlightCategoryTable;

const RULE_WIDTH: usize = 80;

/// Render one station's bulletins. Either may be absent.
pub fn render(
    out: &mut impl Write,
    metar: Option<&Bulletin>,
    taf: Option<&Bulletin>,
    mode: OutputMode,
    palette: Palette,
) -> io::Result<()> {
    let metar = metar.filter(|b| !b.station_id.is_empty());
    let taf = taf.filter(|b| !b.station_id.is_empty());

    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, &json_document(metar, taf))?;
            writeln!(out)
        }
        OutputMode::Raw => {
            for b in [metar, taf].into_iter().flatten().filter(|b| !b.raw_text.is_empty()) {
                writeln!(out, "{}: {}", b.kind.label(), b.raw_text)?;
            }
            Ok(())
        }
        OutputMode::Human => {
            if let Some(b) = metar {
                human::write_metar(out, b, palette)?;
            }
            if let Some(b) = taf {
                human::write_taf(out, b, palette)?;
            }
            if let Some(b) = metar {
                writeln!(out, "{}", "─".repeat(RULE_WIDTH))?;
                FlightCategoryTable::for_category(b.flight_category.as_ref()).write(out, palette)?;
            }
            Ok(())
        }
    }
}

/// `{"metar": ..., "taf": ...}` with absent kinds left out.
pub fn json_document(metar: Option<&Bulletin>, taf: Option<&Bulletin>) -> Value {
    let mut doc = Map::new();
    for b in [metar, taf].into_iter().flatten() {
        // Bulletin holds only plain data; serialization cannot fail.
        let value = serde_json::to_value(b).unwrap_or(Value::Null);
        doc.insert(b.kind.as_str().to_string(), value);
    }
    Value::Object(doc)
}

/// One line on the error stream for a failed fetch.
pub fn report_failure(
    err: &mut impl Write,
    station: &str,
    kind: BulletinKind,
    error: &FetchError,
) -> io::Result<()> {
    writeln!(err, "{kind} fetch failed for {station}: {error}")
}

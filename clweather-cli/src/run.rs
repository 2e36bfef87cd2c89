use std::{io::Write, sync::Arc, time::Duration};

use anyhow::{Context, Result, bail};
use clweather_core::{
    Bulletin, BulletinKind, BulletinSource, FetchOutcome, KindSelector, OutputMode,
    fetch::{fetch_all, plan},
    parse::parse,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::render::{self, Palette};

/// One invocation's worth of work.
#[derive(Debug, Clone)]
pub struct Query {
    pub stations: Vec<String>,
    pub selector: KindSelector,
    pub output: OutputMode,
    /// Dump the fetched payloads instead of parsing them.
    pub verbose: bool,
    pub deadline: Duration,
}

#[derive(Debug, Default)]
struct StationReport {
    station: String,
    metar: Option<Bulletin>,
    taf: Option<Bulletin>,
}

/// Fetch, parse and render everything the query asks for.
///
/// Fetch failures are reported on `err` and do not stop the run; verbose
/// runs dump whatever arrived and always succeed. A payload
/// that was fetched but cannot be parsed aborts before anything is
/// rendered.
pub async fn execute(
    source: Arc<dyn BulletinSource>,
    query: &Query,
    out: &mut impl Write,
    err: &mut impl Write,
    palette: Palette,
) -> Result<()> {
    let requests = plan(&query.stations, query.selector);
    if requests.is_empty() {
        bail!("No station given. Pass at least one ICAO identifier, e.g. `clweather KJFK`.");
    }
    info!(requests = requests.len(), "fetching bulletins");

    let outcomes = fetch_all(source, requests, query.deadline).await;

    for outcome in &outcomes {
        if let Err(e) = &outcome.result {
            render::report_failure(err, &outcome.station, outcome.kind, e)?;
        }
    }
    if query.verbose {
        return dump_raw(out, &outcomes);
    }
    if outcomes.iter().all(|o| o.result.is_err()) {
        bail!("No bulletins could be retrieved.");
    }

    let reports = parse_outcomes(outcomes)?;

    match query.output {
        OutputMode::Json => write_json(out, &reports)?,
        mode => {
            for (idx, report) in reports.iter().enumerate() {
                if idx > 0 && mode == OutputMode::Human {
                    writeln!(out)?;
                }
                render::render(out, report.metar.as_ref(), report.taf.as_ref(), mode, palette)?;
            }
        }
    }

    Ok(())
}

fn dump_raw(out: &mut impl Write, outcomes: &[FetchOutcome]) -> Result<()> {
    for outcome in outcomes {
        if let Ok(bytes) = &outcome.result {
            writeln!(out, "=== {} raw JSON ({}) ===", outcome.kind.label(), outcome.station)?;
            out.write_all(bytes)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Group parsed bulletins per station, keeping request order.
fn parse_outcomes(outcomes: Vec<FetchOutcome>) -> Result<Vec<StationReport>> {
    let mut reports: Vec<StationReport> = Vec::new();

    for outcome in outcomes {
        let Ok(bytes) = outcome.result else {
            continue;
        };

        let bulletin = parse(&bytes, outcome.kind)
            .with_context(|| format!("failed to parse {} for {}", outcome.kind, outcome.station))?;
        debug!(station = %outcome.station, kind = outcome.kind.as_str(), "parsed bulletin");

        let idx = match reports.iter().position(|r| r.station == outcome.station) {
            Some(idx) => idx,
            None => {
                reports.push(StationReport { station: outcome.station.clone(), ..Default::default() });
                reports.len() - 1
            }
        };

        match outcome.kind {
            BulletinKind::Metar => reports[idx].metar = Some(bulletin),
            BulletinKind::Taf => reports[idx].taf = Some(bulletin),
        }
    }

    Ok(reports)
}

/// A single station prints its document; several print an array of them.
fn write_json(out: &mut impl Write, reports: &[StationReport]) -> Result<()> {
    let mut docs: Vec<Value> = reports
        .iter()
        .map(|r| render::json_document(r.metar.as_ref(), r.taf.as_ref()))
        .collect();

    let doc = if docs.len() == 1 { docs.remove(0) } else { Value::Array(docs) };
    serde_json::to_writer_pretty(&mut *out, &doc).context("Failed to write JSON output")?;
    writeln!(out)?;
    Ok(())
}

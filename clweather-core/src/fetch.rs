//! Fan-out of one fetch per (station, kind) under a single deadline.

use std::{collections::HashSet, sync::Arc, time::Duration};

use tokio::{task::JoinSet, time::Instant};
use tracing::{debug, warn};

use crate::{
    FetchError,
    model::{FetchOutcome, KindSelector, StationRequest},
    provider::BulletinSource,
};

/// Longest wait honoured by [`fetch_all`].
pub const MAX_DEADLINE: Duration = Duration::from_secs(86_400);

/// Expand station arguments into the requests to issue.
///
/// Stations are upper-cased and may be comma separated; blanks and repeats
/// are dropped, first occurrence wins. Each station expands in selector
/// order.
pub fn plan<S: AsRef<str>>(stations: &[S], selector: KindSelector) -> Vec<StationRequest> {
    let mut seen = HashSet::new();

    stations
        .iter()
        .flat_map(|arg| arg.as_ref().split(','))
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .flat_map(|station| {
            selector.kinds().iter().map(move |kind| StationRequest {
                station: station.clone(),
                kind: *kind,
            })
        })
        .collect()
}

/// Run every request concurrently and collect one outcome per request,
/// in request order.
///
/// Requests still pending when `deadline` elapses fail with
/// [`FetchError::Timeout`]; they do not affect the others. The deadline
/// is capped at [`MAX_DEADLINE`].
pub async fn fetch_all(
    source: Arc<dyn BulletinSource>,
    requests: Vec<StationRequest>,
    deadline: Duration,
) -> Vec<FetchOutcome> {
    let cutoff = Instant::now() + deadline.min(MAX_DEADLINE);
    let mut tasks = JoinSet::new();

    for (idx, req) in requests.iter().cloned().enumerate() {
        let source = Arc::clone(&source);
        debug!(station = %req.station, kind = req.kind.as_str(), "dispatching fetch");

        tasks.spawn(async move {
            let result = tokio::time::timeout_at(cutoff, source.fetch(&req.station, req.kind))
                .await
                .unwrap_or(Err(FetchError::Timeout));
            (idx, result)
        });
    }

    let mut results: Vec<Option<Result<Vec<u8>, FetchError>>> = vec![None; requests.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, result)) => results[idx] = Some(result),
            Err(err) => warn!(error = %err, "fetch task did not complete"),
        }
    }

    requests
        .into_iter()
        .zip(results)
        .map(|(req, result)| {
            let result = result
                .unwrap_or_else(|| Err(FetchError::Transport("fetch task aborted".to_string())));
            if let Err(err) = &result {
                debug!(station = %req.station, kind = req.kind.as_str(), error = %err, "fetch failed");
            }
            FetchOutcome { station: req.station, kind: req.kind, result }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BulletinKind;
    use async_trait::async_trait;

    /// Answers from the station name: `SLOW*` never answers in time,
    /// `FAIL*` is rate limited, `BOOM*` panics, anything else echoes.
    #[derive(Debug)]
    struct ScriptedSource;

    #[async_trait]
    impl BulletinSource for ScriptedSource {
        async fn fetch(&self, station: &str, kind: BulletinKind) -> Result<Vec<u8>, FetchError> {
            if station.starts_with("SLOW") {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            if station.starts_with("FAIL") && kind == BulletinKind::Taf {
                return Err(FetchError::RateLimited);
            }
            if station.starts_with("BOOM") {
                panic!("source blew up");
            }
            Ok(format!("{station}:{}", kind.as_str()).into_bytes())
        }
    }

    fn kinds(reqs: &[StationRequest]) -> Vec<(String, BulletinKind)> {
        reqs.iter().map(|r| (r.station.clone(), r.kind)).collect()
    }

    #[test]
    fn plan_normalizes_and_expands() {
        let reqs = plan(&["kjfk,kbos", " KJFK ", ""], KindSelector::Both);
        assert_eq!(
            kinds(&reqs),
            vec![
                ("KJFK".to_string(), BulletinKind::Metar),
                ("KJFK".to_string(), BulletinKind::Taf),
                ("KBOS".to_string(), BulletinKind::Metar),
                ("KBOS".to_string(), BulletinKind::Taf),
            ]
        );
    }

    #[test]
    fn plan_single_kind() {
        let reqs = plan(&["egll"], KindSelector::Taf);
        assert_eq!(kinds(&reqs), vec![("EGLL".to_string(), BulletinKind::Taf)]);
    }

    #[tokio::test]
    async fn one_failure_does_not_block_others() {
        let reqs = plan(&["FAIL1", "KJFK"], KindSelector::Both);
        let out = fetch_all(Arc::new(ScriptedSource), reqs, Duration::from_secs(5)).await;

        assert_eq!(out.len(), 4);
        assert_eq!(out[0].result, Ok(b"FAIL1:metar".to_vec()));
        assert_eq!(out[1].result, Err(FetchError::RateLimited));
        assert_eq!(out[2].result, Ok(b"KJFK:metar".to_vec()));
        assert_eq!(out[3].result, Ok(b"KJFK:taf".to_vec()));
    }

    #[tokio::test]
    async fn deadline_fails_only_the_slow_requests() {
        let reqs = plan(&["SLOW1", "KBOS"], KindSelector::Metar);
        let out = fetch_all(Arc::new(ScriptedSource), reqs, Duration::from_millis(200)).await;

        assert_eq!(out[0].station, "SLOW1");
        assert_eq!(out[0].result, Err(FetchError::Timeout));
        assert_eq!(out[1].result, Ok(b"KBOS:metar".to_vec()));
    }

    #[tokio::test]
    async fn panicking_task_becomes_transport_failure() {
        let reqs = plan(&["BOOM", "KSFO"], KindSelector::Metar);
        let out = fetch_all(Arc::new(ScriptedSource), reqs, Duration::from_secs(5)).await;

        assert!(matches!(out[0].result, Err(FetchError::Transport(_))));
        assert_eq!(out[1].result, Ok(b"KSFO:metar".to_vec()));
    }

    #[tokio::test]
    async fn huge_deadline_runs_normally() {
        let reqs = plan(&["FAIL1"], KindSelector::Both);
        let out = fetch_all(Arc::new(ScriptedSource), reqs, Duration::from_secs(u64::MAX / 2)).await;

        assert_eq!(out[0].result, Ok(b"FAIL1:metar".to_vec()));
        assert_eq!(out[1].result, Err(FetchError::RateLimited));
    }

    #[tokio::test]
    async fn empty_plan_returns_nothing() {
        let out = fetch_all(Arc::new(ScriptedSource), Vec::new(), Duration::from_secs(1)).await;
        assert!(out.is_empty());
    }
}

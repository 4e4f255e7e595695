//! Multi-host runs: one enumeration per host, failures isolated per host.
//!
//! Each host's outcome is handed to a sink as soon as it is known, in the
//! order the hosts were given, so callers can write results while the rest of
//! the batch is still running.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::api::NetApi;
use crate::enumerator::SessionEnumerator;
use crate::error::NativeCallError;
use crate::level::SessionLevel;
use crate::record::SessionRecord;

/// Result of enumerating one host.
#[derive(Debug, Clone)]
pub struct HostOutcome {
    pub host: String,
    pub level: SessionLevel,
    pub collected_at: DateTime<Utc>,
    pub result: Result<Vec<SessionRecord>, NativeCallError>,
}

impl HostOutcome {
    /// Output lines for this host. Empty when the call failed.
    pub fn sessions(&self) -> impl Iterator<Item = HostSession<'_>> + '_ {
        let collected_at = self.collected_at.to_rfc3339();
        self.result
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(move |session| HostSession {
                computer_name: &self.host,
                level: self.level,
                collected_at: collected_at.clone(),
                session,
            })
    }

    pub fn session_count(&self) -> usize {
        self.result.as_ref().map_or(0, Vec::len)
    }
}

/// One output line: a session tagged with the host it was found on.
#[derive(Debug, Clone, Serialize)]
pub struct HostSession<'a> {
    pub computer_name: &'a str,
    pub level: SessionLevel,
    pub collected_at: String,
    #[serde(flatten)]
    pub session: &'a SessionRecord,
}

/// Running totals for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub hosts: usize,
    pub sessions: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &HostOutcome) {
        self.hosts += 1;
        self.sessions += outcome.session_count();
        if outcome.result.is_err() {
            self.failed += 1;
        }
    }
}

/// Outcomes kept in memory, in the order they were received.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<HostOutcome>,
}

impl BatchReport {
    pub fn push(&mut self, outcome: HostOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn sessions(&self) -> impl Iterator<Item = HostSession<'_>> + '_ {
        self.outcomes.iter().flat_map(|outcome| outcome.sessions())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &NativeCallError)> + '_ {
        self.outcomes.iter().filter_map(|outcome| match &outcome.result {
            Ok(_) => None,
            Err(e) => Some((outcome.host.as_str(), e)),
        })
    }

    pub fn session_count(&self) -> usize {
        self.outcomes.iter().map(HostOutcome::session_count).sum()
    }
}

/// Enumerate one host, copying every record out before the buffer is released.
/// A failure is reported as a warning and kept in the outcome.
pub fn enumerate_host<A: NetApi>(enumerator: &SessionEnumerator<A>, host: &str, level: SessionLevel) -> HostOutcome {
    info!("--- Enumerating sessions on host: {} ---", host);

    let result = enumerator
        .enumerate(host, level)
        .map(|sessions| sessions.collect::<Vec<_>>());

    match &result {
        Ok(sessions) => {
            for session in sessions {
                debug!(
                    "[+] {} session from {} ({})",
                    host,
                    session.cname(),
                    session.username().unwrap_or("-")
                );
            }
            info!("{}: {} session(s)", host, sessions.len());
        }
        Err(e) => warn!("NetSessionEnum failed on {}: {}", host, e),
    }

    HostOutcome {
        host: host.to_string(),
        level,
        collected_at: Utc::now(),
        result,
    }
}

/// Enumerate `hosts` one after another, passing each outcome to `sink` before
/// the next host is queried. Stops at the first sink error.
pub fn run_sequential<A, F>(
    enumerator: &SessionEnumerator<A>,
    hosts: &[String],
    level: SessionLevel,
    mut sink: F,
) -> Result<BatchSummary>
where
    A: NetApi,
    F: FnMut(HostOutcome) -> Result<()>,
{
    let mut summary = BatchSummary::default();
    for host in hosts.iter().map(|host| host.trim()).filter(|host| !host.is_empty()) {
        let outcome = enumerate_host(enumerator, host, level);
        summary.record(&outcome);
        sink(outcome)?;
    }
    Ok(summary)
}

/// Enumerate `hosts` on up to `threads` blocking workers. Outcomes reach
/// `sink` in the order of `hosts`, each as soon as it and every earlier host
/// have finished.
pub async fn run_parallel<A, F>(
    enumerator: Arc<SessionEnumerator<A>>,
    hosts: Vec<String>,
    level: SessionLevel,
    threads: usize,
    mut sink: F,
) -> Result<BatchSummary>
where
    A: NetApi + Send + Sync + 'static,
    F: FnMut(HostOutcome) -> Result<()>,
{
    let permits = Arc::new(Semaphore::new(threads.max(1)));
    let mut handles = Vec::with_capacity(hosts.len());

    for host in hosts {
        let host = host.trim().to_string();
        if host.is_empty() {
            continue;
        }
        let permits = Arc::clone(&permits);
        let enumerator = Arc::clone(&enumerator);
        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await.context("worker pool closed")?;
            let outcome = tokio::task::spawn_blocking(move || enumerate_host(&*enumerator, &host, level))
                .await
                .context("enumeration worker panicked")?;
            anyhow::Ok(outcome)
        }));
    }

    let mut summary = BatchSummary::default();
    for handle in handles {
        let outcome = handle.await.context("enumeration task failed")??;
        summary.record(&outcome);
        sink(outcome)?;
    }
    Ok(summary)
}

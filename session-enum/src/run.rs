//========================================================================
// MODE HANDLING
//========================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::api::NetApi;
use crate::batch::{run_parallel, run_sequential, BatchSummary, HostOutcome};
use crate::config::Args;
use crate::enumerator::SessionEnumerator;
use crate::output::{create_output_writer, write_outcome};

/// Open the output, then enumerate every target host, writing each host's
/// sessions as soon as they are known.
pub async fn run<A>(args: &Args, api: A) -> Result<BatchSummary>
where
    A: NetApi + Send + Sync + 'static,
{
    let hosts = args.hosts()?;
    info!("Hosts to enumerate: {}", hosts.len());
    info!("Level: {}", args.level);
    if let Some(path) = &args.output {
        info!("Output NDJSON: {}", path.display());
    }

    let mut writer = create_output_writer(args.output.as_deref())?;
    let sink = |outcome: HostOutcome| -> Result<()> {
        write_outcome(&outcome, &mut *writer)
            .with_context(|| format!("Failed to write sessions for {}", outcome.host))?;
        Ok(())
    };

    let enumerator = SessionEnumerator::new(api);
    let summary = if args.threads > 1 {
        info!("Workers: {}", args.threads);
        run_parallel(Arc::new(enumerator), hosts, args.level, args.threads, sink).await?
    } else {
        run_sequential(&enumerator, &hosts, args.level, sink)?
    };

    info!(
        "Done! {} session(s) from {} host(s), {} failed",
        summary.sessions, summary.hosts, summary.failed
    );
    Ok(summary)
}

//! # Triage Orchestrator
//!
//! Coordinates a full triage run:
//! 1. Resolve every structure through the descriptor provider, on the
//!    blocking pool, each call bounded by a timeout
//! 2. Turn provider trouble (timeouts, panics, parse failures) into
//!    unparsed candidates
//! 3. Run the filtering pipeline off the async runtime
//! 4. Return the audit together with timing
//!
//! The pipeline itself never blocks or times out; everything slow lives in
//! the provider, so that is where the timeout goes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tracing::{info, warn};

use descriptors::DescriptorProvider;
use pipeline::{FilteringPipeline, PipelineAudit, PipelineOutput};
use sources::{Candidate, CandidateResolver};

/// How one descriptor lookup ended.
enum Resolution {
    Resolved(Candidate),
    TimedOut(Candidate),
}

/// Outcome of one triage run.
#[derive(Debug, Clone)]
pub struct TriageReport {
    pub audit: PipelineAudit,
    /// Identifiers whose descriptor lookup exceeded the timeout
    pub timed_out: Vec<String>,
    pub elapsed: Duration,
}

impl TriageReport {
    /// Passing result sets per stage.
    pub fn output(&self) -> PipelineOutput {
        self.audit.passing()
    }

    /// Identifiers that carried no descriptors, for whatever reason.
    pub fn unparsed(&self) -> &[String] {
        &self.audit.unparsed
    }
}

/// Runs candidates through a provider and a filtering pipeline.
#[derive(Clone)]
pub struct TriageOrchestrator {
    resolver: CandidateResolver,
    pipeline: Arc<FilteringPipeline>,
    provider_timeout: Option<Duration>,
    max_in_flight: usize,
}

impl TriageOrchestrator {
    pub fn new(provider: Arc<dyn DescriptorProvider>, pipeline: Arc<FilteringPipeline>) -> Self {
        let max_in_flight = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self {
            resolver: CandidateResolver::new(provider),
            pipeline,
            provider_timeout: None,
            max_in_flight,
        }
    }

    /// Give up on a single descriptor lookup after `timeout`.
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = Some(timeout);
        self
    }

    /// Limit concurrent provider calls.
    ///
    /// A call that timed out still counts until the provider returns.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Main entry point: triage a list of structure identifiers.
    ///
    /// Never fails because of the candidates themselves; an error here
    /// means the runtime could not run the work at all.
    pub async fn triage(&self, ids: Vec<String>) -> Result<TriageReport> {
        let start_time = Instant::now();

        let (candidates, timed_out) = self.resolve(ids).await?;
        info!(
            "Resolved {} candidates ({} unparsed, {} timed out)",
            candidates.len(),
            candidates.iter().filter(|c| !c.is_parsed()).count(),
            timed_out.len()
        );

        let audit = self.run_pipeline(candidates).await?;
        for stage in &audit.stages {
            info!("Stage {}: {} passed", stage.stage, stage.passed().count());
        }

        let elapsed = start_time.elapsed();
        info!("Triage of {} candidates took {:.2?}", audit.examined, elapsed);

        Ok(TriageReport {
            audit,
            timed_out,
            elapsed,
        })
    }

    /// Resolve every identifier, keeping input order.
    async fn resolve(&self, ids: Vec<String>) -> Result<(Vec<Candidate>, Vec<String>)> {
        let permits = Arc::new(Semaphore::new(self.max_in_flight));
        let mut tasks = JoinSet::new();

        for (index, id) in ids.into_iter().enumerate() {
            let resolver = self.resolver.clone();
            let permits = permits.clone();
            let timeout = self.provider_timeout;
            tasks.spawn(async move {
                let permit = permits
                    .acquire_owned()
                    .await
                    .context("Provider semaphore closed")?;
                Ok::<_, anyhow::Error>((index, resolve_one(resolver, id, timeout, permit).await))
            });
        }

        let mut resolved = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            resolved.push(joined.context("Resolution task panicked")??);
        }
        resolved.sort_by_key(|(index, _)| *index);

        let mut timed_out = Vec::new();
        let candidates = resolved
            .into_iter()
            .map(|(_, resolution)| match resolution {
                Resolution::Resolved(c) => c,
                Resolution::TimedOut(c) => {
                    timed_out.push(c.id.clone());
                    c
                }
            })
            .collect();
        Ok((candidates, timed_out))
    }

    /// Evaluate the pipeline on the blocking pool
    async fn run_pipeline(&self, candidates: Vec<Candidate>) -> Result<PipelineAudit> {
        let pipeline = self.pipeline.clone();
        tokio::task::spawn_blocking(move || pipeline.audit(&candidates))
            .await
            .context("Pipeline task panicked")
    }
}

/// Look up one structure. Every failure mode ends as an unparsed candidate.
///
/// The permit moves into the blocking call, so a lookup abandoned by the
/// timeout keeps its slot until the provider actually returns.
async fn resolve_one(
    resolver: CandidateResolver,
    id: String,
    timeout: Option<Duration>,
    permit: OwnedSemaphorePermit,
) -> Resolution {
    let provider = resolver.provider_name().to_string();
    let lookup = tokio::task::spawn_blocking({
        let id = id.clone();
        move || {
            let candidate = resolver.resolve_one(&id);
            drop(permit);
            candidate
        }
    });

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, lookup).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!("{} did not answer for {} within {:?}", provider, id, limit);
                return Resolution::TimedOut(Candidate::unparsed(id));
            }
        },
        None => lookup.await,
    };

    match joined {
        Ok(candidate) => Resolution::Resolved(candidate),
        Err(e) => {
            warn!("{} failed on {}: {}", provider, id, e);
            Resolution::Resolved(Candidate::unparsed(id))
        }
    }
}

//! Tests for the triage orchestrator.

use descriptors::{names, DescriptorMap, DescriptorProvider, DescriptorTable, ParseFailure};
use pipeline::PipelineConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use triage::TriageOrchestrator;

fn create_test_table() -> DescriptorTable {
    let mut table = DescriptorTable::new();
    for (id, mw, logp) in [("CCO", 46.069, -0.0014), ("CC(=O)O", 60.052, 0.0909), ("CC(C)O", 60.096, 0.3887)] {
        table.insert(
            id,
            DescriptorMap::new()
                .with(names::MOLECULAR_WEIGHT, mw)
                .with(names::LOGP, logp)
                .with(names::H_BOND_DONORS, 1.0)
                .with(names::H_BOND_ACCEPTORS, 1.0),
        );
    }
    table
}

fn orchestrator(provider: Arc<dyn DescriptorProvider>) -> TriageOrchestrator {
    let pipeline = PipelineConfig::default()
        .select(&["rule_of_five".to_string()])
        .unwrap()
        .build_pipeline()
        .unwrap();
    TriageOrchestrator::new(provider, Arc::new(pipeline))
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Sleeps on a chosen structure, panics on another.
struct FlakyProvider {
    inner: DescriptorTable,
}

impl DescriptorProvider for FlakyProvider {
    fn name(&self) -> &str {
        "flaky"
    }

    fn compute(&self, candidate_id: &str) -> Result<DescriptorMap, ParseFailure> {
        match candidate_id {
            "slow" => {
                std::thread::sleep(Duration::from_millis(500));
                Ok(DescriptorMap::new())
            }
            "boom" => panic!("predictor crashed"),
            other => self.inner.compute(other),
        }
    }
}

#[tokio::test]
async fn test_triage_end_to_end() {
    let triage = orchestrator(Arc::new(create_test_table()));
    let report = triage
        .triage(ids(&["CCO", "not_a_molecule", "CC(=O)O", "CC(C)O"]))
        .await
        .unwrap();

    let output = report.output();
    assert_eq!(
        output.get("rule_of_five").unwrap().candidate_ids(),
        vec!["CCO", "CC(=O)O", "CC(C)O"]
    );
    assert_eq!(report.unparsed(), ["not_a_molecule"]);
    assert_eq!(report.audit.examined, 4);
    assert!(report.timed_out.is_empty());
}

#[tokio::test]
async fn test_empty_input() {
    let report = orchestrator(Arc::new(create_test_table()))
        .triage(Vec::new())
        .await
        .unwrap();
    assert_eq!(report.audit.examined, 0);
    assert!(report.output().get("rule_of_five").unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_provider_times_out() {
    let provider = FlakyProvider {
        inner: create_test_table(),
    };
    let triage = orchestrator(Arc::new(provider)).with_provider_timeout(Duration::from_millis(50));

    let report = triage.triage(ids(&["slow", "CCO"])).await.unwrap();

    assert_eq!(report.timed_out, vec!["slow"]);
    assert_eq!(report.unparsed(), ["slow"]);
    assert_eq!(
        report.output().get("rule_of_five").unwrap().candidate_ids(),
        vec!["CCO"]
    );
}

/// Never answers in time and records how many calls overlap.
#[derive(Default)]
struct StallingProvider {
    live: AtomicUsize,
    peak: AtomicUsize,
}

impl DescriptorProvider for StallingProvider {
    fn name(&self) -> &str {
        "stalling"
    }

    fn compute(&self, _candidate_id: &str) -> Result<DescriptorMap, ParseFailure> {
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(live, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(100));
        self.live.fetch_sub(1, Ordering::SeqCst);
        Ok(DescriptorMap::new())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_timed_out_lookups_still_count_against_max_in_flight() {
    let provider = Arc::new(StallingProvider::default());
    let triage = orchestrator(provider.clone())
        .with_max_in_flight(2)
        .with_provider_timeout(Duration::from_millis(10));

    let report = triage
        .triage(ids(&["a", "b", "c", "d", "e", "f"]))
        .await
        .unwrap();

    assert_eq!(report.timed_out, vec!["a", "b", "c", "d", "e", "f"]);
    let peak = provider.peak.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= 2, "peak concurrent provider calls: {peak}");
}

#[tokio::test]
async fn test_panicking_provider_is_a_parse_failure() {
    let provider = FlakyProvider {
        inner: create_test_table(),
    };
    let report = orchestrator(Arc::new(provider))
        .with_max_in_flight(1)
        .triage(ids(&["boom", "CC(C)O"]))
        .await
        .unwrap();

    assert_eq!(report.unparsed(), ["boom"]);
    assert_eq!(
        report.output().get("rule_of_five").unwrap().candidate_ids(),
        vec!["CC(C)O"]
    );
}

#[tokio::test]
async fn test_input_order_preserved_under_concurrency() {
    let order = ["CC(C)O", "CCO", "x1", "CC(=O)O", "CCO", "x2", "CC(C)O"];
    let report = orchestrator(Arc::new(create_test_table()))
        .with_max_in_flight(3)
        .triage(ids(&order))
        .await
        .unwrap();

    assert_eq!(
        report.output().get("rule_of_five").unwrap().candidate_ids(),
        vec!["CC(C)O", "CCO", "CC(=O)O", "CCO", "CC(C)O"]
    );
    assert_eq!(report.unparsed(), ["x1", "x2"]);
}

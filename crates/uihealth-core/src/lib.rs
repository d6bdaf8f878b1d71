//! # uihealth Core
//!
//! The evaluation pipeline: bounded probing, expectation evaluation, page-wide
//! severity indicators, screenshot evidence, report aggregation, and the run
//! drivers that tie them together for the structural and agent strategies.

pub mod driver;
pub mod error;
pub mod evaluator;
pub mod evidence;
pub mod probe;
pub mod report;
pub mod severity;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use driver::{AgentRunner, RunOutcome, StructuralRunner};
pub use error::{EvaluatorError, EvidenceError, RunError, StoreError};
pub use evaluator::{AssertionEvaluator, Outcome};
pub use evidence::{CapturedEvidence, EvidenceCapturer, slug_for_name, slug_for_path};
pub use probe::{ProbePolicy, probe};
pub use report::{Clock, FixedClock, ReportAggregator, ReportWriter, SystemClock, partition_key};
pub use severity::{PageFindings, SeverityClassifier};
pub use store::{ArtifactStore, FsArtifactStore, MemoryArtifactStore};

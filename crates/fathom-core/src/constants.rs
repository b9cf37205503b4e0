/// Fathom version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Feedback message used when an answer cites evidence it was not given.
pub const CITATION_INTEGRITY_FAILURE: &str = "citation integrity failure";

/// Prefix of evaluator feedback when the judgment could not be obtained.
pub const UNABLE_TO_VERIFY: &str = "unable to verify";

/// Disclosure attached to answers that never passed evaluation.
pub const LOW_CONFIDENCE_DISCLOSURE: &str = "This answer could not be verified against the retrieved evidence within the allowed number of research rounds. Treat it as low confidence.";

/// Disclosure attached when the run deadline expired before any answer was produced.
pub const TIMED_OUT_DISCLOSURE: &str = "The research run timed out before an answer could be produced.";

/// Upper bound on any configured sub-query count.
pub const MAX_SUB_QUERIES_CEILING: usize = 12;

/// Upper bound on the re-rank pool regardless of configuration.
pub const MAX_RERANK_POOL_CEILING: usize = 500;

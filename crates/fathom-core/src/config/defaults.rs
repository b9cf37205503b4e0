// Single source of truth for all default values.

// --- Fusion ---
pub const DEFAULT_SEMANTIC_WEIGHT: f64 = 0.7;
pub const DEFAULT_KEYWORD_WEIGHT: f64 = 0.3;

// --- Bias ---
pub const DEFAULT_BIAS_FLOOR: f64 = 0.60;
pub const DEFAULT_BOOST_FACTOR: f64 = 1.05;

// --- Retrieval ---
pub const DEFAULT_PER_QUERY_LIMIT: usize = 20;
pub const DEFAULT_FANOUT_CONCURRENCY: usize = 8;
pub const DEFAULT_INDEX_TIMEOUT_MS: u64 = 20_000;
pub const DEFAULT_INDEX_RETRIES: u32 = 1;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;
pub const DEFAULT_RERANK_POOL_SIZE: usize = 100;
pub const DEFAULT_TOP_K: usize = 20;
pub const DEFAULT_SNIPPET_CHARS: usize = 300;

// --- Agents ---
pub const DEFAULT_MODEL_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MODEL_RETRIES: u32 = 1;
pub const DEFAULT_ORCHESTRATOR_TEMPERATURE: f64 = 0.0;
pub const DEFAULT_DIRECT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_PLANNER_TEMPERATURE: f64 = 0.4;
pub const DEFAULT_RERANKER_TEMPERATURE: f64 = 0.0;
pub const DEFAULT_SYNTHESISER_TEMPERATURE: f64 = 0.3;
pub const DEFAULT_EVALUATOR_TEMPERATURE: f64 = 0.0;
pub const DEFAULT_MIN_SUB_QUERIES: usize = 3;
pub const DEFAULT_MAX_SUB_QUERIES: usize = 6;
pub const DEFAULT_CLASSIFICATION_CACHE_CAPACITY: u64 = 1_024;

// --- Evaluation ---
pub const DEFAULT_REJECT_THRESHOLD: f64 = 0.3;
pub const DEFAULT_MIN_CLAIM_OVERLAP: f64 = 0.2;

// --- Pipeline ---
pub const DEFAULT_MAX_ROUNDS: u32 = 2;
pub const DEFAULT_OUTER_DEADLINE_MS: u64 = 120_000;

// --- Validation ---
pub const DEFAULT_MAX_MEAN_HALLUCINATION: f64 = 0.05;
pub const DEFAULT_MIN_MEAN_QUALITY: f64 = 0.80;
pub const DEFAULT_MIN_PASS_RATE: f64 = 0.90;
pub const DEFAULT_MAX_MEAN_LATENCY_MS: u64 = 300_000;
pub const DEFAULT_MIN_GROUP_SAMPLES: u64 = 3;
pub const DEFAULT_MIN_GROUP_QUALITY: f64 = 0.60;
pub const DEFAULT_MAX_GROUP_GAP: f64 = 0.20;

// --- Providers ---
pub const DEFAULT_MODEL_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL_NAME: &str = "llama3.1:8b";
pub const DEFAULT_INDEX_API_KEY_ENV: &str = "FATHOM_INDEX_API_KEY";

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;

// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "citespine.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Retrieval ---
pub const DEFAULT_AS_OF: &str = "2023-12-31";
pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_PROBES: usize = 8;
pub const MAX_TOP_K: usize = 100;

// --- Router ---
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 100;
pub const DEFAULT_BACKOFF_CAP_MS: u64 = 2_000;
pub const DEFAULT_BACKEND_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 32;

// --- Local backend ---
pub const DEFAULT_PARTITION_BITS: u32 = 4;
pub const DEFAULT_PARTITION_SEED: u64 = 0x5EED_C17E;

// --- Remote backend ---
pub const DEFAULT_REMOTE_NAMESPACE: &str = "default";
pub const DEFAULT_REMOTE_INDEX: &str = "citespine";
pub const DEFAULT_REMOTE_API_KEY_ENV: &str = "CITESPINE_REMOTE_API_KEY";
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 5_000;

// --- Grounding ---
pub const DEFAULT_ENTAILMENT_THRESHOLD: f64 = 0.5;
pub const DEFAULT_MAX_CLAIMS: usize = 5;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_MODEL: &str = "hashed-384";
pub const DEFAULT_EMBED_CACHE_SIZE: u64 = 10_000;
pub const DEFAULT_EMBED_CACHE_TTL_SECS: u64 = 86_400;
pub const DEFAULT_EMBED_API_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_EMBED_API_MAX_RETRIES: u32 = 3;
pub const DEFAULT_EMBED_API_COOLDOWN_MS: u64 = 30_000;

// --- Manifest / replay ---
pub const DEFAULT_MANIFEST_DIR: &str = "data/manifests";
pub const DEFAULT_ANSWER_SIMILARITY_THRESHOLD: f64 = 0.95;

// --- Parity ---
pub const DEFAULT_COVERAGE_FLOOR: f64 = 0.6;
pub const DEFAULT_PARITY_TOP_K: usize = 10;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LATENCY_BUDGET_MS: u64 = 8_000;
pub const DEFAULT_LATENCY_WINDOW: usize = 1_024;

// --- Vocabulary ---
pub const DEFAULT_FRAMEWORKS: &[(&str, &[&str])] = &[
    ("IFRS", &["International Financial Reporting Standards", "IAS"]),
    ("US_GAAP", &["US GAAP", "U.S. GAAP", "GAAP", "ASC"]),
    ("Other", &[]),
];

pub const DEFAULT_JURISDICTIONS: &[(&str, &[&str])] = &[
    ("US", &["U.S.", "USA", "United States"]),
    ("EU", &["European Union", "ESMA"]),
    ("UK", &["United Kingdom", "GB", "Great Britain"]),
    ("Global", &["International", "Worldwide"]),
    ("Other", &[]),
];

pub const DEFAULT_DOC_TYPES: &[(&str, &[&str])] = &[
    ("standard", &["standards"]),
    ("release", &["press release"]),
    ("order", &[]),
    ("manual", &["handbook"]),
    ("guidelines", &["guideline", "guidance"]),
    ("policy", &[]),
    ("filing", &["10-K", "annual report"]),
    ("memo", &["memorandum"]),
    ("qna", &["Q&A", "FAQ"]),
    ("staff_alert", &["staff alert", "audit practice alert"]),
];

pub const DEFAULT_AUTHORITY_LEVELS: &[(&str, &[&str])] = &[
    ("authoritative", &["binding", "normative"]),
    ("interpretive", &["interpretation", "non-authoritative"]),
    ("internal_policy", &["internal policy", "internal"]),
];

// Module declarations
pub mod assignment;
pub mod config;
pub mod entities;
pub mod significance;
pub mod similarity;
#[cfg(test)]
mod tests;
pub mod types;

pub use types::*;

pub use assignment::{build_clusters, build_clusters_at, should_cluster};
pub use config::ClusterConfig;
pub use entities::aggregate_entities;
pub use significance::{score, score_at, score_breakdown_at, ScoreBreakdown};
pub use similarity::{normalize_text, significant_tokens, tag_overlap, text_similarity};

/// Title similarity above which two articles are always clustered
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.4;

/// Tag overlap above which two articles are always clustered
pub const TAG_OVERLAP_THRESHOLD: f64 = 0.6;

/// Title similarity required when both articles share a category
pub const CATEGORY_TITLE_SIMILARITY_THRESHOLD: f64 = 0.25;

/// Tokens with fewer characters than this are ignored when comparing titles
pub const MIN_TOKEN_CHARS: usize = 4;

/// Weight of the editorial importance signal in the composite score
pub const IMPORTANCE_WEIGHT: f64 = 0.4;

/// Weight of the external relevance signal in the composite score
pub const RELEVANCE_WEIGHT: f64 = 0.4;

/// Value used for a missing editorial importance or external relevance
pub const DEFAULT_SIGNAL: f64 = 50.0;

pub const FRESH_WINDOW_HOURS: i64 = 24;
pub const RECENT_WINDOW_HOURS: i64 = 72;
pub const FRESH_BONUS: f64 = 20.0;
pub const RECENT_BONUS: f64 = 10.0;

/// Bonus for articles carrying at least one extracted person or organization
pub const ENRICHMENT_BONUS: f64 = 10.0;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::config::ClusterConfig;
use super::types::Article;
use crate::util::parse_date;
use crate::TARGET_SCORING;

/// Components of an article's composite relevance score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    /// Weighted editorial importance plus weighted external relevance
    pub base: f64,
    pub freshness: f64,
    pub enrichment: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.base + self.freshness + self.enrichment
    }
}

/// Calculates the composite relevance score of an article against the current time
pub fn score(article: &Article, config: &ClusterConfig) -> f64 {
    score_at(article, config, Utc::now())
}

/// Calculates the composite relevance score of an article
///
/// The score is based on:
/// - Editorial importance and external relevance, weighted equally (50 when missing)
/// - A freshness bonus for articles published within the fresh or recent window
/// - An enrichment bonus for articles with extracted people or organizations
///
/// # Arguments
/// * `article` - The article to score
/// * `config` - Weights and bonuses
/// * `now` - The instant article age is measured against
pub fn score_at(article: &Article, config: &ClusterConfig, now: DateTime<Utc>) -> f64 {
    score_breakdown_at(article, config, now).total()
}

pub fn score_breakdown_at(
    article: &Article,
    config: &ClusterConfig,
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    let importance = article
        .editorial_importance
        .unwrap_or(config.default_importance);
    let relevance = article
        .external_relevance
        .unwrap_or(config.default_relevance);

    let breakdown = ScoreBreakdown {
        base: importance * config.importance_weight + relevance * config.relevance_weight,
        freshness: freshness_bonus(article, config, now),
        enrichment: if article.has_entities() {
            config.enrichment_bonus
        } else {
            0.0
        },
    };

    debug!(
        target: TARGET_SCORING,
        "Article {} scored {:.2} (base {:.2}, freshness {:.0}, enrichment {:.0})",
        article.id,
        breakdown.total(),
        breakdown.base,
        breakdown.freshness,
        breakdown.enrichment
    );

    breakdown
}

/// Bonus for recent publication; 0 when the timestamp is missing or unreadable
///
/// Timestamps in the future have a negative age and count as fresh.
pub fn freshness_bonus(article: &Article, config: &ClusterConfig, now: DateTime<Utc>) -> f64 {
    let Some(raw) = article.published_at.as_deref() else {
        return 0.0;
    };

    let Some(published) = parse_date(raw) else {
        debug!(
            target: TARGET_SCORING,
            "Ignoring unparseable publication date {:?} on article {}", raw, article.id
        );
        return 0.0;
    };

    let age = now.signed_duration_since(published);
    if age < Duration::hours(config.fresh_window_hours) {
        config.fresh_bonus
    } else if age < Duration::hours(config.recent_window_hours) {
        config.recent_bonus
    } else {
        0.0
    }
}

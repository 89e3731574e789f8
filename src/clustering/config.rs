use anyhow::{bail, Result};
use tracing::debug;

use super::{
    CATEGORY_TITLE_SIMILARITY_THRESHOLD, DEFAULT_SIGNAL, ENRICHMENT_BONUS, FRESH_BONUS,
    FRESH_WINDOW_HOURS, IMPORTANCE_WEIGHT, RECENT_BONUS, RECENT_WINDOW_HOURS, RELEVANCE_WEIGHT,
    TAG_OVERLAP_THRESHOLD, TITLE_SIMILARITY_THRESHOLD,
};
use crate::environment::get_env_var_parsed;
use crate::TARGET_CLUSTERING;

pub const ENV_TITLE_THRESHOLD: &str = "PRESSROOM_TITLE_THRESHOLD";
pub const ENV_TAG_THRESHOLD: &str = "PRESSROOM_TAG_THRESHOLD";
pub const ENV_CATEGORY_TITLE_THRESHOLD: &str = "PRESSROOM_CATEGORY_TITLE_THRESHOLD";

/// Thresholds and weights used by the scorer and the cluster builder
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    pub title_threshold: f64,
    pub tag_threshold: f64,
    pub category_title_threshold: f64,
    pub importance_weight: f64,
    pub relevance_weight: f64,
    pub default_importance: f64,
    pub default_relevance: f64,
    pub fresh_window_hours: i64,
    pub recent_window_hours: i64,
    pub fresh_bonus: f64,
    pub recent_bonus: f64,
    pub enrichment_bonus: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            title_threshold: TITLE_SIMILARITY_THRESHOLD,
            tag_threshold: TAG_OVERLAP_THRESHOLD,
            category_title_threshold: CATEGORY_TITLE_SIMILARITY_THRESHOLD,
            importance_weight: IMPORTANCE_WEIGHT,
            relevance_weight: RELEVANCE_WEIGHT,
            default_importance: DEFAULT_SIGNAL,
            default_relevance: DEFAULT_SIGNAL,
            fresh_window_hours: FRESH_WINDOW_HOURS,
            recent_window_hours: RECENT_WINDOW_HOURS,
            fresh_bonus: FRESH_BONUS,
            recent_bonus: RECENT_BONUS,
            enrichment_bonus: ENRICHMENT_BONUS,
        }
    }
}

impl ClusterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration with the similarity thresholds overridden from
    /// the environment, where set.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = get_env_var_parsed::<f64>(ENV_TITLE_THRESHOLD)? {
            config = config.with_title_threshold(value);
        }
        if let Some(value) = get_env_var_parsed::<f64>(ENV_TAG_THRESHOLD)? {
            config = config.with_tag_threshold(value);
        }
        if let Some(value) = get_env_var_parsed::<f64>(ENV_CATEGORY_TITLE_THRESHOLD)? {
            config = config.with_category_title_threshold(value);
        }

        config.validate()?;
        debug!(target: TARGET_CLUSTERING, "Loaded cluster configuration: {:?}", config);
        Ok(config)
    }

    pub fn with_title_threshold(mut self, threshold: f64) -> Self {
        self.title_threshold = threshold;
        self
    }

    pub fn with_tag_threshold(mut self, threshold: f64) -> Self {
        self.tag_threshold = threshold;
        self
    }

    pub fn with_category_title_threshold(mut self, threshold: f64) -> Self {
        self.category_title_threshold = threshold;
        self
    }

    pub fn with_weights(mut self, importance_weight: f64, relevance_weight: f64) -> Self {
        self.importance_weight = importance_weight;
        self.relevance_weight = relevance_weight;
        self
    }

    pub fn with_freshness(
        mut self,
        fresh_window_hours: i64,
        fresh_bonus: f64,
        recent_window_hours: i64,
        recent_bonus: f64,
    ) -> Self {
        self.fresh_window_hours = fresh_window_hours;
        self.fresh_bonus = fresh_bonus;
        self.recent_window_hours = recent_window_hours;
        self.recent_bonus = recent_bonus;
        self
    }

    pub fn with_enrichment_bonus(mut self, bonus: f64) -> Self {
        self.enrichment_bonus = bonus;
        self
    }

    /// Rejects thresholds outside [0, 1] and inverted freshness windows.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("title threshold", self.title_threshold),
            ("tag threshold", self.tag_threshold),
            ("category title threshold", self.category_title_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("The {} must be between 0.0 and 1.0, got {}", name, value);
            }
        }

        if self.fresh_window_hours > self.recent_window_hours {
            bail!(
                "Fresh window ({}h) must not exceed recent window ({}h)",
                self.fresh_window_hours,
                self.recent_window_hours
            );
        }

        Ok(())
    }
}

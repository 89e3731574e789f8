use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, info};

use super::config::ClusterConfig;
use super::entities::aggregate_entities;
use super::significance::score_at;
use super::similarity::{jaccard, overlap_coefficient, significant_tokens, tag_set};
use super::types::{Article, ArticleCluster};
use crate::TARGET_CLUSTERING;

/// Comparison inputs derived once per article so each pair check is set math only
struct ArticleSignals<'a> {
    article: &'a Article,
    score: f64,
    title_tokens: HashSet<String>,
    tags: HashSet<String>,
}

impl<'a> ArticleSignals<'a> {
    fn new(article: &'a Article, score: f64) -> Self {
        Self {
            article,
            score,
            title_tokens: significant_tokens(&article.title),
            tags: tag_set(&article.tags),
        }
    }
}

/// Decides whether `candidate` covers the same story as `lead`
///
/// True if any of:
/// - title similarity exceeds the title threshold
/// - tag overlap exceeds the tag threshold
/// - both carry the same category and title similarity exceeds the category title threshold
fn signals_match(
    lead: &ArticleSignals,
    candidate: &ArticleSignals,
    config: &ClusterConfig,
) -> bool {
    let title_similarity = jaccard(&lead.title_tokens, &candidate.title_tokens);
    if title_similarity > config.title_threshold {
        debug!(
            target: TARGET_CLUSTERING,
            "Title match: {} ~ {} ({:.3})", lead.article.id, candidate.article.id, title_similarity
        );
        return true;
    }

    let tag_overlap = overlap_coefficient(&lead.tags, &candidate.tags);
    if tag_overlap > config.tag_threshold {
        debug!(
            target: TARGET_CLUSTERING,
            "Tag match: {} ~ {} ({:.3})", lead.article.id, candidate.article.id, tag_overlap
        );
        return true;
    }

    match (&lead.article.category, &candidate.article.category) {
        (Some(a), Some(b)) if a == b && title_similarity > config.category_title_threshold => {
            debug!(
                target: TARGET_CLUSTERING,
                "Category match: {} ~ {} in '{}' ({:.3})",
                lead.article.id,
                candidate.article.id,
                a,
                title_similarity
            );
            true
        }
        _ => false,
    }
}

/// Whether two articles would be grouped into the same cluster
pub fn should_cluster(a: &Article, b: &Article, config: &ClusterConfig) -> bool {
    signals_match(&ArticleSignals::new(a, 0.0), &ArticleSignals::new(b, 0.0), config)
}

/// Groups a batch of articles into clusters, scoring against the current time
pub fn build_clusters(articles: &[Article], config: &ClusterConfig) -> Vec<ArticleCluster> {
    build_clusters_at(articles, config, Utc::now())
}

/// Groups a batch of articles into clusters of near-duplicate coverage
///
/// This function:
/// 1. Scores every article against `now`
/// 2. Orders articles by descending score, keeping input order for equal scores
/// 3. Walks that order; each article not yet claimed becomes a lead and claims
///    every later unclaimed article that matches it
///
/// Clusters are returned in the order their leads were processed. Every input
/// article ends up in exactly one cluster. The input is never modified.
///
/// # Arguments
/// * `articles` - The batch to cluster
/// * `config` - Thresholds and scoring weights
/// * `now` - The instant used for freshness, shared by the whole batch
///
/// # Returns
/// * `Vec<ArticleCluster>` - Clusters ordered by descending lead score
pub fn build_clusters_at(
    articles: &[Article],
    config: &ClusterConfig,
    now: DateTime<Utc>,
) -> Vec<ArticleCluster> {
    if articles.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<ArticleSignals> = articles
        .iter()
        .map(|article| ArticleSignals::new(article, score_at(article, config, now)))
        .collect();

    // sort_by is stable, which is the tie-break for equal scores
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    // Claimed positions in `ranked`; local to this pass
    let mut used = vec![false; ranked.len()];
    let mut clusters = Vec::new();

    for lead_pos in 0..ranked.len() {
        if used[lead_pos] {
            continue;
        }
        used[lead_pos] = true;

        let lead = &ranked[lead_pos];
        let mut related: Vec<&Article> = Vec::new();

        for (pos, candidate) in ranked.iter().enumerate().skip(lead_pos + 1) {
            if used[pos] {
                continue;
            }
            if signals_match(lead, candidate, config) {
                used[pos] = true;
                related.push(candidate.article);
            }
        }

        let entities =
            aggregate_entities(std::iter::once(lead.article).chain(related.iter().copied()));

        clusters.push(ArticleCluster {
            lead_article: lead.article.clone(),
            related_articles: related.into_iter().cloned().collect(),
            relevance_score: lead.score,
            entities,
        });
    }

    info!(
        target: TARGET_CLUSTERING,
        "Grouped {} articles into {} clusters",
        articles.len(),
        clusters.len()
    );

    clusters
}

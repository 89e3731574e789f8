use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clustering::{ArticleCluster, ClusterEntities};
use crate::TARGET_CLUSTERING;

/// One story in the ranked feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    /// 1-based position in the feed
    pub rank: usize,
    pub lead_id: String,
    pub lead_title: String,
    pub relevance_score: f64,
    pub cluster_size: usize,
    pub related_ids: Vec<String>,
    pub entities: ClusterEntities,
}

/// Summary of a clustering pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStats {
    pub article_count: usize,
    pub cluster_count: usize,
    pub singleton_count: usize,
    pub largest_cluster: usize,
}

impl FeedStats {
    pub fn from_clusters(clusters: &[ArticleCluster]) -> Self {
        FeedStats {
            article_count: clusters.iter().map(ArticleCluster::size).sum(),
            cluster_count: clusters.len(),
            singleton_count: clusters.iter().filter(|c| c.is_singleton()).count(),
            largest_cluster: clusters.iter().map(ArticleCluster::size).max().unwrap_or(0),
        }
    }
}

/// Clusters flattened into display-ready entries, best story first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedFeed {
    pub entries: Vec<FeedEntry>,
    pub stats: FeedStats,
}

impl RankedFeed {
    /// Builds the feed from clusters already ordered by descending lead score
    pub fn from_clusters(clusters: &[ArticleCluster]) -> Self {
        let entries = clusters
            .iter()
            .enumerate()
            .map(|(index, cluster)| FeedEntry {
                rank: index + 1,
                lead_id: cluster.lead_article.id.clone(),
                lead_title: cluster.lead_article.title.clone(),
                relevance_score: cluster.relevance_score,
                cluster_size: cluster.size(),
                related_ids: cluster
                    .related_articles
                    .iter()
                    .map(|article| article.id.clone())
                    .collect(),
                entities: cluster.entities.clone(),
            })
            .collect();

        let stats = FeedStats::from_clusters(clusters);
        info!(
            target: TARGET_CLUSTERING,
            "Feed ready: {} articles, {} clusters ({} singletons, largest {})",
            stats.article_count,
            stats.cluster_count,
            stats.singleton_count,
            stats.largest_cluster
        );

        RankedFeed { entries, stats }
    }

    /// Keeps the first `n` entries; stats still describe the whole pass
    pub fn top(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

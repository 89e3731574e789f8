pub mod batch;
pub mod clustering;
pub mod environment;
pub mod feed;
pub mod logging;
pub mod util;

pub use batch::{bound_batch, exclude_categories, load_articles, parse_articles};
pub use clustering::{build_clusters, build_clusters_at, Article, ArticleCluster, ClusterConfig};
pub use feed::{FeedEntry, FeedStats, RankedFeed};

pub const TARGET_CLUSTERING: &str = "clustering";
pub const TARGET_SCORING: &str = "scoring";
pub const TARGET_BATCH: &str = "batch";

use anyhow::Result;
use clap::{Parser, ValueEnum};
use prettytable::{Cell, Row, Table};
use std::path::PathBuf;
use tracing::info;

use pressroom::clustering::{build_clusters, ClusterConfig, ClusterEntities};
use pressroom::environment::{get_env_var_as_vec, get_env_var_parsed};
use pressroom::{bound_batch, exclude_categories, load_articles, RankedFeed};

/// Clusters a batch of collected articles and prints the ranked feed.
///
/// Usage:
///    cargo run --bin cluster_feed -- articles.json --limit 20
///
/// Environment:
///    PRESSROOM_TITLE_THRESHOLD, PRESSROOM_TAG_THRESHOLD,
///    PRESSROOM_CATEGORY_TITLE_THRESHOLD: similarity thresholds
///    PRESSROOM_MAX_ARTICLES: batch bound
///    PRESSROOM_EXCLUDED_CATEGORIES: `;`-separated categories to skip
#[derive(Parser)]
#[clap(name = "cluster-feed", about = "Group near-duplicate articles into a ranked feed")]
struct Cli {
    /// JSON file holding the article batch
    input: PathBuf,

    /// Output format
    #[clap(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Number of clusters to print
    #[clap(short, long)]
    limit: Option<usize>,

    /// Keep only the N most recently published articles
    #[clap(short, long)]
    max_articles: Option<usize>,

    /// Skip articles in this category (repeatable)
    #[clap(short, long = "exclude-category")]
    exclude_category: Vec<String>,

    /// Title similarity threshold
    #[clap(long)]
    title_threshold: Option<f64>,

    /// Tag overlap threshold
    #[clap(long)]
    tag_threshold: Option<f64>,

    /// Title similarity threshold for articles sharing a category
    #[clap(long)]
    category_title_threshold: Option<f64>,

    /// Also write a daily rolling log file into this directory
    #[clap(long)]
    log_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    pressroom::logging::configure_logging(args.log_dir.as_deref())?;

    let config = build_config(&args)?;

    let mut articles = load_articles(&args.input)?;

    let mut excluded = get_env_var_as_vec("PRESSROOM_EXCLUDED_CATEGORIES", ';');
    excluded.extend(args.exclude_category.iter().cloned());
    articles = exclude_categories(articles, &excluded);

    let max_articles = match args.max_articles {
        Some(max) => Some(max),
        None => get_env_var_parsed::<usize>("PRESSROOM_MAX_ARTICLES")?,
    };
    if let Some(max) = max_articles {
        articles = bound_batch(articles, max);
    }

    info!("Clustering {} articles", articles.len());
    let clusters = build_clusters(&articles, &config);

    let mut feed = RankedFeed::from_clusters(&clusters);
    if let Some(limit) = args.limit {
        feed = feed.top(limit);
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&feed)?),
        OutputFormat::Table => print_table(&feed),
    }

    Ok(())
}

/// Environment values first, command-line flags on top
fn build_config(args: &Cli) -> Result<ClusterConfig> {
    let mut config = ClusterConfig::from_env()?;

    if let Some(threshold) = args.title_threshold {
        config = config.with_title_threshold(threshold);
    }
    if let Some(threshold) = args.tag_threshold {
        config = config.with_tag_threshold(threshold);
    }
    if let Some(threshold) = args.category_title_threshold {
        config = config.with_category_title_threshold(threshold);
    }

    config.validate()?;
    Ok(config)
}

fn print_table(feed: &RankedFeed) {
    if feed.is_empty() {
        println!("No articles to cluster.");
        return;
    }

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Rank"),
        Cell::new("Score"),
        Cell::new("Size"),
        Cell::new("Lead"),
        Cell::new("People"),
        Cell::new("Organizations"),
    ]));

    for entry in &feed.entries {
        table.add_row(Row::new(vec![
            Cell::new(&entry.rank.to_string()),
            Cell::new(&format!("{:.1}", entry.relevance_score)),
            Cell::new(&entry.cluster_size.to_string()),
            Cell::new(&truncate(&entry.lead_title, 60)),
            Cell::new(&join_names(&entry.entities, true)),
            Cell::new(&join_names(&entry.entities, false)),
        ]));
    }

    table.printstd();
    println!(
        "{} articles in {} clusters ({} singletons, largest {})",
        feed.stats.article_count,
        feed.stats.cluster_count,
        feed.stats.singleton_count,
        feed.stats.largest_cluster
    );
}

fn join_names(entities: &ClusterEntities, people: bool) -> String {
    let names = if people {
        &entities.people
    } else {
        &entities.organizations
    };
    names.iter().cloned().collect::<Vec<_>>().join(", ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

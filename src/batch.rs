//! Loading and preparing article batches before clustering.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::clustering::Article;
use crate::util::parse_date;
use crate::TARGET_BATCH;

/// The `{ "articles": [...] }` batch layout
#[derive(Debug, Deserialize)]
struct WrappedBatch {
    articles: Vec<Value>,
}

/// Reads and validates a JSON article batch from disk
pub fn load_articles(path: &Path) -> Result<Vec<Article>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read article batch {}", path.display()))?;

    let articles = parse_articles(&content)
        .with_context(|| format!("Invalid article batch {}", path.display()))?;

    info!(
        target: TARGET_BATCH,
        "Loaded {} articles from {}",
        articles.len(),
        path.display()
    );
    Ok(articles)
}

/// Parses and validates a JSON article batch
///
/// Accepts a bare array or `{ "articles": [...] }`. Records are decoded one by
/// one so an error names the offending article and field. Empty and duplicate
/// ids are rejected, importance and relevance values outside [0, 100] are
/// clamped, and blank tags and entity names are dropped.
pub fn parse_articles(content: &str) -> Result<Vec<Article>> {
    let records: Vec<Value> = if content.trim_start().starts_with('[') {
        serde_json::from_str(content).context("Failed to parse article JSON")?
    } else {
        serde_json::from_str::<WrappedBatch>(content)
            .context("Failed to parse article JSON: expected an array or an `articles` object")?
            .articles
    };

    let mut articles = records
        .iter()
        .enumerate()
        .map(|(index, record)| parse_record(index, record))
        .collect::<Result<Vec<_>>>()?;

    validate_articles(&mut articles)?;
    Ok(articles)
}

fn parse_record(index: usize, record: &Value) -> Result<Article> {
    Article::deserialize(record).with_context(|| {
        let id = record
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<no id>");
        match invalid_field(record) {
            Some(field) => format!(
                "Article at position {} (id {}) has an invalid `{}` field",
                index, id, field
            ),
            None => format!("Article at position {} (id {}) is invalid", index, id),
        }
    })
}

/// Finds the first field that fails to decode on its own
///
/// serde reports what was wrong but not where, so each field is retried
/// alongside a placeholder id.
fn invalid_field(record: &Value) -> Option<String> {
    let fields = record.as_object()?;
    fields
        .iter()
        .find(|(key, value)| {
            let mut single = Map::new();
            single.insert("id".to_string(), Value::String(String::new()));
            single.insert(key.to_string(), (*value).clone());
            Article::deserialize(&Value::Object(single)).is_err()
        })
        .map(|(key, _)| key.clone())
}

fn validate_articles(articles: &mut [Article]) -> Result<()> {
    let mut seen = HashSet::new();

    for (index, article) in articles.iter_mut().enumerate() {
        if article.id.trim().is_empty() {
            bail!("Article at position {} has an empty id", index);
        }
        if !seen.insert(article.id.clone()) {
            bail!("Duplicate article id '{}'", article.id);
        }

        article.strip_blank_names();
        article.editorial_importance =
            clamp_signal(&article.id, "editorialImportance", article.editorial_importance);
        article.external_relevance =
            clamp_signal(&article.id, "externalRelevance", article.external_relevance);
    }

    Ok(())
}

fn clamp_signal(id: &str, field: &str, value: Option<f64>) -> Option<f64> {
    value.map(|v| {
        let clamped = v.clamp(0.0, 100.0);
        if clamped != v {
            warn!(
                target: TARGET_BATCH,
                "Article {}: {} {} out of range, clamped to {}", id, field, v, clamped
            );
        }
        clamped
    })
}

/// Keeps at most `max` articles, preferring the most recently published
///
/// Articles without a readable timestamp are dropped first. Survivors keep
/// their original relative order.
pub fn bound_batch(articles: Vec<Article>, max: usize) -> Vec<Article> {
    if articles.len() <= max {
        return articles;
    }

    let total = articles.len();
    let mut indexed: Vec<(usize, Option<_>, Article)> = articles
        .into_iter()
        .enumerate()
        .map(|(index, article)| {
            let published = article.published_at.as_deref().and_then(parse_date);
            (index, published, article)
        })
        .collect();

    // Newest first; None sorts below every date. Stable, so ties keep input order.
    indexed.sort_by(|a, b| b.1.cmp(&a.1));
    indexed.truncate(max);
    indexed.sort_by_key(|(index, _, _)| *index);

    info!(
        target: TARGET_BATCH,
        "Bounded batch from {} to {} most recent articles", total, max
    );

    indexed.into_iter().map(|(_, _, article)| article).collect()
}

/// Drops articles whose category matches one of `excluded`, ignoring case
pub fn exclude_categories<S: AsRef<str>>(articles: Vec<Article>, excluded: &[S]) -> Vec<Article> {
    if excluded.is_empty() {
        return articles;
    }

    let excluded: HashSet<String> = excluded
        .iter()
        .map(|category| category.as_ref().to_lowercase())
        .collect();

    let before = articles.len();
    let kept: Vec<Article> = articles
        .into_iter()
        .filter(|article| {
            article
                .category
                .as_ref()
                .map_or(true, |category| !excluded.contains(&category.to_lowercase()))
        })
        .collect();

    if kept.len() < before {
        info!(
            target: TARGET_BATCH,
            "Excluded {} articles by category",
            before - kept.len()
        );
    }
    kept
}

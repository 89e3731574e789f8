use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Reads an optional list where upstream may send `null` for "none"
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

/// A collected news item, as supplied by the upstream fetch layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    // ISO 8601, parsed leniently when scoring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,

    // 0-100, supplied by the enrichment step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editorial_importance: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_relevance: Option<f64>,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub people_entities: Vec<String>,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub organization_entities: Vec<String>,
}

impl Article {
    pub fn new(id: &str, title: &str) -> Self {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            tags: Vec::new(),
            category: None,
            published_at: None,
            editorial_importance: None,
            external_relevance: None,
            people_entities: Vec::new(),
            organization_entities: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_published_at(mut self, published_at: &str) -> Self {
        self.published_at = Some(published_at.to_string());
        self
    }

    pub fn with_importance(mut self, importance: f64) -> Self {
        self.editorial_importance = Some(importance);
        self
    }

    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.external_relevance = Some(relevance);
        self
    }

    pub fn with_people(mut self, people: &[&str]) -> Self {
        self.people_entities = people.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_organizations(mut self, organizations: &[&str]) -> Self {
        self.organization_entities = organizations.iter().map(|o| o.to_string()).collect();
        self
    }

    /// True if entity extraction attached at least one non-blank person or organization
    pub fn has_entities(&self) -> bool {
        self.people().next().is_some() || self.organizations().next().is_some()
    }

    /// Person names, skipping blank entries
    pub fn people(&self) -> impl Iterator<Item = &String> {
        self.people_entities.iter().filter(|name| !is_blank(name))
    }

    /// Organization names, skipping blank entries
    pub fn organizations(&self) -> impl Iterator<Item = &String> {
        self.organization_entities
            .iter()
            .filter(|name| !is_blank(name))
    }

    /// Drops blank entity names and tags
    pub fn strip_blank_names(&mut self) {
        self.tags.retain(|tag| !is_blank(tag));
        self.people_entities.retain(|name| !is_blank(name));
        self.organization_entities.retain(|name| !is_blank(name));
    }
}

/// People and organizations mentioned anywhere in a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterEntities {
    pub people: BTreeSet<String>,
    pub organizations: BTreeSet<String>,
}

impl ClusterEntities {
    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.organizations.is_empty()
    }
}

/// A group of articles covering the same story, led by its best-scoring member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleCluster {
    pub lead_article: Article,
    pub related_articles: Vec<Article>,
    pub relevance_score: f64,
    pub entities: ClusterEntities,
}

impl ArticleCluster {
    /// Number of articles in the cluster, lead included
    pub fn size(&self) -> usize {
        1 + self.related_articles.len()
    }

    pub fn is_singleton(&self) -> bool {
        self.related_articles.is_empty()
    }

    /// Lead first, then related articles in the order they were matched
    pub fn members(&self) -> impl Iterator<Item = &Article> {
        std::iter::once(&self.lead_article).chain(self.related_articles.iter())
    }
}

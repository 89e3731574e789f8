use super::types::{Article, ClusterEntities};

/// Combine the people and organizations of every member of a cluster
///
/// Names are deduplicated by exact string equality and blank names are
/// skipped. No case folding or alias resolution is applied, so "OpenAI" and
/// "Open AI" stay distinct.
///
/// # Arguments
/// * `members` - The lead article and its related articles
///
/// # Returns
/// * `ClusterEntities` - The union of all entity names
pub fn aggregate_entities<'a, I>(members: I) -> ClusterEntities
where
    I: IntoIterator<Item = &'a Article>,
{
    let mut entities = ClusterEntities::default();
    for article in members {
        entities.people.extend(article.people().cloned());
        entities
            .organizations
            .extend(article.organizations().cloned());
    }
    entities
}

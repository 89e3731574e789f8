use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashSet;

use super::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap()
}

fn cluster(articles: &[Article]) -> Vec<ArticleCluster> {
    build_clusters_at(articles, &ClusterConfig::default(), now())
}

fn member_ids(cluster: &ArticleCluster) -> Vec<&str> {
    cluster.members().map(|a| a.id.as_str()).collect()
}

fn mixed_batch() -> Vec<Article> {
    vec![
        Article::new("1", "Regulator fines telecom operator over rural broadband delays")
            .with_tags(&["telecom", "broadband"])
            .with_importance(70.0),
        Article::new("2", "Telecom operator fined by regulator over broadband delays")
            .with_tags(&["telecom"])
            .with_importance(60.0),
        Article::new("3", "Storm warning issued for coastal districts")
            .with_category("weather"),
        Article::new("4", "National team wins qualifier in extra time").with_tags(&["football"]),
        Article::new("5", "Coastal districts brace for storm surge tonight")
            .with_category("weather")
            .with_importance(80.0),
        Article::new("6", "").with_tags(&[]),
    ]
}

#[test]
fn test_module_defaults() {
    assert_eq!(TITLE_SIMILARITY_THRESHOLD, 0.4);
    assert_eq!(TAG_OVERLAP_THRESHOLD, 0.6);
    assert_eq!(CATEGORY_TITLE_SIMILARITY_THRESHOLD, 0.25);
    assert_eq!(MIN_TOKEN_CHARS, 4);
}

#[test]
fn test_empty_batch() {
    assert!(cluster(&[]).is_empty());
}

#[test]
fn test_single_article_is_singleton() {
    let clusters = cluster(&[Article::new("only", "Parliament passes housing bill")]);
    assert_eq!(clusters.len(), 1);
    assert!(clusters[0].is_singleton());
    assert_eq!(clusters[0].lead_article.id, "only");
    assert_eq!(clusters[0].relevance_score, 40.0);
}

#[test]
fn test_every_article_in_exactly_one_cluster() {
    let batch = mixed_batch();
    let clusters = cluster(&batch);

    let mut seen = HashSet::new();
    for c in &clusters {
        for id in member_ids(c) {
            assert!(seen.insert(id.to_string()), "article {} appears twice", id);
        }
    }
    let expected: HashSet<String> = batch.iter().map(|a| a.id.clone()).collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_expected_grouping() {
    let clusters = cluster(&mixed_batch());
    let groups: Vec<Vec<&str>> = clusters.iter().map(member_ids).collect();

    // Scores: 5 -> 52, 1 -> 48, 2 -> 44, then 3, 4, 6 at 40 in input order
    assert_eq!(
        groups,
        vec![vec!["5", "3"], vec!["1", "2"], vec!["4"], vec!["6"]]
    );
}

#[test]
fn test_clustering_is_idempotent() {
    let batch = mixed_batch();
    assert_eq!(cluster(&batch), cluster(&batch));
}

#[test]
fn test_input_is_not_modified() {
    let batch = mixed_batch();
    let before = batch.clone();
    let _ = cluster(&batch);
    assert_eq!(batch, before);
}

#[test]
fn test_unrelated_articles_stay_singletons() {
    let batch = vec![
        Article::new("a", "Museum reopens after renovation").with_tags(&["culture"]),
        Article::new("b", "Interest rates held steady").with_tags(&["economy"]),
        Article::new("c", "Marathon route announced").with_tags(&["sport"]),
    ];
    let clusters = cluster(&batch);
    assert_eq!(clusters.len(), 3);
    assert!(clusters.iter().all(ArticleCluster::is_singleton));
}

#[test]
fn test_lead_is_highest_scoring_member() {
    let batch = vec![
        Article::new("low", "Central bank raises interest rates again").with_importance(30.0),
        Article::new("high", "Central bank raises interest rates")
            .with_importance(90.0)
            .with_published_at("2026-05-04T08:00:00Z"),
    ];
    let clusters = cluster(&batch);

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].lead_article.id, "high");
    assert_eq!(member_ids(&clusters[0]), vec!["high", "low"]);
    // 90 * 0.4 + 50 * 0.4 + 20
    assert!((clusters[0].relevance_score - 76.0).abs() < 1e-9);
}

#[test]
fn test_equal_scores_keep_input_order() {
    let batch = vec![
        Article::new("first", "Wildfire forces evacuation of hillside villages"),
        Article::new("second", "Hillside villages evacuation ordered as wildfire spreads"),
    ];
    let clusters = cluster(&batch);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].lead_article.id, "first");

    let reversed: Vec<Article> = batch.into_iter().rev().collect();
    let clusters = cluster(&reversed);
    assert_eq!(clusters[0].lead_article.id, "second");
}

#[test]
fn test_clusters_ordered_by_lead_score() {
    let clusters = cluster(&mixed_batch());
    let scores: Vec<f64> = clusters.iter().map(|c| c.relevance_score).collect();
    let mut sorted = scores.clone();
    sorted.sort_by(|a, b| b.total_cmp(a));
    assert_eq!(scores, sorted);
}

#[test]
fn test_tag_overlap_is_asymmetric() {
    let broad = Article::new("broad", "Ministers debate infrastructure package")
        .with_tags(&["5g", "fibre", "regulation"]);
    let narrow = Article::new("narrow", "Operators publish coverage maps").with_tags(&["5g"]);

    assert_eq!(tag_overlap(&broad.tags, &narrow.tags), 1.0);
    assert!(should_cluster(&broad, &narrow, &ClusterConfig::default()));
    assert_eq!(cluster(&[broad, narrow]).len(), 1);
}

#[test]
fn test_tag_overlap_must_exceed_threshold() {
    // 0.5 overlap is below 0.6
    let a = Article::new("a", "Budget vote delayed").with_tags(&["budget", "parliament"]);
    let b = Article::new("b", "Opposition walks out").with_tags(&["parliament", "protest"]);
    assert!(!should_cluster(&a, &b, &ClusterConfig::default()));
}

#[test]
fn test_tag_overlap_at_threshold_does_not_cluster() {
    // 3 shared, smaller set has 5: exactly 0.6
    let a = Article::new("a", "Budget vote delayed")
        .with_tags(&["budget", "parliament", "tax", "vote", "deficit"]);
    let b = Article::new("b", "Opposition walks out")
        .with_tags(&["budget", "parliament", "tax", "protest", "strike", "unions"]);

    assert_eq!(tag_overlap(&a.tags, &b.tags), 0.6);
    assert!(!should_cluster(&a, &b, &ClusterConfig::default()));
    assert_eq!(cluster(&[a, b]).len(), 2);
}

#[test]
fn test_title_similarity_at_threshold_does_not_cluster() {
    // {flooding, closes, motorway} vs {motorway, closes, after, landslip}: 2 of 5
    let a = Article::new("a", "Flooding closes motorway");
    let b = Article::new("b", "Motorway closes after landslip");

    assert_eq!(text_similarity(&a.title, &b.title), 0.4);
    assert!(!should_cluster(&a, &b, &ClusterConfig::default()));
    assert_eq!(cluster(&[a, b]).len(), 2);
}

#[test]
fn test_title_threshold_boundary() {
    let config = ClusterConfig::default();

    // 2 shared of 8 significant tokens: 0.25
    let a = Article::new("a", "Minister announces energy price freeze");
    let b = Article::new("b", "Minister denies energy hike rumours");
    assert!((text_similarity(&a.title, &b.title) - 0.25).abs() < 1e-9);
    assert!(!should_cluster(&a, &b, &config));

    // Same category still needs more than 0.25
    let a = a.with_category("energy");
    let b = b.with_category("energy");
    assert!(!should_cluster(&a, &b, &config));

    // 3 shared of 10 significant tokens: 0.3
    let c = Article::new("c", "Regional hospital strike enters second week");
    let d = Article::new("d", "Hospital strike talks collapse as regional unions walk");
    assert!((text_similarity(&c.title, &d.title) - 0.3).abs() < 1e-9);
    assert!(!should_cluster(&c, &d, &config));

    let c = c.with_category("health");
    let d = d.with_category("health");
    assert!(should_cluster(&c, &d, &config));

    // Different categories fall back to the plain title threshold
    let d = d.with_category("labour");
    assert!(!should_cluster(&c, &d, &config));
}

#[test]
fn test_category_alone_is_not_enough() {
    let a = Article::new("a", "Stock markets rally").with_category("markets");
    let b = Article::new("b", "Pension fund changes strategy").with_category("markets");
    assert!(!should_cluster(&a, &b, &ClusterConfig::default()));
}

#[test]
fn test_diacritics_cluster_together() {
    let a = Article::new("a", "Régulation énergie!");
    let b = Article::new("b", "regulation energie");
    assert_eq!(text_similarity(&a.title, &b.title), 1.0);
    assert_eq!(cluster(&[a, b]).len(), 1);
}

#[test]
fn test_greedy_grouping_is_not_transitive() {
    // a~b and b~c by tags, but a and c share nothing
    let a = Article::new("a", "Port workers begin strike")
        .with_tags(&["port"])
        .with_importance(90.0);
    let b = Article::new("b", "Shipping disrupted").with_tags(&["port", "shipping"]);
    let c = Article::new("c", "Freight rates climb")
        .with_tags(&["shipping"])
        .with_importance(60.0);

    let clusters = cluster(&[a, b, c]);
    let groups: Vec<Vec<&str>> = clusters.iter().map(member_ids).collect();
    assert_eq!(groups, vec![vec!["a", "b"], vec!["c"]]);
}

#[test]
fn test_related_articles_follow_score_order() {
    let batch = vec![
        Article::new("r1", "Flood barriers tested").with_tags(&["flood"]).with_importance(20.0),
        Article::new("lead", "Flood defences fail").with_tags(&["flood"]).with_importance(90.0),
        Article::new("r2", "Flood insurance claims rise").with_tags(&["flood"]).with_importance(70.0),
    ];
    let clusters = cluster(&batch);
    assert_eq!(member_ids(&clusters[0]), vec!["lead", "r2", "r1"]);
}

#[test]
fn test_cluster_entities_are_merged() {
    let batch = vec![
        Article::new("a", "Chancellor unveils spending review")
            .with_people(&["Rachel Reeves"])
            .with_organizations(&["HM Treasury"]),
        Article::new("b", "Spending review unveils chancellor plans")
            .with_people(&["Rachel Reeves", "Keir Starmer"])
            .with_organizations(&["IFS"]),
    ];
    let clusters = cluster(&batch);

    assert_eq!(clusters.len(), 1);
    let entities = &clusters[0].entities;
    assert_eq!(entities.people.len(), 2);
    assert!(entities.people.contains("Keir Starmer"));
    assert_eq!(entities.organizations.len(), 2);
}

#[test]
fn test_missing_fields_degrade_gracefully() {
    let batch = vec![
        Article::new("a", ""),
        Article::new("b", "").with_category("misc"),
        Article::new("c", "").with_category("misc"),
        Article::new("d", "ok").with_published_at("not a date"),
    ];
    let clusters = cluster(&batch);
    assert_eq!(clusters.len(), 4);
    assert!(clusters.iter().all(|c| c.relevance_score == 40.0));
}

#[test]
fn test_duplicate_ids_are_not_dropped() {
    let batch = vec![
        Article::new("dup", "Tram line opens"),
        Article::new("dup", "Library closes early"),
    ];
    let clusters = cluster(&batch);
    let total: usize = clusters.iter().map(ArticleCluster::size).sum();
    assert_eq!(total, 2);
}

#[test]
fn test_custom_thresholds() {
    let a = Article::new("a", "Minister announces energy price freeze");
    let b = Article::new("b", "Minister denies energy hike rumours");

    let loose = ClusterConfig::default().with_title_threshold(0.2);
    assert!(should_cluster(&a, &b, &loose));
    assert_eq!(build_clusters_at(&[a, b], &loose, now()).len(), 1);
}

use contentsync_engine::testing::{item, MockContentAccessor};
use contentsync_engine::DocumentBuilder;
use contentsync_types::{Author, ContentStatus, ContentType, Term, TermId, UserId};
use std::collections::BTreeMap;
use std::sync::Arc;

fn builder_with(accessor: MockContentAccessor) -> (DocumentBuilder, Arc<MockContentAccessor>) {
    let accessor = Arc::new(accessor);
    (DocumentBuilder::new(accessor.clone()), accessor)
}

fn term(id: u64, slug: &str) -> Term {
    Term {
        term_id: TermId::new(id),
        slug: slug.to_string(),
        name: slug.to_string(),
        parent_id: None,
    }
}

// ── Flattening ───────────────────────────────────────────────────

#[tokio::test]
async fn flattens_item_fields() {
    let (builder, _) = builder_with(MockContentAccessor::new());
    let source = item(42, 1, "article");

    let doc = builder.build(&source).await.unwrap();

    assert_eq!(doc.item_id, source.id);
    assert_eq!(doc.tenant_id, source.tenant_id);
    assert_eq!(doc.title, source.title);
    assert_eq!(doc.body, source.body);
    assert_eq!(doc.slug, source.slug);
    assert_eq!(doc.permalink, source.permalink);
    assert_eq!(doc.content_type, ContentType::new("article"));
    assert_eq!(doc.status, ContentStatus::Published);
}

#[tokio::test]
async fn known_author_is_flattened() {
    let accessor = MockContentAccessor::new();
    accessor.set_author(UserId::new(1), Author::new("alice", "Alice Author"));
    let (builder, _) = builder_with(accessor);

    let doc = builder.build(&item(1, 1, "article")).await.unwrap();
    assert_eq!(doc.author, Author::new("alice", "Alice Author"));
}

#[tokio::test]
async fn missing_author_falls_back_to_empty() {
    let (builder, _) = builder_with(MockContentAccessor::new());

    let doc = builder.build(&item(1, 1, "article")).await.unwrap();
    assert_eq!(doc.author, Author::unknown());
    assert_eq!(doc.author.login, "");
}

// ── Terms ────────────────────────────────────────────────────────

#[tokio::test]
async fn terms_grouped_by_taxonomy() {
    let accessor = MockContentAccessor::new();
    let source = item(1, 1, "article");
    accessor.set_taxonomies(
        source.content_type.clone(),
        vec!["category".to_string(), "tag".to_string()],
    );
    accessor.set_terms(source.id, "category", vec![term(1, "news"), term(2, "tech")]);
    accessor.set_terms(source.id, "tag", vec![term(3, "rust")]);
    let (builder, _) = builder_with(accessor);

    let doc = builder.build(&source).await.unwrap();

    assert_eq!(doc.terms.len(), 2);
    assert_eq!(doc.terms["category"], vec![term(1, "news"), term(2, "tech")]);
    assert_eq!(doc.terms["tag"], vec![term(3, "rust")]);
}

#[tokio::test]
async fn taxonomies_without_assigned_terms_are_omitted() {
    let accessor = MockContentAccessor::new();
    let source = item(1, 1, "article");
    accessor.set_taxonomies(
        source.content_type.clone(),
        vec!["category".to_string(), "tag".to_string()],
    );
    accessor.set_terms(source.id, "category", vec![term(1, "news")]);
    // "tag" has nothing assigned.
    let (builder, _) = builder_with(accessor);

    let doc = builder.build(&source).await.unwrap();

    assert!(doc.terms.contains_key("category"));
    assert!(!doc.terms.contains_key("tag"));
}

#[tokio::test]
async fn type_without_taxonomies_yields_empty_terms() {
    let (builder, _) = builder_with(MockContentAccessor::new());
    let doc = builder.build(&item(1, 1, "article")).await.unwrap();
    assert!(doc.terms.is_empty());
}

// ── Meta ─────────────────────────────────────────────────────────

#[tokio::test]
async fn meta_populated_when_raw_mapping_nonempty() {
    let accessor = MockContentAccessor::new();
    let source = item(1, 1, "article");
    let mut raw = BTreeMap::new();
    raw.insert("views".to_string(), "123".to_string());
    raw.insert("featured".to_string(), "true".to_string());
    accessor.set_meta(source.id, raw);
    let (builder, _) = builder_with(accessor);

    let doc = builder.build(&source).await.unwrap();

    assert_eq!(doc.meta["views"], serde_json::json!(123));
    assert_eq!(doc.meta["featured"], serde_json::json!(true));
}

#[tokio::test]
async fn protected_meta_keys_are_excluded() {
    let accessor = MockContentAccessor::new();
    let source = item(1, 1, "article");
    let mut raw = BTreeMap::new();
    raw.insert("_internal_lock".to_string(), "1".to_string());
    raw.insert("public".to_string(), "\"visible\"".to_string());
    accessor.set_meta(source.id, raw);
    let (builder, _) = builder_with(accessor);

    let doc = builder.build(&source).await.unwrap();

    assert!(!doc.meta.contains_key("_internal_lock"));
    assert_eq!(doc.meta["public"], serde_json::json!("visible"));
}

#[tokio::test]
async fn undecodable_meta_values_fall_back_to_strings() {
    let accessor = MockContentAccessor::new();
    let source = item(1, 1, "article");
    let mut raw = BTreeMap::new();
    raw.insert("color".to_string(), "not json {".to_string());
    accessor.set_meta(source.id, raw);
    let (builder, _) = builder_with(accessor);

    let doc = builder.build(&source).await.unwrap();
    assert_eq!(doc.meta["color"], serde_json::json!("not json {"));
}

#[tokio::test]
async fn empty_raw_meta_yields_empty_meta() {
    let (builder, _) = builder_with(MockContentAccessor::new());
    let doc = builder.build(&item(1, 1, "article")).await.unwrap();
    assert!(doc.meta.is_empty());
}

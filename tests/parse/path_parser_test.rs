// tests/parse/path_parser_test.rs
use autojoin::parse::path::{normalize_column, parse_chain, parse_column, split_alias};
use autojoin::sql::query::JoinType;

#[test]
fn test_split_alias_variants() {
    assert_eq!(
        split_alias("agent.id as agent_id"),
        ("agent.id".to_string(), Some("agent_id".to_string()))
    );
    assert_eq!(
        split_alias("agent.id AS agent_id"),
        ("agent.id".to_string(), Some("agent_id".to_string()))
    );
    assert_eq!(split_alias("agent.id"), ("agent.id".to_string(), None));
    assert_eq!(split_alias("  name  "), ("name".to_string(), None));
}

#[test]
fn test_alias_requires_whitespace_delimited_as() {
    // "asset" contains "as" but is not an alias split point.
    assert_eq!(split_alias("asset_id"), ("asset_id".to_string(), None));
}

#[test]
fn test_normalize_dot_notation() {
    assert_eq!(normalize_column("agent.departments.name"), "agent__departments.name");
    assert_eq!(normalize_column("agent.id"), "agent.id");
    assert_eq!(normalize_column("name"), "name");
}

#[test]
fn test_chain_segments_and_overrides() {
    let chain = parse_chain("agent|inner__departments", Some("users"), JoinType::Left);
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0].relation, "agent");
    assert_eq!(chain[0].join_type, JoinType::Inner);
    assert_eq!(chain[1].relation, "departments");
    assert_eq!(chain[1].join_type, JoinType::Left);
}

#[test]
fn test_leading_base_table_segment_dropped() {
    let chain = parse_chain("users__agent", Some("users"), JoinType::Left);
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].relation, "agent");

    // Case-insensitive, and the override suffix does not defeat the match.
    let chain = parse_chain("Users|inner__agent", Some("users"), JoinType::Left);
    assert_eq!(chain.len(), 1);
}

#[test]
fn test_empty_segments_dropped() {
    let chain = parse_chain("agent____departments", Some("users"), JoinType::Left);
    assert_eq!(chain.len(), 2);
}

#[test]
fn test_parse_column_chain_field_alias() {
    let parsed = parse_column(
        "agent__departments.name as dept",
        Some("users"),
        JoinType::Left,
    );
    assert_eq!(parsed.chain.len(), 2);
    assert_eq!(parsed.field.as_deref(), Some("name"));
    assert_eq!(parsed.alias.as_deref(), Some("dept"));
}

#[test]
fn test_dot_and_chain_notation_parse_identically() {
    let dotted = parse_column("agent.departments.name", Some("users"), JoinType::Left);
    let chained = parse_column("agent__departments.name", Some("users"), JoinType::Left);
    assert_eq!(dotted, chained);
}

#[test]
fn test_chain_only_expression_defers_field() {
    let parsed = parse_column("agent__departments", Some("users"), JoinType::Left);
    assert!(parsed.field.is_none());
    assert_eq!(parsed.chain.len(), 2);
}

#[test]
fn test_bare_field() {
    let parsed = parse_column("status", Some("users"), JoinType::Left);
    assert!(parsed.chain.is_empty());
    assert_eq!(parsed.field.as_deref(), Some("status"));
}

#[test]
fn test_default_join_type_applied() {
    let chain = parse_chain("agent__departments", Some("users"), JoinType::Inner);
    assert!(chain.iter().all(|s| s.join_type == JoinType::Inner));
}

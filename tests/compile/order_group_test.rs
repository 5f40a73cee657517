// tests/compile/order_group_test.rs
//
// ORDER BY and GROUP BY clause rules: sort directions, chain-only
// grouping, and GROUP BY's indifference to the suffix shorthand.
use autojoin::prelude::*;

fn catalog() -> SchemaCatalog {
    let mut catalog = SchemaCatalog::new();
    catalog.register(
        EntityDef::new("User", "users")
            .with_columns(["id", "name", "status"])
            .with_relation(
                "agent",
                RelationDescriptor::one_to_one("Agent", "agents", "user_id"),
            ),
    );
    catalog.register(
        EntityDef::new("Agent", "agents").with_columns(["id", "user_id", "rank", "score__count"]),
    );
    catalog
}

fn compile(query: Query) -> String {
    let catalog = catalog();
    let settings = Settings::default();
    QueryCompiler::new(&catalog, &settings, Dialect::Ansi, "User")
        .compile_to_sql(query)
        .unwrap()
}

#[test]
fn test_order_by_directions() {
    let sql = compile(
        Query::table("users")
            .select(["name"])
            .order_by("agent.rank", SortDir::Desc)
            .order_by("name", SortDir::Asc),
    );
    assert!(sql.ends_with("ORDER BY \"B\".\"rank\" DESC, \"A\".\"name\" ASC"));
}

#[test]
fn test_order_by_plans_joins() {
    let sql = compile(Query::table("users").select(["name"]).order_by("agent.rank", SortDir::Asc));
    assert!(sql.contains("LEFT JOIN \"agents\" AS \"B\""));
}

#[test]
fn test_group_by_base_and_chain_columns() {
    let sql = compile(
        Query::table("users")
            .select(["status"])
            .group_by("status")
            .group_by("agent.rank"),
    );
    assert!(sql.contains("GROUP BY \"A\".\"status\", \"B\".\"rank\""));
}

#[test]
fn test_group_by_alias_dropped() {
    // Aliases make no sense in GROUP BY; an explicit one is discarded.
    let sql = compile(Query::table("users").select(["name"]).group_by("agent.id as aid"));
    assert!(sql.contains("GROUP BY \"B\".\"id\""));
    assert!(!sql.contains("GROUP BY \"B\".\"id\" AS"));
}

#[test]
fn test_group_by_does_not_treat_suffix_as_aggregate() {
    // `score__count` is a real column here; GROUP BY must not unwrap it
    // into COUNT(score).
    let sql = compile(Query::table("users").select(["name"]).group_by("agent.score__count"));
    assert!(sql.contains("GROUP BY \"B\".\"score__count\""));
    assert!(!sql.contains("COUNT("));
}

#[test]
fn test_clause_render_order() {
    let sql = compile(
        Query::table("users")
            .select(["name"])
            .where_col("status", "=", "?")
            .group_by("name")
            .having_raw("COUNT(agent.id) > ?")
            .order_by("name", SortDir::Asc),
    );
    let where_at = sql.find(" WHERE ").unwrap();
    let group_at = sql.find(" GROUP BY ").unwrap();
    let having_at = sql.find(" HAVING ").unwrap();
    let order_at = sql.find(" ORDER BY ").unwrap();
    assert!(where_at < group_at && group_at < having_at && having_at < order_at);
}

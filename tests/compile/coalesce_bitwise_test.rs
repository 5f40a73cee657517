// tests/compile/coalesce_bitwise_test.rs
//
// COALESCE argument resolution and bitwise left-operand resolution in
// raw fragments.
use autojoin::prelude::*;

fn catalog() -> SchemaCatalog {
    let mut catalog = SchemaCatalog::new();
    catalog.register(
        EntityDef::new("User", "users")
            .with_columns(["id", "name", "nickname"])
            .with_relation(
                "agent",
                RelationDescriptor::one_to_one("Agent", "agents", "user_id"),
            ),
    );
    catalog.register(EntityDef::new("Agent", "agents").with_columns(["id", "user_id", "name", "flags"]));
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
fn test_coalesce_resolves_path_args() {
    let sql = compile(Query::table("users").select(["COALESCE(agent.name, users.name) as display"]));
    assert!(sql.contains("COALESCE(\"B\".\"name\", \"A\".\"name\") AS \"display\""));
    assert!(sql.contains("LEFT JOIN \"agents\" AS \"B\""));
}

#[test]
fn test_coalesce_literal_args_pass_through() {
    let sql = compile(Query::table("users").select(["COALESCE(agent.name, 'n/a') as display"]));
    assert!(sql.contains("COALESCE(\"B\".\"name\", 'n/a') AS \"display\""));
}

#[test]
fn test_coalesce_in_where_drops_alias_keeps_trailing() {
    let sql = compile(
        Query::table("users")
            .select(["name"])
            .where_raw("COALESCE(agent.name, 'n/a') != ?"),
    );
    assert!(sql.contains("WHERE COALESCE(\"B\".\"name\", 'n/a') != ?"));
    assert!(!sql.contains("AS \"n/a\""));
}

#[test]
fn test_coalesce_in_order_by() {
    let sql = compile(
        Query::table("users")
            .select(["name"])
            .order_by_raw("COALESCE(agent.name, users.nickname) DESC"),
    );
    assert!(sql.contains("ORDER BY COALESCE(\"B\".\"name\", \"A\".\"nickname\") DESC"));
}

#[test]
fn test_bitwise_left_operand_resolved() {
    let sql = compile(
        Query::table("users")
            .select(["name"])
            .where_raw("agent.flags & ? = 0"),
    );
    assert!(sql.contains("WHERE \"B\".\"flags\" & ? = 0"));
}

#[test]
fn test_bitwise_non_path_left_passes_through() {
    let sql = compile(Query::table("users").select(["name"]).where_raw("flags & ? = 0"));
    assert!(sql.contains("WHERE flags & ? = 0"));
}

#[test]
fn test_plain_raw_fragment_untouched() {
    let sql = compile(
        Query::table("users")
            .select(["name"])
            .where_raw("deleted_at IS NULL"),
    );
    assert!(sql.contains("WHERE deleted_at IS NULL"));
}

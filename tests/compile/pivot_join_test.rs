// tests/compile/pivot_join_test.rs
//
// Many-to-many relations: one logical hop, two physical joins, and all
// later references landing on the related-side alias.
use autojoin::prelude::*;

fn catalog() -> SchemaCatalog {
    let mut catalog = SchemaCatalog::new();
    catalog.register(
        EntityDef::new("User", "users")
            .with_columns(["id", "name"])
            .with_relation(
                "agent",
                RelationDescriptor::one_to_one("Agent", "agents", "user_id"),
            ),
    );
    catalog.register(
        EntityDef::new("Agent", "agents")
            .with_columns(["id", "user_id"])
            .with_relation(
                "departments",
                RelationDescriptor::many_to_many(
                    "Department",
                    "departments",
                    "agent_department",
                    "agent_id",
                    "department_id",
                ),
            ),
    );
    catalog.register(EntityDef::new("Department", "departments").with_columns(["id", "name"]));
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
fn test_pivot_hop_emits_two_joins() {
    let sql = compile(Query::table("users").select(["agent__departments.name"]));
    assert!(
        sql.contains("LEFT JOIN \"agent_department\" AS \"C\" ON \"B\".\"id\" = \"C\".\"agent_id\"")
    );
    assert!(
        sql.contains("LEFT JOIN \"departments\" AS \"D\" ON \"C\".\"department_id\" = \"D\".\"id\"")
    );
    // The field is qualified with the related-side alias, not the pivot's.
    assert!(sql.contains("SELECT \"D\".\"name\""));
}

#[test]
fn test_pivot_join_order() {
    let sql = compile(Query::table("users").select(["agent__departments.name"]));
    let agents = sql.find("JOIN \"agents\"").unwrap();
    let pivot = sql.find("JOIN \"agent_department\"").unwrap();
    let departments = sql.find("JOIN \"departments\"").unwrap();
    assert!(agents < pivot && pivot < departments);
}

#[test]
fn test_pivot_chain_reused_across_clauses() {
    let sql = compile(
        Query::table("users")
            .select(["agent__departments.name"])
            .where_col("agent__departments.id", "=", "?")
            .order_by("agent__departments.name", SortDir::Asc),
    );
    assert_eq!(sql.matches("JOIN \"agent_department\"").count(), 1);
    assert_eq!(sql.matches("JOIN \"departments\"").count(), 1);
    assert!(sql.contains("WHERE \"D\".\"id\" = ?"));
    assert!(sql.ends_with("ORDER BY \"D\".\"name\" ASC"));
}

#[test]
fn test_pivot_inner_override_applies_to_both_stages() {
    let sql = compile(Query::table("users").select(["agent__departments|inner.name"]));
    assert!(sql.contains("INNER JOIN \"agent_department\""));
    assert!(sql.contains("INNER JOIN \"departments\""));
    // The interior hop keeps its own (default) join type.
    assert!(sql.contains("LEFT JOIN \"agents\""));
}

#[test]
fn test_chain_only_pivot_field_inference() {
    // Terminal segment is a relation: the field becomes the related
    // entity's identity column, auto-aliased with the chain key.
    let sql = compile(Query::table("users").select(["agent__departments"]));
    assert!(sql.contains("SELECT \"D\".\"id\" AS \"agent__departments\""));
}

#[test]
fn test_pivot_without_keys_is_unsupported() {
    let mut catalog = SchemaCatalog::new();
    let mut relation = RelationDescriptor::one_to_one("Department", "departments", "agent_id");
    relation.kind = RelationKind::ManyToManyPivot;
    relation.pivot = None;
    catalog.register(
        EntityDef::new("User", "users")
            .with_columns(["id"])
            .with_relation("departments", relation),
    );
    catalog.register(EntityDef::new("Department", "departments"));

    let settings = Settings::default();
    let err = QueryCompiler::new(&catalog, &settings, Dialect::Ansi, "User")
        .compile_to_sql(Query::table("users").select(["departments.name"]))
        .unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedRelationKind { .. }));
}

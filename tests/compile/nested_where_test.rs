// tests/compile/nested_where_test.rs
//
// Structured predicates and nested boolean groups: columns inside are
// rewritten, values and placeholders pass through verbatim.
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
        EntityDef::new("Agent", "agents")
            .with_columns(["id", "user_id", "rank"])
            .with_relation(
                "tickets",
                RelationDescriptor::one_to_many("Ticket", "tickets", "agent_id")
                    .with_condition("tickets.archived", "=", "0"),
            ),
    );
    catalog.register(
        EntityDef::new("Ticket", "tickets").with_columns(["id", "agent_id", "status", "archived"]),
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
fn test_basic_predicate_value_verbatim() {
    let sql = compile(
        Query::table("users")
            .select(["name"])
            .where_col("agent.rank", ">=", "?"),
    );
    assert!(sql.contains("WHERE \"B\".\"rank\" >= ?"));
}

#[test]
fn test_multiple_wheres_joined_with_and() {
    let sql = compile(
        Query::table("users")
            .select(["name"])
            .where_col("status", "=", "?")
            .where_col("agent.rank", ">", "?"),
    );
    assert!(sql.contains("WHERE \"A\".\"status\" = ? AND \"B\".\"rank\" > ?"));
}

#[test]
fn test_nested_group_rewritten_and_parenthesized() {
    let sql = compile(
        Query::table("users")
            .select(["name"])
            .where_col("status", "=", "?")
            .where_group(vec![
                ClauseEntry::Basic {
                    column: "agent.rank".into(),
                    operator: ">".into(),
                    value: "?".into(),
                },
                ClauseEntry::Raw("deleted_at IS NULL".into()),
            ]),
    );
    assert!(sql.contains("AND (\"B\".\"rank\" > ? AND deleted_at IS NULL)"));
}

#[test]
fn test_deeply_nested_groups() {
    let sql = compile(Query::table("users").select(["name"]).where_group(vec![
        ClauseEntry::Group(vec![ClauseEntry::Basic {
            column: "agent.rank".into(),
            operator: "=".into(),
            value: "?".into(),
        }]),
        ClauseEntry::Basic {
            column: "status".into(),
            operator: "=".into(),
            value: "?".into(),
        },
    ]));
    assert!(sql.contains("WHERE ((\"B\".\"rank\" = ?) AND \"A\".\"status\" = ?)"));
}

#[test]
fn test_group_propagates_clause_rules() {
    // Aggregates stay illegal inside nested WHERE groups.
    let catalog = catalog();
    let settings = Settings::default();
    let err = QueryCompiler::new(&catalog, &settings, Dialect::Ansi, "User")
        .compile_to_sql(Query::table("users").where_group(vec![ClauseEntry::Basic {
            column: "COUNT(agent.id)".into(),
            operator: ">".into(),
            value: "?".into(),
        }]))
        .unwrap_err();
    assert!(matches!(err, CompileError::AggregateNotAllowed { .. }));
}

#[test]
fn test_relation_extra_condition_appended_to_join() {
    let sql = compile(Query::table("users").select(["agent__tickets.status"]));
    assert!(sql.contains(
        "LEFT JOIN \"tickets\" AS \"C\" ON \"C\".\"agent_id\" = \"B\".\"id\" \
         AND \"tickets\".\"archived\" = 0"
    ));
}

// Rust guideline compliant 2026-02-06

//! Integration tests for the query builders.
//!
//! These tests validate rendered CQL, bind value order and the rejection of
//! incomplete or cross-table queries.

use scylla_orm_core::{
    ClusteringOrder, CqlType, CqlValue, Delete, Error, Insert, Query, RecordingSession, Row,
    Select, Table, Update,
};

fn users() -> Table {
    Table::builder("app", "users")
        .partition_key("id", CqlType::Int)
        .clustering_key_ordered("created_at", CqlType::Timestamp, ClusteringOrder::Desc)
        .column("name", CqlType::Text)
        .column("age", CqlType::Int)
        .column("tags", CqlType::Set(Box::new(CqlType::Text)))
        .view("by_name", ["name"])
        .build()
        .expect("valid users table")
}

fn orders() -> Table {
    Table::builder("app", "orders")
        .partition_key("id", CqlType::Int)
        .column("total", CqlType::Double)
        .build()
        .expect("valid orders table")
}

fn page_views() -> Table {
    Table::builder("app", "page_views")
        .partition_key("page", CqlType::Text)
        .column("views", CqlType::Counter)
        .build()
        .expect("valid counter table")
}

fn row(values: &[(&str, CqlValue)]) -> Row {
    values
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_select_full_clause_order() {
    let table = users();
    let name = table.column("name").unwrap();
    let age = table.column("age").unwrap();

    let built = Select::columns([name.clone().as_("n"), age.clone()])
        .unwrap()
        .filter([age.ge(18), age.lt(65)])
        .unwrap()
        .filter([name.eq("ada")])
        .unwrap()
        .group_by([table.column("id").unwrap()])
        .unwrap()
        .limit(10)
        .unwrap()
        .allow_filtering()
        .build_query()
        .unwrap();

    assert_eq!(
        built.cql,
        "SELECT name AS n, age FROM app.users WHERE age >= ? AND age < ? AND name = ? \
         GROUP BY id LIMIT 10 ALLOW FILTERING"
    );
    assert_eq!(
        built.params,
        vec![CqlValue::Int(18), CqlValue::Int(65), CqlValue::from("ada")]
    );
}

#[test]
fn test_select_aggregates() {
    let table = users();
    let age = table.column("age").unwrap();
    let cql = Select::columns([age.count().as_("total"), age.max()])
        .unwrap()
        .cql()
        .unwrap();
    assert_eq!(cql, "SELECT COUNT(age) AS total, MAX(age) FROM app.users");
}

#[test]
fn test_select_from_view() {
    let view = users().get_view("by_name").unwrap();
    let built = Select::all(&view)
        .filter([view.column("name").unwrap().eq("ada")])
        .unwrap()
        .build_query()
        .unwrap();
    assert_eq!(built.cql, "SELECT * FROM app.users_by_name WHERE name = ?");
}

#[test]
fn test_select_in_and_contains() {
    let table = users();
    let built = Select::all(&table)
        .filter([
            table.column("id").unwrap().in_([1, 2, 3]),
            table.column("tags").unwrap().contains("admin"),
        ])
        .unwrap()
        .build_query()
        .unwrap();
    assert_eq!(
        built.cql,
        "SELECT * FROM app.users WHERE id IN ? AND tags CONTAINS ?"
    );
    assert_eq!(built.params.len(), 2);
}

#[test]
fn test_select_rejects_columns_of_other_tables() {
    let users = users();
    let orders = orders();
    let result = Select::columns([users.column("id").unwrap(), orders.column("id").unwrap()]);
    assert!(matches!(result, Err(Error::TableMismatch { .. })));

    let result = Select::all(&users).filter([orders.column("id").unwrap().eq(1)]);
    assert!(matches!(result, Err(Error::TableMismatch { .. })));

    let result = Select::all(&users).group_by([orders.column("id").unwrap()]);
    assert!(matches!(result, Err(Error::TableMismatch { .. })));
}

#[test]
fn test_select_rejects_empty_clauses() {
    let table = users();
    assert!(Select::all(&table).filter(Vec::new()).is_err());
    assert!(Select::all(&table).group_by(Vec::new()).is_err());
    assert!(Select::all(&table).limit(0).is_err());
}

#[test]
fn test_select_rejects_mistyped_predicate() {
    let table = users();
    let result = Select::all(&table).filter([table.column("age").unwrap().eq("old")]);
    assert!(matches!(result, Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_update_set_replaces_and_if_exists() {
    let table = users();
    let age = table.column("age").unwrap();
    let built = Update::table(&table)
        .unwrap()
        .set(&age, 30)
        .unwrap()
        .set(&table.column("name").unwrap(), "ada")
        .unwrap()
        .set(&age, 31)
        .unwrap()
        .filter([table.column("id").unwrap().eq(1)])
        .unwrap()
        .if_exists()
        .build_query()
        .unwrap();

    assert_eq!(
        built.cql,
        "UPDATE app.users SET age = ?, name = ? WHERE id = ? IF EXISTS"
    );
    assert_eq!(
        built.params,
        vec![CqlValue::Int(31), CqlValue::from("ada"), CqlValue::Int(1)]
    );
}

#[test]
fn test_update_requires_set_and_where() {
    let table = users();
    let no_set = Update::table(&table)
        .unwrap()
        .filter([table.column("id").unwrap().eq(1)])
        .unwrap();
    let err = no_set.build_query().unwrap_err();
    assert_eq!(err.to_string(), "Invalid query: No SET in update query!");

    let no_where = Update::table(&table)
        .unwrap()
        .set(&table.column("age").unwrap(), 1)
        .unwrap();
    assert!(no_where.build_query().is_err());
}

#[test]
fn test_update_rejects_key_and_foreign_columns() {
    let table = users();
    let update = Update::table(&table).unwrap();
    assert!(update.clone().set(&table.column("id").unwrap(), 2).is_err());
    assert!(update
        .clone()
        .set(&orders().column("total").unwrap(), 2.0)
        .is_err());
    assert!(update.set(&table.column("age").unwrap(), "x").is_err());
}

#[test]
fn test_update_rejects_views() {
    let view = users().get_view("by_name").unwrap();
    assert!(matches!(Update::table(&view), Err(Error::InvalidQuery(_))));
    assert!(matches!(Delete::table(&view), Err(Error::InvalidQuery(_))));
    assert!(matches!(Insert::table(&view), Err(Error::InvalidQuery(_))));
}

#[test]
fn test_update_counter_increment() {
    let table = page_views();
    let views = table.column("views").unwrap();
    let built = Update::table(&table)
        .unwrap()
        .increment(&views, 1)
        .unwrap()
        .filter([table.column("page").unwrap().eq("/home")])
        .unwrap()
        .build_query()
        .unwrap();
    assert_eq!(
        built.cql,
        "UPDATE app.page_views SET views = views + ? WHERE page = ?"
    );
    assert_eq!(built.params[0], CqlValue::BigInt(1));

    assert!(Update::table(&table).unwrap().set(&views, 3).is_err());
    assert!(Update::table(&users())
        .unwrap()
        .increment(&users().column("age").unwrap(), 1)
        .is_err());
    assert!(Insert::table(&table).is_err());
}

#[test]
fn test_delete() {
    let table = users();
    let built = Delete::table(&table)
        .unwrap()
        .filter([table.column("id").unwrap().eq(7)])
        .unwrap()
        .if_exists()
        .build_query()
        .unwrap();
    assert_eq!(built.cql, "DELETE FROM app.users WHERE id = ? IF EXISTS");
    assert_eq!(built.params, vec![CqlValue::Int(7)]);

    assert!(Delete::table(&table).unwrap().build_query().is_err());
}

#[test]
fn test_insert_single_row_in_column_order() {
    let table = orders();
    let built = Insert::table(&table)
        .unwrap()
        .values([row(&[("total", CqlValue::Double(9.5)), ("id", CqlValue::Int(1))])])
        .unwrap()
        .if_not_exists()
        .ttl(3600)
        .unwrap()
        .build_query()
        .unwrap();
    assert_eq!(
        built.cql,
        "INSERT INTO app.orders (id, total) VALUES (?, ?) IF NOT EXISTS USING TTL 3600"
    );
    assert_eq!(built.params, vec![CqlValue::Int(1), CqlValue::Double(9.5)]);
}

#[test]
fn test_insert_many_rows_batch() {
    let table = orders();
    let built = Insert::table(&table)
        .unwrap()
        .values([
            row(&[("id", CqlValue::Int(1)), ("total", CqlValue::Double(1.0))]),
            row(&[("id", CqlValue::Int(2))]),
        ])
        .unwrap()
        .build_query()
        .unwrap();
    assert_eq!(
        built.cql,
        "BEGIN BATCH INSERT INTO app.orders (id, total) VALUES (?, ?); \
         INSERT INTO app.orders (id) VALUES (?); APPLY BATCH"
    );
    assert_eq!(
        built.params,
        vec![CqlValue::Int(1), CqlValue::Double(1.0), CqlValue::Int(2)]
    );
}

#[test]
fn test_insert_row_validation() {
    let insert = Insert::table(&orders()).unwrap();
    let missing_key = insert.clone().values([row(&[("total", CqlValue::Double(1.0))])]);
    assert!(matches!(missing_key, Err(Error::InvalidQuery(_))));

    let null_key = insert.clone().values([row(&[("id", CqlValue::Null)])]);
    assert!(matches!(null_key, Err(Error::InvalidQuery(_))));

    let unknown = insert
        .clone()
        .values([row(&[("id", CqlValue::Int(1)), ("nope", CqlValue::Int(1))])]);
    assert!(matches!(unknown, Err(Error::UnknownColumn { .. })));

    let mistyped = insert.clone().values([row(&[("id", CqlValue::from("1"))])]);
    assert!(matches!(mistyped, Err(Error::TypeMismatch { .. })));

    assert!(insert.ttl(0).is_err());
}

#[tokio::test]
async fn test_execute_runs_built_query_on_session() {
    let table = users();
    let session = RecordingSession::new();
    let select = Select::all(&table)
        .filter([table.column("id").unwrap().eq(5)])
        .unwrap();

    let result = select.execute(&session).await.unwrap();
    assert!(result.is_empty());

    let statements = session.statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].cql, "SELECT * FROM app.users WHERE id = ?");
    assert_eq!(statements[0].params, vec![CqlValue::Int(5)]);
}

#[tokio::test]
async fn test_execute_does_not_run_invalid_query() {
    let session = RecordingSession::new();
    let delete = Delete::table(&users()).unwrap();
    assert!(delete.execute(&session).await.is_err());
    assert!(session.executed().is_empty());
}

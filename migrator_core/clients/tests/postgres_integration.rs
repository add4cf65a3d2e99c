//! Exercises `PostgresAdapter` against a real `postgres:16` container
//! (SPEC_FULL.md §0.4, §8). Requires Docker; skipped by default.

use clients::{connect, RdbmsAdapter};

#[tokio::test]
#[ignore]
async fn connects_and_round_trips_a_table() {
    let container = test_utils::setup_postgres().await.expect("postgres container starts");
    let spot = container.spot();

    let mut adapter = connect(&spot).await.expect("adapter connects");

    adapter.execute("CREATE TABLE widgets (id INTEGER PRIMARY KEY, name TEXT)").await.expect("create table");
    adapter.execute("INSERT INTO widgets (id, name) VALUES (1, 'bolt')").await.expect("insert row");

    let rows = adapter.query("SELECT id, name FROM widgets ORDER BY id").await.expect("select rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name").and_then(|v| v.as_str()), Some("bolt"));
}

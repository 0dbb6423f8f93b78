use sql_cursor::{Executor, RowValues, SqlCursorError, SqliteConnection};

const SELECT_ITEMS: &str = "SELECT recid, name FROM items ORDER BY recid";

fn executor_with_items(count: i64) -> Executor {
    let conn = SqliteConnection::open_in_memory().expect("open in-memory db");
    let mut executor = Executor::new(conn);
    executor
        .execute_batch("CREATE TABLE items (recid INTEGER PRIMARY KEY, name text);")
        .expect("create items table");
    for i in 1..=count {
        executor
            .execute(
                "INSERT INTO items (recid, name) VALUES (:recid, :name)",
                &[
                    ("recid", RowValues::Int(i)),
                    ("name", RowValues::Text(format!("r{i}"))),
                ],
            )
            .expect("insert item");
    }
    executor
}

fn name_of(row: &sql_cursor::DbRow) -> String {
    row.get("name").unwrap().as_text().unwrap().to_string()
}

#[test]
fn iterates_forward_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut executor = executor_with_items(10);
    let mut rows = executor
        .execute(SELECT_ITEMS, &[])?
        .into_rows()
        .expect("select returns a cursor");
    assert_eq!(rows.len(), 10);
    assert_eq!(rows.position(), 0);
    assert_eq!(rows.column_names(), ["recid", "name"]);

    let mut seen = Vec::new();
    for row in rows.iter() {
        seen.push(name_of(&row?));
    }
    let expected: Vec<String> = (1..=10).map(|i| format!("r{i}")).collect();
    assert_eq!(seen, expected);

    // Iteration exhausts the cursor but never changes the count.
    assert_eq!(rows.len(), 10);
    assert_eq!(rows.position(), 10);
    assert!(rows.current().is_none());
    Ok(())
}

#[test]
fn rewind_restarts_from_the_first_row() -> Result<(), Box<dyn std::error::Error>> {
    let mut executor = executor_with_items(5);
    let mut rows = executor
        .execute(SELECT_ITEMS, &[])?
        .into_rows()
        .expect("select returns a cursor");

    rows.advance()?;
    rows.advance()?;
    assert_eq!(rows.position(), 2);
    assert_eq!(name_of(rows.current().unwrap()), "r3");

    rows.rewind()?;
    assert_eq!(rows.position(), 0);
    assert_eq!(name_of(rows.current().unwrap()), "r1");

    // Rewinding at position 0 is a no-op.
    rows.rewind()?;
    assert_eq!(rows.position(), 0);
    assert_eq!(name_of(rows.current().unwrap()), "r1");
    Ok(())
}

#[test]
fn random_access_is_order_independent() -> Result<(), Box<dyn std::error::Error>> {
    let mut executor = executor_with_items(10);
    let mut rows = executor
        .execute(SELECT_ITEMS, &[])?
        .into_rows()
        .expect("select returns a cursor");

    // Forward, backward, then forward again; each index yields the row a
    // purely sequential walk would yield at that position.
    let row7 = rows.get(7)?.expect("index 7 in range");
    let row4 = rows.get(4)?.expect("index 4 in range");
    let row5 = rows.get(5)?.expect("index 5 in range");
    assert_eq!(name_of(&row7), "r8");
    assert_eq!(name_of(&row4), "r5");
    assert_eq!(name_of(&row5), "r6");

    // Requesting the current position returns the current row directly.
    assert_eq!(rows.position(), 5);
    let again = rows.get(5)?.expect("index 5 in range");
    assert_eq!(name_of(&again), "r6");

    // First and last rows stay reachable afterwards.
    assert_eq!(name_of(&rows.get(9)?.unwrap()), "r10");
    assert_eq!(name_of(&rows.get(0)?.unwrap()), "r1");
    Ok(())
}

#[test]
fn out_of_range_indices_return_none() -> Result<(), Box<dyn std::error::Error>> {
    let mut executor = executor_with_items(3);
    let mut rows = executor
        .execute(SELECT_ITEMS, &[])?
        .into_rows()
        .expect("select returns a cursor");

    assert!(rows.get(3)?.is_none());
    assert!(rows.get(usize::MAX)?.is_none());
    // An out-of-range request leaves the cursor where it was.
    assert_eq!(rows.position(), 0);
    assert_eq!(name_of(rows.current().unwrap()), "r1");
    Ok(())
}

#[test]
fn materialize_all_is_a_one_shot_cache() -> Result<(), Box<dyn std::error::Error>> {
    let mut executor = executor_with_items(10);
    let mut rows = executor
        .execute(SELECT_ITEMS, &[])?
        .into_rows()
        .expect("select returns a cursor");

    // Move the cursor before materializing; the drain still starts at row 0.
    rows.get(6)?;
    let first = rows.materialize_all()?.to_vec();
    assert_eq!(first.len(), 10);
    assert_eq!(name_of(&first[0]), "r1");
    assert_eq!(name_of(&first[9]), "r10");

    // Random access in between must not invalidate the cache.
    let mid = rows.get(3)?.expect("index 3 in range");
    assert_eq!(name_of(&mid), "r4");

    let second = rows.materialize_all()?.to_vec();
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn mutation_through_the_cursor_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut executor = executor_with_items(5);
    let mut rows = executor
        .execute(SELECT_ITEMS, &[])?
        .into_rows()
        .expect("select returns a cursor");

    let row = rows.get(2)?.expect("index 2 in range");
    let position_before = rows.position();

    let err = rows.set(2, row.clone()).unwrap_err();
    assert!(matches!(err, SqlCursorError::UnsupportedOperation(_)));
    let err = rows.unset(2).unwrap_err();
    assert!(matches!(err, SqlCursorError::UnsupportedOperation(_)));

    // Cursor state is untouched by the rejected calls.
    assert_eq!(rows.position(), position_before);
    assert_eq!(rows.current(), Some(&row));
    Ok(())
}

#[test]
fn empty_result_sets_start_exhausted() -> Result<(), Box<dyn std::error::Error>> {
    let mut executor = executor_with_items(3);
    let mut rows = executor
        .execute(
            "SELECT recid, name FROM items WHERE recid > :min ORDER BY recid",
            &[("min", RowValues::Int(100))],
        )?
        .into_rows()
        .expect("select returns a cursor");

    assert!(rows.is_empty());
    assert_eq!(rows.len(), 0);
    assert!(rows.current().is_none());
    assert!(rows.get(0)?.is_none());
    assert!(rows.materialize_all()?.is_empty());
    rows.advance()?;
    assert_eq!(rows.position(), 0);
    Ok(())
}

#[test]
fn executor_is_usable_again_once_the_cursor_drops() -> Result<(), Box<dyn std::error::Error>> {
    let mut executor = executor_with_items(3);
    {
        let rows = executor
            .execute(SELECT_ITEMS, &[])?
            .into_rows()
            .expect("select returns a cursor");
        assert_eq!(rows.len(), 3);
    }
    let affected = executor
        .execute(
            "INSERT INTO items (recid, name) VALUES (:recid, :name)",
            &[
                ("recid", RowValues::Int(4)),
                ("name", RowValues::Text("r4".to_string())),
            ],
        )?
        .rows_affected();
    assert_eq!(affected, Some(1));
    Ok(())
}

// PREPARE / EXECUTE / DEALLOCATE through the statement adapter
mod common;

use common::{session_with_rows, stored_rows};
use postgrust_adapter::core::DatabaseError;
use postgrust_adapter::plan::ProjectionExpr;
use postgrust_adapter::{Expr, Plan, StatementError, Value};

fn prepare(name: &str, plan: Plan) -> Plan {
    Plan::Prepare {
        name: name.to_string(),
        plan: Box::new(plan),
    }
}

fn execute(name: &str, params: Vec<Expr>) -> Plan {
    Plan::Execute {
        name: name.to_string(),
        params,
    }
}

#[test]
fn test_execute_prepared_query() {
    let session = session_with_rows(4);
    let query = Plan::scan("t")
        .filter(Expr::greater(Expr::Column(0), Expr::Param(1)))
        .project(vec![ProjectionExpr::column(1)]);
    assert!(
        session
            .execute(prepare("after", query), "PREPARE after FROM 'SELECT name FROM t WHERE id > ?'")
            .unwrap()
            .is_none()
    );

    let mut rs = session
        .execute(execute("after", vec![Expr::int(2)]), "EXECUTE after USING 2")
        .unwrap()
        .expect("prepared query returns rows");
    assert_eq!(rs.fields().unwrap()[0].column_as_name, "name");
    let rows = rs.rows().unwrap();
    assert_eq!(
        rows.into_iter().map(|r| r.data).collect::<Vec<_>>(),
        vec![vec![Value::Text("user3".into())], vec![Value::Text("user4".into())]]
    );
    rs.close().unwrap();
}

#[test]
fn test_execute_prepared_write() {
    let session = session_with_rows(3);
    let delete = Plan::Delete {
        db: None,
        table: "t".to_string(),
        source: Box::new(Plan::scan("t").filter(Expr::equal(Expr::Column(0), Expr::Param(1)))),
    };
    session.execute(prepare("del", delete), "PREPARE del").unwrap();

    assert!(session.execute(execute("del", vec![Expr::int(1)]), "EXECUTE del USING 1").unwrap().is_none());
    assert_eq!(stored_rows(&session).len(), 2);
}

#[test]
fn test_execute_prepared_write_under_snapshot() {
    let session = session_with_rows(3);
    let delete = Plan::Delete {
        db: None,
        table: "t".to_string(),
        source: Box::new(Plan::scan("t")),
    };
    session.execute(prepare("wipe", delete), "PREPARE wipe").unwrap();
    session
        .execute(
            Plan::Set {
                variable: "snapshot_ts".to_string(),
                value: Value::Integer(99),
            },
            "SET snapshot_ts = 99",
        )
        .unwrap();

    assert!(matches!(
        session.execute(execute("wipe", Vec::new()), "EXECUTE wipe"),
        Err(StatementError::SnapshotConflict { snapshot_ts: 99 })
    ));
    assert_eq!(stored_rows(&session).len(), 3);
}

#[test]
fn test_execute_unknown_name_is_wrapper_build_error() {
    let session = session_with_rows(1);
    match session.execute(execute("ghost", Vec::new()), "EXECUTE ghost") {
        Err(StatementError::WrapperBuild { text, source }) => {
            assert_eq!(text, "EXECUTE ghost");
            assert!(matches!(source, DatabaseError::PreparedStatementNotFound(name) if name == "ghost"));
        }
        other => panic!("expected WrapperBuild, got {other:?}"),
    }
}

#[test]
fn test_execute_wrong_arity_is_wrapper_build_error() {
    let session = session_with_rows(1);
    let query = Plan::scan("t").filter(Expr::equal(Expr::Column(0), Expr::Param(1)));
    session.execute(prepare("one", query), "PREPARE one").unwrap();

    let err = session.execute(execute("one", Vec::new()), "EXECUTE one").unwrap_err();
    assert!(matches!(
        err,
        StatementError::WrapperBuild {
            source: DatabaseError::ParamCountMismatch { expected: 1, actual: 0, .. },
            ..
        }
    ));
}

#[test]
fn test_execute_after_table_dropped() {
    let session = session_with_rows(1);
    session.execute(prepare("all", Plan::scan("t")), "PREPARE all").unwrap();
    session
        .execute(
            Plan::DropTable {
                db: None,
                table: "t".to_string(),
                if_exists: false,
            },
            "DROP TABLE t",
        )
        .unwrap();

    assert!(matches!(
        session.execute(execute("all", Vec::new()), "EXECUTE all"),
        Err(StatementError::WrapperBuild {
            source: DatabaseError::TableNotFound(_),
            ..
        })
    ));
}

#[test]
fn test_deallocate_then_execute() {
    let session = session_with_rows(1);
    session.execute(prepare("q", Plan::scan("t")), "PREPARE q").unwrap();
    session
        .execute(Plan::Deallocate { name: "Q".to_string() }, "DEALLOCATE PREPARE Q")
        .unwrap();
    assert!(matches!(
        session.execute(execute("q", Vec::new()), "EXECUTE q"),
        Err(StatementError::WrapperBuild { .. })
    ));
    assert!(matches!(
        session.execute(Plan::Deallocate { name: "q".to_string() }, "DEALLOCATE PREPARE q"),
        Err(StatementError::Execution {
            source: DatabaseError::PreparedStatementNotFound(_),
            ..
        })
    ));
}

mod support;

use pretty_assertions::assert_eq;
use relish::driver::{Operation, Record, Response};
use relish::stmt::{Expr, Value};
use serde_json::{json, Map, Value as Json};
use support::{layer, MockDriver, INVOICES, MEMBERSHIPS, PEOPLE};

fn object(value: Json) -> Map<String, Json> {
    match value {
        Json::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

fn person_row(id: i64, firstname: &str) -> Record {
    let mut row = Record::new();
    row.insert("id".to_string(), Value::I64(id));
    row.insert("firstname".to_string(), Value::String(firstname.to_string()));
    row
}

#[tokio::test]
async fn insert_returns_driver_assigned_identifiers() {
    let driver = MockDriver::new();
    let layer = layer(driver.clone()).await;

    let docs = vec![
        object(json!({"firstname": "john", "age": 30})),
        object(json!({"firstname": "jane", "age": 28})),
    ];
    let ids = layer.insert("people", &docs).await.unwrap();

    assert_eq!(ids, vec![Value::I64(1), Value::I64(2)]);

    let operations = driver.operations();
    assert_eq!(operations.len(), 2);
    for (operation, name) in operations.iter().zip(["john", "jane"]) {
        let Operation::Insert(insert) = operation else {
            panic!("expected insert operations");
        };
        assert_eq!(insert.model, PEOPLE);
        assert_eq!(insert.rows.len(), 1);
        assert_eq!(
            insert.rows[0].get(PEOPLE.field(1)),
            Some(&Value::String(name.to_string()))
        );
    }
}

#[tokio::test]
async fn insert_coerces_values_by_field_type() {
    let driver = MockDriver::new();
    let layer = layer(driver.clone()).await;

    let docs = vec![object(json!({
        "firstname": "john",
        "updated_at": "Tue, 02 Apr 2024 10:30:00 GMT"
    }))];
    layer.insert("people", &docs).await.unwrap();

    let operations = driver.operations();
    let Operation::Insert(insert) = &operations[0] else {
        panic!("expected an insert");
    };
    assert!(matches!(
        insert.rows[0].get(PEOPLE.field(5)),
        Some(Value::DateTime(_))
    ));

    // A mistyped value is a client error.
    let docs = vec![object(json!({"age": "thirty"}))];
    let err = layer.insert("people", &docs).await.unwrap_err();
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn nested_belongs_to_document_is_materialized_inline() {
    let driver = MockDriver::new();
    let layer = layer(driver.clone()).await;

    let docs = vec![object(json!({
        "number": 42,
        "people": {"firstname": "john"}
    }))];
    let ids = layer.insert("invoices", &docs).await.unwrap();

    let operations = driver.operations();
    assert_eq!(operations.len(), 2);

    // The related row is inserted first...
    let Operation::Insert(person) = &operations[0] else {
        panic!("expected the related insert first");
    };
    assert_eq!(person.model, PEOPLE);

    // ...and its identifier lands in the invoice's foreign key.
    let Operation::Insert(invoice) = &operations[1] else {
        panic!("expected the invoice insert second");
    };
    assert_eq!(invoice.model, INVOICES);
    assert_eq!(invoice.rows[0].get(INVOICES.field(2)), Some(&Value::I64(1)));
    assert_eq!(ids, vec![Value::I64(2)]);
}

#[tokio::test]
async fn belongs_to_identifier_sets_the_foreign_key_directly() {
    let driver = MockDriver::new();
    let layer = layer(driver.clone()).await;

    let docs = vec![object(json!({"number": 42, "people": 7}))];
    layer.insert("invoices", &docs).await.unwrap();

    let operations = driver.operations();
    assert_eq!(operations.len(), 1);
    let Operation::Insert(invoice) = &operations[0] else {
        panic!("expected a single insert");
    };
    assert_eq!(invoice.rows[0].get(INVOICES.field(2)), Some(&Value::I64(7)));
}

#[tokio::test]
async fn many_to_many_membership_creates_join_rows() {
    let driver = MockDriver::new();
    let layer = layer(driver.clone()).await;

    let docs = vec![object(json!({"name": "readers", "members": [4, 5]}))];
    let ids = layer.insert("groups", &docs).await.unwrap();
    let group_id = ids[0].clone();

    let operations = driver.operations();
    assert_eq!(operations.len(), 2);

    let Operation::Insert(join_rows) = &operations[1] else {
        panic!("expected the join-table insert");
    };
    assert_eq!(join_rows.model, MEMBERSHIPS);
    assert_eq!(join_rows.rows.len(), 2);
    for (row, person) in join_rows.rows.iter().zip([4i64, 5]) {
        assert_eq!(row.get(MEMBERSHIPS.field(1)), Some(&group_id));
        assert_eq!(row.get(MEMBERSHIPS.field(2)), Some(&Value::I64(person)));
    }
}

#[tokio::test]
async fn has_many_identifiers_repoint_the_children() {
    let driver = MockDriver::new();
    let layer = layer(driver.clone()).await;

    let docs = vec![object(json!({"firstname": "john", "invoices": [10, 11]}))];
    let ids = layer.insert("people", &docs).await.unwrap();

    let operations = driver.operations();
    assert_eq!(operations.len(), 2);

    let Operation::Update(update) = &operations[1] else {
        panic!("expected the children to be repointed");
    };
    assert_eq!(update.model, INVOICES);
    assert_eq!(
        update.filter,
        vec![Expr::in_list(
            Expr::field(INVOICES.field(0)),
            Value::List(vec![Value::I64(10), Value::I64(11)])
        )]
    );
    assert_eq!(update.assignments.get(INVOICES.field(2)), Some(&ids[0]));
}

#[tokio::test]
async fn update_rejects_changing_the_identifier() {
    let driver = MockDriver::new();
    driver.push_response(Response::Rows(vec![person_row(5, "john")]));

    let layer = layer(driver.clone()).await;

    let updates = object(json!({"id": 6, "firstname": "johnny"}));
    let err = layer
        .update("people", &json!(5), &updates)
        .await
        .unwrap_err();

    assert_eq!(err.status(), 400);
    assert!(err.to_string().contains("immutable"));

    // Nothing was written.
    let operations = driver.operations();
    assert!(operations
        .iter()
        .all(|op| matches!(op, Operation::Select(_))));
}

#[tokio::test]
async fn update_accepts_the_unchanged_identifier() {
    let driver = MockDriver::new();
    driver.push_response(Response::Rows(vec![person_row(5, "john")]));

    let layer = layer(driver.clone()).await;

    let updates = object(json!({"id": 5, "firstname": "johnny"}));
    layer.update("people", &json!(5), &updates).await.unwrap();

    let operations = driver.operations();
    let Operation::Update(update) = operations.last().unwrap() else {
        panic!("expected the update to run");
    };
    assert_eq!(
        update.assignments.get(PEOPLE.field(1)),
        Some(&Value::String("johnny".to_string()))
    );
}

#[tokio::test]
async fn update_of_a_vanished_row_is_an_internal_error() {
    let driver = MockDriver::new();
    // No scripted rows: the lookup comes back empty.
    let layer = layer(driver.clone()).await;

    let updates = object(json!({"firstname": "johnny"}));
    let err = layer
        .update("people", &json!(5), &updates)
        .await
        .unwrap_err();

    assert!(err.is_record_not_found());
    assert_eq!(err.status(), 500);
}

#[tokio::test]
async fn replace_deletes_then_inserts_under_the_same_identifier() {
    let driver = MockDriver::new();
    driver.push_response(Response::Rows(vec![person_row(5, "john")]));

    let layer = layer(driver.clone()).await;

    let doc = object(json!({"firstname": "johnny"}));
    layer.replace("people", &json!(5), &doc).await.unwrap();

    let operations = driver.operations();
    assert_eq!(operations.len(), 3);
    assert!(matches!(&operations[0], Operation::Select(_)));

    let Operation::Delete(delete) = &operations[1] else {
        panic!("expected the old row to be deleted");
    };
    assert_eq!(delete.model, PEOPLE);
    assert_eq!(
        delete.filter,
        vec![Expr::eq(Expr::field(PEOPLE.field(0)), Value::I64(5))]
    );

    let Operation::Insert(insert) = &operations[2] else {
        panic!("expected the replacement insert");
    };
    // The replacement keeps the addressed identifier.
    assert_eq!(insert.rows[0].get(PEOPLE.field(0)), Some(&Value::I64(5)));
    assert_eq!(
        insert.rows[0].get(PEOPLE.field(1)),
        Some(&Value::String("johnny".to_string()))
    );
}

#[tokio::test]
async fn remove_deletes_the_matching_rows() {
    let driver = MockDriver::new();
    let layer = layer(driver.clone()).await;

    let lookup = object(json!({"firstname": "john"}));
    layer.remove("people", &lookup).await.unwrap();

    let operations = driver.operations();
    assert_eq!(operations.len(), 1);
    let Operation::Delete(delete) = &operations[0] else {
        panic!("expected a delete");
    };
    assert_eq!(
        delete.filter,
        vec![Expr::eq(
            Expr::field(PEOPLE.field(1)),
            Value::String("john".to_string())
        )]
    );
}

#[tokio::test]
async fn unknown_document_field_is_a_client_error() {
    let driver = MockDriver::new();
    let layer = layer(driver.clone()).await;

    let docs = vec![object(json!({"shoe_size": 9}))];
    let err = layer.insert("people", &docs).await.unwrap_err();
    assert!(err.is_unknown_attribute());
    assert_eq!(err.status(), 400);
}

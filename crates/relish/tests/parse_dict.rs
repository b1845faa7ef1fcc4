mod support;

use pretty_assertions::assert_eq;
use relish::parse::parse_dictionary;
use relish::stmt::{Expr, Value};
use serde_json::{json, Map, Value as Json};
use support::{schema, GROUPS, INVOICES, MEMBERSHIPS, PEOPLE};

fn object(value: Json) -> Map<String, Json> {
    match value {
        Json::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

#[test]
fn empty_filter_yields_no_conditions() {
    let schema = schema();
    let people = schema.model(PEOPLE);

    let conditions = parse_dictionary(&Map::new(), people, &schema).unwrap();
    assert!(conditions.is_empty());
}

#[test]
fn scalar_equality() {
    let schema = schema();
    let people = schema.model(PEOPLE);

    let filter = object(json!({"firstname": "john"}));
    let conditions = parse_dictionary(&filter, people, &schema).unwrap();

    assert_eq!(
        conditions,
        vec![Expr::eq(
            Expr::field(PEOPLE.field(1)),
            Value::String("john".into())
        )]
    );
}

#[test]
fn list_value_compiles_to_membership() {
    let schema = schema();
    let people = schema.model(PEOPLE);

    let filter = object(json!({"firstname": ["john", "jane"]}));
    let conditions = parse_dictionary(&filter, people, &schema).unwrap();

    assert_eq!(
        conditions,
        vec![Expr::in_list(
            Expr::field(PEOPLE.field(1)),
            Value::List(vec!["john".into(), "jane".into()])
        )]
    );
}

#[test]
fn operator_call_value_compiles_to_named_operator_not_equality() {
    let schema = schema();
    let people = schema.model(PEOPLE);

    let filter = object(json!({"firstname": "like(\"%john%\")"}));
    let conditions = parse_dictionary(&filter, people, &schema).unwrap();

    assert_eq!(
        conditions,
        vec![Expr::named_op(
            Expr::field(PEOPLE.field(1)),
            "like",
            Value::String("%john%".into())
        )]
    );
}

#[test]
fn compact_range_key_takes_the_expression_path() {
    let schema = schema();
    let people = schema.model(PEOPLE);

    let filter = object(json!({"age>": 18}));
    let conditions = parse_dictionary(&filter, people, &schema).unwrap();

    assert_eq!(
        conditions,
        vec![Expr::gt(Expr::field(PEOPLE.field(3)), Value::I64(18))]
    );
}

#[test]
fn expression_interpretation_wins_over_structural_dict() {
    let schema = schema();
    let people = schema.model(PEOPLE);

    // `{"age": ">18"}` re-parses as `age>18`: a range, not an equality on
    // the text ">18".
    let filter = object(json!({"age": ">18"}));
    let conditions = parse_dictionary(&filter, people, &schema).unwrap();

    assert_eq!(
        conditions,
        vec![Expr::gt(Expr::field(PEOPLE.field(3)), Value::I64(18))]
    );
}

#[test]
fn dotted_key_appends_the_join_then_the_condition() {
    let schema = schema();
    let invoices = schema.model(INVOICES);

    let filter = object(json!({"people.firstname": "john"}));
    let conditions = parse_dictionary(&filter, invoices, &schema).unwrap();

    assert_eq!(
        conditions,
        vec![
            Expr::join(INVOICES.field(2), PEOPLE.field(0)),
            Expr::eq(Expr::field(PEOPLE.field(1)), Value::String("john".into())),
        ]
    );
}

#[test]
fn relation_key_compares_the_remote_primary_key() {
    let schema = schema();
    let invoices = schema.model(INVOICES);

    let filter = object(json!({"people": 5}));
    let conditions = parse_dictionary(&filter, invoices, &schema).unwrap();

    assert_eq!(
        conditions,
        vec![
            Expr::join(INVOICES.field(2), PEOPLE.field(0)),
            Expr::eq(Expr::field(PEOPLE.field(0)), Value::I64(5)),
        ]
    );
}

#[test]
fn and_or_keys_recurse_into_sub_filters() {
    let schema = schema();
    let people = schema.model(PEOPLE);

    let filter = object(json!({
        "or_": [{"firstname": "john"}, {"firstname": "jane"}]
    }));
    let conditions = parse_dictionary(&filter, people, &schema).unwrap();

    assert_eq!(conditions.len(), 1);
    match &conditions[0] {
        Expr::Or(or) => assert_eq!(or.operands.len(), 2),
        other => panic!("expected OR, got {other:?}"),
    }

    let filter = object(json!({
        "and_": [{"age>": 18}, {"or_": [{"firstname": "john"}, {"lastname": "doe"}]}]
    }));
    let conditions = parse_dictionary(&filter, people, &schema).unwrap();

    assert_eq!(conditions.len(), 1);
    match &conditions[0] {
        Expr::And(and) => {
            assert_eq!(and.operands.len(), 2);
            assert!(matches!(&and.operands[1], Expr::Or(_)));
        }
        other => panic!("expected AND, got {other:?}"),
    }
}

#[test]
fn and_with_json_encoded_string_operands() {
    let schema = schema();
    let people = schema.model(PEOPLE);

    let filter = object(json!({
        "and_": "[{\"firstname\": \"john\"}, {\"lastname\": \"doe\"}]"
    }));
    let conditions = parse_dictionary(&filter, people, &schema).unwrap();

    assert_eq!(conditions.len(), 1);
    assert!(matches!(&conditions[0], Expr::And(and) if and.operands.len() == 2));
}

#[test]
fn malformed_boolean_operand_is_a_parse_error() {
    let schema = schema();
    let people = schema.model(PEOPLE);

    let filter = object(json!({"and_": 7}));
    let err = parse_dictionary(&filter, people, &schema).unwrap_err();
    assert!(err.is_parse());
}

#[test]
fn association_proxy_contains_semantics() {
    let schema = schema();
    let groups = schema.model(GROUPS);

    // Non-dict value: match the proxied attribute itself.
    let filter = object(json!({"member_names": "john"}));
    let conditions = parse_dictionary(&filter, groups, &schema).unwrap();

    assert_eq!(
        conditions,
        vec![
            Expr::join(GROUPS.field(0), MEMBERSHIPS.field(1)),
            Expr::secondary_join(MEMBERSHIPS.field(2), PEOPLE.field(0)),
            Expr::eq(Expr::field(PEOPLE.field(1)), Value::String("john".into())),
        ]
    );
}

#[test]
fn association_proxy_any_semantics() {
    let schema = schema();
    let groups = schema.model(GROUPS);

    // Dict value: match the remote objects' attributes.
    let filter = object(json!({"member_names": {"firstname": "john", "lastname": "doe"}}));
    let conditions = parse_dictionary(&filter, groups, &schema).unwrap();

    assert_eq!(
        conditions,
        vec![
            Expr::join(GROUPS.field(0), MEMBERSHIPS.field(1)),
            Expr::secondary_join(MEMBERSHIPS.field(2), PEOPLE.field(0)),
            Expr::eq(Expr::field(PEOPLE.field(1)), Value::String("john".into())),
            Expr::eq(Expr::field(PEOPLE.field(2)), Value::String("doe".into())),
        ]
    );
}

#[test]
fn many_to_many_relation_key_emits_both_join_legs() {
    let schema = schema();
    let groups = schema.model(GROUPS);

    let filter = object(json!({"members": 5}));
    let conditions = parse_dictionary(&filter, groups, &schema).unwrap();

    assert_eq!(
        conditions,
        vec![
            Expr::join(GROUPS.field(0), MEMBERSHIPS.field(1)),
            Expr::secondary_join(MEMBERSHIPS.field(2), PEOPLE.field(0)),
            Expr::eq(Expr::field(PEOPLE.field(0)), Value::I64(5)),
        ]
    );
}

#[test]
fn unknown_field_is_an_attribute_error_not_a_parse_error() {
    let schema = schema();
    let people = schema.model(PEOPLE);

    let filter = object(json!({"shoe_size": 9}));
    let err = parse_dictionary(&filter, people, &schema).unwrap_err();
    assert!(err.is_unknown_attribute());
}

#[test]
fn date_strings_in_dict_values_match_expression_semantics() {
    let schema = schema();
    let people = schema.model(PEOPLE);

    let via_dict = parse_dictionary(
        &object(json!({"updated_at": "Tue, 02 Apr 2024 10:30:00 GMT"})),
        people,
        &schema,
    )
    .unwrap();
    let via_expr = relish::parse::parse(
        "updated_at==\"Tue, 02 Apr 2024 10:30:00 GMT\"",
        people,
        &schema,
    )
    .unwrap();

    assert_eq!(via_dict, via_expr);
}

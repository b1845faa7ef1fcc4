use super::{expr, operator_call};
use crate::path;
use relish_core::schema::{FieldTy, Model};
use relish_core::stmt::{Expr, Value};
use relish_core::{Error, Result, Schema};
use serde_json::{Map, Value as Json};

/// Parse a JSON filter object into a list of query conditions.
///
/// Each key is first attempted against the expression grammar (the key and
/// value concatenated and re-parsed), which is how compact range syntax like
/// `{"age>": 18}` works; when both interpretations are possible the
/// expression one wins. Keys that fail that probe take the structural path:
/// `and_`/`or_` recursion, relation and association-proxy semantics, then
/// scalar handling with operator-call, membership, and equality fallbacks.
pub fn parse_dictionary(
    filter: &Map<String, Json>,
    model: &Model,
    schema: &Schema,
) -> Result<Vec<Expr>> {
    let mut conditions = Vec::new();

    for (key, value) in filter {
        // First let's check with the expression parser.
        if let Some(fragment) = expression_fragment(key, value) {
            match expr::parse(&fragment, model, schema) {
                Ok(parsed) => {
                    conditions.extend(parsed);
                    continue;
                }
                Err(err) if err.is_parse() => {}
                Err(err) => return Err(err),
            }
        }

        if key == "and_" || key == "or_" {
            let operands = boolean_operands(key, value, model, schema)?;
            conditions.push(if key == "and_" {
                Expr::and_from_vec(operands)
            } else {
                Expr::or_from_vec(operands)
            });
            continue;
        }

        let (field, joins) = path::resolve(schema, model, key)?;
        conditions.extend(joins);

        match &field.ty {
            FieldTy::AssociationProxy(proxy) => {
                let owner = schema.model(field.id.model);
                let has_many = proxy.has_many(schema);
                conditions.extend(has_many.join_exprs(schema, owner));

                if let Json::Object(attrs) = value {
                    // Dict-shaped values match the remote objects' attributes
                    // (`.any(...)` semantics).
                    let target = has_many.target(schema);
                    for (attr, attr_value) in attrs {
                        let attr_field = target.field_by_name(attr).ok_or_else(|| {
                            Error::unknown_attribute(target.name.upper_camel_case(), attr.clone())
                        })?;
                        conditions.push(Expr::eq(
                            Expr::field(attr_field.id),
                            literal(attr_value, schema)?,
                        ));
                    }
                } else {
                    // Everything else matches the proxied attribute itself
                    // (`.contains(...)` semantics).
                    let target_field = proxy.target_field(schema)?;
                    conditions.push(Expr::eq(
                        Expr::field(target_field.id),
                        literal(value, schema)?,
                    ));
                }
            }

            // Relations compare against the remote primary-key column, not
            // the relationship object.
            FieldTy::BelongsTo(rel) => {
                let owner = schema.model(field.id.model);
                conditions.extend(rel.join_exprs(schema, owner));
                conditions.push(Expr::eq(
                    Expr::field(rel.remote_column(schema)),
                    literal(value, schema)?,
                ));
            }
            FieldTy::HasMany(rel) => {
                let owner = schema.model(field.id.model);
                conditions.extend(rel.join_exprs(schema, owner));
                conditions.push(Expr::eq(
                    Expr::field(rel.remote_column(schema)),
                    literal(value, schema)?,
                ));
            }

            FieldTy::Scalar(_) => {
                // Try a parametrized operator call first, e.g.
                // `like("%john%")`.
                if let Json::String(raw) = value {
                    if let Some((op, op_value)) = operator_call::parse(raw) {
                        conditions.push(Expr::named_op(Expr::field(field.id), op, op_value));
                        continue;
                    }
                }

                let value = literal(value, schema)?;
                conditions.push(match value {
                    Value::List(_) => Expr::in_list(Expr::field(field.id), value),
                    value => Expr::eq(Expr::field(field.id), value),
                });
            }
        }
    }

    Ok(conditions)
}

/// Renders a key/value pair as an expression-grammar fragment for the
/// tie-break probe. Only scalar text and numbers can form a fragment.
fn expression_fragment(key: &str, value: &Json) -> Option<String> {
    match value {
        Json::String(s) => Some(format!("{key}{s}")),
        Json::Number(n) => Some(format!("{key}{n}")),
        _ => None,
    }
}

fn boolean_operands(
    key: &str,
    value: &Json,
    model: &Model,
    schema: &Schema,
) -> Result<Vec<Expr>> {
    // The operand list may arrive as JSON, or as a string holding JSON.
    let decoded;
    let items = match value {
        Json::Array(items) => items,
        Json::String(raw) => {
            decoded = serde_json::from_str::<Json>(raw)
                .map_err(|_| Error::parse(format!("can't parse expression '{raw}'")))?;
            match &decoded {
                Json::Array(items) => items,
                _ => return Err(Error::parse(format!("can't parse expression '{raw}'"))),
            }
        }
        _ => return Err(Error::parse(format!("can't parse expression '{value}'"))),
    };

    let mut operands = Vec::new();
    for item in items {
        let sub_filter = item
            .as_object()
            .ok_or_else(|| Error::parse(format!("can't parse expression '{item}'")))?;
        operands.extend(parse_dictionary(sub_filter, model, schema)?);
    }

    if operands.is_empty() {
        return Err(Error::parse(format!("can't parse expression '{key}'")));
    }

    Ok(operands)
}

/// Converts a JSON literal to a value, probing strings for dates with the
/// schema's date format.
fn literal(value: &Json, schema: &Schema) -> Result<Value> {
    let value = Value::from_json(value)
        .ok_or_else(|| Error::parse(format!("can't parse expression '{value}'")))?;

    Ok(match value {
        Value::String(s) => schema.str_to_date(&s).unwrap_or(Value::String(s)),
        Value::List(items) => Value::List(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => schema.str_to_date(&s).unwrap_or(Value::String(s)),
                    item => item,
                })
                .collect(),
        ),
        value => value,
    })
}

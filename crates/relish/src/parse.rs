//! The dual-syntax filter parser and the clause parsers that feed the
//! request orchestrator.
//!
//! Filters arrive either as a JSON object (`{"name": "john"}`) or as a
//! restricted boolean expression (`name=="john" and age>18`). Both forms
//! compile to the same flat condition list, so a query written in either
//! syntax selects the same rows.

mod ast;

mod dict;
pub use dict::parse_dictionary;

mod expr;
pub use expr::parse;

mod lexer;

pub mod operator_call;

mod sort;
pub use sort::parse_sort_clause;

use relish_core::{schema::Model, stmt, Error, Result, Schema};

/// Parses a schema-declared filter, which may be written in either syntax.
/// JSON objects take the dictionary path; anything else must parse as an
/// expression.
pub fn parse_filter(raw: &str, model: &Model, schema: &Schema) -> Result<Vec<stmt::Expr>> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => parse_dictionary(&map, model, schema),
        _ => parse(raw, model, schema),
    }
}

/// Parses a client `where` clause: JSON object form first, then the
/// expression grammar. Both grammars exhausted is a client error.
pub fn parse_where(raw: &str, model: &Model, schema: &Schema) -> Result<Vec<stmt::Expr>> {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(raw) {
        return parse_dictionary(&map, model, schema);
    }

    match parse(raw, model, schema) {
        Ok(conditions) => Ok(conditions),
        Err(err) if err.is_parse() => Err(Error::parse("unable to parse `where` clause")),
        Err(err) => Err(err),
    }
}

/// Parses a client projection clause: a JSON list of field names, or an
/// object of `field: 0|1` flags (only inclusions are honored).
pub fn parse_projection(raw: &str) -> Result<Vec<String>> {
    use serde_json::Value as Json;

    let parsed: Json = serde_json::from_str(raw)
        .map_err(|_| Error::parse("unable to parse `projection` clause"))?;

    match parsed {
        Json::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Json::String(s) => Ok(s),
                _ => Err(Error::parse("unable to parse `projection` clause")),
            })
            .collect(),
        Json::Object(map) => Ok(map
            .into_iter()
            .filter(|(_, enabled)| matches!(enabled, Json::Number(n) if n.as_i64() == Some(1)))
            .map(|(field, _)| field)
            .collect()),
        _ => Err(Error::parse("unable to parse `projection` clause")),
    }
}

/// Parses a client `embedded` clause: a JSON object of `field: 0|1` flags.
pub fn parse_embedded(raw: &str) -> Result<Vec<String>> {
    use serde_json::Value as Json;

    match serde_json::from_str::<Json>(raw) {
        Ok(Json::Object(map)) => Ok(map
            .into_iter()
            .filter(|(_, enabled)| matches!(enabled, Json::Number(n) if n.as_i64() == Some(1)))
            .map(|(field, _)| field)
            .collect()),
        _ => Err(Error::parse("unable to parse `embedded` clause")),
    }
}

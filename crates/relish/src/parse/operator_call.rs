//! Parser for operator-call filter values.
//!
//! Recognizes strings of the shape `operator(value)`:
//!
//! ```text
//! like("%john%")
//! ilike("john%")
//! similar to("%(ohn|acob)")
//! in(["a","b"])
//! ```
//!
//! The operator name is made of word characters and whitespace, followed by
//! one or more opening parentheses, a JSON-encoded value, and one or more
//! closing parentheses. Anything else is not an operator call; the caller
//! falls back to default operator inference.

use relish_core::stmt::Value;

pub fn parse(expression: &str) -> Option<(String, Value)> {
    let open = expression.find('(')?;

    let name = expression[..open].trim();
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c.is_whitespace())
    {
        return None;
    }

    // Consume the run of opening parens, and the run of closing parens from
    // the end.
    let rest = &expression[open..];
    let value_start = rest.len() - rest.trim_start_matches('(').len();
    let trailing = rest.len() - rest.trim_end_matches(')').len();
    if trailing == 0 {
        return None;
    }

    let raw_value = &rest[value_start..rest.len() - trailing];
    if raw_value.is_empty() {
        return None;
    }

    // The value is decoded as JSON; strings that are not valid JSON are not
    // operator calls.
    let json = serde_json::from_str::<serde_json::Value>(raw_value).ok()?;
    let value = Value::from_json(&json)?;

    Some((name.to_string(), value))
}

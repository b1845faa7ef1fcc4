//! Sort-key resolution.

use crate::path;
use relish_core::schema::Model;
use relish_core::stmt::{Direction, Expr, OrderByExpr};
use relish_core::{stmt, Result, Schema};

/// Resolves a sort key that may traverse relationships.
///
/// Returns the resolved ordering expression plus the join predicates needed
/// to reach the key, to be appended to the query filter:
///
/// ```text
/// let (order_by, joins) = sorting::resolve(...)?;
/// select.combine(joins);
/// ```
///
/// A direction flag of `-1` orders descending. When `expression` is
/// supplied, it is applied to the resolved attribute as a zero-argument
/// transformation (e.g. a case-insensitive collation) before ordering.
pub fn resolve(
    schema: &Schema,
    model: &Model,
    key: &str,
    order: i64,
    expression: Option<&str>,
) -> Result<(OrderByExpr, Vec<stmt::Expr>)> {
    let (field, joins) = path::resolve(schema, model, key)?;

    let mut expr = Expr::field(field.id);
    if let Some(name) = expression {
        expr = Expr::func(name, vec![expr]);
    }

    Ok((
        OrderByExpr {
            expr,
            order: Direction::from_flag(order),
        },
        joins,
    ))
}

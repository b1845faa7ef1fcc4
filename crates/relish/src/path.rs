//! Dotted attribute-path resolution.

use relish_core::schema::{Field, FieldTy, Model};
use relish_core::{stmt, Error, Result, Schema};

/// Resolves a (possibly nested) attribute path against a starting model.
///
/// Returns the leaf field together with the join predicates required to
/// reach it, in traversal order (outermost relationship first). Resolution
/// never mutates schema metadata; an unknown attribute at any hop is an
/// attribute-resolution error, not a parse error; the caller decides how
/// to surface it.
pub fn resolve<'a>(
    schema: &'a Schema,
    model: &'a Model,
    path: &str,
) -> Result<(&'a Field, Vec<stmt::Expr>)> {
    let mut parts = path.split('.');

    let first = parts.next().expect("split yields at least one part");
    let mut field = lookup(model, first)?;
    let mut joins = Vec::new();

    for part in parts {
        let owner = schema.model(field.id.model);

        let target = match &field.ty {
            FieldTy::BelongsTo(rel) => {
                joins.extend(rel.join_exprs(schema, owner));
                rel.target(schema)
            }
            FieldTy::HasMany(rel) => {
                joins.extend(rel.join_exprs(schema, owner));
                rel.target(schema)
            }
            FieldTy::AssociationProxy(proxy) => {
                let has_many = proxy.has_many(schema);
                joins.extend(has_many.join_exprs(schema, owner));
                has_many.target(schema)
            }
            FieldTy::Scalar(_) => {
                // Scalars have no attributes to walk into.
                return Err(Error::unknown_attribute(
                    owner.name.upper_camel_case(),
                    format!("{}.{}", field.name.app_name, part),
                ));
            }
        };

        field = lookup(target, part)?;
    }

    Ok((field, joins))
}

fn lookup<'a>(model: &'a Model, name: &str) -> Result<&'a Field> {
    model
        .field_by_name(name)
        .ok_or_else(|| Error::unknown_attribute(model.name.upper_camel_case(), name))
}

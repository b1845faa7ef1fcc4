use super::{FieldId, FieldTy, Model, ModelId, Resource, Schema, DEFAULT_DATE_FORMAT};
use crate::Result;
use indexmap::IndexMap;

/// Assembles and verifies a [`Schema`]: links relation pairs, checks
/// association proxies and join tables, and resolves resource field names.
#[derive(Default)]
pub struct Builder {
    models: Vec<Model>,
    resources: Vec<Resource>,
    date_format: Option<String>,
}

impl Builder {
    pub fn model(&mut self, model: Model) -> &mut Self {
        self.models.push(model);
        self
    }

    pub fn resource(&mut self, resource: Resource) -> &mut Self {
        self.resources.push(resource);
        self
    }

    /// Overrides the strftime-style format used to auto-detect date literals.
    pub fn date_format(&mut self, format: impl Into<String>) -> &mut Self {
        self.date_format = Some(format.into());
        self
    }

    pub fn build(&mut self) -> Result<Schema> {
        let mut models: IndexMap<ModelId, Model> = IndexMap::new();

        for model in self.models.drain(..) {
            if models.insert(model.id, model).is_some() {
                return Err(crate::Error::invalid_schema(
                    "two models registered with the same id",
                ));
            }
        }

        link_relations(&mut models)?;
        verify_models(&models)?;

        let mut resources = IndexMap::new();
        for resource in self.resources.drain(..) {
            verify_resource(&models, &resource)?;
            if resources
                .insert(resource.name.clone(), resource)
                .is_some()
            {
                return Err(crate::Error::invalid_schema(
                    "two resources registered with the same name",
                ));
            }
        }

        Ok(Schema {
            models,
            resources,
            date_format: self
                .date_format
                .take()
                .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
        })
    }
}

/// Go through all relations and link them to their pairs.
fn link_relations(models: &mut IndexMap<ModelId, Model>) -> Result<()> {
    // Arbitrary models are mutated throughout the linking process, so use
    // index-based iteration instead of holding references.

    // First, link HasMany relations to the BelongsTo on their target.
    for curr in 0..models.len() {
        for index in 0..models[curr].fields.len() {
            let model = &models[curr];
            let src = model.id;
            let field = &model.fields[index];

            if let FieldTy::HasMany(has_many) = &field.ty {
                if has_many.through.is_some() {
                    continue;
                }
                let target = has_many.target;
                let field_name = field.name.app_name.clone();
                let pair = find_belongs_to_pair(models, src, target, &field_name)?;
                models[curr].fields[index].ty.expect_has_many_mut().pair = pair;
            }
        }
    }

    // Then give each BelongsTo its reverse pair, when one exists.
    for curr in 0..models.len() {
        for index in 0..models[curr].fields.len() {
            let field_id = models[curr].fields[index].id;

            let pair = match &models[curr].fields[index].ty {
                FieldTy::BelongsTo(belongs_to) => {
                    let target = match models.get_index_of(&belongs_to.target) {
                        Some(target) => target,
                        None => {
                            let model = &models[curr];
                            return Err(crate::Error::invalid_schema(format!(
                                "field `{}::{}` references a model that was not registered \
                                 with the schema",
                                model.name.upper_camel_case(),
                                model.fields[index].name.app_name,
                            )));
                        }
                    };

                    let mut pair = None;
                    for target_index in 0..models[target].fields.len() {
                        if let FieldTy::HasMany(has_many) = &models[target].fields[target_index].ty
                        {
                            if has_many.through.is_none() && has_many.pair == field_id {
                                pair = Some(models[target].fields[target_index].id);
                            }
                        }
                    }

                    match pair {
                        Some(pair) => pair,
                        None => continue,
                    }
                }
                _ => continue,
            };

            models[curr].fields[index].ty.expect_belongs_to_mut().pair = Some(pair);
        }
    }

    Ok(())
}

fn find_belongs_to_pair(
    models: &IndexMap<ModelId, Model>,
    src: ModelId,
    target: ModelId,
    field_name: &str,
) -> Result<FieldId> {
    let src_model = &models[&src];

    let target = match models.get(&target) {
        Some(target) => target,
        None => {
            return Err(crate::Error::invalid_schema(format!(
                "field `{}::{}` references a model that was not registered with the schema",
                src_model.name.upper_camel_case(),
                field_name,
            )));
        }
    };

    // Find all BelongsTo relations that reference the model
    let belongs_to: Vec<_> = target
        .fields
        .iter()
        .filter(|field| match &field.ty {
            FieldTy::BelongsTo(rel) => rel.target == src,
            _ => false,
        })
        .collect();

    match &belongs_to[..] {
        [field] => Ok(field.id),
        [] => Err(crate::Error::invalid_schema(format!(
            "field `{}::{}` has no matching `BelongsTo` relation on the target model",
            src_model.name.upper_camel_case(),
            field_name,
        ))),
        _ => Err(crate::Error::invalid_schema(format!(
            "model `{}` has more than one `BelongsTo` relation targeting `{}`",
            target.name.upper_camel_case(),
            src_model.name.upper_camel_case(),
        ))),
    }
}

fn verify_models(models: &IndexMap<ModelId, Model>) -> Result<()> {
    for model in models.values() {
        let pk = model.primary_key;
        if pk.model != model.id || pk.index >= model.fields.len() {
            return Err(crate::Error::invalid_schema(format!(
                "model `{}` has an invalid primary-key field",
                model.name.upper_camel_case(),
            )));
        }

        for field in &model.fields {
            match &field.ty {
                FieldTy::Scalar(_) => {}
                FieldTy::BelongsTo(belongs_to) => {
                    let fk = belongs_to.foreign_key;
                    let fk_is_local_scalar = fk.model == model.id
                        && model
                            .fields
                            .get(fk.index)
                            .map(|field| field.ty.is_scalar())
                            .unwrap_or(false);
                    if !fk_is_local_scalar {
                        return Err(crate::Error::invalid_schema(format!(
                            "field `{}::{}` must use a local scalar field as its foreign key",
                            model.name.upper_camel_case(),
                            field.name.app_name,
                        )));
                    }
                }
                FieldTy::HasMany(has_many) => {
                    if !models.contains_key(&has_many.target) {
                        return Err(crate::Error::invalid_schema(format!(
                            "field `{}::{}` references a model that was not registered with \
                             the schema",
                            model.name.upper_camel_case(),
                            field.name.app_name,
                        )));
                    }
                    if let Some(through) = &has_many.through {
                        let join = models.get(&through.model).ok_or_else(|| {
                            crate::Error::invalid_schema(format!(
                                "field `{}::{}` names an unregistered join-table model",
                                model.name.upper_camel_case(),
                                field.name.app_name,
                            ))
                        })?;
                        for leg in [through.source, through.target] {
                            let leg_is_scalar = leg.model == join.id
                                && join
                                    .fields
                                    .get(leg.index)
                                    .map(|field| field.ty.is_scalar())
                                    .unwrap_or(false);
                            if !leg_is_scalar {
                                return Err(crate::Error::invalid_schema(format!(
                                    "field `{}::{}` has a join-table leg that is not a scalar \
                                     field on the join model",
                                    model.name.upper_camel_case(),
                                    field.name.app_name,
                                )));
                            }
                        }
                    }
                }
                FieldTy::AssociationProxy(proxy) => {
                    let through = proxy.through;
                    if through.model != model.id || through.index >= model.fields.len() {
                        return Err(crate::Error::invalid_schema(format!(
                            "association proxy `{}::{}` must read through a relation on its \
                             own model",
                            model.name.upper_camel_case(),
                            field.name.app_name,
                        )));
                    }
                    let has_many = match &model.fields[through.index].ty {
                        FieldTy::HasMany(has_many) => has_many,
                        _ => {
                            return Err(crate::Error::invalid_schema(format!(
                                "association proxy `{}::{}` must read through a `HasMany`",
                                model.name.upper_camel_case(),
                                field.name.app_name,
                            )))
                        }
                    };
                    let target = models.get(&has_many.target).ok_or_else(|| {
                        crate::Error::invalid_schema(format!(
                            "field `{}::{}` references a model that was not registered with \
                             the schema",
                            model.name.upper_camel_case(),
                            field.name.app_name,
                        ))
                    })?;
                    if target.field_by_name(&proxy.attr).is_none() {
                        return Err(crate::Error::invalid_schema(format!(
                            "association proxy `{}::{}` exposes `{}`, which does not exist on \
                             `{}`",
                            model.name.upper_camel_case(),
                            field.name.app_name,
                            proxy.attr,
                            target.name.upper_camel_case(),
                        )));
                    }
                }
            }
        }
    }

    Ok(())
}

fn verify_resource(models: &IndexMap<ModelId, Model>, resource: &Resource) -> Result<()> {
    let model = models.get(&resource.model).ok_or_else(|| {
        crate::Error::invalid_schema(format!(
            "resource `{}` references a model that was not registered with the schema",
            resource.name,
        ))
    })?;

    let mut scalar_fields = vec![Some(&resource.id_field)];
    scalar_fields.push(resource.soft_delete.as_ref());
    scalar_fields.push(resource.last_updated.as_ref());

    for name in scalar_fields.into_iter().flatten() {
        let field = model.field_by_name(name).ok_or_else(|| {
            crate::Error::invalid_schema(format!(
                "resource `{}` names `{}`, which does not exist on model `{}`",
                resource.name,
                name,
                model.name.upper_camel_case(),
            ))
        })?;
        if !field.ty.is_scalar() {
            return Err(crate::Error::invalid_schema(format!(
                "resource `{}` names `{}`, which must be a scalar field",
                resource.name, name,
            )));
        }
    }

    Ok(())
}

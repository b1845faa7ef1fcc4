use crate::db::{Pool, PoolConnection, DEFAULT_PREFIX};
use crate::{parse, sorting, Collection, Request};

use relish_core::driver::{Operation, Record};
use relish_core::schema::{FieldId, FieldTy, Model, Resource};
use relish_core::stmt::{self, Assignments, Expr, Limit, OrderBy, Projection, Select, Value};
use relish_core::{Error, Result, Schema};

use async_recursion::async_recursion;
use indexmap::IndexMap;
use serde_json::{Map, Value as Json};
use std::sync::Arc;

/// The request orchestrator: merges client filters, sub-resource lookups,
/// schema-declared defaults, and internal exclusion filters into one
/// consistent condition list, then executes it against the backing model.
///
/// One `DataLayer` is built at startup and owns a connection pool per
/// configured prefix for the life of the process.
pub struct DataLayer {
    schema: Arc<Schema>,
    pools: IndexMap<String, Pool>,
}

/// Deferred multi-valued relation payload, applied once the parent row's
/// identifier is known.
struct HasManyStep {
    field: FieldId,
    items: Vec<Json>,
}

impl DataLayer {
    pub fn builder() -> crate::Builder {
        crate::Builder::default()
    }

    pub(crate) fn new(schema: Arc<Schema>, pools: IndexMap<String, Pool>) -> Self {
        Self { schema, pools }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Closes every pool. Part of shutdown; queries issued afterwards fail.
    pub fn close(&self) {
        for pool in self.pools.values() {
            pool.close();
        }
    }

    /// Retrieves a set of records matching the request. Filters can be
    /// expressed in two different formats: the JSON object syntax,
    ///
    /// ```text
    /// ?where={"name": "john doe"}
    /// ```
    ///
    /// and the python-like expression syntax:
    ///
    /// ```text
    /// ?where=name=="john doe"
    /// ```
    ///
    /// The result set is paginated. When `perform_count` is false the
    /// (potentially expensive) total count is skipped.
    pub async fn find(
        &self,
        resource: &str,
        req: &Request,
        sub_resource_lookup: Option<&Map<String, Json>>,
        perform_count: bool,
    ) -> Result<Collection> {
        let resource = self.schema.resource(resource)?;
        let model = resource.model(&self.schema);

        let client_sort = match &req.sort {
            Some(raw) => parse::parse_sort_clause(raw)?,
            None => Vec::new(),
        };

        let mut select = self.datasource(resource)?;

        if let Some(raw) = &req.where_ {
            select.combine(parse::parse_where(raw, model, &self.schema)?);
        }

        self.validate_filters(resource, &select.filter)?;

        if let Some(lookup) = sub_resource_lookup {
            select.combine(parse::parse_dictionary(lookup, model, &self.schema)?);
        }

        self.apply_soft_delete(resource, model, req, &mut select);

        if let Some(since) = req.if_modified_since {
            if let Some(field_name) = &resource.last_updated {
                let field = model
                    .field_by_name(field_name)
                    .expect("resource fields are verified at build time");
                select
                    .filter
                    .push(Expr::gt(Expr::field(field.id), Value::DateTime(since)));
            }
        }

        let sort_specs: Vec<(String, i64)> = if client_sort.is_empty() {
            resource
                .default_sort
                .iter()
                .map(|(field, direction)| {
                    (field.clone(), if direction.is_desc() { -1 } else { 1 })
                })
                .collect()
        } else {
            client_sort
        };

        if !sort_specs.is_empty() {
            let mut exprs = Vec::new();
            for (key, flag) in &sort_specs {
                let (order_by, joins) = sorting::resolve(&self.schema, model, key, *flag, None)?;
                select.combine(joins);
                exprs.push(order_by);
            }
            select.order_by = Some(OrderBy { exprs });
        }

        if let Some(raw) = &req.projection {
            let requested = parse::parse_projection(raw)?;
            select.projection.narrow(&requested);
        }

        if let Some(raw) = &req.embedded {
            let embedded = parse::parse_embedded(raw)?;
            self.embed_relations(model, &embedded, &mut select.projection);
        }

        if req.max_results > 0 {
            select.limit = Some(Limit::paginate(req.page.max(1), req.max_results));
        }

        tracing::debug!(
            resource = resource.name.as_str(),
            conditions = select.filter.len(),
            "find"
        );

        let mut conn = self.pool(resource)?.get().await?;

        let count = if perform_count {
            let count = conn
                .execute(&self.schema, Operation::Count(select.unpaginated()))
                .await?
                .into_count()?;
            Some(count)
        } else {
            None
        };

        let rows = conn
            .execute(&self.schema, Operation::Select(select))
            .await?
            .into_rows()?;

        Ok(Collection::new(rows, count))
    }

    /// Retrieves the single record matching a structured lookup, or `None`.
    pub async fn find_one(
        &self,
        resource: &str,
        req: &Request,
        lookup: &Map<String, Json>,
    ) -> Result<Option<Record>> {
        let resource = self.schema.resource(resource)?;
        let model = resource.model(&self.schema);

        let mut select = self.datasource(resource)?;
        select.combine(parse::parse_dictionary(lookup, model, &self.schema)?);
        self.apply_soft_delete(resource, model, req, &mut select);

        if let Some(raw) = &req.projection {
            let requested = parse::parse_projection(raw)?;
            select.projection.narrow(&requested);
        }
        if let Some(raw) = &req.embedded {
            let embedded = parse::parse_embedded(raw)?;
            self.embed_relations(model, &embedded, &mut select.projection);
        }

        select.limit = Some(Limit::new(1));

        let mut conn = self.pool(resource)?.get().await?;
        let mut rows = conn
            .execute(&self.schema, Operation::Select(select))
            .await?
            .into_rows()?;

        Ok(rows.pop())
    }

    /// True if no records live behind the resource's datasource filter.
    pub async fn is_empty(&self, resource: &str) -> Result<bool> {
        let resource = self.schema.resource(resource)?;
        let select = self.datasource(resource)?;

        let mut conn = self.pool(resource)?.get().await?;
        let count = conn
            .execute(&self.schema, Operation::Count(select))
            .await?
            .into_count()?;

        Ok(count == 0)
    }

    /// Inserts one row per document and returns the new identifiers, in
    /// order. Each document commits separately.
    pub async fn insert(
        &self,
        resource: &str,
        docs: &[Map<String, Json>],
    ) -> Result<Vec<Value>> {
        let resource = self.schema.resource(resource)?;
        let model = resource.model(&self.schema);

        let mut conn = self.pool(resource)?.get().await?;

        let mut ids = Vec::with_capacity(docs.len());
        for doc in docs {
            ids.push(self.insert_document(&mut conn, model, doc).await?);
        }

        tracing::debug!(
            resource = resource.name.as_str(),
            inserted = ids.len(),
            "insert"
        );

        Ok(ids)
    }

    /// Applies a partial update to the record addressed by `id`. The
    /// identifier field is immutable: changing it is a client error, while
    /// re-sending the current value is a no-op.
    pub async fn update(
        &self,
        resource: &str,
        id: &Json,
        updates: &Map<String, Json>,
    ) -> Result<()> {
        let resource = self.schema.resource(resource)?;
        let model = resource.model(&self.schema);

        let mut conn = self.pool(resource)?.get().await?;
        let (filter, original) = self.locate(&mut conn, resource, id).await?;

        self.check_immutable_id(resource, &original, updates)?;

        let (assignments, steps) = self.build_assignments(&mut conn, model, updates).await?;

        if !assignments.is_empty() {
            conn.execute(
                &self.schema,
                Operation::Update(stmt::Update {
                    model: model.id,
                    filter: filter.clone(),
                    assignments,
                }),
            )
            .await?;
        }

        let id_value = original
            .get(&resource.id_field)
            .cloned()
            .unwrap_or(Value::Null);
        self.apply_has_many_steps(&mut conn, model, &id_value, steps)
            .await?;

        Ok(())
    }

    /// Replaces the record addressed by `id` wholesale: the old row is
    /// deleted and a new one inserted under the same identifier. The two
    /// statements commit separately; a crash between them leaves partial
    /// state.
    pub async fn replace(
        &self,
        resource: &str,
        id: &Json,
        doc: &Map<String, Json>,
    ) -> Result<()> {
        let resource = self.schema.resource(resource)?;
        let model = resource.model(&self.schema);

        let mut conn = self.pool(resource)?.get().await?;
        let (filter, original) = self.locate(&mut conn, resource, id).await?;

        self.check_immutable_id(resource, &original, doc)?;

        conn.execute(
            &self.schema,
            Operation::Delete(stmt::Delete {
                model: model.id,
                filter,
            }),
        )
        .await?;

        let mut doc = doc.clone();
        doc.insert(resource.id_field.clone(), id.clone());

        if let Err(err) = self.insert_document(&mut conn, model, &doc).await {
            tracing::warn!(
                resource = resource.name.as_str(),
                error = %err,
                "replace deleted the old row but failed to insert the new one"
            );
            return Err(err);
        }

        Ok(())
    }

    /// Deletes every record matching the lookup (all records behind the
    /// datasource filter when the lookup is empty).
    pub async fn remove(&self, resource: &str, lookup: &Map<String, Json>) -> Result<()> {
        let resource = self.schema.resource(resource)?;
        let model = resource.model(&self.schema);

        let mut select = self.datasource(resource)?;
        select.combine(parse::parse_dictionary(lookup, model, &self.schema)?);

        let mut conn = self.pool(resource)?.get().await?;
        conn.execute(
            &self.schema,
            Operation::Delete(stmt::Delete {
                model: model.id,
                filter: select.filter,
            }),
        )
        .await?;

        Ok(())
    }

    /// The resource's datasource: its model plus the schema-declared
    /// default filter and projection.
    fn datasource(&self, resource: &Resource) -> Result<Select> {
        let model = resource.model(&self.schema);
        let mut select = Select::new(model.id);

        if let Some(raw) = &resource.default_filter {
            select.combine(parse::parse_filter(raw, model, &self.schema)?);
        }

        select.projection = Projection::from(resource.projection.clone());
        Ok(select)
    }

    fn pool(&self, resource: &Resource) -> Result<&Pool> {
        let prefix = resource.prefix.as_deref().unwrap_or(DEFAULT_PREFIX);
        self.pools
            .get(prefix)
            .ok_or_else(|| relish_core::err!("no connection pool registered for prefix `{prefix}`"))
    }

    /// Rejects filters on fields the resource does not allow.
    fn validate_filters(&self, resource: &Resource, filter: &[Expr]) -> Result<()> {
        if resource.allowed_filters.is_any() {
            return Ok(());
        }

        let mut constrained = Vec::new();
        for expr in filter {
            expr.constrained_fields(&mut constrained);
        }

        for field in constrained {
            let name = &self.schema.field(field).name.app_name;
            if !resource.filter_allowed(name) {
                return Err(Error::filter_not_allowed(name));
            }
        }

        Ok(())
    }

    /// Excludes soft-deleted rows unless the client filters on the flag
    /// itself or asked to see deleted items. Rows predating the flag column
    /// (null flag) stay visible.
    fn apply_soft_delete(
        &self,
        resource: &Resource,
        model: &Model,
        req: &Request,
        select: &mut Select,
    ) {
        let Some(flag_name) = &resource.soft_delete else {
            return;
        };
        if req.show_deleted {
            return;
        }

        let field = model
            .field_by_name(flag_name)
            .expect("resource fields are verified at build time");

        let mut constrained = Vec::new();
        for expr in &select.filter {
            expr.constrained_fields(&mut constrained);
        }
        if constrained.contains(&field.id) {
            return;
        }

        select.filter.push(Expr::or(
            Expr::eq(Expr::field(field.id), false),
            Expr::is_null(Expr::field(field.id)),
        ));
    }

    /// Widens a narrowed projection with the embeddable relation fields the
    /// client asked for. Embedding itself is the host's concern.
    fn embed_relations(&self, model: &Model, embedded: &[String], projection: &mut Projection) {
        let Projection::Fields(fields) = projection else {
            return;
        };

        for name in embedded {
            let embeddable = model
                .field_by_name(name)
                .map(|field| field.is_relation() || field.ty.is_association_proxy())
                .unwrap_or(false);
            if embeddable && !fields.contains(name) {
                fields.push(name.clone());
            }
        }
    }

    /// Fetches the row addressed by `id` through the datasource filter.
    /// Returns the filter used and the row; a missing row is an internal
    /// error, since the caller already resolved the identifier.
    async fn locate(
        &self,
        conn: &mut PoolConnection,
        resource: &Resource,
        id: &Json,
    ) -> Result<(Vec<Expr>, Record)> {
        let id_field = resource.id_field_of(&self.schema)?;
        let id_value = Value::from_json(id)
            .ok_or_else(|| Error::validation("malformed identifier value"))?;

        let mut select = self.datasource(resource)?;
        select
            .filter
            .push(Expr::eq(Expr::field(id_field.id), id_value));
        select.projection = Projection::All;

        let mut lookup = select.clone();
        lookup.limit = Some(Limit::new(1));

        let mut rows = conn
            .execute(&self.schema, Operation::Select(lookup))
            .await?
            .into_rows()?;

        match rows.pop() {
            Some(row) => Ok((select.filter, row)),
            None => Err(Error::record_not_found("object not existent")),
        }
    }

    fn check_immutable_id(
        &self,
        resource: &Resource,
        original: &Record,
        updates: &Map<String, Json>,
    ) -> Result<()> {
        let Some(new_value) = updates.get(&resource.id_field) else {
            return Ok(());
        };

        let new_value = Value::from_json(new_value)
            .ok_or_else(|| Error::validation("malformed identifier value"))?;

        if original.get(&resource.id_field) != Some(&new_value) {
            return Err(Error::immutable_field(resource.id_field.clone()));
        }

        Ok(())
    }

    /// Coerces a document into field assignments. Nested `BelongsTo`
    /// payloads are materialized inline (the related row is inserted and
    /// its identifier stored through the local foreign key); bare values
    /// are stored through the foreign key directly. Multi-valued relation
    /// payloads are deferred until the parent identifier is known.
    #[async_recursion]
    async fn build_assignments(
        &self,
        conn: &mut PoolConnection,
        model: &Model,
        doc: &Map<String, Json>,
    ) -> Result<(Assignments, Vec<HasManyStep>)> {
        let mut assignments = Assignments::new();
        let mut steps = Vec::new();

        for (key, value) in doc {
            let field = model.field_by_name(key).ok_or_else(|| {
                Error::unknown_attribute(model.name.upper_camel_case(), key.clone())
            })?;

            match &field.ty {
                FieldTy::Scalar(scalar) => {
                    let value = scalar
                        .ty
                        .coerce(value, &self.schema.date_format)
                        .ok_or_else(|| {
                            Error::validation(format!(
                                "value for `{key}` does not match its declared type"
                            ))
                        })?;
                    assignments.set(field.id, value);
                }

                FieldTy::BelongsTo(rel) => match value {
                    Json::Object(nested) => {
                        let target = rel.target(&self.schema);
                        let related_id = self.insert_document(conn, target, nested).await?;
                        assignments.set(rel.foreign_key, related_id);
                    }
                    value => {
                        let value = Value::from_json(value).ok_or_else(|| {
                            Error::validation(format!("malformed value for `{key}`"))
                        })?;
                        assignments.set(rel.foreign_key, value);
                    }
                },

                FieldTy::HasMany(_) => {
                    let Json::Array(items) = value else {
                        return Err(Error::validation(format!(
                            "value for `{key}` must be a list"
                        )));
                    };
                    steps.push(HasManyStep {
                        field: field.id,
                        items: items.clone(),
                    });
                }

                FieldTy::AssociationProxy(_) => {
                    return Err(Error::validation(format!(
                        "cannot write through association proxy `{key}`"
                    )));
                }
            }
        }

        Ok((assignments, steps))
    }

    /// Inserts one document and returns its identifier: the driver-assigned
    /// one when present, else the identifier the document carried.
    #[async_recursion]
    async fn insert_document(
        &self,
        conn: &mut PoolConnection,
        model: &Model,
        doc: &Map<String, Json>,
    ) -> Result<Value> {
        let (assignments, steps) = self.build_assignments(conn, model, doc).await?;

        let provided_id = assignments.get(model.primary_key).cloned();

        let (_, identifiers) = conn
            .execute(
                &self.schema,
                Operation::Insert(stmt::Insert::new(model.id, vec![assignments])),
            )
            .await?
            .into_written()?;

        let id = match identifiers.into_iter().next() {
            Some(id) if !id.is_null() => id,
            _ => provided_id.ok_or_else(|| {
                Error::driver("driver did not return an identifier for the inserted row")
            })?,
        };

        self.apply_has_many_steps(conn, model, &id, steps).await?;

        Ok(id)
    }

    /// Wires multi-valued relation payloads to a parent row: existing rows
    /// are looked up by identifier, nested documents are materialized
    /// inline, and many-to-many memberships become join-table rows.
    #[async_recursion]
    async fn apply_has_many_steps(
        &self,
        conn: &mut PoolConnection,
        _model: &Model,
        parent_id: &Value,
        steps: Vec<HasManyStep>,
    ) -> Result<()> {
        for step in steps {
            let field = self.schema.field(step.field);
            let rel = field.ty.expect_has_many();
            let target = rel.target(&self.schema);

            let mut ids = Vec::new();
            for item in &step.items {
                match item {
                    Json::Object(nested) => {
                        ids.push(self.insert_document(conn, target, nested).await?);
                    }
                    value => {
                        ids.push(Value::from_json(value).ok_or_else(|| {
                            Error::validation(format!(
                                "malformed value for `{}`",
                                field.name.app_name
                            ))
                        })?);
                    }
                }
            }

            if ids.is_empty() {
                continue;
            }

            match &rel.through {
                Some(through) => {
                    let rows = ids
                        .iter()
                        .map(|id| {
                            let mut row = Assignments::new();
                            row.set(through.source, parent_id.clone());
                            row.set(through.target, id.clone());
                            row
                        })
                        .collect();
                    conn.execute(
                        &self.schema,
                        Operation::Insert(stmt::Insert::new(through.model, rows)),
                    )
                    .await?;
                }
                None => {
                    let fk = rel.pair(&self.schema).foreign_key;
                    let mut assignments = Assignments::new();
                    assignments.set(fk, parent_id.clone());

                    conn.execute(
                        &self.schema,
                        Operation::Update(stmt::Update {
                            model: target.id,
                            filter: vec![Expr::in_list(
                                Expr::field(target.primary_key),
                                Value::List(ids),
                            )],
                            assignments,
                        }),
                    )
                    .await?;
                }
            }
        }

        Ok(())
    }
}

//! Shared fixture schema and an in-memory mock driver.
//!
//! The fixture mirrors a small invoicing domain:
//!
//! ```text
//! People   { id, firstname, lastname, age, deleted, updated_at, invoices: HasMany<Invoices> }
//! Invoices { id, number, people_id, people: BelongsTo<People> }
//! Groups   { id, name, members: HasMany<People> through Memberships,
//!            member_names: AssociationProxy(members, firstname) }
//! Memberships { id, group_id, person_id }
//! ```

#![allow(dead_code)]

use relish::driver::{Operation, Response};
use relish::schema::{
    AssociationProxy, BelongsTo, Field, FieldId, FieldName, FieldScalar, FieldTy, HasMany, Model,
    ModelId, Name, Resource, Through,
};
use relish::stmt::{Type, Value};
use relish::{Connection, Driver, Schema};

use relish_core::async_trait;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const PEOPLE: ModelId = ModelId(0);
pub const INVOICES: ModelId = ModelId(1);
pub const GROUPS: ModelId = ModelId(2);
pub const MEMBERSHIPS: ModelId = ModelId(3);

pub fn scalar_field(model: ModelId, index: usize, name: &str, ty: Type) -> Field {
    Field {
        id: model.field(index),
        name: FieldName {
            app_name: name.to_string(),
            storage_name: None,
        },
        ty: FieldTy::Scalar(FieldScalar { ty }),
        nullable: true,
        primary_key: false,
    }
}

pub fn id_field(model: ModelId) -> Field {
    Field {
        primary_key: true,
        nullable: false,
        ..scalar_field(model, 0, "id", Type::I64)
    }
}

fn people() -> Model {
    Model {
        id: PEOPLE,
        name: Name::new("People"),
        table_name: Some("people".to_string()),
        fields: vec![
            id_field(PEOPLE),
            scalar_field(PEOPLE, 1, "firstname", Type::String),
            scalar_field(PEOPLE, 2, "lastname", Type::String),
            scalar_field(PEOPLE, 3, "age", Type::I64),
            scalar_field(PEOPLE, 4, "deleted", Type::Bool),
            scalar_field(PEOPLE, 5, "updated_at", Type::DateTime),
            Field {
                id: PEOPLE.field(6),
                name: FieldName {
                    app_name: "invoices".to_string(),
                    storage_name: None,
                },
                ty: FieldTy::HasMany(HasMany {
                    target: INVOICES,
                    pair: FieldId::placeholder(),
                    through: None,
                }),
                nullable: false,
                primary_key: false,
            },
        ],
        primary_key: PEOPLE.field(0),
    }
}

fn invoices() -> Model {
    Model {
        id: INVOICES,
        name: Name::new("Invoices"),
        table_name: Some("invoices".to_string()),
        fields: vec![
            id_field(INVOICES),
            scalar_field(INVOICES, 1, "number", Type::I64),
            scalar_field(INVOICES, 2, "people_id", Type::I64),
            Field {
                id: INVOICES.field(3),
                name: FieldName {
                    app_name: "people".to_string(),
                    storage_name: None,
                },
                ty: FieldTy::BelongsTo(BelongsTo {
                    target: PEOPLE,
                    foreign_key: INVOICES.field(2),
                    pair: None,
                }),
                nullable: false,
                primary_key: false,
            },
        ],
        primary_key: INVOICES.field(0),
    }
}

fn groups() -> Model {
    Model {
        id: GROUPS,
        name: Name::new("Groups"),
        table_name: Some("groups".to_string()),
        fields: vec![
            id_field(GROUPS),
            scalar_field(GROUPS, 1, "name", Type::String),
            Field {
                id: GROUPS.field(2),
                name: FieldName {
                    app_name: "members".to_string(),
                    storage_name: None,
                },
                ty: FieldTy::HasMany(HasMany {
                    target: PEOPLE,
                    pair: FieldId::placeholder(),
                    through: Some(Through {
                        model: MEMBERSHIPS,
                        source: MEMBERSHIPS.field(1),
                        target: MEMBERSHIPS.field(2),
                    }),
                }),
                nullable: false,
                primary_key: false,
            },
            Field {
                id: GROUPS.field(3),
                name: FieldName {
                    app_name: "member_names".to_string(),
                    storage_name: None,
                },
                ty: FieldTy::AssociationProxy(AssociationProxy {
                    through: GROUPS.field(2),
                    attr: "firstname".to_string(),
                }),
                nullable: false,
                primary_key: false,
            },
        ],
        primary_key: GROUPS.field(0),
    }
}

fn memberships() -> Model {
    Model {
        id: MEMBERSHIPS,
        name: Name::new("Memberships"),
        table_name: Some("memberships".to_string()),
        fields: vec![
            id_field(MEMBERSHIPS),
            scalar_field(MEMBERSHIPS, 1, "group_id", Type::I64),
            scalar_field(MEMBERSHIPS, 2, "person_id", Type::I64),
        ],
        primary_key: MEMBERSHIPS.field(0),
    }
}

pub fn schema() -> Schema {
    let mut builder = Schema::builder();
    builder
        .model(people())
        .model(invoices())
        .model(groups())
        .model(memberships())
        .resource(
            Resource::new("people", PEOPLE)
                .soft_delete("deleted")
                .last_updated("updated_at"),
        )
        .resource(Resource::new("invoices", INVOICES))
        .resource(Resource::new("groups", GROUPS));
    builder.build().unwrap()
}

/// Builds a data layer over the fixture schema and a mock driver.
pub async fn layer(driver: MockDriver) -> relish::DataLayer {
    let mut builder = relish::DataLayer::builder();
    builder
        .model(people())
        .model(invoices())
        .model(groups())
        .model(memberships())
        .resource(
            Resource::new("people", PEOPLE)
                .soft_delete("deleted")
                .last_updated("updated_at"),
        )
        .resource(Resource::new("invoices", INVOICES))
        .resource(
            Resource::new("numbers", INVOICES)
                .allowed_filters(["number"]),
        )
        .resource(Resource::new("groups", GROUPS))
        .connection(driver);
    builder.build().await.unwrap()
}

/// Scripted in-memory driver. Responses are served in push order; when the
/// script runs dry, a shape-appropriate empty response is synthesized.
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    responses: Arc<Mutex<VecDeque<Response>>>,
    operations: Arc<Mutex<Vec<Operation>>>,
    next_id: Arc<Mutex<i64>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            next_id: Arc::new(Mutex::new(1)),
            ..Self::default()
        }
    }

    pub fn push_response(&self, response: Response) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Every operation executed so far, in order.
    pub fn operations(&self) -> Vec<Operation> {
        self.operations.lock().unwrap().clone()
    }
}

struct MockConnection {
    driver: MockDriver,
}

#[async_trait]
impl Driver for MockDriver {
    async fn connect(&self) -> relish::Result<Box<dyn Connection>> {
        Ok(Box::new(MockConnection {
            driver: self.clone(),
        }))
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn execute(
        &mut self,
        _schema: &Schema,
        operation: Operation,
    ) -> relish::Result<Response> {
        let scripted = self.driver.responses.lock().unwrap().pop_front();

        let response = match scripted {
            Some(response) => response,
            None => match &operation {
                Operation::Select(_) => Response::Rows(vec![]),
                Operation::Count(_) => Response::Count(0),
                Operation::Insert(insert) => {
                    let mut next_id = self.driver.next_id.lock().unwrap();
                    let identifiers = insert
                        .rows
                        .iter()
                        .map(|_| {
                            let id = *next_id;
                            *next_id += 1;
                            Value::I64(id)
                        })
                        .collect::<Vec<_>>();
                    Response::Written {
                        affected: insert.rows.len() as u64,
                        identifiers,
                    }
                }
                Operation::Update(_) | Operation::Delete(_) => Response::Written {
                    affected: 1,
                    identifiers: vec![],
                },
            },
        };

        self.driver.operations.lock().unwrap().push(operation);
        Ok(response)
    }
}

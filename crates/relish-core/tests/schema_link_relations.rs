use relish_core::schema::*;
use relish_core::stmt;

const USER: ModelId = ModelId(0);
const ADDRESS: ModelId = ModelId(1);

fn scalar_field(model: ModelId, index: usize, name: &str, ty: stmt::Type) -> Field {
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

fn id_field(model: ModelId) -> Field {
    Field {
        primary_key: true,
        nullable: false,
        ..scalar_field(model, 0, "id", stmt::Type::I64)
    }
}

fn user() -> Model {
    Model {
        id: USER,
        name: Name::new("User"),
        table_name: None,
        fields: vec![
            id_field(USER),
            scalar_field(USER, 1, "name", stmt::Type::String),
            Field {
                id: USER.field(2),
                name: FieldName {
                    app_name: "addresses".to_string(),
                    storage_name: None,
                },
                ty: FieldTy::HasMany(HasMany {
                    target: ADDRESS,
                    pair: FieldId::placeholder(),
                    through: None,
                }),
                nullable: false,
                primary_key: false,
            },
        ],
        primary_key: USER.field(0),
    }
}

fn address() -> Model {
    Model {
        id: ADDRESS,
        name: Name::new("Address"),
        table_name: None,
        fields: vec![
            id_field(ADDRESS),
            scalar_field(ADDRESS, 1, "user_id", stmt::Type::I64),
            Field {
                id: ADDRESS.field(2),
                name: FieldName {
                    app_name: "user".to_string(),
                    storage_name: None,
                },
                ty: FieldTy::BelongsTo(BelongsTo {
                    target: USER,
                    foreign_key: ADDRESS.field(1),
                    pair: None,
                }),
                nullable: false,
                primary_key: false,
            },
        ],
        primary_key: ADDRESS.field(0),
    }
}

#[test]
fn has_many_links_to_the_belongs_to_on_the_target() {
    let mut builder = Schema::builder();
    builder.model(user()).model(address());
    let schema = builder.build().unwrap();

    let has_many = schema.field(USER.field(2)).ty.expect_has_many();
    assert_eq!(has_many.pair, ADDRESS.field(2));

    let belongs_to = schema.field(ADDRESS.field(2)).ty.expect_belongs_to();
    assert_eq!(belongs_to.pair, Some(USER.field(2)));
}

#[test]
fn has_many_join_uses_the_paired_foreign_key() {
    let mut builder = Schema::builder();
    builder.model(user()).model(address());
    let schema = builder.build().unwrap();

    let model = schema.model(USER);
    let has_many = schema.field(USER.field(2)).ty.expect_has_many();

    assert_eq!(
        has_many.join_exprs(&schema, model),
        vec![stmt::Expr::join(USER.field(0), ADDRESS.field(1))]
    );
}

#[test]
fn missing_target_model_is_an_invalid_schema() {
    let mut builder = Schema::builder();
    builder.model(user());
    let err = builder.build().unwrap_err();

    assert!(err.to_string().contains("invalid schema"));
}

#[test]
fn has_many_without_a_belongs_to_pair_is_an_invalid_schema() {
    let mut address = address();
    // Replace the BelongsTo with a plain scalar; the HasMany now has no pair.
    address.fields[2] = scalar_field(ADDRESS, 2, "user", stmt::Type::I64);

    let mut builder = Schema::builder();
    builder.model(user()).model(address);
    let err = builder.build().unwrap_err();

    assert!(err.to_string().contains("no matching `BelongsTo`"));
}

#[test]
fn association_proxy_must_expose_an_existing_attribute() {
    let mut user = user();
    user.fields.push(Field {
        id: USER.field(3),
        name: FieldName {
            app_name: "cities".to_string(),
            storage_name: None,
        },
        ty: FieldTy::AssociationProxy(AssociationProxy {
            through: USER.field(2),
            attr: "city".to_string(),
        }),
        nullable: false,
        primary_key: false,
    });

    let mut builder = Schema::builder();
    builder.model(user).model(address());
    let err = builder.build().unwrap_err();

    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn resource_fields_are_verified() {
    let mut builder = Schema::builder();
    builder
        .model(user())
        .model(address())
        .resource(Resource::new("users", USER).soft_delete("nope"));
    let err = builder.build().unwrap_err();

    assert!(err.to_string().contains("does not exist"));

    let mut builder = Schema::builder();
    builder
        .model(user())
        .model(address())
        .resource(Resource::new("users", USER).id_field("addresses"));
    let err = builder.build().unwrap_err();

    assert!(err.to_string().contains("must be a scalar field"));
}

#[test]
fn date_format_defaults_to_rfc_1123() {
    let mut builder = Schema::builder();
    builder.model(user()).model(address());
    let schema = builder.build().unwrap();

    assert!(schema.str_to_date("Tue, 02 Apr 2024 10:30:00 GMT").is_some());
    assert!(schema.str_to_date("2024-04-02").is_none());
}

#[test]
fn custom_date_format_is_honored() {
    let mut builder = Schema::builder();
    builder
        .model(user())
        .model(address())
        .date_format("%Y-%m-%d %H:%M:%S");
    let schema = builder.build().unwrap();

    assert!(schema.str_to_date("2024-04-02 10:30:00").is_some());
    assert!(schema.str_to_date("Tue, 02 Apr 2024 10:30:00 GMT").is_none());
}

mod collection;
pub use collection::Collection;

pub mod db;
pub use db::{Builder, Pool};

mod layer;
pub use layer::DataLayer;

pub mod parse;

pub mod path;

mod request;
pub use request::Request;

pub mod sorting;

pub use relish_core::{
    driver::{self, Connection, Driver, Operation, Record, Response},
    schema, stmt, Error, Result, Schema,
};

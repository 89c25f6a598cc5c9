//! Option structures for each supported object type.
//!
//! [`OPERATIONS`] maps `(resource, operation)` names to a function that
//! deserializes a JSON document into the matching structure and prepares
//! it. The CLI is built on top of it.

pub mod common;
pub mod databases;
pub mod roles;
pub mod schemas;
pub mod tags;
pub mod warehouses;

use serde::de::DeserializeOwned;

use crate::engine::prepare;
use crate::error::{StmtError, StmtResult};
use crate::resolver::OptionStructure;
use crate::validation::Validate;

/// Whether a statement changes state or returns rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Exec,
    Query,
}

/// One entry of the operation catalog.
#[derive(Clone, Copy)]
pub struct Operation {
    pub resource: &'static str,
    pub operation: &'static str,
    pub kind: StatementKind,
    prepare: fn(serde_json::Value) -> StmtResult<String>,
}

impl Operation {
    /// Deserialize `input` into this operation's options and prepare it.
    pub fn prepare(&self, input: serde_json::Value) -> StmtResult<String> {
        (self.prepare)(input)
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("resource", &self.resource)
            .field("operation", &self.operation)
            .field("kind", &self.kind)
            .finish()
    }
}

fn prepare_json<T>(input: serde_json::Value) -> StmtResult<String>
where
    T: OptionStructure + Validate + DeserializeOwned,
{
    let opts: T = serde_json::from_value(input).map_err(|e| StmtError::parse(0, e.to_string()))?;
    prepare(&opts)
}

macro_rules! catalog {
    ($( $resource:literal $operation:literal $kind:ident => $ty:ty ),+ $(,)?) => {
        &[$(
            Operation {
                resource: $resource,
                operation: $operation,
                kind: StatementKind::$kind,
                prepare: prepare_json::<$ty>,
            }
        ),+]
    };
}

pub static OPERATIONS: &[Operation] = catalog! {
    "database" "create" Exec => databases::CreateDatabaseOptions,
    "database" "alter" Exec => databases::AlterDatabaseOptions,
    "database" "drop" Exec => databases::DropDatabaseOptions,
    "database" "undrop" Exec => databases::UndropDatabaseOptions,
    "database" "show" Query => databases::ShowDatabasesOptions,
    "database" "describe" Query => databases::DescribeDatabaseOptions,
    "schema" "create" Exec => schemas::CreateSchemaOptions,
    "schema" "alter" Exec => schemas::AlterSchemaOptions,
    "schema" "drop" Exec => schemas::DropSchemaOptions,
    "schema" "show" Query => schemas::ShowSchemasOptions,
    "schema" "describe" Query => schemas::DescribeSchemaOptions,
    "warehouse" "create" Exec => warehouses::CreateWarehouseOptions,
    "warehouse" "alter" Exec => warehouses::AlterWarehouseOptions,
    "warehouse" "drop" Exec => warehouses::DropWarehouseOptions,
    "warehouse" "show" Query => warehouses::ShowWarehousesOptions,
    "warehouse" "describe" Query => warehouses::DescribeWarehouseOptions,
    "role" "create" Exec => roles::CreateRoleOptions,
    "role" "alter" Exec => roles::AlterRoleOptions,
    "role" "drop" Exec => roles::DropRoleOptions,
    "role" "show" Query => roles::ShowRolesOptions,
    "tag" "create" Exec => tags::CreateTagOptions,
    "tag" "alter" Exec => tags::AlterTagOptions,
    "tag" "drop" Exec => tags::DropTagOptions,
    "tag" "undrop" Exec => tags::UndropTagOptions,
    "tag" "show" Query => tags::ShowTagsOptions,
};

/// Find an operation by name, ignoring ASCII case.
pub fn lookup(resource: &str, operation: &str) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| {
        op.resource.eq_ignore_ascii_case(resource) && op.operation.eq_ignore_ascii_case(operation)
    })
}

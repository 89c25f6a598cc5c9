//! # stmtkit: declarative SQL statements from option structures
//!
//! Describe a statement as a plain struct, annotate each field with how it
//! renders, and let stmtkit validate and assemble the SQL text.
//!
//! ## Quick Example
//!
//! ```rust
//! use stmtkit::prelude::*;
//! use stmtkit::resources::databases::CreateDatabaseOptions;
//!
//! let opts = CreateDatabaseOptions {
//!     if_not_exists: Some(true),
//!     name: AccountObjectIdentifier::new("ANALYTICS"),
//!     comment: Some("reporting".to_string()),
//!     ..Default::default()
//! };
//!
//! let sql = stmtkit::prepare(&opts).unwrap();
//! assert_eq!(sql, r#"CREATE DATABASE IF NOT EXISTS "ANALYTICS" COMMENT = 'reporting'"#);
//! ```
//!
//! ## Annotations
//!
//! | Kind         | Renders                                   |
//! |--------------|-------------------------------------------|
//! | `static`     | fixed SQL text, always                    |
//! | `keyword`    | SQL text when set, or `TEXT <value>`      |
//! | `parameter`  | `NAME = value`                            |
//! | `identifier` | quoted, qualified object name             |
//! | `list`       | `NAME (a, b, c)`                          |

pub mod config;
pub mod engine;
pub mod error;
pub mod identifier;
pub mod render;
pub mod resolver;
pub mod resources;
pub mod validation;
pub mod value;

pub mod prelude {
    pub use crate::engine::{prepare, prepare_opt, Client, Row, SqlxTransport, Transport};
    pub use crate::error::*;
    pub use crate::identifier::{
        AccountObjectIdentifier, DatabaseObjectIdentifier, ObjectIdentifier, SchemaObjectIdentifier,
        SchemaObjectIdentifierWithArguments, TableColumnIdentifier,
    };
    pub use crate::resolver::OptionStructure;
    pub use crate::validation::{RuleKind, Validate, Validator, Violation, Violations};
    pub use crate::{fields, keyword_enum, option_structure};
}

pub use engine::{prepare, prepare_opt};
pub use render::render;

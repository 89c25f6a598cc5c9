//! Qualified object identifiers.
//!
//! Identifiers are rendered fully qualified, with every segment double
//! quoted: `"DB"."SCHEMA"."OBJ"`. Parsing accepts both quoted and bare
//! segments, so `DB.SCHEMA.OBJ` and `"DB"."SCHEMA"."OBJ"` are equivalent.

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, opt, value},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::{StmtError, StmtResult};
use crate::render::quote_double;

/// A backend object name that can be rendered into SQL.
pub trait ObjectIdentifier: fmt::Debug + Send + Sync {
    /// The unqualified object name.
    fn name(&self) -> &str;

    /// All segments, outermost first.
    fn segments(&self) -> Vec<&str>;

    /// Every segment quoted and dot-joined.
    fn fully_qualified_name(&self) -> String {
        self.segments()
            .into_iter()
            .map(quote_double)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// An identifier is valid when none of its segments is empty.
    fn is_valid(&self) -> bool {
        self.segments().iter().all(|s| !s.is_empty())
    }
}

/// An object living directly in the account (database, warehouse, role).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountObjectIdentifier {
    name: String,
}

/// An object scoped to a database (schema, database role).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatabaseObjectIdentifier {
    database_name: String,
    name: String,
}

/// An object scoped to a schema (table, view, tag, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaObjectIdentifier {
    database_name: String,
    schema_name: String,
    name: String,
}

/// A schema object overloaded by argument types (functions, procedures).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaObjectIdentifierWithArguments {
    database_name: String,
    schema_name: String,
    name: String,
    argument_data_types: Vec<String>,
}

/// A column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableColumnIdentifier {
    database_name: String,
    schema_name: String,
    table_name: String,
    column_name: String,
}

impl AccountObjectIdentifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl DatabaseObjectIdentifier {
    pub fn new(database_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            name: name.into(),
        }
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn database_id(&self) -> AccountObjectIdentifier {
        AccountObjectIdentifier::new(&self.database_name)
    }
}

impl SchemaObjectIdentifier {
    pub fn new(
        database_name: impl Into<String>,
        schema_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            database_name: database_name.into(),
            schema_name: schema_name.into(),
            name: name.into(),
        }
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn database_id(&self) -> AccountObjectIdentifier {
        AccountObjectIdentifier::new(&self.database_name)
    }

    pub fn schema_id(&self) -> DatabaseObjectIdentifier {
        DatabaseObjectIdentifier::new(&self.database_name, &self.schema_name)
    }

    /// Attach argument types, producing an overloadable identifier.
    pub fn with_arguments<I, S>(self, argument_data_types: I) -> SchemaObjectIdentifierWithArguments
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SchemaObjectIdentifierWithArguments {
            database_name: self.database_name,
            schema_name: self.schema_name,
            name: self.name,
            argument_data_types: argument_data_types.into_iter().map(Into::into).collect(),
        }
    }
}

impl SchemaObjectIdentifierWithArguments {
    pub fn argument_data_types(&self) -> &[String] {
        &self.argument_data_types
    }

    pub fn schema_object_id(&self) -> SchemaObjectIdentifier {
        SchemaObjectIdentifier::new(&self.database_name, &self.schema_name, &self.name)
    }
}

impl TableColumnIdentifier {
    pub fn new(
        database_name: impl Into<String>,
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        column_name: impl Into<String>,
    ) -> Self {
        Self {
            database_name: database_name.into(),
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            column_name: column_name.into(),
        }
    }

    pub fn table_id(&self) -> SchemaObjectIdentifier {
        SchemaObjectIdentifier::new(&self.database_name, &self.schema_name, &self.table_name)
    }
}

impl ObjectIdentifier for AccountObjectIdentifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn segments(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl ObjectIdentifier for DatabaseObjectIdentifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn segments(&self) -> Vec<&str> {
        vec![self.database_name.as_str(), self.name.as_str()]
    }
}

impl ObjectIdentifier for SchemaObjectIdentifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn segments(&self) -> Vec<&str> {
        vec![
            self.database_name.as_str(),
            self.schema_name.as_str(),
            self.name.as_str(),
        ]
    }
}

impl ObjectIdentifier for SchemaObjectIdentifierWithArguments {
    fn name(&self) -> &str {
        &self.name
    }

    fn segments(&self) -> Vec<&str> {
        vec![
            self.database_name.as_str(),
            self.schema_name.as_str(),
            self.name.as_str(),
        ]
    }

    fn fully_qualified_name(&self) -> String {
        format!(
            "{}.{}.{}({})",
            quote_double(&self.database_name),
            quote_double(&self.schema_name),
            quote_double(&self.name),
            self.argument_data_types.join(", ")
        )
    }
}

impl ObjectIdentifier for TableColumnIdentifier {
    fn name(&self) -> &str {
        &self.column_name
    }

    fn segments(&self) -> Vec<&str> {
        vec![
            self.database_name.as_str(),
            self.schema_name.as_str(),
            self.table_name.as_str(),
            self.column_name.as_str(),
        ]
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// A quoted segment; `""` inside stands for one `"`.
fn quoted_segment(input: &str) -> IResult<&str, String> {
    map(
        delimited(
            char('"'),
            many0(alt((
                map(is_not("\""), str::to_string),
                value("\"".to_string(), tag("\"\"")),
            ))),
            char('"'),
        ),
        |parts| parts.concat(),
    )(input)
}

fn bare_segment(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| {
            !matches!(c, '.' | '"' | '(' | ')' | ',') && !c.is_whitespace()
        }),
        str::to_string,
    )(input)
}

fn segment(input: &str) -> IResult<&str, String> {
    alt((quoted_segment, bare_segment))(input)
}

fn data_type(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| c.is_alphanumeric() || c == '_'),
        |s: &str| s.to_uppercase(),
    )(input)
}

fn arguments(input: &str) -> IResult<&str, Vec<String>> {
    delimited(
        tuple((char('('), multispace0)),
        separated_list0(tuple((multispace0, char(','), multispace0)), data_type),
        tuple((multispace0, char(')'))),
    )(input)
}

fn qualified_name(input: &str) -> IResult<&str, (Vec<String>, Option<Vec<String>>)> {
    tuple((separated_list1(char('.'), segment), opt(arguments)))(input)
}

/// Split a possibly quoted, dotted name into segments and optional
/// argument types.
pub fn parse_qualified_name(input: &str) -> StmtResult<(Vec<String>, Option<Vec<String>>)> {
    let trimmed = input.trim();
    match qualified_name(trimmed) {
        Ok(("", parsed)) => Ok(parsed),
        Ok((remaining, _)) => Err(StmtError::parse(
            trimmed.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(e) => Err(StmtError::parse(0, format!("Invalid identifier '{}': {:?}", input, e))),
    }
}

fn expect_segments(input: &str, expected: usize, kind: &str) -> StmtResult<Vec<String>> {
    let (segments, args) = parse_qualified_name(input)?;
    if args.is_some() {
        return Err(StmtError::parse(
            0,
            format!("{} '{}' cannot carry argument types", kind, input),
        ));
    }
    if segments.len() != expected {
        return Err(StmtError::parse(
            0,
            format!(
                "{} '{}' must have {} segment(s), found {}",
                kind,
                input,
                expected,
                segments.len()
            ),
        ));
    }
    Ok(segments)
}

impl FromStr for AccountObjectIdentifier {
    type Err = StmtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = expect_segments(s, 1, "account object identifier")?;
        Ok(Self::new(parts.remove(0)))
    }
}

impl FromStr for DatabaseObjectIdentifier {
    type Err = StmtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = expect_segments(s, 2, "database object identifier")?;
        Ok(Self::new(&parts[0], &parts[1]))
    }
}

impl FromStr for SchemaObjectIdentifier {
    type Err = StmtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = expect_segments(s, 3, "schema object identifier")?;
        Ok(Self::new(&parts[0], &parts[1], &parts[2]))
    }
}

impl FromStr for SchemaObjectIdentifierWithArguments {
    type Err = StmtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (parts, args) = parse_qualified_name(s)?;
        if parts.len() != 3 {
            return Err(StmtError::parse(
                0,
                format!("schema object identifier '{}' must have 3 segment(s), found {}", s, parts.len()),
            ));
        }
        Ok(SchemaObjectIdentifier::new(&parts[0], &parts[1], &parts[2])
            .with_arguments(args.unwrap_or_default()))
    }
}

impl FromStr for TableColumnIdentifier {
    type Err = StmtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = expect_segments(s, 4, "table column identifier")?;
        Ok(Self::new(&parts[0], &parts[1], &parts[2], &parts[3]))
    }
}

/// Display, serde string conversions and field value lowering shared by
/// every identifier type.
macro_rules! identifier_common {
    ($($t:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $t {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.fully_qualified_name())
                }
            }

            impl TryFrom<String> for $t {
                type Error = StmtError;

                /// A blank string yields the empty identifier, which
                /// validation then reports as invalid.
                fn try_from(s: String) -> Result<Self, Self::Error> {
                    if s.trim().is_empty() {
                        return Ok(Self::default());
                    }
                    s.parse()
                }
            }

            impl From<$t> for String {
                fn from(id: $t) -> String {
                    id.fully_qualified_name()
                }
            }

            impl crate::value::ToFieldValue for $t {
                fn to_field_value(&self) -> crate::value::FieldValue<'_> {
                    crate::value::FieldValue::Identifier(self)
                }
            }

            impl crate::validation::Presence for $t {
                fn is_set(&self) -> bool {
                    true
                }
            }
        )+
    };
}

identifier_common!(
    AccountObjectIdentifier,
    DatabaseObjectIdentifier,
    SchemaObjectIdentifier,
    SchemaObjectIdentifierWithArguments,
    TableColumnIdentifier,
);

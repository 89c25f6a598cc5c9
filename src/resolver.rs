//! Field descriptor resolution.
//!
//! An option structure declares its fields once, in emission order, with the
//! [`option_structure!`](crate::option_structure) macro:
//!
//! ```ignore
//! option_structure! {
//!     CreateRoleOptions {
//!         static "CREATE",
//!         or_replace: "keyword" => "OR REPLACE",
//!         static "ROLE",
//!         if_not_exists: "keyword" => "IF NOT EXISTS",
//!         name: "identifier",
//!         comment: "parameter,single_quotes" => "COMMENT",
//!     }
//! }
//! ```
//!
//! Each entry carries a `ddl` tag (render kind plus options) and optional SQL
//! text. Tags are parsed the first time a shape is used and the parsed
//! [`Shape`] is cached per type.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::error::DefinitionError;
use crate::value::FieldValue;

/// How a field turns into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    /// Fixed text, independent of any value.
    Static,
    /// Text emitted when the flag is set, or a keyword-prefixed value.
    Keyword,
    /// `NAME = value`.
    Parameter,
    /// A qualified object name.
    Identifier,
    /// A parenthesized, comma-joined group.
    List,
}

/// Quote style applied to text values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quote {
    #[default]
    None,
    Single,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// `Some(true)` for `parentheses`, `Some(false)` for `no_parentheses`.
    pub parentheses: Option<bool>,
    pub quote: Quote,
    pub no_equals: bool,
    pub no_comma: bool,
    pub required: bool,
}

impl RenderOptions {
    /// Whether to wrap grouped output, falling back to the kind's default.
    pub fn parenthesize(&self, default: bool) -> bool {
        self.parentheses.unwrap_or(default)
    }

    pub fn separator(&self) -> &'static str {
        if self.no_comma { " " } else { ", " }
    }
}

/// Reads one field out of a structure.
pub type Accessor<T> = for<'a> fn(&'a T) -> FieldValue<'a>;

/// One raw, unparsed entry of an option structure declaration.
pub struct FieldSpec<T> {
    name: &'static str,
    ddl: &'static str,
    sql: &'static str,
    get: Option<Accessor<T>>,
}

impl<T> FieldSpec<T> {
    /// A static keyword with no backing data.
    pub fn fixed(sql: &'static str) -> Self {
        Self {
            name: "",
            ddl: "static",
            sql,
            get: None,
        }
    }

    /// A data field read through `get`.
    pub fn field(name: &'static str, ddl: &'static str, sql: &'static str, get: Accessor<T>) -> Self {
        Self {
            name,
            ddl,
            sql,
            get: Some(get),
        }
    }
}

/// The render directive of one field, independent of the structure type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: &'static str,
    pub kind: RenderKind,
    pub sql: &'static str,
    pub options: RenderOptions,
}

/// A resolved field: its directive plus how to read its value.
pub struct FieldDescriptor<T> {
    directive: Directive,
    get: Option<Accessor<T>>,
}

impl<T> FieldDescriptor<T> {
    pub fn directive(&self) -> &Directive {
        &self.directive
    }

    pub fn name(&self) -> &'static str {
        self.directive.name
    }

    /// The field's current value. Static entries are always absent.
    pub fn value<'a>(&self, structure: &'a T) -> FieldValue<'a> {
        match self.get {
            Some(get) => get(structure),
            None => FieldValue::Absent,
        }
    }
}

/// The ordered field descriptors of one option structure type.
pub struct Shape<T> {
    structure: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> Shape<T> {
    pub fn structure(&self) -> &'static str {
        self.structure
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }
}

/// An annotated structure describing one SQL operation.
///
/// Implemented by [`option_structure!`](crate::option_structure).
pub trait OptionStructure: Sized + Send + Sync + 'static {
    /// Name used in validation messages.
    const NAME: &'static str;

    /// Raw field declarations in emission order.
    fn field_specs() -> Vec<FieldSpec<Self>>;
}

/// Parse a `ddl` tag such as `"parameter,single_quotes,no_equals"`.
pub fn parse_annotation(
    structure: &'static str,
    field: &'static str,
    ddl: &str,
) -> Result<(RenderKind, RenderOptions), DefinitionError> {
    let mut parts = ddl.split(',').map(str::trim);

    let kind = match parts.next() {
        None | Some("") => return Err(DefinitionError::MissingKind { structure, field }),
        Some("static") => RenderKind::Static,
        Some("keyword") => RenderKind::Keyword,
        Some("parameter") => RenderKind::Parameter,
        Some("identifier") => RenderKind::Identifier,
        Some("list") => RenderKind::List,
        Some(other) => {
            return Err(DefinitionError::UnknownKind {
                structure,
                field,
                kind: other.to_string(),
            });
        }
    };

    let mut options = RenderOptions::default();
    for option in parts {
        match option {
            "parentheses" => options.parentheses = Some(true),
            "no_parentheses" => options.parentheses = Some(false),
            "single_quotes" => options.quote = Quote::Single,
            "double_quotes" => options.quote = Quote::Double,
            "no_quotes" => options.quote = Quote::None,
            "no_equals" => options.no_equals = true,
            "no_comma" => options.no_comma = true,
            "required" => options.required = true,
            other => {
                return Err(DefinitionError::UnknownOption {
                    structure,
                    field,
                    option: other.to_string(),
                });
            }
        }
    }

    Ok((kind, options))
}

fn build_shape<T: OptionStructure>() -> Result<Shape<T>, DefinitionError> {
    let mut fields = Vec::new();

    for (position, spec) in T::field_specs().into_iter().enumerate() {
        let (kind, options) = parse_annotation(T::NAME, spec.name, spec.ddl)?;

        match (kind, spec.get.is_some()) {
            (RenderKind::Static, true) => {
                return Err(DefinitionError::StaticField {
                    structure: T::NAME,
                    field: spec.name,
                });
            }
            (RenderKind::Static, false) if spec.sql.is_empty() => {
                return Err(DefinitionError::EmptyStatic {
                    structure: T::NAME,
                    position,
                });
            }
            _ => {}
        }

        fields.push(FieldDescriptor {
            directive: Directive {
                name: spec.name,
                kind,
                sql: spec.sql,
                options,
            },
            get: spec.get,
        });
    }

    Ok(Shape {
        structure: T::NAME,
        fields,
    })
}

type Registry = RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>;

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Resolve the shape of `T`, parsing its annotations on first use.
///
/// Concurrent first uses may each build the shape; the results are
/// identical and the first insert wins.
pub fn resolve<T: OptionStructure>() -> Result<Arc<Shape<T>>, DefinitionError> {
    let key = TypeId::of::<T>();

    let cached = registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .cloned();
    if let Some(shape) = cached.and_then(|entry| entry.downcast::<Shape<T>>().ok()) {
        return Ok(shape);
    }

    tracing::trace!(structure = T::NAME, "resolving option structure shape");
    let shape = Arc::new(build_shape::<T>()?);

    let mut map = registry().write().unwrap_or_else(PoisonError::into_inner);
    let entry = map
        .entry(key)
        .or_insert_with(|| shape.clone() as Arc<dyn Any + Send + Sync>)
        .clone();
    Ok(entry.downcast::<Shape<T>>().unwrap_or(shape))
}

/// Implement [`OptionStructure`] for a struct from an ordered field list.
///
/// Entries are either `static "TEXT"` or `field: "ddl tag" [=> "SQL TEXT"]`.
/// The struct also becomes usable as a nested field of other structures.
#[macro_export]
macro_rules! option_structure {
    ($ty:ident { $($body:tt)* }) => {
        impl $crate::resolver::OptionStructure for $ty {
            const NAME: &'static str = stringify!($ty);

            fn field_specs() -> Vec<$crate::resolver::FieldSpec<Self>> {
                let mut specs = Vec::new();
                $crate::__option_fields!($ty, specs; $($body)*);
                specs
            }
        }

        impl $crate::value::ToFieldValue for $ty {
            fn to_field_value(&self) -> $crate::value::FieldValue<'_> {
                $crate::value::FieldValue::Nested(self)
            }
        }

        impl $crate::validation::Presence for $ty {
            fn is_set(&self) -> bool {
                true
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __option_fields {
    ($ty:ident, $specs:ident;) => {};
    ($ty:ident, $specs:ident; static $sql:literal $(, $($rest:tt)*)?) => {
        $specs.push($crate::resolver::FieldSpec::fixed($sql));
        $crate::__option_fields!($ty, $specs; $($($rest)*)?);
    };
    ($ty:ident, $specs:ident; $field:ident : $ddl:literal $(=> $sql:literal)? $(, $($rest:tt)*)?) => {
        {
            fn get(s: &$ty) -> $crate::value::FieldValue<'_> {
                $crate::value::ToFieldValue::to_field_value(&s.$field)
            }
            $specs.push($crate::resolver::FieldSpec::field(
                stringify!($field),
                $ddl,
                $crate::__sql_text!($($sql)?),
                get,
            ));
        }
        $crate::__option_fields!($ty, $specs; $($($rest)*)?);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __sql_text {
    () => {
        ""
    };
    ($sql:literal) => {
        $sql
    };
}

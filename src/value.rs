//! Runtime view of option structure field values.
//!
//! Every field declared in an [`option_structure!`](crate::option_structure)
//! block is read through [`ToFieldValue`], which lowers the Rust value to a
//! [`FieldValue`] the renderer understands.

use crate::identifier::ObjectIdentifier;
use crate::render::Render;

/// The value of one field, as seen by the renderer.
pub enum FieldValue<'a> {
    /// `None`, or a field with nothing to say.
    Absent,
    /// A boolean. Keyword flags emit only on `true`; parameters render both.
    Flag(bool),
    /// Text, quoted according to the field's quote option.
    Text(&'a str),
    /// A number, already formatted. Never quoted.
    Number(String),
    /// A qualified object name.
    Identifier(&'a dyn ObjectIdentifier),
    /// A nested option structure.
    Nested(&'a dyn Render),
    /// An ordered sequence of values.
    List(Vec<FieldValue<'a>>),
}

impl FieldValue<'_> {
    /// Whether the value contributes nothing to the statement.
    ///
    /// `Flag(false)` is not absent: an explicit `Some(false)` parameter
    /// still renders.
    pub fn is_absent(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::List(items) => items.is_empty(),
            _ => false,
        }
    }
}

impl std::fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Absent => write!(f, "Absent"),
            FieldValue::Flag(b) => write!(f, "Flag({})", b),
            FieldValue::Text(s) => write!(f, "Text({:?})", s),
            FieldValue::Number(n) => write!(f, "Number({})", n),
            FieldValue::Identifier(id) => write!(f, "Identifier({})", id.fully_qualified_name()),
            FieldValue::Nested(_) => write!(f, "Nested(..)"),
            FieldValue::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}

/// Conversion of a field into its renderable value.
pub trait ToFieldValue {
    fn to_field_value(&self) -> FieldValue<'_>;
}

impl ToFieldValue for bool {
    fn to_field_value(&self) -> FieldValue<'_> {
        FieldValue::Flag(*self)
    }
}

impl ToFieldValue for str {
    fn to_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self.as_str())
    }
}

macro_rules! number_field {
    ($($t:ty),+ $(,)?) => {
        $(impl ToFieldValue for $t {
            fn to_field_value(&self) -> FieldValue<'_> {
                FieldValue::Number(self.to_string())
            }
        })+
    };
}

number_field!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f64);

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue<'_> {
        match self {
            Some(v) => v.to_field_value(),
            None => FieldValue::Absent,
        }
    }
}

impl<T: ToFieldValue> ToFieldValue for Vec<T> {
    fn to_field_value(&self) -> FieldValue<'_> {
        if self.is_empty() {
            return FieldValue::Absent;
        }
        FieldValue::List(self.iter().map(ToFieldValue::to_field_value).collect())
    }
}

impl<T: ToFieldValue + ?Sized> ToFieldValue for Box<T> {
    fn to_field_value(&self) -> FieldValue<'_> {
        (**self).to_field_value()
    }
}

/// Declare an enum whose variants render as fixed SQL keywords.
///
/// ```ignore
/// keyword_enum! {
///     pub enum WarehouseType {
///         Standard => "STANDARD",
///         SnowparkOptimized => "SNOWPARK-OPTIMIZED",
///     }
/// }
/// ```
#[macro_export]
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// The SQL text of this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::value::ToFieldValue for $name {
            fn to_field_value(&self) -> $crate::value::FieldValue<'_> {
                $crate::value::FieldValue::Text(self.as_str())
            }
        }

        impl $crate::validation::Presence for $name {
            fn is_set(&self) -> bool {
                true
            }
        }
    };
}

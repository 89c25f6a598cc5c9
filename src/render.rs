//! Value rendering and statement assembly.
//!
//! [`render_field`] turns one directive and its value into at most one SQL
//! token. [`render`] walks a structure's fields in declaration order and
//! joins the non-empty tokens with single spaces.

use crate::error::DefinitionError;
use crate::resolver::{resolve, Directive, OptionStructure, Quote, RenderKind};
use crate::validation::{RuleKind, Violation};
use crate::value::FieldValue;

/// Object-safe rendering of a (possibly nested) option structure.
pub trait Render: Send + Sync {
    /// Name of the underlying option structure.
    fn structure_name(&self) -> &'static str;

    /// Rendered tokens of every present field, in declaration order.
    fn render_tokens(&self) -> Result<Vec<String>, DefinitionError>;

    /// Record a `NotSet` violation for every absent `required` field,
    /// descending into present nested structures.
    fn collect_missing_required(&self, out: &mut Vec<Violation>) -> Result<(), DefinitionError>;
}

impl<T: OptionStructure> Render for T {
    fn structure_name(&self) -> &'static str {
        T::NAME
    }

    fn render_tokens(&self) -> Result<Vec<String>, DefinitionError> {
        let shape = resolve::<T>()?;
        let mut tokens = Vec::with_capacity(shape.fields().len());
        for field in shape.fields() {
            if let Some(token) = render_field(field.directive(), field.value(self))? {
                if !token.is_empty() {
                    tokens.push(token);
                }
            }
        }
        Ok(tokens)
    }

    fn collect_missing_required(&self, out: &mut Vec<Violation>) -> Result<(), DefinitionError> {
        let shape = resolve::<T>()?;
        for field in shape.fields() {
            let value = field.value(self);
            if field.directive().options.required && value.is_absent() {
                out.push(Violation::new(T::NAME, RuleKind::NotSet, vec![field.name()]));
            }
            collect_nested_required(&value, out)?;
        }
        Ok(())
    }
}

fn collect_nested_required(value: &FieldValue<'_>, out: &mut Vec<Violation>) -> Result<(), DefinitionError> {
    match value {
        FieldValue::Nested(nested) => nested.collect_missing_required(out),
        FieldValue::List(items) => {
            for item in items {
                collect_nested_required(item, out)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Render a whole option structure into one statement.
///
/// The structure is assumed valid; this never reports validation errors.
pub fn render<T: OptionStructure>(opts: &T) -> Result<String, DefinitionError> {
    Ok(opts.render_tokens()?.join(" "))
}

/// Render one field. Returns `None` when the field contributes nothing.
pub fn render_field(directive: &Directive, value: FieldValue<'_>) -> Result<Option<String>, DefinitionError> {
    if directive.kind == RenderKind::Static {
        return Ok(Some(directive.sql.to_string()));
    }
    if value.is_absent() {
        return Ok(None);
    }

    let options = &directive.options;
    let grouped_value = matches!(value, FieldValue::Nested(_) | FieldValue::List(_));
    let token = match directive.kind {
        RenderKind::Static => Some(directive.sql.to_string()),
        RenderKind::Keyword => match value {
            FieldValue::Flag(true) => Some(directive.sql.to_string()),
            FieldValue::Flag(false) => None,
            FieldValue::Nested(nested) => {
                let inner = nested.render_tokens()?.join(" ");
                grouped(directive.sql, inner, options.parenthesize(false))
            }
            FieldValue::List(items) => {
                let inner = render_elements(items, options.quote)?.join(options.separator());
                grouped(directive.sql, inner, options.parenthesize(false))
            }
            scalar => Some(prefixed(directive.sql, format_scalar(&scalar, options.quote))),
        },
        RenderKind::Parameter => {
            let rendered = match value {
                FieldValue::Nested(nested) => nested.render_tokens()?.join(" "),
                FieldValue::List(items) => {
                    render_elements(items, options.quote)?.join(options.separator())
                }
                scalar => format_scalar(&scalar, options.quote),
            };
            if rendered.is_empty() {
                None
            } else if grouped_value {
                Some(assign(directive, wrap(rendered, options.parenthesize(true))))
            } else {
                Some(assign(directive, rendered))
            }
        }
        RenderKind::Identifier => {
            let rendered = match value {
                FieldValue::Identifier(id) => id.fully_qualified_name(),
                FieldValue::Text(s) => quote_double(s),
                FieldValue::Nested(nested) => nested.render_tokens()?.join(" "),
                FieldValue::List(items) => render_elements(items, Quote::Double)?.join(options.separator()),
                scalar => format_scalar(&scalar, options.quote),
            };
            grouped(directive.sql, rendered, false)
        }
        RenderKind::List => {
            let inner = match value {
                FieldValue::List(items) => render_elements(items, options.quote)?,
                FieldValue::Nested(nested) => nested.render_tokens()?,
                scalar => vec![format_scalar(&scalar, options.quote)],
            };
            grouped(directive.sql, inner.join(options.separator()), options.parenthesize(true))
        }
    };

    Ok(token)
}

/// Render sequence elements; nested structures become space-joined clauses.
fn render_elements(items: Vec<FieldValue<'_>>, quote: Quote) -> Result<Vec<String>, DefinitionError> {
    let mut rendered = Vec::with_capacity(items.len());
    for item in items {
        let element = match item {
            FieldValue::Absent => continue,
            FieldValue::Nested(nested) => nested.render_tokens()?.join(" "),
            FieldValue::List(inner) => wrap(render_elements(inner, quote)?.join(", "), true),
            scalar => format_scalar(&scalar, quote),
        };
        if !element.is_empty() {
            rendered.push(element);
        }
    }
    Ok(rendered)
}

fn format_scalar(value: &FieldValue<'_>, quote: Quote) -> String {
    match value {
        FieldValue::Absent => String::new(),
        FieldValue::Flag(true) => "TRUE".to_string(),
        FieldValue::Flag(false) => "FALSE".to_string(),
        FieldValue::Text(s) => match quote {
            Quote::None => s.to_string(),
            Quote::Single => quote_single(s),
            Quote::Double => quote_double(s),
        },
        FieldValue::Number(n) => n.clone(),
        FieldValue::Identifier(id) => id.fully_qualified_name(),
        // Grouped values are handled by the callers.
        FieldValue::Nested(_) | FieldValue::List(_) => String::new(),
    }
}

/// `NAME = value`, `NAME value` with `no_equals`, `= value` without a name.
fn assign(directive: &Directive, value: String) -> String {
    match (directive.sql.is_empty(), directive.options.no_equals) {
        (true, true) => value,
        (true, false) => format!("= {}", value),
        (false, true) => format!("{} {}", directive.sql, value),
        (false, false) => format!("{} = {}", directive.sql, value),
    }
}

/// A clause whose body rendered to nothing is dropped with its keyword.
fn grouped(keyword: &str, inner: String, parenthesize: bool) -> Option<String> {
    if inner.is_empty() {
        return None;
    }
    Some(prefixed(keyword, wrap(inner, parenthesize)))
}

fn prefixed(keyword: &str, value: String) -> String {
    if keyword.is_empty() {
        value
    } else {
        format!("{} {}", keyword, value)
    }
}

fn wrap(inner: String, parenthesize: bool) -> String {
    if parenthesize {
        format!("({})", inner)
    } else {
        inner
    }
}

/// Single-quote a string literal, doubling embedded quotes.
pub fn quote_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Double-quote an identifier segment, doubling embedded quotes.
pub fn quote_double(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::SchemaObjectIdentifier;
    use crate::resolver::RenderOptions;
    use pretty_assertions::assert_eq;

    fn directive(kind: RenderKind, sql: &'static str, ddl: &str) -> Directive {
        let (_, options) = crate::resolver::parse_annotation("Test", "field", ddl).unwrap();
        Directive {
            name: "field",
            kind,
            sql,
            options,
        }
    }

    #[derive(Debug, Default)]
    struct TagValue {
        name: String,
        value: String,
    }

    crate::option_structure! {
        TagValue {
            name: "keyword",
            value: "parameter",
        }
    }

    #[derive(Debug, Default)]
    struct Tagged {
        tags: Vec<TagValue>,
        inner: Option<TagValue>,
    }

    crate::option_structure! {
        Tagged {
            static "ALTER",
            tags: "list,parentheses" => "TAG",
            inner: "keyword,parentheses" => "WITH",
        }
    }

    #[derive(Debug, Default)]
    struct Unsets {
        comment: Option<bool>,
        retention: Option<bool>,
    }

    crate::option_structure! {
        Unsets {
            comment: "keyword" => "COMMENT",
            retention: "keyword" => "RETENTION",
        }
    }

    #[derive(Debug, Default)]
    struct AlterThing {
        unset: Option<Unsets>,
        set: Option<Unsets>,
        each: Vec<Unsets>,
    }

    crate::option_structure! {
        AlterThing {
            static "ALTER",
            static "THING",
            unset: "keyword" => "UNSET",
            set: "parameter" => "SET",
            each: "list" => "EACH",
        }
    }

    #[test]
    fn test_static_ignores_value() {
        let d = directive(RenderKind::Static, "CREATE", "static");
        assert_eq!(render_field(&d, FieldValue::Absent).unwrap(), Some("CREATE".to_string()));
    }

    #[test]
    fn test_keyword_flag() {
        let d = directive(RenderKind::Keyword, "IF NOT EXISTS", "keyword");
        assert_eq!(render_field(&d, FieldValue::Flag(true)).unwrap().as_deref(), Some("IF NOT EXISTS"));
        assert_eq!(render_field(&d, FieldValue::Flag(false)).unwrap(), None);
        assert_eq!(render_field(&d, FieldValue::Absent).unwrap(), None);
    }

    #[test]
    fn test_parameter_quoting_and_equals() {
        let d = directive(RenderKind::Parameter, "COMMENT", "parameter,single_quotes");
        assert_eq!(
            render_field(&d, FieldValue::Text("it's")).unwrap().as_deref(),
            Some("COMMENT = 'it''s'")
        );

        let d = directive(RenderKind::Parameter, "LIKE", "parameter,single_quotes,no_equals");
        assert_eq!(render_field(&d, FieldValue::Text("db%")).unwrap().as_deref(), Some("LIKE 'db%'"));

        let d = directive(RenderKind::Parameter, "AUTO_RESUME", "parameter");
        assert_eq!(
            render_field(&d, FieldValue::Flag(false)).unwrap().as_deref(),
            Some("AUTO_RESUME = FALSE")
        );
    }

    #[test]
    fn test_parameter_sequence_is_parenthesized() {
        let d = directive(RenderKind::Parameter, "ALLOWED", "parameter,single_quotes");
        let value = FieldValue::List(vec![FieldValue::Text("a"), FieldValue::Text("b")]);
        assert_eq!(render_field(&d, value).unwrap().as_deref(), Some("ALLOWED = ('a', 'b')"));
    }

    #[test]
    fn test_identifier_with_prefix() {
        let id = SchemaObjectIdentifier::new("DB", "S", "T");
        let d = directive(RenderKind::Identifier, "RENAME TO", "identifier");
        assert_eq!(
            render_field(&d, FieldValue::Identifier(&id)).unwrap().as_deref(),
            Some(r#"RENAME TO "DB"."S"."T""#)
        );
    }

    #[test]
    fn test_sequence_of_structures() {
        let opts = Tagged {
            tags: vec![
                TagValue {
                    name: "tag1".into(),
                    value: "v1".into(),
                },
                TagValue {
                    name: "tag2".into(),
                    value: "v2".into(),
                },
            ],
            inner: None,
        };
        assert_eq!(render(&opts).unwrap(), "ALTER TAG (tag1 = v1, tag2 = v2)");
    }

    #[test]
    fn test_absent_nested_renders_nothing() {
        let opts = Tagged::default();
        assert_eq!(render(&opts).unwrap(), "ALTER");
    }

    #[test]
    fn test_present_nested_keyword_parenthesized() {
        let opts = Tagged {
            tags: Vec::new(),
            inner: Some(TagValue {
                name: "k".into(),
                value: "v".into(),
            }),
        };
        assert_eq!(render(&opts).unwrap(), "ALTER WITH (k = v)");
    }

    #[test]
    fn test_list_without_parentheses_or_commas() {
        let d = Directive {
            name: "field",
            kind: RenderKind::List,
            sql: "SET",
            options: RenderOptions {
                parentheses: Some(false),
                no_comma: true,
                ..RenderOptions::default()
            },
        };
        let value = FieldValue::List(vec![FieldValue::Text("A = 1"), FieldValue::Text("B = 2")]);
        assert_eq!(render_field(&d, value).unwrap().as_deref(), Some("SET A = 1 B = 2"));
    }

    #[test]
    fn test_empty_nested_clause_drops_keyword() {
        let opts = AlterThing {
            unset: Some(Unsets::default()),
            set: Some(Unsets::default()),
            each: vec![Unsets::default(), Unsets::default()],
        };
        assert_eq!(render(&opts).unwrap(), "ALTER THING");
    }

    #[test]
    fn test_false_flags_leave_no_trailing_keyword() {
        let opts = AlterThing {
            unset: Some(Unsets {
                comment: Some(false),
                retention: Some(false),
            }),
            ..Default::default()
        };
        assert_eq!(render(&opts).unwrap(), "ALTER THING");

        let opts = AlterThing {
            unset: Some(Unsets {
                comment: Some(false),
                retention: Some(true),
            }),
            ..Default::default()
        };
        assert_eq!(render(&opts).unwrap(), "ALTER THING UNSET RETENTION");
    }

    #[test]
    fn test_empty_group_under_each_kind() {
        let nested = Unsets::default();
        let cases = [
            directive(RenderKind::Keyword, "UNSET", "keyword"),
            directive(RenderKind::Parameter, "SET", "parameter"),
            directive(RenderKind::Identifier, "ON", "identifier"),
            directive(RenderKind::List, "EACH", "list"),
        ];
        for d in &cases {
            let value = FieldValue::Nested(&nested);
            assert_eq!(render_field(d, value).unwrap(), None, "{}", d.sql);
        }
    }
}

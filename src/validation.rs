//! Validation combinators.
//!
//! Rules are evaluated on presence, never on type: `None`, an empty `Vec`
//! and an empty `String` are unset, while `Some(false)` is set. Every rule
//! is a pure function returning at most one [`Violation`]; a [`Validator`]
//! runs many of them against one structure and keeps every failure.

use std::fmt;

use thiserror::Error;

use crate::identifier::ObjectIdentifier;
use crate::resolver::OptionStructure;

/// Whether a field counts as set.
pub trait Presence {
    fn is_set(&self) -> bool;
}

impl Presence for bool {
    fn is_set(&self) -> bool {
        *self
    }
}

impl Presence for str {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for String {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}

macro_rules! always_set {
    ($($t:ty),+ $(,)?) => {
        $(impl Presence for $t {
            fn is_set(&self) -> bool {
                true
            }
        })+
    };
}

always_set!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f64);

impl<T> Presence for Option<T> {
    fn is_set(&self) -> bool {
        self.is_some()
    }
}

impl<T> Presence for Vec<T> {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Presence + ?Sized> Presence for Box<T> {
    fn is_set(&self) -> bool {
        (**self).is_set()
    }
}

/// A named field handed to a combinator.
pub type Field<'a> = (&'static str, &'a dyn Presence);

/// Build a `[Field; N]` from field names of one structure value.
///
/// ```ignore
/// v.exactly_one_of(&fields!(self; set, unset, rename_to));
/// ```
#[macro_export]
macro_rules! fields {
    ($s:expr; $($f:ident),+ $(,)?) => {
        [$( (stringify!($f), &$s.$f as &dyn $crate::validation::Presence) ),+]
    };
}

/// The kind of rule a violation broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    ExactlyOneOf,
    AtLeastOneOf,
    /// At most one of the fields may be set.
    OneOf,
    /// The first field is required because the second is set.
    RequiredIfSet,
    NotSet,
    InvalidIdentifier,
    IntBetween { min: i64, max: i64 },
    /// A keyword-only flag was given as `false`.
    FalseFlag,
    /// The whole options structure is missing.
    NilOptions,
}

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub structure: &'static str,
    pub kind: RuleKind,
    pub fields: Vec<&'static str>,
}

impl Violation {
    pub fn new(structure: &'static str, kind: RuleKind, fields: Vec<&'static str>) -> Self {
        Self {
            structure,
            kind,
            fields,
        }
    }

    /// The sentinel for an omitted options structure.
    pub fn nil_options(structure: &'static str) -> Self {
        Self::new(structure, RuleKind::NilOptions, Vec::new())
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.fields.join(", ");
        match self.kind {
            RuleKind::ExactlyOneOf => {
                write!(f, "{}: exactly one of [{}] must be set", self.structure, names)
            }
            RuleKind::AtLeastOneOf => {
                write!(f, "{}: at least one of [{}] must be set", self.structure, names)
            }
            RuleKind::OneOf => write!(
                f,
                "{}: fields [{}] are incompatible and cannot be set at the same time",
                self.structure, names
            ),
            RuleKind::RequiredIfSet => match self.fields.as_slice() {
                [field, sibling] => write!(
                    f,
                    "{}: field {} must be set when {} is set",
                    self.structure, field, sibling
                ),
                _ => write!(f, "{}: fields [{}] must be set together", self.structure, names),
            },
            RuleKind::NotSet => write!(f, "{}: field {} must be set", self.structure, names),
            RuleKind::InvalidIdentifier => {
                write!(f, "{}: invalid object identifier in {}", self.structure, names)
            }
            RuleKind::IntBetween { min, max } => write!(
                f,
                "{}: field {} must be between {} and {}",
                self.structure, names, min, max
            ),
            RuleKind::FalseFlag => {
                write!(f, "{}: flag {} must be true when set", self.structure, names)
            }
            RuleKind::NilOptions => write!(f, "{}: options cannot be nil", self.structure),
        }
    }
}

/// Every violation found while validating one structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_violations(.0))]
pub struct Violations(Vec<Violation>);

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Violations {
    pub fn first(&self) -> Option<&Violation> {
        self.0.first()
    }

    pub fn all(&self) -> &[Violation] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.0
    }
}

impl From<Violation> for Violations {
    fn from(violation: Violation) -> Self {
        Self(vec![violation])
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(violations: Vec<Violation>) -> Self {
        Self(violations)
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn count_set(fields: &[Field<'_>]) -> usize {
    fields.iter().filter(|(_, value)| value.is_set()).count()
}

fn names(fields: &[Field<'_>]) -> Vec<&'static str> {
    fields.iter().map(|(name, _)| *name).collect()
}

/// Passes iff precisely one field is set.
pub fn exactly_one_of(structure: &'static str, fields: &[Field<'_>]) -> Option<Violation> {
    (count_set(fields) != 1).then(|| Violation::new(structure, RuleKind::ExactlyOneOf, names(fields)))
}

/// Passes iff at least one field is set.
pub fn at_least_one_of(structure: &'static str, fields: &[Field<'_>]) -> Option<Violation> {
    (count_set(fields) == 0).then(|| Violation::new(structure, RuleKind::AtLeastOneOf, names(fields)))
}

/// Passes iff at most one field is set.
pub fn one_of(structure: &'static str, fields: &[Field<'_>]) -> Option<Violation> {
    (count_set(fields) > 1).then(|| Violation::new(structure, RuleKind::OneOf, names(fields)))
}

/// Passes unless `sibling` is set while `field` is not.
pub fn required_if_set(structure: &'static str, field: Field<'_>, sibling: Field<'_>) -> Option<Violation> {
    (sibling.1.is_set() && !field.1.is_set())
        .then(|| Violation::new(structure, RuleKind::RequiredIfSet, vec![field.0, sibling.0]))
}

/// Passes iff the field is set.
pub fn required(structure: &'static str, field: Field<'_>) -> Option<Violation> {
    (!field.1.is_set()).then(|| Violation::new(structure, RuleKind::NotSet, vec![field.0]))
}

/// Passes iff every identifier segment is non-empty.
pub fn valid_identifier<I>(structure: &'static str, name: &'static str, id: &I) -> Option<Violation>
where
    I: ObjectIdentifier + ?Sized,
{
    (!id.is_valid()).then(|| Violation::new(structure, RuleKind::InvalidIdentifier, vec![name]))
}

/// Like [`valid_identifier`], skipped when the identifier is absent.
pub fn valid_identifier_if_set<I>(structure: &'static str, name: &'static str, id: Option<&I>) -> Option<Violation>
where
    I: ObjectIdentifier + ?Sized,
{
    id.and_then(|id| valid_identifier(structure, name, id))
}

/// Passes iff the value is absent or within `min..=max`.
pub fn int_between<N>(structure: &'static str, name: &'static str, value: Option<N>, min: i64, max: i64) -> Option<Violation>
where
    N: Into<i64>,
{
    value
        .map(Into::into)
        .filter(|v| *v < min || *v > max)
        .map(|_| Violation::new(structure, RuleKind::IntBetween { min, max }, vec![name]))
}

/// Passes unless a keyword-only flag is explicitly `false`.
///
/// Keyword-only flags render nothing when false yet count as set.
pub fn true_if_set(structure: &'static str, name: &'static str, value: Option<bool>) -> Option<Violation> {
    (value == Some(false)).then(|| Violation::new(structure, RuleKind::FalseFlag, vec![name]))
}

/// Per-resource validation rules.
pub trait Validate {
    /// Run this resource's combinators. The default has no rules.
    fn validate(&self, _v: &mut Validator) {}
}

/// Accumulates violations for one structure; never short-circuits.
#[derive(Debug)]
pub struct Validator {
    structure: &'static str,
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new(structure: &'static str) -> Self {
        Self {
            structure,
            violations: Vec::new(),
        }
    }

    pub fn structure(&self) -> &'static str {
        self.structure
    }

    pub fn push(&mut self, violation: Violation) -> &mut Self {
        self.violations.push(violation);
        self
    }

    fn check(&mut self, violation: Option<Violation>) -> &mut Self {
        self.violations.extend(violation);
        self
    }

    pub fn exactly_one_of(&mut self, fields: &[Field<'_>]) -> &mut Self {
        let v = exactly_one_of(self.structure, fields);
        self.check(v)
    }

    pub fn at_least_one_of(&mut self, fields: &[Field<'_>]) -> &mut Self {
        let v = at_least_one_of(self.structure, fields);
        self.check(v)
    }

    pub fn one_of(&mut self, fields: &[Field<'_>]) -> &mut Self {
        let v = one_of(self.structure, fields);
        self.check(v)
    }

    pub fn required_if_set(&mut self, field: Field<'_>, sibling: Field<'_>) -> &mut Self {
        let v = required_if_set(self.structure, field, sibling);
        self.check(v)
    }

    pub fn required(&mut self, field: Field<'_>) -> &mut Self {
        let v = required(self.structure, field);
        self.check(v)
    }

    pub fn valid_identifier<I>(&mut self, name: &'static str, id: &I) -> &mut Self
    where
        I: ObjectIdentifier + ?Sized,
    {
        let v = valid_identifier(self.structure, name, id);
        self.check(v)
    }

    pub fn valid_identifier_if_set<I>(&mut self, name: &'static str, id: Option<&I>) -> &mut Self
    where
        I: ObjectIdentifier + ?Sized,
    {
        let v = valid_identifier_if_set(self.structure, name, id);
        self.check(v)
    }

    pub fn int_between<N: Into<i64>>(&mut self, name: &'static str, value: Option<N>, min: i64, max: i64) -> &mut Self {
        let v = int_between(self.structure, name, value, min, max);
        self.check(v)
    }

    /// Apply [`true_if_set`] to every `(name, flag)` pair.
    pub fn true_if_set(&mut self, flags: &[(&'static str, Option<bool>)]) -> &mut Self {
        for &(name, value) in flags {
            let v = true_if_set(self.structure, name, value);
            self.check(v);
        }
        self
    }

    /// Validate a present nested structure under its own name.
    pub fn nested<T>(&mut self, value: Option<&T>) -> &mut Self
    where
        T: OptionStructure + Validate,
    {
        if let Some(inner) = value {
            let mut nested = Validator::new(T::NAME);
            inner.validate(&mut nested);
            self.violations.extend(nested.violations);
        }
        self
    }

    /// Validate every element of a sequence of nested structures.
    pub fn each<T>(&mut self, values: &[T]) -> &mut Self
    where
        T: OptionStructure + Validate,
    {
        for value in values {
            self.nested(Some(value));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn finish(self) -> Result<(), Violations> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(Violations(self.violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{AccountObjectIdentifier, SchemaObjectIdentifier};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Alter {
        set: Option<String>,
        unset: Option<bool>,
        rename: Vec<String>,
    }

    #[test]
    fn test_exactly_one_of() {
        let mut opts = Alter::default();
        let none = exactly_one_of("Alter", &fields!(opts; set, unset, rename));
        assert_eq!(
            none,
            Some(Violation::new("Alter", RuleKind::ExactlyOneOf, vec!["set", "unset", "rename"]))
        );

        opts.unset = Some(false);
        assert_eq!(exactly_one_of("Alter", &fields!(opts; set, unset, rename)), None);

        opts.set = Some("x".into());
        assert!(exactly_one_of("Alter", &fields!(opts; set, unset, rename)).is_some());
    }

    #[test]
    fn test_at_least_one_of_every_subset() {
        for mask in 0u8..8 {
            let opts = Alter {
                set: (mask & 1 != 0).then(|| "x".to_string()),
                unset: (mask & 2 != 0).then_some(true),
                rename: if mask & 4 != 0 { vec!["y".to_string()] } else { Vec::new() },
            };
            let result = at_least_one_of("Alter", &fields!(opts; set, unset, rename));
            assert_eq!(result.is_none(), mask != 0, "mask {:03b}", mask);
        }
    }

    #[test]
    fn test_one_of() {
        let opts = Alter {
            set: Some("x".into()),
            unset: Some(true),
            rename: Vec::new(),
        };
        let v = one_of("Alter", &fields!(opts; set, unset)).unwrap();
        assert_eq!(v.kind, RuleKind::OneOf);
        assert_eq!(
            v.to_string(),
            "Alter: fields [set, unset] are incompatible and cannot be set at the same time"
        );
        assert_eq!(one_of("Alter", &fields!(opts; set, rename)), None);
    }

    #[test]
    fn test_required_if_set() {
        let opts = Alter {
            set: None,
            unset: Some(true),
            rename: Vec::new(),
        };
        let v = required_if_set("Alter", ("set", &opts.set), ("unset", &opts.unset)).unwrap();
        assert_eq!(v.to_string(), "Alter: field set must be set when unset is set");
        assert_eq!(required_if_set("Alter", ("unset", &opts.unset), ("set", &opts.set)), None);
    }

    #[test]
    fn test_identifier_rules() {
        let good = SchemaObjectIdentifier::new("DB", "S", "T");
        let bad = SchemaObjectIdentifier::new("DB", "", "T");
        assert_eq!(valid_identifier("X", "name", &good), None);
        assert_eq!(
            valid_identifier("X", "name", &bad).map(|v| v.kind),
            Some(RuleKind::InvalidIdentifier)
        );
        assert_eq!(valid_identifier_if_set::<AccountObjectIdentifier>("X", "name", None), None);
    }

    #[test]
    fn test_int_between() {
        assert_eq!(int_between("X", "n", Some(5), 1, 10), None);
        assert_eq!(int_between::<i32>("X", "n", None, 1, 10), None);
        let v = int_between("X", "n", Some(11), 1, 10).unwrap();
        assert_eq!(v.to_string(), "X: field n must be between 1 and 10");
    }

    #[test]
    fn test_validator_aggregates_all_violations() {
        let opts = Alter::default();
        let mut v = Validator::new("Alter");
        v.exactly_one_of(&fields!(opts; set, unset))
            .at_least_one_of(&fields!(opts; rename))
            .valid_identifier("name", &AccountObjectIdentifier::new(""));
        let err = v.finish().unwrap_err();
        assert_eq!(err.len(), 3);
        assert_eq!(err.first().map(|v| v.kind), Some(RuleKind::ExactlyOneOf));
        assert_eq!(
            err.to_string(),
            "Alter: exactly one of [set, unset] must be set; \
             Alter: at least one of [rename] must be set; \
             Alter: invalid object identifier in name"
        );
    }

    #[test]
    fn test_true_if_set() {
        assert_eq!(true_if_set("X", "suspend", None), None);
        assert_eq!(true_if_set("X", "suspend", Some(true)), None);
        let v = true_if_set("X", "suspend", Some(false)).unwrap();
        assert_eq!(v.to_string(), "X: flag suspend must be true when set");

        let mut validator = Validator::new("X");
        validator.true_if_set(&[("a", Some(false)), ("b", None), ("c", Some(false))]);
        let err = validator.finish().unwrap_err();
        let fields: Vec<&str> = err.iter().flat_map(|v| v.fields.clone()).collect();
        assert_eq!(fields, vec!["a", "c"]);
    }

    #[test]
    fn test_nil_options_message() {
        assert_eq!(Violation::nil_options("DropRoleOptions").to_string(), "DropRoleOptions: options cannot be nil");
    }
}

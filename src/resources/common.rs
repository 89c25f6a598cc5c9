//! Clauses shared by many resources.

use serde::{Deserialize, Serialize};

use crate::identifier::{AccountObjectIdentifier, DatabaseObjectIdentifier, SchemaObjectIdentifier};
use crate::validation::{Validate, Validator};
use crate::{fields, option_structure};

/// `LIKE '<pattern>'`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Like {
    pub pattern: Option<String>,
}

option_structure! {
    Like {
        pattern: "parameter,no_equals,single_quotes,required" => "LIKE",
    }
}

impl Validate for Like {}

impl Like {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
        }
    }
}

/// `IN { ACCOUNT | DATABASE <db> | SCHEMA <schema> }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct In {
    pub account: Option<bool>,
    pub database: Option<AccountObjectIdentifier>,
    pub schema: Option<DatabaseObjectIdentifier>,
}

option_structure! {
    In {
        static "IN",
        account: "keyword" => "ACCOUNT",
        database: "identifier" => "DATABASE",
        schema: "identifier" => "SCHEMA",
    }
}

impl Validate for In {
    fn validate(&self, v: &mut Validator) {
        v.exactly_one_of(&fields!(self; account, database, schema))
            .true_if_set(&[("account", self.account)])
            .valid_identifier_if_set("database", self.database.as_ref())
            .valid_identifier_if_set("schema", self.schema.as_ref());
    }
}

/// `LIMIT <rows> [ FROM '<name>' ]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitFrom {
    pub rows: Option<u32>,
    pub from: Option<String>,
}

option_structure! {
    LimitFrom {
        rows: "keyword,required" => "LIMIT",
        from: "parameter,no_equals,single_quotes" => "FROM",
    }
}

impl Validate for LimitFrom {
    fn validate(&self, v: &mut Validator) {
        v.int_between("rows", self.rows, 1, 10_000);
    }
}

/// `<tag> = '<value>'`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagAssociation {
    pub name: SchemaObjectIdentifier,
    pub value: String,
}

option_structure! {
    TagAssociation {
        name: "identifier",
        value: "parameter,single_quotes",
    }
}

impl Validate for TagAssociation {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name);
    }
}

impl TagAssociation {
    pub fn new(name: SchemaObjectIdentifier, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::prepare;
    use crate::render::render;
    use crate::validation::RuleKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_like() {
        assert_eq!(render(&Like::new("prod_%")).unwrap(), "LIKE 'prod_%'");
    }

    #[test]
    fn test_in_variants() {
        let account = In {
            account: Some(true),
            ..In::default()
        };
        assert_eq!(render(&account).unwrap(), "IN ACCOUNT");

        let schema = In {
            schema: Some(DatabaseObjectIdentifier::new("DB", "PUBLIC")),
            ..In::default()
        };
        assert_eq!(render(&schema).unwrap(), r#"IN SCHEMA "DB"."PUBLIC""#);
    }

    #[test]
    fn test_in_requires_exactly_one_scope() {
        let both = In {
            account: Some(true),
            database: Some(AccountObjectIdentifier::new("DB")),
            schema: None,
        };
        let err = prepare(&both).unwrap_err();
        assert_eq!(
            err.violations().unwrap().first().unwrap().kind,
            RuleKind::ExactlyOneOf
        );
    }

    #[test]
    fn test_in_account_false_rejected() {
        let scope = In {
            account: Some(false),
            ..In::default()
        };
        let err = prepare(&scope).unwrap_err();
        let v = err.violations().unwrap().first().unwrap();
        assert_eq!((v.structure, v.kind, v.fields.clone()), ("In", RuleKind::FalseFlag, vec!["account"]));
        assert_eq!(v.to_string(), "In: flag account must be true when set");
    }

    #[test]
    fn test_limit_from() {
        let limit = LimitFrom {
            rows: Some(10),
            from: Some("DB_B".to_string()),
        };
        assert_eq!(render(&limit).unwrap(), "LIMIT 10 FROM 'DB_B'");
    }

    #[test]
    fn test_limit_rows_out_of_range() {
        let limit = LimitFrom {
            rows: Some(0),
            from: None,
        };
        let err = prepare(&limit).unwrap_err();
        assert_eq!(
            err.violations().unwrap().first().unwrap().kind,
            RuleKind::IntBetween { min: 1, max: 10_000 }
        );
    }

    #[test]
    fn test_tag_association() {
        let tag = TagAssociation::new(SchemaObjectIdentifier::new("DB", "S", "COST_CENTER"), "eng");
        assert_eq!(render(&tag).unwrap(), r#""DB"."S"."COST_CENTER" = 'eng'"#);
    }
}

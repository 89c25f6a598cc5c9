//! Schemas.

use serde::{Deserialize, Serialize};

use super::common::{In, Like, LimitFrom, TagAssociation};
use crate::identifier::{DatabaseObjectIdentifier, SchemaObjectIdentifier};
use crate::validation::{Validate, Validator};
use crate::{fields, option_structure};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateSchemaOptions {
    pub or_replace: Option<bool>,
    pub transient: Option<bool>,
    pub if_not_exists: Option<bool>,
    pub name: DatabaseObjectIdentifier,
    pub clone: Option<DatabaseObjectIdentifier>,
    pub with_managed_access: Option<bool>,
    pub data_retention_time_in_days: Option<u32>,
    pub max_data_extension_time_in_days: Option<u32>,
    pub default_ddl_collation: Option<String>,
    pub tag: Vec<TagAssociation>,
    pub comment: Option<String>,
}

option_structure! {
    CreateSchemaOptions {
        static "CREATE",
        or_replace: "keyword" => "OR REPLACE",
        transient: "keyword" => "TRANSIENT",
        static "SCHEMA",
        if_not_exists: "keyword" => "IF NOT EXISTS",
        name: "identifier",
        clone: "identifier" => "CLONE",
        with_managed_access: "keyword" => "WITH MANAGED ACCESS",
        data_retention_time_in_days: "parameter" => "DATA_RETENTION_TIME_IN_DAYS",
        max_data_extension_time_in_days: "parameter" => "MAX_DATA_EXTENSION_TIME_IN_DAYS",
        default_ddl_collation: "parameter,single_quotes" => "DEFAULT_DDL_COLLATION",
        tag: "keyword,parentheses" => "TAG",
        comment: "parameter,single_quotes" => "COMMENT",
    }
}

impl Validate for CreateSchemaOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name)
            .valid_identifier_if_set("clone", self.clone.as_ref())
            .one_of(&fields!(self; or_replace, if_not_exists))
            .each(&self.tag);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlterSchemaOptions {
    pub if_exists: Option<bool>,
    pub name: DatabaseObjectIdentifier,
    pub new_name: Option<DatabaseObjectIdentifier>,
    pub swap_with: Option<DatabaseObjectIdentifier>,
    pub set: Option<SchemaSet>,
    pub unset: Option<SchemaUnset>,
    pub set_tag: Vec<TagAssociation>,
    pub unset_tag: Vec<SchemaObjectIdentifier>,
    pub enable_managed_access: Option<bool>,
    pub disable_managed_access: Option<bool>,
}

option_structure! {
    AlterSchemaOptions {
        static "ALTER",
        static "SCHEMA",
        if_exists: "keyword" => "IF EXISTS",
        name: "identifier",
        new_name: "identifier" => "RENAME TO",
        swap_with: "identifier" => "SWAP WITH",
        set: "list,no_parentheses,no_comma" => "SET",
        unset: "list,no_parentheses" => "UNSET",
        set_tag: "keyword" => "SET TAG",
        unset_tag: "keyword" => "UNSET TAG",
        enable_managed_access: "keyword" => "ENABLE MANAGED ACCESS",
        disable_managed_access: "keyword" => "DISABLE MANAGED ACCESS",
    }
}

impl Validate for AlterSchemaOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name)
            .exactly_one_of(&fields!(
                self;
                new_name,
                swap_with,
                set,
                unset,
                set_tag,
                unset_tag,
                enable_managed_access,
                disable_managed_access
            ))
            .valid_identifier_if_set("new_name", self.new_name.as_ref())
            .valid_identifier_if_set("swap_with", self.swap_with.as_ref())
            .true_if_set(&[
                ("enable_managed_access", self.enable_managed_access),
                ("disable_managed_access", self.disable_managed_access),
            ])
            .nested(self.set.as_ref())
            .nested(self.unset.as_ref())
            .each(&self.set_tag);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSet {
    pub data_retention_time_in_days: Option<u32>,
    pub max_data_extension_time_in_days: Option<u32>,
    pub default_ddl_collation: Option<String>,
    pub comment: Option<String>,
}

option_structure! {
    SchemaSet {
        data_retention_time_in_days: "parameter" => "DATA_RETENTION_TIME_IN_DAYS",
        max_data_extension_time_in_days: "parameter" => "MAX_DATA_EXTENSION_TIME_IN_DAYS",
        default_ddl_collation: "parameter,single_quotes" => "DEFAULT_DDL_COLLATION",
        comment: "parameter,single_quotes" => "COMMENT",
    }
}

impl Validate for SchemaSet {
    fn validate(&self, v: &mut Validator) {
        v.at_least_one_of(&fields!(
            self;
            data_retention_time_in_days,
            max_data_extension_time_in_days,
            default_ddl_collation,
            comment
        ));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaUnset {
    pub data_retention_time_in_days: Option<bool>,
    pub max_data_extension_time_in_days: Option<bool>,
    pub default_ddl_collation: Option<bool>,
    pub comment: Option<bool>,
}

option_structure! {
    SchemaUnset {
        data_retention_time_in_days: "keyword" => "DATA_RETENTION_TIME_IN_DAYS",
        max_data_extension_time_in_days: "keyword" => "MAX_DATA_EXTENSION_TIME_IN_DAYS",
        default_ddl_collation: "keyword" => "DEFAULT_DDL_COLLATION",
        comment: "keyword" => "COMMENT",
    }
}

impl Validate for SchemaUnset {
    fn validate(&self, v: &mut Validator) {
        // Schemas only accept a single UNSET target per statement.
        v.exactly_one_of(&fields!(
            self;
            data_retention_time_in_days,
            max_data_extension_time_in_days,
            default_ddl_collation,
            comment
        ))
        .true_if_set(&[
            ("data_retention_time_in_days", self.data_retention_time_in_days),
            ("max_data_extension_time_in_days", self.max_data_extension_time_in_days),
            ("default_ddl_collation", self.default_ddl_collation),
            ("comment", self.comment),
        ]);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropSchemaOptions {
    pub if_exists: Option<bool>,
    pub name: DatabaseObjectIdentifier,
    pub cascade: Option<bool>,
    pub restrict: Option<bool>,
}

option_structure! {
    DropSchemaOptions {
        static "DROP",
        static "SCHEMA",
        if_exists: "keyword" => "IF EXISTS",
        name: "identifier",
        cascade: "keyword" => "CASCADE",
        restrict: "keyword" => "RESTRICT",
    }
}

impl Validate for DropSchemaOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name)
            .one_of(&fields!(self; cascade, restrict));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowSchemasOptions {
    pub terse: Option<bool>,
    pub history: Option<bool>,
    pub like: Option<Like>,
    pub in_: Option<In>,
    pub starts_with: Option<String>,
    pub limit: Option<LimitFrom>,
}

option_structure! {
    ShowSchemasOptions {
        static "SHOW",
        terse: "keyword" => "TERSE",
        static "SCHEMAS",
        history: "keyword" => "HISTORY",
        like: "keyword",
        in_: "keyword",
        starts_with: "parameter,no_equals,single_quotes" => "STARTS WITH",
        limit: "keyword",
    }
}

impl Validate for ShowSchemasOptions {
    fn validate(&self, v: &mut Validator) {
        v.nested(self.in_.as_ref()).nested(self.limit.as_ref());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeSchemaOptions {
    pub name: DatabaseObjectIdentifier,
}

option_structure! {
    DescribeSchemaOptions {
        static "DESCRIBE",
        static "SCHEMA",
        name: "identifier",
    }
}

impl Validate for DescribeSchemaOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::prepare;
    use crate::identifier::AccountObjectIdentifier;
    use crate::validation::RuleKind;
    use pretty_assertions::assert_eq;

    fn id(db: &str, name: &str) -> DatabaseObjectIdentifier {
        DatabaseObjectIdentifier::new(db, name)
    }

    #[test]
    fn test_create_managed() {
        let opts = CreateSchemaOptions {
            if_not_exists: Some(true),
            name: id("DB", "RAW"),
            with_managed_access: Some(true),
            comment: Some("landing".to_string()),
            ..Default::default()
        };
        assert_eq!(
            prepare(&opts).unwrap(),
            r#"CREATE SCHEMA IF NOT EXISTS "DB"."RAW" WITH MANAGED ACCESS COMMENT = 'landing'"#
        );
    }

    #[test]
    fn test_create_rejects_missing_database_segment() {
        let opts = CreateSchemaOptions {
            name: id("", "RAW"),
            ..Default::default()
        };
        let err = prepare(&opts).unwrap_err();
        assert_eq!(
            err.violations().unwrap().first().unwrap().kind,
            RuleKind::InvalidIdentifier
        );
    }

    #[test]
    fn test_alter_managed_access() {
        let opts = AlterSchemaOptions {
            name: id("DB", "RAW"),
            enable_managed_access: Some(true),
            ..Default::default()
        };
        assert_eq!(prepare(&opts).unwrap(), r#"ALTER SCHEMA "DB"."RAW" ENABLE MANAGED ACCESS"#);
    }

    #[test]
    fn test_alter_false_flags_rejected() {
        let opts = AlterSchemaOptions {
            name: id("DB", "RAW"),
            disable_managed_access: Some(false),
            ..Default::default()
        };
        let err = prepare(&opts).unwrap_err();
        let v = err.violations().unwrap().first().unwrap();
        assert_eq!(
            (v.structure, v.kind, v.fields.clone()),
            ("AlterSchemaOptions", RuleKind::FalseFlag, vec!["disable_managed_access"])
        );

        let opts = AlterSchemaOptions {
            name: id("DB", "RAW"),
            unset: Some(SchemaUnset {
                comment: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = prepare(&opts).unwrap_err();
        let v = err.violations().unwrap().first().unwrap();
        assert_eq!((v.structure, v.kind), ("SchemaUnset", RuleKind::FalseFlag));
    }

    #[test]
    fn test_alter_swap() {
        let opts = AlterSchemaOptions {
            if_exists: Some(true),
            name: id("DB", "A"),
            swap_with: Some(id("DB", "B")),
            ..Default::default()
        };
        assert_eq!(
            prepare(&opts).unwrap(),
            r#"ALTER SCHEMA IF EXISTS "DB"."A" SWAP WITH "DB"."B""#
        );
    }

    #[test]
    fn test_unset_allows_single_target() {
        let opts = AlterSchemaOptions {
            name: id("DB", "A"),
            unset: Some(SchemaUnset {
                comment: Some(true),
                default_ddl_collation: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = prepare(&opts).unwrap_err();
        let v = err.violations().unwrap().first().unwrap();
        assert_eq!((v.structure, v.kind), ("SchemaUnset", RuleKind::ExactlyOneOf));
    }

    #[test]
    fn test_show_in_database() {
        let opts = ShowSchemasOptions {
            like: Some(Like::new("R%")),
            in_: Some(In {
                database: Some(AccountObjectIdentifier::new("DB")),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(prepare(&opts).unwrap(), r#"SHOW SCHEMAS LIKE 'R%' IN DATABASE "DB""#);
    }

    #[test]
    fn test_show_in_without_scope_fails() {
        let opts = ShowSchemasOptions {
            in_: Some(In::default()),
            ..Default::default()
        };
        let err = prepare(&opts).unwrap_err();
        assert_eq!(err.violations().unwrap().first().unwrap().structure, "In");
    }

    #[test]
    fn test_drop_and_describe() {
        let drop = DropSchemaOptions {
            name: id("DB", "A"),
            restrict: Some(true),
            ..Default::default()
        };
        assert_eq!(prepare(&drop).unwrap(), r#"DROP SCHEMA "DB"."A" RESTRICT"#);

        let describe = DescribeSchemaOptions { name: id("DB", "A") };
        assert_eq!(prepare(&describe).unwrap(), r#"DESCRIBE SCHEMA "DB"."A""#);
    }
}

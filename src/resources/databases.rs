//! Databases.

use serde::{Deserialize, Serialize};

use super::common::{Like, LimitFrom, TagAssociation};
use crate::identifier::{AccountObjectIdentifier, SchemaObjectIdentifier};
use crate::validation::{Validate, Validator};
use crate::{fields, option_structure};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateDatabaseOptions {
    pub or_replace: Option<bool>,
    pub transient: Option<bool>,
    pub if_not_exists: Option<bool>,
    pub name: AccountObjectIdentifier,
    pub clone: Option<AccountObjectIdentifier>,
    pub data_retention_time_in_days: Option<u32>,
    pub max_data_extension_time_in_days: Option<u32>,
    pub default_ddl_collation: Option<String>,
    pub comment: Option<String>,
    pub tag: Vec<TagAssociation>,
}

option_structure! {
    CreateDatabaseOptions {
        static "CREATE",
        or_replace: "keyword" => "OR REPLACE",
        transient: "keyword" => "TRANSIENT",
        static "DATABASE",
        if_not_exists: "keyword" => "IF NOT EXISTS",
        name: "identifier",
        clone: "identifier" => "CLONE",
        data_retention_time_in_days: "parameter" => "DATA_RETENTION_TIME_IN_DAYS",
        max_data_extension_time_in_days: "parameter" => "MAX_DATA_EXTENSION_TIME_IN_DAYS",
        default_ddl_collation: "parameter,single_quotes" => "DEFAULT_DDL_COLLATION",
        comment: "parameter,single_quotes" => "COMMENT",
        tag: "keyword,parentheses" => "TAG",
    }
}

impl Validate for CreateDatabaseOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name)
            .valid_identifier_if_set("clone", self.clone.as_ref())
            .one_of(&fields!(self; or_replace, if_not_exists))
            .int_between("data_retention_time_in_days", self.data_retention_time_in_days, 0, 90)
            .int_between("max_data_extension_time_in_days", self.max_data_extension_time_in_days, 0, 90)
            .each(&self.tag);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlterDatabaseOptions {
    pub if_exists: Option<bool>,
    pub name: AccountObjectIdentifier,
    pub new_name: Option<AccountObjectIdentifier>,
    pub swap_with: Option<AccountObjectIdentifier>,
    pub set: Option<DatabaseSet>,
    pub unset: Option<DatabaseUnset>,
    pub set_tag: Vec<TagAssociation>,
    pub unset_tag: Vec<SchemaObjectIdentifier>,
}

option_structure! {
    AlterDatabaseOptions {
        static "ALTER",
        static "DATABASE",
        if_exists: "keyword" => "IF EXISTS",
        name: "identifier",
        new_name: "identifier" => "RENAME TO",
        swap_with: "identifier" => "SWAP WITH",
        set: "list,no_parentheses,no_comma" => "SET",
        unset: "list,no_parentheses" => "UNSET",
        set_tag: "keyword" => "SET TAG",
        unset_tag: "keyword" => "UNSET TAG",
    }
}

impl Validate for AlterDatabaseOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name)
            .exactly_one_of(&fields!(self; new_name, swap_with, set, unset, set_tag, unset_tag))
            .valid_identifier_if_set("new_name", self.new_name.as_ref())
            .valid_identifier_if_set("swap_with", self.swap_with.as_ref())
            .nested(self.set.as_ref())
            .nested(self.unset.as_ref())
            .each(&self.set_tag);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSet {
    pub data_retention_time_in_days: Option<u32>,
    pub max_data_extension_time_in_days: Option<u32>,
    pub default_ddl_collation: Option<String>,
    pub comment: Option<String>,
}

option_structure! {
    DatabaseSet {
        data_retention_time_in_days: "parameter" => "DATA_RETENTION_TIME_IN_DAYS",
        max_data_extension_time_in_days: "parameter" => "MAX_DATA_EXTENSION_TIME_IN_DAYS",
        default_ddl_collation: "parameter,single_quotes" => "DEFAULT_DDL_COLLATION",
        comment: "parameter,single_quotes" => "COMMENT",
    }
}

impl Validate for DatabaseSet {
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
pub struct DatabaseUnset {
    pub data_retention_time_in_days: Option<bool>,
    pub max_data_extension_time_in_days: Option<bool>,
    pub default_ddl_collation: Option<bool>,
    pub comment: Option<bool>,
}

option_structure! {
    DatabaseUnset {
        data_retention_time_in_days: "keyword" => "DATA_RETENTION_TIME_IN_DAYS",
        max_data_extension_time_in_days: "keyword" => "MAX_DATA_EXTENSION_TIME_IN_DAYS",
        default_ddl_collation: "keyword" => "DEFAULT_DDL_COLLATION",
        comment: "keyword" => "COMMENT",
    }
}

impl Validate for DatabaseUnset {
    fn validate(&self, v: &mut Validator) {
        v.at_least_one_of(&fields!(
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
pub struct DropDatabaseOptions {
    pub if_exists: Option<bool>,
    pub name: AccountObjectIdentifier,
    pub cascade: Option<bool>,
    pub restrict: Option<bool>,
}

option_structure! {
    DropDatabaseOptions {
        static "DROP",
        static "DATABASE",
        if_exists: "keyword" => "IF EXISTS",
        name: "identifier",
        cascade: "keyword" => "CASCADE",
        restrict: "keyword" => "RESTRICT",
    }
}

impl Validate for DropDatabaseOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name)
            .one_of(&fields!(self; cascade, restrict));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UndropDatabaseOptions {
    pub name: AccountObjectIdentifier,
}

option_structure! {
    UndropDatabaseOptions {
        static "UNDROP",
        static "DATABASE",
        name: "identifier",
    }
}

impl Validate for UndropDatabaseOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowDatabasesOptions {
    pub terse: Option<bool>,
    pub history: Option<bool>,
    pub like: Option<Like>,
    pub starts_with: Option<String>,
    pub limit: Option<LimitFrom>,
}

option_structure! {
    ShowDatabasesOptions {
        static "SHOW",
        terse: "keyword" => "TERSE",
        static "DATABASES",
        history: "keyword" => "HISTORY",
        like: "keyword",
        starts_with: "parameter,no_equals,single_quotes" => "STARTS WITH",
        limit: "keyword",
    }
}

impl Validate for ShowDatabasesOptions {
    fn validate(&self, v: &mut Validator) {
        v.nested(self.limit.as_ref());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeDatabaseOptions {
    pub name: AccountObjectIdentifier,
}

option_structure! {
    DescribeDatabaseOptions {
        static "DESCRIBE",
        static "DATABASE",
        name: "identifier",
    }
}

impl Validate for DescribeDatabaseOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name);
    }
}

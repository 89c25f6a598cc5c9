//! Account roles.

use serde::{Deserialize, Serialize};

use super::common::{Like, TagAssociation};
use crate::identifier::{AccountObjectIdentifier, SchemaObjectIdentifier};
use crate::validation::{Validate, Validator};
use crate::{fields, option_structure};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateRoleOptions {
    pub or_replace: Option<bool>,
    pub if_not_exists: Option<bool>,
    pub name: AccountObjectIdentifier,
    pub comment: Option<String>,
    pub tag: Vec<TagAssociation>,
}

option_structure! {
    CreateRoleOptions {
        static "CREATE",
        or_replace: "keyword" => "OR REPLACE",
        static "ROLE",
        if_not_exists: "keyword" => "IF NOT EXISTS",
        name: "identifier",
        comment: "parameter,single_quotes" => "COMMENT",
        tag: "keyword,parentheses" => "TAG",
    }
}

impl Validate for CreateRoleOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name)
            .one_of(&fields!(self; or_replace, if_not_exists))
            .each(&self.tag);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlterRoleOptions {
    pub if_exists: Option<bool>,
    pub name: AccountObjectIdentifier,
    pub rename_to: Option<AccountObjectIdentifier>,
    pub set_comment: Option<String>,
    pub unset_comment: Option<bool>,
    pub set_tag: Vec<TagAssociation>,
    pub unset_tag: Vec<SchemaObjectIdentifier>,
}

option_structure! {
    AlterRoleOptions {
        static "ALTER",
        static "ROLE",
        if_exists: "keyword" => "IF EXISTS",
        name: "identifier",
        rename_to: "identifier" => "RENAME TO",
        set_comment: "parameter,single_quotes" => "SET COMMENT",
        unset_comment: "keyword" => "UNSET COMMENT",
        set_tag: "keyword" => "SET TAG",
        unset_tag: "keyword" => "UNSET TAG",
    }
}

impl Validate for AlterRoleOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name)
            .exactly_one_of(&fields!(self; rename_to, set_comment, unset_comment, set_tag, unset_tag))
            .true_if_set(&[("unset_comment", self.unset_comment)])
            .valid_identifier_if_set("rename_to", self.rename_to.as_ref())
            .each(&self.set_tag);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropRoleOptions {
    pub if_exists: Option<bool>,
    pub name: AccountObjectIdentifier,
}

option_structure! {
    DropRoleOptions {
        static "DROP",
        static "ROLE",
        if_exists: "keyword" => "IF EXISTS",
        name: "identifier",
    }
}

impl Validate for DropRoleOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowRolesOptions {
    pub like: Option<Like>,
    pub in_class: Option<SchemaObjectIdentifier>,
}

option_structure! {
    ShowRolesOptions {
        static "SHOW",
        static "ROLES",
        like: "keyword",
        in_class: "identifier" => "IN CLASS",
    }
}

impl Validate for ShowRolesOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier_if_set("in_class", self.in_class.as_ref());
    }
}

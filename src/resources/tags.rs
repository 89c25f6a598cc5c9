//! Object tags and their masking policies.

use serde::{Deserialize, Serialize};

use super::common::{In, Like};
use crate::identifier::SchemaObjectIdentifier;
use crate::validation::{Validate, Validator};
use crate::{fields, option_structure};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateTagOptions {
    pub or_replace: Option<bool>,
    pub if_not_exists: Option<bool>,
    pub name: SchemaObjectIdentifier,
    pub allowed_values: Vec<String>,
    pub comment: Option<String>,
}

option_structure! {
    CreateTagOptions {
        static "CREATE",
        or_replace: "keyword" => "OR REPLACE",
        static "TAG",
        if_not_exists: "keyword" => "IF NOT EXISTS",
        name: "identifier",
        allowed_values: "list,no_parentheses,single_quotes" => "ALLOWED_VALUES",
        comment: "parameter,single_quotes" => "COMMENT",
    }
}

impl Validate for CreateTagOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name)
            .one_of(&fields!(self; or_replace, if_not_exists));
        // The server caps a tag at 300 allowed values.
        let count = i64::try_from(self.allowed_values.len()).unwrap_or(i64::MAX);
        v.int_between("allowed_values", Some(count), 0, 300);
    }
}

/// `MASKING POLICY <name>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagMaskingPolicy {
    pub name: SchemaObjectIdentifier,
}

option_structure! {
    TagMaskingPolicy {
        name: "identifier" => "MASKING POLICY",
    }
}

impl Validate for TagMaskingPolicy {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagSetMaskingPolicies {
    pub masking_policies: Vec<TagMaskingPolicy>,
    pub force: Option<bool>,
}

option_structure! {
    TagSetMaskingPolicies {
        static "SET",
        masking_policies: "list,no_parentheses,required",
        force: "keyword" => "FORCE",
    }
}

impl Validate for TagSetMaskingPolicies {
    fn validate(&self, v: &mut Validator) {
        v.each(&self.masking_policies);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagUnsetMaskingPolicies {
    pub masking_policies: Vec<TagMaskingPolicy>,
}

option_structure! {
    TagUnsetMaskingPolicies {
        static "UNSET",
        masking_policies: "list,no_parentheses,required",
    }
}

impl Validate for TagUnsetMaskingPolicies {
    fn validate(&self, v: &mut Validator) {
        v.each(&self.masking_policies);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlterTagOptions {
    pub if_exists: Option<bool>,
    pub name: SchemaObjectIdentifier,
    pub rename_to: Option<SchemaObjectIdentifier>,
    pub add_allowed_values: Vec<String>,
    pub drop_allowed_values: Vec<String>,
    pub unset_allowed_values: Option<bool>,
    pub set_masking_policies: Option<TagSetMaskingPolicies>,
    pub unset_masking_policies: Option<TagUnsetMaskingPolicies>,
    pub set_comment: Option<String>,
    pub unset_comment: Option<bool>,
}

option_structure! {
    AlterTagOptions {
        static "ALTER",
        static "TAG",
        if_exists: "keyword" => "IF EXISTS",
        name: "identifier",
        rename_to: "identifier" => "RENAME TO",
        add_allowed_values: "list,no_parentheses,single_quotes" => "ADD ALLOWED_VALUES",
        drop_allowed_values: "list,no_parentheses,single_quotes" => "DROP ALLOWED_VALUES",
        unset_allowed_values: "keyword" => "UNSET ALLOWED_VALUES",
        set_masking_policies: "keyword",
        unset_masking_policies: "keyword",
        set_comment: "parameter,single_quotes" => "SET COMMENT",
        unset_comment: "keyword" => "UNSET COMMENT",
    }
}

impl Validate for AlterTagOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name)
            .exactly_one_of(&fields!(
                self;
                rename_to,
                add_allowed_values,
                drop_allowed_values,
                unset_allowed_values,
                set_masking_policies,
                unset_masking_policies,
                set_comment,
                unset_comment
            ))
            .true_if_set(&[
                ("unset_allowed_values", self.unset_allowed_values),
                ("unset_comment", self.unset_comment),
            ])
            .valid_identifier_if_set("rename_to", self.rename_to.as_ref())
            .nested(self.set_masking_policies.as_ref())
            .nested(self.unset_masking_policies.as_ref());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropTagOptions {
    pub if_exists: Option<bool>,
    pub name: SchemaObjectIdentifier,
}

option_structure! {
    DropTagOptions {
        static "DROP",
        static "TAG",
        if_exists: "keyword" => "IF EXISTS",
        name: "identifier",
    }
}

impl Validate for DropTagOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UndropTagOptions {
    pub name: SchemaObjectIdentifier,
}

option_structure! {
    UndropTagOptions {
        static "UNDROP",
        static "TAG",
        name: "identifier",
    }
}

impl Validate for UndropTagOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowTagsOptions {
    pub like: Option<Like>,
    pub in_: Option<In>,
}

option_structure! {
    ShowTagsOptions {
        static "SHOW",
        static "TAGS",
        like: "keyword",
        in_: "keyword",
    }
}

impl Validate for ShowTagsOptions {
    fn validate(&self, v: &mut Validator) {
        v.nested(self.in_.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::prepare;
    use crate::identifier::DatabaseObjectIdentifier;
    use crate::validation::RuleKind;
    use pretty_assertions::assert_eq;

    fn tag(name: &str) -> SchemaObjectIdentifier {
        SchemaObjectIdentifier::new("GOV", "TAGS", name)
    }

    fn policy(name: &str) -> TagMaskingPolicy {
        TagMaskingPolicy {
            name: SchemaObjectIdentifier::new("GOV", "POLICIES", name),
        }
    }

    #[test]
    fn test_create_allowed_values() {
        let opts = CreateTagOptions {
            if_not_exists: Some(true),
            name: tag("TIER"),
            allowed_values: vec!["gold".to_string(), "silver".to_string()],
            comment: Some("service tier".to_string()),
            ..Default::default()
        };
        assert_eq!(
            prepare(&opts).unwrap(),
            r#"CREATE TAG IF NOT EXISTS "GOV"."TAGS"."TIER" ALLOWED_VALUES 'gold', 'silver' COMMENT = 'service tier'"#
        );
    }

    #[test]
    fn test_create_too_many_allowed_values() {
        let opts = CreateTagOptions {
            name: tag("T"),
            allowed_values: (0..301).map(|i| i.to_string()).collect(),
            ..Default::default()
        };
        let err = prepare(&opts).unwrap_err();
        assert_eq!(
            err.violations().unwrap().first().unwrap().kind,
            RuleKind::IntBetween { min: 0, max: 300 }
        );
    }

    #[test]
    fn test_alter_add_allowed_values() {
        let opts = AlterTagOptions {
            name: tag("TIER"),
            add_allowed_values: vec!["bronze".to_string()],
            ..Default::default()
        };
        assert_eq!(
            prepare(&opts).unwrap(),
            r#"ALTER TAG "GOV"."TAGS"."TIER" ADD ALLOWED_VALUES 'bronze'"#
        );
    }

    #[test]
    fn test_alter_set_masking_policies() {
        let opts = AlterTagOptions {
            name: tag("PII"),
            set_masking_policies: Some(TagSetMaskingPolicies {
                masking_policies: vec![policy("MASK_STRING"), policy("MASK_NUMBER")],
                force: Some(true),
            }),
            ..Default::default()
        };
        assert_eq!(
            prepare(&opts).unwrap(),
            concat!(
                r#"ALTER TAG "GOV"."TAGS"."PII" SET "#,
                r#"MASKING POLICY "GOV"."POLICIES"."MASK_STRING", "#,
                r#"MASKING POLICY "GOV"."POLICIES"."MASK_NUMBER" FORCE"#
            )
        );
    }

    #[test]
    fn test_alter_empty_masking_policies_is_required() {
        let opts = AlterTagOptions {
            name: tag("PII"),
            unset_masking_policies: Some(TagUnsetMaskingPolicies::default()),
            ..Default::default()
        };
        let err = prepare(&opts).unwrap_err();
        let v = err.violations().unwrap().first().unwrap();
        assert_eq!(
            (v.structure, v.kind, v.fields.clone()),
            ("TagUnsetMaskingPolicies", RuleKind::NotSet, vec!["masking_policies"])
        );
    }

    #[test]
    fn test_alter_rejects_no_action() {
        let opts = AlterTagOptions {
            name: tag("PII"),
            ..Default::default()
        };
        let err = prepare(&opts).unwrap_err();
        assert_eq!(
            err.violations().unwrap().first().unwrap().kind,
            RuleKind::ExactlyOneOf
        );
    }

    #[test]
    fn test_alter_unset_flags_must_be_true() {
        let opts = AlterTagOptions {
            name: tag("PII"),
            unset_allowed_values: Some(false),
            ..Default::default()
        };
        let err = prepare(&opts).unwrap_err();
        let v = err.violations().unwrap().first().unwrap();
        assert_eq!((v.kind, v.fields.clone()), (RuleKind::FalseFlag, vec!["unset_allowed_values"]));

        let show = ShowTagsOptions {
            in_: Some(In {
                account: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = prepare(&show).unwrap_err();
        let v = err.violations().unwrap().first().unwrap();
        assert_eq!((v.structure, v.kind), ("In", RuleKind::FalseFlag));
    }

    #[test]
    fn test_drop_undrop_show() {
        let drop = DropTagOptions {
            if_exists: Some(true),
            name: tag("OLD"),
        };
        assert_eq!(prepare(&drop).unwrap(), r#"DROP TAG IF EXISTS "GOV"."TAGS"."OLD""#);

        let undrop = UndropTagOptions { name: tag("OLD") };
        assert_eq!(prepare(&undrop).unwrap(), r#"UNDROP TAG "GOV"."TAGS"."OLD""#);

        let show = ShowTagsOptions {
            like: Some(Like::new("T%")),
            in_: Some(In {
                schema: Some(DatabaseObjectIdentifier::new("GOV", "TAGS")),
                ..Default::default()
            }),
        };
        assert_eq!(prepare(&show).unwrap(), r#"SHOW TAGS LIKE 'T%' IN SCHEMA "GOV"."TAGS""#);
    }
}

//! Warehouses.

use serde::{Deserialize, Serialize};

use super::common::{Like, TagAssociation};
use crate::identifier::{AccountObjectIdentifier, SchemaObjectIdentifier};
use crate::validation::{Validate, Validator};
use crate::{fields, keyword_enum, option_structure};

keyword_enum! {
    pub enum WarehouseType {
        Standard => "STANDARD",
        SnowparkOptimized => "SNOWPARK-OPTIMIZED",
    }
}

keyword_enum! {
    pub enum WarehouseSize {
        XSmall => "XSMALL",
        Small => "SMALL",
        Medium => "MEDIUM",
        Large => "LARGE",
        XLarge => "XLARGE",
        XXLarge => "XXLARGE",
        XXXLarge => "XXXLARGE",
        X4Large => "X4LARGE",
        X5Large => "X5LARGE",
        X6Large => "X6LARGE",
    }
}

keyword_enum! {
    pub enum ScalingPolicy {
        Standard => "STANDARD",
        Economy => "ECONOMY",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateWarehouseOptions {
    pub or_replace: Option<bool>,
    pub if_not_exists: Option<bool>,
    pub name: AccountObjectIdentifier,
    pub warehouse_type: Option<WarehouseType>,
    pub warehouse_size: Option<WarehouseSize>,
    pub max_cluster_count: Option<u8>,
    pub min_cluster_count: Option<u8>,
    pub scaling_policy: Option<ScalingPolicy>,
    pub auto_suspend: Option<u32>,
    pub auto_resume: Option<bool>,
    pub initially_suspended: Option<bool>,
    pub resource_monitor: Option<AccountObjectIdentifier>,
    pub comment: Option<String>,
    pub enable_query_acceleration: Option<bool>,
    pub query_acceleration_max_scale_factor: Option<u8>,
    pub tag: Vec<TagAssociation>,
}

option_structure! {
    CreateWarehouseOptions {
        static "CREATE",
        or_replace: "keyword" => "OR REPLACE",
        static "WAREHOUSE",
        if_not_exists: "keyword" => "IF NOT EXISTS",
        name: "identifier",
        warehouse_type: "parameter,single_quotes" => "WAREHOUSE_TYPE",
        warehouse_size: "parameter" => "WAREHOUSE_SIZE",
        max_cluster_count: "parameter" => "MAX_CLUSTER_COUNT",
        min_cluster_count: "parameter" => "MIN_CLUSTER_COUNT",
        scaling_policy: "parameter" => "SCALING_POLICY",
        auto_suspend: "parameter" => "AUTO_SUSPEND",
        auto_resume: "parameter" => "AUTO_RESUME",
        initially_suspended: "parameter" => "INITIALLY_SUSPENDED",
        resource_monitor: "parameter" => "RESOURCE_MONITOR",
        comment: "parameter,single_quotes" => "COMMENT",
        enable_query_acceleration: "parameter" => "ENABLE_QUERY_ACCELERATION",
        query_acceleration_max_scale_factor: "parameter" => "QUERY_ACCELERATION_MAX_SCALE_FACTOR",
        tag: "keyword,parentheses" => "TAG",
    }
}

impl Validate for CreateWarehouseOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name)
            .valid_identifier_if_set("resource_monitor", self.resource_monitor.as_ref())
            .one_of(&fields!(self; or_replace, if_not_exists))
            .int_between("max_cluster_count", self.max_cluster_count, 1, 10)
            .int_between("min_cluster_count", self.min_cluster_count, 1, 10)
            .int_between(
                "query_acceleration_max_scale_factor",
                self.query_acceleration_max_scale_factor,
                0,
                100,
            )
            .each(&self.tag);
        if let (Some(min), Some(max)) = (self.min_cluster_count, self.max_cluster_count) {
            if min > max {
                v.int_between("min_cluster_count", Some(min), 1, max.into());
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlterWarehouseOptions {
    pub if_exists: Option<bool>,
    pub name: AccountObjectIdentifier,
    pub suspend: Option<bool>,
    pub resume: Option<bool>,
    pub if_suspended: Option<bool>,
    pub abort_all_queries: Option<bool>,
    pub new_name: Option<AccountObjectIdentifier>,
    pub set: Option<WarehouseSet>,
    pub unset: Option<WarehouseUnset>,
    pub set_tag: Vec<TagAssociation>,
    pub unset_tag: Vec<SchemaObjectIdentifier>,
}

option_structure! {
    AlterWarehouseOptions {
        static "ALTER",
        static "WAREHOUSE",
        if_exists: "keyword" => "IF EXISTS",
        name: "identifier",
        suspend: "keyword" => "SUSPEND",
        resume: "keyword" => "RESUME",
        if_suspended: "keyword" => "IF SUSPENDED",
        abort_all_queries: "keyword" => "ABORT ALL QUERIES",
        new_name: "identifier" => "RENAME TO",
        set: "list,no_parentheses,no_comma" => "SET",
        unset: "list,no_parentheses" => "UNSET",
        set_tag: "keyword" => "SET TAG",
        unset_tag: "keyword" => "UNSET TAG",
    }
}

impl Validate for AlterWarehouseOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name)
            .exactly_one_of(&fields!(
                self;
                suspend,
                resume,
                abort_all_queries,
                new_name,
                set,
                unset,
                set_tag,
                unset_tag
            ))
            .true_if_set(&[
                ("suspend", self.suspend),
                ("resume", self.resume),
                ("abort_all_queries", self.abort_all_queries),
            ])
            .required_if_set(
                ("resume", &self.resume),
                ("if_suspended", &self.if_suspended),
            )
            .valid_identifier_if_set("new_name", self.new_name.as_ref())
            .nested(self.set.as_ref())
            .nested(self.unset.as_ref())
            .each(&self.set_tag);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseSet {
    pub warehouse_type: Option<WarehouseType>,
    pub warehouse_size: Option<WarehouseSize>,
    pub wait_for_completion: Option<bool>,
    pub max_cluster_count: Option<u8>,
    pub min_cluster_count: Option<u8>,
    pub scaling_policy: Option<ScalingPolicy>,
    pub auto_suspend: Option<u32>,
    pub auto_resume: Option<bool>,
    pub resource_monitor: Option<AccountObjectIdentifier>,
    pub comment: Option<String>,
    pub enable_query_acceleration: Option<bool>,
    pub query_acceleration_max_scale_factor: Option<u8>,
}

option_structure! {
    WarehouseSet {
        warehouse_type: "parameter,single_quotes" => "WAREHOUSE_TYPE",
        warehouse_size: "parameter" => "WAREHOUSE_SIZE",
        wait_for_completion: "parameter" => "WAIT_FOR_COMPLETION",
        max_cluster_count: "parameter" => "MAX_CLUSTER_COUNT",
        min_cluster_count: "parameter" => "MIN_CLUSTER_COUNT",
        scaling_policy: "parameter" => "SCALING_POLICY",
        auto_suspend: "parameter" => "AUTO_SUSPEND",
        auto_resume: "parameter" => "AUTO_RESUME",
        resource_monitor: "parameter" => "RESOURCE_MONITOR",
        comment: "parameter,single_quotes" => "COMMENT",
        enable_query_acceleration: "parameter" => "ENABLE_QUERY_ACCELERATION",
        query_acceleration_max_scale_factor: "parameter" => "QUERY_ACCELERATION_MAX_SCALE_FACTOR",
    }
}

impl Validate for WarehouseSet {
    fn validate(&self, v: &mut Validator) {
        v.at_least_one_of(&fields!(
            self;
            warehouse_type,
            warehouse_size,
            max_cluster_count,
            min_cluster_count,
            scaling_policy,
            auto_suspend,
            auto_resume,
            resource_monitor,
            comment,
            enable_query_acceleration,
            query_acceleration_max_scale_factor
        ))
        .required_if_set(
            ("warehouse_size", &self.warehouse_size),
            ("wait_for_completion", &self.wait_for_completion),
        )
        .int_between("max_cluster_count", self.max_cluster_count, 1, 10)
        .int_between("min_cluster_count", self.min_cluster_count, 1, 10)
        .int_between(
            "query_acceleration_max_scale_factor",
            self.query_acceleration_max_scale_factor,
            0,
            100,
        )
        .valid_identifier_if_set("resource_monitor", self.resource_monitor.as_ref());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseUnset {
    pub warehouse_type: Option<bool>,
    pub max_cluster_count: Option<bool>,
    pub min_cluster_count: Option<bool>,
    pub scaling_policy: Option<bool>,
    pub auto_suspend: Option<bool>,
    pub auto_resume: Option<bool>,
    pub resource_monitor: Option<bool>,
    pub comment: Option<bool>,
    pub enable_query_acceleration: Option<bool>,
    pub query_acceleration_max_scale_factor: Option<bool>,
}

option_structure! {
    WarehouseUnset {
        warehouse_type: "keyword" => "WAREHOUSE_TYPE",
        max_cluster_count: "keyword" => "MAX_CLUSTER_COUNT",
        min_cluster_count: "keyword" => "MIN_CLUSTER_COUNT",
        scaling_policy: "keyword" => "SCALING_POLICY",
        auto_suspend: "keyword" => "AUTO_SUSPEND",
        auto_resume: "keyword" => "AUTO_RESUME",
        resource_monitor: "keyword" => "RESOURCE_MONITOR",
        comment: "keyword" => "COMMENT",
        enable_query_acceleration: "keyword" => "ENABLE_QUERY_ACCELERATION",
        query_acceleration_max_scale_factor: "keyword" => "QUERY_ACCELERATION_MAX_SCALE_FACTOR",
    }
}

impl Validate for WarehouseUnset {
    fn validate(&self, v: &mut Validator) {
        v.at_least_one_of(&fields!(
            self;
            warehouse_type,
            max_cluster_count,
            min_cluster_count,
            scaling_policy,
            auto_suspend,
            auto_resume,
            resource_monitor,
            comment,
            enable_query_acceleration,
            query_acceleration_max_scale_factor
        ))
        .true_if_set(&[
            ("warehouse_type", self.warehouse_type),
            ("max_cluster_count", self.max_cluster_count),
            ("min_cluster_count", self.min_cluster_count),
            ("scaling_policy", self.scaling_policy),
            ("auto_suspend", self.auto_suspend),
            ("auto_resume", self.auto_resume),
            ("resource_monitor", self.resource_monitor),
            ("comment", self.comment),
            ("enable_query_acceleration", self.enable_query_acceleration),
            ("query_acceleration_max_scale_factor", self.query_acceleration_max_scale_factor),
        ]);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropWarehouseOptions {
    pub if_exists: Option<bool>,
    pub name: AccountObjectIdentifier,
}

option_structure! {
    DropWarehouseOptions {
        static "DROP",
        static "WAREHOUSE",
        if_exists: "keyword" => "IF EXISTS",
        name: "identifier",
    }
}

impl Validate for DropWarehouseOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowWarehousesOptions {
    pub like: Option<Like>,
}

option_structure! {
    ShowWarehousesOptions {
        static "SHOW",
        static "WAREHOUSES",
        like: "keyword",
    }
}

impl Validate for ShowWarehousesOptions {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeWarehouseOptions {
    pub name: AccountObjectIdentifier,
}

option_structure! {
    DescribeWarehouseOptions {
        static "DESCRIBE",
        static "WAREHOUSE",
        name: "identifier",
    }
}

impl Validate for DescribeWarehouseOptions {
    fn validate(&self, v: &mut Validator) {
        v.valid_identifier("name", &self.name);
    }
}

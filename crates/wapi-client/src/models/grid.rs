//! Grid administration objects (read-only) and the multi-object request

use super::{wapi_object, ObjectBase, WapiObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile of the authenticated user (`userprofile`)
///
/// Fetched once when a connector is built to check reachability and
/// credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub admin_group: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(UserProfile, "userprofile", ["name"]);

/// Upgrade state of a single grid member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubelementStatus {
    #[serde(default)]
    pub ipv4_address: String,
    #[serde(default)]
    pub status_value: String,
    #[serde(default)]
    pub current_version: String,
    #[serde(default)]
    pub upgrade_group: String,
    #[serde(default)]
    pub element_status: String,
    #[serde(default)]
    pub step_status: String,
    #[serde(default)]
    pub status_value_update_time: Option<i64>,
}

/// Grid upgrade status (`upgradestatus`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpgradeStatus {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub status_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subelements_status: Vec<SubelementStatus>,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(UpgradeStatus, "upgradestatus", ["subelements_status", "type"]);

/// Virtual IP settings of a member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VipSetting {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gateway: String,
    #[serde(default)]
    pub subnet_mask: String,
}

/// Service running on a member node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub status: String,
}

/// Hardware and service details of a member node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    #[serde(default)]
    pub ha_status: String,
    #[serde(default)]
    pub hwid: String,
    #[serde(default)]
    pub hwmodel: String,
    #[serde(default)]
    pub hwplatform: String,
    #[serde(default)]
    pub hwtype: String,
    #[serde(default)]
    pub paid_nios: bool,
    #[serde(default)]
    pub physical_oid: String,
    #[serde(default)]
    pub service_status: Vec<ServiceStatus>,
}

/// Grid member (`member`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub config_addr_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub platform: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_type_configuration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vip_setting: Option<VipSetting>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_info: Vec<NodeInfo>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub time_zone: String,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(
    Member,
    "member",
    [
        "config_addr_type",
        "host_name",
        "platform",
        "service_type_configuration",
        "vip_setting",
        "node_info",
        "time_zone",
    ]
);

/// Object count by type in a capacity report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectCount {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub type_name: String,
}

/// Member capacity report (`capacityreport`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityReport {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hardware_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object_counts: Vec<ObjectCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_used: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_objects: Option<u64>,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(
    CapacityReport,
    "capacityreport",
    [
        "name",
        "hardware_type",
        "max_capacity",
        "object_counts",
        "percent_used",
        "role",
        "total_objects",
    ]
);

/// Whether a license applies to a single member or to the whole grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LicenseScope {
    #[default]
    Member,
    Grid,
}

/// Member license (`member:license`) or grid license (`grid:license`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub expiration_status: String,
    /// Seconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub limit: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub limit_context: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub license_type: String,
    #[serde(skip)]
    pub scope: LicenseScope,
    #[serde(skip)]
    pub base: ObjectBase,
}

const LICENSE_RETURN_FIELDS: &[&str] = &[
    "expiration_status",
    "expiry_date",
    "key",
    "limit",
    "limit_context",
    "type",
];

impl License {
    /// Template for querying licenses of the given scope
    pub fn template(scope: LicenseScope) -> Self {
        Self {
            scope,
            ..Default::default()
        }
    }

    /// Expiry as a timestamp, when the grid reported one
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiry_date
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }
}

impl WapiObject for License {
    fn object_type(&self) -> &str {
        match self.scope {
            LicenseScope::Member => "member:license",
            LicenseScope::Grid => "grid:license",
        }
    }

    fn default_return_fields(&self) -> &'static [&'static str] {
        LICENSE_RETURN_FIELDS
    }

    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// NTP server entry of the grid NTP settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NtpServer {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub burst: bool,
    #[serde(default)]
    pub enable_authentication: bool,
    #[serde(default)]
    pub iburst: bool,
    #[serde(default)]
    pub preferred: bool,
}

/// Grid NTP settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NtpSetting {
    #[serde(default)]
    pub enable_ntp: bool,
    #[serde(default)]
    pub ntp_kod: bool,
    #[serde(default)]
    pub ntp_servers: Vec<NtpServer>,
}

/// Grid-wide settings (`grid`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntp_setting: Option<NtpSetting>,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(Grid, "grid", ["name", "ntp_setting"]);

fn is_false(value: &bool) -> bool {
    !*value
}

/// One operation inside a multi-object request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub method: String,
    pub object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub enable_substitution: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assign_state: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub discard: bool,
}

/// Multi-object request (`request`), sent as a JSON array of operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiRequest {
    pub body: Vec<RequestBody>,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(MultiRequest, "request", []);

impl MultiRequest {
    pub fn new(body: Vec<RequestBody>) -> Self {
        Self {
            body,
            base: ObjectBase::default(),
        }
    }
}

//! DNS objects: host, A, PTR, CNAME and TXT records, authoritative and
//! delegated zones

use super::{wapi_object, Ea, ObjectBase};
use serde::{Deserialize, Serialize};

fn is_zero(value: &u32) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Address entry of a host record (`record:host_ipv4addr`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostRecordIpv4Addr {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(rename = "ipv4addr", default, skip_serializing_if = "String::is_empty")]
    pub ipv4_addr: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mac: String,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(HostRecordIpv4Addr, "record:host_ipv4addr", ["ipv4addr", "mac"]);

/// Host record (`record:host`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostRecord {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(rename = "configure_for_dns", default, skip_serializing_if = "Option::is_none")]
    pub enable_dns: Option<bool>,
    #[serde(rename = "ipv4addrs", default, skip_serializing_if = "Vec::is_empty")]
    pub ipv4_addrs: Vec<HostRecordIpv4Addr>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network_view: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub view: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
    #[serde(rename = "extattrs", default, skip_serializing_if = "Ea::is_empty")]
    pub ea: Ea,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(HostRecord, "record:host", ["extattrs", "ipv4addrs", "name", "view", "zone"]);

/// A record (`record:a`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordA {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(rename = "ipv4addr", default, skip_serializing_if = "String::is_empty")]
    pub ipv4_addr: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub view: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
    #[serde(rename = "extattrs", default, skip_serializing_if = "Ea::is_empty")]
    pub ea: Ea,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(RecordA, "record:a", ["extattrs", "ipv4addr", "name", "view", "zone"]);

/// PTR record (`record:ptr`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPtr {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(rename = "ipv4addr", default, skip_serializing_if = "String::is_empty")]
    pub ipv4_addr: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "ptrdname", default, skip_serializing_if = "String::is_empty")]
    pub ptrd_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub view: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
    #[serde(rename = "extattrs", default, skip_serializing_if = "Ea::is_empty")]
    pub ea: Ea,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(RecordPtr, "record:ptr", ["extattrs", "ipv4addr", "ptrdname", "view", "zone"]);

/// CNAME record (`record:cname`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordCname {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub canonical: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub view: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
    #[serde(rename = "extattrs", default, skip_serializing_if = "Ea::is_empty")]
    pub ea: Ea,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(RecordCname, "record:cname", ["canonical", "extattrs", "name", "view", "zone"]);

/// TXT record (`record:txt`)
///
/// A `ttl` of 0 inherits the zone TTL; `use_ttl` is only sent when a TTL is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordTxt {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub use_ttl: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub view: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
    #[serde(rename = "extattrs", default, skip_serializing_if = "Ea::is_empty")]
    pub ea: Ea,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(
    RecordTxt,
    "record:txt",
    ["extattrs", "name", "text", "view", "zone", "ttl", "use_ttl"]
);

/// Authoritative zone (`zone_auth`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneAuth {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fqdn: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub view: String,
    #[serde(rename = "extattrs", default, skip_serializing_if = "Ea::is_empty")]
    pub ea: Ea,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(ZoneAuth, "zone_auth", ["extattrs", "fqdn", "view"]);

/// Name server a zone is delegated to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameServer {
    pub address: String,
    pub name: String,
}

/// Delegated zone (`zone_delegated`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneDelegated {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fqdn: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delegate_to: Vec<NameServer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub view: String,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(ZoneDelegated, "zone_delegated", ["delegate_to", "fqdn", "locked", "view"]);

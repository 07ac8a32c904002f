//! IPAM objects: network views, networks, containers, fixed addresses and
//! extensible attribute definitions

use super::{wapi_object, Ea, ObjectBase};
use serde::{Deserialize, Serialize};

/// Network view (`networkview`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkView {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "extattrs", default, skip_serializing_if = "Ea::is_empty")]
    pub ea: Ea,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(NetworkView, "networkview", ["extattrs", "name"]);

/// IPv4 network (`network`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(rename = "network_view", default, skip_serializing_if = "String::is_empty")]
    pub netview_name: String,
    #[serde(rename = "network", default, skip_serializing_if = "String::is_empty")]
    pub cidr: String,
    #[serde(rename = "extattrs", default, skip_serializing_if = "Ea::is_empty")]
    pub ea: Ea,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(Network, "network", ["extattrs", "network", "network_view"]);

/// Network container (`networkcontainer`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkContainer {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(rename = "network_view", default, skip_serializing_if = "String::is_empty")]
    pub netview_name: String,
    #[serde(rename = "network", default, skip_serializing_if = "String::is_empty")]
    pub cidr: String,
    #[serde(rename = "extattrs", default, skip_serializing_if = "Ea::is_empty")]
    pub ea: Ea,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(NetworkContainer, "networkcontainer", ["extattrs", "network", "network_view"]);

/// DHCP fixed address (`fixedaddress`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedAddress {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(rename = "network_view", default, skip_serializing_if = "String::is_empty")]
    pub netview_name: String,
    #[serde(rename = "network", default, skip_serializing_if = "String::is_empty")]
    pub cidr: String,
    #[serde(rename = "ipv4addr", default, skip_serializing_if = "String::is_empty")]
    pub ip_address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mac: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub match_client: String,
    #[serde(rename = "extattrs", default, skip_serializing_if = "Ea::is_empty")]
    pub ea: Ea,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(
    FixedAddress,
    "fixedaddress",
    ["extattrs", "ipv4addr", "mac", "name", "network", "network_view"]
);

/// Allowed values of `match_client` on a fixed address
pub const MATCH_CLIENT_VALUES: [&str; 5] =
    ["MAC_ADDRESS", "CLIENT_ID", "RESERVED", "CIRCUIT_ID", "REMOTE_ID"];

/// One entry of an enumerated EA definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EaListValue {
    pub value: String,
}

/// Extensible attribute definition (`extensibleattributedef`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EaDefinition {
    #[serde(rename = "_ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flags: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list_values: Vec<EaListValue>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub ea_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_object_types: Vec<String>,
    #[serde(skip)]
    pub base: ObjectBase,
}

wapi_object!(
    EaDefinition,
    "extensibleattributedef",
    ["allowed_object_types", "comment", "flags", "list_values", "name", "type"]
);

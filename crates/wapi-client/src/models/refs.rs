//! Helpers that recover object fields from WAPI references
//!
//! A reference looks like `<type>/<id>:<readable part>`, where the readable
//! part depends on the resource type:
//! - `networkview/ZG5zLm5ldHdvcmtfdmlldyQyMw:global_view/false`
//! - `network/ZG5zLm5ldHdvcmskODkuMC4wLjAvMjQvMjU:89.0.0.0/24/global_view`
//! - `fixedaddress/ZG5zLmJpbmRfY25h:12.0.10.1/external`

use super::{Network, NetworkView};
use regex::Regex;
use std::sync::LazyLock;

// ASCII classes: regex's `\w` and `\d` also match non-ASCII letters and digits
static NETWORK_VIEW_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"networkview/[0-9A-Za-z_]+:([^/]+)/[0-9A-Za-z_]+").expect("NETWORK_VIEW_REF should compile")
});

static NETWORK_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"network/[0-9A-Za-z_]+:([0-9]+\.[0-9]+\.[0-9]+\.[0-9]+/[0-9]+)/(.+)")
        .expect("NETWORK_REF should compile")
});

static FIXED_ADDRESS_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"fixedaddress/[0-9A-Za-z_]+:([0-9]+\.[0-9]+\.[0-9]+\.[0-9]+)/.+")
        .expect("FIXED_ADDRESS_REF should compile")
});

/// Build a network view from its reference
pub fn network_view_from_ref(reference: &str) -> Option<NetworkView> {
    let caps = NETWORK_VIEW_REF.captures(reference)?;
    Some(NetworkView {
        reference: reference.to_string(),
        name: caps[1].to_string(),
        ..Default::default()
    })
}

/// Build a network from its reference
pub fn network_from_ref(reference: &str) -> Option<Network> {
    let caps = NETWORK_REF.captures(reference)?;
    Some(Network {
        reference: reference.to_string(),
        netview_name: caps[2].to_string(),
        cidr: caps[1].to_string(),
        ..Default::default()
    })
}

/// Extract the IPv4 address from a fixed address reference
///
/// Returns an empty string when the reference does not have the expected form.
pub fn ip_address_from_ref(reference: &str) -> String {
    FIXED_ADDRESS_REF
        .captures(reference)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_network_view_reference() {
        let nv = network_view_from_ref("networkview/ZG5zLm5ldHdvcmtfdmlldyQyMw:global_view/false")
            .unwrap();
        assert_eq!(nv.name, "global_view");
        assert_eq!(nv.reference, "networkview/ZG5zLm5ldHdvcmtfdmlldyQyMw:global_view/false");
    }

    #[test]
    fn parses_network_reference() {
        let nw = network_from_ref("network/ZG5zLm5ldHdvcmskODkuMC4wLjAvMjQvMjU:89.0.0.0/24/global_view")
            .unwrap();
        assert_eq!(nw.cidr, "89.0.0.0/24");
        assert_eq!(nw.netview_name, "global_view");
    }

    #[test]
    fn rejects_foreign_references() {
        assert!(network_from_ref("networkview/ZG5z:global_view/false").is_none());
        assert!(network_from_ref("network/ZG5z:not-an-ip/24/default").is_none());
        assert!(network_view_from_ref("network/ZG5z:89.0.0.0/24/default").is_none());
        assert_eq!(ip_address_from_ref("record:a/ZG5z:a.example.com/default"), "");
    }

    #[test]
    fn extracts_fixed_address_ip() {
        assert_eq!(
            ip_address_from_ref("fixedaddress/ZG5zLmJpbmRfY25h:12.0.10.1/external"),
            "12.0.10.1"
        );
    }

    #[test]
    fn follows_the_ascii_reference_grammar() {
        // Dotted quads are taken as written
        assert_eq!(ip_address_from_ref("fixedaddress/ZG5z:012.0.10.1/external"), "012.0.10.1");
        assert_eq!(
            network_from_ref("network/ZG5z:010.0.0.0/24/default").unwrap().cidr,
            "010.0.0.0/24"
        );

        // The id part is ASCII word characters only
        assert!(network_view_from_ref("networkview/ZG5zé:lab/false").is_none());
        assert_eq!(ip_address_from_ref("fixedaddress/ZG5z-1:12.0.10.1/external"), "");
    }

    #[test]
    fn readable_part_may_hold_reserved_characters() {
        let nv = network_view_from_ref("networkview/ZG5z:lab#1 (east)/false").unwrap();
        assert_eq!(nv.name, "lab#1 (east)");

        let nw = network_from_ref("network/ZG5z:10.0.0.0/24/view/with/slashes").unwrap();
        assert_eq!(nw.netview_name, "view/with/slashes");
    }
}

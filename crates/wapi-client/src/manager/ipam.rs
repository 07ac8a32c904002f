//! IPAM operations

use super::{ip_or_next_available, vm_ea, ObjectManager, EA_NETWORK_NAME, ZERO_MAC};
use crate::error::WapiError;
use crate::models::{
    ip_address_from_ref, network_from_ref, Ea, EaDefinition, EaSearch, FixedAddress, Network,
    NetworkContainer, NetworkView, MATCH_CLIENT_VALUES,
};
use crate::wapi_trait::WapiConnector;
use tracing::debug;

impl<C: WapiConnector> ObjectManager<C> {
    /// Create a network view owned by the grid, not the cloud API
    pub async fn create_network_view(&self, name: &str) -> Result<NetworkView, WapiError> {
        let mut netview = NetworkView {
            name: name.to_string(),
            ea: self.basic_ea(false),
            ..Default::default()
        };
        netview.reference = self.connector.create_object(&netview).await?;
        Ok(netview)
    }

    /// Find a network view by name
    pub async fn get_network_view(&self, name: &str) -> Result<Option<NetworkView>, WapiError> {
        let template = NetworkView {
            name: name.to_string(),
            ..Default::default()
        };
        self.find_first(&template).await
    }

    /// Add and remove EAs on the network view at `reference`
    ///
    /// Keys of `remove_ea` are dropped whatever their value.
    pub async fn update_network_view_ea(&self, reference: &str, add_ea: Ea, remove_ea: Ea) -> Result<(), WapiError> {
        let template = NetworkView::default().with_return_fields(["extattrs"]);
        let current: NetworkView = self
            .find_by_ref(&template, reference)
            .await?
            .ok_or_else(|| WapiError::InvalidRequest(format!("network view '{reference}' not found")))?;

        let mut ea = current.ea;
        ea.extend(add_ea.iter().map(|(k, v)| (k.clone(), v.clone())));
        for key in remove_ea.keys() {
            ea.remove(key);
        }

        let update = NetworkView {
            ea,
            ..Default::default()
        };
        self.connector.update_object(&update, reference).await?;
        Ok(())
    }

    /// Fetch a network view by name, creating it when missing
    async fn ensure_network_view(&self, name: &str) -> Result<String, WapiError> {
        match self.get_network_view(name).await? {
            Some(netview) => Ok(netview.reference),
            None => Ok(self.create_network_view(name).await?.reference),
        }
    }

    /// Make sure both network views exist and return their references
    pub async fn create_default_network_views(
        &self,
        global_netview: &str,
        local_netview: &str,
    ) -> Result<(String, String), WapiError> {
        let global_ref = self.ensure_network_view(global_netview).await?;
        let local_ref = self.ensure_network_view(local_netview).await?;
        Ok((global_ref, local_ref))
    }

    /// Create a network, named through the `Network Name` EA when `name` is set
    pub async fn create_network(&self, netview: &str, cidr: &str, name: &str) -> Result<Network, WapiError> {
        let mut ea = self.basic_ea(true);
        if !name.is_empty() {
            ea.insert(EA_NETWORK_NAME.to_string(), name.into());
        }

        let mut network = Network {
            netview_name: netview.to_string(),
            cidr: cidr.to_string(),
            ea,
            ..Default::default()
        };
        network.reference = self.connector.create_object(&network).await?;
        Ok(network)
    }

    /// Find a network of a view, optionally by CIDR and by EAs
    pub async fn get_network(&self, netview: &str, cidr: &str, ea: Ea) -> Result<Option<Network>, WapiError> {
        let mut template = Network {
            netview_name: netview.to_string(),
            cidr: cidr.to_string(),
            ..Default::default()
        };
        if !ea.is_empty() {
            template = template.with_ea_search(EaSearch::from(ea));
        }
        self.find_first(&template).await
    }

    pub async fn get_network_by_ref(&self, reference: &str) -> Result<Option<Network>, WapiError> {
        self.find_by_ref(&Network::default(), reference).await
    }

    /// Carve the next free `/prefix_len` out of `cidr`
    ///
    /// Returns `None` when the grid created nothing.
    pub async fn allocate_network(
        &self,
        netview: &str,
        cidr: &str,
        prefix_len: u32,
        name: &str,
    ) -> Result<Option<Network>, WapiError> {
        let mut ea = self.basic_ea(true);
        if !name.is_empty() {
            ea.insert(EA_NETWORK_NAME.to_string(), name.into());
        }

        let request = Network {
            netview_name: netview.to_string(),
            cidr: format!("func:nextavailablenetwork:{cidr},{netview},{prefix_len}"),
            ea,
            ..Default::default()
        };
        let reference = self.connector.create_object(&request).await?;
        debug!("Allocated network {} in {}", reference, netview);
        Ok(network_from_ref(&reference))
    }

    /// Delete the network at `reference` if it belongs to `netview`
    ///
    /// Returns an empty reference when nothing was deleted.
    pub async fn delete_network(&self, reference: &str, netview: &str) -> Result<String, WapiError> {
        match network_from_ref(reference) {
            Some(network) if network.netview_name == netview => self.connector.delete_object(reference).await,
            _ => Ok(String::new()),
        }
    }

    pub async fn delete_network_view(&self, reference: &str) -> Result<String, WapiError> {
        self.connector.delete_object(reference).await
    }

    pub async fn create_network_container(&self, netview: &str, cidr: &str) -> Result<NetworkContainer, WapiError> {
        let mut container = NetworkContainer {
            netview_name: netview.to_string(),
            cidr: cidr.to_string(),
            ea: self.basic_ea(true),
            ..Default::default()
        };
        container.reference = self.connector.create_object(&container).await?;
        Ok(container)
    }

    pub async fn get_network_container(&self, netview: &str, cidr: &str) -> Result<Option<NetworkContainer>, WapiError> {
        let template = NetworkContainer {
            netview_name: netview.to_string(),
            cidr: cidr.to_string(),
            ..Default::default()
        };
        self.find_first(&template).await
    }

    /// Reserve an address in `cidr` as a fixed address
    ///
    /// An empty `ip_addr` takes the next free address and an empty `mac`
    /// reserves by the zero MAC. The returned address is read back from the
    /// new reference.
    ///
    /// # Arguments
    /// * `netview` - Network view of the network
    /// * `cidr` - Network to allocate from
    /// * `ip_addr` - Address to reserve, or empty for the next free one
    /// * `mac` - MAC address of the client, or empty
    /// * `name` - Name of the fixed address
    /// * `ea` - Extra EAs, on top of the cloud EAs
    pub async fn allocate_ip(
        &self,
        netview: &str,
        cidr: &str,
        ip_addr: &str,
        mac: &str,
        name: &str,
        ea: Ea,
    ) -> Result<FixedAddress, WapiError> {
        let mut fixed = FixedAddress {
            netview_name: netview.to_string(),
            cidr: cidr.to_string(),
            ip_address: ip_or_next_available(ip_addr, cidr, netview),
            mac: if mac.is_empty() { ZERO_MAC } else { mac }.to_string(),
            name: name.to_string(),
            ea: self.extend_ea(ea),
            ..Default::default()
        };

        fixed.reference = self.connector.create_object(&fixed).await?;
        fixed.ip_address = ip_address_from_ref(&fixed.reference);
        debug!("Allocated {} in {}", fixed.ip_address, cidr);
        Ok(fixed)
    }

    /// Find a fixed address, optionally narrowed by MAC
    pub async fn get_fixed_address(
        &self,
        netview: &str,
        cidr: &str,
        ip_addr: &str,
        mac: &str,
    ) -> Result<Option<FixedAddress>, WapiError> {
        let template = FixedAddress {
            netview_name: netview.to_string(),
            cidr: cidr.to_string(),
            ip_address: ip_addr.to_string(),
            mac: mac.to_string(),
            ..Default::default()
        };
        self.find_first(&template).await
    }

    pub async fn get_fixed_address_by_ref(&self, reference: &str) -> Result<Option<FixedAddress>, WapiError> {
        self.find_by_ref(&FixedAddress::default(), reference).await
    }

    /// Update MAC, match client and VM identity of a fixed address
    ///
    /// `match_client` must be empty or one of [`MATCH_CLIENT_VALUES`]; it is
    /// checked before anything is sent.
    pub async fn update_fixed_address(
        &self,
        reference: &str,
        match_client: &str,
        mac: &str,
        vm_id: &str,
        vm_name: &str,
    ) -> Result<FixedAddress, WapiError> {
        if !match_client.is_empty() && !MATCH_CLIENT_VALUES.contains(&match_client) {
            return Err(WapiError::InvalidRequest(format!(
                "wrong value for match_client passed {match_client}"
            )));
        }

        let mut update = FixedAddress {
            mac: mac.to_string(),
            match_client: match_client.to_string(),
            ea: vm_ea(self.basic_ea(true), vm_id, vm_name).unwrap_or_default(),
            ..Default::default()
        };
        update.reference = self.connector.update_object(&update, reference).await?;
        Ok(update)
    }

    pub async fn delete_fixed_address(&self, reference: &str) -> Result<String, WapiError> {
        self.connector.delete_object(reference).await
    }

    /// Delete the fixed address holding `ip_addr`, if there is one
    ///
    /// Returns an empty reference when no fixed address matched.
    pub async fn release_ip(&self, netview: &str, cidr: &str, ip_addr: &str, mac: &str) -> Result<String, WapiError> {
        match self.get_fixed_address(netview, cidr, ip_addr, mac).await? {
            Some(fixed) => self.connector.delete_object(&fixed.reference).await,
            None => Ok(String::new()),
        }
    }

    pub async fn get_ea_definition(&self, name: &str) -> Result<Option<EaDefinition>, WapiError> {
        let template = EaDefinition {
            name: name.to_string(),
            ..Default::default()
        };
        self.find_first(&template).await
    }

    pub async fn create_ea_definition(&self, definition: EaDefinition) -> Result<EaDefinition, WapiError> {
        let mut definition = definition;
        definition.reference = self.connector.create_object(&definition).await?;
        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockConnector, RecordedCall};
    use serde_json::json;

    fn manager(connector: &MockConnector) -> ObjectManager<MockConnector> {
        ObjectManager::new(connector.clone(), "OpenStack", "tenant-1")
    }

    fn created_body(call: &RecordedCall) -> &serde_json::Value {
        match call {
            RecordedCall::Create { body, .. } => body,
            other => panic!("expected a create, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_network_view_is_not_cloud_owned() {
        let conn = MockConnector::new().reply(json!("networkview/abc123:private-view/false"));
        let nv = manager(&conn).create_network_view("private-view").await.unwrap();

        assert_eq!(nv.reference, "networkview/abc123:private-view/false");
        let calls = conn.calls();
        assert_eq!(
            created_body(&calls[0]),
            &json!({
                "name": "private-view",
                "extattrs": {
                    "Cloud API Owned": {"value": "False"},
                    "CMP Type": {"value": "OpenStack"},
                    "Tenant ID": {"value": "tenant-1"}
                }
            })
        );
    }

    #[tokio::test]
    async fn default_network_views_are_created_only_when_missing() {
        let conn = MockConnector::new()
            .reply(json!([{"_ref": "networkview/ZG5z:global/true", "name": "global"}]))
            .reply(json!([]))
            .reply(json!("networkview/ZG5y:local/false"));

        let (global, local) = manager(&conn)
            .create_default_network_views("global", "local")
            .await
            .unwrap();

        assert_eq!(global, "networkview/ZG5z:global/true");
        assert_eq!(local, "networkview/ZG5y:local/false");
        let calls = conn.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(&calls[2], RecordedCall::Create { object_type, .. } if object_type == "networkview"));
    }

    #[tokio::test]
    async fn update_network_view_ea_adds_and_removes() {
        let reference = "networkview/ZG5z:private-view/false";
        let conn = MockConnector::new()
            .reply(json!({
                "_ref": reference,
                "extattrs": {"Keep": {"value": "yes"}, "Drop": {"value": "old"}}
            }))
            .reply(json!(reference));

        manager(&conn)
            .update_network_view_ea(reference, Ea::new().with("Add", "new"), Ea::new().with("Drop", ""))
            .await
            .unwrap();

        let calls = conn.calls();
        match &calls[0] {
            RecordedCall::Get { reference: r, return_fields, .. } => {
                assert_eq!(r, reference);
                assert_eq!(return_fields, &vec!["extattrs".to_string()]);
            }
            other => panic!("expected a get, got {other:?}"),
        }
        match &calls[1] {
            RecordedCall::Update { reference: r, body, .. } => {
                assert_eq!(r, reference);
                assert_eq!(body, &json!({"extattrs": {"Keep": {"value": "yes"}, "Add": {"value": "new"}}}));
            }
            other => panic!("expected an update, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_network_view_ea_requires_existing_view() {
        let conn = MockConnector::new();
        let err = manager(&conn)
            .update_network_view_ea("networkview/ZG5z:gone/false", Ea::new(), Ea::new())
            .await
            .unwrap_err();
        assert!(matches!(err, WapiError::InvalidRequest(_)));
        assert_eq!(conn.call_count(), 1);
    }

    #[tokio::test]
    async fn create_network_names_through_ea() {
        let conn = MockConnector::new().reply(json!("network/ZG5z:10.0.0.0/24/default"));
        let network = manager(&conn)
            .create_network("default", "10.0.0.0/24", "yellow-net")
            .await
            .unwrap();

        assert_eq!(network.reference, "network/ZG5z:10.0.0.0/24/default");
        assert_eq!(network.ea[EA_NETWORK_NAME], "yellow-net");
        assert_eq!(created_body(&conn.calls()[0])["network"], "10.0.0.0/24");
    }

    #[tokio::test]
    async fn get_network_filters_by_ea() {
        let conn = MockConnector::new().reply(json!([
            {"_ref": "network/ZG5z:10.0.0.0/24/default", "network": "10.0.0.0/24", "network_view": "default"}
        ]));
        let found = manager(&conn)
            .get_network("default", "", Ea::new().with("Network Name", "yellow-net"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.cidr, "10.0.0.0/24");
        match &conn.calls()[0] {
            RecordedCall::Get { body, ea_search, .. } => {
                assert_eq!(body, &json!({"network_view": "default"}));
                assert_eq!(ea_search, &json!({"*Network Name": "yellow-net"}));
            }
            other => panic!("expected a get, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn allocate_network_reads_network_from_reference() {
        let conn = MockConnector::new().reply(json!("network/ZG5z:10.0.4.0/28/default"));
        let network = manager(&conn)
            .allocate_network("default", "10.0.0.0/16", 28, "")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(network.cidr, "10.0.4.0/28");
        assert_eq!(network.netview_name, "default");
        assert_eq!(
            created_body(&conn.calls()[0])["network"],
            "func:nextavailablenetwork:10.0.0.0/16,default,28"
        );
    }

    #[tokio::test]
    async fn allocate_network_without_reference_is_none() {
        let conn = MockConnector::new();
        let network = manager(&conn)
            .allocate_network("default", "10.0.0.0/16", 28, "")
            .await
            .unwrap();
        assert!(network.is_none());
    }

    #[tokio::test]
    async fn delete_network_checks_view() {
        let reference = "network/ZG5z:10.0.0.0/24/default";
        let conn = MockConnector::new().reply(json!(reference));
        let mgr = manager(&conn);

        assert_eq!(mgr.delete_network(reference, "other").await.unwrap(), "");
        assert_eq!(conn.call_count(), 0);

        assert_eq!(mgr.delete_network(reference, "default").await.unwrap(), reference);
        assert_eq!(
            conn.calls(),
            vec![RecordedCall::Delete {
                reference: reference.to_string()
            }]
        );
    }

    #[tokio::test]
    async fn allocate_ip_uses_next_available_and_zero_mac() {
        let conn = MockConnector::new().reply(json!("fixedaddress/ZG5z:10.0.0.7/default"));
        let fixed = manager(&conn)
            .allocate_ip("default", "10.0.0.0/24", "", "", "vm-1", Ea::new().with("VM ID", "42"))
            .await
            .unwrap();

        assert_eq!(fixed.ip_address, "10.0.0.7");
        let calls = conn.calls();
        let body = created_body(&calls[0]);
        assert_eq!(body["ipv4addr"], "func:nextavailableip:10.0.0.0/24,default");
        assert_eq!(body["mac"], ZERO_MAC);
        assert_eq!(body["extattrs"]["VM ID"]["value"], "42");
        assert_eq!(body["extattrs"]["Cloud API Owned"]["value"], "True");
    }

    #[tokio::test]
    async fn update_fixed_address_rejects_unknown_match_client() {
        let conn = MockConnector::new();
        let err = manager(&conn)
            .update_fixed_address("fixedaddress/ZG5z:10.0.0.7/default", "HOSTNAME", "", "", "")
            .await
            .unwrap_err();

        assert!(matches!(err, WapiError::InvalidRequest(_)));
        assert_eq!(conn.call_count(), 0);
    }

    #[tokio::test]
    async fn update_fixed_address_sends_only_given_fields() {
        let reference = "fixedaddress/ZG5z:10.0.0.7/default";
        let conn = MockConnector::new().reply(json!(reference));
        let updated = manager(&conn)
            .update_fixed_address(reference, "CLIENT_ID", "aa:bb:cc:dd:ee:ff", "", "")
            .await
            .unwrap();

        assert_eq!(updated.reference, reference);
        match &conn.calls()[0] {
            RecordedCall::Update { body, .. } => {
                assert_eq!(body, &json!({"mac": "aa:bb:cc:dd:ee:ff", "match_client": "CLIENT_ID"}));
            }
            other => panic!("expected an update, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn release_ip_deletes_matching_fixed_address() {
        let reference = "fixedaddress/ZG5z:10.0.0.7/default";
        let conn = MockConnector::new()
            .reply(json!([{"_ref": reference, "ipv4addr": "10.0.0.7"}]))
            .reply(json!(reference));

        let released = manager(&conn)
            .release_ip("default", "10.0.0.0/24", "10.0.0.7", "")
            .await
            .unwrap();

        assert_eq!(released, reference);
        assert_eq!(conn.calls().len(), 2);
    }

    #[tokio::test]
    async fn release_ip_without_match_is_noop() {
        let conn = MockConnector::new().reply(json!([]));
        let released = manager(&conn)
            .release_ip("default", "10.0.0.0/24", "10.0.0.7", "")
            .await
            .unwrap();
        assert_eq!(released, "");
        assert_eq!(conn.call_count(), 1);
    }

    #[tokio::test]
    async fn create_ea_definition_keeps_reference() {
        let conn = MockConnector::new().reply(json!("extensibleattributedef/ZG5z:Site"));
        let def = manager(&conn)
            .create_ea_definition(EaDefinition {
                name: "Site".to_string(),
                ea_type: "STRING".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(def.reference, "extensibleattributedef/ZG5z:Site");
    }
}

//! DNS record and zone operations

use super::{ip_or_next_available, vm_ea, ObjectManager};
use crate::error::WapiError;
use crate::models::{
    Ea, HostRecord, HostRecordIpv4Addr, NameServer, RecordA, RecordCname, RecordPtr, RecordTxt,
    ZoneAuth, ZoneDelegated,
};
use crate::wapi_trait::WapiConnector;
use tracing::debug;

impl<C: WapiConnector> ObjectManager<C> {
    /// Create a host record and read it back from the grid
    ///
    /// An empty `ip_addr` takes the next free address of `cidr`.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_host_record(
        &self,
        enable_dns: bool,
        name: &str,
        netview: &str,
        dns_view: &str,
        cidr: &str,
        ip_addr: &str,
        mac: &str,
        ea: Ea,
    ) -> Result<HostRecord, WapiError> {
        let mut host = HostRecord {
            enable_dns: Some(enable_dns),
            ipv4_addrs: vec![HostRecordIpv4Addr {
                ipv4_addr: ip_or_next_available(ip_addr, cidr, netview),
                mac: mac.to_string(),
                ..Default::default()
            }],
            name: name.to_string(),
            network_view: netview.to_string(),
            view: dns_view.to_string(),
            ea: self.extend_ea(ea),
            ..Default::default()
        };

        host.reference = self.connector.create_object(&host).await?;
        debug!("Created host record {}", host.reference);

        let created: Option<HostRecord> = self.find_by_ref(&host, &host.reference).await?;
        Ok(created.unwrap_or(host))
    }

    /// Find a host record by name; an empty name matches any record
    pub async fn get_host_record(&self, name: &str) -> Result<Option<HostRecord>, WapiError> {
        let template = HostRecord {
            name: name.to_string(),
            ..Default::default()
        };
        self.find_first(&template).await
    }

    pub async fn get_host_record_by_ref(&self, reference: &str) -> Result<Option<HostRecord>, WapiError> {
        self.find_by_ref(&HostRecord::default(), reference).await
    }

    /// First IPv4 address of `host`, as currently stored on the grid
    pub async fn get_ip_address_from_host_record(&self, host: &HostRecord) -> Result<String, WapiError> {
        let current: Option<HostRecord> = self.find_by_ref(host, &host.reference).await?;
        current
            .and_then(|h| h.ipv4_addrs.into_iter().next())
            .map(|addr| addr.ipv4_addr)
            .ok_or_else(|| {
                WapiError::InvalidRequest(format!("host record '{}' has no IPv4 address", host.reference))
            })
    }

    /// Replace the address of a host record and tag it with the VM identity
    pub async fn update_host_record(
        &self,
        reference: &str,
        ip_addr: &str,
        mac: &str,
        vm_id: &str,
        vm_name: &str,
    ) -> Result<String, WapiError> {
        let update = HostRecord {
            ipv4_addrs: vec![HostRecordIpv4Addr {
                ipv4_addr: ip_addr.to_string(),
                mac: mac.to_string(),
                ..Default::default()
            }],
            ea: vm_ea(self.basic_ea(true), vm_id, vm_name).unwrap_or_default(),
            ..Default::default()
        };
        self.connector.update_object(&update, reference).await
    }

    pub async fn delete_host_record(&self, reference: &str) -> Result<String, WapiError> {
        self.connector.delete_object(reference).await
    }

    /// Create an A record; an empty `ip_addr` takes the next free address of `cidr`
    pub async fn create_a_record(
        &self,
        netview: &str,
        dns_view: &str,
        name: &str,
        cidr: &str,
        ip_addr: &str,
        ea: Ea,
    ) -> Result<RecordA, WapiError> {
        let mut record = RecordA {
            ipv4_addr: ip_or_next_available(ip_addr, cidr, netview),
            name: name.to_string(),
            view: dns_view.to_string(),
            ea: self.extend_ea(ea),
            ..Default::default()
        };
        record.reference = self.connector.create_object(&record).await?;
        Ok(record)
    }

    pub async fn get_a_record_by_ref(&self, reference: &str) -> Result<Option<RecordA>, WapiError> {
        self.find_by_ref(&RecordA::default(), reference).await
    }

    pub async fn delete_a_record(&self, reference: &str) -> Result<String, WapiError> {
        self.connector.delete_object(reference).await
    }

    pub async fn create_cname_record(
        &self,
        canonical: &str,
        name: &str,
        dns_view: &str,
        ea: Ea,
    ) -> Result<RecordCname, WapiError> {
        let mut record = RecordCname {
            canonical: canonical.to_string(),
            name: name.to_string(),
            view: dns_view.to_string(),
            ea: self.extend_ea(ea),
            ..Default::default()
        };
        record.reference = self.connector.create_object(&record).await?;
        Ok(record)
    }

    pub async fn get_cname_record_by_ref(&self, reference: &str) -> Result<Option<RecordCname>, WapiError> {
        self.find_by_ref(&RecordCname::default(), reference).await
    }

    pub async fn delete_cname_record(&self, reference: &str) -> Result<String, WapiError> {
        self.connector.delete_object(reference).await
    }

    /// Create a TXT record; a `ttl` of 0 inherits the zone TTL
    pub async fn create_txt_record(
        &self,
        name: &str,
        text: &str,
        ttl: u32,
        dns_view: &str,
    ) -> Result<RecordTxt, WapiError> {
        let mut record = RecordTxt {
            name: name.to_string(),
            text: text.to_string(),
            ttl,
            use_ttl: ttl > 0,
            view: dns_view.to_string(),
            ..Default::default()
        };
        record.reference = self.connector.create_object(&record).await?;
        Ok(record)
    }

    /// Find a TXT record by name
    pub async fn get_txt_record(&self, name: &str) -> Result<Option<RecordTxt>, WapiError> {
        if name.is_empty() {
            return Err(WapiError::InvalidRequest("name can not be empty".to_string()));
        }
        let template = RecordTxt {
            name: name.to_string(),
            ..Default::default()
        };
        self.find_first(&template).await
    }

    pub async fn get_txt_record_by_ref(&self, reference: &str) -> Result<Option<RecordTxt>, WapiError> {
        self.find_by_ref(&RecordTxt::default(), reference).await
    }

    /// Replace the text of the TXT record called `name`
    ///
    /// Returns `None` when there is no such record.
    pub async fn update_txt_record(&self, name: &str, text: &str) -> Result<Option<RecordTxt>, WapiError> {
        let Some(mut record) = self.get_txt_record(name).await? else {
            return Ok(None);
        };

        record.text = text.to_string();
        // zone is read-only
        record.zone.clear();

        let update = RecordTxt {
            reference: String::new(),
            ..record.clone()
        };
        self.connector.update_object(&update, &record.reference).await?;
        Ok(Some(record))
    }

    pub async fn delete_txt_record(&self, reference: &str) -> Result<String, WapiError> {
        self.connector.delete_object(reference).await
    }

    /// Create a PTR record pointing at `ptrd_name`
    ///
    /// An empty `ip_addr` takes the next free address of `cidr`.
    pub async fn create_ptr_record(
        &self,
        netview: &str,
        dns_view: &str,
        ptrd_name: &str,
        cidr: &str,
        ip_addr: &str,
        ea: Ea,
    ) -> Result<RecordPtr, WapiError> {
        let mut record = RecordPtr {
            ipv4_addr: ip_or_next_available(ip_addr, cidr, netview),
            ptrd_name: ptrd_name.to_string(),
            view: dns_view.to_string(),
            ea: self.extend_ea(ea),
            ..Default::default()
        };
        record.reference = self.connector.create_object(&record).await?;
        Ok(record)
    }

    pub async fn get_ptr_record_by_ref(&self, reference: &str) -> Result<Option<RecordPtr>, WapiError> {
        self.find_by_ref(&RecordPtr::default(), reference).await
    }

    pub async fn delete_ptr_record(&self, reference: &str) -> Result<String, WapiError> {
        self.connector.delete_object(reference).await
    }

    /// Create an authoritative zone and its sub-zones for `fqdn`
    pub async fn create_zone_auth(&self, fqdn: &str, ea: Ea) -> Result<ZoneAuth, WapiError> {
        let mut zone = ZoneAuth {
            fqdn: fqdn.to_string(),
            ea: self.extend_ea(ea),
            ..Default::default()
        };
        zone.reference = self.connector.create_object(&zone).await?;
        Ok(zone)
    }

    /// Authoritative zone at `reference`; an empty reference is `None` without a request
    pub async fn get_zone_auth_by_ref(&self, reference: &str) -> Result<Option<ZoneAuth>, WapiError> {
        if reference.is_empty() {
            return Ok(None);
        }
        self.find_by_ref(&ZoneAuth::default(), reference).await
    }

    /// Every authoritative zone
    pub async fn get_zone_auth(&self) -> Result<Vec<ZoneAuth>, WapiError> {
        self.find_all(&ZoneAuth::default()).await
    }

    pub async fn delete_zone_auth(&self, reference: &str) -> Result<String, WapiError> {
        self.connector.delete_object(reference).await
    }

    /// Delegated zone for `fqdn`; an empty fqdn is `None` without a request
    pub async fn get_zone_delegated(&self, fqdn: &str) -> Result<Option<ZoneDelegated>, WapiError> {
        if fqdn.is_empty() {
            return Ok(None);
        }
        let template = ZoneDelegated {
            fqdn: fqdn.to_string(),
            ..Default::default()
        };
        self.find_first(&template).await
    }

    pub async fn create_zone_delegated(
        &self,
        fqdn: &str,
        delegate_to: Vec<NameServer>,
    ) -> Result<ZoneDelegated, WapiError> {
        let mut zone = ZoneDelegated {
            fqdn: fqdn.to_string(),
            delegate_to,
            ..Default::default()
        };
        zone.reference = self.connector.create_object(&zone).await?;
        Ok(zone)
    }

    /// Replace the name servers of the delegated zone at `reference`
    pub async fn update_zone_delegated(
        &self,
        reference: &str,
        delegate_to: Vec<NameServer>,
    ) -> Result<ZoneDelegated, WapiError> {
        let mut zone = ZoneDelegated {
            delegate_to,
            ..Default::default()
        };
        zone.reference = self.connector.update_object(&zone, reference).await?;
        Ok(zone)
    }

    pub async fn delete_zone_delegated(&self, reference: &str) -> Result<String, WapiError> {
        self.connector.delete_object(reference).await
    }
}

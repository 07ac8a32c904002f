//! Grid administration operations

use super::ObjectManager;
use crate::error::WapiError;
use crate::models::{
    CapacityReport, Grid, License, LicenseScope, Member, MultiRequest, UpgradeStatus,
};
use crate::wapi_trait::WapiConnector;
use serde_json::{Map, Value};

impl<C: WapiConnector> ObjectManager<C> {
    /// Run several operations in one `request` call
    pub async fn create_multi_object(&self, request: &MultiRequest) -> Result<Vec<Map<String, Value>>, WapiError> {
        self.connector.create_multi_object(request).await
    }

    /// Upgrade status of the given type (e.g. `GRID`)
    pub async fn get_upgrade_status(&self, status_type: &str) -> Result<Vec<UpgradeStatus>, WapiError> {
        // TODO: accepted types depend on the WAPI version; validate them once the version is known here
        if status_type.is_empty() {
            return Err(WapiError::InvalidRequest("Status type can not be empty".to_string()));
        }
        let template = UpgradeStatus {
            status_type: status_type.to_string(),
            ..Default::default()
        };
        self.find_all(&template).await
    }

    pub async fn get_all_members(&self) -> Result<Vec<Member>, WapiError> {
        self.find_all(&Member::default()).await
    }

    /// Capacity reports, for one member when `name` is set
    pub async fn get_capacity_report(&self, name: &str) -> Result<Vec<CapacityReport>, WapiError> {
        let template = CapacityReport {
            name: name.to_string(),
            ..Default::default()
        };
        self.find_all(&template).await
    }

    /// Member licenses
    pub async fn get_license(&self) -> Result<Vec<License>, WapiError> {
        self.find_all(&License::template(LicenseScope::Member)).await
    }

    /// Grid-wide licenses
    pub async fn get_grid_license(&self) -> Result<Vec<License>, WapiError> {
        self.find_all(&License::template(LicenseScope::Grid)).await
    }

    pub async fn get_grid_info(&self) -> Result<Vec<Grid>, WapiError> {
        self.find_all(&Grid::default()).await
    }
}

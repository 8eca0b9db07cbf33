mod api_log;
mod error;
mod http;

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::domain::{
    AlertNotification, AssignResource, BatchUpdateRates, BatchUpdateResources, CompleteDashboard,
    Contract, ContractBurnRate, ContractHealthCard, ContractId, ContractResource, CreateContract,
    CreateLcat, CreateResource, DashboardMetrics, FinancialProjections, Lcat, LcatId, Resource,
    ResourceAvailability, ResourceFilters, ResourceId, ResourceUtilizationMetrics, UpdateFunding,
    UpdateResource, UpdateResourceAssignment,
};

pub use api_log::*;
pub use error::*;
pub use http::*;

pub type GovconResult<T> = Result<T, GovconError>;

/// Every operation the contract finance backend exposes.
///
/// Implemented over HTTP by [`GovconClient`]; the TUI also carries an
/// in-memory implementation for offline development.
#[async_trait]
pub trait ContractFinanceApi: Send + Sync {
    /// Shared record of recent calls, shown in the debug panel.
    fn api_log(&self) -> &ApiLog;

    // Contracts
    async fn list_contracts(&self) -> GovconResult<Vec<Contract>>;
    async fn get_contract(&self, id: &ContractId) -> GovconResult<Contract>;
    async fn create_contract(&self, contract: &CreateContract) -> GovconResult<Contract>;
    async fn activate_contract(&self, id: &ContractId) -> GovconResult<()>;
    async fn close_contract(&self, id: &ContractId) -> GovconResult<()>;
    async fn update_funding(&self, id: &ContractId, funding: &UpdateFunding) -> GovconResult<()>;
    async fn delete_contract(&self, id: &ContractId) -> GovconResult<()>;

    // Contract assignments
    async fn contract_resources(&self, id: &ContractId) -> GovconResult<Vec<ContractResource>>;
    async fn assign_resource(
        &self,
        id: &ContractId,
        assignment: &AssignResource,
    ) -> GovconResult<ContractResource>;
    async fn update_assignment(
        &self,
        id: &ContractId,
        resource_id: &ResourceId,
        update: &UpdateResourceAssignment,
    ) -> GovconResult<ContractResource>;
    async fn remove_resource(
        &self,
        id: &ContractId,
        resource_id: &ResourceId,
        end_date: Option<OffsetDateTime>,
    ) -> GovconResult<()>;
    async fn available_resources(
        &self,
        id: &ContractId,
        min_available_percentage: Option<Decimal>,
    ) -> GovconResult<Vec<ResourceAvailability>>;
    async fn burn_rate(&self, id: &ContractId) -> GovconResult<ContractBurnRate>;

    // Resources
    async fn list_resources(&self, filters: &ResourceFilters) -> GovconResult<Vec<Resource>>;
    async fn get_resource(&self, id: &ResourceId) -> GovconResult<Resource>;
    async fn create_resource(&self, resource: &CreateResource) -> GovconResult<Resource>;
    async fn update_resource(&self, update: &UpdateResource) -> GovconResult<Resource>;
    async fn batch_update_resources(
        &self,
        batch: &BatchUpdateResources,
    ) -> GovconResult<Vec<Resource>>;
    async fn terminate_resource(&self, id: &ResourceId, end_date: OffsetDateTime)
        -> GovconResult<()>;
    async fn assign_resource_to_contract(
        &self,
        id: &ResourceId,
        contract_id: &ContractId,
    ) -> GovconResult<Resource>;
    async fn cost_analysis(&self, id: &ResourceId) -> GovconResult<serde_json::Value>;
    async fn list_underwater_resources(
        &self,
        contract_id: Option<&ContractId>,
    ) -> GovconResult<Vec<Resource>>;
    async fn export_resources(&self, filters: &ResourceFilters) -> GovconResult<Vec<u8>>;

    // Labor categories
    async fn list_lcats(&self) -> GovconResult<Vec<Lcat>>;
    async fn get_lcat(&self, id: &LcatId) -> GovconResult<Lcat>;
    async fn create_lcat(&self, lcat: &CreateLcat) -> GovconResult<Lcat>;
    async fn batch_update_rates(&self, batch: &BatchUpdateRates) -> GovconResult<()>;

    // Dashboard
    async fn dashboard_metrics(&self) -> GovconResult<DashboardMetrics>;
    async fn contract_health(&self) -> GovconResult<Vec<ContractHealthCard>>;
    async fn resource_utilization(&self) -> GovconResult<ResourceUtilizationMetrics>;
    async fn projections(&self, months: u32) -> GovconResult<FinancialProjections>;
    async fn alerts(&self) -> GovconResult<Vec<AlertNotification>>;
    async fn complete_dashboard(&self) -> GovconResult<CompleteDashboard>;
}

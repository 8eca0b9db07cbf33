use async_trait::async_trait;
use govcon::domain::{
    burdened_cost, margin, AlertNotification, AssignResource, AssignmentId, BatchUpdateRates,
    BatchUpdateResources, CompleteDashboard, Contract, ContractBurnRate, ContractHealthCard,
    ContractId, ContractResource, ContractStatus, CreateContract, CreateLcat, CreateResource,
    DashboardMetrics, FinancialProjections, Lcat, LcatId, Resource, ResourceAvailability,
    ResourceFilters, ResourceId, ResourceUtilizationMetrics, UpdateFunding, UpdateResource,
    UpdateResourceAssignment,
};
use govcon::{ApiLog, ContractFinanceApi, GovconError, GovconResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use time::OffsetDateTime;

use super::dev_seed::seed_store;

/// In-memory stand-in for the contract finance API, used by `govcon-tui dev`
/// and by tests. Enforces the same business rules the server reports as 400s.
#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<DevStore>>,
    log: ApiLog,
}

#[derive(Debug)]
pub(super) struct DevStore {
    pub(super) now: OffsetDateTime,
    pub(super) contracts: Vec<Contract>,
    /// Amount invoiced to date per contract.
    pub(super) burned: HashMap<ContractId, Decimal>,
    pub(super) lcats: Vec<Lcat>,
    pub(super) resources: Vec<Resource>,
    pub(super) assignments: Vec<ContractResource>,
    next_id: u64,
}

fn bad_request(message: impl Into<String>) -> GovconError {
    GovconError::Status {
        status: 400,
        message: message.into(),
    }
}

impl DevStore {
    pub(super) fn empty(now: OffsetDateTime) -> Self {
        Self {
            now,
            contracts: Vec::new(),
            burned: HashMap::new(),
            lcats: Vec::new(),
            resources: Vec::new(),
            assignments: Vec::new(),
            next_id: 100,
        }
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn contract(&self, id: &ContractId) -> GovconResult<&Contract> {
        self.contracts
            .iter()
            .find(|c| &c.id == id)
            .ok_or_else(|| GovconError::NotFound("Contract".to_string()))
    }

    fn contract_mut(&mut self, id: &ContractId) -> GovconResult<&mut Contract> {
        self.contracts
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| GovconError::NotFound("Contract".to_string()))
    }

    fn resource(&self, id: &ResourceId) -> GovconResult<&Resource> {
        self.resources
            .iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| GovconError::NotFound("Resource".to_string()))
    }

    fn resource_mut(&mut self, id: &ResourceId) -> GovconResult<&mut Resource> {
        self.resources
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| GovconError::NotFound("Resource".to_string()))
    }

    fn lcat(&self, id: &LcatId) -> GovconResult<&Lcat> {
        self.lcats
            .iter()
            .find(|l| &l.id == id)
            .ok_or_else(|| GovconError::NotFound("LCAT".to_string()))
    }

    pub(super) fn active_assignments<'a>(
        &'a self,
        contract_id: &'a ContractId,
    ) -> impl Iterator<Item = &'a ContractResource> + 'a {
        self.assignments
            .iter()
            .filter(move |a| a.is_active && &a.contract_id == contract_id)
    }

    /// Allocation committed across every contract.
    pub(super) fn allocation_for(&self, resource_id: &ResourceId) -> Decimal {
        self.assignments
            .iter()
            .filter(|a| a.is_active && &a.resource_id == resource_id)
            .map(|a| a.allocation_percentage)
            .sum()
    }

    pub(super) fn link_resource(&mut self, resource_id: &ResourceId, contract_id: &ContractId) {
        let name = self
            .contract(contract_id)
            .map(|c| c.contract_name.clone())
            .ok();
        if let Ok(resource) = self.resource_mut(resource_id) {
            resource.contract_id = Some(contract_id.clone());
            resource.contract_name = name;
        }
    }

    pub(super) fn build_assignment(
        &mut self,
        contract_id: &ContractId,
        resource_id: &ResourceId,
        allocation: Decimal,
        annual_hours: Decimal,
        start_date: OffsetDateTime,
        bill_rate_override: Option<Decimal>,
    ) -> GovconResult<ContractResource> {
        self.contract(contract_id)?;
        let resource = self.resource(resource_id)?.clone();
        let id = AssignmentId::new(self.fresh_id("a"));
        let mut assignment = ContractResource {
            id,
            contract_id: contract_id.clone(),
            resource_id: resource_id.clone(),
            resource_name: resource.full_name.clone(),
            resource_type: resource.resource_type.as_str().to_string(),
            lcat_title: resource.lcat_name.clone(),
            allocation_percentage: allocation,
            annual_hours,
            start_date,
            end_date: None,
            contract_bill_rate_override: bill_rate_override,
            is_active: true,
            pay_rate: resource.hourly_rate,
            burdened_cost: resource.burdened_cost,
            bill_rate: Decimal::ZERO,
            monthly_burn: Decimal::ZERO,
            annual_burn: Decimal::ZERO,
            margin: Decimal::ZERO,
            is_underwater: false,
        };
        price_assignment(&mut assignment, resource.bill_rate);
        Ok(assignment)
    }

    fn refresh_resource_pricing(&mut self, resource_id: &ResourceId) {
        let Ok(resource) = self.resource(resource_id).cloned() else {
            return;
        };
        for assignment in self
            .assignments
            .iter_mut()
            .filter(|a| &a.resource_id == resource_id)
        {
            assignment.resource_name = resource.full_name.clone();
            assignment.lcat_title = resource.lcat_name.clone();
            assignment.pay_rate = resource.hourly_rate;
            assignment.burdened_cost = resource.burdened_cost;
            price_assignment(assignment, resource.bill_rate);
        }
    }

    fn apply_resource_update(&mut self, update: &UpdateResource) -> GovconResult<Resource> {
        if let Some(rate) = update.hourly_rate {
            if rate <= Decimal::ZERO {
                return Err(bad_request("Hourly rate must be greater than zero"));
            }
        }
        let lcat = match &update.lcat_id {
            Some(id) => Some(self.lcat(id)?.clone()),
            None => None,
        };
        let resource = self.resource_mut(&update.id)?;
        update.apply_to(resource);
        if let Some(lcat) = lcat {
            resource.lcat_name = Some(lcat.name);
            resource.bill_rate = lcat.current_default_bill_rate;
        }
        resource.burdened_cost = burdened_cost(resource.hourly_rate, resource.resource_type);
        resource.margin = margin(resource.bill_rate, resource.burdened_cost);
        let updated = resource.clone();
        self.refresh_resource_pricing(&updated.id);
        Ok(updated)
    }
}

/// Bill rate, burn and margin for an assignment. Burn is billed hours at the
/// effective bill rate.
fn price_assignment(assignment: &mut ContractResource, resource_bill_rate: Option<Decimal>) {
    let bill_rate = assignment
        .contract_bill_rate_override
        .or(resource_bill_rate)
        .unwrap_or_default();
    let hours = assignment.annual_hours * assignment.allocation_percentage / dec!(100);
    assignment.bill_rate = bill_rate;
    assignment.annual_burn = (bill_rate * hours).round_dp(2);
    assignment.monthly_burn = (assignment.annual_burn / dec!(12)).round_dp(2);
    assignment.margin = bill_rate - assignment.burdened_cost;
    assignment.is_underwater = assignment.margin < Decimal::ZERO;
}

impl Default for DevBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DevBackend {
    pub fn new() -> Self {
        Self::at(OffsetDateTime::now_utc())
    }

    /// Seeded relative to a fixed instant.
    pub fn at(now: OffsetDateTime) -> Self {
        Self {
            store: Arc::new(Mutex::new(seed_store(now))),
            log: ApiLog::default(),
        }
    }

    /// Run `op` against the store, recording the call like the HTTP client does.
    fn call<T>(
        &self,
        method: &str,
        path: &str,
        op: impl FnOnce(&mut DevStore) -> GovconResult<T>,
    ) -> GovconResult<T> {
        let url = format!("dev://{}", path);
        self.log.request(method, &url);
        let started = Instant::now();
        let result = {
            let mut store = self.store.lock().expect("dev store lock poisoned");
            op(&mut store)
        };
        match &result {
            Ok(_) => self.log.response(method, &url, 200, started.elapsed()),
            Err(e) => {
                tracing::debug!(method, url = %url, error = %e, "dev backend rejected call");
                self.log
                    .error(method, &url, e.status(), started.elapsed(), e.to_string())
            }
        }
        result
    }
}

#[async_trait]
impl ContractFinanceApi for DevBackend {
    fn api_log(&self) -> &ApiLog {
        &self.log
    }

    async fn list_contracts(&self) -> GovconResult<Vec<Contract>> {
        self.call("GET", "api/Contract", |s| Ok(s.contracts.clone()))
    }

    async fn get_contract(&self, id: &ContractId) -> GovconResult<Contract> {
        self.call("GET", &format!("api/Contract/{}", id), |s| {
            s.contract(id).cloned()
        })
    }

    async fn create_contract(&self, contract: &CreateContract) -> GovconResult<Contract> {
        self.call("POST", "api/Contract", |s| {
            if contract.funded_value > contract.total_value {
                return Err(bad_request("Funded value cannot exceed total value"));
            }
            if contract.end_date <= contract.start_date {
                return Err(bad_request("End date must be after start date"));
            }
            if s
                .contracts
                .iter()
                .any(|c| c.contract_number == contract.contract_number)
            {
                return Err(bad_request(format!(
                    "Contract number {} already exists",
                    contract.contract_number
                )));
            }
            let created = Contract {
                id: ContractId::new(s.fresh_id("c")),
                contract_number: contract.contract_number.clone(),
                contract_name: contract.contract_name.clone(),
                customer_name: contract.customer_name.clone(),
                prime_contractor: contract.prime_contractor.clone(),
                is_prime: contract.is_prime,
                contract_type: contract.contract_type,
                start_date: contract.start_date,
                end_date: contract.end_date,
                total_value: contract.total_value,
                funded_value: contract.funded_value,
                standard_full_time_hours: contract.standard_full_time_hours,
                description: contract.description.clone(),
                status: ContractStatus::Draft,
                created_at: s.now,
                updated_at: s.now,
                is_active: true,
            };
            s.contracts.push(created.clone());
            Ok(created)
        })
    }

    async fn activate_contract(&self, id: &ContractId) -> GovconResult<()> {
        self.call("POST", &format!("api/Contract/{}/activate", id), |s| {
            let now = s.now;
            let contract = s.contract_mut(id)?;
            if !contract.status.can_activate() {
                return Err(bad_request("Only draft contracts can be activated"));
            }
            contract.status = ContractStatus::Active;
            contract.updated_at = now;
            Ok(())
        })
    }

    async fn close_contract(&self, id: &ContractId) -> GovconResult<()> {
        self.call("POST", &format!("api/Contract/{}/close", id), |s| {
            let now = s.now;
            let contract = s.contract_mut(id)?;
            if !contract.status.can_close() {
                return Err(bad_request("Only active contracts can be closed"));
            }
            contract.status = ContractStatus::Closed;
            contract.is_active = false;
            contract.updated_at = now;
            Ok(())
        })
    }

    async fn update_funding(&self, id: &ContractId, funding: &UpdateFunding) -> GovconResult<()> {
        self.call("POST", &format!("api/Contract/{}/update-funding", id), |s| {
            let now = s.now;
            let contract = s.contract_mut(id)?;
            if funding.funded_amount < Decimal::ZERO {
                return Err(bad_request("Funded amount cannot be negative"));
            }
            if funding.funded_amount > contract.total_value {
                return Err(bad_request("Funded value cannot exceed total value"));
            }
            contract.funded_value = funding.funded_amount;
            contract.updated_at = now;
            Ok(())
        })
    }

    async fn delete_contract(&self, id: &ContractId) -> GovconResult<()> {
        self.call("DELETE", &format!("api/Contract/{}", id), |s| {
            let contract = s.contract(id)?;
            if contract.status == ContractStatus::Active {
                return Err(bad_request("Active contracts must be closed before deletion"));
            }
            s.contracts.retain(|c| &c.id != id);
            s.assignments.retain(|a| &a.contract_id != id);
            s.burned.remove(id);
            for resource in s
                .resources
                .iter_mut()
                .filter(|r| r.contract_id.as_ref() == Some(id))
            {
                resource.contract_id = None;
                resource.contract_name = None;
            }
            Ok(())
        })
    }

    async fn contract_resources(&self, id: &ContractId) -> GovconResult<Vec<ContractResource>> {
        self.call("GET", &format!("api/Contract/{}/resources", id), |s| {
            s.contract(id)?;
            Ok(s.active_assignments(id).cloned().collect())
        })
    }

    async fn assign_resource(
        &self,
        id: &ContractId,
        assignment: &AssignResource,
    ) -> GovconResult<ContractResource> {
        self.call("POST", &format!("api/Contract/{}/resources", id), |s| {
            if s
                .active_assignments(id)
                .any(|a| a.resource_id == assignment.resource_id)
            {
                return Err(bad_request("Resource is already assigned to this contract"));
            }
            let current = s.allocation_for(&assignment.resource_id);
            if current + assignment.allocation_percentage > dec!(100) {
                return Err(bad_request(format!(
                    "Resource only has {}% available",
                    (dec!(100) - current).max(Decimal::ZERO).normalize()
                )));
            }
            let mut created = s.build_assignment(
                id,
                &assignment.resource_id,
                assignment.allocation_percentage,
                assignment.annual_hours,
                assignment.start_date,
                assignment.contract_bill_rate_override,
            )?;
            created.end_date = assignment.end_date;
            s.assignments.push(created.clone());
            s.link_resource(&assignment.resource_id, id);
            Ok(created)
        })
    }

    async fn update_assignment(
        &self,
        id: &ContractId,
        resource_id: &ResourceId,
        update: &UpdateResourceAssignment,
    ) -> GovconResult<ContractResource> {
        let path = format!("api/Contract/{}/resources/{}", id, resource_id);
        self.call("PUT", &path, |s| {
            let elsewhere = s.allocation_for(resource_id)
                - s.active_assignments(id)
                    .filter(|a| &a.resource_id == resource_id)
                    .map(|a| a.allocation_percentage)
                    .sum::<Decimal>();
            if let Some(allocation) = update.allocation_percentage {
                if elsewhere + allocation > dec!(100) {
                    return Err(bad_request("Resource would be over-allocated"));
                }
            }
            let bill_rate = s.resource(resource_id)?.bill_rate;
            let assignment = s
                .assignments
                .iter_mut()
                .find(|a| a.is_active && &a.contract_id == id && &a.resource_id == resource_id)
                .ok_or_else(|| GovconError::NotFound("Assignment".to_string()))?;
            if let Some(v) = update.allocation_percentage {
                assignment.allocation_percentage = v;
            }
            if let Some(v) = update.annual_hours {
                assignment.annual_hours = v;
            }
            if let Some(v) = update.end_date {
                assignment.end_date = Some(v);
            }
            if let Some(v) = update.contract_bill_rate_override {
                assignment.contract_bill_rate_override = Some(v);
            }
            price_assignment(assignment, bill_rate);
            Ok(assignment.clone())
        })
    }

    async fn remove_resource(
        &self,
        id: &ContractId,
        resource_id: &ResourceId,
        end_date: Option<OffsetDateTime>,
    ) -> GovconResult<()> {
        let path = format!("api/Contract/{}/resources/{}", id, resource_id);
        self.call("DELETE", &path, |s| {
            let now = s.now;
            let assignment = s
                .assignments
                .iter_mut()
                .find(|a| a.is_active && &a.contract_id == id && &a.resource_id == resource_id)
                .ok_or_else(|| GovconError::NotFound("Assignment".to_string()))?;
            assignment.is_active = false;
            assignment.end_date = Some(end_date.unwrap_or(now));
            if let Ok(resource) = s.resource_mut(resource_id) {
                if resource.contract_id.as_ref() == Some(id) {
                    resource.contract_id = None;
                    resource.contract_name = None;
                }
            }
            Ok(())
        })
    }

    async fn available_resources(
        &self,
        id: &ContractId,
        min_available_percentage: Option<Decimal>,
    ) -> GovconResult<Vec<ResourceAvailability>> {
        let path = format!("api/Contract/{}/available-resources", id);
        self.call("GET", &path, |s| {
            s.contract(id)?;
            let minimum = min_available_percentage.unwrap_or(Decimal::ZERO);
            let rows = s
                .resources
                .iter()
                .filter(|r| r.is_active)
                .filter(|r| !s.active_assignments(id).any(|a| a.resource_id == r.id))
                .map(|r| s.availability(r))
                .filter(|a| a.available_allocation > Decimal::ZERO)
                .filter(|a| a.available_allocation >= minimum)
                .collect();
            Ok(rows)
        })
    }

    async fn burn_rate(&self, id: &ContractId) -> GovconResult<ContractBurnRate> {
        self.call("GET", &format!("api/Contract/{}/burn-rate", id), |s| {
            s.burn_rate(id)
        })
    }

    async fn list_resources(&self, filters: &ResourceFilters) -> GovconResult<Vec<Resource>> {
        self.call("GET", "api/Resource", |s| {
            Ok(s
                .resources
                .iter()
                .filter(|r| filters.matches(r))
                .cloned()
                .collect())
        })
    }

    async fn get_resource(&self, id: &ResourceId) -> GovconResult<Resource> {
        self.call("GET", &format!("api/Resource/{}", id), |s| {
            s.resource(id).cloned()
        })
    }

    async fn create_resource(&self, resource: &CreateResource) -> GovconResult<Resource> {
        self.call("POST", "api/Resource", |s| {
            if resource.hourly_rate <= Decimal::ZERO {
                return Err(bad_request("Hourly rate must be greater than zero"));
            }
            let lcat = s.lcat(&resource.lcat_id)?.clone();
            let burdened = burdened_cost(resource.hourly_rate, resource.resource_type);
            let bill_rate = lcat.current_default_bill_rate;
            let created = Resource {
                id: ResourceId::new(s.fresh_id("r")),
                first_name: resource.first_name.clone(),
                last_name: resource.last_name.clone(),
                full_name: format!("{} {}", resource.first_name, resource.last_name),
                email: resource.email.clone(),
                resource_type: resource.resource_type,
                lcat_id: lcat.id.clone(),
                lcat_name: Some(lcat.name.clone()),
                contract_id: None,
                contract_name: None,
                hourly_rate: resource.hourly_rate,
                annual_salary: resource.annual_salary,
                burdened_cost: burdened,
                bill_rate,
                margin: margin(bill_rate, burdened),
                start_date: resource.start_date,
                end_date: None,
                is_active: true,
                created_date: Some(s.now),
                created_by: Some("dev".to_string()),
                fixed_price_amount: resource.fixed_price_amount,
                fixed_price_hours: resource.fixed_price_hours,
            };
            s.resources.push(created.clone());
            if let Some(contract_id) = &resource.contract_id {
                s.link_resource(&created.id, contract_id);
            }
            s.resource(&created.id).cloned()
        })
    }

    async fn update_resource(&self, update: &UpdateResource) -> GovconResult<Resource> {
        self.call("PUT", &format!("api/Resource/{}", update.id), |s| {
            s.apply_resource_update(update)
        })
    }

    async fn batch_update_resources(
        &self,
        batch: &BatchUpdateResources,
    ) -> GovconResult<Vec<Resource>> {
        self.call("PUT", "api/Resource/batch", |s| {
            // Validate every row first so a bad row leaves the store untouched.
            for update in &batch.resource_updates {
                s.resource(&update.id)?;
                if let Some(id) = &update.lcat_id {
                    s.lcat(id)?;
                }
                if update.hourly_rate.is_some_and(|r| r <= Decimal::ZERO) {
                    return Err(bad_request("Hourly rate must be greater than zero"));
                }
            }
            batch
                .resource_updates
                .iter()
                .map(|update| s.apply_resource_update(update))
                .collect()
        })
    }

    async fn terminate_resource(
        &self,
        id: &ResourceId,
        end_date: OffsetDateTime,
    ) -> GovconResult<()> {
        self.call("POST", &format!("api/Resource/{}/terminate", id), |s| {
            let resource = s.resource_mut(id)?;
            resource.end_date = Some(end_date);
            resource.is_active = false;
            for assignment in s
                .assignments
                .iter_mut()
                .filter(|a| a.is_active && &a.resource_id == id)
            {
                assignment.is_active = false;
                assignment.end_date = Some(end_date);
            }
            Ok(())
        })
    }

    async fn assign_resource_to_contract(
        &self,
        id: &ResourceId,
        contract_id: &ContractId,
    ) -> GovconResult<Resource> {
        self.call("POST", &format!("api/Resource/{}/assign-contract", id), |s| {
            s.contract(contract_id)?;
            s.resource(id)?;
            s.link_resource(id, contract_id);
            s.resource(id).cloned()
        })
    }

    async fn cost_analysis(&self, id: &ResourceId) -> GovconResult<serde_json::Value> {
        self.call("GET", &format!("api/Resource/{}/cost-analysis", id), |s| {
            let r = s.resource(id)?;
            let margin = r.computed_margin();
            let margin_percent = match (margin, r.bill_rate) {
                (Some(m), Some(bill)) if !bill.is_zero() => Some((m / bill * dec!(100)).round_dp(1)),
                _ => None,
            };
            Ok(serde_json::json!({
                "resourceId": r.id,
                "resourceName": r.full_name,
                "resourceType": r.resource_type,
                "hourlyRate": r.hourly_rate,
                "wrapRate": r.resource_type.wrap_rate(),
                "burdenedCost": r.burdened_cost,
                "billRate": r.bill_rate,
                "margin": margin,
                "marginPercentage": margin_percent,
                "isUnderwater": r.is_underwater(),
                "totalAllocation": s.allocation_for(id),
            }))
        })
    }

    async fn list_underwater_resources(
        &self,
        contract_id: Option<&ContractId>,
    ) -> GovconResult<Vec<Resource>> {
        self.call("GET", "api/Resource/underwater", |s| {
            Ok(s
                .resources
                .iter()
                .filter(|r| r.is_active && r.is_underwater())
                .filter(|r| contract_id.is_none_or(|id| {
                    s.active_assignments(id).any(|a| a.resource_id == r.id)
                }))
                .cloned()
                .collect())
        })
    }

    async fn export_resources(&self, filters: &ResourceFilters) -> GovconResult<Vec<u8>> {
        self.call("GET", "api/Resource/export", |s| {
            let mut out = String::from(
                "Name,Email,Type,LCAT,Hourly Rate,Burdened Cost,Bill Rate,Margin,Active\n",
            );
            for r in s.resources.iter().filter(|r| filters.matches(r)) {
                let opt = |v: Option<Decimal>| v.map(|d| d.to_string()).unwrap_or_default();
                out.push_str(&format!(
                    "{},{},{},{},{},{},{},{},{}\n",
                    r.full_name,
                    r.email,
                    r.resource_type.as_str(),
                    r.lcat_name.clone().unwrap_or_default(),
                    r.hourly_rate,
                    r.burdened_cost,
                    opt(r.bill_rate),
                    opt(r.computed_margin()),
                    r.is_active
                ));
            }
            Ok(out.into_bytes())
        })
    }

    async fn list_lcats(&self) -> GovconResult<Vec<Lcat>> {
        self.call("GET", "api/LCAT", |s| Ok(s.lcats.clone()))
    }

    async fn get_lcat(&self, id: &LcatId) -> GovconResult<Lcat> {
        self.call("GET", &format!("api/LCAT/{}", id), |s| s.lcat(id).cloned())
    }

    async fn create_lcat(&self, lcat: &CreateLcat) -> GovconResult<Lcat> {
        self.call("POST", "api/LCAT", |s| {
            if s.lcats.iter().any(|l| l.name.eq_ignore_ascii_case(&lcat.name)) {
                return Err(bad_request(format!("LCAT {} already exists", lcat.name)));
            }
            let created = Lcat {
                id: LcatId::new(s.fresh_id("l")),
                name: lcat.name.clone(),
                description: lcat.description.clone(),
                current_published_rate: Some(lcat.published_rate),
                current_default_bill_rate: Some(lcat.default_bill_rate),
                position_titles: lcat.position_titles.clone(),
                is_active: true,
                created_date: s.now,
                modified_date: None,
            };
            s.lcats.push(created.clone());
            Ok(created)
        })
    }

    async fn batch_update_rates(&self, batch: &BatchUpdateRates) -> GovconResult<()> {
        self.call("POST", "api/LCAT/batch-update-rates", |s| {
            for update in &batch.rate_updates {
                s.lcat(&update.lcat_id)?;
            }
            let effective = batch.effective_date;
            for update in &batch.rate_updates {
                if let Some(lcat) = s.lcats.iter_mut().find(|l| l.id == update.lcat_id) {
                    update.apply_to(lcat);
                    lcat.modified_date = Some(effective);
                }
                if let Some(bill) = update.default_bill_rate {
                    let affected: Vec<ResourceId> = s
                        .resources
                        .iter_mut()
                        .filter(|r| r.lcat_id == update.lcat_id)
                        .map(|r| {
                            r.bill_rate = Some(bill);
                            r.margin = margin(r.bill_rate, r.burdened_cost);
                            r.id.clone()
                        })
                        .collect();
                    for id in &affected {
                        s.refresh_resource_pricing(id);
                    }
                }
            }
            Ok(())
        })
    }

    async fn dashboard_metrics(&self) -> GovconResult<DashboardMetrics> {
        self.call("GET", "api/Dashboard/metrics", |s| Ok(s.metrics()))
    }

    async fn contract_health(&self) -> GovconResult<Vec<ContractHealthCard>> {
        self.call("GET", "api/Dashboard/contracts/health", |s| {
            Ok(s.health_cards())
        })
    }

    async fn resource_utilization(&self) -> GovconResult<ResourceUtilizationMetrics> {
        self.call("GET", "api/Dashboard/resources/utilization", |s| {
            Ok(s.utilization())
        })
    }

    async fn projections(&self, months: u32) -> GovconResult<FinancialProjections> {
        self.call("GET", "api/Dashboard/projections", |s| {
            Ok(s.projections(months))
        })
    }

    async fn alerts(&self) -> GovconResult<Vec<AlertNotification>> {
        self.call("GET", "api/Dashboard/alerts", |s| Ok(s.alerts()))
    }

    async fn complete_dashboard(&self) -> GovconResult<CompleteDashboard> {
        self.call("GET", "api/Dashboard/complete", |s| {
            Ok(CompleteDashboard {
                metrics: s.metrics(),
                contracts: s.health_cards(),
                resources: s.utilization(),
                alerts: s.alerts(),
                timestamp: s.now,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govcon::domain::{
        AssignResource, FundingWarningLevel, LcatRateUpdate, ResourceType, UpdateFunding,
        DEFAULT_FULL_TIME_HOURS,
    };
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2025-06-01 12:00:00 UTC);

    fn backend() -> DevBackend {
        DevBackend::at(NOW)
    }

    #[tokio::test]
    async fn seeded_contracts_cover_every_warning_level() {
        let api = backend();
        let contracts = api.list_contracts().await.unwrap();
        let level = |id: &str| {
            contracts
                .iter()
                .find(|c| c.id.as_str() == id)
                .unwrap()
                .funding_warning(NOW)
        };
        assert_eq!(level("c-1"), FundingWarningLevel::Medium);
        assert_eq!(level("c-2"), FundingWarningLevel::Critical);
        assert_eq!(level("c-3"), FundingWarningLevel::None);
    }

    #[tokio::test]
    async fn funding_above_total_is_rejected_with_server_message() {
        let api = backend();
        let err = api
            .update_funding(
                &ContractId::new("c-3"),
                &UpdateFunding {
                    modification_number: "P00004".to_string(),
                    funded_amount: dec!(5000000),
                    justification: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.user_message("Failed to update funding"),
            "Funded value cannot exceed total value"
        );
        assert_eq!(api.api_log().stats().errors, 1);
    }

    #[tokio::test]
    async fn lifecycle_rules_are_enforced() {
        let api = backend();
        let draft = ContractId::new("c-4");
        assert!(api.close_contract(&draft).await.is_err());
        api.activate_contract(&draft).await.unwrap();
        assert!(api.activate_contract(&draft).await.is_err());
        assert!(api.delete_contract(&draft).await.is_err());
        api.close_contract(&draft).await.unwrap();
        api.delete_contract(&draft).await.unwrap();
        assert!(matches!(
            api.get_contract(&draft).await,
            Err(GovconError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn assignment_cannot_over_allocate() {
        let api = backend();
        let contract = ContractId::new("c-3");
        // r-2 is already at 100% on c-1.
        let err = api
            .assign_resource(
                &contract,
                &AssignResource {
                    resource_id: ResourceId::new("r-2"),
                    allocation_percentage: dec!(10),
                    annual_hours: DEFAULT_FULL_TIME_HOURS,
                    start_date: NOW,
                    end_date: None,
                    contract_bill_rate_override: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));

        let available = api.available_resources(&contract, None).await.unwrap();
        assert!(available.iter().all(|a| a.resource_id.as_str() != "r-2"));
        let bench = available
            .iter()
            .find(|a| a.resource_id.as_str() == "r-6")
            .unwrap();
        assert_eq!(bench.available_allocation, dec!(100));
        assert!(bench.is_on_bench);
    }

    #[tokio::test]
    async fn assignment_burn_uses_bill_rate_and_hours() {
        let api = backend();
        let rows = api.contract_resources(&ContractId::new("c-1")).await.unwrap();
        let dana = rows.iter().find(|r| r.resource_id.as_str() == "r-1").unwrap();
        // 1912h * 50% * $175
        assert_eq!(dana.annual_burn, dec!(167300.00));
        assert_eq!(dana.monthly_burn, dec!(13941.67));
        let marcus = rows.iter().find(|r| r.resource_id.as_str() == "r-2").unwrap();
        assert!(marcus.is_underwater);
    }

    #[tokio::test]
    async fn rate_change_flows_into_resources() {
        let api = backend();
        api.batch_update_rates(&BatchUpdateRates {
            effective_date: NOW,
            notes: "Batch rate update".to_string(),
            rate_updates: vec![LcatRateUpdate {
                default_bill_rate: Some(dec!(170)),
                ..LcatRateUpdate::new(LcatId::new("l-2"))
            }],
        })
        .await
        .unwrap();

        let marcus = api.get_resource(&ResourceId::new("r-2")).await.unwrap();
        assert_eq!(marcus.bill_rate, Some(dec!(170)));
        assert!(!marcus.is_underwater());
        let underwater = api.list_underwater_resources(None).await.unwrap();
        assert!(underwater.is_empty());
    }

    #[tokio::test]
    async fn batch_with_unknown_resource_changes_nothing() {
        let api = backend();
        let batch = BatchUpdateResources {
            effective_date: NOW,
            notes: None,
            resource_updates: vec![
                UpdateResource {
                    hourly_rate: Some(dec!(99)),
                    ..UpdateResource::new(ResourceId::new("r-1"))
                },
                UpdateResource::new(ResourceId::new("r-404")),
            ],
        };
        assert!(api.batch_update_resources(&batch).await.is_err());
        let dana = api.get_resource(&ResourceId::new("r-1")).await.unwrap();
        assert_eq!(dana.hourly_rate, dec!(60));
    }

    #[tokio::test]
    async fn created_resource_is_priced_from_its_lcat() {
        let api = backend();
        let created = api
            .create_resource(&CreateResource {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane.doe@example.com".to_string(),
                resource_type: ResourceType::Subcontractor,
                lcat_id: LcatId::new("l-3"),
                contract_id: None,
                hourly_rate: dec!(100),
                annual_salary: None,
                start_date: NOW,
                fixed_price_amount: None,
                fixed_price_hours: None,
            })
            .await
            .unwrap();
        assert_eq!(created.burdened_cost, dec!(115.00));
        assert_eq!(created.bill_rate, Some(dec!(118)));
        assert_eq!(created.margin, Some(dec!(3.00)));

        let filters = ResourceFilters {
            search_term: Some("jane".to_string()),
            ..Default::default()
        };
        assert_eq!(api.list_resources(&filters).await.unwrap().len(), 1);
    }
}

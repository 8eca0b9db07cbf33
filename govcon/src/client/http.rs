use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use time::OffsetDateTime;
use tracing::{debug, error};

use super::{ApiLog, ContractFinanceApi, GovconError, GovconResult};
use crate::domain::{
    AlertNotification, AssignContract, AssignResource, AvailabilityFilter, BatchUpdateRates,
    BatchUpdateResources, CompleteDashboard, Contract, ContractBurnRate, ContractHealthCard,
    ContractId, ContractResource, CreateContract, CreateLcat, CreateResource, DashboardMetrics,
    FinancialProjections, Lcat, LcatId, ProjectionFilter, RemovalFilter, Resource,
    ResourceAvailability, ResourceFilters, ResourceId, ResourceUtilizationMetrics,
    TerminateResource, UnderwaterFilter, UpdateFunding, UpdateResource, UpdateResourceAssignment,
};
use crate::ApiUrl;

const CONTRACTS: &str = "api/Contract";
const RESOURCES: &str = "api/Resource";
const LCATS: &str = "api/LCAT";
const DASHBOARD: &str = "api/Dashboard";

/// HTTP implementation of [`ContractFinanceApi`].
#[derive(Debug, Clone)]
pub struct GovconClient {
    client: Client,
    base_url: ApiUrl,
    log: ApiLog,
}

impl GovconClient {
    pub fn new(base_url: ApiUrl) -> GovconResult<Self> {
        reqwest::Url::parse(base_url.as_ref())
            .map_err(|e| GovconError::Url(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .build()
            .map_err(|e| GovconError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            log: ApiLog::default(),
        })
    }

    pub fn base_url(&self) -> &ApiUrl {
        &self.base_url
    }

    fn url(&self, path: &str) -> ApiUrl {
        self.base_url.append_path(path)
    }

    async fn send<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        url: &ApiUrl,
        body: Option<&B>,
    ) -> GovconResult<Response> {
        let method_name = method.as_str().to_string();
        debug!(method = %method_name, url = %url, has_body = body.is_some(), "API request");
        self.log.request(&method_name, url.as_ref());

        let mut request = self.client.request(method, url.as_ref());
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = GovconError::Request(e.to_string());
                self.record_failure(&method_name, url, started, &err);
                return Err(err);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            let err = if status == StatusCode::NOT_FOUND && message.is_empty() {
                GovconError::NotFound(self.resource_name(url))
            } else {
                GovconError::Status {
                    status: status.as_u16(),
                    message,
                }
            };
            self.record_failure(&method_name, url, started, &err);
            return Err(err);
        }

        let elapsed = started.elapsed();
        debug!(
            method = %method_name,
            url = %url,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "API response"
        );
        self.log
            .response(&method_name, url.as_ref(), status.as_u16(), elapsed);
        Ok(response)
    }

    /// The resource a route addresses, e.g. `Contract` for `api/Contract/{id}/close`.
    fn resource_name(&self, url: &ApiUrl) -> String {
        let path = url
            .as_ref()
            .strip_prefix(self.base_url.as_ref())
            .unwrap_or(url.as_ref());
        let path = path.split('?').next().unwrap_or_default();
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .find(|segment| !segment.eq_ignore_ascii_case("api"))
            .unwrap_or(path)
            .to_string()
    }

    fn record_failure(&self, method: &str, url: &ApiUrl, started: Instant, err: &GovconError) {
        let elapsed = started.elapsed();
        match err.hint() {
            Some(hint) => error!(method, url = %url, error = %err, hint, "API call failed"),
            None => error!(method, url = %url, error = %err, "API call failed"),
        }
        self.log
            .error(method, url.as_ref(), err.status(), elapsed, err.to_string());
    }

    async fn fetch<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        url: ApiUrl,
        body: Option<&B>,
    ) -> GovconResult<T> {
        let response = self.send(method, &url, body).await?;
        response.json::<T>().await.map_err(|e| {
            GovconError::Parsing(format!("Failed to parse response as JSON: {}", e))
        })
    }

    async fn fetch_without_body<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        url: ApiUrl,
        body: Option<&B>,
    ) -> GovconResult<()> {
        let response = self.send(method, &url, body).await?;
        let _ = response.bytes().await;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, url: ApiUrl) -> GovconResult<T> {
        self.fetch::<T, ()>(Method::GET, url, None).await
    }
}

/// Pull a readable message out of an error body. ASP.NET problem details
/// carry it in `title`/`detail`; plain controllers return a bare string.
fn error_message(body: &str) -> String {
    let trimmed = body.trim();
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(serde_json::Value::Object(map)) => ["message", "detail", "title", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .unwrap_or_default(),
        _ => trimmed.to_string(),
    }
}

#[async_trait]
impl ContractFinanceApi for GovconClient {
    fn api_log(&self) -> &ApiLog {
        &self.log
    }

    async fn list_contracts(&self) -> GovconResult<Vec<Contract>> {
        self.get(self.url(CONTRACTS)).await
    }

    async fn get_contract(&self, id: &ContractId) -> GovconResult<Contract> {
        self.get(self.url(CONTRACTS).append_path(id.as_str())).await
    }

    async fn create_contract(&self, contract: &CreateContract) -> GovconResult<Contract> {
        self.fetch(Method::POST, self.url(CONTRACTS), Some(contract))
            .await
    }

    async fn activate_contract(&self, id: &ContractId) -> GovconResult<()> {
        let url = self
            .url(CONTRACTS)
            .append_path(&format!("{}/activate", id));
        self.fetch_without_body::<()>(Method::POST, url, None).await
    }

    async fn close_contract(&self, id: &ContractId) -> GovconResult<()> {
        let url = self.url(CONTRACTS).append_path(&format!("{}/close", id));
        self.fetch_without_body::<()>(Method::POST, url, None).await
    }

    async fn update_funding(&self, id: &ContractId, funding: &UpdateFunding) -> GovconResult<()> {
        let url = self
            .url(CONTRACTS)
            .append_path(&format!("{}/update-funding", id));
        self.fetch_without_body(Method::POST, url, Some(funding))
            .await
    }

    async fn delete_contract(&self, id: &ContractId) -> GovconResult<()> {
        let url = self.url(CONTRACTS).append_path(id.as_str());
        self.fetch_without_body::<()>(Method::DELETE, url, None).await
    }

    async fn contract_resources(&self, id: &ContractId) -> GovconResult<Vec<ContractResource>> {
        self.get(self.url(CONTRACTS).append_path(&format!("{}/resources", id)))
            .await
    }

    async fn assign_resource(
        &self,
        id: &ContractId,
        assignment: &AssignResource,
    ) -> GovconResult<ContractResource> {
        let url = self
            .url(CONTRACTS)
            .append_path(&format!("{}/resources", id));
        self.fetch(Method::POST, url, Some(assignment)).await
    }

    async fn update_assignment(
        &self,
        id: &ContractId,
        resource_id: &ResourceId,
        update: &UpdateResourceAssignment,
    ) -> GovconResult<ContractResource> {
        let url = self
            .url(CONTRACTS)
            .append_path(&format!("{}/resources/{}", id, resource_id));
        self.fetch(Method::PUT, url, Some(update)).await
    }

    async fn remove_resource(
        &self,
        id: &ContractId,
        resource_id: &ResourceId,
        end_date: Option<OffsetDateTime>,
    ) -> GovconResult<()> {
        let url = self
            .url(CONTRACTS)
            .append_path(&format!("{}/resources/{}", id, resource_id))
            .with_filter(&RemovalFilter { end_date });
        self.fetch_without_body::<()>(Method::DELETE, url, None)
            .await
    }

    async fn available_resources(
        &self,
        id: &ContractId,
        min_available_percentage: Option<Decimal>,
    ) -> GovconResult<Vec<ResourceAvailability>> {
        let url = self
            .url(CONTRACTS)
            .append_path(&format!("{}/available-resources", id))
            .with_filter(&AvailabilityFilter {
                min_available_percentage,
            });
        self.get(url).await
    }

    async fn burn_rate(&self, id: &ContractId) -> GovconResult<ContractBurnRate> {
        self.get(self.url(CONTRACTS).append_path(&format!("{}/burn-rate", id)))
            .await
    }

    async fn list_resources(&self, filters: &ResourceFilters) -> GovconResult<Vec<Resource>> {
        self.get(self.url(RESOURCES).with_filter(filters)).await
    }

    async fn get_resource(&self, id: &ResourceId) -> GovconResult<Resource> {
        self.get(self.url(RESOURCES).append_path(id.as_str())).await
    }

    async fn create_resource(&self, resource: &CreateResource) -> GovconResult<Resource> {
        self.fetch(Method::POST, self.url(RESOURCES), Some(resource))
            .await
    }

    async fn update_resource(&self, update: &UpdateResource) -> GovconResult<Resource> {
        let url = self.url(RESOURCES).append_path(update.id.as_str());
        self.fetch(Method::PUT, url, Some(update)).await
    }

    async fn batch_update_resources(
        &self,
        batch: &BatchUpdateResources,
    ) -> GovconResult<Vec<Resource>> {
        let url = self.url(RESOURCES).append_path("batch");
        self.fetch(Method::PUT, url, Some(batch)).await
    }

    async fn terminate_resource(
        &self,
        id: &ResourceId,
        end_date: OffsetDateTime,
    ) -> GovconResult<()> {
        let url = self
            .url(RESOURCES)
            .append_path(&format!("{}/terminate", id));
        self.fetch_without_body(Method::POST, url, Some(&TerminateResource { end_date }))
            .await
    }

    async fn assign_resource_to_contract(
        &self,
        id: &ResourceId,
        contract_id: &ContractId,
    ) -> GovconResult<Resource> {
        let url = self
            .url(RESOURCES)
            .append_path(&format!("{}/assign-contract", id));
        let body = AssignContract {
            contract_id: contract_id.clone(),
        };
        self.fetch(Method::POST, url, Some(&body)).await
    }

    async fn cost_analysis(&self, id: &ResourceId) -> GovconResult<serde_json::Value> {
        self.get(
            self.url(RESOURCES)
                .append_path(&format!("{}/cost-analysis", id)),
        )
        .await
    }

    async fn list_underwater_resources(
        &self,
        contract_id: Option<&ContractId>,
    ) -> GovconResult<Vec<Resource>> {
        let url = self
            .url(RESOURCES)
            .append_path("underwater")
            .with_filter(&UnderwaterFilter {
                contract_id: contract_id.cloned(),
            });
        self.get(url).await
    }

    async fn export_resources(&self, filters: &ResourceFilters) -> GovconResult<Vec<u8>> {
        let url = self
            .url(RESOURCES)
            .append_path("export")
            .with_filter(filters);
        let response = self.send::<()>(Method::GET, &url, None).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GovconError::Parsing(format!("Failed to read export body: {}", e)))?;
        Ok(bytes.to_vec())
    }

    async fn list_lcats(&self) -> GovconResult<Vec<Lcat>> {
        self.get(self.url(LCATS)).await
    }

    async fn get_lcat(&self, id: &LcatId) -> GovconResult<Lcat> {
        self.get(self.url(LCATS).append_path(id.as_str())).await
    }

    async fn create_lcat(&self, lcat: &CreateLcat) -> GovconResult<Lcat> {
        self.fetch(Method::POST, self.url(LCATS), Some(lcat)).await
    }

    async fn batch_update_rates(&self, batch: &BatchUpdateRates) -> GovconResult<()> {
        let url = self.url(LCATS).append_path("batch-update-rates");
        self.fetch_without_body(Method::POST, url, Some(batch)).await
    }

    async fn dashboard_metrics(&self) -> GovconResult<DashboardMetrics> {
        self.get(self.url(DASHBOARD).append_path("metrics")).await
    }

    async fn contract_health(&self) -> GovconResult<Vec<ContractHealthCard>> {
        self.get(self.url(DASHBOARD).append_path("contracts/health"))
            .await
    }

    async fn resource_utilization(&self) -> GovconResult<ResourceUtilizationMetrics> {
        self.get(self.url(DASHBOARD).append_path("resources/utilization"))
            .await
    }

    async fn projections(&self, months: u32) -> GovconResult<FinancialProjections> {
        let url = self
            .url(DASHBOARD)
            .append_path("projections")
            .with_filter(&ProjectionFilter { months });
        self.get(url).await
    }

    async fn alerts(&self) -> GovconResult<Vec<AlertNotification>> {
        self.get(self.url(DASHBOARD).append_path("alerts")).await
    }

    async fn complete_dashboard(&self) -> GovconResult<CompleteDashboard> {
        self.get(self.url(DASHBOARD).append_path("complete")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiLogKind;

    #[test]
    fn error_message_prefers_problem_details() {
        assert_eq!(
            error_message(r#"{"title":"Bad Request","detail":"End date must follow start"}"#),
            "End date must follow start"
        );
        assert_eq!(error_message(r#""Contract not found""#), "Contract not found");
        assert_eq!(error_message("  plain failure \n"), "plain failure");
        assert_eq!(error_message(""), "");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = GovconClient::new(ApiUrl::new("not a url")).unwrap_err();
        assert!(matches!(err, GovconError::Url(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_request_error() {
        // Port 9 (discard) is never served locally.
        let client = GovconClient::new(ApiUrl::new("http://127.0.0.1:9")).unwrap();
        let err = client.list_contracts().await.unwrap_err();

        assert!(matches!(err, GovconError::Request(_)));
        assert_eq!(
            err.user_message("Failed to load contracts"),
            "Failed to load contracts"
        );

        let entries = client.api_log().recent(10);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, ApiLogKind::Error);
        assert_eq!(entries[1].kind, ApiLogKind::Request);
        assert_eq!(entries[1].url, "http://127.0.0.1:9/api/Contract");
        assert_eq!(client.api_log().stats().errors, 1);
    }

    /// Serve one canned HTTP response on a loopback port and return its base URL.
    async fn serve_once(response: &'static str) -> ApiUrl {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        ApiUrl::new(format!("http://{}", addr))
    }

    #[tokio::test]
    async fn bare_404_names_the_missing_resource() {
        let base = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let client = GovconClient::new(base).unwrap();
        let err = client
            .get_contract(&ContractId::new("c-404"))
            .await
            .unwrap_err();

        assert!(matches!(&err, GovconError::NotFound(what) if what == "Contract"));
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.user_message("Failed to load contract"),
            "Contract not found"
        );
        assert!(err.hint().is_some());
        assert_eq!(client.api_log().stats().errors, 1);
    }

    #[tokio::test]
    async fn not_found_with_a_body_keeps_the_server_text() {
        let base = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Type: application/json\r\nContent-Length: 19\r\nConnection: close\r\n\r\n\"No such labor cat\"",
        )
        .await;
        let client = GovconClient::new(base).unwrap();
        let err = client.get_lcat(&LcatId::new("l-9")).await.unwrap_err();

        assert!(matches!(err, GovconError::Status { status: 404, .. }));
        assert_eq!(err.user_message("Failed to load LCAT"), "No such labor cat");
    }
}

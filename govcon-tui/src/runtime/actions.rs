use crate::api::SharedApi;
use crate::app::{
    App, ConfirmAction, ContractDetail, CostAnalysis, FormState, FormSubmission, View,
};
use govcon::domain::ContractId;
use govcon::{ContractFinanceApi, GovconError};
use std::sync::Arc;
use std::time::Instant;
use time::OffsetDateTime;

use super::action_queue::{Action, ActionTx, DashboardPayload};

pub(super) async fn run_action(
    action: Action,
    app: &mut App,
    api: &SharedApi,
    action_tx: &ActionTx,
) {
    match action {
        Action::LoadDashboard => spawn_dashboard_load(app, api, action_tx),
        Action::DashboardLoaded { generation, result } => {
            apply_dashboard(app, generation, result);
        }
        Action::LoadContracts => load_contracts(app, api).await,
        Action::OpenContract(id) => open_contract(app, api, id).await,
        Action::ReloadContractDetail => reload_detail(app, api).await,
        Action::LoadResources => load_resources(app, api).await,
        Action::LoadLcats => load_lcats(app, api).await,
        Action::OpenNewResourceForm => {
            ensure_lcats(app, api).await;
            let form = FormState::new_resource(&app.lcats, OffsetDateTime::now_utc());
            app.open_form(form);
        }
        Action::OpenEditResourceForm(id) => {
            ensure_lcats(app, api).await;
            let Some(resource) = app.resources.iter().find(|r| r.id == id) else {
                return;
            };
            let form = FormState::edit_resource(resource, &app.lcats);
            app.open_form(form);
        }
        Action::OpenAssignForm(contract_id) => open_assign_form(app, api, contract_id).await,
        Action::LoadCostAnalysis(id) => load_cost_analysis(app, api, id).await,
        Action::SubmitForm => submit_form(app, api).await,
        Action::ConfirmPending => confirm_pending(app, api).await,
        Action::SaveResourceBatch => save_resource_batch(app, api).await,
        Action::SaveRateBatch => save_rate_batch(app, api).await,
    }
}

/// Log a failed call and turn it into the text shown to the user.
fn failure(err: GovconError, fallback: &str) -> String {
    match err.hint() {
        Some(hint) => tracing::warn!(error = %err, hint, "{}", fallback),
        None => tracing::warn!(error = %err, "{}", fallback),
    }
    err.user_message(fallback)
}

fn spawn_dashboard_load(app: &mut App, api: &SharedApi, action_tx: &ActionTx) {
    let generation = app.dashboard.begin_load();
    let api = Arc::clone(api);
    let tx = action_tx.clone();
    let months = app.projection_months;
    tracing::debug!(generation, months, "Loading dashboard");
    let handle = tokio::spawn(async move {
        let result = fetch_dashboard(api.as_ref(), months).await;
        let _ = tx.send(Action::DashboardLoaded { generation, result });
    });
    app.dashboard.track(handle);
}

async fn fetch_dashboard(
    api: &dyn ContractFinanceApi,
    months: u32,
) -> Result<DashboardPayload, String> {
    const FALLBACK: &str = "Failed to load dashboard data";
    let (dashboard, projections) = tokio::join!(api.complete_dashboard(), api.projections(months));
    let dashboard = dashboard.map_err(|e| failure(e, FALLBACK))?;
    let projections = projections.map_err(|e| failure(e, FALLBACK))?;
    Ok((dashboard, projections))
}

fn apply_dashboard(app: &mut App, generation: u64, result: Result<DashboardPayload, String>) {
    if !app.dashboard.accept(generation) {
        tracing::debug!(generation, "Discarding stale dashboard load");
        return;
    }
    match result {
        Ok((data, projections)) => {
            app.dashboard.data = Some(data);
            app.dashboard.projections = Some(projections);
            app.dashboard.error = None;
            app.dashboard.last_loaded = Some(Instant::now());
        }
        Err(message) => app.dashboard.error = Some(message),
    }
}

async fn load_contracts(app: &mut App, api: &SharedApi) {
    match api.list_contracts().await {
        Ok(contracts) => app.set_contracts(contracts),
        Err(e) => {
            let message = failure(e, "Failed to load contracts");
            app.set_status(message);
        }
    }
}

async fn fetch_detail(api: &SharedApi, id: &ContractId) -> Result<ContractDetail, String> {
    let contract = api
        .get_contract(id)
        .await
        .map_err(|e| failure(e, "Failed to load contract"))?;
    let assignments = api
        .contract_resources(id)
        .await
        .map_err(|e| failure(e, "Failed to load assigned resources"))?;
    // A missing burn rate only hides the burn panel.
    let burn = match api.burn_rate(id).await {
        Ok(burn) => Some(burn),
        Err(e) => {
            failure(e, "Failed to load burn rate data");
            None
        }
    };
    Ok(ContractDetail {
        contract,
        assignments,
        burn,
        selected: 0,
    })
}

async fn open_contract(app: &mut App, api: &SharedApi, id: ContractId) {
    match fetch_detail(api, &id).await {
        Ok(detail) => {
            app.detail = Some(detail);
            app.navigate_to(View::ContractDetail);
        }
        Err(message) => app.set_status(message),
    }
}

async fn reload_detail(app: &mut App, api: &SharedApi) {
    let Some(id) = app.detail.as_ref().map(|d| d.contract.id.clone()) else {
        return;
    };
    match fetch_detail(api, &id).await {
        Ok(mut detail) => {
            let previous = app.detail.as_ref().map_or(0, |d| d.selected);
            detail.selected = previous.min(detail.assignments.len().saturating_sub(1));
            app.detail = Some(detail);
        }
        Err(message) => app.set_status(message),
    }
}

async fn load_resources(app: &mut App, api: &SharedApi) {
    match api.list_resources(&app.resource_filters).await {
        Ok(resources) => app.set_resources(resources),
        Err(e) => {
            let message = failure(e, "Failed to load data");
            app.set_status(message);
        }
    }
}

async fn load_lcats(app: &mut App, api: &SharedApi) {
    match api.list_lcats().await {
        Ok(lcats) => app.set_lcats(lcats),
        Err(e) => {
            let message = failure(e, "Failed to load LCATs");
            app.set_status(message);
        }
    }
}

async fn ensure_lcats(app: &mut App, api: &SharedApi) {
    if app.lcats.is_empty() {
        load_lcats(app, api).await;
    }
}

async fn open_assign_form(app: &mut App, api: &SharedApi, contract_id: ContractId) {
    let Some(contract) = app
        .detail
        .as_ref()
        .map(|d| &d.contract)
        .filter(|c| c.id == contract_id)
        .cloned()
    else {
        return;
    };
    match api.available_resources(&contract_id, None).await {
        Ok(available) => {
            let available: Vec<_> = available
                .into_iter()
                .filter(|a| !a.is_fully_allocated)
                .collect();
            let form = FormState::assign_resource(&contract, &available, OffsetDateTime::now_utc());
            app.open_form(form);
        }
        Err(e) => {
            let message = failure(e, "Failed to load available resources");
            app.set_status(message);
        }
    }
}

async fn load_cost_analysis(app: &mut App, api: &SharedApi, id: govcon::domain::ResourceId) {
    let title = app
        .resources
        .iter()
        .find(|r| r.id == id)
        .map(|r| r.full_name.clone())
        .unwrap_or_else(|| id.to_string());
    match api.cost_analysis(&id).await {
        Ok(value) => app.cost_analysis = Some(CostAnalysis::from_json(id, title, &value)),
        Err(e) => {
            let message = failure(e, "Failed to load cost analysis");
            app.set_status(message);
        }
    }
}

/// Reload whatever list the current view shows after a mutation.
async fn reload_current_view(app: &mut App, api: &SharedApi) {
    match app.current_view {
        View::Contracts => load_contracts(app, api).await,
        View::ContractDetail => reload_detail(app, api).await,
        View::Resources => load_resources(app, api).await,
        View::Lcats => load_lcats(app, api).await,
        View::Dashboard | View::ApiLog => {}
    }
}

async fn submit_form(app: &mut App, api: &SharedApi) {
    if app.submitting {
        app.set_status("Still saving, please wait");
        return;
    }
    let Some(form) = app.form.as_mut() else {
        return;
    };
    let submission = match form.validate() {
        Ok(submission) => submission,
        Err(message) => {
            form.error = Some(message);
            return;
        }
    };

    app.submitting = true;
    let outcome = send_submission(submission, app, api).await;
    app.submitting = false;

    match outcome {
        Ok(message) => {
            app.close_form();
            app.set_status(message);
            reload_current_view(app, api).await;
        }
        Err(message) => {
            if let Some(form) = app.form.as_mut() {
                form.error = Some(message);
            }
        }
    }
}

async fn send_submission(
    submission: FormSubmission,
    app: &mut App,
    api: &SharedApi,
) -> Result<String, String> {
    match submission {
        FormSubmission::CreateContract(contract) => api
            .create_contract(&contract)
            .await
            .map(|c| format!("Contract {} created", c.contract_number))
            .map_err(|e| failure(e, "Failed to create contract")),
        FormSubmission::UpdateFunding(id, funding) => api
            .update_funding(&id, &funding)
            .await
            .map(|_| format!("Funding updated ({})", funding.modification_number))
            .map_err(|e| failure(e, "Failed to update funding")),
        FormSubmission::CreateResource(resource) => api
            .create_resource(&resource)
            .await
            .map(|_| "Resource created successfully".to_string())
            .map_err(|e| {
                let message = failure(e, "unknown error");
                format!("Failed to create resource: {}", message)
            }),
        FormSubmission::UpdateResource(update) => api
            .update_resource(&update)
            .await
            .map(|r| format!("{} updated", r.full_name))
            .map_err(|e| failure(e, "Failed to update resource")),
        FormSubmission::TerminateResource(id, end_date) => api
            .terminate_resource(&id, end_date)
            .await
            .map(|_| "Resource terminated".to_string())
            .map_err(|e| failure(e, "Failed to terminate resource")),
        FormSubmission::CreateLcat(lcat) => api
            .create_lcat(&lcat)
            .await
            .map(|l| format!("LCAT {} created", l.name))
            .map_err(|e| failure(e, "Failed to create LCAT")),
        FormSubmission::AssignResource(contract_id, assignment) => api
            .assign_resource(&contract_id, &assignment)
            .await
            .map(|_| "Resource assigned successfully".to_string())
            .map_err(|e| failure(e, "Failed to assign resource")),
        FormSubmission::UpdateAssignment(contract_id, resource_id, update) => api
            .update_assignment(&contract_id, &resource_id, &update)
            .await
            .map(|_| "Assignment updated".to_string())
            .map_err(|e| failure(e, "Failed to update allocation")),
        FormSubmission::RemoveAssignment(contract_id, resource_id, end_date) => api
            .remove_resource(&contract_id, &resource_id, end_date)
            .await
            .map(|_| "Resource removed successfully".to_string())
            .map_err(|e| failure(e, "Failed to remove resource")),
        FormSubmission::StageResourceRate(id, rate) => {
            app.stage_resource_rate(id, rate);
            Ok(format!(
                "{} pending change(s), press s to save",
                app.pending_resource_rates.len()
            ))
        }
        FormSubmission::StageLcatRates(id, published, bill) => {
            app.stage_lcat_rates(id, published, bill);
            Ok(format!(
                "{} pending change(s), press s to save",
                app.pending_lcat_rates.len()
            ))
        }
    }
}

async fn confirm_pending(app: &mut App, api: &SharedApi) {
    let Some(confirm) = app.confirm.take() else {
        return;
    };
    let result = match &confirm.action {
        ConfirmAction::ActivateContract(id) => api
            .activate_contract(id)
            .await
            .map(|_| "Contract activated")
            .map_err(|e| failure(e, "Failed to activate contract")),
        ConfirmAction::CloseContract(id) => api
            .close_contract(id)
            .await
            .map(|_| "Contract closed")
            .map_err(|e| failure(e, "Failed to close contract")),
        ConfirmAction::DeleteContract(id) => {
            let result = api
                .delete_contract(id)
                .await
                .map(|_| "Contract deleted")
                .map_err(|e| failure(e, "Failed to delete contract"));
            if result.is_ok() && app.current_view == View::ContractDetail {
                app.detail = None;
                app.navigate_to(View::Contracts);
            }
            result
        }
        ConfirmAction::DiscardPendingEdits => {
            app.discard_pending_edits();
            Ok("Pending edits discarded")
        }
    };
    match result {
        Ok(message) => {
            app.set_status(message);
            reload_current_view(app, api).await;
        }
        Err(message) => app.set_status(message),
    }
}

async fn save_resource_batch(app: &mut App, api: &SharedApi) {
    if app.submitting {
        return;
    }
    let Some(batch) = app.resource_batch(OffsetDateTime::now_utc()) else {
        app.set_status("No pending rate changes");
        return;
    };
    app.submitting = true;
    let result = api.batch_update_resources(&batch).await;
    app.submitting = false;
    match result {
        Ok(updated) => {
            app.pending_resource_rates.clear();
            tracing::info!(count = updated.len(), "Saved resource rate batch");
            app.set_status("Resources updated successfully");
            load_resources(app, api).await;
        }
        // Staged edits are kept so the batch can be retried.
        Err(e) => {
            let message = failure(e, "Failed to update resources");
            app.set_status(message);
        }
    }
}

async fn save_rate_batch(app: &mut App, api: &SharedApi) {
    if app.submitting {
        return;
    }
    let Some(batch) = app.rate_batch(OffsetDateTime::now_utc()) else {
        app.set_status("No pending rate changes");
        return;
    };
    app.submitting = true;
    let result = api.batch_update_rates(&batch).await;
    app.submitting = false;
    match result {
        Ok(()) => {
            app.pending_lcat_rates.clear();
            tracing::info!(count = batch.rate_updates.len(), "Saved LCAT rate batch");
            app.set_status("Rates updated successfully");
            load_lcats(app, api).await;
        }
        Err(e) => {
            let message = failure(e, "Failed to update rates");
            app.set_status(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DevBackend;
    use crate::app::test_support::app;
    use govcon::domain::{ContractStatus, ResourceId};
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use super::super::action_queue::channel;

    fn dev_api() -> SharedApi {
        Arc::new(DevBackend::at(datetime!(2025-06-01 12:00:00 UTC)))
    }

    #[tokio::test]
    async fn dashboard_load_round_trips_through_the_queue() {
        let api = dev_api();
        let (tx, mut rx) = channel();
        let mut app = app();

        run_action(Action::LoadDashboard, &mut app, &api, &tx).await;
        let loaded = rx.recv().await.unwrap();
        assert!(matches!(loaded, Action::DashboardLoaded { .. }));
        run_action(loaded, &mut app, &api, &tx).await;

        let data = app.dashboard.data.as_ref().unwrap();
        assert_eq!(data.metrics.active_contracts, 3);
        assert_eq!(app.dashboard.projections.as_ref().unwrap().months_projected, 12);
        assert!(app.dashboard.error.is_none());
    }

    #[tokio::test]
    async fn results_arriving_after_leaving_the_dashboard_are_dropped() {
        let api = dev_api();
        let mut app = app();
        let stale = app.dashboard.begin_load();
        let payload = fetch_dashboard(api.as_ref(), 3).await.unwrap();

        app.navigate_to(View::Contracts);
        apply_dashboard(&mut app, stale, Ok(payload));
        assert!(app.dashboard.data.is_none());
    }

    #[tokio::test]
    async fn server_rejection_stays_in_the_form() {
        let api = dev_api();
        let (tx, _rx) = channel();
        let mut app = app();
        app.navigate_to(View::Contracts);

        let mut form = FormState::new_contract(datetime!(2025-06-01 00:00:00 UTC));
        for field in form.fields.iter_mut() {
            let value = match field.label {
                // Already used by the seeded data
                "Contract number" => "W91CRB-24-C-0012",
                "Contract name" => "Duplicate",
                "Total value" => "1000",
                "Funded value" => "500",
                _ => continue,
            };
            field.input = crate::app::TextInput::with_value(value);
        }
        app.open_form(form);

        run_action(Action::SubmitForm, &mut app, &api, &tx).await;
        let form = app.form.as_ref().expect("form stays open");
        assert!(form.error.as_deref().unwrap().contains("already exists"));
        assert!(!app.submitting);
    }

    #[tokio::test]
    async fn activating_a_draft_reloads_the_detail() {
        let api = dev_api();
        let (tx, _rx) = channel();
        let mut app = app();
        let draft = ContractId::new("c-4");

        run_action(Action::OpenContract(draft.clone()), &mut app, &api, &tx).await;
        assert_eq!(app.current_view, View::ContractDetail);
        app.open_confirm(
            ConfirmAction::ActivateContract(draft),
            "Activate contract?",
            String::new(),
        );
        run_action(Action::ConfirmPending, &mut app, &api, &tx).await;

        let detail = app.detail.as_ref().unwrap();
        assert_eq!(detail.contract.status, ContractStatus::Active);
        assert_eq!(app.status_message.as_deref(), Some("Contract activated"));
    }

    #[tokio::test]
    async fn saving_staged_rates_clears_them() {
        let api = dev_api();
        let (tx, _rx) = channel();
        let mut app = app();
        app.navigate_to(View::Resources);
        run_action(Action::LoadResources, &mut app, &api, &tx).await;

        app.stage_resource_rate(ResourceId::new("r-1"), dec!(99));
        run_action(Action::SaveResourceBatch, &mut app, &api, &tx).await;

        assert!(app.pending_resource_rates.is_empty());
        let saved = app.resources.iter().find(|r| r.id.as_str() == "r-1").unwrap();
        assert_eq!(saved.hourly_rate, dec!(99));
        assert_eq!(
            app.status_message.as_deref(),
            Some("Resources updated successfully")
        );
    }
}

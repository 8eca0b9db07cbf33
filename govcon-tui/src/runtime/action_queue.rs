use govcon::domain::{CompleteDashboard, ContractId, FinancialProjections, ResourceId};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub(super) type DashboardPayload = (CompleteDashboard, FinancialProjections);

#[derive(Debug, Clone)]
pub(super) enum Action {
    LoadDashboard,
    DashboardLoaded {
        generation: u64,
        result: Result<DashboardPayload, String>,
    },
    LoadContracts,
    OpenContract(ContractId),
    ReloadContractDetail,
    LoadResources,
    LoadLcats,
    OpenNewResourceForm,
    OpenEditResourceForm(ResourceId),
    OpenAssignForm(ContractId),
    LoadCostAnalysis(ResourceId),
    SubmitForm,
    ConfirmPending,
    SaveResourceBatch,
    SaveRateBatch,
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}

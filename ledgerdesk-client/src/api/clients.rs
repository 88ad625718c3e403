//! Clients: buyers whose balance is tracked as pending amount and profit/loss

use super::{EntityResource, LedgerApi};
use ledgerdesk_core::{
    validation_error, Client, ClientCalculation, ClientPanelEntry, ClientRecordDetails,
    ClientTransaction, ClientUpdate, LedgerResult, NewClient,
};
use tracing::info;

pub struct Clients;

impl EntityResource for Clients {
    type Record = Client;
    type Metrics = ClientCalculation;
    type NewRecord = NewClient;
    type Transaction = ClientTransaction;
    type RecordDetails = ClientRecordDetails;
    type PanelEntry = ClientPanelEntry;

    const LABEL: &'static str = "Client";
    const SINGULAR: &'static str = "client";
    const PLURAL: &'static str = "clients";

    fn record_id(record: &Client) -> i64 {
        record.id
    }

    fn fallback_metrics() -> ClientCalculation {
        ClientCalculation {
            pending_amount: 0.0,
            profit_loss_total: 0.0,
            status: "N/A".to_string(),
            ..Default::default()
        }
    }
}

impl LedgerApi {
    pub async fn update_client(&self, id: i64, update: &ClientUpdate) -> LedgerResult<Client> {
        if update.is_empty() {
            return Err(validation_error!(
                "Nothing to update",
                "client_update",
                "ledger_api"
            ));
        }
        info!(client_id = id, "Updating client");
        let path = self.entity_path::<Clients>(id, "update")?;
        self.gateway().put(&path, update).await
    }
}

//! Backend operations shared by every entity type

use super::{EntityResource, Gateway};
use crate::session::SessionManager;
use ledgerdesk_core::{
    AdminAccount, AdminCredentials, DashboardSummary, LedgerResult, LoginResponse, PendingAmount,
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct LedgerApi {
    gateway: Gateway,
}

impl LedgerApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        self.gateway.session()
    }

    /// `admin/{uuid}` for the signed-in admin.
    pub(crate) fn admin_scope(&self) -> LedgerResult<String> {
        let session = self.session().require_session()?;
        Ok(format!("admin/{}", session.admin.uuid))
    }

    pub(crate) fn entity_path<R: EntityResource>(&self, id: i64, action: &str) -> LedgerResult<String> {
        Ok(format!(
            "{}/{}/{}/{}",
            self.admin_scope()?,
            R::SINGULAR,
            id,
            action
        ))
    }

    pub async fn register_admin(&self, credentials: &AdminCredentials) -> LedgerResult<AdminAccount> {
        info!(name = %credentials.name, "Registering admin");
        self.gateway.post_public("register_admin", credentials).await
    }

    pub async fn login_admin(&self, credentials: &AdminCredentials) -> LedgerResult<LoginResponse> {
        info!(name = %credentials.name, "Logging in admin");
        self.gateway.post_public("login_admin", credentials).await
    }

    pub async fn dashboard(&self) -> LedgerResult<DashboardSummary> {
        let session = self.session().require_session()?;
        self.gateway
            .get(&format!("dashboard/{}", session.admin.uuid))
            .await
    }

    pub async fn list<R: EntityResource>(&self) -> LedgerResult<Vec<R::Record>> {
        let path = format!("{}/{}", self.admin_scope()?, R::PLURAL);
        self.gateway.get(&path).await
    }

    pub async fn pending_total<R: EntityResource>(&self) -> LedgerResult<PendingAmount> {
        let path = format!("{}/final_{}_pending_amount", self.admin_scope()?, R::PLURAL);
        self.gateway.get(&path).await
    }

    pub async fn metrics<R: EntityResource>(&self, id: i64) -> LedgerResult<R::Metrics> {
        let path = self.entity_path::<R>(id, "calculate_record_details")?;
        self.gateway.get(&path).await
    }

    pub async fn create<R: EntityResource>(&self, record: &R::NewRecord) -> LedgerResult<R::Record> {
        let path = format!("{}/add_{}", self.admin_scope()?, R::SINGULAR);
        self.gateway.post(&path, record).await
    }

    pub async fn add_transaction<R: EntityResource>(
        &self,
        id: i64,
        transaction: &R::Transaction,
    ) -> LedgerResult<serde_json::Value> {
        let path = self.entity_path::<R>(id, "add_record")?;
        self.gateway.post(&path, transaction).await
    }

    pub async fn record_details<R: EntityResource>(&self, id: i64) -> LedgerResult<R::RecordDetails> {
        let path = self.entity_path::<R>(id, "record_details")?;
        self.gateway.get(&path).await
    }

    pub async fn panel_names<R: EntityResource>(&self) -> LedgerResult<Vec<R::PanelEntry>> {
        let path = format!("{}/{}_panel_names", self.admin_scope()?, R::SINGULAR);
        self.gateway.get(&path).await
    }
}

//! Users and clients pages
//!
//! Both pages share one controller: list with per-row metrics, add, record
//! a transaction, view records and the sidebar panel. The user-only status
//! toggle and the client-only update live in their own impl blocks.

use super::Page;
use crate::context::ConsoleContext;
use crate::enrich::{enrich_rows, Enriched};
use crate::render::{self, RenderEntity};
use crate::view::{Modal, Region};
use async_trait::async_trait;
use ledgerdesk_client::{Clients, EntityResource, Route, Users};
use ledgerdesk_core::{Client, ClientUpdate, LedgerResult, User};
use std::marker::PhantomData;
use tracing::{debug, info};

/// An entity type that has its own console page.
pub trait ConsoleEntity: RenderEntity {
    const ROUTE: Route;
}

impl ConsoleEntity for Users {
    const ROUTE: Route = Route::Users;
}

impl ConsoleEntity for Clients {
    const ROUTE: Route = Route::Clients;
}

pub struct EntityPage<R: ConsoleEntity> {
    ctx: ConsoleContext,
    _entity: PhantomData<fn() -> R>,
}

pub type UsersPage = EntityPage<Users>;
pub type ClientsPage = EntityPage<Clients>;

impl<R: ConsoleEntity> EntityPage<R> {
    pub fn new(ctx: ConsoleContext) -> Self {
        Self {
            ctx,
            _entity: PhantomData,
        }
    }

    pub fn context(&self) -> &ConsoleContext {
        &self.ctx
    }

    /// Full page load: header, pending total, then the enriched table.
    pub async fn refresh(&self) -> LedgerResult<Vec<Enriched<R>>> {
        let session = self.ctx.session().require_session()?;
        let view = self.ctx.view();
        view.render(Region::Header, render::render_welcome(&session.admin));

        let fallback = format!("Failed to load {}", R::PLURAL);
        let api = self.ctx.api();

        let pending = self
            .ctx
            .reported(api.pending_total::<R>().await, &fallback)?;
        view.render(
            Region::PendingTotal,
            render::render_pending_total(pending.total_pending),
        );

        let records = self.ctx.reported(api.list::<R>().await, &fallback)?;
        let rows = self
            .ctx
            .reported(enrich_rows::<R>(api, records).await, &fallback)?;

        debug!(
            entity = R::PLURAL,
            rows = rows.len(),
            fallbacks = rows.iter().filter(|r| r.fallback).count(),
            "Rendering table"
        );
        view.render(Region::EntityTable, render::render_table(&rows));
        Ok(rows)
    }

    /// Reload after a mutation. Failures are already on screen.
    async fn reload(&self) {
        if let Err(e) = self.refresh().await {
            debug!(entity = R::PLURAL, error = %e, "Reload after mutation failed");
        }
    }

    pub fn open_add_form(&self) {
        self.ctx.view().open_modal(Modal::AddRecord);
    }

    pub fn open_transaction_form(&self) {
        self.ctx.view().open_modal(Modal::AddTransaction);
    }

    pub async fn submit_new(&self, record: &R::NewRecord) -> LedgerResult<R::Record> {
        let created = self.ctx.reported(
            self.ctx.api().create::<R>(record).await,
            &format!("Failed to add {}", R::SINGULAR),
        )?;

        info!(entity = R::SINGULAR, id = R::record_id(&created), "Created");
        self.ctx.view().close_modal(Modal::AddRecord);
        self.ctx
            .notify_success(&format!("{} added successfully", R::LABEL));
        self.reload().await;
        Ok(created)
    }

    pub async fn submit_transaction(&self, id: i64, transaction: &R::Transaction) -> LedgerResult<()> {
        self.ctx.reported(
            self.ctx.api().add_transaction::<R>(id, transaction).await,
            "Failed to add transaction",
        )?;

        info!(entity = R::SINGULAR, id, "Transaction recorded");
        self.ctx.view().close_modal(Modal::AddTransaction);
        self.ctx.notify_success("Transaction added successfully");
        self.reload().await;
        Ok(())
    }

    pub async fn view_records(&self, id: i64) -> LedgerResult<R::RecordDetails> {
        let details = self.ctx.reported(
            self.ctx.api().record_details::<R>(id).await,
            "Failed to load records",
        )?;

        let view = self.ctx.view();
        view.render(Region::Records, R::render_record_details(&details));
        view.open_modal(Modal::RecordDetails);
        Ok(details)
    }

    pub async fn load_panel(&self) -> LedgerResult<Vec<R::PanelEntry>> {
        let entries = self.ctx.reported(
            self.ctx.api().panel_names::<R>().await,
            &format!("Failed to load {} names", R::SINGULAR),
        )?;

        self.ctx
            .view()
            .render(Region::Panel, render::render_panel::<R>(&entries));
        Ok(entries)
    }
}

impl EntityPage<Users> {
    pub async fn toggle_status(&self, user: &User) -> LedgerResult<Option<User>> {
        self.set_status(user.id, !user.is_active).await
    }

    /// Enable or disable a user after confirmation. Declining sends nothing
    /// and returns `Ok(None)`.
    pub async fn set_status(&self, id: i64, active: bool) -> LedgerResult<Option<User>> {
        let action = if active { "enable" } else { "disable" };
        if !self
            .ctx
            .view()
            .confirm(&format!("Are you sure you want to {} this user?", action))
        {
            debug!(id, action, "Status change declined");
            return Ok(None);
        }

        let user = self.ctx.reported(
            self.ctx.api().set_user_active(id, active).await,
            &format!("Failed to {} user", action),
        )?;

        self.ctx
            .notify_success(&format!("User {}d successfully", action));
        self.reload().await;
        Ok(Some(user))
    }
}

impl EntityPage<Clients> {
    pub fn open_update_form(&self) {
        self.ctx.view().open_modal(Modal::UpdateRecord);
    }

    pub async fn submit_update(&self, id: i64, update: &ClientUpdate) -> LedgerResult<Client> {
        let client = self.ctx.reported(
            self.ctx.api().update_client(id, update).await,
            "Failed to update client",
        )?;

        self.ctx.view().close_modal(Modal::UpdateRecord);
        self.ctx.notify_success("Client updated successfully");
        self.reload().await;
        Ok(client)
    }
}

#[async_trait]
impl<R: ConsoleEntity> Page for EntityPage<R> {
    fn route(&self) -> Route {
        R::ROUTE
    }

    async fn load(&self) -> LedgerResult<()> {
        self.refresh().await.map(|_| ())
    }
}

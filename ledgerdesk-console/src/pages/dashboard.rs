//! Dashboard: summary counters and the most recent users and clients

use super::Page;
use crate::context::ConsoleContext;
use crate::render;
use crate::view::Region;
use async_trait::async_trait;
use ledgerdesk_client::Route;
use ledgerdesk_core::{DashboardSummary, LedgerResult};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

pub struct DashboardPage {
    ctx: ConsoleContext,
}

impl DashboardPage {
    pub fn new(ctx: ConsoleContext) -> Self {
        Self { ctx }
    }

    pub async fn refresh(&self) -> LedgerResult<DashboardSummary> {
        let session = self.ctx.session().require_session()?;
        self.ctx
            .view()
            .render(Region::Header, render::render_welcome(&session.admin));

        let summary = self.ctx.reported(
            self.ctx.api().dashboard().await,
            "Failed to load dashboard data",
        )?;

        let view = self.ctx.view();
        view.render(Region::Stats, render::render_dashboard_stats(&summary));
        view.render(
            Region::RecentUsers,
            render::render_recent_users(&summary.recent_users),
        );
        view.render(
            Region::RecentClients,
            render::render_recent_clients(&summary.recent_clients),
        );
        Ok(summary)
    }

    /// Reload on the configured interval until the session ends.
    pub async fn watch<F>(&self, max_refreshes: Option<usize>, on_refresh: F) -> LedgerResult<usize>
    where
        F: FnMut(&DashboardSummary),
    {
        let period = Duration::from_secs(self.ctx.config().dashboard.refresh_interval_secs);
        self.watch_every(period, max_refreshes, on_refresh).await
    }

    /// Reload every `period`, starting immediately, calling `on_refresh`
    /// after each successful load.
    ///
    /// Transient failures are shown and the next tick retries; an auth
    /// failure ends the loop. Returns how many loads were attempted.
    pub async fn watch_every<F>(
        &self,
        period: Duration,
        max_refreshes: Option<usize>,
        mut on_refresh: F,
    ) -> LedgerResult<usize>
    where
        F: FnMut(&DashboardSummary),
    {
        let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut attempts = 0;
        loop {
            ticker.tick().await;
            attempts += 1;

            match self.refresh().await {
                Ok(summary) => on_refresh(&summary),
                Err(e) if e.is_auth_failure() => {
                    info!(attempts, "Session ended, dashboard refresh stopped");
                    return Err(e);
                }
                Err(e) => debug!(error = %e, "Dashboard refresh failed, retrying on next tick"),
            }

            if max_refreshes.is_some_and(|max| attempts >= max) {
                return Ok(attempts);
            }
        }
    }
}

#[async_trait]
impl Page for DashboardPage {
    fn route(&self) -> Route {
        Route::Dashboard
    }

    async fn load(&self) -> LedgerResult<()> {
        self.refresh().await.map(|_| ())
    }
}

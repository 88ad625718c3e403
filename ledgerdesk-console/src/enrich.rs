//! Per-row metric enrichment
//!
//! A list page shows one derived metric next to every record. The metrics
//! come from one request per row, all issued at once and joined before the
//! table is rendered. A row whose request fails keeps its place and gets the
//! entity's zero-valued fallback instead.

use futures::future::join_all;
use ledgerdesk_client::{EntityResource, LedgerApi};
use ledgerdesk_core::LedgerResult;
use tracing::{debug, warn};

/// A record with the metrics shown next to it.
pub struct Enriched<R: EntityResource> {
    pub record: R::Record,
    pub metrics: R::Metrics,
    /// True when `metrics` is the fallback rather than a backend answer
    pub fallback: bool,
}

impl<R: EntityResource> Clone for Enriched<R> {
    fn clone(&self) -> Self {
        Self {
            record: self.record.clone(),
            metrics: self.metrics.clone(),
            fallback: self.fallback,
        }
    }
}

impl<R: EntityResource> std::fmt::Debug for Enriched<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enriched")
            .field("record", &self.record)
            .field("metrics", &self.metrics)
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Fetch metrics for every record concurrently, keeping list order.
///
/// Returns `Err` only when a row was rejected as unauthenticated; the
/// session is cleared by then and nothing should be rendered.
pub async fn enrich_rows<R: EntityResource>(
    api: &LedgerApi,
    records: Vec<R::Record>,
) -> LedgerResult<Vec<Enriched<R>>> {
    debug!(entity = R::PLURAL, count = records.len(), "Fetching row metrics");

    let results = join_all(
        records
            .iter()
            .map(|record| api.metrics::<R>(R::record_id(record))),
    )
    .await;

    let mut rows = Vec::with_capacity(records.len());
    for (record, result) in records.into_iter().zip(results) {
        match result {
            Ok(metrics) => rows.push(Enriched {
                record,
                metrics,
                fallback: false,
            }),
            Err(e) if e.is_auth_failure() => return Err(e),
            Err(e) => {
                warn!(
                    entity = R::SINGULAR,
                    id = R::record_id(&record),
                    error = %e,
                    "Metrics unavailable, using fallback"
                );
                rows.push(Enriched {
                    record,
                    metrics: R::fallback_metrics(),
                    fallback: true,
                });
            }
        }
    }

    Ok(rows)
}

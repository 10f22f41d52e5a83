use std::sync::Arc;

use tracing::{info, instrument, warn};

use pulse_core::ids::LeadId;
use pulse_core::lead::Lead;
use pulse_notify::Notifier;
use pulse_store::LeadRepo;
use pulse_telemetry::MetricsRecorder;

use crate::error::EngineError;

/// Dispatcher wiring that is not a collaborator: where alerts go and
/// where the dossier lives.
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    pub officer_address: String,
    pub dashboard_url: String,
}

/// Result of one dispatch invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The alert went out and the lead is now processing.
    Sent { lead_id: LeadId },
    /// No lead in `new` status. Normal termination, not an error.
    EmptyQueue,
    /// A concurrent dispatcher claimed the top lead first.
    Raced,
}

/// Selects the single highest-priority unprocessed lead, alerts the
/// officer, and transitions the lead so it is never re-notified.
pub struct Dispatcher {
    repo: LeadRepo,
    notifier: Arc<dyn Notifier>,
    config: DispatcherConfig,
    metrics: MetricsRecorder,
}

impl Dispatcher {
    pub fn new(
        repo: LeadRepo,
        notifier: Arc<dyn Notifier>,
        config: DispatcherConfig,
        metrics: MetricsRecorder,
    ) -> Self {
        Self { repo, notifier, config, metrics }
    }

    /// One dispatch run.
    ///
    /// The claim happens BEFORE the send: the conditional `new ->
    /// processing` update is the only thing standing between two
    /// concurrent dispatchers and a double alert, so whoever loses it
    /// backs off without sending. A failed delivery releases the claim
    /// so the lead stays retryable.
    #[instrument(skip(self))]
    pub async fn dispatch_next(&self) -> Result<DispatchOutcome, EngineError> {
        let Some(lead) = self.repo.top_new()? else {
            info!("no new leads; queue is empty");
            return Ok(DispatchOutcome::EmptyQueue);
        };

        if !self.repo.claim(&lead.id)? {
            warn!(lead_id = %lead.id, "lost claim to a concurrent dispatcher");
            self.metrics.increment("dispatch_raced", 1);
            return Ok(DispatchOutcome::Raced);
        }

        let body = self.render_alert(&lead);
        match self.notifier.send(&self.config.officer_address, &body).await {
            Ok(()) => {
                info!(lead_id = %lead.id, company = %lead.normalized_company, "alert sent");
                self.metrics.increment("dispatch_sent", 1);
                Ok(DispatchOutcome::Sent { lead_id: lead.id })
            }
            Err(err) => {
                warn!(lead_id = %lead.id, kind = err.error_kind(), error = %err,
                    "delivery failed; releasing lead");
                self.metrics.increment("dispatch_failed", 1);
                self.repo.release(&lead.id)?;
                Err(err.into())
            }
        }
    }

    /// Render the officer-facing alert payload.
    pub fn render_alert(&self, lead: &Lead) -> String {
        format!(
            "PULSE: TOP PRIORITY\n\n\
             Entity: {}\n\
             Product: {}\n\
             Reason: {}\n\
             Priority: {:.1}\n\
             Site: {}\n\n\
             Review & Action:\n{}/dossier/{}",
            lead.normalized_company,
            lead.recommended_product,
            lead.reason,
            lead.priority_score,
            lead.location,
            self.config.dashboard_url.trim_end_matches('/'),
            lead.id,
        )
    }
}

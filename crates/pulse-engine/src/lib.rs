//! Signal-to-product inference and prioritization.
//!
//! This crate holds the parts of Pulse that are actually interesting:
//! the sector [`rules`] registry, the [`matcher`] that turns free text
//! into a product recommendation with an auditable reason, the
//! [`enrich`] stage that validates and scores leads, the synthetic
//! [`generate`] corpus, and the [`dispatch`] orchestration that alerts
//! an officer about the top-priority lead.

pub mod dispatch;
pub mod enrich;
pub mod error;
pub mod generate;
pub mod matcher;
pub mod rules;

pub use dispatch::{DispatchOutcome, Dispatcher, DispatcherConfig};
pub use enrich::{Enricher, EnrichmentReport, ValidationReject};
pub use error::EngineError;
pub use generate::{lead_from_signal, mock_news_wire, Generator};
pub use matcher::Matcher;
pub use rules::{RuleRegistry, SectorRule};

//! One function per pipeline stage. The composition root in `main`
//! builds the collaborators once and hands them in.

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use pulse_engine::{
    lead_from_signal, mock_news_wire, DispatchOutcome, Dispatcher, Enricher, Generator, Matcher,
};
use pulse_settings::PulseSettings;
use pulse_store::LeadRepo;
use pulse_telemetry::MetricsRecorder;

use crate::csvfile;

/// Urgency/confidence assigned to wire-scanned signals, which carry no
/// scoring of their own.
const WIRE_URGENCY: u8 = 7;
const WIRE_CONFIDENCE: f64 = 9.2;

/// `generate`: synthesize a demo corpus and write it as CSV.
pub fn generate(matcher: Matcher, rows: usize, out: &Path, metrics: &MetricsRecorder) -> Result<()> {
    let mut generator = Generator::new(matcher);
    let leads = generator.generate(rows);
    csvfile::write_leads(out, &leads)?;
    metrics.increment("leads_generated", leads.len() as u64);

    info!(rows = leads.len(), out = %out.display(), "demo corpus written");
    println!("Created '{}' with {} rows.", out.display(), leads.len());
    Ok(())
}

/// `preprocess`: read raw leads, enrich, write the analysis-ready file.
pub fn preprocess(
    input: &Path,
    out: &Path,
    settings: &PulseSettings,
    metrics: &MetricsRecorder,
) -> Result<()> {
    let (raw, row_rejects) = csvfile::read_leads(input)?;
    for reject in &row_rejects {
        warn!(line = reject.line, detail = %reject.detail, "skipping malformed row");
    }

    let enricher = Enricher::new(settings.enrich.trust_threshold);
    let report = enricher.enrich_batch(raw);
    metrics.increment("leads_enriched", report.leads.len() as u64);
    metrics.increment(
        "validation_rejects",
        (report.rejects.len() + row_rejects.len()) as u64,
    );

    csvfile::write_leads(out, &report.leads)?;

    info!(
        enriched = report.leads.len(),
        rejected = report.rejects.len() + row_rejects.len(),
        "preprocessing complete"
    );
    println!(
        "Preprocessing complete. File saved as: {}\nStats: {} verified leads, {} unique entities, {} rejected.",
        out.display(),
        report.verified_count(),
        report.unique_entities(),
        report.rejects.len() + row_rejects.len(),
    );
    Ok(())
}

/// `hunt`: run live inference over the mock news wire and store the
/// resulting leads. Insert failures are per-lead, best effort.
pub fn hunt(
    matcher: &Matcher,
    repo: &LeadRepo,
    settings: &PulseSettings,
    metrics: &MetricsRecorder,
) -> Result<()> {
    let enricher = Enricher::new(settings.enrich.trust_threshold);
    let mut stored = 0usize;

    for signal in mock_news_wire() {
        info!(company = %signal.company_name, "analyzing signal");
        let raw = lead_from_signal(matcher, &signal, WIRE_URGENCY, WIRE_CONFIDENCE);
        let product = raw.recommended_product.clone();

        let lead = match enricher.enrich_lead(raw) {
            Ok(lead) => lead,
            Err(reject) => {
                warn!(%reject, "wire signal failed validation");
                metrics.increment("validation_rejects", 1);
                continue;
            }
        };

        match repo.insert(&lead) {
            Ok(()) => {
                stored += 1;
                metrics.increment("leads_inserted", 1);
                println!("Lead created: {} -> {}", lead.company_name, product);
            }
            Err(e) => warn!(lead_id = %lead.id, error = %e, "insert failed, continuing"),
        }
    }

    println!("Hunt complete: {stored} leads stored.");
    Ok(())
}

/// `restore`: bulk-load a preprocessed CSV into the store.
pub fn restore(input: &Path, repo: &LeadRepo, metrics: &MetricsRecorder) -> Result<()> {
    let (leads, row_rejects) = csvfile::read_leads(input)?;
    for reject in &row_rejects {
        warn!(line = reject.line, detail = %reject.detail, "skipping malformed row");
    }

    let report = repo.insert_batch(&leads)?;
    metrics.increment("leads_inserted", report.inserted as u64);

    info!(
        inserted = report.inserted,
        failed_chunks = report.failed_chunks,
        "restore complete"
    );
    println!(
        "Restore complete: {} rows inserted, {} chunks failed, {} rows malformed.",
        report.inserted,
        report.failed_chunks,
        row_rejects.len()
    );
    Ok(())
}

/// `dispatch`: one alert for the top-priority unprocessed lead.
pub async fn dispatch(dispatcher: &Dispatcher) -> Result<()> {
    match dispatcher.dispatch_next().await? {
        DispatchOutcome::Sent { lead_id } => {
            println!("Alert sent for lead {lead_id}.");
        }
        DispatchOutcome::EmptyQueue => {
            println!("All leads processed. Queue is empty.");
        }
        DispatchOutcome::Raced => {
            println!("Top lead was claimed by another dispatcher. Nothing sent.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_engine::RuleRegistry;
    use pulse_store::Database;

    fn matcher() -> Matcher {
        Matcher::new(RuleRegistry::builtin())
    }

    fn tmp(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("pulse-cmd-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn generate_then_preprocess_pipeline() {
        let raw_path = tmp("raw.csv");
        let enriched_path = tmp("enriched.csv");
        let metrics = MetricsRecorder::new();

        generate(matcher(), 40, &raw_path, &metrics).unwrap();
        assert_eq!(metrics.get("leads_generated"), 40);

        let settings = PulseSettings::default();
        preprocess(&raw_path, &enriched_path, &settings, &metrics).unwrap();
        assert_eq!(metrics.get("leads_enriched"), 40);

        let (leads, rejects) = csvfile::read_leads(&enriched_path).unwrap();
        assert!(rejects.is_empty());
        assert_eq!(leads.len(), 40);
        for lead in &leads {
            assert!(!lead.normalized_company.is_empty());
            assert!(lead.priority_score > 0.0);
        }
    }

    #[test]
    fn hunt_stores_wire_leads() {
        let repo = LeadRepo::new(Database::in_memory().unwrap());
        let metrics = MetricsRecorder::new();
        let settings = PulseSettings::default();

        hunt(&matcher(), &repo, &settings, &metrics).unwrap();
        assert_eq!(metrics.get("leads_inserted"), 4);

        let stored = repo.list(None, 10).unwrap();
        assert_eq!(stored.len(), 4);
        let products: Vec<&str> = stored.iter().map(|l| l.recommended_product.as_str()).collect();
        assert!(products.contains(&"Bitumen"));
        // Both the boiler and bunker signals resolve to LDO
        assert_eq!(products.iter().filter(|p| **p == "LDO").count(), 2);
    }

    #[test]
    fn restore_roundtrip_through_store() {
        let raw_path = tmp("restore-raw.csv");
        let enriched_path = tmp("restore-enriched.csv");
        let metrics = MetricsRecorder::new();
        let settings = PulseSettings::default();

        generate(matcher(), 60, &raw_path, &metrics).unwrap();
        preprocess(&raw_path, &enriched_path, &settings, &metrics).unwrap();

        let repo = LeadRepo::new(Database::in_memory().unwrap());
        restore(&enriched_path, &repo, &metrics).unwrap();
        assert_eq!(repo.list(None, 100).unwrap().len(), 60);
    }
}

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use pulse_core::ids::LeadId;
use pulse_core::lead::Lead;

/// Priority formula weights. Confidence is expected on the 0-10 scale;
/// a 0-1 or 0-100 confidence would silently corrupt ranking, which is
/// why enrichment validates the range instead of trusting callers.
const URGENCY_WEIGHT: f64 = 0.6;
const CONFIDENCE_WEIGHT: f64 = 4.0;

const URGENCY_RANGE: std::ops::RangeInclusive<u8> = 1..=10;
const CONFIDENCE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

fn suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(ltd|industries|infra|group|enterprises|corp|limited)\b")
            .expect("suffix regex is valid")
    })
}

/// Strip corporate suffixes and title-case what remains.
///
/// Suffixes are removed as whole words only ("Industries Co" keeps its
/// "Co"). Idempotent: normalizing a normalized name is a no-op.
pub fn normalize_company(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = suffix_regex().replace_all(&lowered, "");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    title_case(&collapsed)
}

/// Capitalize every letter that follows a non-letter, like Python's
/// `str.title()` ("l&t" becomes "L&T").
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() && !prev_alpha {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// Lowercase and trim a snippet for downstream keyword matching.
pub fn clean_text(snippet: &str) -> String {
    snippet.trim().to_lowercase()
}

/// Source governance: trust at or above the threshold is verified.
pub fn is_verified(source_trust: u8, threshold: u8) -> bool {
    source_trust >= threshold
}

/// Composite priority: `urgency * 0.6 + confidence * 4`.
///
/// Unbounded above by design; the result is only used for relative
/// ranking, never shown as a percentage.
pub fn priority_score(urgency: u8, confidence: f64) -> f64 {
    f64::from(urgency) * URGENCY_WEIGHT + confidence * CONFIDENCE_WEIGHT
}

/// A record excluded from a batch, with enough context to diagnose it.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationReject {
    pub lead_id: LeadId,
    pub field: &'static str,
    pub detail: String,
}

impl std::fmt::Display for ValidationReject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lead {}: invalid {}: {}", self.lead_id, self.field, self.detail)
    }
}

/// Output of an enrichment run over one batch.
#[derive(Debug, Default)]
pub struct EnrichmentReport {
    pub leads: Vec<Lead>,
    pub rejects: Vec<ValidationReject>,
}

impl EnrichmentReport {
    pub fn verified_count(&self) -> usize {
        self.leads.iter().filter(|l| l.is_verified).count()
    }

    pub fn unique_entities(&self) -> usize {
        let mut names: Vec<&str> = self.leads.iter().map(|l| l.normalized_company.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }
}

/// Transforms raw lead records into analysis-ready leads.
pub struct Enricher {
    trust_threshold: u8,
}

impl Enricher {
    pub fn new(trust_threshold: u8) -> Self {
        Self { trust_threshold }
    }

    /// Enrich one record: normalize the entity, clean the snippet, flag
    /// verification, and derive the priority score.
    ///
    /// Out-of-scale urgency or confidence rejects the record; a unit
    /// mismatch here would corrupt ranking across the whole queue.
    pub fn enrich_lead(&self, mut lead: Lead) -> Result<Lead, ValidationReject> {
        if !URGENCY_RANGE.contains(&lead.urgency_score) {
            return Err(ValidationReject {
                lead_id: lead.id,
                field: "urgency_score",
                detail: format!("{} outside 1..=10", lead.urgency_score),
            });
        }
        if !lead.confidence_score.is_finite()
            || !CONFIDENCE_RANGE.contains(&lead.confidence_score)
        {
            return Err(ValidationReject {
                lead_id: lead.id,
                field: "confidence_score",
                detail: format!("{} outside 0.0..=10.0", lead.confidence_score),
            });
        }

        lead.normalized_company = normalize_company(&lead.company_name);
        lead.raw_text_snippet = clean_text(&lead.raw_text_snippet);
        lead.is_verified = is_verified(lead.source_trust, self.trust_threshold);
        lead.priority_score = priority_score(lead.urgency_score, lead.confidence_score);
        Ok(lead)
    }

    /// Enrich a batch. Invalid records are reported and excluded; the
    /// rest of the batch continues.
    pub fn enrich_batch(&self, batch: Vec<Lead>) -> EnrichmentReport {
        let mut report = EnrichmentReport::default();
        for lead in batch {
            match self.enrich_lead(lead) {
                Ok(lead) => report.leads.push(lead),
                Err(reject) => {
                    warn!(lead_id = %reject.lead_id, field = reject.field, detail = %reject.detail,
                        "rejecting record at enrichment");
                    report.rejects.push(reject);
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::lead::LeadStatus;

    fn raw_lead(urgency: u8, confidence: f64, trust: u8) -> Lead {
        Lead {
            id: LeadId::new(),
            source_url: "https://industry-news-wire.in/news/signal-0".into(),
            source_trust: trust,
            company_name: "Adani Industries Ltd".into(),
            normalized_company: String::new(),
            industry_sector: "Road Construction".into(),
            location: "Nagpur, MH".into(),
            raw_text_snippet: "  Notice: PAVEMENT resurfacing planned  ".into(),
            extracted_keywords: vec!["tarmac".into()],
            recommended_product: "Bitumen".into(),
            secondary_product: "LDO (Machinery fuel)".into(),
            reason: "Matched cue \"pavement resurfacing\" (Road Construction)".into(),
            confidence_score: confidence,
            urgency_score: urgency,
            priority_score: 0.0,
            is_verified: false,
            next_action: String::new(),
            status: LeadStatus::New,
            created_at: "2026-01-05T00:00:00+00:00".into(),
        }
    }

    // ── normalize_company ───────────────────────────────────────────

    #[test]
    fn strips_corporate_suffixes() {
        assert_eq!(normalize_company("Adani Industries Ltd"), "Adani");
        assert_eq!(normalize_company("UltraTech Corp"), "Ultratech");
        assert_eq!(normalize_company("GMR Infra Limited"), "Gmr");
    }

    #[test]
    fn does_not_strip_substrings_inside_words() {
        // "Industries" is a suffix token but "Industriesco" is not
        assert_eq!(normalize_company("Industriesco"), "Industriesco");
        assert_eq!(normalize_company("Industries Co"), "Co");
    }

    #[test]
    fn normalize_is_idempotent() {
        for name in ["Adani Industries Ltd", "L&T Group", "Jindal Enterprises", "Tata"] {
            let once = normalize_company(name);
            assert_eq!(normalize_company(&once), once, "not idempotent for {name}");
        }
    }

    #[test]
    fn title_case_handles_punctuation() {
        assert_eq!(normalize_company("l&t group"), "L&T");
    }

    // ── clean_text / is_verified / priority_score ───────────────────

    #[test]
    fn clean_text_lowercases_and_trims() {
        assert_eq!(clean_text("  Notice: NHAI Tender  "), "notice: nhai tender");
    }

    #[test]
    fn verified_threshold_boundary() {
        assert!(is_verified(90, 85));
        assert!(is_verified(85, 85));
        assert!(!is_verified(84, 85));
    }

    #[test]
    fn priority_score_known_values() {
        assert_eq!(priority_score(10, 10.0), 46.0);
        assert_eq!(priority_score(0, 0.0), 0.0);
    }

    #[test]
    fn priority_score_monotonic() {
        assert!(priority_score(5, 8.0) < priority_score(6, 8.0));
        assert!(priority_score(5, 8.0) < priority_score(5, 8.5));
    }

    // ── batch enrichment ────────────────────────────────────────────

    #[test]
    fn enrich_derives_all_fields() {
        let enricher = Enricher::new(85);
        let lead = enricher.enrich_lead(raw_lead(8, 9.0, 95)).unwrap();

        assert_eq!(lead.normalized_company, "Adani");
        assert_eq!(lead.raw_text_snippet, "notice: pavement resurfacing planned");
        assert!(lead.is_verified);
        assert_eq!(lead.priority_score, 8.0 * 0.6 + 9.0 * 4.0);
    }

    #[test]
    fn low_trust_not_verified() {
        let enricher = Enricher::new(85);
        let lead = enricher.enrich_lead(raw_lead(8, 9.0, 70)).unwrap();
        assert!(!lead.is_verified);
    }

    #[test]
    fn out_of_scale_urgency_rejected() {
        let enricher = Enricher::new(85);
        let reject = enricher.enrich_lead(raw_lead(0, 9.0, 95)).unwrap_err();
        assert_eq!(reject.field, "urgency_score");

        let reject = enricher.enrich_lead(raw_lead(11, 9.0, 95)).unwrap_err();
        assert_eq!(reject.field, "urgency_score");
    }

    #[test]
    fn unit_mismatch_confidence_rejected() {
        let enricher = Enricher::new(85);
        // A 0-100 scale confidence must not silently pass through
        let reject = enricher.enrich_lead(raw_lead(8, 92.0, 95)).unwrap_err();
        assert_eq!(reject.field, "confidence_score");

        let reject = enricher.enrich_lead(raw_lead(8, f64::NAN, 95)).unwrap_err();
        assert_eq!(reject.field, "confidence_score");
    }

    #[test]
    fn batch_continues_past_rejects() {
        let enricher = Enricher::new(85);
        let batch = vec![raw_lead(8, 9.0, 95), raw_lead(0, 9.0, 95), raw_lead(5, 7.5, 70)];
        let report = enricher.enrich_batch(batch);

        assert_eq!(report.leads.len(), 2);
        assert_eq!(report.rejects.len(), 1);
        assert_eq!(report.verified_count(), 1);
        assert_eq!(report.unique_entities(), 1);
    }
}

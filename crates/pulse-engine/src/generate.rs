use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pulse_core::ids::LeadId;
use pulse_core::lead::{Lead, LeadStatus, Signal};

use crate::matcher::Matcher;

const COMPANIES: &[&str] = &[
    "Adani", "L&T", "Reliance", "Tata", "Jindal", "GMR", "UltraTech", "Birla", "JSW", "Vedanta",
];

const SUFFIXES: &[&str] = &["Industries", "Infra", "Group", "Ltd", "Enterprises"];

const LOCATIONS: &[&str] = &[
    "Nagpur, MH",
    "Kolkata, WB",
    "Visakhapatnam, AP",
    "Jamshedpur, JH",
    "Ahmedabad, GJ",
    "Chennai, TN",
];

struct Source {
    domain: &'static str,
    trust: u8,
}

const SOURCES: &[Source] = &[
    Source { domain: "economictimes.indiatimes.com", trust: 95 },
    Source { domain: "dgft.gov.in/tenders", trust: 98 },
    Source { domain: "industry-news-wire.in", trust: 70 },
];

/// Produces synthetic raw-text signals with consistent text/label pairs.
///
/// Labels come from the SAME matcher that live ingestion uses, so the
/// demo corpus can never disagree with inference.
pub struct Generator {
    matcher: Matcher,
    rng: StdRng,
}

impl Generator {
    pub fn new(matcher: Matcher) -> Self {
        Self {
            matcher,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests.
    pub fn with_seed(matcher: Matcher, seed: u64) -> Self {
        Self {
            matcher,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate `rows` raw leads (pre-enrichment: no normalized name,
    /// no priority score yet).
    pub fn generate(&mut self, rows: usize) -> Vec<Lead> {
        (0..rows).map(|i| self.generate_one(i)).collect()
    }

    fn generate_one(&mut self, index: usize) -> Lead {
        let Self { matcher, rng } = self;

        let registry = matcher.registry();
        let rule_idx = rng.gen_range(0..registry.len());
        let rule = &registry.rules()[rule_idx];
        let cue = rule.cues[rng.gen_range(0..rule.cues.len())].clone();
        let keywords = rule.keywords.clone();

        let company = format!(
            "{} {}",
            COMPANIES[rng.gen_range(0..COMPANIES.len())],
            SUFFIXES[rng.gen_range(0..SUFFIXES.len())],
        );
        let location = LOCATIONS[rng.gen_range(0..LOCATIONS.len())];
        let source = &SOURCES[rng.gen_range(0..SOURCES.len())];

        // Tender signals are time-boxed, so they rank hotter
        let urgency = if cue.contains("tender") {
            rng.gen_range(8..=10)
        } else {
            rng.gen_range(4..=7)
        };
        let confidence = round2(rng.gen_range(7.5..9.8));

        let base = format!("Notice: {company} is initiating a {cue} in {location}.");
        let rec = matcher.infer(&base);
        let raw_text = format!(
            "{base} This development indicates immediate requirement for {}.",
            rec.product
        );

        let created_at = base_date() + Duration::days(rng.gen_range(0..=35));

        Lead {
            id: LeadId::new(),
            source_url: format!("https://{}/news/signal-{index}", source.domain),
            source_trust: source.trust,
            company_name: company,
            normalized_company: String::new(),
            industry_sector: rec.sector.clone(),
            location: location.to_string(),
            raw_text_snippet: raw_text,
            extracted_keywords: keywords,
            recommended_product: rec.product,
            secondary_product: rec.secondary_product,
            reason: rec.reason,
            confidence_score: confidence,
            urgency_score: urgency,
            priority_score: 0.0,
            is_verified: false,
            next_action: String::new(),
            status: LeadStatus::New,
            created_at: created_at.to_rfc3339(),
        }
    }
}

fn base_date() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("fixed base date is valid")
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// The fixed mock news wire scanned by the `hunt` stage.
pub fn mock_news_wire() -> Vec<Signal> {
    vec![
        Signal::new(
            "BuildRight Infra",
            "Won 200km Highway project",
            "Roorkee, Uttarakhand",
            "https://pulse-wire.internal/scan/0",
            75,
        ),
        Signal::new(
            "SteelFlow Ltd",
            "Installing 3 high-capacity furnaces",
            "Surat, Gujarat",
            "https://pulse-wire.internal/scan/1",
            75,
        ),
        Signal::new(
            "Apex Textiles",
            "New boiler unit for steam generation",
            "Ludhiana, Punjab",
            "https://pulse-wire.internal/scan/2",
            75,
        ),
        Signal::new(
            "ShipYard Marine",
            "Expanding bunker fuel storage facility",
            "Kochi, Kerala",
            "https://pulse-wire.internal/scan/3",
            75,
        ),
    ]
}

/// Build a raw lead from a live signal and the matcher's recommendation.
///
/// Urgency and confidence come from the caller; the wire scanner has no
/// per-signal scoring of its own.
pub fn lead_from_signal(matcher: &Matcher, signal: &Signal, urgency: u8, confidence: f64) -> Lead {
    let rec = matcher.infer(&signal.raw_text);
    Lead {
        id: LeadId::new(),
        source_url: signal.source_url.clone(),
        source_trust: signal.source_trust,
        company_name: signal.company_name.clone(),
        normalized_company: String::new(),
        industry_sector: rec.sector.clone(),
        location: signal.location.clone(),
        raw_text_snippet: signal.raw_text.clone(),
        extracted_keywords: Vec::new(),
        next_action: format!(
            "Reach out to procurement regarding {} supply from nearest depot.",
            rec.product
        ),
        recommended_product: rec.product,
        secondary_product: rec.secondary_product,
        reason: rec.reason,
        confidence_score: confidence,
        urgency_score: urgency,
        priority_score: 0.0,
        is_verified: false,
        status: LeadStatus::New,
        created_at: Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleRegistry;

    fn generator(seed: u64) -> Generator {
        Generator::with_seed(Matcher::new(RuleRegistry::builtin()), seed)
    }

    #[test]
    fn generates_requested_rows() {
        let leads = generator(7).generate(50);
        assert_eq!(leads.len(), 50);
    }

    #[test]
    fn labels_agree_with_live_inference() {
        let matcher = Matcher::new(RuleRegistry::builtin());
        for lead in generator(42).generate(100) {
            let rec = matcher.infer(&lead.raw_text_snippet);
            assert_eq!(
                rec.product, lead.recommended_product,
                "label drift for: {}",
                lead.raw_text_snippet
            );
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = generator(9).generate(20);
        let b = generator(9).generate(20);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.company_name, y.company_name);
            assert_eq!(x.raw_text_snippet, y.raw_text_snippet);
            assert_eq!(x.urgency_score, y.urgency_score);
        }
    }

    #[test]
    fn scores_within_declared_scales() {
        for lead in generator(3).generate(200) {
            assert!((1..=10).contains(&lead.urgency_score), "urgency {}", lead.urgency_score);
            assert!(
                (0.0..=10.0).contains(&lead.confidence_score),
                "confidence {}",
                lead.confidence_score
            );
            assert!((70..=98).contains(&lead.source_trust));
        }
    }

    #[test]
    fn generated_leads_start_new_and_unenriched() {
        for lead in generator(5).generate(10) {
            assert_eq!(lead.status, LeadStatus::New);
            assert!(lead.normalized_company.is_empty());
            assert_eq!(lead.priority_score, 0.0);
        }
    }

    #[test]
    fn wire_has_four_signals() {
        let wire = mock_news_wire();
        assert_eq!(wire.len(), 4);
        assert_eq!(wire[0].company_name, "BuildRight Infra");
    }

    #[test]
    fn lead_from_signal_carries_reason() {
        let matcher = Matcher::new(RuleRegistry::builtin());
        let wire = mock_news_wire();
        let lead = lead_from_signal(&matcher, &wire[0], 7, 9.2);

        assert_eq!(lead.recommended_product, "Bitumen");
        assert!(lead.reason.contains("highway"), "got: {}", lead.reason);
        assert!(lead.next_action.contains("Bitumen"));
        assert_eq!(lead.urgency_score, 7);
    }
}

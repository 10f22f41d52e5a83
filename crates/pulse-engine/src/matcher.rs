use pulse_core::lead::Recommendation;

use crate::rules::{RuleRegistry, SectorRule};

/// What the default recommendation falls back to when no rule fires.
const DEFAULT_PRODUCT: &str = "General Fuel";
const DEFAULT_SECONDARY: &str = "LDO (Machinery Fuel)";
const DEFAULT_SECTOR: &str = "General";

/// One stage of the matching chain.
///
/// Strategies run in a fixed order: exact cue phrases first, keyword
/// fallback second. Each scans the whole registry in registration order
/// and stops at the first hit, so two rules sharing a keyword always
/// resolve to the earlier one.
trait MatchStrategy: Send + Sync {
    fn find<'r>(&self, registry: &'r RuleRegistry, text: &str) -> Option<RuleHit<'r>>;
}

struct RuleHit<'r> {
    rule: &'r SectorRule,
    token: String,
    kind: &'static str,
}

/// Exact cue phrases, case-insensitive substring.
struct CueScan;

impl MatchStrategy for CueScan {
    fn find<'r>(&self, registry: &'r RuleRegistry, text: &str) -> Option<RuleHit<'r>> {
        for rule in registry.rules() {
            for cue in &rule.cues {
                if text.contains(cue.as_str()) {
                    return Some(RuleHit {
                        rule,
                        token: cue.clone(),
                        kind: "cue",
                    });
                }
            }
        }
        None
    }
}

/// Single keywords, case-insensitive substring.
struct KeywordScan;

impl MatchStrategy for KeywordScan {
    fn find<'r>(&self, registry: &'r RuleRegistry, text: &str) -> Option<RuleHit<'r>> {
        for rule in registry.rules() {
            for keyword in &rule.keywords {
                if text.contains(keyword.as_str()) {
                    return Some(RuleHit {
                        rule,
                        token: keyword.clone(),
                        kind: "keyword",
                    });
                }
            }
        }
        None
    }
}

/// Maps free-text signals to a product recommendation.
///
/// The same matcher serves both the synthetic generator (label
/// assignment) and live ingestion, so demo labels and live inference can
/// never drift apart.
pub struct Matcher {
    registry: RuleRegistry,
    chain: Vec<Box<dyn MatchStrategy>>,
}

impl Matcher {
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry,
            chain: vec![Box::new(CueScan), Box::new(KeywordScan)],
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Infer a recommendation from a raw text snippet.
    ///
    /// Deterministic: fixed registry plus fixed text always produces the
    /// same result. The reason string names what matched, so an officer
    /// can audit why the product was recommended.
    pub fn infer(&self, text: &str) -> Recommendation {
        let haystack = text.to_lowercase();

        for strategy in &self.chain {
            if let Some(hit) = strategy.find(&self.registry, &haystack) {
                return Recommendation {
                    product: hit.rule.primary_product.clone(),
                    secondary_product: hit.rule.secondary_product.clone(),
                    reason: format!(
                        "Matched {} \"{}\" ({})",
                        hit.kind, hit.token, hit.rule.sector
                    ),
                    sector: hit.rule.sector.clone(),
                };
            }
        }

        Recommendation {
            product: DEFAULT_PRODUCT.to_string(),
            secondary_product: DEFAULT_SECONDARY.to_string(),
            reason: "No registry cue or keyword matched; defaulted to general supply".to_string(),
            sector: DEFAULT_SECTOR.to_string(),
        }
    }
}

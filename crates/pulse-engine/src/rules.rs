use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A declarative mapping from industrial cues to a product recommendation.
///
/// Cues are distinctive multi-word phrases; keywords are single-token
/// fallbacks. Both are held lowercase so matching is a plain substring
/// scan over cleaned text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectorRule {
    pub sector: String,
    pub cues: Vec<String>,
    pub keywords: Vec<String>,
    pub primary_product: String,
    pub secondary_product: String,
}

impl SectorRule {
    pub fn new(
        sector: impl Into<String>,
        cues: &[&str],
        keywords: &[&str],
        primary_product: impl Into<String>,
        secondary_product: impl Into<String>,
    ) -> Self {
        Self {
            sector: sector.into(),
            cues: cues.iter().map(|c| c.to_lowercase()).collect(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            primary_product: primary_product.into(),
            secondary_product: secondary_product.into(),
        }
    }
}

/// Ordered, immutable collection of sector rules.
///
/// Order is load-bearing: the matcher resolves shared keywords to the
/// earlier-registered rule, and that first-match policy is the only
/// determinism guarantee inference has.
pub struct RuleRegistry {
    rules: Vec<SectorRule>,
}

impl RuleRegistry {
    /// Build a registry, validating every rule.
    ///
    /// The set must be non-empty, and each rule needs a non-empty
    /// primary product and at least one cue or keyword, otherwise it
    /// could never fire.
    pub fn new(rules: Vec<SectorRule>) -> Result<Self, EngineError> {
        if rules.is_empty() {
            return Err(EngineError::InvalidRule("registry has no rules".into()));
        }
        for rule in &rules {
            if rule.primary_product.trim().is_empty() {
                return Err(EngineError::InvalidRule(format!(
                    "rule '{}' has no primary product",
                    rule.sector
                )));
            }
            if rule.cues.is_empty() && rule.keywords.is_empty() {
                return Err(EngineError::InvalidRule(format!(
                    "rule '{}' has no cues or keywords",
                    rule.sector
                )));
            }
        }
        Ok(Self { rules })
    }

    /// The built-in five-sector rule set.
    pub fn builtin() -> Self {
        let rules = vec![
            SectorRule::new(
                "Road Construction",
                &[
                    "NHAI highway project",
                    "expressway construction",
                    "pavement resurfacing",
                    "bridge building",
                ],
                &["tarmac", "NHAI", "civil works", "highway"],
                "Bitumen",
                "LDO (Machinery fuel)",
            ),
            SectorRule::new(
                "Manufacturing (Steel/Glass)",
                &[
                    "new blast furnace installation",
                    "boiler capacity expansion",
                    "heat treatment plant",
                ],
                &["thermal", "smelting", "billets", "furnace"],
                "Furnace Oil (FO)",
                "LSHS (Low Sulphur fuel)",
            ),
            SectorRule::new(
                "Textiles (Jute)",
                &[
                    "jute mill modernization",
                    "batching oil procurement",
                    "fibre softening process",
                ],
                &["fibre", "hessian", "batching"],
                "JBO (Jute Batching Oil)",
                "LDO (Genset fuel)",
            ),
            SectorRule::new(
                "Chemical & Solvents",
                &[
                    "solvent extraction unit",
                    "edible oil refinery setup",
                    "industrial cleaning unit",
                ],
                &["extraction", "purification", "solvent"],
                "Hexane",
                "Solvent 1425",
            ),
            SectorRule::new(
                "Power & Logistics",
                &[
                    "DG set maintenance",
                    "captive power plant backup",
                    "port bunkering service",
                ],
                &["genset", "marine", "backup", "bunker", "boiler"],
                "LDO",
                "HSD (High Speed Diesel)",
            ),
        ];

        // Built-in rules always validate
        Self::new(rules).expect("builtin rules are valid")
    }

    pub fn rules(&self) -> &[SectorRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_five_sectors() {
        let registry = RuleRegistry::builtin();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.rules()[0].primary_product, "Bitumen");
        assert_eq!(registry.rules()[4].primary_product, "LDO");
    }

    #[test]
    fn cues_and_keywords_lowercased() {
        let registry = RuleRegistry::builtin();
        for rule in registry.rules() {
            for cue in &rule.cues {
                assert_eq!(cue, &cue.to_lowercase());
            }
            for kw in &rule.keywords {
                assert_eq!(kw, &kw.to_lowercase());
            }
        }
    }

    #[test]
    fn empty_primary_product_rejected() {
        let rule = SectorRule::new("Bad", &["some cue"], &[], "  ", "x");
        let result = RuleRegistry::new(vec![rule]);
        assert!(matches!(result, Err(EngineError::InvalidRule(_))));
    }

    #[test]
    fn empty_rule_set_rejected() {
        let result = RuleRegistry::new(Vec::new());
        assert!(matches!(result, Err(EngineError::InvalidRule(_))));
    }

    #[test]
    fn rule_without_cues_or_keywords_rejected() {
        let rule = SectorRule::new("Bad", &[], &[], "Bitumen", "LDO");
        let result = RuleRegistry::new(vec![rule]);
        assert!(matches!(result, Err(EngineError::InvalidRule(_))));
    }

    #[test]
    fn registry_preserves_order() {
        let rules = vec![
            SectorRule::new("First", &[], &["genset"], "Product A", ""),
            SectorRule::new("Second", &[], &["genset"], "Product B", ""),
        ];
        let registry = RuleRegistry::new(rules).unwrap();
        assert_eq!(registry.rules()[0].sector, "First");
        assert_eq!(registry.rules()[1].sector, "Second");
    }
}

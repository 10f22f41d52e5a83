use serde::{Deserialize, Serialize};

use crate::ids::{LeadId, SignalId};

/// Lifecycle of a lead inside this pipeline.
///
/// Only `new -> processing` happens here, as a side effect of a successful
/// dispatch. Terminal states (closed, actioned) belong to the CRM layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Processing,
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Processing => write!(f, "processing"),
        }
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "processing" => Ok(Self::Processing),
            other => Err(format!("unknown lead status: {other}")),
        }
    }
}

/// A raw observation about company activity, before any inference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Signal {
    pub id: SignalId,
    pub company_name: String,
    pub raw_text: String,
    pub location: String,
    pub source_url: String,
    /// Source trust on a 0-100 scale.
    pub source_trust: u8,
}

impl Signal {
    pub fn new(
        company_name: impl Into<String>,
        raw_text: impl Into<String>,
        location: impl Into<String>,
        source_url: impl Into<String>,
        source_trust: u8,
    ) -> Self {
        Self {
            id: SignalId::new(),
            company_name: company_name.into(),
            raw_text: raw_text.into(),
            location: location.into(),
            source_url: source_url.into(),
            source_trust,
        }
    }
}

/// Output of the inference engine for one signal.
///
/// `reason` is the audit trail: it names the rule that fired and the
/// cue or keyword that matched, so an officer can see why a product was
/// recommended rather than just the result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub product: String,
    pub secondary_product: String,
    pub reason: String,
    pub sector: String,
}

/// A candidate sales opportunity derived from an observed signal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,

    // Provenance
    pub source_url: String,
    pub source_trust: u8,

    // Subject
    pub company_name: String,
    pub normalized_company: String,
    pub industry_sector: String,
    pub location: String,

    // Content
    pub raw_text_snippet: String,
    pub extracted_keywords: Vec<String>,

    // Inference output. Confidence is on the 0-10 scale; the priority
    // formula weights it against urgency and breaks if callers pass 0-1
    // or 0-100 values.
    pub recommended_product: String,
    pub secondary_product: String,
    pub reason: String,
    pub confidence_score: f64,
    pub urgency_score: u8,

    // Derived
    pub priority_score: f64,
    pub is_verified: bool,
    pub next_action: String,

    pub status: LeadStatus,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_roundtrip() {
        for status in [LeadStatus::New, LeadStatus::Processing] {
            let s = status.to_string();
            let parsed: LeadStatus = s.parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn status_rejects_unknown() {
        let result: Result<LeadStatus, _> = "closed".parse();
        assert!(result.is_err());
    }

    #[test]
    fn status_serde_snake_case() {
        let json = serde_json::to_string(&LeadStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }

    #[test]
    fn signal_gets_branded_id() {
        let signal = Signal::new("SteelFlow Ltd", "Installing furnaces", "Surat, GJ", "https://example.in/1", 70);
        assert!(signal.id.as_str().starts_with("sig_"));
        assert_eq!(signal.source_trust, 70);
    }
}

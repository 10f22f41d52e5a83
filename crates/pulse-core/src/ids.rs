use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! branded_id {
    ($name:ident, $prefix:expr) => {
        #[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(format!("{}_{}", $prefix, Uuid::now_v7()))
            }

            pub fn from_raw(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_owned()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

branded_id!(LeadId, "lead");
branded_id!(SignalId, "sig");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_id_has_prefix() {
        let id = LeadId::new();
        assert!(id.as_str().starts_with("lead_"), "got: {id}");
    }

    #[test]
    fn signal_id_has_prefix() {
        let id = SignalId::new();
        assert!(id.as_str().starts_with("sig_"), "got: {id}");
    }

    #[test]
    fn ids_are_unique() {
        let a = LeadId::new();
        let b = LeadId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn display_and_from_str_roundtrip() {
        let id = LeadId::new();
        let s = id.to_string();
        let parsed: LeadId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn serde_roundtrip() {
        let id = LeadId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: LeadId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn from_raw_preserves_value() {
        let id = LeadId::from_raw("custom-id-123");
        assert_eq!(id.as_str(), "custom-id-123");
    }

    #[test]
    fn ids_sort_by_creation_time() {
        let earlier = LeadId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let later = LeadId::new();
        assert!(earlier < later, "{earlier} should sort before {later}");
    }
}

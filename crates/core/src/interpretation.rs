use serde::{Deserialize, Serialize};

/// The fixed schema every structured interpretation is repaired into.
/// All fields are always populated; the normalizer guarantees it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterpretationRecord {
    pub core_interpretation: String,
    pub key_symbols: String,
    pub emotional_significance: String,
    pub guidance_actions: String,
    pub personal_reflection: String,
    pub tags: Vec<String>,
}

/// Which response contract the interpretation endpoint serves.
///
/// Narrative returns the model's prose untouched; structured passes it
/// through the normalizer into an [`InterpretationRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    #[default]
    Narrative,
    Structured,
}

impl ResponseMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Narrative => "narrative",
            Self::Structured => "structured",
        }
    }
}

impl std::fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResponseMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "narrative" => Ok(Self::Narrative),
            "structured" => Ok(Self::Structured),
            _ => Err(anyhow::anyhow!("Invalid response mode: {}", s)),
        }
    }
}

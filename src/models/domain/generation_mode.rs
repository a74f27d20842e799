use serde::{Deserialize, Serialize};

/// Whether the gateway talks to the external generator at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Never contacts the generator; the gateway answers with an empty string.
    #[default]
    Stub,
    Live,
}

impl GenerationMode {
    /// Case-insensitive; anything other than `live` is stub mode.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("live") {
            GenerationMode::Live
        } else {
            GenerationMode::Stub
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, GenerationMode::Stub)
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationMode::Stub => write!(f, "stub"),
            GenerationMode::Live => write!(f, "live"),
        }
    }
}

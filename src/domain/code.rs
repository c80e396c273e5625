use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::error::ValidationError;

pub const CODE_LEN: usize = 6;

/// Six character code issued by the registry for every created playlist.
///
/// Works as a submission receipt and as the lookup key for reviews and
/// exchanges. The content is opaque; only the length is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ExchangeCode(String);

impl ExchangeCode {
    /// Trims surrounding whitespace, then requires exactly six characters
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let code = input.trim();
        let len = code.chars().count();
        if len != CODE_LEN {
            return Err(ValidationError::InvalidCodeLength { len });
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ExchangeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ExchangeCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ExchangeCode::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Identifier of a registered playlist. The registry sends it as a number,
/// local storage keeps it as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PlaylistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PlaylistId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(PlaylistId(n.to_string())),
            Raw::Text(s) if !s.trim().is_empty() => Ok(PlaylistId(s)),
            Raw::Text(_) => Err(serde::de::Error::custom("empty playlist id")),
        }
    }
}

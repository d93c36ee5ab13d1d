//! Versioned JSON envelope around persisted payloads

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::PersistError;

/// Current on-disk format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    /// Unix timestamp (ms) of the write
    pub saved_at: f64,
    pub payload: T,
}

/// Just enough of an envelope to read its version
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl<T> Envelope<T> {
    pub fn new(payload: T, saved_at: f64) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at,
            payload,
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Parse an envelope, rejecting versions this build does not understand
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let probe: VersionProbe = serde_json::from_str(json)?;
        if probe.version != SAVE_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: probe.version,
                expected: SAVE_VERSION,
            });
        }
        Ok(serde_json::from_str(json)?)
    }
}

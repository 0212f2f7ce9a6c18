//! Engine configuration
//!
//! Pushed into the engine once, when a processor is constructed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Placeholder customer id used until a real one is configured
pub const DEFAULT_CUSTOMER_ID: &str = "CUSTOMER_ID";

/// Hosted ONNX runtime binaries the engine loads its models with
const DEFAULT_WASM_PATHS: [(&str, &str); 2] = [
    (
        "ort-wasm.wasm",
        "https://effectssdk.ai/sdk/web/3.5.3/ort-wasm.wasm",
    ),
    (
        "ort-wasm-simd.wasm",
        "https://effectssdk.ai/sdk/web/3.5.3/ort-wasm-simd.wasm",
    ),
];

/// Inference backend the engine runs its models on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Webgpu,
    Webgl,
    Cpu,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Webgpu => write!(f, "webgpu"),
            Provider::Webgl => write!(f, "webgl"),
            Provider::Cpu => write!(f, "cpu"),
        }
    }
}

/// Settings handed to [`crate::engine::EffectsEngine::config`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// License key issued by the engine vendor
    pub customer_id: String,
    pub provider: Provider,
    /// Runtime binary name to URL
    pub wasm_paths: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            customer_id: DEFAULT_CUSTOMER_ID.to_string(),
            provider: Provider::default(),
            wasm_paths: DEFAULT_WASM_PATHS
                .iter()
                .map(|(name, url)| (name.to_string(), url.to_string()))
                .collect(),
        }
    }
}

impl EngineConfig {
    /// Default configuration for a given customer
    pub fn for_customer(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON document; missing keys take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

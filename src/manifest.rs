//! Typed decoding of the project manifest (`/dappfile.json`).
//!
//! The manifest maps source files to deployable contracts. Only the
//! `contracts` section is consumed here; unknown sections are tolerated so
//! older and newer manifests both decode.

use serde::Deserialize;

/// Decoded project manifest
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DappManifest {
    #[serde(default)]
    pub contracts: Vec<ContractEntry>,
}

/// One contract declaration from the manifest
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContractEntry {
    /// Absolute path of the contract's source file within the project tree
    pub source: String,
    pub name: String,
    /// Constructor arguments, preserved as opaque JSON values
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
}

/// Manifest decoding error
#[derive(Debug)]
pub enum ManifestError {
    ParseError(String),
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestError::ParseError(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for ManifestError {}

impl DappManifest {
    /// Decode a manifest from its file content
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(content).map_err(|e| ManifestError::ParseError(e.to_string()))
    }

    /// Find the contract entry whose `source` equals the given item path
    pub fn find_contract_by_source(&self, path: &str) -> Option<&ContractEntry> {
        self.contracts.iter().find(|entry| entry.source == path)
    }
}

//! Loading compiled contract artifacts from disk.
//!
//! An artifact is the JSON file the contract compiler writes per contract:
//! `<Name>.json` with at least an `abi` array and a `bytecode` hex string.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::{ContractFactory, DeployError};

/// The subset of an artifact file the deployment flow needs.
#[derive(Debug, Deserialize)]
struct Artifact {
    abi: serde_json::Value,
    bytecode: Option<String>,
}

/// Load the artifact for a named contract from `artifacts_dir`.
pub fn load_artifact(artifacts_dir: &Path, name: &str) -> Result<ContractFactory, DeployError> {
    let path = artifacts_dir.join(format!("{name}.json"));
    debug!(path = %path.display(), "loading contract artifact");

    let content = std::fs::read_to_string(&path).map_err(|e| DeployError::Artifact {
        name: name.to_string(),
        reason: format!("cannot read {}: {e}", path.display()),
    })?;

    let artifact: Artifact =
        serde_json::from_str(&content).map_err(|e| DeployError::Artifact {
            name: name.to_string(),
            reason: format!("malformed artifact: {e}"),
        })?;

    let bytecode = match artifact.bytecode {
        Some(b) if b.len() > 2 && b.starts_with("0x") => b,
        Some(_) => {
            return Err(DeployError::Artifact {
                name: name.to_string(),
                reason: "bytecode is empty or not 0x-prefixed".into(),
            });
        }
        None => {
            return Err(DeployError::Artifact {
                name: name.to_string(),
                reason: "artifact has no bytecode field".into(),
            });
        }
    };

    Ok(ContractFactory {
        name: name.to_string(),
        abi: artifact.abi,
        bytecode,
    })
}

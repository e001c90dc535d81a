//! Sequential deployment runner.

use tracing::{error, info};

use crate::{ContractDeployer, DeployError, DeployedContract};

/// The project contracts, in deployment order.
pub const CONTRACTS: [&str; 3] = ["PascalCoin", "RobinCoin", "SimpleSwap"];

/// The line printed to stdout for a confirmed deployment.
pub fn deployment_line(deployed: &DeployedContract) -> String {
    format!("✅ {} desplegado en: {}", deployed.name, deployed.address)
}

/// Deploy every project contract, strictly in order.
///
/// Each deployment is independent (no constructor arguments flow from one
/// to the next). The first error aborts the run immediately: remaining
/// contracts are not attempted, contracts already deployed stay deployed.
pub async fn run(deployer: &dyn ContractDeployer) -> Result<Vec<DeployedContract>, DeployError> {
    let mut deployed = Vec::with_capacity(CONTRACTS.len());

    for name in CONTRACTS {
        info!(contract = name, "deploying");
        let factory = deployer.get_factory(name).await.inspect_err(|e| {
            error!(contract = name, error = %e, "factory retrieval failed, aborting run");
        })?;
        let contract = deployer.deploy(&factory).await.inspect_err(|e| {
            error!(contract = name, error = %e, "deployment failed, aborting run");
        })?;

        println!("{}", deployment_line(&contract));
        deployed.push(contract);
    }

    info!(count = deployed.len(), "all contracts deployed");
    Ok(deployed)
}

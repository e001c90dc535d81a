//! Deploys the three project contracts to the configured node.
//!
//! No flags. Exits 0 when every deployment confirmed, non-zero as soon
//! as one fails, with the triggering error on stderr.

use anyhow::Context;
use tracing::info;

use swap_core::SwapConfig;
use swap_deploy::RpcDeployer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    swap_core::init_logging("info")?;

    let config = SwapConfig::load()?;
    info!(rpc_url = %config.deploy.rpc_url, "starting deployment run");

    let deployer = RpcDeployer::new(&config.deploy);
    swap_deploy::run(&deployer)
        .await
        .context("deployment run aborted")?;

    Ok(())
}

//! Interactive wallet connector.
//!
//! Terminal rendition of the connect/disconnect UI: one connector holding
//! the connection state, a provider injected only when the config names a
//! wallet endpoint. Provider failures never terminate the loop.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use swap_core::SwapConfig;
use swap_wallet::{ConnectOutcome, NodeWalletProvider, WalletConnector, WalletProvider};

fn render(connector: &WalletConnector) {
    match connector.status_line() {
        Some(line) => println!("{line}"),
        None => println!("No conectado."),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    swap_core::init_logging("warn")?;

    let config = SwapConfig::load()?;
    let provider: Option<Arc<dyn WalletProvider>> = config.wallet.rpc_url.clone().map(|url| {
        Arc::new(NodeWalletProvider::new(
            url,
            Duration::from_secs(config.wallet.request_timeout_secs),
        )) as Arc<dyn WalletProvider>
    });

    let mut connector = WalletConnector::new(provider);

    println!("Comandos: connect | disconnect | status | quit");
    render(&connector);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "connect" => match connector.connect().await {
                ConnectOutcome::Connected(_) => {}
                ConnectOutcome::ProviderAbsent => println!("Por favor instala MetaMask"),
                ConnectOutcome::Rejected => println!("Usuario rechazó la conexión"),
            },
            "disconnect" => {
                connector.disconnect();
                println!("Desconectado.");
            }
            "status" | "" => {}
            "quit" | "exit" | "q" => break,
            other => println!("Comando desconocido: {other}"),
        }
        render(&connector);
    }

    Ok(())
}

use criptopay_session::domain::balance::format_balance;
use criptopay_session::infra::config;
use criptopay_session::infra::provider::ProviderHandle;
use criptopay_session::storage::kv_store::WALLET_CONNECTED_KEY;
use criptopay_session::{network_name, FileKeyValueStore, HttpProvider, KeyValueStore, UNKNOWN_NETWORK};
use std::sync::Arc;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--reset-flag]\n\
         \n\
         Requires env vars:\n\
           CRIPTOPAY_RPC_URL\n\
         Optional:\n\
           CRIPTOPAY_STATE_FILE (default wallet_state.json)\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let reset_flag = args.iter().any(|a| a == "--reset-flag");

    let provider = HttpProvider::from_env()?
        .ok_or_else(|| anyhow::anyhow!("CRIPTOPAY_RPC_URL must be set"))?;
    let state_file = config::state_file();

    println!("> Preflight:");
    println!("  CRIPTOPAY_RPC_URL={}", provider.rpc_url());
    println!("  CRIPTOPAY_STATE_FILE={}", state_file.display());

    let handle = ProviderHandle::new(Arc::new(provider));

    // Chain
    let chain_id = handle
        .chain_id()
        .await
        .map_err(|e| anyhow::anyhow!("eth_chainId failed: {}", e))?;
    let name = network_name(&chain_id);
    println!("  Chain: {} ({})", chain_id, name);
    if name == UNKNOWN_NETWORK {
        eprintln!("  Warning: chain is not in the network table; the dashboard will show it as {}.", UNKNOWN_NETWORK);
    }

    // Accounts + balance
    let accounts = handle
        .accounts()
        .await
        .map_err(|e| anyhow::anyhow!("eth_accounts failed: {}", e))?;
    match accounts.first() {
        Some(account) => {
            let wei = handle
                .balance(account)
                .await
                .map_err(|e| anyhow::anyhow!("eth_getBalance failed: {}", e))?;
            println!("  Account: {} ({} accounts exposed)", account, accounts.len());
            println!("  Balance: {} wei (~{})", wei, format_balance(wei));
        }
        None => eprintln!("  Warning: node exposes no accounts; connect will fail with 'No account was selected'."),
    }

    // Persisted flag
    let store = FileKeyValueStore::new(state_file);
    let flag = store.get_item(WALLET_CONNECTED_KEY)?;
    println!("  {}: {}", WALLET_CONNECTED_KEY, flag.as_deref().unwrap_or("<absent>"));
    if reset_flag && flag.is_some() {
        store.remove_item(WALLET_CONNECTED_KEY)?;
        println!("  {} cleared.", WALLET_CONNECTED_KEY);
    }

    println!("> Preflight OK.");
    Ok(())
}

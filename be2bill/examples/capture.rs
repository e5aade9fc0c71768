//! Captures an authorization on the sandbox.
//!
//! Run with: `BE2BILL_IDENTIFIER=... BE2BILL_PASSWORD=... cargo run --example capture -- A151621`

use be2bill::{DirectLinkClient, params::Params};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let identifier = std::env::var("BE2BILL_IDENTIFIER")?;
    let password = std::env::var("BE2BILL_PASSWORD")?;
    let transaction_id = std::env::args().nth(1).unwrap_or_else(|| "A151621".to_owned());

    let client = DirectLinkClient::sandbox(identifier, password)?;
    let result = client
        .capture(&transaction_id, "order_1423675675", "capture_transaction_A151621", Params::new())
        .await?;

    println!("{} {} ({:?})", result.exec_code(), result.message(), result.exec_code_class());
    Ok(())
}

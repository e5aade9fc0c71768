//! be2bill command-line front end
//!
//! Computes and checks request signatures, renders hosted payment page
//! buttons and runs DirectLink captures and refunds. Parameters are read as
//! JSON objects; clients are built from a TOML configuration file.

mod observability;

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};

use be2bill::{
    Be2billError, ClientConfig,
    amount::{Amount, FragmentedAmount, SingleAmount},
    constants::html_option,
    form::HtmlOptions,
    hash,
    params::Params,
};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{debug, error};

use crate::observability::{LogFormat, init_observability};

/// be2bill payment API client
#[derive(Debug, Parser)]
#[command(name = "be2bill", version)]
#[command(about = "Sign, check and send be2bill payment requests")]
struct Cli {
    /// Log level used when `RUST_LOG` is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the HASH of a JSON parameter object
    Hash(SignatureArgs),
    /// Check the HASH of a notification sent by be2bill
    Verify(SignatureArgs),
    /// Render a payment or authorization button
    PaymentForm(FormArgs),
    /// Capture an authorization
    Capture(TransactionArgs),
    /// Refund a transaction
    Refund(TransactionArgs),
}

#[derive(Debug, Args)]
struct SignatureArgs {
    /// Merchant password
    #[arg(long, env = "BE2BILL_PASSWORD", hide_env_values = true)]
    password: String,

    /// JSON object file, `-` for stdin
    #[arg(long, default_value = "-")]
    params: PathBuf,
}

#[derive(Debug, Args)]
struct FormArgs {
    /// Client configuration file
    #[arg(long)]
    config: PathBuf,

    /// Immediate amount in cents
    #[arg(long, conflicts_with = "schedule", required_unless_present = "schedule")]
    amount: Option<i64>,

    /// Scheduled charge as `YYYY-MM-DD=CENTS`, repeatable
    #[arg(long, value_parser = parse_schedule_entry)]
    schedule: Vec<(String, i64)>,

    /// Render an authorization instead of a payment
    #[arg(long, conflicts_with = "schedule")]
    authorization: bool,

    /// Merchant order identifier
    #[arg(long)]
    order_id: String,

    /// Merchant customer identifier
    #[arg(long)]
    client_id: String,

    /// Order description
    #[arg(long)]
    description: String,

    /// Extra parameters as a JSON object file; `FORM` and `SUBMIT` hold HTML attributes
    #[arg(long)]
    params: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct TransactionArgs {
    /// Client configuration file
    #[arg(long)]
    config: PathBuf,

    /// be2bill transaction identifier
    #[arg(long)]
    transaction_id: String,

    /// Merchant order identifier
    #[arg(long)]
    order_id: String,

    /// Operation description
    #[arg(long)]
    description: String,

    /// Extra parameters as a JSON object file
    #[arg(long)]
    params: Option<PathBuf>,
}

/// Errors reported by the command-line front end.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Be2bill(#[from] Be2billError),

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_observability(LogFormat::from_env(), &cli.log_level);

    match run(cli.command).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<String, CliError> {
    match command {
        Command::Hash(args) => {
            let params = read_params(&args.params)?;
            Ok(hash::compute_hash(&args.password, &params))
        }
        Command::Verify(args) => {
            let params = read_params(&args.params)?;
            hash::verify(&args.password, &params)?;
            Ok("valid".to_owned())
        }
        Command::PaymentForm(args) => payment_form(&args),
        Command::Capture(args) => {
            let client = ClientConfig::from_file(&args.config)?.direct_link_client()?;
            let options = read_optional_params(args.params.as_deref())?;
            let result = client
                .capture(&args.transaction_id, &args.order_id, &args.description, options)
                .await?;
            Ok(serde_json::to_string_pretty(&result)?)
        }
        Command::Refund(args) => {
            let client = ClientConfig::from_file(&args.config)?.direct_link_client()?;
            let options = read_optional_params(args.params.as_deref())?;
            let result = client
                .refund(&args.transaction_id, &args.order_id, &args.description, options)
                .await?;
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}

fn payment_form(args: &FormArgs) -> Result<String, CliError> {
    let client = ClientConfig::from_file(&args.config)?.form_client()?;

    let mut options = read_optional_params(args.params.as_deref())?;
    let html = HtmlOptions::from_params(&options);
    options.remove(html_option::FORM);
    options.remove(html_option::SUBMIT);

    let amount = match args.amount {
        Some(cents) => Amount::Single(SingleAmount(cents)),
        None => Amount::Fragmented(FragmentedAmount::from_iso_dates(
            args.schedule.iter().map(|(date, cents)| (date.as_str(), *cents)),
        )?),
    };

    if args.authorization {
        let Amount::Single(amount) = amount else {
            return Err(Be2billError::InvalidInput(
                "--authorization requires --amount".to_owned(),
            )
            .into());
        };
        return Ok(client.build_authorization_form_button(
            amount,
            &args.order_id,
            &args.client_id,
            &args.description,
            &html,
            options,
        ));
    }

    Ok(client.build_payment_form_button(
        &amount,
        &args.order_id,
        &args.client_id,
        &args.description,
        &html,
        options,
    ))
}

fn read_optional_params(source: Option<&Path>) -> Result<Params, CliError> {
    source.map_or_else(|| Ok(Params::new()), read_params)
}

fn read_params(source: &Path) -> Result<Params, CliError> {
    let raw = if source == Path::new("-") {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .map_err(|source| CliError::Io { path: "stdin".to_owned(), source })?;
        raw
    } else {
        fs::read_to_string(source)
            .map_err(|e| CliError::Io { path: source.display().to_string(), source: e })?
    };

    let params = parse_params(&raw)?;
    debug!(field_count = params.len(), "parameters loaded");
    Ok(params)
}

fn parse_params(raw: &str) -> Result<Params, CliError> {
    Ok(serde_json::from_str(raw)?)
}

fn parse_schedule_entry(raw: &str) -> Result<(String, i64), String> {
    let (date, cents) =
        raw.split_once('=').ok_or_else(|| format!("expected YYYY-MM-DD=CENTS, got '{raw}'"))?;
    let cents = cents.trim().parse().map_err(|e| format!("invalid amount '{cents}': {e}"))?;
    Ok((date.trim().to_owned(), cents))
}

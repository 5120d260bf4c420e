use std::{fs, path::PathBuf, process::Command};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Deploy the gateway with `cargo stylus deploy` and record the result in a
/// deployments JSON.
///
/// This stays a thin wrapper around the canonical `cargo stylus` workflow; it
/// only makes the output machine-readable for integration tooling.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory of the Stylus contract crate to deploy.
    #[arg(long, default_value = "contracts/gateway")]
    contract_dir: PathBuf,

    /// RPC URL used by `cargo stylus deploy`.
    #[arg(long, env = "RPC_URL")]
    rpc_url: String,

    /// Path to a file containing the deployer private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    private_key_path: Option<String>,

    /// Private key (hex string, 0x...).
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    private_key: Option<String>,

    /// Path of the deployments JSON to create or update.
    #[arg(long, default_value = "deployments.devnet.json")]
    deployments_path: PathBuf,

    /// Key under `deployments` for this contract.
    #[arg(long, default_value = "onramp-gateway")]
    contract_key: String,

    /// Network name recorded alongside the deployment (eg devnet, arb-sepolia).
    #[arg(long, default_value = "devnet")]
    network: String,

    /// Extra args passed through to `cargo stylus deploy` (after `--`).
    #[arg(last = true)]
    passthrough: Vec<String>,
}

/// What one `cargo stylus deploy` run produced.
#[derive(Debug, Serialize)]
struct DeployOutcome {
    address: String,
    rpc_url: String,
    deployed_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tx_hashes: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let outcome = run_deploy(&cli)?;
    record_deployment(&cli, &outcome)?;

    println!("Deployed `{}` to {}", cli.contract_key, outcome.address);
    Ok(())
}

fn run_deploy(cli: &Cli) -> Result<DeployOutcome> {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(&cli.contract_dir)
        .args(["stylus", "deploy", "-e", &cli.rpc_url]);

    match (&cli.private_key_path, &cli.private_key) {
        (Some(path), None) => {
            cmd.args(["--private-key-path", path]);
        }
        (None, Some(key)) => {
            cmd.args(["--private-key", key]);
        }
        _ => bail!(
            "missing deployer key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)"
        ),
    }
    cmd.args(&cli.passthrough);

    let output = cmd.output().context("failed to run `cargo stylus deploy`")?;
    let combined = format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    if !output.status.success() {
        bail!(
            "`cargo stylus deploy` failed (exit {}):\n{}",
            output.status,
            combined
        );
    }

    parse_deploy_output(&combined, &cli.rpc_url)
}

/// Pull the deployed address and confirmed tx hashes out of the tool output.
fn parse_deploy_output(output: &str, rpc_url: &str) -> Result<DeployOutcome> {
    let re_address = Regex::new(r"[Dd]eploy(?:ing|ed) (?:program|contract) to address (0x[a-fA-F0-9]{40})")?;
    let re_tx = Regex::new(r"[Cc]onfirmed tx (0x[a-fA-F0-9]{64})")?;

    let address = re_address
        .captures(output)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| anyhow!("could not parse deployed address from `cargo stylus deploy` output"))?;

    let tx_hashes = re_tx
        .captures_iter(output)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    let deployed_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    Ok(DeployOutcome {
        address,
        rpc_url: rpc_url.to_string(),
        deployed_at,
        tx_hashes,
    })
}

fn record_deployment(cli: &Cli, outcome: &DeployOutcome) -> Result<()> {
    let mut root: Value = match fs::read_to_string(&cli.deployments_path) {
        Ok(existing) if !existing.trim().is_empty() => serde_json::from_str(&existing)
            .with_context(|| format!("failed parsing {}", cli.deployments_path.display()))?,
        _ => json!({}),
    };
    if !root.is_object() {
        root = json!({});
    }

    root["network"] = json!(cli.network);
    root["updated_at"] = json!(outcome.deployed_at);
    if !root["deployments"].is_object() {
        root["deployments"] = json!({});
    }
    root["deployments"][&cli.contract_key] = serde_json::to_value(outcome)?;

    if let Some(parent) = cli.deployments_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating directory {}", parent.display()))?;
        }
    }

    // Write-then-rename keeps the record intact if this process dies mid-write.
    let tmp_path = cli.deployments_path.with_extension("json.tmp");
    fs::write(&tmp_path, serde_json::to_string_pretty(&root)?)
        .with_context(|| format!("failed writing {}", tmp_path.display()))?;
    fs::rename(&tmp_path, &cli.deployments_path)
        .with_context(|| format!("failed replacing {}", cli.deployments_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_deploy_output;

    #[test]
    fn parses_address_and_tx_hashes() {
        let output = format!(
            "deploying program\nDeploying program to address 0x{}\nConfirmed tx 0x{}\nConfirmed tx 0x{}\n",
            "ab".repeat(20),
            "cd".repeat(32),
            "ef".repeat(32),
        );
        let outcome = parse_deploy_output(&output, "http://localhost:8547").unwrap();
        assert_eq!(outcome.address, format!("0x{}", "ab".repeat(20)));
        assert_eq!(outcome.tx_hashes.len(), 2);
    }

    #[test]
    fn missing_address_is_an_error() {
        assert!(parse_deploy_output("nothing useful here", "http://localhost:8547").is_err());
    }
}

// # vpndns-hook
//
// The executable a VPN daemon invokes on client lifecycle events to keep
// DNS in sync with address assignments. Wire it up as an OpenVPN
// learn-address (or client-connect/client-disconnect) script:
//
// ```text
// learn-address /usr/local/bin/vpndns-hook
// ```
//
// ## Invocation
//
// ```text
// vpndns-hook [--config PATH] <add|update|delete> <address> <common_name>
// ```
//
// The optional public address is taken from the `trusted_ip` environment
// variable, which OpenVPN exports for client hooks.
//
// ## Configuration
//
// JSON file, path from `--config`, `VPNDNS_CONFIG`, or
// `/etc/vpndns/config.json`. Log level from `VPNDNS_LOG_LEVEL`
// (trace/debug/info/warn/error, default info).
//
// ## Exit codes
//
// A non-zero exit from a connect hook typically rejects the client's
// connection, so only configuration and usage errors exit non-zero (1,
// before any reconciliation). Invalid addresses, unmatched zones, and
// updater failures are logged and the process exits 0: DNS record drift is
// acceptable, blocking VPN connection setup is not.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::FmtSubscriber;
use vpndns_core::{
    Address, HookConfig, Operation, RecordChangeRequest, UpdateDispatcher, build_transaction,
};
use vpndns_nsupdate::NsupdateDispatcher;

const DEFAULT_CONFIG_PATH: &str = "/etc/vpndns/config.json";

const USAGE: &str = "Usage: vpndns-hook [--config PATH] <add|update|delete> <address> <common_name>";

/// Exit codes for the hook
///
/// Per-connection faults never surface here; they are logged and the hook
/// exits cleanly so the VPN daemon's hook contract holds.
#[derive(Debug, Clone, Copy)]
enum HookExitCode {
    /// Reconciliation ran (or was skipped) without a fatal error
    Clean = 0,
    /// Configuration or usage error, before any reconciliation
    StartupError = 1,
}

impl From<HookExitCode> for ExitCode {
    fn from(code: HookExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Parsed hook invocation
#[derive(Debug)]
struct Invocation {
    config_path: PathBuf,
    operation: Operation,
    address: String,
    common_name: String,
    public_address: Option<String>,
}

impl Invocation {
    /// Parse command-line arguments (argv0 excluded) plus the environment
    /// side channels
    fn parse(args: &[String]) -> Result<Self> {
        let mut args = args.iter();
        let mut config_path: Option<PathBuf> = None;
        let mut positional: Vec<&String> = Vec::new();

        while let Some(arg) = args.next() {
            if arg == "--config" {
                let path = args.next().context("--config requires a path")?;
                config_path = Some(PathBuf::from(path));
            } else {
                positional.push(arg);
            }
        }

        let [operation, address, common_name] = positional.as_slice() else {
            bail!("{USAGE}");
        };

        let operation: Operation = operation.parse()?;
        if common_name.trim().is_empty() {
            bail!("common_name cannot be empty");
        }

        let config_path = config_path
            .or_else(|| env::var("VPNDNS_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        Ok(Self {
            config_path,
            operation,
            address: address.to_string(),
            common_name: common_name.trim().to_string(),
            public_address: env::var("trusted_ip").ok().filter(|s| !s.is_empty()),
        })
    }
}

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = match Invocation::parse(&args) {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("{e}");
            return HookExitCode::StartupError.into();
        }
    };

    let config = match HookConfig::from_path(&invocation.config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Failed to load {}: {e}",
                invocation.config_path.display()
            );
            return HookExitCode::StartupError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {e}");
            return HookExitCode::StartupError.into();
        }
    };

    rt.block_on(reconcile(config, invocation));
    HookExitCode::Clean.into()
}

/// Run one reconciliation; every error past this point is logged, never
/// propagated
async fn reconcile(config: HookConfig, invocation: Invocation) {
    let address = match Address::classify(&invocation.address) {
        Ok(address) => address,
        Err(e) => {
            warn!(common_name = %invocation.common_name, "{e}; skipping update");
            return;
        }
    };

    let public_address = match invocation.public_address.as_deref().map(Address::classify) {
        Some(Ok(address)) => Some(address),
        Some(Err(e)) => {
            warn!(common_name = %invocation.common_name, "{e}; skipping update");
            return;
        }
        None => None,
    };

    let request = RecordChangeRequest {
        operation: invocation.operation,
        address,
        public_address,
        common_name: invocation.common_name,
    };

    let transaction = match build_transaction(&request, &config) {
        Ok(transaction) => transaction,
        Err(e) => {
            // Config was validated at load time; reaching this means the
            // zone lists changed underneath us.
            warn!("Failed to build transaction: {e}");
            return;
        }
    };

    if transaction.is_empty() {
        debug!(
            operation = %request.operation,
            common_name = %request.common_name,
            "No zone matched; no DNS action taken"
        );
        return;
    }

    let dispatcher = NsupdateDispatcher::new(
        config.nsupdate_path.as_deref().map(PathBuf::from),
        Some(Duration::from_secs(config.timeout_secs)),
    );

    match dispatcher.dispatch(&transaction).await {
        Ok(()) => info!(
            operation = %request.operation,
            common_name = %request.common_name,
            address = %request.address,
            "DNS records updated"
        ),
        Err(e) => {
            warn!("DNS update failed, continuing: {e}");
        }
    }
}

fn init_logging() {
    let level = match env::var("VPNDNS_LOG_LEVEL")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_learn_address_shape() {
        let inv = Invocation::parse(&args(&["add", "192.0.2.5", "client-a"])).unwrap();
        assert_eq!(inv.operation, Operation::Add);
        assert_eq!(inv.address, "192.0.2.5");
        assert_eq!(inv.common_name, "client-a");
    }

    #[test]
    fn config_flag_overrides_default_path() {
        let inv = Invocation::parse(&args(&[
            "--config",
            "/tmp/hook.json",
            "delete",
            "192.0.2.5",
            "client-a",
        ]))
        .unwrap();
        assert_eq!(inv.config_path, PathBuf::from("/tmp/hook.json"));
        assert_eq!(inv.operation, Operation::Delete);
    }

    #[test]
    fn rejects_wrong_argument_count() {
        assert!(Invocation::parse(&args(&["add", "192.0.2.5"])).is_err());
        assert!(Invocation::parse(&args(&["add", "192.0.2.5", "cn", "extra"])).is_err());
        assert!(Invocation::parse(&args(&[])).is_err());
    }

    #[test]
    fn rejects_unknown_operation() {
        assert!(Invocation::parse(&args(&["drop", "192.0.2.5", "client-a"])).is_err());
    }

    #[test]
    fn rejects_empty_common_name() {
        assert!(Invocation::parse(&args(&["add", "192.0.2.5", "  "])).is_err());
    }

    #[test]
    fn rejects_dangling_config_flag() {
        assert!(Invocation::parse(&args(&["add", "192.0.2.5", "cn", "--config"])).is_err());
    }
}

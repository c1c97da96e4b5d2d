// # nsupdate Dispatcher
//
// `UpdateDispatcher` implementation that feeds the transaction transcript
// to the BIND `nsupdate` utility over stdin.
//
// The dispatcher is single-shot: one subprocess per transaction, bounded by
// a timeout, no retries. A failed update is reported as `Error::Dispatch`
// with the exit status and stderr; deciding whether that failure matters is
// the caller's job (for the VPN hook it never is, record drift is accepted
// over blocking connection setup).

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};
use vpndns_core::{Error, Result, Transaction, UpdateDispatcher};

/// Default updater executable, resolved via PATH
const DEFAULT_PROGRAM: &str = "nsupdate";

/// Default execution bound for one updater run
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Dispatcher that runs the external `nsupdate` program
#[derive(Debug, Clone)]
pub struct NsupdateDispatcher {
    program: PathBuf,
    timeout: Duration,
}

impl NsupdateDispatcher {
    /// Create a dispatcher
    ///
    /// `program` overrides the executable path (`nsupdate` on PATH by
    /// default); `timeout` bounds a single run.
    pub fn new(program: Option<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM)),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }

    /// Path of the updater executable
    pub fn program(&self) -> &PathBuf {
        &self.program
    }
}

impl Default for NsupdateDispatcher {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[async_trait]
impl UpdateDispatcher for NsupdateDispatcher {
    async fn dispatch(&self, transaction: &Transaction) -> Result<()> {
        let transcript = transaction.to_transcript();
        debug!(
            program = %self.program.display(),
            lines = transaction.lines().len(),
            "Dispatching update transaction"
        );

        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::dispatch(format!(
                    "Failed to spawn {}: {e}",
                    self.program.display()
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::dispatch("Updater stdin not captured"))?;
        // A write failure here usually means the child already exited; its
        // exit status below is the authoritative outcome.
        if let Err(e) = stdin.write_all(transcript.as_bytes()).await {
            debug!("Writing transcript to updater stdin failed: {e}");
        }
        drop(stdin);

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                Error::dispatch(format!(
                    "{} did not finish within {:?}",
                    self.program.display(),
                    self.timeout
                ))
            })??;

        if output.status.success() {
            debug!("Updater accepted the batch");
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = ?output.status.code(), "Updater rejected the batch");
            Err(Error::dispatch(format!(
                "{} exited with {:?}: {}",
                self.program.display(),
                output.status.code(),
                stderr.trim()
            )))
        }
    }

    fn dispatcher_name(&self) -> &'static str {
        "nsupdate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vpndns_core::{Address, HookConfig, Operation, RecordChangeRequest, build_transaction};

    fn sample_transaction() -> Transaction {
        let config = HookConfig::from_json(
            r#"{
                "name_server": "ns1.corp.example",
                "private": { "zones": ["corp.example"] },
                "reverse_zones": ["2.0.192.in-addr.arpa"]
            }"#,
        )
        .unwrap();
        let request = RecordChangeRequest {
            operation: Operation::Add,
            address: Address::classify("192.0.2.5").unwrap(),
            public_address: None,
            common_name: "client-a".to_string(),
        };
        build_transaction(&request, &config).unwrap()
    }

    #[tokio::test]
    async fn succeeding_updater_yields_ok() {
        // cat consumes the transcript and exits zero
        let dispatcher = NsupdateDispatcher::new(Some(PathBuf::from("cat")), None);
        dispatcher.dispatch(&sample_transaction()).await.unwrap();
    }

    #[tokio::test]
    async fn nonzero_exit_is_a_dispatch_error() {
        let dispatcher = NsupdateDispatcher::new(Some(PathBuf::from("false")), None);
        let err = dispatcher.dispatch(&sample_transaction()).await.unwrap_err();
        assert!(matches!(err, Error::Dispatch(_)));
    }

    #[tokio::test]
    async fn missing_executable_is_a_dispatch_error() {
        let dispatcher = NsupdateDispatcher::new(
            Some(PathBuf::from("/nonexistent/vpndns-updater")),
            None,
        );
        let err = dispatcher.dispatch(&sample_transaction()).await.unwrap_err();
        assert!(matches!(err, Error::Dispatch(_)));
    }

    #[tokio::test]
    async fn slow_updater_hits_the_timeout() {
        // yes runs until killed; kill_on_drop reaps it after the timeout
        let dispatcher = NsupdateDispatcher::new(
            Some(PathBuf::from("yes")),
            Some(Duration::from_millis(100)),
        );
        let err = dispatcher.dispatch(&sample_transaction()).await.unwrap_err();
        assert!(matches!(err, Error::Dispatch(_)));
        assert!(err.to_string().contains("did not finish"));
    }
}

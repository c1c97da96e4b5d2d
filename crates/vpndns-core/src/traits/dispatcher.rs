// # Update Dispatcher Trait
//
// Defines the interface for applying a finished transaction against the
// nameserver.
//
// ## Implementations
//
// - nsupdate subprocess: `vpndns-nsupdate` crate
//
// Dispatchers are single-shot: one transaction in, one attempt out. They
// must not retry and must not mutate the transaction; whether a failed
// update is retried or ignored is the caller's policy. Record-update
// failures must never abort the VPN daemon's connection lifecycle, so the
// hook logs dispatch errors and exits cleanly.

use async_trait::async_trait;

use crate::error::Result;
use crate::transaction::Transaction;

/// Trait for update-dispatcher implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait UpdateDispatcher: Send + Sync {
    /// Apply one transaction against the nameserver
    ///
    /// Callers must not pass an empty transaction; skipping dispatch for
    /// empty transactions is their responsibility.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: the updater accepted the batch
    /// - `Err(Error::Dispatch)`: spawn failure, non-zero exit, or timeout
    async fn dispatch(&self, transaction: &Transaction) -> Result<()>;

    /// Dispatcher name for logging
    fn dispatcher_name(&self) -> &'static str;
}

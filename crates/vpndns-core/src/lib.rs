// # vpndns-core
//
// Core library for VPN-driven DNS record reconciliation.
//
// ## Architecture Overview
//
// Each VPN connect/disconnect event becomes one stateless reconciliation of a
// single address/common-name pair:
//
// - **Address**: classifies a raw address string (IPv4/IPv6) and derives its
//   reverse-lookup name
// - **ZoneSet / ReverseZoneSet**: select which configured zones apply to a
//   name or address
// - **build_transaction**: composes matcher results into an ordered
//   delete-then-add dynamic-update transcript
// - **UpdateDispatcher**: trait boundary for feeding the transcript to an
//   external updater (implemented in `vpndns-nsupdate`)
//
// ## Design Principles
//
// 1. **Pure core**: matching and transaction building perform no I/O
// 2. **Immutable configuration**: zone sets are built once at startup and
//    passed explicitly into every call
// 3. **Idempotency**: every add is preceded by a delete for the same
//    owner+type, so repeated notifications never accumulate records

pub mod address;
pub mod config;
pub mod error;
pub mod traits;
pub mod transaction;
pub mod zone;

// Re-export core types for convenience
pub use address::{Address, AddressFamily};
pub use config::{HookConfig, RealmConfig, TsigKey};
pub use error::{Error, Result};
pub use traits::UpdateDispatcher;
pub use transaction::{Operation, RecordChangeRequest, Transaction, build_transaction};
pub use zone::{ForwardMatch, ReverseZoneSet, ZoneSet};

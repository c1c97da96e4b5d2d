//! Contract tests: batch grouping and realm handling
//!
//! Verifies the `batch_all_zones` policy switch and the treatment of the
//! optional public realm.

mod common;

use common::*;
use vpndns_core::{Operation, build_transaction};

#[test]
fn batch_all_zones_commits_once() {
    let config = with_public_realm(base_config());
    let req = dual_realm_request(Operation::Add, "192.0.2.5", "203.0.113.7", "client-a");

    let txn = build_transaction(&req, &config).unwrap();
    let lines = txn.lines();

    assert_eq!(lines.iter().filter(|l| l.starts_with("server ")).count(), 1);
    assert_eq!(lines.iter().filter(|l| *l == "send").count(), 1);
    assert_eq!(lines.last().map(String::as_str), Some("send"));
}

#[test]
fn per_zone_batching_commits_each_zone_independently() {
    let mut config = with_public_realm(base_config());
    config.batch_all_zones = false;
    let req = dual_realm_request(Operation::Add, "192.0.2.5", "203.0.113.7", "client-a");

    let txn = build_transaction(&req, &config).unwrap();
    let lines = txn.lines();

    let zone_count = lines.iter().filter(|l| l.starts_with("zone ")).count();
    assert_eq!(zone_count, 4);
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("server ")).count(),
        zone_count
    );
    assert_eq!(lines.iter().filter(|l| *l == "send").count(), zone_count);

    // Every batch opens with server and closes with send.
    for batch in lines.split(|l| l == "send").filter(|b| !b.is_empty()) {
        assert!(batch[0].starts_with("server "));
        assert_eq!(batch.iter().filter(|l| l.starts_with("zone ")).count(), 1);
    }
}

#[test]
fn bare_cn_lands_in_each_realms_first_zone() {
    let config = with_public_realm(base_config());
    let req = dual_realm_request(Operation::Add, "192.0.2.5", "203.0.113.7", "client-a");

    let txn = build_transaction(&req, &config).unwrap();

    assert!(
        txn.lines()
            .contains(&"update add client-a.corp.example. 3600 A 192.0.2.5".to_string())
    );
    assert!(
        txn.lines()
            .contains(&"update add client-a.dyn.example.net. 3600 A 203.0.113.7".to_string())
    );
    assert!(
        txn.lines()
            .contains(&"update add 7.113.0.203.in-addr.arpa. 3600 PTR client-a".to_string())
    );
}

#[test]
fn public_address_without_public_realm_gets_reverse_records_only() {
    let mut config = base_config();
    config
        .reverse_zones
        .push("113.0.203.in-addr.arpa".to_string());
    let req = dual_realm_request(Operation::Add, "192.0.2.5", "203.0.113.7", "client-a");

    let txn = build_transaction(&req, &config).unwrap();

    let forward_adds = txn
        .lines()
        .iter()
        .filter(|l| l.starts_with("update add") && l.contains(" A "))
        .count();
    assert_eq!(forward_adds, 1, "only the private realm has forward zones");
    assert!(
        txn.lines()
            .contains(&"update add 7.113.0.203.in-addr.arpa. 3600 PTR client-a".to_string())
    );
}

#[test]
fn public_search_domain_qualifies_public_forward_records() {
    let mut config = with_public_realm(base_config());
    if let Some(ref mut public) = config.public {
        public.search_domain = Some("dyn.example.net".to_string());
    }
    let req = dual_realm_request(Operation::Add, "192.0.2.5", "203.0.113.7", "client-a");

    let txn = build_transaction(&req, &config).unwrap();

    assert!(
        txn.lines()
            .contains(&"update add client-a.dyn.example.net. 3600 A 203.0.113.7".to_string())
    );
}

#[test]
fn per_zone_batches_carry_the_key_directive() {
    let mut config = base_config();
    config.batch_all_zones = false;
    config.key = Some(vpndns_core::TsigKey {
        algorithm: "hmac-sha256".to_string(),
        name: "vpndns".to_string(),
        secret: "c2VjcmV0".to_string(),
    });
    let req = request(Operation::Add, "192.0.2.5", "client-a");

    let txn = build_transaction(&req, &config).unwrap();
    let key_count = txn
        .lines()
        .iter()
        .filter(|l| l.starts_with("key "))
        .count();
    let send_count = txn.lines().iter().filter(|l| *l == "send").count();
    assert_eq!(key_count, send_count);
}

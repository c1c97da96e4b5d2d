//! Common helpers for reconciliation contract tests

use vpndns_core::{Address, HookConfig, Operation, RealmConfig, RecordChangeRequest};

/// Config with one private zone and one v4 reverse zone
pub fn base_config() -> HookConfig {
    HookConfig::from_json(
        r#"{
            "name_server": "ns1.corp.example",
            "private": { "zones": ["corp.example"] },
            "reverse_zones": ["2.0.192.in-addr.arpa"]
        }"#,
    )
    .expect("base config is valid")
}

/// Add a public realm and a public reverse zone to a config
pub fn with_public_realm(mut config: HookConfig) -> HookConfig {
    config.public = Some(RealmConfig {
        zones: vec!["dyn.example.net".to_string()],
        search_domain: None,
    });
    config
        .reverse_zones
        .push("113.0.203.in-addr.arpa".to_string());
    config.validate().expect("config stays valid");
    config
}

/// Request for a single private address
pub fn request(operation: Operation, address: &str, common_name: &str) -> RecordChangeRequest {
    RecordChangeRequest {
        operation,
        address: Address::classify(address).expect("test address is valid"),
        public_address: None,
        common_name: common_name.to_string(),
    }
}

/// Request carrying a public address as well
pub fn dual_realm_request(
    operation: Operation,
    address: &str,
    public_address: &str,
    common_name: &str,
) -> RecordChangeRequest {
    RecordChangeRequest {
        public_address: Some(Address::classify(public_address).expect("test address is valid")),
        ..request(operation, address, common_name)
    }
}

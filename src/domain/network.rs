//! Static network table: chain id → display name and payment contract.

use serde::Serialize;

/// Display name used for any chain id missing from [`NETWORKS`].
pub const UNKNOWN_NETWORK: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkEntry {
    /// Hex chain id as reported by `eth_chainId` (e.g. `0x1`).
    pub chain_id: &'static str,
    pub name: &'static str,
    /// Address of the payment contract used for contract transfers on this network.
    pub payment_contract: &'static str,
}

pub const NETWORKS: &[NetworkEntry] = &[
    NetworkEntry {
        chain_id: "0x1",
        name: "Ethereum",
        payment_contract: "0x1234567890123456789012345678901234567890",
    },
    NetworkEntry {
        chain_id: "0xaa36a7",
        name: "Sepolia",
        payment_contract: "0xABCDEF1234567890123456789012345678901234",
    },
    NetworkEntry {
        chain_id: "0x5",
        name: "Goerli",
        payment_contract: "0x9876543210987654321098765432109876543210",
    },
    NetworkEntry {
        chain_id: "0x4268",
        name: "Holesky",
        payment_contract: "0x5678901234567890123456789012345678901234",
    },
    NetworkEntry {
        chain_id: "0x89",
        name: "Polygon",
        payment_contract: "0x3456789012345678901234567890123456789012",
    },
    NetworkEntry {
        chain_id: "0x13881",
        name: "Mumbai",
        payment_contract: "0x7890123456789012345678901234567890123456",
    },
];

/// Looks up a network by chain id, ignoring ASCII case of the hex digits.
pub fn network_by_chain_id(chain_id: &str) -> Option<&'static NetworkEntry> {
    let chain_id = chain_id.trim();
    NETWORKS
        .iter()
        .find(|n| n.chain_id.eq_ignore_ascii_case(chain_id))
}

pub fn network_by_name(name: &str) -> Option<&'static NetworkEntry> {
    NETWORKS.iter().find(|n| n.name == name)
}

/// Resolves the display name for a chain id. Unknown ids map to [`UNKNOWN_NETWORK`].
pub fn network_name(chain_id: &str) -> &'static str {
    network_by_chain_id(chain_id)
        .map(|n| n.name)
        .unwrap_or(UNKNOWN_NETWORK)
}

/// Payment contract configured for a network display name, if any.
pub fn payment_contract(network_name: &str) -> Option<&'static str> {
    network_by_name(network_name).map(|n| n.payment_contract)
}

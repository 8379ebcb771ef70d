use serde::{Deserialize, Serialize};

/// One address observed holding a token. Finalized once; classification is
/// attached when the record is built, never rewritten afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holder {
    pub owner: String,
    pub balance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}

/// Token metadata as reported by the explorer, decimals already parsed
#[derive(Debug, Clone)]
pub struct TokenMetadata {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub total_supply_raw: String,
}

/// Result of the holder aggregation: top holders ranked by balance plus the
/// unique-owner count (`-1` when the count exceeds what pagination can see)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldersClassification {
    pub total_holders: i64,
    pub top_holders: Vec<Holder>,
    pub total_supply: f64,
}

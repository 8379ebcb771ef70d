use serde::{Deserialize, Serialize};

/// Fungible token record as collected from upstream, before normalization.
/// `raw_balance` stays in base units; scaling happens in the normalizer.
#[derive(Debug, Clone)]
pub struct RawFungible {
    pub contract_id: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub raw_balance: String,
    pub price_per_unit: f64,
    pub image_url: String,
}

/// Non-fungible record as collected from upstream
#[derive(Debug, Clone)]
pub struct RawNft {
    pub contract_id: String,
    pub token_id: String,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub collection: Option<String>,
}

/// Canonical fungible entry in a rendered portfolio; balance is decimal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub contract_id: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub balance: f64,
    pub price_per_unit: f64,
    pub image_url: String,
}

/// Canonical NFT entry; missing display fields fall back to empty strings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftRecord {
    pub contract_id: String,
    pub token_id: String,
    pub name: String,
    pub image_url: String,
    pub collection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub address: String,
    pub total_value: f64,
    pub tokens: Vec<Token>,
    pub nfts: Vec<NftRecord>,
}

/// Explorer API wire shapes
///
/// Every endpoint answers with the `{status, message, result}` envelope;
/// `status != "1"` is an application-level failure even on HTTP 200. Numeric
/// fields arrive as decimal strings and stay strings here; conversion happens
/// in the consuming component.
use serde::Deserialize;
use serde_json::Value;

/// Generic explorer envelope; `result` is decoded in a second step so error
/// payloads (where it is a plain string) do not break deserialization
#[derive(Debug, Deserialize)]
pub struct ScanEnvelope {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub result: Value,
}

/// `module=token&action=tokeninfo` record
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfoRaw {
    #[serde(alias = "contractAddress", default)]
    pub contract_address: String,
    #[serde(alias = "tokenName", alias = "name")]
    pub name: String,
    pub symbol: String,
    #[serde(alias = "divisor", alias = "decimals")]
    pub decimals: String,
    #[serde(alias = "totalSupply")]
    pub total_supply: String,
}

/// `module=token&action=topholders` record
#[derive(Debug, Clone, Deserialize)]
pub struct TopHolderRaw {
    #[serde(alias = "TokenHolderAddress")]
    pub address: String,
    #[serde(alias = "TokenHolderQuantity")]
    pub quantity: String,
}

/// `module=account&action=tokentx` record (fungible transfer event)
#[derive(Debug, Clone, Deserialize)]
pub struct TransferEventRaw {
    pub from: String,
    pub to: String,
    pub value: String,
    #[serde(alias = "contractAddress")]
    pub contract_address: String,
    #[serde(alias = "tokenName", default)]
    pub token_name: String,
    #[serde(alias = "tokenSymbol", default)]
    pub token_symbol: String,
    #[serde(alias = "tokenDecimal", default)]
    pub token_decimal: String,
}

/// `module=account&action=tokennfttx` record (NFT transfer event)
#[derive(Debug, Clone, Deserialize)]
pub struct NftTransferRaw {
    pub from: String,
    pub to: String,
    #[serde(alias = "contractAddress")]
    pub contract_address: String,
    #[serde(alias = "tokenID")]
    pub token_id: String,
    #[serde(alias = "tokenName", default)]
    pub token_name: String,
    #[serde(alias = "tokenSymbol", default)]
    pub token_symbol: String,
}

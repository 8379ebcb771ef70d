/// Token holder aggregation and classification
///
/// Top holders come from the explorer's `topholders` action when available;
/// when that tier is missing the holder map is rebuilt by replaying the full
/// transfer log (debit sender, credit receiver) in the order the explorer
/// returns it. Balances are accumulated in raw units (i128) and scaled to
/// decimal only at the end, so long replay chains do not drift.
pub mod known;
pub mod types;

pub use self::types::{Holder, HoldersClassification, TokenMetadata};

use crate::apis::bscscan::types::TopHolderRaw;
use crate::apis::bscscan::BscScanClient;
use crate::apis::rpc::BscRpcClient;
use crate::constants::{
    CLASSIFY_CHUNK_SIZE, HOLDER_COUNT_SENTINEL, HOLDER_COUNT_SENTINEL_LIMIT,
    TRANSFER_LOG_MAX_PAGES, TRANSFER_LOG_PAGE_SIZE,
};
use crate::errors::{FetchError, LensError, LensResult};
use crate::logger::{self, LogTag};
use crate::validation::normalize_address;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};

const CLASSIFICATION_CONTRACT: &str = "Contract";
const CLASSIFICATION_EOA: &str = "EOA";

/// Classify the top `limit` holders of a token contract.
///
/// Metadata failure is fatal (`TokenNotFound` when the explorer does not know
/// the contract); a single holder's classification failure leaves that
/// holder's `classification` unset instead of aborting the batch.
pub async fn get_holders_classification(
    scan: &BscScanClient,
    rpc: &BscRpcClient,
    contract: &str,
    limit: usize,
) -> LensResult<HoldersClassification> {
    let contract = normalize_address(contract)?;

    let metadata = fetch_metadata(scan, &contract).await?;
    let total_supply = scale_units_str(&metadata.total_supply_raw, metadata.decimals);

    logger::info(
        LogTag::Holders,
        &format!(
            "aggregating holders of {} ({}), top {}",
            metadata.symbol, contract, limit
        ),
    );

    let (holder_map, total_holders) = tokio::join!(
        candidate_holders(scan, &contract, metadata.decimals),
        count_unique_owners(scan, &contract),
    );
    let holder_map = holder_map?;
    let total_holders = total_holders?;

    // drop non-positive balances, rank best first, keep the top n
    let mut ranked: Vec<(String, f64)> = holder_map
        .into_iter()
        .filter(|(_, balance)| *balance > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(limit);

    let top_holders = classify_holders(rpc, ranked).await;

    Ok(HoldersClassification {
        total_holders,
        top_holders,
        total_supply,
    })
}

async fn fetch_metadata(scan: &BscScanClient, contract: &str) -> LensResult<TokenMetadata> {
    let info = scan
        .token_info(contract)
        .await?
        .ok_or_else(|| LensError::token_not_found(contract))?;

    let decimals = info.decimals.parse::<u32>().map_err(|e| {
        LensError::Fetch(FetchError::Parse {
            provider: "bscscan".to_string(),
            message: format!("tokeninfo: bad decimals '{}': {}", info.decimals, e),
        })
    })?;

    Ok(TokenMetadata {
        address: contract.to_string(),
        name: info.name,
        symbol: info.symbol,
        decimals,
        total_supply_raw: info.total_supply,
    })
}

/// Candidate holder set as address -> decimal balance
async fn candidate_holders(
    scan: &BscScanClient,
    contract: &str,
    decimals: u32,
) -> LensResult<HashMap<String, f64>> {
    match scan.top_holders(contract, 100).await {
        Ok(raw) => Ok(holders_from_top(raw, decimals)),
        Err(FetchError::Upstream { message, .. }) => {
            logger::warning(
                LogTag::Holders,
                &format!("topholders unavailable ({}), replaying transfer log", message),
            );
            replay_transfer_log(scan, contract, decimals).await
        }
        Err(e) => Err(e.into()),
    }
}

fn holders_from_top(raw: Vec<TopHolderRaw>, decimals: u32) -> HashMap<String, f64> {
    let mut map = HashMap::new();
    for holder in raw {
        let balance = scale_units_str(&holder.quantity, decimals);
        map.insert(holder.address.to_lowercase(), balance);
    }
    map
}

/// Rebuild holder balances from the transfer log, page by page, in the order
/// the explorer hands events back. Raw amounts accumulate as signed i128.
async fn replay_transfer_log(
    scan: &BscScanClient,
    contract: &str,
    decimals: u32,
) -> LensResult<HashMap<String, f64>> {
    let mut raw_balances: HashMap<String, i128> = HashMap::new();

    for page in 1..=TRANSFER_LOG_MAX_PAGES {
        let events = scan
            .token_transfers_page(contract, page, TRANSFER_LOG_PAGE_SIZE)
            .await?;
        if events.is_empty() {
            break;
        }
        let page_len = events.len();

        for event in events {
            let amount = match event.value.parse::<i128>() {
                Ok(v) => v,
                Err(_) => continue,
            };
            *raw_balances.entry(event.from.to_lowercase()).or_insert(0) -= amount;
            *raw_balances.entry(event.to.to_lowercase()).or_insert(0) += amount;
        }

        if page_len < TRANSFER_LOG_PAGE_SIZE {
            break;
        }
    }

    Ok(raw_balances
        .into_iter()
        .map(|(owner, raw)| (owner, scale_units_i128(raw, decimals)))
        .collect())
}

/// Unique owner count across the paginated transfer log, or the sentinel when
/// the set outgrows what capped pagination can count reliably
async fn count_unique_owners(scan: &BscScanClient, contract: &str) -> LensResult<i64> {
    let mut owners: HashSet<String> = HashSet::new();

    for page in 1..=TRANSFER_LOG_MAX_PAGES {
        let events = scan
            .token_transfers_page(contract, page, TRANSFER_LOG_PAGE_SIZE)
            .await?;
        if events.is_empty() {
            break;
        }
        let page_len = events.len();

        for event in &events {
            owners.insert(event.from.to_lowercase());
            owners.insert(event.to.to_lowercase());
        }

        if page_len < TRANSFER_LOG_PAGE_SIZE {
            break;
        }
    }

    if owners.len() > HOLDER_COUNT_SENTINEL_LIMIT {
        return Ok(HOLDER_COUNT_SENTINEL);
    }
    Ok(owners.len() as i64)
}

/// Attach a classification to each ranked holder. Chunk members run
/// concurrently; chunks run one after another to bound in-flight calls.
async fn classify_holders(rpc: &BscRpcClient, ranked: Vec<(String, f64)>) -> Vec<Holder> {
    let mut holders = Vec::with_capacity(ranked.len());

    for chunk in ranked.chunks(CLASSIFY_CHUNK_SIZE) {
        let futures = chunk
            .iter()
            .map(|(owner, _)| classify_one(rpc, owner.clone()));
        let classifications = join_all(futures).await;

        for ((owner, balance), classification) in chunk.iter().cloned().zip(classifications) {
            holders.push(Holder {
                owner,
                balance,
                classification,
            });
        }
    }

    holders
}

async fn classify_one(rpc: &BscRpcClient, owner: String) -> Option<String> {
    if let Some(label) = known::label_for(&owner) {
        return Some(label.to_string());
    }

    match rpc.has_contract_code(&owner).await {
        Ok(true) => Some(CLASSIFICATION_CONTRACT.to_string()),
        Ok(false) => Some(CLASSIFICATION_EOA.to_string()),
        Err(e) => {
            logger::warning(
                LogTag::Holders,
                &format!("classification of {} failed: {}", owner, e),
            );
            None
        }
    }
}

/// Scale a raw decimal-string amount by 10^decimals
fn scale_units_str(raw: &str, decimals: u32) -> f64 {
    raw.parse::<f64>().unwrap_or(0.0) / 10f64.powi(decimals as i32)
}

fn scale_units_i128(raw: i128, decimals: u32) -> f64 {
    raw as f64 / 10f64.powi(decimals as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::bscscan::types::TransferEventRaw;

    fn event(from: &str, to: &str, value: &str) -> TransferEventRaw {
        TransferEventRaw {
            from: from.to_string(),
            to: to.to_string(),
            value: value.to_string(),
            contract_address: "0x00000000000000000000000000000000000000cc".to_string(),
            token_name: "Example".to_string(),
            token_symbol: "EXM".to_string(),
            token_decimal: "18".to_string(),
        }
    }

    fn replay(events: Vec<TransferEventRaw>, decimals: u32) -> HashMap<String, f64> {
        let mut raw_balances: HashMap<String, i128> = HashMap::new();
        for e in events {
            let amount = e.value.parse::<i128>().unwrap();
            *raw_balances.entry(e.from.to_lowercase()).or_insert(0) -= amount;
            *raw_balances.entry(e.to.to_lowercase()).or_insert(0) += amount;
        }
        raw_balances
            .into_iter()
            .map(|(owner, raw)| (owner, scale_units_i128(raw, decimals)))
            .collect()
    }

    const MINT: &str = "0x0000000000000000000000000000000000000000";
    const A: &str = "0x00000000000000000000000000000000000000a1";
    const B: &str = "0x00000000000000000000000000000000000000b2";
    const C: &str = "0x00000000000000000000000000000000000000c3";

    #[test]
    fn replay_credits_and_debits() {
        // mint 100 to A, A sends 30 to B, B sends 30 to C
        let balances = replay(
            vec![
                event(MINT, A, "100000000000000000000"),
                event(A, B, "30000000000000000000"),
                event(B, C, "30000000000000000000"),
            ],
            18,
        );
        assert!((balances[A] - 70.0).abs() < 1e-9);
        assert!((balances[B]).abs() < 1e-9);
        assert!((balances[C] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn replay_can_leave_a_sender_negative() {
        // A sends without ever receiving; B forwards part of it on
        let balances = replay(
            vec![event(A, B, "100"), event(B, C, "40")],
            18,
        );
        assert!((balances[A] - (-100e-18)).abs() < 1e-30);
        assert!((balances[B] - 60e-18).abs() < 1e-30);
        assert!((balances[C] - 40e-18).abs() < 1e-30);

        let mut ranked: Vec<(String, f64)> = balances
            .into_iter()
            .filter(|(_, balance)| *balance > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

        let owners: Vec<&str> = ranked.iter().map(|(owner, _)| owner.as_str()).collect();
        assert_eq!(owners, vec![B, C]);
    }

    #[test]
    fn non_positive_balances_are_dropped_before_ranking() {
        let balances = replay(
            vec![
                event(MINT, A, "50"),
                event(A, B, "50"), // A ends at zero
            ],
            0,
        );

        let mut ranked: Vec<(String, f64)> = balances
            .into_iter()
            .filter(|(owner, balance)| *balance > 0.0 && owner != MINT)
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0, B);
    }

    #[test]
    fn ranking_is_descending_and_bounded_by_limit() {
        let balances = replay(
            vec![
                event(MINT, A, "10"),
                event(MINT, B, "30"),
                event(MINT, C, "20"),
            ],
            0,
        );

        let mut ranked: Vec<(String, f64)> = balances
            .into_iter()
            .filter(|(owner, balance)| *balance > 0.0 && owner != MINT)
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        ranked.truncate(2);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, B);
        assert_eq!(ranked[1].0, C);
    }

    #[test]
    fn sentinel_replaces_uncountable_owner_sets() {
        let mut owners: HashSet<String> = HashSet::new();
        for i in 0..(HOLDER_COUNT_SENTINEL_LIMIT + 1) {
            owners.insert(format!("0x{:040x}", i));
        }
        let count = if owners.len() > HOLDER_COUNT_SENTINEL_LIMIT {
            HOLDER_COUNT_SENTINEL
        } else {
            owners.len() as i64
        };
        assert_eq!(count, HOLDER_COUNT_SENTINEL);
    }

    #[test]
    fn scaling_uses_token_decimals() {
        assert!((scale_units_str("1500000000000000000", 18) - 1.5).abs() < 1e-12);
        assert!((scale_units_str("2500", 2) - 25.0).abs() < 1e-12);
        assert_eq!(scale_units_str("not-a-number", 18), 0.0);
    }
}

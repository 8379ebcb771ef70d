/// Wallet portfolio aggregation
///
/// Two layers: `transform_to_portfolio` is the pure normalizer (rename
/// wrapped native, dust-filter, scale balances, dedupe the native symbol,
/// native entry first, sum total value); `get_portfolio` composes it with the
/// upstream fetchers. The fungible picture and the native balance are
/// required; prices, logos and NFTs degrade to defaults when their fetch
/// fails.
pub mod types;

pub use self::types::{NftRecord, Portfolio, RawFungible, RawNft, Token};

use crate::apis::bscscan::types::{NftTransferRaw, TransferEventRaw};
use crate::apis::bscscan::BscScanClient;
use crate::apis::coingecko::CoinGeckoClient;
use crate::apis::rpc::BscRpcClient;
use crate::apis::tokenlist::TokenListClient;
use crate::constants::{
    NATIVE_DECIMALS, NATIVE_LOGO_URL, NATIVE_NAME, NATIVE_SYMBOL, NATIVE_TOKEN_ADDRESS,
    WRAPPED_NATIVE_CONTRACT,
};
use crate::errors::{LensError, LensResult};
use crate::logger::{self, LogTag};
use crate::validation::normalize_address;
use std::collections::HashMap;

/// Pure normalization step. Input order of non-native fungibles is preserved;
/// only the native entry is repositioned.
pub fn transform_to_portfolio(
    address: &str,
    fungibles: Vec<RawFungible>,
    nfts: Vec<RawNft>,
    dust_threshold: f64,
) -> Portfolio {
    let mut tokens: Vec<Token> = Vec::with_capacity(fungibles.len());

    for mut raw in fungibles {
        // wrapped native is displayed under the native label, balances stay separate
        if raw.contract_id.eq_ignore_ascii_case(WRAPPED_NATIVE_CONTRACT) {
            raw.name = NATIVE_SYMBOL.to_string();
            raw.symbol = NATIVE_SYMBOL.to_string();
        }

        let balance = scale_units(&raw.raw_balance, raw.decimals);
        let value = balance * raw.price_per_unit;

        let is_native_sentinel = raw.contract_id.eq_ignore_ascii_case(NATIVE_TOKEN_ADDRESS);
        if !is_native_sentinel && value <= dust_threshold {
            continue;
        }

        tokens.push(Token {
            contract_id: raw.contract_id,
            name: raw.name,
            symbol: raw.symbol,
            decimals: raw.decimals,
            balance,
            price_per_unit: raw.price_per_unit,
            image_url: raw.image_url,
        });
    }

    // the native symbol appears at most once; first occurrence wins
    let mut seen_native_symbol = false;
    tokens.retain(|token| {
        if token.symbol == NATIVE_SYMBOL {
            if seen_native_symbol {
                return false;
            }
            seen_native_symbol = true;
        }
        true
    });

    let total_value: f64 = tokens
        .iter()
        .map(|token| token.balance * token.price_per_unit)
        .sum();

    // native entry always leads
    if let Some(position) = tokens.iter().position(|token| token.symbol == NATIVE_SYMBOL) {
        if position > 0 {
            let native = tokens.remove(position);
            tokens.insert(0, native);
        }
    }

    let nfts = nfts
        .into_iter()
        .map(|raw| NftRecord {
            contract_id: raw.contract_id,
            token_id: raw.token_id,
            name: raw.name.unwrap_or_default(),
            image_url: raw.image_url.unwrap_or_default(),
            collection: raw.collection.unwrap_or_default(),
        })
        .collect();

    Portfolio {
        address: address.to_string(),
        total_value,
        tokens,
        nfts,
    }
}

/// Full portfolio for a wallet address.
///
/// Required: the wallet's transfer history (fungible picture) and the native
/// balance. Auxiliary: prices, logos, NFTs. Required failures surface as
/// `AggregationError`; auxiliary failures leave defaults in place.
pub async fn get_portfolio(
    scan: &BscScanClient,
    rpc: &BscRpcClient,
    prices: &CoinGeckoClient,
    token_list: &TokenListClient,
    address: &str,
    dust_threshold: f64,
) -> LensResult<Portfolio> {
    let address = normalize_address(address)?;

    logger::info(LogTag::Portfolio, &format!("building portfolio for {}", address));

    let (transfers, native_balance, nft_transfers, native_price) = tokio::join!(
        scan.wallet_token_transfers(&address),
        rpc.get_native_balance(&address),
        scan.wallet_nft_transfers(&address),
        prices.native_price_usd(),
    );

    let transfers = transfers
        .map_err(|e| LensError::required_fetch_failed("wallet transfer history", e.to_string()))?;
    let native_balance = native_balance
        .map_err(|e| LensError::required_fetch_failed("native balance", e.to_string()))?;

    let nfts = match nft_transfers {
        Ok(events) => held_nfts(&address, events),
        Err(e) => {
            logger::warning(LogTag::Portfolio, &format!("NFT fetch failed, omitting: {}", e));
            Vec::new()
        }
    };

    let native_price = match native_price {
        Ok(price) => price,
        Err(e) => {
            logger::warning(
                LogTag::Portfolio,
                &format!("native price unavailable, using 0: {}", e),
            );
            0.0
        }
    };

    let mut fungibles = held_fungibles(&address, transfers);

    let contracts: Vec<String> = fungibles.iter().map(|f| f.contract_id.clone()).collect();
    let token_prices = match prices.token_prices_usd(&contracts).await {
        Ok(map) => map,
        Err(e) => {
            logger::warning(
                LogTag::Portfolio,
                &format!("token prices unavailable, using 0: {}", e),
            );
            HashMap::new()
        }
    };
    for fungible in &mut fungibles {
        if let Some(price) = token_prices.get(&fungible.contract_id.to_lowercase()) {
            fungible.price_per_unit = *price;
        }
    }

    if let Ok(listed) = token_list.tokens().await {
        let logos: HashMap<String, String> = listed
            .iter()
            .filter_map(|token| {
                token
                    .logo_uri
                    .clone()
                    .map(|uri| (token.address.to_lowercase(), uri))
            })
            .collect();
        for fungible in &mut fungibles {
            if fungible.image_url.is_empty() {
                if let Some(uri) = logos.get(&fungible.contract_id.to_lowercase()) {
                    fungible.image_url = uri.clone();
                }
            }
        }
    }

    // non-native entries sorted by descending value before normalization
    fungibles.sort_by(|a, b| {
        let value_a = scale_units(&a.raw_balance, a.decimals) * a.price_per_unit;
        let value_b = scale_units(&b.raw_balance, b.decimals) * b.price_per_unit;
        value_b
            .partial_cmp(&value_a)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // synthetic native entry leads so symbol dedup keeps the real balance
    if native_balance > 0.0 {
        fungibles.insert(0, native_entry(native_balance, native_price));
    }

    Ok(transform_to_portfolio(&address, fungibles, nfts, dust_threshold))
}

fn native_entry(balance: f64, price: f64) -> RawFungible {
    // balance is already decimal; a zero-decimals raw record carries it through
    RawFungible {
        contract_id: NATIVE_TOKEN_ADDRESS.to_string(),
        name: NATIVE_NAME.to_string(),
        symbol: NATIVE_SYMBOL.to_string(),
        decimals: 0,
        raw_balance: format!("{}", balance),
        price_per_unit: price,
        image_url: NATIVE_LOGO_URL.to_string(),
    }
}

/// Replay the wallet's own transfer history into per-contract balances
fn held_fungibles(address: &str, transfers: Vec<TransferEventRaw>) -> Vec<RawFungible> {
    struct Position {
        raw_balance: i128,
        name: String,
        symbol: String,
        decimals: u32,
    }

    let wallet = address.to_lowercase();
    let mut positions: HashMap<String, Position> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for event in transfers {
        let amount = match event.value.parse::<i128>() {
            Ok(v) => v,
            Err(_) => continue,
        };
        let contract = event.contract_address.to_lowercase();

        let position = positions.entry(contract.clone()).or_insert_with(|| {
            order.push(contract.clone());
            Position {
                raw_balance: 0,
                name: event.token_name.clone(),
                symbol: event.token_symbol.clone(),
                decimals: event.token_decimal.parse().unwrap_or(NATIVE_DECIMALS),
            }
        });

        if event.to.to_lowercase() == wallet {
            position.raw_balance += amount;
        }
        if event.from.to_lowercase() == wallet {
            position.raw_balance -= amount;
        }
    }

    order
        .into_iter()
        .filter_map(|contract| {
            let position = positions.remove(&contract)?;
            if position.raw_balance <= 0 {
                return None;
            }
            Some(RawFungible {
                contract_id: contract,
                name: position.name,
                symbol: position.symbol,
                decimals: position.decimals,
                raw_balance: position.raw_balance.to_string(),
                price_per_unit: 0.0,
                image_url: String::new(),
            })
        })
        .collect()
}

/// Replay NFT transfer events into the wallet's current holdings
fn held_nfts(address: &str, events: Vec<NftTransferRaw>) -> Vec<RawNft> {
    let wallet = address.to_lowercase();
    let mut held: HashMap<(String, String), RawNft> = HashMap::new();
    let mut order: Vec<(String, String)> = Vec::new();

    for event in events {
        let key = (event.contract_address.to_lowercase(), event.token_id.clone());

        if event.to.to_lowercase() == wallet {
            if !held.contains_key(&key) {
                order.push(key.clone());
            }
            held.insert(
                key,
                RawNft {
                    contract_id: event.contract_address.to_lowercase(),
                    token_id: event.token_id,
                    name: none_if_empty(event.token_name),
                    image_url: None,
                    collection: none_if_empty(event.token_symbol),
                },
            );
        } else if event.from.to_lowercase() == wallet {
            held.remove(&key);
        }
    }

    order
        .into_iter()
        .filter_map(|key| held.remove(&key))
        .collect()
}

fn none_if_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn scale_units(raw: &str, decimals: u32) -> f64 {
    raw.parse::<f64>().unwrap_or(0.0) / 10f64.powi(decimals as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET: &str = "0x00000000000000000000000000000000000000e0";

    fn raw(contract: &str, symbol: &str, decimals: u32, raw_balance: &str, price: f64) -> RawFungible {
        RawFungible {
            contract_id: contract.to_string(),
            name: symbol.to_string(),
            symbol: symbol.to_string(),
            decimals,
            raw_balance: raw_balance.to_string(),
            price_per_unit: price,
            image_url: String::new(),
        }
    }

    #[test]
    fn wrapped_native_is_renamed_and_becomes_the_native_entry() {
        // single wrapped-native holding: balance 5, price 300, threshold 1
        let fungibles = vec![raw(
            WRAPPED_NATIVE_CONTRACT,
            "USDT",
            18,
            "5000000000000000000",
            300.0,
        )];

        let portfolio = transform_to_portfolio(WALLET, fungibles, Vec::new(), 1.0);

        assert_eq!(portfolio.tokens.len(), 1);
        assert_eq!(portfolio.tokens[0].symbol, NATIVE_SYMBOL);
        assert!((portfolio.total_value - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn dust_is_filtered_but_native_is_exempt() {
        let fungibles = vec![
            raw(NATIVE_TOKEN_ADDRESS, NATIVE_SYMBOL, 0, "0.000001", 600.0),
            raw("0x00000000000000000000000000000000000000aa", "DUST", 18, "1000000000000", 0.01),
            raw("0x00000000000000000000000000000000000000bb", "KEEP", 18, "2000000000000000000", 10.0),
        ];

        let portfolio = transform_to_portfolio(WALLET, fungibles, Vec::new(), 0.0001);

        let symbols: Vec<&str> = portfolio.tokens.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec![NATIVE_SYMBOL, "KEEP"]);
    }

    #[test]
    fn native_symbol_appears_at_most_once_and_first() {
        let fungibles = vec![
            raw("0x00000000000000000000000000000000000000bb", "KEEP", 18, "2000000000000000000", 10.0),
            raw(NATIVE_TOKEN_ADDRESS, NATIVE_SYMBOL, 0, "3", 600.0),
            raw(WRAPPED_NATIVE_CONTRACT, "WBNB", 18, "1000000000000000000", 600.0),
        ];

        let portfolio = transform_to_portfolio(WALLET, fungibles, Vec::new(), 0.0001);

        assert_eq!(portfolio.tokens[0].symbol, NATIVE_SYMBOL);
        let native_count = portfolio
            .tokens
            .iter()
            .filter(|t| t.symbol == NATIVE_SYMBOL)
            .count();
        assert_eq!(native_count, 1);
        // the sentinel entry won the dedup, not the wrapped one
        assert_eq!(portfolio.tokens[0].contract_id, NATIVE_TOKEN_ADDRESS);
        assert!((portfolio.tokens[0].balance - 3.0).abs() < 1e-9);
    }

    #[test]
    fn total_value_round_trips_over_returned_tokens() {
        let fungibles = vec![
            raw(NATIVE_TOKEN_ADDRESS, NATIVE_SYMBOL, 0, "2", 600.0),
            raw("0x00000000000000000000000000000000000000bb", "KEEP", 18, "4000000000000000000", 2.5),
        ];

        let portfolio = transform_to_portfolio(WALLET, fungibles, Vec::new(), 0.0001);

        let recomputed: f64 = portfolio
            .tokens
            .iter()
            .map(|t| t.balance * t.price_per_unit)
            .sum();
        assert!((portfolio.total_value - recomputed).abs() < 1e-9);
        assert!((portfolio.total_value - 1210.0).abs() < 1e-9);
    }

    #[test]
    fn missing_nft_fields_default_to_empty_strings() {
        let nfts = vec![RawNft {
            contract_id: "0x00000000000000000000000000000000000000cc".to_string(),
            token_id: "42".to_string(),
            name: None,
            image_url: None,
            collection: None,
        }];

        let portfolio = transform_to_portfolio(WALLET, Vec::new(), nfts, 0.0001);

        assert_eq!(portfolio.nfts.len(), 1);
        assert_eq!(portfolio.nfts[0].name, "");
        assert_eq!(portfolio.nfts[0].image_url, "");
        assert_eq!(portfolio.nfts[0].collection, "");
    }

    #[test]
    fn wallet_replay_keeps_only_positive_positions() {
        let make = |from: &str, to: &str, value: &str| crate::apis::bscscan::types::TransferEventRaw {
            from: from.to_string(),
            to: to.to_string(),
            value: value.to_string(),
            contract_address: "0x00000000000000000000000000000000000000dd".to_string(),
            token_name: "Example".to_string(),
            token_symbol: "EXM".to_string(),
            token_decimal: "18".to_string(),
        };
        let other = "0x00000000000000000000000000000000000000a1";

        let fungibles = held_fungibles(
            WALLET,
            vec![
                make(other, WALLET, "3000000000000000000"),
                make(WALLET, other, "1000000000000000000"),
            ],
        );

        assert_eq!(fungibles.len(), 1);
        assert_eq!(fungibles[0].raw_balance, "2000000000000000000");
        assert_eq!(fungibles[0].symbol, "EXM");

        // a fully exited position disappears
        let emptied = held_fungibles(
            WALLET,
            vec![
                make(other, WALLET, "1000000000000000000"),
                make(WALLET, other, "1000000000000000000"),
            ],
        );
        assert!(emptied.is_empty());
    }

    #[test]
    fn nft_replay_tracks_current_ownership() {
        let make = |from: &str, to: &str, id: &str| NftTransferRaw {
            from: from.to_string(),
            to: to.to_string(),
            contract_address: "0x00000000000000000000000000000000000000ee".to_string(),
            token_id: id.to_string(),
            token_name: "Punks".to_string(),
            token_symbol: "PNK".to_string(),
        };
        let other = "0x00000000000000000000000000000000000000a1";

        let held = held_nfts(
            WALLET,
            vec![
                make(other, WALLET, "1"),
                make(other, WALLET, "2"),
                make(WALLET, other, "1"),
            ],
        );

        assert_eq!(held.len(), 1);
        assert_eq!(held[0].token_id, "2");
    }
}

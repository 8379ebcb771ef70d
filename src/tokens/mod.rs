/// Token search over the community token list
///
/// Case-insensitive match on name substring, symbol substring, or exact
/// address. Ranking: exact symbol/name/address matches first, then symbol
/// substring matches, then the rest; ties keep list order (stable sort).
use crate::apis::tokenlist::{ListedToken, TokenListClient};
use crate::errors::LensResult;
use crate::logger::{self, LogTag};
use crate::portfolio::Token;

pub async fn search_tokens(token_list: &TokenListClient, query: &str) -> LensResult<Vec<Token>> {
    let tokens = token_list.tokens().await?;
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    logger::debug(LogTag::Tokens, &format!("searching token list for '{}'", query));

    let mut matches: Vec<&ListedToken> = tokens
        .iter()
        .filter(|token| {
            token.name.to_lowercase().contains(&query)
                || token.symbol.to_lowercase().contains(&query)
                || token.address.to_lowercase() == query
        })
        .collect();

    matches.sort_by_key(|token| rank(token, &query));

    Ok(matches.into_iter().map(to_token).collect())
}

fn rank(token: &ListedToken, query: &str) -> u8 {
    let exact = token.symbol.to_lowercase() == query
        || token.name.to_lowercase() == query
        || token.address.to_lowercase() == query;
    if exact {
        return 0;
    }
    if token.symbol.to_lowercase().contains(query) {
        return 1;
    }
    2
}

fn to_token(listed: &ListedToken) -> Token {
    Token {
        contract_id: listed.address.to_lowercase(),
        name: listed.name.clone(),
        symbol: listed.symbol.clone(),
        decimals: listed.decimals,
        balance: 0.0,
        price_per_unit: 0.0,
        image_url: listed.logo_uri.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listed(address: &str, name: &str, symbol: &str) -> ListedToken {
        ListedToken {
            chain_id: 56,
            address: address.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals: 18,
            logo_uri: None,
        }
    }

    fn search_in(tokens: Vec<ListedToken>, query: &str) -> Vec<String> {
        let query = query.to_lowercase();
        let mut matches: Vec<&ListedToken> = tokens
            .iter()
            .filter(|token| {
                token.name.to_lowercase().contains(&query)
                    || token.symbol.to_lowercase().contains(&query)
                    || token.address.to_lowercase() == query
            })
            .collect();
        matches.sort_by_key(|token| rank(token, &query));
        matches.iter().map(|t| t.symbol.clone()).collect()
    }

    #[test]
    fn exact_symbol_match_outranks_name_substring() {
        let tokens = vec![
            listed("0x00000000000000000000000000000000000000a1", "Cake Monster", "MONSTA"),
            listed("0x00000000000000000000000000000000000000a2", "PancakeSwap Token", "CAKE"),
        ];
        let symbols = search_in(tokens, "cake");
        assert_eq!(symbols, vec!["CAKE", "MONSTA"]);
    }

    #[test]
    fn symbol_substring_outranks_name_only_match() {
        let tokens = vec![
            listed("0x00000000000000000000000000000000000000a1", "Banana Chain", "NANA"),
            listed("0x00000000000000000000000000000000000000a2", "Moon Token", "BANX"),
        ];
        // "ban" is a substring of both names but only BANX's symbol
        let symbols = search_in(tokens, "ban");
        assert_eq!(symbols, vec!["BANX", "NANA"]);
    }

    #[test]
    fn address_query_matches_exactly() {
        let tokens = vec![
            listed("0x00000000000000000000000000000000000000a1", "Alpha", "ALU"),
            listed("0x00000000000000000000000000000000000000a2", "Beta", "BET"),
        ];
        let symbols = search_in(tokens, "0x00000000000000000000000000000000000000A2");
        assert_eq!(symbols, vec!["BET"]);
    }
}

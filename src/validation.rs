/// Address and domain format validators
///
/// Pure functions, no I/O. Every fetcher entry point expects callers to have
/// validated input first so malformed requests never reach the network.
use crate::errors::{LensError, LensResult};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// 0x-prefixed, exactly 40 hex characters
    static ref ADDRESS_RE: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();

    /// Simple `label.bnb` human-readable-name pattern
    static ref DOMAIN_RE: Regex = Regex::new(r"^[a-zA-Z0-9-]+\.bnb$").unwrap();
}

/// True iff `s` is a well-formed BSC wallet/contract address
pub fn is_valid_address(s: &str) -> bool {
    ADDRESS_RE.is_match(s)
}

/// True iff `s` is a well-formed `.bnb` domain name
pub fn is_valid_domain(s: &str) -> bool {
    DOMAIN_RE.is_match(s)
}

/// Lowercase an address for consistent comparison; rejects malformed input
pub fn normalize_address(s: &str) -> LensResult<String> {
    if !is_valid_address(s) {
        return Err(LensError::invalid_address(s));
    }
    Ok(s.to_lowercase())
}

/// Guard used at fetcher boundaries
pub fn require_address(s: &str) -> LensResult<()> {
    if !is_valid_address(s) {
        return Err(LensError::invalid_address(s));
    }
    Ok(())
}

/// Guard for `.bnb` domain parameters
pub fn require_domain(s: &str) -> LensResult<()> {
    if !is_valid_domain(s) {
        return Err(LensError::invalid_domain(s));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_addresses() {
        assert!(is_valid_address(
            "0x55d398326f99059fF775485246999027B3197955"
        ));
        assert!(is_valid_address(
            "0x0000000000000000000000000000000000000000"
        ));
        assert!(is_valid_address(
            "0xABCDEFabcdef0123456789ABCDEFabcdef012345"
        ));
    }

    #[test]
    fn rejects_wrong_length_or_charset() {
        assert!(!is_valid_address("0x123"));
        assert!(!is_valid_address(""));
        // 41 hex chars
        assert!(!is_valid_address(
            "0x55d398326f99059fF775485246999027B31979555"
        ));
        // 39 hex chars
        assert!(!is_valid_address(
            "0x55d398326f99059fF775485246999027B319795"
        ));
        // non-hex character
        assert!(!is_valid_address(
            "0x55d398326f99059fF775485246999027B319795g"
        ));
        // missing prefix
        assert!(!is_valid_address(
            "55d398326f99059fF775485246999027B3197955ab"
        ));
    }

    #[test]
    fn domain_pattern() {
        assert!(is_valid_domain("example.bnb"));
        assert!(is_valid_domain("my-wallet-42.bnb"));
        assert!(!is_valid_domain("example.eth"));
        assert!(!is_valid_domain(".bnb"));
        assert!(!is_valid_domain("sub.example.bnb"));
        assert!(!is_valid_domain("example.bnb "));
    }

    #[test]
    fn normalize_lowercases() {
        let normalized =
            normalize_address("0x55D398326F99059fF775485246999027B3197955").unwrap();
        assert_eq!(normalized, "0x55d398326f99059ff775485246999027b3197955");
        assert!(normalize_address("not-an-address").is_err());
    }
}

/// Curated labels for well-known BSC addresses
///
/// Exact match (lowercase) wins over the bytecode probe during holder
/// classification. Keep keys lowercase.
use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref KNOWN_ADDRESSES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert(
            "0x0000000000000000000000000000000000000000",
            "Null Address",
        );
        m.insert(
            "0x000000000000000000000000000000000000dead",
            "Burn Address",
        );
        m.insert(
            "0xbb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c",
            "Wrapped BNB Contract",
        );
        m.insert(
            "0x10ed43c718714eb63d5aa57b78b54704e256024e",
            "PancakeSwap: Router v2",
        );
        m.insert(
            "0x05ff2b0db69458a0750badebc4f9e13add608c7f",
            "PancakeSwap: Router v1",
        );
        m.insert(
            "0x73feaa1ee314f8c655e354234017be2193c9e24e",
            "PancakeSwap: MasterChef",
        );
        m.insert(
            "0x8894e0a0c962cb723c1976a4421c95949be2d4e3",
            "Binance: Hot Wallet 6",
        );
        m.insert(
            "0xf977814e90da44bfa03b6295a0616a897441acec",
            "Binance: Hot Wallet 20",
        );
        m
    };
}

/// Label for a known address, if curated. Lookup is case-insensitive.
pub fn label_for(address: &str) -> Option<&'static str> {
    KNOWN_ADDRESSES.get(address.to_lowercase().as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(
            label_for("0x000000000000000000000000000000000000DEAD"),
            Some("Burn Address")
        );
        assert!(label_for("0x00000000000000000000000000000000000000ff").is_none());
    }
}

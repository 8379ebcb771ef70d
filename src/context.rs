/// Shared client bundle
///
/// Owns one instance of every upstream client plus the loaded configuration.
/// Built once at startup and passed by reference; the token-list cache lives
/// inside its client, so fresh contexts get fresh caches.
use crate::apis::bns::BnsClient;
use crate::apis::bscscan::BscScanClient;
use crate::apis::coingecko::CoinGeckoClient;
use crate::apis::rpc::BscRpcClient;
use crate::apis::tokenlist::TokenListClient;
use crate::config::Config;
use crate::errors::LensResult;

pub struct LensContext {
    pub config: Config,
    pub scan: BscScanClient,
    pub rpc: BscRpcClient,
    pub prices: CoinGeckoClient,
    pub token_list: TokenListClient,
    pub bns: BnsClient,
}

impl LensContext {
    pub fn new(config: Config) -> LensResult<Self> {
        let timeout = config.http_timeout_secs;
        Ok(Self {
            scan: BscScanClient::new(&config.scan_api_url, &config.scan_api_key, timeout)?,
            rpc: BscRpcClient::new(&config.rpc_url, timeout)?,
            prices: CoinGeckoClient::new(&config.coingecko_api_url, timeout)?,
            token_list: TokenListClient::new(&config.token_list_url, timeout)?,
            bns: BnsClient::new(&config.bns_resolver_url, timeout)?,
            config,
        })
    }
}

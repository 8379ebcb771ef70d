/// Chain-wide constants for BNB Smart Chain aggregation
///
/// All upstream endpoint defaults live here and can be overridden through
/// `config::Config`. Addresses are stored lowercase; compare with
/// `validation::normalize_address` output.

// =============================================================================
// NATIVE ASSET
// =============================================================================

/// Sentinel contract identifier for the synthetic native BNB token entry
pub const NATIVE_TOKEN_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Wrapped-native (WBNB-style) contract whose display label is unified to BNB
pub const WRAPPED_NATIVE_CONTRACT: &str = "0x55d398326f99059ff775485246999027b3197955";

pub const NATIVE_SYMBOL: &str = "BNB";
pub const NATIVE_NAME: &str = "BNB";
pub const NATIVE_DECIMALS: u32 = 18;

/// Wei per whole BNB (10^18)
pub const WEI_PER_BNB: f64 = 1e18;

/// Fallback logo shown for tokens without upstream artwork
pub const NATIVE_LOGO_URL: &str =
    "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/binance/assets/BNB/logo.png";

// =============================================================================
// UPSTREAM ENDPOINT DEFAULTS
// =============================================================================

pub const DEFAULT_RPC_URL: &str = "https://bsc-dataseed.binance.org";
pub const DEFAULT_SCAN_API_URL: &str = "https://api.bscscan.com/api";
pub const DEFAULT_COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_TOKEN_LIST_URL: &str =
    "https://tokens.pancakeswap.finance/pancakeswap-extended.json";
pub const DEFAULT_BNS_RESOLVER_URL: &str = "https://api.bnbdomains.io/resolver";

/// Request timeout in seconds - explorer endpoints can be slow under load
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;

// =============================================================================
// HOLDER ANALYSIS
// =============================================================================

/// Addresses classified per batch; chunk members run concurrently,
/// chunks run sequentially to bound in-flight upstream requests
pub const CLASSIFY_CHUNK_SIZE: usize = 20;

/// Transfer-log page size used for holder counting and replay
pub const TRANSFER_LOG_PAGE_SIZE: usize = 1000;

/// Maximum transfer-log pages fetched before giving up on an exact count
pub const TRANSFER_LOG_MAX_PAGES: usize = 100;

/// Above this many unique owners the exact count is unreliable and the
/// sentinel -1 is reported instead
pub const HOLDER_COUNT_SENTINEL_LIMIT: usize = 50_000;

/// Sentinel returned when the holder count exceeds the countable limit
pub const HOLDER_COUNT_SENTINEL: i64 = -1;

// =============================================================================
// TOKEN LIST CACHE
// =============================================================================

/// Token-list snapshot lifetime before a lazy refresh (15 minutes)
pub const TOKEN_LIST_CACHE_TTL_SECS: u64 = 15 * 60;

// =============================================================================
// PORTFOLIO
// =============================================================================

/// Default dust threshold in USD-equivalent used by the CLI; library callers
/// always pass their own
pub const DEFAULT_DUST_THRESHOLD: f64 = 0.0001;

/// Upstream API clients
///
/// One submodule per provider, all built on the shared [`client`] plumbing.
/// Providers never retry internally; rate limiting is per-provider and error
/// mapping is uniform (see `errors::FetchError`).
pub mod bns;
pub mod bscscan;
pub mod client;
pub mod coingecko;
pub mod rpc;
pub mod tokenlist;

//! Price oracle adapter.

use soroban_sdk::{contractclient, log, Address, Env};

use crate::types::{Error, PriceQuote};

/// USD price feed for one settlement currency.
#[allow(dead_code)]
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    fn latest_price(env: Env) -> PriceQuote;
}

/// Reads the latest quote from `feed`.
///
/// The quote is trusted as stored; its timestamp is not compared against the
/// ledger clock. A feed that cannot be invoked, or that reports a non-positive
/// price, is treated as unavailable.
pub fn latest_quote(env: &Env, feed: &Address) -> Result<PriceQuote, Error> {
    let quote = match PriceFeedClient::new(env, feed).try_latest_price() {
        Ok(Ok(quote)) => quote,
        _ => {
            log!(env, "Price feed unreadable: {}", feed.clone());
            return Err(Error::OracleUnavailable);
        }
    };

    if quote.price <= 0 {
        log!(env, "Price feed returned non-positive price: {}", quote.price);
        return Err(Error::OracleUnavailable);
    }
    Ok(quote)
}

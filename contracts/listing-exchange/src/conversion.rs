//! Currency conversion service.
//!
//! Turns a reference-unit (USD) price into an amount of a settlement currency's
//! smallest unit and reports how much of that currency a buyer has made
//! available to the exchange.

use soroban_sdk::{token, Address, Env};

use crate::oracle;
use crate::storage;
use crate::types::{Currency, Error};

/// Amount of `currency`, in its smallest unit, worth `reference_price` USD.
///
/// `reference_price * 10^unit_decimals * 10^feed_decimals / feed_price`, truncated
/// toward zero. Callers treat the result as a floor.
pub fn get_price(env: &Env, reference_price: i128, currency: Currency) -> Result<i128, Error> {
    if reference_price < 0 {
        return Err(Error::InvalidAmount);
    }

    let route = storage::route(env, currency)?;
    let quote = oracle::latest_quote(env, &route.feed)?;

    let unit_scale = pow10(route.unit_decimals)?;
    let feed_scale = pow10(quote.decimals)?;

    let scaled = reference_price
        .checked_mul(unit_scale)
        .and_then(|v| v.checked_mul(feed_scale))
        .ok_or(Error::ArithmeticOverflow)?;

    Ok(scaled / quote.price)
}

/// Funds `account` has made available for a payment in `currency`.
///
/// For the native medium that is the value attached to the call, taken verbatim.
/// For token-type currencies it is the allowance granted to this contract;
/// `supplied_native` is ignored.
pub fn get_approved_amount(
    env: &Env,
    account: &Address,
    supplied_native: i128,
    currency: Currency,
) -> Result<i128, Error> {
    match currency {
        Currency::Native => Ok(supplied_native),
        Currency::Dai | Currency::Link => {
            let route = storage::route(env, currency)?;
            let client = token::Client::new(env, &route.token);
            Ok(client.allowance(account, &env.current_contract_address()))
        }
    }
}

fn pow10(exp: u32) -> Result<i128, Error> {
    10i128.checked_pow(exp).ok_or(Error::ArithmeticOverflow)
}

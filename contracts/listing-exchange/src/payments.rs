//! Payment router.
//!
//! Splits a settled amount between the seller and the platform and keeps the
//! platform's share in this contract's custody until the admin withdraws it.

use soroban_sdk::{log, token, Address, Env};

use crate::storage;
use crate::types::{Currency, Error, Settlement, FEES_WITHDRAWN};

const PERCENT_DIVISOR: i128 = 100;

/// Fee owed on `amount` at `fee_rate` percent, truncated.
pub fn fee_share(amount: i128, fee_rate: u32) -> Result<i128, Error> {
    amount
        .checked_mul(fee_rate as i128)
        .map(|v| v / PERCENT_DIVISOR)
        .ok_or(Error::ArithmeticOverflow)
}

/// Moves `amount` of `currency` from `buyer`, paying the seller's share out
/// immediately and retaining the fee share.
///
/// Native payments pull everything the buyer attached (`available`), so any
/// overpayment stays in custody alongside the fee and is not refunded. Token
/// payments pull exactly `amount` from the buyer's allowance.
pub fn handle_payment(
    env: &Env,
    seller: &Address,
    buyer: &Address,
    amount: i128,
    fee_rate: u32,
    available: i128,
    currency: Currency,
) -> Result<Settlement, Error> {
    if available < amount {
        log!(env, "Insufficient payment. Required: {}, Available: {}", amount, available);
        return Err(Error::InsufficientPayment);
    }

    let fee_share = fee_share(amount, fee_rate)?;
    if fee_share > amount {
        log!(env, "Fee {} exceeds payment {} at rate {}", fee_share, amount, fee_rate);
        return Err(Error::FeeExceedsPayment);
    }
    let seller_share = amount - fee_share;

    let route = storage::route(env, currency)?;
    let client = token::Client::new(env, &route.token);
    let custody = env.current_contract_address();

    let pulled = if currency.is_native() {
        client.try_transfer(buyer, &custody, &available)
    } else {
        client.try_transfer_from(&custody, buyer, &custody, &amount)
    };
    if !matches!(pulled, Ok(Ok(()))) {
        log!(env, "Failed to collect {} from buyer", amount);
        return Err(Error::PaymentTransferFailed);
    }

    if seller_share > 0 {
        match client.try_transfer(&custody, seller, &seller_share) {
            Ok(Ok(())) => {}
            _ => {
                log!(env, "Failed to pay {} to seller", seller_share);
                return Err(Error::PaymentTransferFailed);
            }
        }
    }

    Ok(Settlement { seller_share, fee_share })
}

/// Sends this contract's whole balance of every currency to `recipient`.
pub fn drain_custody(env: &Env, recipient: &Address) -> Result<(), Error> {
    let custody = env.current_contract_address();

    for currency in Currency::ALL {
        let route = storage::route(env, currency)?;
        let client = token::Client::new(env, &route.token);

        let balance = client.balance(&custody);
        if balance == 0 {
            continue;
        }

        match client.try_transfer(&custody, recipient, &balance) {
            Ok(Ok(())) => {}
            _ => {
                log!(env, "Failed to withdraw {} to fee recipient", balance);
                return Err(Error::PaymentTransferFailed);
            }
        }

        env.events()
            .publish((FEES_WITHDRAWN, recipient.clone()), (currency, balance));
    }

    Ok(())
}

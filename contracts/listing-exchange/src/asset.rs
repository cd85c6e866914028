//! Asset ledger interface.
//!
//! The listed items live in an external multi-token ledger keyed by
//! `(account, id)`. The exchange only ever queries balances and, on acceptance,
//! moves a lot as an approved operator of the seller.

use soroban_sdk::{contractclient, log, Address, Env};

use crate::types::Error;

#[allow(dead_code)]
#[contractclient(name = "AssetLedgerClient")]
pub trait AssetLedger {
    fn balance_of(env: Env, account: Address, id: u64) -> i128;

    fn transfer_from(env: Env, operator: Address, from: Address, to: Address, id: u64, amount: i128);
}

/// Balance of `account` for `id`, or `NotAnAssetLedger` if `ledger` does not
/// answer the query.
pub fn balance_of(env: &Env, ledger: &Address, account: &Address, id: u64) -> Result<i128, Error> {
    match AssetLedgerClient::new(env, ledger).try_balance_of(account, &id) {
        Ok(Ok(balance)) => Ok(balance),
        _ => {
            log!(env, "Balance query rejected by {}", ledger.clone());
            Err(Error::NotAnAssetLedger)
        }
    }
}

/// Moves `amount` of `id` from `from` to `to`, with this contract as operator.
///
/// Holdings are not re-checked here: if the seller disposed of the lot after
/// listing, or revoked the exchange's approval, the ledger refuses the move.
pub fn transfer(
    env: &Env,
    ledger: &Address,
    from: &Address,
    to: &Address,
    id: u64,
    amount: i128,
) -> Result<(), Error> {
    let operator = env.current_contract_address();
    match AssetLedgerClient::new(env, ledger).try_transfer_from(&operator, from, to, &id, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => {
            log!(env, "Asset transfer of {} units of id {} failed", amount, id);
            Err(Error::AssetTransferFailed)
        }
    }
}

//! Storage layout.
//!
//! Admin configuration, the currency routes and the offer counter live in instance
//! storage and share its TTL, which every entry point bumps. Each offer is its own
//! persistent entry so the instance footprint stays constant as listings
//! accumulate; an offer's TTL always reaches past its deadline.

use soroban_sdk::{symbol_short, Env, Symbol};

use crate::types::{AdminConfig, Currency, CurrencyRoute, DataKey, Error, Offer};

const CONFIG_KEY: Symbol = symbol_short!("CONFIG"); // AdminConfig (instance)
const OFFER_COUNT: Symbol = symbol_short!("OFFR_CNT"); // Next offer index, only grows (instance)

const LEDGER_SECONDS: u64 = 5;
const DAY_IN_LEDGERS: u32 = 17280;
const INSTANCE_TTL_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const INSTANCE_TTL_THRESHOLD: u32 = INSTANCE_TTL_AMOUNT - DAY_IN_LEDGERS;
const PERSISTENT_TTL_AMOUNT: u32 = 90 * DAY_IN_LEDGERS;
const PERSISTENT_TTL_THRESHOLD: u32 = PERSISTENT_TTL_AMOUNT - DAY_IN_LEDGERS;

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_AMOUNT);
}

// ================================================================================================
// ADMIN CONFIGURATION
// ================================================================================================

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&CONFIG_KEY)
}

pub fn config(env: &Env) -> Result<AdminConfig, Error> {
    env.storage()
        .instance()
        .get(&CONFIG_KEY)
        .ok_or(Error::NotInitialized)
}

pub fn set_config(env: &Env, config: &AdminConfig) {
    env.storage().instance().set(&CONFIG_KEY, config);
    extend_instance_ttl(env);
}

pub fn route(env: &Env, currency: Currency) -> Result<CurrencyRoute, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Route(currency))
        .ok_or(Error::NotInitialized)
}

pub fn set_route(env: &Env, currency: Currency, route: &CurrencyRoute) {
    env.storage().instance().set(&DataKey::Route(currency), route);
}

// ================================================================================================
// OFFERS
// ================================================================================================

pub fn offer_count(env: &Env) -> u64 {
    env.storage().instance().get(&OFFER_COUNT).unwrap_or(0)
}

/// Stores `offer` at the next index and returns that index.
pub fn push_offer(env: &Env, offer: &Offer) -> Result<u64, Error> {
    let index = offer_count(env);
    let next = index.checked_add(1).ok_or(Error::ArithmeticOverflow)?;

    let key = DataKey::Offer(index);
    env.storage().persistent().set(&key, offer);
    extend_offer_ttl(env, &key, offer.deadline);

    env.storage().instance().set(&OFFER_COUNT, &next);
    extend_instance_ttl(env);
    Ok(index)
}

pub fn offer(env: &Env, index: u64) -> Option<Offer> {
    let key = DataKey::Offer(index);
    let offer: Offer = env.storage().persistent().get(&key)?;
    extend_offer_ttl(env, &key, offer.deadline);
    Some(offer)
}

/// Keeps an offer entry live for the default window or until a day past its
/// deadline, whichever is longer, capped at the network maximum.
fn extend_offer_ttl(env: &Env, key: &DataKey, deadline: u64) {
    let remaining = deadline.saturating_sub(env.ledger().timestamp()) / LEDGER_SECONDS;
    let until_deadline = u32::try_from(remaining)
        .unwrap_or(u32::MAX)
        .saturating_add(DAY_IN_LEDGERS);

    let extend_to = until_deadline
        .max(PERSISTENT_TTL_AMOUNT)
        .min(env.storage().max_ttl());
    let threshold = extend_to.min(PERSISTENT_TTL_THRESHOLD);

    env.storage().persistent().extend_ttl(key, threshold, extend_to);
}

/// Clears a terminal offer. The index stays consumed.
pub fn clear_offer(env: &Env, index: u64) {
    env.storage().persistent().remove(&DataKey::Offer(index));
}

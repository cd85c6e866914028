/*!
 * Listing Exchange Smart Contract
 *
 * Sellers list a quantity of a multi-token asset at a fixed USD price; any other
 * account accepts the listing and pays in one of the accepted settlement
 * currencies, converted at the latest oracle price. The platform keeps a
 * percentage fee in custody until the admin withdraws it.
 *
 * Key features:
 * - Time-bounded offers backed by a balance check at listing (no escrow lock)
 * - Native and token-type settlement with per-currency USD price feeds
 * - Fee split at acceptance, pooled custody, admin withdrawal
 * - Single admin configuration, initialized exactly once
 *
 * Acceptance is one call: pricing, fund verification, payment, asset transfer and
 * clearing the offer either all take effect or, on any error, none do.
 */

#![no_std]

mod asset;
mod conversion;
mod oracle;
mod payments;
mod storage;
mod types;


use soroban_sdk::{contract, contractimpl, log, token, Address, Env};

pub use types::{
    AdminConfig, Currency, CurrencyRoute, CurrencySettings, Error, Offer, PriceQuote, Settlement,
};
use types::{
    ADMIN_UPDATED, FEE_UPDATED, OFFER_ACCEPTED, OFFER_CANCELLED, OFFER_CREATED, RECIPIENT_UPDATED,
};

#[contract]
pub struct ListingExchange;

#[contractimpl]
impl ListingExchange {
    /// Initializes the exchange. Can only be called once.
    ///
    /// Every token in `currencies` is asked for its `decimals()`, which fixes the
    /// smallest-unit scale used when converting USD prices into that currency.
    ///
    /// # Arguments
    /// * `admin` - Address allowed to change fees and withdraw custody
    /// * `fee_rate` - Platform fee as a whole percentage
    /// * `fee_recipient` - Address credited on withdrawal
    /// * `currencies` - Token contract and USD price feed for each currency
    ///
    /// # Errors
    /// - AlreadyInitialized: If the exchange was already initialized
    /// - InvalidTokenAddress: If a token does not report its decimals
    pub fn initialize(
        env: Env,
        admin: Address,
        fee_rate: u32,
        fee_recipient: Address,
        currencies: CurrencySettings,
    ) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();

        for currency in Currency::ALL {
            let (token_id, feed) = currencies.pair(currency);
            let unit_decimals = match token::Client::new(&env, &token_id).try_decimals() {
                Ok(Ok(decimals)) => decimals,
                _ => {
                    log!(&env, "Token without decimals: {}", token_id.clone());
                    return Err(Error::InvalidTokenAddress);
                }
            };

            storage::set_route(
                &env,
                currency,
                &CurrencyRoute {
                    token: token_id,
                    feed,
                    unit_decimals,
                },
            );
        }

        storage::set_config(
            &env,
            &AdminConfig {
                admin,
                fee_rate,
                fee_recipient,
            },
        );

        Ok(())
    }

    /// Loads the configuration and checks that `caller` is its admin.
    fn require_admin(env: &Env, caller: &Address) -> Result<AdminConfig, Error> {
        caller.require_auth();
        let config = storage::config(env)?;
        if *caller != config.admin {
            return Err(Error::Unauthorized);
        }
        Ok(config)
    }

    // ================================================================================================
    // OFFER LEDGER
    // ================================================================================================

    /// Lists `amount` units of `asset_id` from `asset_contract` for `price` USD,
    /// acceptable for `duration` seconds from now.
    ///
    /// Nothing is taken into custody. The seller must separately approve this
    /// contract as operator on the asset ledger for acceptance to succeed.
    ///
    /// # Returns
    /// The index of the new offer
    ///
    /// # Errors
    /// - InvalidAmount: If amount or price is not positive
    /// - InvalidDuration: If duration is zero
    /// - NotAnAssetLedger: If `asset_contract` does not answer `balance_of`
    /// - InsufficientBalance: If the seller holds fewer than `amount` units
    pub fn create_new_offer(
        env: Env,
        seller: Address,
        asset_contract: Address,
        asset_id: u64,
        amount: i128,
        duration: u64,
        price: i128,
    ) -> Result<u64, Error> {
        seller.require_auth();
        storage::config(&env)?;
        storage::extend_instance_ttl(&env);

        if amount <= 0 || price <= 0 {
            return Err(Error::InvalidAmount);
        }
        if duration == 0 {
            return Err(Error::InvalidDuration);
        }

        let balance = asset::balance_of(&env, &asset_contract, &seller, asset_id)?;
        if balance < amount {
            log!(&env, "Insufficient balance. Required: {}, Available: {}", amount, balance);
            return Err(Error::InsufficientBalance);
        }

        let deadline = env
            .ledger()
            .timestamp()
            .checked_add(duration)
            .ok_or(Error::ArithmeticOverflow)?;

        let offer = Offer {
            asset_contract: asset_contract.clone(),
            asset_id,
            amount,
            price,
            seller: seller.clone(),
            deadline,
        };
        let index = storage::push_offer(&env, &offer)?;

        env.events().publish(
            (OFFER_CREATED, seller),
            (index, asset_contract, asset_id, amount, price, deadline),
        );

        Ok(index)
    }

    /// Withdraws a live offer. Only its seller may do so.
    ///
    /// # Errors
    /// - OfferNotFound: If there is no live offer at `index`
    /// - NotOfferOwner: If `seller` did not create the offer
    pub fn cancel_offer(env: Env, seller: Address, index: u64) -> Result<(), Error> {
        seller.require_auth();
        storage::extend_instance_ttl(&env);

        let offer = storage::offer(&env, index).ok_or(Error::OfferNotFound)?;
        if offer.seller != seller {
            return Err(Error::NotOfferOwner);
        }

        storage::clear_offer(&env, index);
        env.events().publish((OFFER_CANCELLED, seller), (index,));

        Ok(())
    }

    /// Buys the lot listed at `index`, paying in `currency`.
    ///
    /// `payment_supplied` is the native value the buyer attaches; it is pulled in
    /// full when paying natively (any excess over the converted price stays in
    /// custody) and ignored for token-type currencies, which are paid out of the
    /// buyer's allowance to this contract.
    ///
    /// # Business Flow
    /// 1. Offer exists, has not expired, and is not the buyer's own
    /// 2. Price converted to `currency` and checked against what the buyer made available
    /// 3. Seller paid net of fee, fee retained in custody
    /// 4. Lot moved from seller to buyer on the asset ledger
    /// 5. Offer cleared
    ///
    /// # Errors
    /// - OfferNotFound: If there is no live offer at `index`
    /// - OfferExpired: If the offer deadline has been reached
    /// - SelfPurchaseForbidden: If the buyer is the seller
    /// - InsufficientPayment: If supplied value or allowance is below the price
    /// - OracleUnavailable: If the currency's price feed cannot be read
    /// - FeeExceedsPayment: If the configured fee rate is above 100
    /// - PaymentTransferFailed / AssetTransferFailed: If a ledger refuses a transfer
    pub fn accept_offer(
        env: Env,
        buyer: Address,
        index: u64,
        currency: Currency,
        payment_supplied: i128,
    ) -> Result<(), Error> {
        buyer.require_auth();
        let config = storage::config(&env)?;
        storage::extend_instance_ttl(&env);

        let offer = storage::offer(&env, index).ok_or(Error::OfferNotFound)?;

        if env.ledger().timestamp() >= offer.deadline {
            return Err(Error::OfferExpired);
        }

        if buyer == offer.seller {
            return Err(Error::SelfPurchaseForbidden);
        }

        let required = conversion::get_price(&env, offer.price, currency)?;
        let available = conversion::get_approved_amount(&env, &buyer, payment_supplied, currency)?;
        if available < required {
            log!(&env, "Insufficient payment. Required: {}, Available: {}", required, available);
            return Err(Error::InsufficientPayment);
        }

        let settlement = payments::handle_payment(
            &env,
            &offer.seller,
            &buyer,
            required,
            config.fee_rate,
            available,
            currency,
        )?;

        asset::transfer(
            &env,
            &offer.asset_contract,
            &offer.seller,
            &buyer,
            offer.asset_id,
            offer.amount,
        )?;

        storage::clear_offer(&env, index);

        env.events().publish(
            (OFFER_ACCEPTED, buyer),
            (index, currency, settlement.seller_share, settlement.fee_share),
        );

        Ok(())
    }

    /// The live offer at `index`, or `None` once it has been cancelled or accepted.
    pub fn offers(env: Env, index: u64) -> Option<Offer> {
        storage::offer(&env, index)
    }

    /// Number of offers ever created. Indices below it are consumed even when cleared.
    pub fn offer_count(env: Env) -> u64 {
        storage::offer_count(&env)
    }

    // ================================================================================================
    // CURRENCY HELPERS
    // ================================================================================================

    /// Amount of `currency`'s smallest unit worth `reference_price` USD at the
    /// latest oracle price, rounded down.
    pub fn get_price(env: Env, reference_price: i128, currency: Currency) -> Result<i128, Error> {
        storage::extend_instance_ttl(&env);
        conversion::get_price(&env, reference_price, currency)
    }

    /// What `account` has made available in `currency`: `supplied_native` for the
    /// native medium, the allowance to this contract otherwise.
    pub fn get_approved_amount(
        env: Env,
        account: Address,
        supplied_native: i128,
        currency: Currency,
    ) -> Result<i128, Error> {
        conversion::get_approved_amount(&env, &account, supplied_native, currency)
    }

    /// Raw latest USD price reported by `currency`'s feed.
    pub fn latest_price(env: Env, currency: Currency) -> Result<i128, Error> {
        let route = storage::route(&env, currency)?;
        storage::extend_instance_ttl(&env);
        Ok(oracle::latest_quote(&env, &route.feed)?.price)
    }

    pub fn get_native_price_feed(env: Env) -> Result<Address, Error> {
        Ok(storage::route(&env, Currency::Native)?.feed)
    }

    pub fn get_dai_price_feed(env: Env) -> Result<Address, Error> {
        Ok(storage::route(&env, Currency::Dai)?.feed)
    }

    pub fn get_link_price_feed(env: Env) -> Result<Address, Error> {
        Ok(storage::route(&env, Currency::Link)?.feed)
    }

    /// Token contract settling payments in `currency`.
    pub fn get_currency_token(env: Env, currency: Currency) -> Result<Address, Error> {
        Ok(storage::route(&env, currency)?.token)
    }

    // ================================================================================================
    // ADMINISTRATIVE FUNCTIONS
    // ================================================================================================

    /// Replaces the fee rate. No upper bound is enforced; a rate above 100 makes
    /// acceptances fail until it is lowered again.
    ///
    /// # Errors
    /// - Unauthorized: If caller is not admin
    pub fn set_fee(env: Env, caller: Address, new_rate: u32) -> Result<(), Error> {
        let mut config = Self::require_admin(&env, &caller)?;

        config.fee_rate = new_rate;
        storage::set_config(&env, &config);

        env.events().publish((FEE_UPDATED, caller), new_rate);
        Ok(())
    }

    /// Replaces the address credited on withdrawal.
    ///
    /// # Errors
    /// - Unauthorized: If caller is not admin
    pub fn set_recipient(env: Env, caller: Address, new_recipient: Address) -> Result<(), Error> {
        let mut config = Self::require_admin(&env, &caller)?;

        config.fee_recipient = new_recipient.clone();
        storage::set_config(&env, &config);

        env.events().publish((RECIPIENT_UPDATED, caller), new_recipient);
        Ok(())
    }

    /// Hands administrative control to `new_admin`, who must also sign.
    ///
    /// # Errors
    /// - Unauthorized: If caller is not admin
    pub fn set_admin(env: Env, caller: Address, new_admin: Address) -> Result<(), Error> {
        let mut config = Self::require_admin(&env, &caller)?;
        new_admin.require_auth();

        config.admin = new_admin.clone();
        storage::set_config(&env, &config);

        env.events().publish((ADMIN_UPDATED, caller), new_admin);
        Ok(())
    }

    /// Sends the whole custody balance of every currency, fees and unrefunded
    /// overpayments alike, to the fee recipient.
    ///
    /// # Errors
    /// - Unauthorized: If caller is not admin
    pub fn withdraw(env: Env, caller: Address) -> Result<(), Error> {
        let config = Self::require_admin(&env, &caller)?;
        storage::extend_instance_ttl(&env);
        payments::drain_custody(&env, &config.fee_recipient)
    }

    // ================================================================================================
    // QUERY FUNCTIONS (GETTERS)
    // ================================================================================================

    /// Current fee rate as a whole percentage.
    pub fn fee(env: Env) -> Result<u32, Error> {
        Ok(storage::config(&env)?.fee_rate)
    }

    pub fn fee_recipient(env: Env) -> Result<Address, Error> {
        Ok(storage::config(&env)?.fee_recipient)
    }

    pub fn admin(env: Env) -> Result<Address, Error> {
        Ok(storage::config(&env)?.admin)
    }
}

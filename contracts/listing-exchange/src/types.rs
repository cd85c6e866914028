/*!
 * Type Definitions for the Listing Exchange Contract
 *
 * Offers, settlement currencies, admin configuration, oracle quotes, the error
 * taxonomy and the event symbols published by the contract.
 */

use soroban_sdk::{contracterror, contracttype, symbol_short, Address, Symbol};

// ================================================================================================
// CORE DATA STRUCTURES
// ================================================================================================

/// A listing of `amount` units of `asset_id` held in `asset_contract`, priced in
/// reference units (whole USD) for the whole lot.
///
/// The seller's balance is checked once at creation; nothing is escrowed. When an
/// offer is cancelled or accepted its storage entry is removed, so a terminal offer
/// reads back exactly like one that was never created.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Offer {
    /// Asset ledger contract holding the listed item
    pub asset_contract: Address,

    /// Identifier of the item inside `asset_contract`
    pub asset_id: u64,

    /// Quantity offered, always positive
    pub amount: i128,

    /// Reference-unit price for the whole lot, always positive
    pub price: i128,

    /// Creator of the offer, the only account allowed to cancel it
    pub seller: Address,

    /// Ledger timestamp at which the offer stops being acceptable
    pub deadline: u64,
}

/// Accepted settlement media.
///
/// `Native` is the network's native asset, paid by attaching value to the call.
/// The remaining variants are token-type currencies paid out of a pre-approved
/// allowance.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Currency {
    Native = 0,
    Dai = 1,
    Link = 2,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Native, Currency::Dai, Currency::Link];

    pub fn is_native(self) -> bool {
        matches!(self, Currency::Native)
    }
}

/// Collaborators serving one currency: its token contract, its USD price feed and
/// the decimal precision of the token's smallest unit.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CurrencyRoute {
    pub token: Address,
    pub feed: Address,
    pub unit_decimals: u32,
}

/// Token and feed addresses supplied once at initialization.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CurrencySettings {
    pub native_token: Address,
    pub native_feed: Address,
    pub dai_token: Address,
    pub dai_feed: Address,
    pub link_token: Address,
    pub link_feed: Address,
}

impl CurrencySettings {
    /// Token and feed for `currency`.
    pub fn pair(&self, currency: Currency) -> (Address, Address) {
        match currency {
            Currency::Native => (self.native_token.clone(), self.native_feed.clone()),
            Currency::Dai => (self.dai_token.clone(), self.dai_feed.clone()),
            Currency::Link => (self.link_token.clone(), self.link_feed.clone()),
        }
    }
}

/// Process-wide admin state.
///
/// `fee_rate` is a whole percentage. It is stored as given; a rate above 100 makes
/// every acceptance fail with `FeeExceedsPayment` rather than being refused here.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminConfig {
    pub admin: Address,
    pub fee_rate: u32,
    pub fee_recipient: Address,
}

/// Latest reading of a price feed: `price` scaled by `10^decimals` USD per whole
/// unit of the currency, recorded at `timestamp`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceQuote {
    pub price: i128,
    pub decimals: u32,
    pub timestamp: u64,
}

/// Outcome of a routed payment.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settlement {
    pub seller_share: i128,
    pub fee_share: i128,
}

/// Keys for entries stored per offer or per currency. Scalar configuration lives under the symbol
/// keys declared in `storage.rs`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Offer(u64),
    Route(Currency),
}

// ================================================================================================
// ERROR DEFINITIONS
// ================================================================================================

/// Every failure the exchange reports. Any of them aborts the call and the host
/// discards all effects attempted before it.
///
/// # Error Code Ranges
/// - 1-2: Offer state
/// - 3-5: Authorization and counterparty
/// - 6-9: Funds
/// - 10-13: Upstream collaborators
/// - 14-15: Lifecycle
/// - 16-18: Input and arithmetic
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ========== Offer State (1-2) ==========

    /// No live offer at the index: never created, cancelled or already accepted
    OfferNotFound = 1,

    /// Offer deadline has been reached
    OfferExpired = 2,

    // ========== Authorization & Counterparty (3-5) ==========

    /// Caller is not the configured admin
    Unauthorized = 3,

    /// Caller is not the seller of the offer
    NotOfferOwner = 4,

    /// Seller tried to accept their own offer
    SelfPurchaseForbidden = 5,

    // ========== Funds (6-9) ==========

    /// Seller holds fewer units than listed
    InsufficientBalance = 6,

    /// Supplied value or approved allowance is below the converted price
    InsufficientPayment = 7,

    /// Fee rate above 100 would take more than the whole payment
    FeeExceedsPayment = 8,

    /// A settlement token transfer failed
    PaymentTransferFailed = 9,

    // ========== Upstream (10-13) ==========

    /// Asset contract does not answer the balance query
    NotAnAssetLedger = 10,

    /// Asset ledger refused to move the lot to the buyer
    AssetTransferFailed = 11,

    /// Price feed could not be read or reported a non-positive price
    OracleUnavailable = 12,

    /// Token contract did not report its decimals during initialization
    InvalidTokenAddress = 13,

    // ========== Lifecycle (14-15) ==========

    /// `initialize` was already called
    AlreadyInitialized = 14,

    /// Contract has not been initialized
    NotInitialized = 15,

    // ========== Input & Arithmetic (16-18) ==========

    /// Amount or price is not positive
    InvalidAmount = 16,

    /// Zero duration would create an already expired offer
    InvalidDuration = 17,

    /// Intermediate value does not fit in 128 bits
    ArithmeticOverflow = 18,
}

// ================================================================================================
// EVENT CONSTANTS
// ================================================================================================

/// Contains: (index, asset_contract, asset_id, amount, price, deadline)
pub const OFFER_CREATED: Symbol = symbol_short!("offr_crt");

/// Contains: (index,)
pub const OFFER_CANCELLED: Symbol = symbol_short!("offr_canc");

/// Contains: (index, currency, seller_share, fee_share)
pub const OFFER_ACCEPTED: Symbol = symbol_short!("offr_acpt");

/// Contains: new fee rate
pub const FEE_UPDATED: Symbol = symbol_short!("fee_upd");

/// Contains: new fee recipient
pub const RECIPIENT_UPDATED: Symbol = symbol_short!("rcpt_upd");

/// Contains: new admin
pub const ADMIN_UPDATED: Symbol = symbol_short!("adm_upd");

/// Contains: (currency, amount) per drained currency
pub const FEES_WITHDRAWN: Symbol = symbol_short!("fee_wdrw");

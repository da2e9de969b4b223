use crate::validate::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use time::OffsetDateTime;

/// The reserved location marking the edge of the tracked system.
///
/// An exchange *from* this location mints new stock into a warehouse; an
/// exchange *to* it burns stock out of the system.
pub const MINT_BURN_SENTINEL: &str = "0x0000";

/// The largest amount a single exchange may carry: one quadrillion.
///
/// Reports sum amounts without overflow checks; with this cap a ledger
/// would need tens of trillions of exchanges to exceed [`Decimal::MAX`].
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// How the units of a commodity relate to one another.
///
/// Only fungible (bulk) commodities are recognised today. Records carrying any
/// other standard are rejected during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommodityStandard {
    /// Interchangeable units such as wheat, oil or steel
    Bulk,
}

impl CommodityStandard {
    /// The label used for this standard in stored records
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bulk => "bulk",
        }
    }
}

impl fmt::Display for CommodityStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommodityStandard {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bulk" => Ok(Self::Bulk),
            other => Err(ValidationError::UnrecognizedStandard(other.to_owned())),
        }
    }
}

/// Which way an exchange moves value relative to a given warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The warehouse is the destination and paid for the commodity
    Inflow,
    /// The warehouse is the source and received proceeds for the commodity
    Outflow,
}

/// The unvalidated contents of an exchange.
///
/// This is the shape exchanges take on the wire. Turning it into an
/// [`Exchange`] checks the value invariants; see [`Exchange::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeData {
    /// Unique identifier of the exchange
    pub exchange_id: String,
    /// Source location, or [`MINT_BURN_SENTINEL`] for a mint
    pub from_warehouse: String,
    /// Destination location, or [`MINT_BURN_SENTINEL`] for a burn
    pub to_warehouse: String,
    /// Who produces or licenses the commodity
    pub brand_manufacturer: String,
    /// Commodity category, e.g. "Wheat"
    pub item_type: String,
    /// The commodity standard of the transferred units
    pub commodity_standard: CommodityStandard,
    /// Amount transferred, in `unit`s
    pub quantity: Decimal,
    /// Unit of `quantity`, e.g. "tons"
    pub unit: String,
    /// Money exchanged for the transfer
    pub price_paid_usd: Decimal,
    /// When the exchange happened
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Batch the units belong to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    /// Identifiers of individual units, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_ids: Option<Vec<String>>,
}

/// An immutable, validated transfer of a commodity between two locations.
///
/// Every `Exchange` satisfies:
/// - `quantity > 0`
/// - `0 <= price_paid_usd <= MAX_AMOUNT`
/// - the source and destination differ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExchangeData", into = "ExchangeData")]
pub struct Exchange(ExchangeData);

impl Exchange {
    /// Validates `data` and wraps it.
    pub fn new(data: ExchangeData) -> Result<Self, ValidationError> {
        Self::try_from(data)
    }

    /// Unique identifier of the exchange
    pub fn exchange_id(&self) -> &str {
        &self.0.exchange_id
    }

    /// Source location
    pub fn from_warehouse(&self) -> &str {
        &self.0.from_warehouse
    }

    /// Destination location
    pub fn to_warehouse(&self) -> &str {
        &self.0.to_warehouse
    }

    /// Who produces or licenses the commodity
    pub fn brand_manufacturer(&self) -> &str {
        &self.0.brand_manufacturer
    }

    /// Commodity category
    pub fn item_type(&self) -> &str {
        &self.0.item_type
    }

    /// Commodity standard of the transferred units
    pub fn commodity_standard(&self) -> CommodityStandard {
        self.0.commodity_standard
    }

    /// Amount transferred (always positive)
    pub fn quantity(&self) -> Decimal {
        self.0.quantity
    }

    /// Unit of the quantity
    pub fn unit(&self) -> &str {
        &self.0.unit
    }

    /// Money exchanged (never negative)
    pub fn price_paid_usd(&self) -> Decimal {
        self.0.price_paid_usd
    }

    /// When the exchange happened
    pub fn timestamp(&self) -> OffsetDateTime {
        self.0.timestamp
    }

    /// Batch the units belong to, if any
    pub fn batch_id(&self) -> Option<&str> {
        self.0.batch_id.as_deref()
    }

    /// Identifiers of individual units, if any
    pub fn item_ids(&self) -> Option<&[String]> {
        self.0.item_ids.as_deref()
    }

    /// True if `warehouse_id` receives the commodity (and pays for it)
    pub fn is_inflow_for(&self, warehouse_id: &str) -> bool {
        self.0.to_warehouse == warehouse_id
    }

    /// True if `warehouse_id` sends the commodity (and is paid for it)
    pub fn is_outflow_for(&self, warehouse_id: &str) -> bool {
        self.0.from_warehouse == warehouse_id
    }

    /// True if `warehouse_id` is either end of the exchange
    pub fn is_relevant_for(&self, warehouse_id: &str) -> bool {
        self.is_inflow_for(warehouse_id) || self.is_outflow_for(warehouse_id)
    }

    /// Classifies the exchange relative to `warehouse_id`.
    ///
    /// Returns `None` when the warehouse is not involved. Because source and
    /// destination always differ, an involved warehouse has exactly one
    /// direction.
    pub fn direction_for(&self, warehouse_id: &str) -> Option<Direction> {
        if self.is_inflow_for(warehouse_id) {
            Some(Direction::Inflow)
        } else if self.is_outflow_for(warehouse_id) {
            Some(Direction::Outflow)
        } else {
            None
        }
    }

    /// True if new stock enters the system through this exchange
    pub fn is_mint(&self) -> bool {
        self.0.from_warehouse == MINT_BURN_SENTINEL
    }

    /// True if stock leaves the system through this exchange
    pub fn is_burn(&self) -> bool {
        self.0.to_warehouse == MINT_BURN_SENTINEL
    }

    /// True for fungible commodities
    pub fn is_bulk(&self) -> bool {
        self.0.commodity_standard == CommodityStandard::Bulk
    }

    /// Unwraps the validated data
    pub fn into_data(self) -> ExchangeData {
        self.0
    }
}

impl TryFrom<ExchangeData> for Exchange {
    type Error = ValidationError;

    fn try_from(value: ExchangeData) -> Result<Self, Self::Error> {
        if value.quantity <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveQuantity(value.quantity));
        }
        if value.price_paid_usd < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount(value.price_paid_usd));
        }
        if value.price_paid_usd > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge(value.price_paid_usd));
        }
        if value.from_warehouse == value.to_warehouse {
            return Err(ValidationError::SelfTransfer(value.from_warehouse));
        }
        Ok(Self(value))
    }
}

impl From<Exchange> for ExchangeData {
    fn from(value: Exchange) -> Self {
        value.0
    }
}

mod exchange;
mod record;
mod report;

pub use exchange::{
    CommodityStandard, Direction, Exchange, ExchangeData, MAX_AMOUNT, MINT_BURN_SENTINEL,
};
pub use record::{Record, Value};
pub use report::{CommodityGains, GainReport, InvariantViolation};

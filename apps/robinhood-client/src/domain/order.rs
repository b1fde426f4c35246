//! Order placement value objects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy.
    Buy,
    /// Sell.
    Sell,
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Execute at the best available price.
    #[default]
    Market,
    /// Execute at the given price or better.
    Limit,
}

/// Time in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Good for day.
    #[default]
    Gfd,
    /// Good till canceled.
    Gtc,
}

/// Order trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Route immediately.
    #[default]
    Immediate,
    /// Route once the stop price is reached.
    Stop,
}

/// Trading session the order may execute in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketHours {
    /// Regular session only.
    #[default]
    RegularHours,
    /// Pre- and post-market included.
    ExtendedHours,
    /// 24-hour session.
    AllDayHours,
}

/// Instrument reference needed to place an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRef {
    /// Instrument resource URL.
    pub url: String,
    /// Ticker symbol.
    pub symbol: String,
}

/// Request to place an equity order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// Instrument to trade.
    pub instrument: InstrumentRef,
    /// Limit / reference price.
    pub price: Decimal,
    /// Number of shares.
    pub quantity: Decimal,
    /// Order type.
    pub order_type: OrderType,
    /// Stop price (stop orders).
    pub stop_price: Option<Decimal>,
    /// Time in force.
    pub time_in_force: TimeInForce,
    /// Trigger.
    pub trigger: Trigger,
    /// Trading session.
    pub market_hours: MarketHours,
}

impl OrderRequest {
    /// Create a market order request.
    #[must_use]
    pub fn market(instrument: InstrumentRef, price: Decimal, quantity: Decimal) -> Self {
        Self {
            instrument,
            price,
            quantity,
            order_type: OrderType::Market,
            stop_price: None,
            time_in_force: TimeInForce::default(),
            trigger: Trigger::default(),
            market_hours: MarketHours::default(),
        }
    }

    /// Create a limit order request.
    #[must_use]
    pub fn limit(instrument: InstrumentRef, price: Decimal, quantity: Decimal) -> Self {
        Self {
            order_type: OrderType::Limit,
            ..Self::market(instrument, price, quantity)
        }
    }

    /// Turn this into a stop order at `stop_price`.
    #[must_use]
    pub const fn with_stop(mut self, stop_price: Decimal) -> Self {
        self.stop_price = Some(stop_price);
        self.trigger = Trigger::Stop;
        self
    }

    /// Set time in force.
    #[must_use]
    pub const fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Set trading session.
    #[must_use]
    pub const fn with_market_hours(mut self, hours: MarketHours) -> Self {
        self.market_hours = hours;
        self
    }
}

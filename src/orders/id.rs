//! Order identifiers

use std::fmt;

use jiff::{Timestamp, tz::TimeZone};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

/// Prefix every generated order id starts with.
pub const ORDER_ID_PREFIX: &str = "MB";

/// Human-readable order identifier, e.g. `MB1610482913042`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        OrderId(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Format an order id: prefix, day and month in the shop's zone, the last six
/// digits of the epoch millisecond, and a three digit suffix.
#[must_use]
pub fn format_order_id(now: Timestamp, time_zone: &TimeZone, suffix: u16) -> OrderId {
    let local = now.to_zoned(time_zone.clone());
    let millis = now.as_millisecond().rem_euclid(1_000_000);

    OrderId(format!(
        "{ORDER_ID_PREFIX}{:02}{:02}{millis:06}{:03}",
        local.day(),
        local.month(),
        suffix % 1_000,
    ))
}

/// Generates order ids from a clock reading and a random suffix.
///
/// Ids are readable and unlikely to collide, but not guaranteed unique. The
/// generator never returns the same id twice in a row.
#[derive(Debug)]
pub struct OrderIdGenerator<R: Rng = StdRng> {
    rng: R,
    time_zone: TimeZone,
    last: Option<OrderId>,
}

impl OrderIdGenerator<StdRng> {
    /// A generator seeded from the operating system.
    #[must_use]
    pub fn new(time_zone: TimeZone) -> Self {
        Self::with_rng(StdRng::from_entropy(), time_zone)
    }

    /// A deterministic generator.
    #[must_use]
    pub fn seeded(seed: u64, time_zone: TimeZone) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), time_zone)
    }
}

impl<R: Rng> OrderIdGenerator<R> {
    /// A generator drawing suffixes from `rng`.
    pub fn with_rng(rng: R, time_zone: TimeZone) -> Self {
        OrderIdGenerator {
            rng,
            time_zone,
            last: None,
        }
    }

    /// The zone used for the day and month digits.
    #[must_use]
    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    /// Generate an id for `now`.
    pub fn generate(&mut self, now: Timestamp) -> OrderId {
        let id = loop {
            let candidate = format_order_id(now, &self.time_zone, self.rng.gen_range(0..1_000));

            if self.last.as_ref() != Some(&candidate) {
                break candidate;
            }
        };

        self.last = Some(id.clone());

        id
    }
}

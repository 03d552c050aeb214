//! Order log
//!
//! Two append-only JSON arrays: the operator's log of full orders and the
//! customer's own "my orders" history of abbreviated records.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{
    orders::{Order, OrderSummary},
    storage::{Storage, StorageError},
};

/// Storage key of the operator's order log.
pub const ORDERS_KEY: &str = "manthrakodi_orders";

/// Storage key of the customer's order history.
pub const MY_ORDERS_KEY: &str = "my_orders";

/// Errors appending to or reading the order logs.
#[derive(Debug, Error)]
pub enum OrderLogError {
    /// The storage backend failed.
    #[error("order log storage failed: {0}")]
    Storage(#[from] StorageError),

    /// A log document is not a JSON array of records.
    #[error("order log {key} is corrupt: {source}")]
    Corrupt {
        /// Storage key of the corrupt log
        key: &'static str,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized.
    #[error("could not serialize order: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Append-only order logs on top of a [`Storage`].
#[derive(Debug)]
pub struct OrderLog<S: Storage> {
    storage: S,
}

impl<S: Storage> OrderLog<S> {
    /// Create an order log backed by `storage`.
    pub fn new(storage: S) -> Self {
        OrderLog { storage }
    }

    /// Append an order to both logs.
    ///
    /// Either both logs gain the record or neither does: if the second append
    /// fails the first is rolled back.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderLogError`] if either log cannot be read or written.
    #[tracing::instrument(skip_all, fields(order_id = %order.order_id))]
    pub fn append(&mut self, order: &Order) -> Result<(), OrderLogError> {
        let previous = self.storage.read(ORDERS_KEY)?;
        let orders = appended(ORDERS_KEY, previous.as_deref(), order)?;
        let summaries = appended(
            MY_ORDERS_KEY,
            self.storage.read(MY_ORDERS_KEY)?.as_deref(),
            &OrderSummary::from(order),
        )?;

        self.storage.write(ORDERS_KEY, &orders)?;

        if let Err(err) = self.storage.write(MY_ORDERS_KEY, &summaries) {
            self.roll_back(previous.as_deref());
            return Err(err.into());
        }

        debug!("order appended to logs");

        Ok(())
    }

    /// Every order in the operator's log, oldest first.
    ///
    /// Records that do not decode as an [`Order`] are skipped.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderLogError`] if the log cannot be read or parsed.
    pub fn orders(&self) -> Result<Vec<Order>, OrderLogError> {
        self.read_all(ORDERS_KEY)
    }

    /// Every record in the customer's history, oldest first.
    ///
    /// Records that do not decode as an [`OrderSummary`] are skipped.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderLogError`] if the log cannot be read or parsed.
    pub fn customer_orders(&self) -> Result<Vec<OrderSummary>, OrderLogError> {
        self.read_all(MY_ORDERS_KEY)
    }

    /// The underlying storage.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn read_all<T: DeserializeOwned>(&self, key: &'static str) -> Result<Vec<T>, OrderLogError> {
        let Some(json) = self.storage.read(key)? else {
            return Ok(Vec::new());
        };

        let records: Vec<Value> = serde_json::from_str(&json)
            .map_err(|source| OrderLogError::Corrupt { key, source })?;

        Ok(records
            .into_iter()
            .enumerate()
            .filter_map(|(idx, record)| match serde_json::from_value(record) {
                Ok(decoded) => Some(decoded),
                Err(err) => {
                    warn!(key, index = idx, error = %err, "skipping undecodable order record");
                    None
                }
            })
            .collect())
    }

    fn roll_back(&mut self, previous: Option<&str>) {
        let result = match previous {
            Some(json) => self.storage.write(ORDERS_KEY, json),
            None => self.storage.remove(ORDERS_KEY),
        };

        if let Err(err) = result {
            error!(error = %err, "failed to roll back order log after partial append");
        }
    }
}

/// Serialize `existing` (a JSON array, or nothing) with `record` appended.
///
/// Records already in the log are kept as raw JSON so fields written by other
/// tools survive the rewrite.
fn appended<T: Serialize>(
    key: &'static str,
    existing: Option<&str>,
    record: &T,
) -> Result<String, OrderLogError> {
    let mut records: Vec<Value> = match existing {
        Some(json) => {
            serde_json::from_str(json).map_err(|source| OrderLogError::Corrupt { key, source })?
        }
        None => Vec::new(),
    };

    records.push(serde_json::to_value(record).map_err(OrderLogError::Serialize)?);

    serde_json::to_string(&records).map_err(OrderLogError::Serialize)
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use mockall::predicate::eq;
    use testresult::TestResult;

    use crate::{
        orders::{CustomerDetails, OrderId, OrderItem, OrderStatus, PaymentMethod},
        prices::Price,
        products::{Category, ProductId},
        storage::{MemoryStorage, MockStorage},
    };

    use super::*;

    fn order(id: &str) -> Order {
        Order {
            order_id: OrderId::new(id),
            customer: CustomerDetails {
                name: "Anjali".into(),
                phone: "9876543210".into(),
                address: "4 Beach Road".into(),
                city: "Kanhangad".into(),
                pincode: "671315".into(),
                ..CustomerDetails::default()
            },
            items: vec![OrderItem {
                product_id: ProductId::from("bridal-set-1"),
                name: "Bridal Set".into(),
                quantity: 1,
                price: Price::new(7_500_000),
                image: None,
                category: Category::BridalSet,
                description: None,
            }],
            subtotal: Price::new(7_500_000),
            tax: Price::new(1_350_000),
            shipping: Price::ZERO,
            total: Price::new(8_850_000),
            payment_method: PaymentMethod::Online,
            notes: String::new(),
            status: OrderStatus::Pending,
            source: "website".into(),
            created_at: Timestamp::UNIX_EPOCH,
            handed_off_at: None,
        }
    }

    #[test]
    fn append_writes_both_logs() -> TestResult {
        let mut log = OrderLog::new(MemoryStorage::new());

        log.append(&order("MB0101000001001"))?;
        log.append(&order("MB0101000002002"))?;

        let orders = log.orders()?;
        let mine = log.customer_orders()?;

        assert_eq!(orders.len(), 2);
        assert_eq!(mine.len(), 2);
        assert_eq!(
            mine.last().map(|s| s.order_id.as_str()),
            Some("MB0101000002002")
        );

        Ok(())
    }

    #[test]
    fn existing_records_keep_unknown_fields() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.write(ORDERS_KEY, r#"[{"orderId":"legacy","whatsappSent":true}]"#)?;
        let mut log = OrderLog::new(storage);

        log.append(&order("MB0101000001001"))?;

        let raw = log.storage().read(ORDERS_KEY)?.ok_or("missing log")?;
        let records: Vec<Value> = serde_json::from_str(&raw)?;

        assert_eq!(records.len(), 2);
        assert_eq!(records.first().map(|r| r["whatsappSent"].clone()), Some(Value::Bool(true)));

        Ok(())
    }

    #[test]
    fn foreign_records_are_skipped_when_reading() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.write(ORDERS_KEY, r#"[{"orderId":"legacy","whatsappSent":true}]"#)?;
        storage.write(MY_ORDERS_KEY, r#"[{"orderId":"legacy"}]"#)?;
        let mut log = OrderLog::new(storage);

        log.append(&order("MB0101000001001"))?;

        let orders = log.orders()?;
        let mine = log.customer_orders()?;

        assert_eq!(orders.len(), 1);
        assert_eq!(
            orders.first().map(|o| o.order_id.as_str()),
            Some("MB0101000001001")
        );
        assert_eq!(
            mine.last().map(|s| s.order_id.as_str()),
            Some("MB0101000001001")
        );

        Ok(())
    }

    #[test]
    fn non_array_log_is_corrupt_when_reading() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.write(ORDERS_KEY, r#"{"orderId":"legacy"}"#)?;
        let log = OrderLog::new(storage);

        assert!(matches!(
            log.orders(),
            Err(OrderLogError::Corrupt { key: ORDERS_KEY, .. })
        ));

        Ok(())
    }

    #[test]
    fn corrupt_log_is_not_overwritten() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.write(MY_ORDERS_KEY, "{oops")?;
        let mut log = OrderLog::new(storage);

        let result = log.append(&order("MB0101000001001"));

        assert!(matches!(
            result,
            Err(OrderLogError::Corrupt { key: MY_ORDERS_KEY, .. })
        ));
        assert_eq!(log.storage().read(ORDERS_KEY)?, None);
        assert_eq!(log.storage().read(MY_ORDERS_KEY)?.as_deref(), Some("{oops"));

        Ok(())
    }

    #[test]
    fn failed_second_append_rolls_back_first() {
        let mut storage = MockStorage::new();
        storage.expect_read().returning(|_| Ok(None));
        storage
            .expect_write()
            .with(eq(ORDERS_KEY), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(()));
        storage
            .expect_write()
            .with(eq(MY_ORDERS_KEY), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Err(StorageError::Unavailable("quota exceeded".into())));
        storage
            .expect_remove()
            .with(eq(ORDERS_KEY))
            .times(1)
            .returning(|_| Ok(()));

        let mut log = OrderLog::new(storage);

        let result = log.append(&order("MB0101000001001"));

        assert!(matches!(result, Err(OrderLogError::Storage(_))));
    }

    #[test]
    fn empty_logs_read_as_empty() -> TestResult {
        let log = OrderLog::new(MemoryStorage::new());

        assert!(log.orders()?.is_empty());
        assert!(log.customer_orders()?.is_empty());

        Ok(())
    }
}

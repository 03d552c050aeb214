//! Orders
//!
//! An [`Order`] is written once at checkout from a frozen copy of the cart and the
//! customer's details. Nothing in this crate changes an order after it is logged.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    cart::CartEntry,
    prices::Price,
    pricing::{OrderTotals, PricingError, line_total},
    products::{Category, ProductId},
};

pub mod id;
pub mod log;

pub use id::{OrderId, OrderIdGenerator};
pub use log::{MY_ORDERS_KEY, ORDERS_KEY, OrderLog, OrderLogError};

/// How the customer prefers to be contacted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PreferredContact {
    /// Messaging app
    #[default]
    #[serde(rename = "whatsapp")]
    #[value(name = "whatsapp")]
    WhatsApp,

    /// Voice call
    Phone,
}

impl fmt::Display for PreferredContact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferredContact::WhatsApp => f.write_str("WhatsApp"),
            PreferredContact::Phone => f.write_str("Phone Call"),
        }
    }
}

/// How the order will be paid for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery
    #[default]
    Cod,

    /// Online payment
    Online,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cod => f.write_str("Cash on Delivery"),
            PaymentMethod::Online => f.write_str("Online Payment"),
        }
    }
}

/// Order status, as tracked by the order-management side.
///
/// Orders are always created `Pending`; the other states are only ever read back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting confirmation
    #[default]
    Pending,
    /// Confirmed by the shop
    Confirmed,
    /// Being prepared
    Processing,
    /// Dispatched
    Shipped,
    /// Received by the customer
    Delivered,
    /// Cancelled
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };

        f.write_str(label)
    }
}

/// Contact and shipping details entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    /// Full name
    pub name: String,

    /// Email address, may be empty
    #[serde(default)]
    pub email: String,

    /// 10-digit mobile number
    pub phone: String,

    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// State
    pub state: String,

    /// 6-digit postal code
    pub pincode: String,

    /// Preferred contact channel
    #[serde(default)]
    pub preferred_contact: PreferredContact,
}

impl Default for CustomerDetails {
    fn default() -> Self {
        CustomerDetails {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: "Tamil Nadu".to_string(),
            pincode: String::new(),
            preferred_contact: PreferredContact::default(),
        }
    }
}

impl CustomerDetails {
    /// A copy with surrounding whitespace removed from every field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        CustomerDetails {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            pincode: self.pincode.trim().to_string(),
            preferred_contact: self.preferred_contact,
        }
    }
}

/// A frozen copy of one cart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product identifier
    pub product_id: ProductId,

    /// Product name at the time of ordering
    pub name: String,

    /// Quantity ordered
    pub quantity: u32,

    /// Unit price at the time of ordering
    pub price: Price,

    /// Thumbnail image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Product category
    pub category: Category,

    /// Product description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OrderItem {
    /// `quantity × price`
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the line total does not fit.
    pub fn line_total(&self) -> Result<Price, PricingError> {
        line_total(self.price, self.quantity)
    }
}

impl From<&CartEntry> for OrderItem {
    fn from(entry: &CartEntry) -> Self {
        let product = entry.product();

        OrderItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            quantity: entry.quantity(),
            price: product.price,
            image: product.first_image().map(str::to_string),
            category: product.category,
            description: product.description.clone(),
        }
    }
}

/// An order captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Generated order identifier
    pub order_id: OrderId,

    /// Customer details
    pub customer: CustomerDetails,

    /// Items ordered
    pub items: Vec<OrderItem>,

    /// Sum of line totals
    pub subtotal: Price,

    /// Tax on the subtotal
    pub tax: Price,

    /// Shipping charge
    pub shipping: Price,

    /// Grand total
    pub total: Price,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Free-text notes
    #[serde(default)]
    pub notes: String,

    /// Status at creation
    #[serde(default)]
    pub status: OrderStatus,

    /// Where the order came from
    #[serde(default = "default_source")]
    pub source: String,

    /// When the order was created
    pub created_at: Timestamp,

    /// When the order was handed to the messaging channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handed_off_at: Option<Timestamp>,
}

fn default_source() -> String {
    "website".to_string()
}

/// Everything needed to build an [`Order`] except the cart.
#[derive(Debug, Clone)]
pub struct OrderDraft<'a> {
    /// Generated order identifier
    pub order_id: OrderId,

    /// Customer details
    pub customer: &'a CustomerDetails,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Free-text notes
    pub notes: &'a str,

    /// Billing breakdown
    pub totals: OrderTotals,

    /// Creation time
    pub created_at: Timestamp,
}

impl Order {
    /// Build a pending order from a cart snapshot.
    ///
    /// Every entry is deep-copied, so later catalog edits never reach the order.
    #[must_use]
    pub fn from_cart(entries: &[CartEntry], draft: OrderDraft<'_>) -> Self {
        Order {
            order_id: draft.order_id,
            customer: draft.customer.trimmed(),
            items: entries.iter().map(OrderItem::from).collect(),
            subtotal: draft.totals.subtotal,
            tax: draft.totals.tax,
            shipping: draft.totals.shipping,
            total: draft.totals.total,
            payment_method: draft.payment_method,
            notes: draft.notes.trim().to_string(),
            status: OrderStatus::Pending,
            source: default_source(),
            created_at: draft.created_at,
            handed_off_at: None,
        }
    }

    /// Number of units across all items.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// The abbreviated record kept in the customer's own order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Order identifier
    pub order_id: OrderId,

    /// Items ordered
    pub items: Vec<OrderItem>,

    /// Grand total
    pub total: Price,

    /// Status at creation
    pub status: OrderStatus,

    /// Creation time
    pub date: Timestamp,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        OrderSummary {
            order_id: order.order_id.clone(),
            items: order.items.clone(),
            total: order.total,
            status: order.status,
            date: order.created_at,
        }
    }
}

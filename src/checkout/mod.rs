//! Checkout
//!
//! Turns the cart into an [`Order`], hands it to the shop's messaging channel,
//! logs it and empties the cart. Either every step happens or the cart is left
//! exactly as it was.
//!
//! ```text
//! Idle → Validating → Submitting → HandedOff → CartCleared
//!          │             │            │
//!          └─────────────┴────────────┴──→ Idle (on failure)
//! ```

use std::fmt;

use jiff::{
    Timestamp,
    tz::{Offset, TimeZone},
};
use rand::{Rng, rngs::StdRng};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cart::CartStore,
    orders::{
        CustomerDetails, Order, OrderDraft, OrderIdGenerator, OrderLog, OrderLogError,
        PaymentMethod,
    },
    prices::Price,
    pricing::{OrderTotals, PricingError},
    storage::Storage,
};

pub mod handoff;
pub mod message;
pub mod validation;

pub use handoff::{HandOff, HandOffError, HandOffLink, Outbox, WriterHandOff};
pub use validation::{Field, FieldError, ValidationErrors, validate};

/// Seconds east of UTC for Indian Standard Time.
pub const IST_OFFSET_SECONDS: i32 = 19_800;

/// Errors that abort a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more form fields are invalid.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// There is nothing in the cart to order.
    #[error("cart is empty")]
    EmptyCart,

    /// Order totals could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// An order message could not be formatted.
    #[error("failed to format order message")]
    Format(#[from] fmt::Error),

    /// The order could not be handed to the messaging channel.
    #[error(transparent)]
    HandOff(#[from] HandOffError),

    /// The order could not be logged.
    #[error(transparent)]
    OrderLog(#[from] OrderLogError),
}

/// Where a checkout is in its life cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutState {
    /// Waiting for a submission
    #[default]
    Idle,
    /// Checking the form and cart
    Validating,
    /// Building the order
    Submitting,
    /// The order message has been delivered
    HandedOff,
    /// The order is logged and the cart emptied
    CartCleared,
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CheckoutState::Idle => "idle",
            CheckoutState::Validating => "validating",
            CheckoutState::Submitting => "submitting",
            CheckoutState::HandedOff => "handed-off",
            CheckoutState::CartCleared => "cart-cleared",
        };

        f.write_str(label)
    }
}

/// Shop details and billing rules used at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopSettings {
    /// Trading name shown in messages
    pub business_name: String,

    /// Shop phone number, without the country code
    pub business_phone: String,

    /// Shop address shown in messages
    pub business_address: String,

    /// Support email shown to customers
    pub support_email: String,

    /// Country calling code, digits only
    pub country_code: String,

    /// Tax charged on the subtotal, as a fraction
    pub tax_rate: Decimal,

    /// Flat shipping charge
    pub shipping: Price,

    /// Zone order ids and message dates are rendered in
    pub time_zone: TimeZone,
}

impl ShopSettings {
    /// The shop's number in international format.
    #[must_use]
    pub fn business_recipient(&self) -> String {
        format!("{}{}", self.country_code, self.business_phone)
    }

    /// Name of the tax line, e.g. `GST (18%)`.
    #[must_use]
    pub fn tax_label(&self) -> String {
        let percent = self
            .tax_rate
            .checked_mul(Decimal::ONE_HUNDRED)
            .map_or(self.tax_rate, |percent| percent.normalize());

        format!("GST ({percent}%)")
    }

    /// A customer's number in international format.
    #[must_use]
    pub fn customer_recipient(&self, customer: &CustomerDetails) -> String {
        format!("{}{}", self.country_code, customer.phone.trim())
    }
}

impl Default for ShopSettings {
    fn default() -> Self {
        ShopSettings {
            business_name: "Manthrakodi Bridals".to_string(),
            business_phone: "7994036951".to_string(),
            business_address: "1st Floor, Bengacheri Complex, Kanhangad".to_string(),
            support_email: "info@manthrakodibridals.com".to_string(),
            country_code: "91".to_string(),
            tax_rate: Decimal::new(18, 2),
            shipping: Price::ZERO,
            time_zone: Offset::from_seconds(IST_OFFSET_SECONDS)
                .map_or(TimeZone::UTC, TimeZone::fixed),
        }
    }
}

/// What the customer submits at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    /// Contact and shipping details
    pub customer: CustomerDetails,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Free-text notes
    pub notes: String,
}

/// A successfully placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    /// The logged order
    pub order: Order,

    /// The link delivered to the shop
    pub business_link: HandOffLink,

    /// A confirmation link the customer can open to message themselves
    pub customer_link: HandOffLink,
}

/// The order submission flow.
#[derive(Debug)]
pub struct Checkout<L: Storage, H: HandOff, R: Rng = StdRng> {
    settings: ShopSettings,
    ids: OrderIdGenerator<R>,
    log: OrderLog<L>,
    handoff: H,
    state: CheckoutState,
}

impl<L: Storage, H: HandOff> Checkout<L, H> {
    /// A checkout logging to `log_storage` and handing off through `handoff`.
    pub fn new(settings: ShopSettings, log_storage: L, handoff: H) -> Self {
        let ids = OrderIdGenerator::new(settings.time_zone.clone());

        Checkout::with_ids(settings, ids, log_storage, handoff)
    }
}

impl<L: Storage, H: HandOff, R: Rng> Checkout<L, H, R> {
    /// A checkout drawing order ids from `ids`.
    pub fn with_ids(
        settings: ShopSettings,
        ids: OrderIdGenerator<R>,
        log_storage: L,
        handoff: H,
    ) -> Self {
        Checkout {
            settings,
            ids,
            log: OrderLog::new(log_storage),
            handoff,
            state: CheckoutState::Idle,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Shop settings.
    #[must_use]
    pub fn settings(&self) -> &ShopSettings {
        &self.settings
    }

    /// The order log.
    #[must_use]
    pub fn order_log(&self) -> &OrderLog<L> {
        &self.log
    }

    /// The hand-off channel.
    #[must_use]
    pub fn handoff(&self) -> &H {
        &self.handoff
    }

    /// Submit the cart as an order.
    ///
    /// On success the order has been delivered, appended to both order logs and
    /// the cart is empty. On failure the state returns to
    /// [`CheckoutState::Idle`] and the cart is unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] naming the step that failed.
    #[tracing::instrument(skip_all, fields(items = cart.len(), total = *cart.total()))]
    pub fn submit<S: Storage>(
        &mut self,
        cart: &mut CartStore<S>,
        form: &CheckoutForm,
        now: Timestamp,
    ) -> Result<PlacedOrder, CheckoutError> {
        let result = self.run(cart, form, now);

        match &result {
            Ok(placed) => info!(
                order_id = %placed.order.order_id,
                total = *placed.order.total,
                "order placed"
            ),
            Err(err) => {
                warn!(error = %err, state = %self.state, "checkout failed");
                self.transition(CheckoutState::Idle);
            }
        }

        result
    }

    fn run<S: Storage>(
        &mut self,
        cart: &mut CartStore<S>,
        form: &CheckoutForm,
        now: Timestamp,
    ) -> Result<PlacedOrder, CheckoutError> {
        self.transition(CheckoutState::Validating);

        validate(&form.customer)?;

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.transition(CheckoutState::Submitting);

        let totals = OrderTotals::from_subtotal(
            cart.total(),
            self.settings.tax_rate,
            self.settings.shipping,
        )?;

        let mut order = Order::from_cart(
            cart.items(),
            OrderDraft {
                order_id: self.ids.generate(now),
                customer: &form.customer,
                payment_method: form.payment_method,
                notes: &form.notes,
                totals,
                created_at: now,
            },
        );

        let business_link = HandOffLink::new(
            &self.settings.business_recipient(),
            message::business_message(&order, &self.settings)?,
        );
        let customer_link = HandOffLink::new(
            &self.settings.customer_recipient(&order.customer),
            message::customer_confirmation(&order, &self.settings)?,
        );

        self.handoff.deliver(&business_link)?;
        order.handed_off_at = Some(now);

        self.transition(CheckoutState::HandedOff);

        self.log.append(&order)?;
        cart.clear_cart();

        self.transition(CheckoutState::CartCleared);

        Ok(PlacedOrder {
            order,
            business_link,
            customer_link,
        })
    }

    fn transition(&mut self, next: CheckoutState) {
        debug!(from = %self.state, to = %next, "checkout state changed");

        self.state = next;
    }
}

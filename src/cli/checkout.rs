use std::io;

use clap::Args;
use jiff::Timestamp;
use trousseau::{
    cart::CartStore,
    checkout::{Checkout, CheckoutError, CheckoutForm, WriterHandOff},
    orders::{CustomerDetails, PaymentMethod, PreferredContact},
};

use crate::{
    cli::{open_storage, shop_settings},
    config::Config,
};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Full name
    #[arg(long, default_value = "")]
    name: String,

    /// 10-digit mobile number
    #[arg(long, default_value = "")]
    phone: String,

    /// Email address
    #[arg(long, default_value = "")]
    email: String,

    /// Street address
    #[arg(long, default_value = "")]
    address: String,

    /// City
    #[arg(long, default_value = "")]
    city: String,

    /// State
    #[arg(long, default_value = "Tamil Nadu")]
    state: String,

    /// 6-digit postal code
    #[arg(long, default_value = "")]
    pincode: String,

    /// How the shop should get in touch
    #[arg(long, value_enum, default_value_t = PreferredContact::WhatsApp)]
    preferred_contact: PreferredContact,

    /// How the order will be paid for
    #[arg(long, value_enum, default_value_t = PaymentMethod::Cod)]
    payment_method: PaymentMethod,

    /// Notes for the shop
    #[arg(long, default_value = "")]
    notes: String,
}

impl From<CheckoutArgs> for CheckoutForm {
    fn from(args: CheckoutArgs) -> Self {
        CheckoutForm {
            customer: CustomerDetails {
                name: args.name,
                email: args.email,
                phone: args.phone,
                address: args.address,
                city: args.city,
                state: args.state,
                pincode: args.pincode,
                preferred_contact: args.preferred_contact,
            },
            payment_method: args.payment_method,
            notes: args.notes,
        }
    }
}

pub(crate) fn run(config: &Config, args: CheckoutArgs) -> Result<(), String> {
    let settings = shop_settings(config)?;
    let mut cart = CartStore::open(open_storage(config)?);
    let mut checkout = Checkout::new(
        settings,
        open_storage(config)?,
        WriterHandOff::new(io::stdout()),
    );

    let placed = match checkout.submit(&mut cart, &args.into(), Timestamp::now()) {
        Ok(placed) => placed,
        Err(CheckoutError::Invalid(errors)) => {
            let fields: Vec<String> = errors
                .errors()
                .iter()
                .map(|error| format!("  {}: {}", error.field, error.message))
                .collect();

            return Err(format!("please fix the following:\n{}", fields.join("\n")));
        }
        Err(error) => return Err(format!("failed to place order: {error}")),
    };

    println!();
    println!("open the link above to send the order to the shop");
    println!();
    println!("order_id: {}", placed.order.order_id);
    println!("items: {}", placed.order.items.len());
    println!("subtotal: {}", placed.order.subtotal);
    println!("tax: {}", placed.order.tax);
    println!("shipping: {}", placed.order.shipping);
    println!("total: {}", placed.order.total);
    println!("payment: {}", placed.order.payment_method);
    println!();
    println!("confirmation link for the customer:");
    println!("{}", placed.customer_link);

    Ok(())
}

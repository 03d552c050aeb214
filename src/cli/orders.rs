use clap::Args;
use trousseau::orders::OrderLog;

use crate::{
    cli::{open_storage, shop_settings},
    config::Config,
};

#[derive(Debug, Args)]
pub(crate) struct OrdersArgs {
    /// Show the customer's own order history instead of the shop's log
    #[arg(long)]
    mine: bool,
}

pub(crate) fn run(config: &Config, args: &OrdersArgs) -> Result<(), String> {
    let settings = shop_settings(config)?;
    let log = OrderLog::new(open_storage(config)?);

    if args.mine {
        let orders = log
            .customer_orders()
            .map_err(|error| format!("failed to read order history: {error}"))?;

        if orders.is_empty() {
            println!("no orders yet");
        }

        for order in orders {
            let date = order.date.to_zoned(settings.time_zone.clone());

            println!("order_id: {}", order.order_id);
            println!("date: {}", date.strftime("%Y-%m-%d %H:%M"));
            println!("items: {}", order.items.len());
            println!("total: {}", order.total);
            println!("status: {}", order.status);
            println!();
        }

        return Ok(());
    }

    let orders = log
        .orders()
        .map_err(|error| format!("failed to read order log: {error}"))?;

    if orders.is_empty() {
        println!("no orders logged");
    }

    for order in orders {
        let date = order.created_at.to_zoned(settings.time_zone.clone());

        println!("order_id: {}", order.order_id);
        println!("date: {}", date.strftime("%Y-%m-%d %H:%M"));
        println!(
            "customer: {} (+{} {})",
            order.customer.name, settings.country_code, order.customer.phone
        );
        println!(
            "ship_to: {}, {}, {} {}",
            order.customer.address, order.customer.city, order.customer.state, order.customer.pincode
        );
        println!("units: {}", order.unit_count());
        println!("total: {}", order.total);
        println!("payment: {}", order.payment_method);
        println!("status: {}", order.status);
        println!();
    }

    Ok(())
}

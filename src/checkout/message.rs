//! Order messages

use std::fmt::{self, Write};

use crate::{checkout::ShopSettings, orders::Order};

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Characters of the description quoted for each item.
const EXCERPT_CHARS: usize = 50;

/// The message handed off to the shop for a new order.
///
/// # Errors
///
/// Returns [`fmt::Error`] if formatting fails.
pub fn business_message(order: &Order, settings: &ShopSettings) -> Result<String, fmt::Error> {
    let placed = order
        .created_at
        .to_zoned(settings.time_zone.clone())
        .strftime("%A, %-d %B %Y, %I:%M %p")
        .to_string();
    let customer = &order.customer;
    let email = non_empty(&customer.email, "Not provided");
    let mut out = String::new();

    writeln!(out, "*{} - NEW ORDER*", settings.business_name)?;
    writeln!(out, "\n{DIVIDER}\n")?;
    writeln!(out, "*ORDER ID:* {}", order.order_id)?;
    writeln!(out, "*DATE & TIME:* {placed}")?;
    writeln!(out, "*ITEMS:* {}", order.items.len())?;
    writeln!(out, "\n{DIVIDER}\n")?;

    writeln!(out, "*CUSTOMER DETAILS*")?;
    writeln!(out, "• *Name:* {}", customer.name)?;
    writeln!(out, "• *Phone:* +{} {}", settings.country_code, customer.phone)?;
    writeln!(out, "• *Email:* {email}")?;
    writeln!(out, "• *Address:* {}", customer.address)?;
    writeln!(out, "• *City:* {}, {}", customer.city, customer.state)?;
    writeln!(out, "• *Pincode:* {}", customer.pincode)?;
    writeln!(out, "• *Preferred Contact:* {}", customer.preferred_contact)?;
    writeln!(out, "\n{DIVIDER}\n")?;

    writeln!(out, "*ORDER ITEMS*")?;
    for (idx, item) in order.items.iter().enumerate() {
        if idx > 0 {
            writeln!(out)?;
        }

        let line_total = item.line_total().map_or_else(|_| "-".to_string(), |p| p.to_string());

        writeln!(out, "{}. *{}*", idx + 1, item.name)?;
        writeln!(out, "   Qty: {} × {} = {line_total}", item.quantity, item.price)?;

        if let Some(description) = item.description.as_deref() {
            writeln!(out, "   {}", excerpt(description))?;
        }
    }
    writeln!(out, "\n{DIVIDER}\n")?;

    writeln!(out, "*BILLING SUMMARY*")?;
    writeln!(out, "• *Subtotal:* {}", order.subtotal)?;
    writeln!(out, "• *{}:* {}", settings.tax_label(), order.tax)?;
    if order.shipping.minor_units() == 0 {
        writeln!(out, "• *Shipping:* {} (FREE)", order.shipping)?;
    } else {
        writeln!(out, "• *Shipping:* {}", order.shipping)?;
    }
    writeln!(out, "• *Grand Total:* {}", order.total)?;
    writeln!(out, "\n{DIVIDER}\n")?;

    writeln!(out, "*PAYMENT METHOD*")?;
    writeln!(out, "{}", order.payment_method)?;
    writeln!(out)?;
    writeln!(out, "*CUSTOMER NOTES*")?;
    writeln!(out, "{}", non_empty(&order.notes, "No additional notes"))?;
    writeln!(out, "\n{DIVIDER}\n")?;

    writeln!(out, "*QUICK CONTACT*")?;
    writeln!(out, "• WhatsApp: https://wa.me/{}{}", settings.country_code, customer.phone)?;
    writeln!(out, "• Call: +{} {}", settings.country_code, customer.phone)?;
    writeln!(out, "• Email: {email}")?;
    writeln!(out, "\n{DIVIDER}")?;

    writeln!(out, "*Order placed via {} Website*", settings.business_name)?;
    writeln!(out, "*Please confirm within 30 minutes*")?;
    write!(out, "*{}*", settings.business_address)?;

    Ok(out)
}

/// The confirmation message handed off to the customer.
///
/// # Errors
///
/// Returns [`fmt::Error`] if formatting fails.
pub fn customer_confirmation(order: &Order, settings: &ShopSettings) -> Result<String, fmt::Error> {
    let placed = order
        .created_at
        .to_zoned(settings.time_zone.clone())
        .strftime("%-d/%-m/%Y")
        .to_string();
    let mut out = String::new();

    writeln!(out, "*ORDER CONFIRMED - {}*", settings.business_name)?;
    writeln!(out)?;
    writeln!(out, "Dear {},", order.customer.name)?;
    writeln!(out)?;
    writeln!(out, "Thank you for your order! Your bridal selection is being processed.")?;
    writeln!(out, "\n{DIVIDER}\n")?;

    writeln!(out, "*ORDER DETAILS*")?;
    writeln!(out, "• *Order ID:* {}", order.order_id)?;
    writeln!(out, "• *Order Date:* {placed}")?;
    writeln!(out, "• *Items:* {} bridal items", order.items.len())?;
    writeln!(out, "• *Total Amount:* {}", order.total)?;
    writeln!(out, "• *Payment Method:* {}", order.payment_method)?;
    if order.shipping.minor_units() == 0 {
        writeln!(out, "• *Shipping:* FREE across India")?;
    } else {
        writeln!(out, "• *Shipping:* {}", order.shipping)?;
    }
    writeln!(out, "\n{DIVIDER}\n")?;

    writeln!(out, "*CONTACT & SUPPORT*")?;
    writeln!(out, "• *WhatsApp:* https://wa.me/{}", settings.business_recipient())?;
    writeln!(out, "• *Phone:* +{} {}", settings.country_code, settings.business_phone)?;
    writeln!(out, "• *Email:* {}", settings.support_email)?;
    writeln!(out, "• *Address:* {}", settings.business_address)?;
    writeln!(out, "\n{DIVIDER}")?;

    writeln!(out, "*Thank you for choosing {}!*", settings.business_name)?;

    Ok(out)
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn excerpt(description: &str) -> String {
    let mut chars = description.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();

    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::{
        orders::{
            CustomerDetails, OrderId, OrderItem, OrderStatus, PaymentMethod, PreferredContact,
        },
        prices::Price,
        products::{Category, ProductId},
    };

    use super::*;

    fn order() -> TestResult<Order> {
        Ok(Order {
            order_id: OrderId::new("MB1610123456042"),
            customer: CustomerDetails {
                name: "Divya Menon".into(),
                phone: "9846012345".into(),
                address: "7 Temple Lane".into(),
                city: "Kasaragod".into(),
                state: "Kerala".into(),
                pincode: "671121".into(),
                preferred_contact: PreferredContact::Phone,
                ..CustomerDetails::default()
            },
            items: vec![
                OrderItem {
                    product_id: ProductId::from("kanjivaram-red"),
                    name: "Kanjivaram Silk Saree".into(),
                    quantity: 2,
                    price: Price::new(1_250_000),
                    image: None,
                    category: Category::Saree,
                    description: Some(
                        "Pure silk bridal saree with real zari border and rich pallu work".into(),
                    ),
                },
                OrderItem {
                    product_id: ProductId::from("jhumka"),
                    name: "Temple Jhumka".into(),
                    quantity: 1,
                    price: Price::new(350_000),
                    image: None,
                    category: Category::Ornament,
                    description: None,
                },
            ],
            subtotal: Price::new(2_850_000),
            tax: Price::new(513_000),
            shipping: Price::ZERO,
            total: Price::new(3_363_000),
            payment_method: PaymentMethod::Cod,
            notes: String::new(),
            status: OrderStatus::Pending,
            source: "website".into(),
            // 2026-10-16 10:30 IST
            created_at: "2026-10-16T05:00:00Z".parse::<Timestamp>()?,
            handed_off_at: None,
        })
    }

    #[test]
    fn business_message_carries_order_and_customer() -> TestResult {
        let order = order()?;
        let message = business_message(&order, &ShopSettings::default())?;

        assert!(message.starts_with("*Manthrakodi Bridals - NEW ORDER*"));
        assert!(message.contains("*ORDER ID:* MB1610123456042"));
        assert!(message.contains("*DATE & TIME:* Friday, 16 October 2026, 10:30 AM"));
        assert!(message.contains("• *Phone:* +91 9846012345"));
        assert!(message.contains("• *Email:* Not provided"));
        assert!(message.contains("• *City:* Kasaragod, Kerala"));
        assert!(message.contains("• *Preferred Contact:* Phone Call"));
        assert!(message.contains("No additional notes"));
        assert!(message.contains("https://wa.me/919846012345"));

        Ok(())
    }

    #[test]
    fn business_message_lists_items_with_line_totals() -> TestResult {
        let order = order()?;
        let message = business_message(&order, &ShopSettings::default())?;

        let first_line = format!(
            "   Qty: 2 × {} = {}",
            Price::new(1_250_000),
            Price::new(2_500_000)
        );

        assert!(message.contains("1. *Kanjivaram Silk Saree*"));
        assert!(message.contains(&first_line));
        assert!(message.contains("   Pure silk bridal saree with real zari border and r..."));
        assert!(message.contains("2. *Temple Jhumka*"));
        assert!(message.contains(&format!("• *GST (18%):* {}", Price::new(513_000))));
        assert!(message.contains(&format!("• *Grand Total:* {}", Price::new(3_363_000))));
        assert!(message.contains("Cash on Delivery"));

        Ok(())
    }

    #[test]
    fn customer_confirmation_has_support_contacts() -> TestResult {
        let order = order()?;
        let message = customer_confirmation(&order, &ShopSettings::default())?;

        assert!(message.contains("Dear Divya Menon,"));
        assert!(message.contains("• *Order Date:* 16/10/2026"));
        assert!(message.contains("• *Items:* 2 bridal items"));
        assert!(message.contains("• *Shipping:* FREE across India"));
        assert!(message.contains("https://wa.me/917994036951"));
        assert!(message.contains("• *Phone:* +91 7994036951"));

        Ok(())
    }

    #[test]
    fn excerpt_only_marks_truncation() {
        assert_eq!(excerpt("short"), "short");
        assert_eq!(excerpt(&"x".repeat(50)), "x".repeat(50));
        assert_eq!(excerpt(&"ä".repeat(51)), format!("{}...", "ä".repeat(50)));
    }
}

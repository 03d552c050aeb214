//! Shop Config

use clap::Args;
use jiff::tz::{Offset, TimeZone};
use rust_decimal::Decimal;
use thiserror::Error;
use trousseau::{checkout::ShopSettings, prices::Price};

/// Invalid shop settings.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The UTC offset is out of range.
    #[error("invalid UTC offset of {minutes} minutes: {source}")]
    Offset {
        /// Offending offset
        minutes: i32,
        /// Range error
        #[source]
        source: jiff::Error,
    },

    /// The tax percentage is negative or too large.
    #[error("invalid tax percentage: {0}")]
    TaxPercent(Decimal),

    /// The shipping charge does not fit.
    #[error("invalid shipping charge: {0} rupees")]
    Shipping(u64),
}

/// Shop details and billing rules.
#[derive(Debug, Args)]
pub(crate) struct ShopConfig {
    /// Trading name shown in order messages
    #[arg(long, env = "SHOP_NAME", default_value = "Manthrakodi Bridals", global = true)]
    pub shop_name: String,

    /// Shop phone number, without the country code
    #[arg(long, env = "SHOP_PHONE", default_value = "7994036951", global = true)]
    pub shop_phone: String,

    /// Shop address shown in order messages
    #[arg(
        long,
        env = "SHOP_ADDRESS",
        default_value = "1st Floor, Bengacheri Complex, Kanhangad",
        global = true
    )]
    pub shop_address: String,

    /// Support email shown to customers
    #[arg(
        long,
        env = "SHOP_SUPPORT_EMAIL",
        default_value = "info@manthrakodibridals.com",
        global = true
    )]
    pub support_email: String,

    /// Country calling code
    #[arg(long, env = "SHOP_COUNTRY_CODE", default_value = "91", global = true)]
    pub country_code: String,

    /// Tax charged on the subtotal, in percent
    #[arg(long, env = "SHOP_TAX_PERCENT", default_value = "18", global = true)]
    pub tax_percent: Decimal,

    /// Flat shipping charge, in rupees
    #[arg(long, env = "SHOP_SHIPPING", default_value_t = 0, global = true)]
    pub shipping: u64,

    /// Shop time zone as minutes east of UTC
    #[arg(
        long,
        env = "SHOP_UTC_OFFSET_MINUTES",
        default_value_t = 330,
        allow_negative_numbers = true,
        global = true
    )]
    pub utc_offset_minutes: i32,
}

impl ShopConfig {
    /// Resolve into checkout settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a value is out of range.
    pub(crate) fn settings(&self) -> Result<ShopSettings, ConfigError> {
        let minutes = self.utc_offset_minutes;
        let offset = Offset::from_seconds(minutes.saturating_mul(60))
            .map_err(|source| ConfigError::Offset { minutes, source })?;

        let tax_rate = self
            .tax_percent
            .checked_div(Decimal::ONE_HUNDRED)
            .filter(|rate| !rate.is_sign_negative() && *rate <= Decimal::ONE)
            .ok_or(ConfigError::TaxPercent(self.tax_percent))?;

        let shipping = Price::from_major(self.shipping).ok_or(ConfigError::Shipping(self.shipping))?;

        Ok(ShopSettings {
            business_name: self.shop_name.clone(),
            business_phone: digits(&self.shop_phone),
            business_address: self.shop_address.clone(),
            support_email: self.support_email.clone(),
            country_code: digits(&self.country_code),
            tax_rate,
            shipping,
            time_zone: TimeZone::fixed(offset),
        })
    }
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        shop: ShopConfig,
    }

    #[test]
    fn defaults_match_the_storefront() -> TestResult {
        let cli = TestCli::try_parse_from(["trousseau"])?;

        assert_eq!(cli.shop.settings()?, ShopSettings::default());

        Ok(())
    }

    #[test]
    fn overrides_are_normalised() -> TestResult {
        let cli = TestCli::try_parse_from([
            "trousseau",
            "--shop-phone",
            "79940 36951",
            "--country-code",
            "+91",
            "--tax-percent",
            "5",
            "--shipping",
            "150",
            "--utc-offset-minutes",
            "-300",
        ])?;

        let settings = cli.shop.settings()?;

        assert_eq!(settings.business_recipient(), "917994036951");
        assert_eq!(settings.tax_rate, Decimal::new(5, 2));
        assert_eq!(settings.shipping, Price::new(15_000));

        Ok(())
    }

    #[test]
    fn out_of_range_values_are_rejected() -> TestResult {
        let cli = TestCli::try_parse_from(["trousseau", "--tax-percent=-1"])?;
        assert!(matches!(cli.shop.settings(), Err(ConfigError::TaxPercent(_))));

        let cli = TestCli::try_parse_from(["trousseau", "--utc-offset-minutes", "100000"])?;
        assert!(matches!(cli.shop.settings(), Err(ConfigError::Offset { .. })));

        Ok(())
    }
}

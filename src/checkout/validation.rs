//! Checkout form validation

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

use crate::orders::CustomerDetails;

/// A checkout form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Full name
    Name,
    /// Email address
    Email,
    /// Mobile number
    Phone,
    /// Street address
    Address,
    /// City
    City,
    /// Postal code
    Pincode,
}

impl Field {
    /// The field's form name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::City => "city",
            Field::Pincode => "pincode",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    /// The offending field
    pub field: Field,

    /// Message to show next to the field
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field error found in a checkout form, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} invalid field(s): {}", .errors.len(), join_errors(.errors))]
pub struct ValidationErrors {
    errors: SmallVec<[FieldError; 6]>,
}

impl ValidationErrors {
    /// Errors in form order.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The error for `field`, if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    /// Number of invalid fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no field is invalid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, field: Field, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate customer details, collecting every failure.
///
/// # Errors
///
/// Returns [`ValidationErrors`] listing every invalid field.
pub fn validate(customer: &CustomerDetails) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if customer.name.trim().is_empty() {
        errors.push(Field::Name, "Name is required");
    }

    let email = customer.email.trim();
    if !email.is_empty() && !is_email(email) {
        errors.push(Field::Email, "Enter a valid email address");
    }

    if customer.phone.trim().is_empty() {
        errors.push(Field::Phone, "Phone number is required");
    } else if !is_digits(&customer.phone, 10) {
        errors.push(Field::Phone, "Enter valid 10-digit phone number");
    }

    if customer.address.trim().is_empty() {
        errors.push(Field::Address, "Address is required");
    }

    if customer.city.trim().is_empty() {
        errors.push(Field::City, "City is required");
    }

    if customer.pincode.trim().is_empty() {
        errors.push(Field::Pincode, "Pincode is required");
    } else if !is_digits(&customer.pincode, 6) {
        errors.push(Field::Pincode, "Enter valid 6-digit pincode");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// `local@domain.tld` with no whitespace.
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    !local.is_empty()
        && !host.is_empty()
        && !tld.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CustomerDetails {
        CustomerDetails {
            name: "Meera Nair".into(),
            email: "meera@example.in".into(),
            phone: "9876543210".into(),
            address: "22 Fort Road".into(),
            city: "Kanhangad".into(),
            pincode: "671315".into(),
            ..CustomerDetails::default()
        }
    }

    #[test]
    fn valid_details_pass() {
        assert_eq!(validate(&valid()), Ok(()));
    }

    #[test]
    fn email_is_optional() {
        let customer = CustomerDetails {
            email: "   ".into(),
            ..valid()
        };

        assert_eq!(validate(&customer), Ok(()));
    }

    #[test]
    fn every_failure_is_collected_in_form_order() {
        let customer = CustomerDetails {
            email: "not-an-email".into(),
            phone: "12345".into(),
            pincode: "67A315".into(),
            ..CustomerDetails::default()
        };

        let Err(errors) = validate(&customer) else {
            panic!("expected validation errors");
        };

        let fields: Vec<Field> = errors.errors().iter().map(|e| e.field).collect();

        assert_eq!(
            fields,
            [
                Field::Name,
                Field::Email,
                Field::Phone,
                Field::Address,
                Field::City,
                Field::Pincode,
            ]
        );
        assert_eq!(
            errors.get(Field::Phone).map(|e| e.message),
            Some("Enter valid 10-digit phone number")
        );
    }

    #[test]
    fn whitespace_only_fields_are_missing() {
        let customer = CustomerDetails {
            name: "  ".into(),
            phone: " ".into(),
            ..valid()
        };

        let errors = validate(&customer).err().unwrap_or_default();

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get(Field::Phone).map(|e| e.message),
            Some("Phone number is required")
        );
    }

    #[test]
    fn phone_must_be_ascii_digits() {
        let customer = CustomerDetails {
            phone: "98765४३२१०".into(),
            ..valid()
        };

        assert!(validate(&customer).is_err());
    }

    #[test]
    fn padded_phone_and_pincode_are_rejected() {
        let customer = CustomerDetails {
            phone: " 9876543210".into(),
            pincode: "671315 ".into(),
            ..valid()
        };

        let errors = validate(&customer).err().unwrap_or_default();

        assert_eq!(
            errors.get(Field::Phone).map(|e| e.message),
            Some("Enter valid 10-digit phone number")
        );
        assert_eq!(
            errors.get(Field::Pincode).map(|e| e.message),
            Some("Enter valid 6-digit pincode")
        );
    }

    #[test]
    fn error_message_joins_every_field() {
        let customer = CustomerDetails {
            address: String::new(),
            city: String::new(),
            ..valid()
        };

        let errors = validate(&customer).err().unwrap_or_default();

        assert_eq!(
            errors.to_string(),
            "2 invalid field(s): address: Address is required; city: City is required"
        );
    }

    #[test]
    fn email_shape() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.co"));
        assert!(!is_email("a@@b.co"));
        assert!(!is_email("a b@c.in"));
    }

    #[test]
    fn error_message_lists_fields() {
        let customer = CustomerDetails {
            city: String::new(),
            ..valid()
        };

        let errors = validate(&customer).err().unwrap_or_default();

        assert_eq!(errors.to_string(), "1 invalid field(s): city: City is required");
    }
}

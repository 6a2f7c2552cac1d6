//! Request validation, run before a purchase touches any store.

use crate::error::ValidationError;
use crate::types::{EmailAddress, EventId, PurchaseRequest};

/// Upper bound on an email address, in bytes.
const MAX_EMAIL_LEN: usize = 255;

/// Syntactic email check.
///
/// Accepts `local@domain` where:
/// - the whole address is 3 to 255 bytes long
/// - there is exactly one `@`
/// - the local part uses alphanumerics and `. - + _`
/// - the domain has at least two non-empty labels of alphanumerics and `-`
///
/// Deliverability is the notifier's concern, not this function's.
///
/// # Examples
///
/// ```
/// use ticketing_core::validation::is_valid_email;
///
/// assert!(is_valid_email("buyer@example.com"));
/// assert!(is_valid_email("buyer+vip@tickets.example.co.ke"));
/// assert!(!is_valid_email("buyer"));
/// assert!(!is_valid_email("@example.com"));
/// assert!(!is_valid_email("buyer@localhost"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > MAX_EMAIL_LEN {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }

    let local_ok = local
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_'));

    let domain_ok = domain
        .split('.')
        .all(|label| !label.is_empty() && label.chars().all(|c| c.is_alphanumeric() || c == '-'));

    local_ok && domain_ok
}

/// A purchase request that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedPurchase {
    /// Event to buy tickets for
    pub event_id: EventId,
    /// Trimmed buyer name
    pub buyer_name: String,
    /// Normalized buyer email
    pub buyer_email: EmailAddress,
    /// Trimmed buyer phone
    pub buyer_phone: String,
    /// Requested quantity, `1..=max_quantity`
    pub quantity: u32,
}

/// Validates a purchase request against the per-purchase quantity cap.
///
/// # Errors
///
/// - [`ValidationError::ZeroQuantity`] / [`ValidationError::QuantityTooLarge`]
/// - [`ValidationError::MissingName`] if the buyer name is blank
/// - [`ValidationError::InvalidEmail`] if the email does not parse
pub fn validate_purchase(
    request: &PurchaseRequest,
    max_quantity: u32,
) -> Result<ValidatedPurchase, ValidationError> {
    if request.quantity == 0 {
        return Err(ValidationError::ZeroQuantity);
    }
    if request.quantity > max_quantity {
        return Err(ValidationError::QuantityTooLarge {
            requested: request.quantity,
            max: max_quantity,
        });
    }

    let buyer_name = request.buyer_name.trim();
    if buyer_name.is_empty() {
        return Err(ValidationError::MissingName);
    }

    let buyer_email = EmailAddress::parse(&request.buyer_email)?;

    Ok(ValidatedPurchase {
        event_id: request.event_id,
        buyer_name: buyer_name.to_string(),
        buyer_email,
        buyer_phone: request.buyer_phone.trim().to_string(),
        quantity: request.quantity,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn request(quantity: u32) -> PurchaseRequest {
        PurchaseRequest {
            event_id: EventId::new(),
            buyer_name: "  Amina Njeri ".to_string(),
            buyer_email: "Amina@Example.com".to_string(),
            buyer_phone: "+254700000000".to_string(),
            quantity,
        }
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in [
            "",
            "a@",
            "user@@example.com",
            "user@example..com",
            "user@.example.com",
            "us er@example.com",
            "user@exam_ple.com",
        ] {
            assert!(!is_valid_email(email), "{email} should be rejected");
        }
    }

    #[test]
    fn rejects_overlong_email() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(!is_valid_email(&long));
    }

    #[test]
    fn valid_request_is_normalized() {
        let validated = validate_purchase(&request(2), 10).unwrap();
        assert_eq!(validated.buyer_name, "Amina Njeri");
        assert_eq!(validated.buyer_email.as_str(), "amina@example.com");
        assert_eq!(validated.quantity, 2);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert_eq!(
            validate_purchase(&request(0), 10),
            Err(ValidationError::ZeroQuantity)
        );
    }

    #[test]
    fn quantity_above_cap_is_rejected() {
        assert_eq!(
            validate_purchase(&request(11), 10),
            Err(ValidationError::QuantityTooLarge {
                requested: 11,
                max: 10
            })
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut req = request(1);
        req.buyer_name = "   ".to_string();
        assert_eq!(validate_purchase(&req, 10), Err(ValidationError::MissingName));
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut req = request(1);
        req.buyer_email = "not-an-email".to_string();
        assert!(matches!(
            validate_purchase(&req, 10),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    proptest! {
        #[test]
        fn quantity_in_range_always_validates(quantity in 1u32..=10) {
            prop_assert!(validate_purchase(&request(quantity), 10).is_ok());
        }

        #[test]
        fn generated_addresses_validate(local in "[a-z0-9]{1,20}", domain in "[a-z]{1,10}", tld in "[a-z]{2,4}") {
            let email = format!("{local}@{domain}.{tld}");
            prop_assert!(is_valid_email(&email));
        }
    }
}

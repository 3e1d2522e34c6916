//! Payment gateway abstraction.
//!
//! Checkout talks to [`PaymentGateway`] so a real provider (Stripe,
//! PromptPay) can be swapped in without touching the orchestrator. The only
//! implementation in this build is [`MockPaymentGateway`].

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Payment method names accepted at checkout.
pub const METHOD_CREDIT_CARD: &str = "credit_card";
pub const METHOD_PROMPTPAY: &str = "promptpay";
pub const METHOD_COD: &str = "cod";

/// Errors from payment processing.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment amount must be positive")]
    InvalidAmount,

    #[error("payment method is required")]
    MissingMethod,

    #[error("unsupported payment method: {0}")]
    UnsupportedMethod(String),
}

/// A payment to be charged.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub method: String,
}

/// Outcome of a charge.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub transaction_id: String,
    /// "success" or "pending".
    pub status: String,
    pub message: String,
    /// Set when the client must complete the payment elsewhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

/// Gateway for charging payments.
pub trait PaymentGateway: Send + Sync {
    /// Charge a payment.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` if the request is invalid or the method is
    /// not supported.
    fn charge(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PaymentError>;
}

/// Mock gateway for development and tests.
///
/// Credit card and cash-on-delivery charges succeed immediately; PromptPay
/// comes back pending with a redirect the client must follow.
pub struct MockPaymentGateway;

impl PaymentGateway for MockPaymentGateway {
    fn charge(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PaymentError> {
        if request.amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount);
        }
        if request.method.is_empty() {
            return Err(PaymentError::MissingMethod);
        }

        let transaction_id = Uuid::new_v4().to_string();

        match request.method.as_str() {
            METHOD_CREDIT_CARD => Ok(PaymentReceipt {
                transaction_id,
                status: "success".to_owned(),
                message: "credit card payment processed".to_owned(),
                redirect_url: None,
            }),
            METHOD_PROMPTPAY => Ok(PaymentReceipt {
                redirect_url: Some(format!("/payment/promptpay/{transaction_id}")),
                transaction_id,
                status: "pending".to_owned(),
                message: "waiting for PromptPay confirmation".to_owned(),
            }),
            METHOD_COD => Ok(PaymentReceipt {
                transaction_id,
                status: "success".to_owned(),
                message: "payment will be collected upon delivery".to_owned(),
                redirect_url: None,
            }),
            other => Err(PaymentError::UnsupportedMethod(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(amount: Decimal, method: &str) -> PaymentRequest {
        PaymentRequest {
            amount,
            method: method.to_owned(),
        }
    }

    #[test]
    fn test_credit_card_succeeds() {
        let receipt = MockPaymentGateway
            .charge(&request(Decimal::from(100), METHOD_CREDIT_CARD))
            .unwrap();

        assert_eq!(receipt.status, "success");
        assert!(!receipt.transaction_id.is_empty());
        assert!(receipt.redirect_url.is_none());
    }

    #[test]
    fn test_cod_succeeds() {
        let receipt = MockPaymentGateway
            .charge(&request(Decimal::from(50), METHOD_COD))
            .unwrap();

        assert_eq!(receipt.status, "success");
    }

    #[test]
    fn test_promptpay_is_pending_with_redirect() {
        let receipt = MockPaymentGateway
            .charge(&request(Decimal::from(75), METHOD_PROMPTPAY))
            .unwrap();

        assert_eq!(receipt.status, "pending");
        let url = receipt.redirect_url.unwrap();
        assert!(url.starts_with("/payment/promptpay/"));
        assert!(url.ends_with(&receipt.transaction_id));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let err = MockPaymentGateway
            .charge(&request(Decimal::ZERO, METHOD_COD))
            .unwrap_err();
        assert!(matches!(err, PaymentError::InvalidAmount));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = MockPaymentGateway
            .charge(&request(Decimal::from(-5), METHOD_CREDIT_CARD))
            .unwrap_err();
        assert!(matches!(err, PaymentError::InvalidAmount));
    }

    #[test]
    fn test_empty_method_rejected() {
        let err = MockPaymentGateway
            .charge(&request(Decimal::from(10), ""))
            .unwrap_err();
        assert!(matches!(err, PaymentError::MissingMethod));
    }

    #[test]
    fn test_unknown_method_rejected() {
        let err = MockPaymentGateway
            .charge(&request(Decimal::from(10), "barter"))
            .unwrap_err();
        assert!(matches!(err, PaymentError::UnsupportedMethod(m) if m == "barter"));
    }
}

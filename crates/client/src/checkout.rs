//! Checkout form and its local validation.
//!
//! Checkout submits `{shipping_address, payment_method}` to the backend,
//! which creates the order and consumes the remote cart. Validation that
//! needs no server round trip happens here; the submission itself lives
//! on [`Storefront::checkout`](crate::storefront::Storefront::checkout).

use vitrine_core::PaymentMethod;

use crate::api::types::CheckoutRequest;
use crate::error::Error;

/// Checkout form data.
#[derive(Debug, Clone)]
pub struct CheckoutForm {
    /// Full shipping address, free text.
    pub shipping_address: String,
    /// One of the accepted payment methods.
    pub payment_method: PaymentMethod,
}

impl CheckoutForm {
    /// Validate the form locally.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the shipping address is blank.
    pub fn validate(&self) -> Result<(), Error> {
        if self.shipping_address.trim().is_empty() {
            return Err(Error::Validation(
                "Shipping address is required".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<&CheckoutForm> for CheckoutRequest {
    fn from(form: &CheckoutForm) -> Self {
        Self {
            shipping_address: form.shipping_address.clone(),
            payment_method: form.payment_method,
        }
    }
}

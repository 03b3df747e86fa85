//! Status enums for orders and payments.

use serde::{Deserialize, Serialize};

/// Order lifecycle status as reported by the backend.
///
/// The set of statuses is owned by the backend and may grow; values the
/// client does not recognize are carried verbatim in [`OrderStatus::Other`]
/// and rendered as-is rather than failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    /// A status value this client does not know about.
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Payment method accepted at checkout.
///
/// A closed set: the backend rejects anything else, so the client only
/// constructs these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Pix,
    Boleto,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreditCard => write!(f, "credit_card"),
            Self::DebitCard => write!(f, "debit_card"),
            Self::Pix => write!(f, "pix"),
            Self::Boleto => write!(f, "boleto"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "pix" => Ok(Self::Pix),
            "boleto" => Ok(Self::Boleto),
            _ => Err(format!(
                "invalid payment method: {s}. Valid methods: credit_card, debit_card, pix, boleto"
            )),
        }
    }
}

//! Notice content for the toasts the display layer shows after each action.

use serde::Serialize;

use crate::cart::OrderConfirmation;
use crate::form::{FormError, FormKind};
use crate::request_id::SubmissionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoticeVariant {
    #[default]
    Default,
    Destructive,
}

/// Title and body of a single notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    fn destructive(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    /// Notice for a refused submission on a `kind` form.
    #[must_use]
    pub fn for_error(kind: FormKind, err: &FormError) -> Self {
        match err {
            FormError::MissingRequiredField(_) if kind == FormKind::Login => {
                Self::destructive("Missing Information", "Please fill in all fields.")
            }
            FormError::MissingRequiredField(_) => {
                Self::destructive("Missing Information", "Please fill in all required fields.")
            }
            FormError::PasswordMismatch => {
                Self::destructive("Password Mismatch", "Passwords do not match.")
            }
            FormError::EmptyCart => Self::destructive(
                "Your Cart is Empty",
                "Start adding some trees to your cart to make a difference!",
            ),
            FormError::UnknownField { .. } => Self::destructive("Invalid Field", err.to_string()),
            FormError::AlreadySubmitted => Self::destructive(
                "Already Submitted",
                "This form has already been submitted.",
            ),
        }
    }

    /// Notice for an accepted submission.
    #[must_use]
    pub fn submitted(kind: FormKind, result: &SubmissionResult) -> Self {
        match kind {
            FormKind::Login => Self::info("Login Successful!", "Welcome back to Himsols."),
            FormKind::Signup => Self::info(
                "Account Created Successfully!",
                "Welcome to Himsols! You can now access all our services.",
            ),
            FormKind::Contact => Self::info(
                "Message Sent Successfully!",
                "We'll get back to you within 24 hours.",
            ),
            FormKind::ServiceRequest => Self::info(
                "Request Submitted Successfully!",
                format!("Your request ID is: {result}"),
            ),
            FormKind::Checkout => Self::info(
                "Order Placed Successfully!",
                format!("Your request ID is: {result}. You can track your order with this ID."),
            ),
        }
    }

    #[must_use]
    pub fn order_placed(confirmation: &OrderConfirmation) -> Self {
        Self::submitted(FormKind::Checkout, &confirmation.submission)
    }

    #[must_use]
    pub fn added_to_cart(name: &str) -> Self {
        Self::info("Added to Cart", format!("{name} has been added to your cart."))
    }

    #[must_use]
    pub fn removed_from_cart() -> Self {
        Self::info("Item Removed", "Item has been removed from your cart.")
    }
}

//! Order lifecycle state machine.
//!
//! An order moves through a controlled lifecycle:
//!
//! ```text
//! pending    -> confirmed | cancelled
//! confirmed  -> processing | cancelled
//! processing -> shipped | cancelled
//! shipped    -> delivered
//! delivered  -> (terminal)
//! cancelled  -> (terminal)
//! ```
//!
//! Every status change must pass [`OrderStatus::can_transition_to`]; the
//! terminal states reject all transitions, including re-cancelling an
//! already-cancelled order.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unrecognized order status.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid order status: {0}")]
pub struct InvalidOrderStatus(pub String);

/// Status of an order in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// The statuses this one may legally transition to.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Processing, Self::Cancelled],
            Self::Processing => &[Self::Shipped, Self::Cancelled],
            Self::Shipped => &[Self::Delivered],
            // Terminal states: no outgoing transitions
            Self::Delivered | Self::Cancelled => &[],
        }
    }

    /// Whether this status may transition to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Whether an order in this status can still be cancelled.
    #[must_use]
    pub fn is_cancellable(self) -> bool {
        self.can_transition_to(Self::Cancelled)
    }

    /// Whether this is a terminal status (no further changes allowed).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Canonical lowercase name, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a status supplied by a client, accepting deprecated aliases.
    ///
    /// Older API clients sent numeric status codes and the US spelling of
    /// `cancelled`. These are normalized here, at the boundary; nothing
    /// internal ever produces them.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidOrderStatus`] if the input is neither a canonical
    /// status name nor a known alias.
    pub fn parse_client_input(input: &str) -> Result<Self, InvalidOrderStatus> {
        if let Ok(status) = input.parse() {
            return Ok(status);
        }
        match input {
            "0" => Ok(Self::Pending),
            "1" => Ok(Self::Shipped),
            "2" => Ok(Self::Delivered),
            "3" | "canceled" => Ok(Self::Cancelled),
            other => Err(InvalidOrderStatus(other.to_owned())),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = InvalidOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(InvalidOrderStatus(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use OrderStatus::*;

        let cases = [
            (Pending, Confirmed, true),
            (Pending, Cancelled, true),
            (Pending, Shipped, false),
            (Pending, Delivered, false),
            (Confirmed, Processing, true),
            (Confirmed, Cancelled, true),
            (Confirmed, Pending, false),
            (Processing, Shipped, true),
            (Processing, Cancelled, true),
            (Processing, Delivered, false),
            (Shipped, Delivered, true),
            (Shipped, Cancelled, false),
        ];

        for (from, to, expected) in cases {
            assert_eq!(
                from.can_transition_to(to),
                expected,
                "{from} -> {to} should be {expected}"
            );
        }
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            assert!(terminal.is_terminal());
            for target in OrderStatus::ALL {
                assert!(
                    !terminal.can_transition_to(target),
                    "{terminal} -> {target} must be rejected"
                );
            }
        }
        // Includes re-cancelling an already-cancelled order.
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_cancellable_set() {
        assert!(OrderStatus::Pending.is_cancellable());
        assert!(OrderStatus::Confirmed.is_cancellable());
        assert!(OrderStatus::Processing.is_cancellable());
        assert!(!OrderStatus::Shipped.is_cancellable());
        assert!(!OrderStatus::Delivered.is_cancellable());
        assert!(!OrderStatus::Cancelled.is_cancellable());
    }

    #[test]
    fn test_parse_canonical_names() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("paused".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_parse_client_input_legacy_aliases() {
        assert_eq!(
            OrderStatus::parse_client_input("0"),
            Ok(OrderStatus::Pending)
        );
        assert_eq!(
            OrderStatus::parse_client_input("1"),
            Ok(OrderStatus::Shipped)
        );
        assert_eq!(
            OrderStatus::parse_client_input("2"),
            Ok(OrderStatus::Delivered)
        );
        assert_eq!(
            OrderStatus::parse_client_input("3"),
            Ok(OrderStatus::Cancelled)
        );
        assert_eq!(
            OrderStatus::parse_client_input("canceled"),
            Ok(OrderStatus::Cancelled)
        );
        assert!(OrderStatus::parse_client_input("4").is_err());
        assert!(OrderStatus::parse_client_input("").is_err());
    }

    #[test]
    fn test_display_matches_storage_form() {
        assert_eq!(OrderStatus::Pending.to_string(), "pending");
        assert_eq!(OrderStatus::Cancelled.to_string(), "cancelled");
    }
}

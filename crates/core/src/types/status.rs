//! Order status and the progress-step mapping derived from it.

use serde::{Deserialize, Serialize};

/// Recognized order fulfillment statuses.
///
/// Webhook senders are free to send anything; unrecognized values are
/// stored verbatim and simply map to "no progress" on the public tracking
/// display. This enum covers the four statuses the 4-stage progress
/// indicator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Completed,
}

impl OrderStatus {
    /// The stage this status occupies on the 4-step progress indicator.
    #[must_use]
    pub const fn step(self) -> u8 {
        match self {
            Self::Pending => 1,
            Self::Processing => 2,
            Self::Shipped => 3,
            Self::Completed => 4,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("unrecognized order status: {s}")),
        }
    }
}

/// Map a raw status string to its progress step.
///
/// Stage N of the indicator is "active" iff `progress_step(status) >= N`.
/// Unrecognized statuses map to 0, meaning no stage lights up.
#[must_use]
pub fn progress_step(status: &str) -> u8 {
    status.parse::<OrderStatus>().map_or(0, OrderStatus::step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_step_recognized() {
        assert_eq!(progress_step("pending"), 1);
        assert_eq!(progress_step("processing"), 2);
        assert_eq!(progress_step("shipped"), 3);
        assert_eq!(progress_step("completed"), 4);
    }

    #[test]
    fn test_progress_step_unrecognized() {
        assert_eq!(progress_step("unknown"), 0);
        assert_eq!(progress_step(""), 0);
        // Matching is exact; no case folding.
        assert_eq!(progress_step("Shipped"), 0);
    }

    #[test]
    fn test_display_round_trips() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Completed,
        ] {
            let parsed: OrderStatus = status.to_string().parse().expect("round trip");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }
}

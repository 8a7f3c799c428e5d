//! Incentive Ledger Entry
//!
//! Derived aggregate keyed by (staff, date): the count of staff-attributed
//! reservations on that date, scaled to a currency reward. An entry with a
//! non-positive count is never persisted; "entry absent" and "count zero"
//! are equivalent.

use serde::{Deserialize, Serialize};

/// Reward per booked reservation (JPY)
pub const REWARD_PER_RESERVATION: i64 = 1000;

/// One ledger entry for (staff, date)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncentiveEntry {
    /// Staff member the reservations are attributed to
    pub staff: String,
    /// Reservation date (YYYY-MM-DD)
    pub date: String,
    /// Number of contributing reservations (always >= 1 when persisted)
    pub count: i64,
    /// count * REWARD_PER_RESERVATION, maintained on every adjustment
    pub amount: i64,
    pub updated_at: i64,
}

impl IncentiveEntry {
    pub fn new(staff: impl Into<String>, date: impl Into<String>, count: i64) -> Self {
        Self {
            staff: staff.into(),
            date: date.into(),
            count,
            amount: count * REWARD_PER_RESERVATION,
            updated_at: crate::util::now_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_derived_from_count() {
        let e = IncentiveEntry::new("佐藤", "2025-10-27", 2);
        assert_eq!(e.amount, 2 * REWARD_PER_RESERVATION);
        assert_eq!(e.amount, 2000);
    }
}

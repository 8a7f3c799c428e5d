//! Incentive Ledger (インセンティブ台帳)
//!
//! Derived aggregate over the reservation store, keyed by (staff, date).
//! Every staff-attributed reservation contributes exactly one unit; the
//! ledger never stores a zero or negative count. All mutations go through
//! the `adjust` primitive, so the amount column is always count * 1000.

use shared::models::IncentiveEntry;

use crate::db::{StorageResult, StudioStorage};

#[derive(Clone)]
pub struct IncentiveLedger {
    storage: StudioStorage,
}

impl IncentiveLedger {
    pub fn new(storage: StudioStorage) -> Self {
        Self { storage }
    }

    /// Apply a count delta to the (staff, date) entry.
    ///
    /// The read-modify-write happens inside a single write transaction;
    /// redb serializes writers, so concurrent adjustments of the same key
    /// cannot lose updates. Returns the persisted entry, `None` when the
    /// adjustment resolved to an absent entry.
    pub fn adjust(
        &self,
        staff: &str,
        date: &str,
        delta: i64,
    ) -> StorageResult<Option<IncentiveEntry>> {
        let txn = self.storage.begin_write()?;
        let entry = self.storage.adjust_incentive_in(&txn, staff, date, delta)?;
        txn.commit()?;
        Ok(entry)
    }

    /// Move one unit from the old (staff, date) key to the new one.
    ///
    /// Both sides commit in the same transaction: the decrement and the
    /// increment are never observed half-applied, even across a crash.
    pub fn move_unit(
        &self,
        from_staff: &str,
        from_date: &str,
        to_staff: &str,
        to_date: &str,
    ) -> StorageResult<()> {
        if from_staff == to_staff && from_date == to_date {
            return Ok(());
        }
        let txn = self.storage.begin_write()?;
        self.storage
            .adjust_incentive_in(&txn, from_staff, from_date, -1)?;
        self.storage
            .adjust_incentive_in(&txn, to_staff, to_date, 1)?;
        txn.commit()?;
        Ok(())
    }

    pub fn get(&self, staff: &str, date: &str) -> StorageResult<Option<IncentiveEntry>> {
        self.storage.get_incentive(staff, date)
    }

    /// List entries, optionally restricted to a month ("YYYY-MM")
    pub fn list(&self, month: Option<&str>) -> StorageResult<Vec<IncentiveEntry>> {
        let mut entries = self.storage.list_incentives()?;
        if let Some(month) = month {
            entries.retain(|e| e.date.starts_with(month));
        }
        Ok(entries)
    }

    /// Rebuild the whole ledger from the reservation store.
    ///
    /// Clears every entry, then replays one unit per staff-attributed
    /// reservation, all in one transaction. Returns the number of entries
    /// after the rebuild.
    pub fn rebuild(&self) -> StorageResult<usize> {
        let reservations = self.storage.list_reservations()?;
        let txn = self.storage.begin_write()?;
        self.storage.clear_incentives_in(&txn)?;
        for r in &reservations {
            if let Some(staff) = r.staff_in_charge.as_deref() {
                if !staff.is_empty() {
                    self.storage.adjust_incentive_in(&txn, staff, &r.date, 1)?;
                }
            }
        }
        txn.commit()?;
        Ok(self.storage.list_incentives()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{
        DeliveryStatus, PaymentStatus, Reservation, ReservationStatus, REWARD_PER_RESERVATION,
    };
    use shared::util::now_millis;

    fn ledger() -> (StudioStorage, IncentiveLedger) {
        let storage = StudioStorage::open_in_memory().unwrap();
        let ledger = IncentiveLedger::new(storage.clone());
        (storage, ledger)
    }

    fn reservation(id: &str, staff: Option<&str>, date: &str) -> Reservation {
        let now = now_millis();
        Reservation {
            id: id.into(),
            date: date.into(),
            time_slot: None,
            duration_minutes: None,
            customer_id: "c1".into(),
            mold_count: 1,
            payment_status: PaymentStatus::default(),
            reservation_status: ReservationStatus::default(),
            location: None,
            staff_in_charge: staff.map(Into::into),
            delivery_status: DeliveryStatus::default(),
            delivery_method: None,
            scheduled_delivery_date: None,
            actual_delivery_date: None,
            engraving_text: None,
            engraving_font: None,
            note: None,
            created_by: None,
            legacy_parent_name: None,
            legacy_child_name: None,
            legacy_age: None,
            legacy_age_months: None,
            legacy_phone: None,
            legacy_address: None,
            legacy_line_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_adjust_worked_example() {
        // 佐藤 / 2025-10-27: count 1 -> 2 -> 1 -> absent
        let (_, ledger) = ledger();

        let e = ledger.adjust("佐藤", "2025-10-27", 1).unwrap().unwrap();
        assert_eq!((e.count, e.amount), (1, 1000));

        let e = ledger.adjust("佐藤", "2025-10-27", 1).unwrap().unwrap();
        assert_eq!((e.count, e.amount), (2, 2000));

        let e = ledger.adjust("佐藤", "2025-10-27", -1).unwrap().unwrap();
        assert_eq!((e.count, e.amount), (1, 1000));

        assert!(ledger.adjust("佐藤", "2025-10-27", -1).unwrap().is_none());
        assert!(ledger.get("佐藤", "2025-10-27").unwrap().is_none());
    }

    #[test]
    fn test_decrement_absent_entry_stays_absent() {
        let (_, ledger) = ledger();
        assert!(ledger.adjust("佐藤", "2025-10-27", -1).unwrap().is_none());
        assert!(ledger.list(None).unwrap().is_empty());
    }

    #[test]
    fn test_move_unit() {
        let (_, ledger) = ledger();
        ledger.adjust("佐藤", "2025-10-27", 1).unwrap();
        ledger.adjust("佐藤", "2025-10-27", 1).unwrap();

        ledger
            .move_unit("佐藤", "2025-10-27", "鈴木", "2025-10-28")
            .unwrap();

        let from = ledger.get("佐藤", "2025-10-27").unwrap().unwrap();
        assert_eq!(from.count, 1);
        let to = ledger.get("鈴木", "2025-10-28").unwrap().unwrap();
        assert_eq!(to.count, 1);
    }

    #[test]
    fn test_move_unit_same_key_is_noop() {
        let (_, ledger) = ledger();
        ledger.adjust("佐藤", "2025-10-27", 1).unwrap();
        ledger
            .move_unit("佐藤", "2025-10-27", "佐藤", "2025-10-27")
            .unwrap();
        let e = ledger.get("佐藤", "2025-10-27").unwrap().unwrap();
        assert_eq!(e.count, 1);
    }

    #[test]
    fn test_list_month_filter() {
        let (_, ledger) = ledger();
        ledger.adjust("佐藤", "2025-10-27", 1).unwrap();
        ledger.adjust("佐藤", "2025-11-02", 1).unwrap();
        ledger.adjust("鈴木", "2025-10-05", 1).unwrap();

        let october = ledger.list(Some("2025-10")).unwrap();
        assert_eq!(october.len(), 2);
        assert!(october.iter().all(|e| e.date.starts_with("2025-10")));

        assert_eq!(ledger.list(None).unwrap().len(), 3);
    }

    #[test]
    fn test_rebuild_from_reservation_store() {
        let (storage, ledger) = ledger();

        storage
            .put_reservation(&reservation("r1", Some("佐藤"), "2025-10-27"))
            .unwrap();
        storage
            .put_reservation(&reservation("r2", Some("佐藤"), "2025-10-27"))
            .unwrap();
        storage
            .put_reservation(&reservation("r3", Some("鈴木"), "2025-10-28"))
            .unwrap();
        // No staff attribution, contributes nothing
        storage
            .put_reservation(&reservation("r4", None, "2025-10-28"))
            .unwrap();

        // Seed a stale entry the rebuild must discard
        ledger.adjust("田中", "2025-01-01", 5).unwrap();

        let n = ledger.rebuild().unwrap();
        assert_eq!(n, 2);

        let sato = ledger.get("佐藤", "2025-10-27").unwrap().unwrap();
        assert_eq!(sato.count, 2);
        assert_eq!(sato.amount, 2 * REWARD_PER_RESERVATION);
        assert_eq!(ledger.get("鈴木", "2025-10-28").unwrap().unwrap().count, 1);
        assert!(ledger.get("田中", "2025-01-01").unwrap().is_none());
    }
}

//! Reservation Lifecycle Engine
//!
//! Create / Update / Delete over the reservation store, keeping the
//! customer registry and the incentive ledger consistent as side effects:
//!
//! - personal fields on a payload are merged into the registry, never
//!   stored on the reservation
//! - every staff-attributed reservation carries exactly one ledger unit;
//!   attribution changes move that unit atomically
//!
//! A ledger failure after the primary write has committed is reported as
//! a non-fatal warning (degraded success), never as a failed request.

use chrono::NaiveDate;
use shared::models::{
    Reservation, ReservationCreate, ReservationUpdate, ReservationWithCustomer,
};
use shared::util::{now_millis, record_id};
use shared::{AppError, AppResult};

use crate::customers::CustomerRegistry;
use crate::db::StudioStorage;
use crate::reservations::ledger::IncentiveLedger;

/// Result of a lifecycle operation: the affected reservation joined with
/// its customer, plus an optional degraded-success warning.
#[derive(Debug)]
pub struct EngineOutcome {
    pub reservation: ReservationWithCustomer,
    pub ledger_warning: Option<String>,
}

/// List filters; all optional, combined with AND
#[derive(Debug, Default, Clone)]
pub struct ReservationFilter {
    pub date: Option<String>,
    /// Month prefix, "YYYY-MM"
    pub month: Option<String>,
    pub customer_id: Option<String>,
    pub staff: Option<String>,
}

#[derive(Clone)]
pub struct ReservationEngine {
    storage: StudioStorage,
    registry: CustomerRegistry,
    ledger: IncentiveLedger,
}

impl ReservationEngine {
    pub fn new(storage: StudioStorage) -> Self {
        Self {
            registry: CustomerRegistry::new(storage.clone()),
            ledger: IncentiveLedger::new(storage.clone()),
            storage,
        }
    }

    pub fn registry(&self) -> &CustomerRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &IncentiveLedger {
        &self.ledger
    }

    /// Create a reservation.
    ///
    /// Personal fields are routed into the customer registry; the stored
    /// reservation only carries the `customer_id` reference. Requires
    /// either a resolvable `customer_id` or enough identity (a parent or
    /// child name) to create a registry record.
    pub fn create(
        &self,
        input: ReservationCreate,
        created_by: Option<String>,
    ) -> AppResult<EngineOutcome> {
        validate_date(&input.date)?;
        let mold_count = input.mold_count.unwrap_or(1);
        if mold_count < 1 {
            return Err(AppError::validation("mold_count must be at least 1"));
        }

        let patch = input.personal_patch();
        let customer = match input.customer_id.as_deref() {
            Some(id) => {
                let existing = self.registry.find(id)?;
                if existing.is_none() && !patch.has_identity() {
                    return Err(AppError::customer_not_found(id));
                }
                self.registry.upsert(Some(id), &patch)?
            }
            None => {
                if !patch.has_identity() {
                    return Err(
                        AppError::validation("parent_name or child_name is required")
                            .with_detail("field", "parent_name"),
                    );
                }
                self.registry.upsert(None, &patch)?
            }
        };

        let now = now_millis();
        let reservation = Reservation {
            id: record_id(),
            date: input.date,
            time_slot: input.time_slot,
            duration_minutes: input.duration_minutes,
            customer_id: customer.customer_id.clone(),
            mold_count,
            payment_status: input.payment_status.unwrap_or_default(),
            reservation_status: input.reservation_status.unwrap_or_default(),
            location: input.location,
            staff_in_charge: input.staff_in_charge,
            delivery_status: input.delivery_status.unwrap_or_default(),
            delivery_method: input.delivery_method,
            scheduled_delivery_date: input.scheduled_delivery_date,
            actual_delivery_date: None,
            engraving_text: input.engraving_text,
            engraving_font: input.engraving_font,
            note: input.note,
            created_by,
            legacy_parent_name: None,
            legacy_child_name: None,
            legacy_age: None,
            legacy_age_months: None,
            legacy_phone: None,
            legacy_address: None,
            legacy_line_url: None,
            created_at: now,
            updated_at: now,
        };
        self.storage.put_reservation(&reservation)?;

        let mut warning = None;
        if let Some(staff) = attributed_staff(&reservation) {
            if let Err(err) = self.ledger.adjust(staff, &reservation.date, 1) {
                warning = Some(ledger_warning(&err));
            }
        }

        Ok(EngineOutcome {
            reservation: ReservationWithCustomer {
                reservation,
                customer: Some(customer),
            },
            ledger_warning: warning,
        })
    }

    /// Update a reservation with field-by-field merge semantics.
    ///
    /// When the (staff, date) attribution key changes, the ledger unit is
    /// moved from the old key to the new key in one transaction.
    pub fn update(&self, id: &str, patch: ReservationUpdate) -> AppResult<EngineOutcome> {
        let mut reservation = self
            .storage
            .get_reservation(id)?
            .ok_or_else(|| AppError::reservation_not_found(id))?;

        if let Some(date) = patch.date.as_deref() {
            validate_date(date)?;
        }
        if patch.mold_count == Some(0) {
            return Err(AppError::validation("mold_count must be at least 1"));
        }

        let old_key = attributed_staff(&reservation)
            .map(|s| (s.to_string(), reservation.date.clone()));

        patch.apply_to(&mut reservation);
        reservation.updated_at = now_millis();

        if patch.has_personal_fields() {
            self.registry
                .upsert(Some(&reservation.customer_id), &patch.personal_patch())?;
        }

        self.storage.put_reservation(&reservation)?;

        let new_key = attributed_staff(&reservation)
            .map(|s| (s.to_string(), reservation.date.clone()));

        let mut warning = None;
        let result = match (&old_key, &new_key) {
            (Some(old), Some(new)) if old != new => {
                self.ledger.move_unit(&old.0, &old.1, &new.0, &new.1)
            }
            (None, Some(new)) => self.ledger.adjust(&new.0, &new.1, 1).map(|_| ()),
            (Some(old), None) => self.ledger.adjust(&old.0, &old.1, -1).map(|_| ()),
            _ => Ok(()),
        };
        if let Err(err) = result {
            warning = Some(ledger_warning(&err));
        }

        let customer = self.registry.find(&reservation.customer_id)?;
        Ok(EngineOutcome {
            reservation: ReservationWithCustomer {
                reservation,
                customer,
            },
            ledger_warning: warning,
        })
    }

    /// Delete a reservation, releasing its ledger unit first.
    ///
    /// Never touches the customer registry. Returns a warning when the
    /// ledger decrement failed.
    pub fn delete(&self, id: &str) -> AppResult<Option<String>> {
        let reservation = self
            .storage
            .get_reservation(id)?
            .ok_or_else(|| AppError::reservation_not_found(id))?;

        let mut warning = None;
        if let Some(staff) = attributed_staff(&reservation) {
            if let Err(err) = self.ledger.adjust(staff, &reservation.date, -1) {
                warning = Some(ledger_warning(&err));
            }
        }
        self.storage.remove_reservation(id)?;
        Ok(warning)
    }

    /// Advance the payment status one step along its fixed cycle
    pub fn advance_payment(&self, id: &str) -> AppResult<ReservationWithCustomer> {
        self.mutate(id, |r| r.payment_status = r.payment_status.advanced())
    }

    /// Advance the delivery status one step along its fixed cycle
    pub fn advance_delivery(&self, id: &str) -> AppResult<ReservationWithCustomer> {
        self.mutate(id, |r| r.delivery_status = r.delivery_status.advanced())
    }

    fn mutate(
        &self,
        id: &str,
        f: impl FnOnce(&mut Reservation),
    ) -> AppResult<ReservationWithCustomer> {
        let mut reservation = self
            .storage
            .get_reservation(id)?
            .ok_or_else(|| AppError::reservation_not_found(id))?;
        f(&mut reservation);
        reservation.updated_at = now_millis();
        self.storage.put_reservation(&reservation)?;
        let customer = self.registry.find(&reservation.customer_id)?;
        Ok(ReservationWithCustomer {
            reservation,
            customer,
        })
    }

    pub fn get(&self, id: &str) -> AppResult<ReservationWithCustomer> {
        let reservation = self
            .storage
            .get_reservation(id)?
            .ok_or_else(|| AppError::reservation_not_found(id))?;
        let customer = self.registry.find(&reservation.customer_id)?;
        Ok(ReservationWithCustomer {
            reservation,
            customer,
        })
    }

    pub fn list(&self, filter: &ReservationFilter) -> AppResult<Vec<ReservationWithCustomer>> {
        let mut reservations = self.storage.list_reservations()?;
        if let Some(date) = filter.date.as_deref() {
            reservations.retain(|r| r.date == date);
        }
        if let Some(month) = filter.month.as_deref() {
            reservations.retain(|r| r.date.starts_with(month));
        }
        if let Some(customer_id) = filter.customer_id.as_deref() {
            reservations.retain(|r| r.customer_id == customer_id);
        }
        if let Some(staff) = filter.staff.as_deref() {
            reservations.retain(|r| r.staff_in_charge.as_deref() == Some(staff));
        }
        reservations.sort_by(|a, b| {
            (&a.date, &a.time_slot, &a.created_at).cmp(&(&b.date, &b.time_slot, &b.created_at))
        });

        reservations
            .into_iter()
            .map(|r| {
                let customer = self.registry.find(&r.customer_id)?;
                Ok(ReservationWithCustomer {
                    reservation: r,
                    customer,
                })
            })
            .collect()
    }
}

/// Staff the reservation is attributed to, empty string counting as none
fn attributed_staff(r: &Reservation) -> Option<&str> {
    r.staff_in_charge.as_deref().filter(|s| !s.is_empty())
}

fn validate_date(date: &str) -> AppResult<()> {
    if date.is_empty() {
        return Err(AppError::validation("date is required").with_detail("field", "date"));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!("Invalid date: {}", date)).with_detail("field", "date")
    })?;
    Ok(())
}

fn ledger_warning(err: &crate::db::StorageError) -> String {
    tracing::warn!(error = %err, "incentive ledger adjustment failed");
    format!(
        "{}: {}",
        shared::ErrorCode::LedgerInconsistency.message(),
        err
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;
    use shared::models::PaymentStatus;

    fn engine() -> ReservationEngine {
        ReservationEngine::new(StudioStorage::open_in_memory().unwrap())
    }

    fn create_input(staff: Option<&str>, date: &str) -> ReservationCreate {
        ReservationCreate {
            date: date.into(),
            parent_name: Some("山田花子".into()),
            staff_in_charge: staff.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_requires_valid_date() {
        let engine = engine();
        let err = engine
            .create(create_input(None, "2025/10/27"), None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = engine.create(create_input(None, ""), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_create_requires_identity_or_existing_customer() {
        let engine = engine();
        let input = ReservationCreate {
            date: "2025-10-27".into(),
            ..Default::default()
        };
        let err = engine.create(input, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        // Unknown customer_id with no identity fields is rejected too
        let input = ReservationCreate {
            date: "2025-10-27".into(),
            customer_id: Some("ghost".into()),
            ..Default::default()
        };
        let err = engine.create(input, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::CustomerNotFound);
    }

    #[test]
    fn test_create_routes_personal_fields_to_registry() {
        let engine = engine();
        let input = ReservationCreate {
            date: "2025-10-27".into(),
            parent_name: Some("山田花子".into()),
            child_name: Some("太郎".into()),
            phone: Some("090-1234-5678".into()),
            ..Default::default()
        };
        let outcome = engine.create(input, Some("sato".into())).unwrap();
        let r = &outcome.reservation.reservation;

        // Reservation carries only the reference
        assert!(!r.has_legacy_personal_fields());
        let customer = outcome.reservation.customer.as_ref().unwrap();
        assert_eq!(customer.parent_name, "山田花子");
        assert_eq!(customer.phone, "090-1234-5678");
        assert_eq!(r.customer_id, customer.customer_id);
        assert_eq!(r.created_by.as_deref(), Some("sato"));
        assert_eq!(r.mold_count, 1);
    }

    #[test]
    fn test_create_and_delete_ledger_symmetry() {
        let engine = engine();
        let outcome = engine
            .create(create_input(Some("佐藤"), "2025-10-27"), None)
            .unwrap();
        assert!(outcome.ledger_warning.is_none());

        let entry = engine.ledger().get("佐藤", "2025-10-27").unwrap().unwrap();
        assert_eq!((entry.count, entry.amount), (1, 1000));

        engine.delete(&outcome.reservation.reservation.id).unwrap();
        assert!(engine.ledger().get("佐藤", "2025-10-27").unwrap().is_none());
    }

    #[test]
    fn test_create_without_staff_leaves_ledger_empty() {
        let engine = engine();
        engine.create(create_input(None, "2025-10-27"), None).unwrap();
        assert!(engine.ledger().list(None).unwrap().is_empty());
    }

    #[test]
    fn test_update_moves_ledger_unit_on_reassignment() {
        let engine = engine();
        let id = engine
            .create(create_input(Some("佐藤"), "2025-10-27"), None)
            .unwrap()
            .reservation
            .reservation
            .id;

        // Reassign staff and date together; one unit moves key
        let patch = ReservationUpdate {
            staff_in_charge: Some("鈴木".into()),
            date: Some("2025-10-28".into()),
            ..Default::default()
        };
        let outcome = engine.update(&id, patch).unwrap();
        assert!(outcome.ledger_warning.is_none());

        assert!(engine.ledger().get("佐藤", "2025-10-27").unwrap().is_none());
        let entry = engine.ledger().get("鈴木", "2025-10-28").unwrap().unwrap();
        assert_eq!(entry.count, 1);
    }

    #[test]
    fn test_update_gains_attribution() {
        let engine = engine();
        let id = engine
            .create(create_input(None, "2025-10-27"), None)
            .unwrap()
            .reservation
            .reservation
            .id;

        let patch = ReservationUpdate {
            staff_in_charge: Some("佐藤".into()),
            ..Default::default()
        };
        engine.update(&id, patch).unwrap();
        assert_eq!(
            engine.ledger().get("佐藤", "2025-10-27").unwrap().unwrap().count,
            1
        );
    }

    #[test]
    fn test_update_empty_patch_only_bumps_updated_at() {
        let engine = engine();
        let created = engine
            .create(create_input(Some("佐藤"), "2025-10-27"), None)
            .unwrap()
            .reservation
            .reservation;

        let outcome = engine
            .update(&created.id, ReservationUpdate::default())
            .unwrap();
        let updated = outcome.reservation.reservation;

        assert_eq!(updated.date, created.date);
        assert_eq!(updated.staff_in_charge, created.staff_in_charge);
        assert_eq!(updated.mold_count, created.mold_count);
        // Ledger untouched
        assert_eq!(
            engine.ledger().get("佐藤", "2025-10-27").unwrap().unwrap().count,
            1
        );
    }

    #[test]
    fn test_update_personal_fields_merge_into_registry() {
        let engine = engine();
        let outcome = engine
            .create(create_input(None, "2025-10-27"), None)
            .unwrap();
        let id = outcome.reservation.reservation.id.clone();
        let customer_id = outcome.reservation.reservation.customer_id.clone();

        let patch = ReservationUpdate {
            phone: Some("090-9999-8888".into()),
            ..Default::default()
        };
        engine.update(&id, patch).unwrap();

        let customer = engine.registry().get(&customer_id).unwrap();
        assert_eq!(customer.phone, "090-9999-8888");
        // Identity set at creation survives the merge
        assert_eq!(customer.parent_name, "山田花子");
    }

    #[test]
    fn test_delete_missing_reservation() {
        let engine = engine();
        let err = engine.delete("nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
    }

    #[test]
    fn test_delete_never_touches_registry() {
        let engine = engine();
        let outcome = engine
            .create(create_input(Some("佐藤"), "2025-10-27"), None)
            .unwrap();
        let customer_id = outcome.reservation.reservation.customer_id.clone();

        engine.delete(&outcome.reservation.reservation.id).unwrap();
        assert!(engine.registry().get(&customer_id).is_ok());
    }

    #[test]
    fn test_advance_payment_cycle() {
        let engine = engine();
        let id = engine
            .create(create_input(None, "2025-10-27"), None)
            .unwrap()
            .reservation
            .reservation
            .id;

        // Default unpaid -> pending -> paid -> unpaid
        let r = engine.advance_payment(&id).unwrap();
        assert_eq!(r.reservation.payment_status, PaymentStatus::Pending);
        let r = engine.advance_payment(&id).unwrap();
        assert_eq!(r.reservation.payment_status, PaymentStatus::Paid);
        let r = engine.advance_payment(&id).unwrap();
        assert_eq!(r.reservation.payment_status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_list_filters() {
        let engine = engine();
        engine
            .create(create_input(Some("佐藤"), "2025-10-27"), None)
            .unwrap();
        engine
            .create(create_input(Some("鈴木"), "2025-10-28"), None)
            .unwrap();
        engine
            .create(create_input(Some("佐藤"), "2025-11-01"), None)
            .unwrap();

        let filter = ReservationFilter {
            staff: Some("佐藤".into()),
            ..Default::default()
        };
        assert_eq!(engine.list(&filter).unwrap().len(), 2);

        let filter = ReservationFilter {
            month: Some("2025-10".into()),
            ..Default::default()
        };
        assert_eq!(engine.list(&filter).unwrap().len(), 2);

        let filter = ReservationFilter {
            date: Some("2025-10-28".into()),
            ..Default::default()
        };
        let rows = engine.list(&filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].reservation.staff_in_charge.as_deref(),
            Some("鈴木")
        );
    }

    #[test]
    fn test_dangling_customer_reads_as_none() {
        let engine = engine();
        let outcome = engine
            .create(create_input(None, "2025-10-27"), None)
            .unwrap();
        let id = outcome.reservation.reservation.id.clone();
        let customer_id = outcome.reservation.reservation.customer_id.clone();

        engine.registry().delete(&customer_id).unwrap();
        let fetched = engine.get(&id).unwrap();
        assert!(fetched.customer.is_none());
    }
}

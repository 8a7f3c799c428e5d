//! Legacy Data Migration (旧データ移行)
//!
//! Older reservation records embedded the customer's personal fields
//! directly. The batch extracts those fields into the customer registry,
//! links the reservation via `customer_id`, and strips the embedded copy.
//! A registry record that already exists for the id is left untouched:
//! the embedded snapshot predates anything written through the registry,
//! so it must never flow back over it. Running the batch again is a
//! no-op: a record without legacy fields is skipped. Failures are
//! collected per record; one bad record never aborts the batch.

use serde::{Deserialize, Serialize};
use shared::AppResult;
use shared::models::{CustomerUpsert, Reservation};

use crate::customers::CustomerRegistry;
use crate::db::StudioStorage;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Registry records created (existing records are never written)
    pub customers_migrated: usize,
    /// Reservations stripped of embedded personal fields
    pub reservations_updated: usize,
    /// Per-record failures, "reservation <id>: <reason>"
    pub errors: Vec<String>,
}

pub struct CustomerMigration {
    storage: StudioStorage,
    registry: CustomerRegistry,
}

impl CustomerMigration {
    pub fn new(storage: StudioStorage) -> Self {
        Self {
            registry: CustomerRegistry::new(storage.clone()),
            storage,
        }
    }

    /// Run the batch over every reservation in the store
    pub fn run(&self) -> AppResult<MigrationReport> {
        let mut report = MigrationReport::default();
        for reservation in self.storage.list_reservations()? {
            if !reservation.has_legacy_personal_fields() {
                continue;
            }
            match self.migrate_one(reservation.clone()) {
                Ok(created) => {
                    if created {
                        report.customers_migrated += 1;
                    }
                    report.reservations_updated += 1;
                }
                Err(err) => {
                    tracing::warn!(id = %reservation.id, error = %err, "migration failed for record");
                    report
                        .errors
                        .push(format!("reservation {}: {}", reservation.id, err));
                }
            }
        }
        tracing::info!(
            customers = report.customers_migrated,
            reservations = report.reservations_updated,
            errors = report.errors.len(),
            "customer migration finished"
        );
        Ok(report)
    }

    /// Migrate one reservation; returns whether a registry record was
    /// created. When a record already exists for the id, only the
    /// reservation is relinked and stripped.
    fn migrate_one(&self, mut reservation: Reservation) -> AppResult<bool> {
        let existing_id = Some(reservation.customer_id.as_str()).filter(|id| !id.is_empty());
        let (customer_id, created) = match existing_id {
            Some(id) => match self.registry.find(id)? {
                Some(existing) => (existing.customer_id, false),
                None => {
                    let customer = self.registry.upsert(Some(id), &legacy_patch(&reservation))?;
                    (customer.customer_id, true)
                }
            },
            None => {
                let customer = self.registry.upsert(None, &legacy_patch(&reservation))?;
                (customer.customer_id, true)
            }
        };

        reservation.customer_id = customer_id;
        reservation.strip_legacy_personal_fields();
        reservation.updated_at = shared::util::now_millis();
        self.storage.put_reservation(&reservation)?;
        Ok(created)
    }
}

fn legacy_patch(r: &Reservation) -> CustomerUpsert {
    CustomerUpsert {
        parent_name: r.legacy_parent_name.clone(),
        child_name: r.legacy_child_name.clone(),
        age: r.legacy_age,
        age_months: r.legacy_age_months,
        phone: r.legacy_phone.clone(),
        address: r.legacy_address.clone(),
        line_url: r.legacy_line_url.clone(),
        note: None,
        payment_status: None,
        reservation_status: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{DeliveryStatus, PaymentStatus, ReservationStatus};
    use shared::util::now_millis;

    fn legacy_reservation(id: &str, customer_id: &str, parent: &str) -> Reservation {
        let now = now_millis();
        Reservation {
            id: id.into(),
            date: "2025-10-27".into(),
            time_slot: None,
            duration_minutes: None,
            customer_id: customer_id.into(),
            mold_count: 1,
            payment_status: PaymentStatus::default(),
            reservation_status: ReservationStatus::default(),
            location: None,
            staff_in_charge: None,
            delivery_status: DeliveryStatus::default(),
            delivery_method: None,
            scheduled_delivery_date: None,
            actual_delivery_date: None,
            engraving_text: None,
            engraving_font: None,
            note: None,
            created_by: None,
            legacy_parent_name: Some(parent.into()),
            legacy_child_name: Some("太郎".into()),
            legacy_age: Some(0),
            legacy_age_months: Some(6),
            legacy_phone: Some("090-1234-5678".into()),
            legacy_address: None,
            legacy_line_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_migration_extracts_and_strips() {
        let storage = StudioStorage::open_in_memory().unwrap();
        storage
            .put_reservation(&legacy_reservation("r1", "", "山田花子"))
            .unwrap();

        let migration = CustomerMigration::new(storage.clone());
        let report = migration.run().unwrap();
        assert_eq!(report.customers_migrated, 1);
        assert_eq!(report.reservations_updated, 1);
        assert!(report.errors.is_empty());

        let migrated = storage.get_reservation("r1").unwrap().unwrap();
        assert!(!migrated.has_legacy_personal_fields());
        assert!(!migrated.customer_id.is_empty());

        let customer = storage
            .get_customer(&migrated.customer_id)
            .unwrap()
            .unwrap();
        assert_eq!(customer.parent_name, "山田花子");
        assert_eq!(customer.age_months, 6);
    }

    #[test]
    fn test_migration_never_overwrites_existing_customer() {
        let storage = StudioStorage::open_in_memory().unwrap();
        let registry = CustomerRegistry::new(storage.clone());
        // Registry record updated after the legacy snapshot was written
        registry
            .upsert(
                Some("c1"),
                &CustomerUpsert {
                    parent_name: Some("新姓 花子".into()),
                    note: Some("午前希望".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        storage
            .put_reservation(&legacy_reservation("r1", "c1", "旧姓 花子"))
            .unwrap();

        let report = CustomerMigration::new(storage.clone()).run().unwrap();

        // The stale embedded snapshot must not flow back into the registry
        let customer = storage.get_customer("c1").unwrap().unwrap();
        assert_eq!(customer.parent_name, "新姓 花子");
        assert_eq!(customer.note, "午前希望");
        assert_eq!(customer.phone, "");

        // The reservation is still stripped and relinked
        assert_eq!(report.customers_migrated, 0);
        assert_eq!(report.reservations_updated, 1);
        let migrated = storage.get_reservation("r1").unwrap().unwrap();
        assert!(!migrated.has_legacy_personal_fields());
        assert_eq!(migrated.customer_id, "c1");
    }

    #[test]
    fn test_migration_creates_record_for_unknown_id() {
        let storage = StudioStorage::open_in_memory().unwrap();
        storage
            .put_reservation(&legacy_reservation("r1", "c9", "山田花子"))
            .unwrap();

        let report = CustomerMigration::new(storage.clone()).run().unwrap();
        assert_eq!(report.customers_migrated, 1);

        let customer = storage.get_customer("c9").unwrap().unwrap();
        assert_eq!(customer.parent_name, "山田花子");
    }

    #[test]
    fn test_migration_is_idempotent() {
        let storage = StudioStorage::open_in_memory().unwrap();
        storage
            .put_reservation(&legacy_reservation("r1", "", "山田花子"))
            .unwrap();

        let migration = CustomerMigration::new(storage.clone());
        migration.run().unwrap();
        let customers_after_first = storage.list_customers().unwrap().len();

        let second = migration.run().unwrap();
        assert_eq!(second.customers_migrated, 0);
        assert_eq!(second.reservations_updated, 0);
        assert_eq!(storage.list_customers().unwrap().len(), customers_after_first);
    }

    #[test]
    fn test_clean_records_are_skipped() {
        let storage = StudioStorage::open_in_memory().unwrap();
        let mut clean = legacy_reservation("r1", "c1", "x");
        clean.strip_legacy_personal_fields();
        storage.put_reservation(&clean).unwrap();

        let report = CustomerMigration::new(storage).run().unwrap();
        assert_eq!(report.customers_migrated, 0);
    }
}

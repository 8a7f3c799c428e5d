//! Reservation Model
//!
//! One scheduled appointment instance, referencing a customer by
//! `customer_id` and attributed to a staff member. Three independent
//! status axes (payment, confirmation, delivery), each with its own
//! fixed transition cycle.

use serde::{Deserialize, Serialize};

use crate::util::merge_field;

use super::customer::Customer;

/// Payment status axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    Pending,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Unpaid
    }
}

impl PaymentStatus {
    /// Advance through the fixed cycle: paid → unpaid → pending → paid
    pub fn advanced(self) -> Self {
        match self {
            Self::Paid => Self::Unpaid,
            Self::Unpaid => Self::Pending,
            Self::Pending => Self::Paid,
        }
    }
}

/// Confirmation status axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Standby,
    Confirmed,
}

impl Default for ReservationStatus {
    fn default() -> Self {
        Self::Standby
    }
}

/// Delivery status axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Shipped,
    Completed,
}

impl Default for DeliveryStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl DeliveryStatus {
    /// Advance through the fixed cycle: pending → shipped → completed → pending
    pub fn advanced(self) -> Self {
        match self {
            Self::Pending => Self::Shipped,
            Self::Shipped => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }
}

/// Reservation record
///
/// Personal data lives in the customer registry; a reservation only
/// references it via `customer_id`. The `legacy_*` fields remain solely
/// so records written before the registry existed still deserialize;
/// the migration batch strips them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    /// Appointment date (YYYY-MM-DD)
    pub date: String,
    /// Time slot, e.g. "10:00"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    /// Duration in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    /// Customer reference (required)
    pub customer_id: String,
    /// Number of molds to produce
    pub mold_count: u32,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub reservation_status: ReservationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Staff member the reservation is attributed to (incentive ledger key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_in_charge: Option<String>,
    #[serde(default)]
    pub delivery_status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_delivery_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_delivery_date: Option<String>,
    /// 刻印テキスト
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engraving_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engraving_font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    // ==================== Legacy embedded personal fields ====================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_parent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_child_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_age_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_line_url: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,
}

impl Reservation {
    /// Whether this record still carries legacy embedded personal fields
    pub fn has_legacy_personal_fields(&self) -> bool {
        self.legacy_parent_name.is_some()
            || self.legacy_child_name.is_some()
            || self.legacy_age.is_some()
            || self.legacy_age_months.is_some()
            || self.legacy_phone.is_some()
            || self.legacy_address.is_some()
            || self.legacy_line_url.is_some()
    }

    /// Drop the legacy embedded personal fields (post-migration form)
    pub fn strip_legacy_personal_fields(&mut self) {
        self.legacy_parent_name = None;
        self.legacy_child_name = None;
        self.legacy_age = None;
        self.legacy_age_months = None;
        self.legacy_phone = None;
        self.legacy_address = None;
        self.legacy_line_url = None;
    }
}

/// Create reservation payload
///
/// Personal fields are forwarded into the customer registry, never stored
/// on the reservation itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationCreate {
    /// Appointment date (YYYY-MM-DD) - required
    pub date: String,
    pub time_slot: Option<String>,
    pub duration_minutes: Option<u32>,
    /// Existing customer reference; generated when absent
    pub customer_id: Option<String>,
    pub mold_count: Option<u32>,
    pub payment_status: Option<PaymentStatus>,
    pub reservation_status: Option<ReservationStatus>,
    pub location: Option<String>,
    pub staff_in_charge: Option<String>,
    pub delivery_status: Option<DeliveryStatus>,
    pub delivery_method: Option<String>,
    pub scheduled_delivery_date: Option<String>,
    pub engraving_text: Option<String>,
    pub engraving_font: Option<String>,
    pub note: Option<String>,

    // Personal fields (merged into the customer registry)
    pub parent_name: Option<String>,
    pub child_name: Option<String>,
    pub age: Option<u32>,
    pub age_months: Option<u32>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub line_url: Option<String>,
    pub customer_note: Option<String>,
}

impl ReservationCreate {
    /// Extract the personal fields as a registry patch
    pub fn personal_patch(&self) -> super::customer::CustomerUpsert {
        super::customer::CustomerUpsert {
            parent_name: self.parent_name.clone(),
            child_name: self.child_name.clone(),
            age: self.age,
            age_months: self.age_months,
            phone: self.phone.clone(),
            address: self.address.clone(),
            line_url: self.line_url.clone(),
            note: self.customer_note.clone(),
            payment_status: None,
            reservation_status: None,
        }
    }
}

/// Update reservation payload - field-by-field merge semantics
/// (present → overwrite, absent → retain)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdate {
    pub date: Option<String>,
    pub time_slot: Option<String>,
    pub duration_minutes: Option<u32>,
    pub customer_id: Option<String>,
    pub mold_count: Option<u32>,
    pub payment_status: Option<PaymentStatus>,
    pub reservation_status: Option<ReservationStatus>,
    pub location: Option<String>,
    pub staff_in_charge: Option<String>,
    pub delivery_status: Option<DeliveryStatus>,
    pub delivery_method: Option<String>,
    pub scheduled_delivery_date: Option<String>,
    pub actual_delivery_date: Option<String>,
    pub engraving_text: Option<String>,
    pub engraving_font: Option<String>,
    pub note: Option<String>,

    // Personal fields (merged into the customer registry)
    pub parent_name: Option<String>,
    pub child_name: Option<String>,
    pub age: Option<u32>,
    pub age_months: Option<u32>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub line_url: Option<String>,
    pub customer_note: Option<String>,
}

impl ReservationUpdate {
    /// Merge the present fields into an existing reservation.
    ///
    /// Option-typed reservation fields are overwritten with `Some(v)` when
    /// the patch carries a value and retained otherwise; a patch cannot
    /// null out a previously set field.
    pub fn apply_to(&self, r: &mut Reservation) {
        merge_field(&mut r.date, self.date.clone());
        merge_field(&mut r.customer_id, self.customer_id.clone());
        merge_field(&mut r.mold_count, self.mold_count);
        if let Some(v) = self.payment_status {
            r.payment_status = v;
        }
        if let Some(v) = self.reservation_status {
            r.reservation_status = v;
        }
        if let Some(v) = self.delivery_status {
            r.delivery_status = v;
        }
        if self.time_slot.is_some() {
            r.time_slot = self.time_slot.clone();
        }
        if self.duration_minutes.is_some() {
            r.duration_minutes = self.duration_minutes;
        }
        if self.location.is_some() {
            r.location = self.location.clone();
        }
        if self.staff_in_charge.is_some() {
            r.staff_in_charge = self.staff_in_charge.clone();
        }
        if self.delivery_method.is_some() {
            r.delivery_method = self.delivery_method.clone();
        }
        if self.scheduled_delivery_date.is_some() {
            r.scheduled_delivery_date = self.scheduled_delivery_date.clone();
        }
        if self.actual_delivery_date.is_some() {
            r.actual_delivery_date = self.actual_delivery_date.clone();
        }
        if self.engraving_text.is_some() {
            r.engraving_text = self.engraving_text.clone();
        }
        if self.engraving_font.is_some() {
            r.engraving_font = self.engraving_font.clone();
        }
        if self.note.is_some() {
            r.note = self.note.clone();
        }
    }

    /// Extract the personal fields as a registry patch
    pub fn personal_patch(&self) -> super::customer::CustomerUpsert {
        super::customer::CustomerUpsert {
            parent_name: self.parent_name.clone(),
            child_name: self.child_name.clone(),
            age: self.age,
            age_months: self.age_months,
            phone: self.phone.clone(),
            address: self.address.clone(),
            line_url: self.line_url.clone(),
            note: self.customer_note.clone(),
            payment_status: None,
            reservation_status: None,
        }
    }

    /// Whether the patch carries any personal fields for the registry
    pub fn has_personal_fields(&self) -> bool {
        self.parent_name.is_some()
            || self.child_name.is_some()
            || self.age.is_some()
            || self.age_months.is_some()
            || self.phone.is_some()
            || self.address.is_some()
            || self.line_url.is_some()
            || self.customer_note.is_some()
    }
}

/// Reservation joined with its customer for display
///
/// `customer` is `None` when the referenced record has been deleted
/// (dangling `customer_id` reads as "customer info unavailable").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationWithCustomer {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub customer: Option<Customer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_cycle() {
        assert_eq!(PaymentStatus::Paid.advanced(), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::Unpaid.advanced(), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::Pending.advanced(), PaymentStatus::Paid);
        // Three advances return to the start
        let s = PaymentStatus::Unpaid;
        assert_eq!(s.advanced().advanced().advanced(), s);
    }

    #[test]
    fn test_delivery_cycle() {
        assert_eq!(DeliveryStatus::Pending.advanced(), DeliveryStatus::Shipped);
        assert_eq!(
            DeliveryStatus::Shipped.advanced(),
            DeliveryStatus::Completed
        );
        assert_eq!(
            DeliveryStatus::Completed.advanced(),
            DeliveryStatus::Pending
        );
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Unpaid).unwrap(),
            "\"unpaid\""
        );
        assert_eq!(
            serde_json::to_string(&ReservationStatus::Standby).unwrap(),
            "\"standby\""
        );
        let s: DeliveryStatus = serde_json::from_str("\"shipped\"").unwrap();
        assert_eq!(s, DeliveryStatus::Shipped);
    }

    fn sample_reservation() -> Reservation {
        Reservation {
            id: "r1".into(),
            date: "2025-10-27".into(),
            time_slot: Some("10:00".into()),
            duration_minutes: Some(60),
            customer_id: "c1".into(),
            mold_count: 2,
            payment_status: PaymentStatus::Unpaid,
            reservation_status: ReservationStatus::Standby,
            location: Some("本店".into()),
            staff_in_charge: Some("佐藤".into()),
            delivery_status: DeliveryStatus::Pending,
            delivery_method: None,
            scheduled_delivery_date: None,
            actual_delivery_date: None,
            engraving_text: None,
            engraving_font: None,
            note: None,
            created_by: Some("admin".into()),
            legacy_parent_name: None,
            legacy_child_name: None,
            legacy_age: None,
            legacy_age_months: None,
            legacy_phone: None,
            legacy_address: None,
            legacy_line_url: None,
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let original = sample_reservation();
        let mut merged = original.clone();
        ReservationUpdate::default().apply_to(&mut merged);
        assert_eq!(
            serde_json::to_value(&original).unwrap(),
            serde_json::to_value(&merged).unwrap()
        );
    }

    #[test]
    fn test_patch_overwrites_only_present_fields() {
        let mut r = sample_reservation();
        let patch = ReservationUpdate {
            staff_in_charge: Some("鈴木".into()),
            mold_count: Some(3),
            ..Default::default()
        };
        patch.apply_to(&mut r);
        assert_eq!(r.staff_in_charge.as_deref(), Some("鈴木"));
        assert_eq!(r.mold_count, 3);
        // Untouched fields retain prior values
        assert_eq!(r.date, "2025-10-27");
        assert_eq!(r.time_slot.as_deref(), Some("10:00"));
    }

    #[test]
    fn test_legacy_field_detection_and_strip() {
        let mut r = sample_reservation();
        assert!(!r.has_legacy_personal_fields());
        r.legacy_parent_name = Some("山田花子".into());
        assert!(r.has_legacy_personal_fields());
        r.strip_legacy_personal_fields();
        assert!(!r.has_legacy_personal_fields());
    }

    #[test]
    fn test_legacy_fields_not_serialized_when_absent() {
        let r = sample_reservation();
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("legacy_parent_name"));
    }
}

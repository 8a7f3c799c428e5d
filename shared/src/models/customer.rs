//! Customer Model (顧客台帳)
//!
//! Deduplicated personal/contact record, referenced by one or more
//! reservations via `customer_id`. At most one record per `customer_id`;
//! updates use per-field last-writer-wins merge semantics.

use serde::{Deserialize, Serialize};

use crate::util::{merge_field, now_millis};

use super::reservation::PaymentStatus;

/// Customer-level reservation status (standby | confirmed | none)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerReservationStatus {
    Standby,
    Confirmed,
    None,
}

impl Default for CustomerReservationStatus {
    fn default() -> Self {
        Self::None
    }
}

/// Customer record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Stable identifier, client-supplied or generated (time+random)
    pub customer_id: String,
    /// 保護者氏名
    #[serde(default)]
    pub parent_name: String,
    /// お子様氏名
    #[serde(default)]
    pub child_name: String,
    /// Age in years
    #[serde(default)]
    pub age: u32,
    /// Age in months; consulted only when `age == 0`
    #[serde(default)]
    pub age_months: u32,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    /// LINE contact URL
    #[serde(default)]
    pub line_url: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub reservation_status: CustomerReservationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Customer {
    /// Create an empty record for the given id with creation timestamps
    pub fn empty(customer_id: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            customer_id: customer_id.into(),
            parent_name: String::new(),
            child_name: String::new(),
            age: 0,
            age_months: 0,
            phone: String::new(),
            address: String::new(),
            line_url: String::new(),
            note: String::new(),
            payment_status: PaymentStatus::default(),
            reservation_status: CustomerReservationStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Customer upsert payload - partial-merge patch
///
/// Fields present overwrite, fields absent retain the prior value.
/// Per-field last-writer-wins, never whole-record replace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpsert {
    pub parent_name: Option<String>,
    pub child_name: Option<String>,
    pub age: Option<u32>,
    pub age_months: Option<u32>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub line_url: Option<String>,
    pub note: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub reservation_status: Option<CustomerReservationStatus>,
}

impl CustomerUpsert {
    /// Merge the present fields into an existing record
    pub fn apply_to(&self, c: &mut Customer) {
        merge_field(&mut c.parent_name, self.parent_name.clone());
        merge_field(&mut c.child_name, self.child_name.clone());
        merge_field(&mut c.age, self.age);
        merge_field(&mut c.age_months, self.age_months);
        merge_field(&mut c.phone, self.phone.clone());
        merge_field(&mut c.address, self.address.clone());
        merge_field(&mut c.line_url, self.line_url.clone());
        merge_field(&mut c.note, self.note.clone());
        if let Some(v) = self.payment_status {
            c.payment_status = v;
        }
        if let Some(v) = self.reservation_status {
            c.reservation_status = v;
        }
    }

    /// Whether the patch carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.parent_name.is_none()
            && self.child_name.is_none()
            && self.age.is_none()
            && self.age_months.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.line_url.is_none()
            && self.note.is_none()
            && self.payment_status.is_none()
            && self.reservation_status.is_none()
    }

    /// Whether the patch carries an identity field (parent or child name)
    pub fn has_identity(&self) -> bool {
        self.parent_name.as_deref().is_some_and(|s| !s.is_empty())
            || self.child_name.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites_only_present_fields() {
        let mut c = Customer::empty("c1");
        c.parent_name = "山田花子".into();
        c.phone = "090-0000-0000".into();

        let patch = CustomerUpsert {
            phone: Some("090-1111-2222".into()),
            note: Some("午前希望".into()),
            ..Default::default()
        };
        patch.apply_to(&mut c);

        assert_eq!(c.phone, "090-1111-2222");
        assert_eq!(c.note, "午前希望");
        // Absent fields never revert previously-set values
        assert_eq!(c.parent_name, "山田花子");
    }

    #[test]
    fn test_merge_commutes_across_disjoint_fields() {
        let phone = CustomerUpsert {
            phone: Some("090-1234-5678".into()),
            ..Default::default()
        };
        let note = CustomerUpsert {
            note: Some("x".into()),
            ..Default::default()
        };
        let both = CustomerUpsert {
            phone: Some("090-1234-5678".into()),
            note: Some("x".into()),
            ..Default::default()
        };

        let mut a = Customer::empty("c1");
        phone.apply_to(&mut a);
        note.apply_to(&mut a);

        let mut b = Customer::empty("c1");
        both.apply_to(&mut b);

        assert_eq!(a.phone, b.phone);
        assert_eq!(a.note, b.note);
    }

    #[test]
    fn test_merge_idempotent() {
        let patch = CustomerUpsert {
            child_name: Some("太郎".into()),
            age: Some(0),
            age_months: Some(6),
            ..Default::default()
        };
        let mut c = Customer::empty("c1");
        patch.apply_to(&mut c);
        let snapshot = c.clone();
        patch.apply_to(&mut c);
        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            serde_json::to_value(&c).unwrap()
        );
    }

    #[test]
    fn test_has_identity() {
        assert!(!CustomerUpsert::default().has_identity());
        assert!(
            CustomerUpsert {
                parent_name: Some("山田".into()),
                ..Default::default()
            }
            .has_identity()
        );
        // Empty string is not an identity
        assert!(
            !CustomerUpsert {
                child_name: Some(String::new()),
                ..Default::default()
            }
            .has_identity()
        );
    }
}

//! Domain models
//!
//! - [`customer`] - deduplicated customer records (保護者・お子様情報)
//! - [`reservation`] - appointment reservations and their three status axes
//! - [`incentive`] - per-staff/per-date incentive ledger entries
//! - [`staff`] - staff accounts and roles
//! - [`location`] - studio location master data

pub mod customer;
pub mod incentive;
pub mod location;
pub mod reservation;
pub mod staff;

pub use customer::{Customer, CustomerReservationStatus, CustomerUpsert};
pub use incentive::{IncentiveEntry, REWARD_PER_RESERVATION};
pub use location::{Location, LocationCreate};
pub use reservation::{
    DeliveryStatus, PaymentStatus, Reservation, ReservationCreate, ReservationStatus,
    ReservationUpdate, ReservationWithCustomer,
};
pub use staff::{Role, StaffAccount, StaffCreate, StaffInfo};

//! Reservation types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Property;

/// A booked stay. Read-only in this layer; reservations are created and
/// modified elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub property_id: i64,
    pub guest_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A guest's reservation enriched with the booked property and that
/// property's average review rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestReservation {
    pub reservation: Reservation,
    pub property: Property,
    pub average_rating: Option<f64>,
}

//! Property types and the listing search filter

use serde::{Deserialize, Serialize};

/// Scale factor between the dollar-denominated filter surface and the
/// cents-denominated stored amounts.
pub const CENTS_PER_DOLLAR: i64 = 100;

/// Convert a whole-dollar amount to cents.
pub fn dollars_to_cents(dollars: i64) -> i64 {
    dollars * CENTS_PER_DOLLAR
}

/// A rental property.
///
/// `cost_per_night` is an integer number of cents, on both reads and
/// writes; nothing in this layer deals in fractional dollars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly cost in integer cents.
    pub cost_per_night: i64,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub active: bool,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
}

/// Property creation request. `active` is forced true on insert, so it is
/// not part of the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly cost in integer cents.
    pub cost_per_night: i64,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
}

/// A property together with its aggregate review rating.
///
/// `average_rating` is `None` when the property has no reviews yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyListing {
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: Option<f64>,
}

/// A single review score for a property. Read-only in this layer; only
/// consumed in aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropertyReview {
    pub property_id: i64,
    pub rating: i16,
}

/// Conjunctive filter over property listings.
///
/// Price bounds are whole dollars and only apply when BOTH are present; a
/// one-sided bound is ignored. `minimum_rating` filters on the average
/// review rating after aggregation, which also drops unreviewed properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyFilter {
    /// Case-insensitive substring match on the city name.
    pub city: Option<String>,
    pub owner_id: Option<i64>,
    /// Lower price bound in whole dollars.
    pub minimum_price_per_night: Option<i64>,
    /// Upper price bound in whole dollars.
    pub maximum_price_per_night: Option<i64>,
    pub minimum_rating: Option<f64>,
}

impl PropertyFilter {
    /// The inclusive cents range the price bounds describe, or `None` when
    /// fewer than both bounds are set.
    pub fn price_range_cents(&self) -> Option<(i64, i64)> {
        match (self.minimum_price_per_night, self.maximum_price_per_night) {
            (Some(min), Some(max)) => Some((dollars_to_cents(min), dollars_to_cents(max))),
            _ => None,
        }
    }

    /// True when no filter field is set.
    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.owner_id.is_none()
            && self.minimum_price_per_night.is_none()
            && self.maximum_price_per_night.is_none()
            && self.minimum_rating.is_none()
    }
}

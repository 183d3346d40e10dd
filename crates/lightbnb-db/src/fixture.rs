//! In-memory fixture backend seeded from static JSON
//!
//! Stands in for PostgreSQL in tests and offline demos. All state lives
//! behind one `RwLock`, so concurrent writers cannot race on id assignment
//! or lose inserts; ids come from monotonic counters seeded past the
//! highest fixture id.

use async_trait::async_trait;
use lightbnb_types::{
    GuestReservation, NewProperty, NewUser, Property, PropertyFilter, PropertyListing,
    PropertyReview, Reservation, User,
};
use tokio::sync::RwLock;

use crate::store::{validate_new_property, validate_new_user, RentalStore};
use crate::{Result, StoreError};

const USER_SEED: &str = include_str!("../fixtures/users.json");
const PROPERTY_SEED: &str = include_str!("../fixtures/properties.json");
const RESERVATION_SEED: &str = include_str!("../fixtures/reservations.json");
const REVIEW_SEED: &str = include_str!("../fixtures/property_reviews.json");

/// The fixture backend.
pub struct FixtureStore {
    inner: RwLock<FixtureData>,
}

struct FixtureData {
    users: Vec<User>,
    properties: Vec<Property>,
    reservations: Vec<Reservation>,
    reviews: Vec<PropertyReview>,
    next_user_id: i64,
    next_property_id: i64,
}

impl FixtureStore {
    /// Store seeded with the bundled fixture records.
    pub fn new() -> Result<Self> {
        let users = serde_json::from_str(USER_SEED).map_err(seed_error)?;
        let properties = serde_json::from_str(PROPERTY_SEED).map_err(seed_error)?;
        let reservations = serde_json::from_str(RESERVATION_SEED).map_err(seed_error)?;
        let reviews = serde_json::from_str(REVIEW_SEED).map_err(seed_error)?;

        Ok(Self::from_records(users, properties, reservations, reviews))
    }

    /// Store seeded with caller-supplied records.
    pub fn from_records(
        users: Vec<User>,
        properties: Vec<Property>,
        reservations: Vec<Reservation>,
        reviews: Vec<PropertyReview>,
    ) -> Self {
        let next_user_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let next_property_id = properties.iter().map(|p| p.id).max().unwrap_or(0) + 1;

        Self {
            inner: RwLock::new(FixtureData {
                users,
                properties,
                reservations,
                reviews,
                next_user_id,
                next_property_id,
            }),
        }
    }
}

fn seed_error(e: serde_json::Error) -> StoreError {
    StoreError::Validation(format!("fixture seed data: {e}"))
}

fn average_rating(reviews: &[PropertyReview], property_id: i64) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0u32;
    for review in reviews.iter().filter(|r| r.property_id == property_id) {
        sum += f64::from(review.rating);
        count += 1;
    }
    (count > 0).then(|| sum / f64::from(count))
}

fn capped(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

#[async_trait]
impl RentalStore for FixtureStore {
    async fn get_user_with_email(&self, email: &str) -> Result<Option<User>> {
        let needle = email.to_lowercase();
        let data = self.inner.read().await;

        Ok(data
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(&needle))
            .cloned())
    }

    async fn get_user_with_id(&self, id: i64) -> Result<Option<User>> {
        let data = self.inner.read().await;
        Ok(data.users.iter().find(|u| u.id == id).cloned())
    }

    async fn add_user(&self, new_user: &NewUser) -> Result<User> {
        validate_new_user(new_user)?;
        let email = new_user.email.to_lowercase();

        let mut data = self.inner.write().await;
        if data.users.iter().any(|u| u.email.eq_ignore_ascii_case(&email)) {
            return Err(StoreError::Constraint(format!(
                "email already registered: {email}"
            )));
        }

        let user = User {
            id: data.next_user_id,
            name: new_user.name.clone(),
            email,
            password: new_user.password.clone(),
        };
        data.next_user_id += 1;
        data.users.push(user.clone());

        Ok(user)
    }

    async fn get_all_reservations(
        &self,
        guest_id: i64,
        limit: i64,
    ) -> Result<Vec<GuestReservation>> {
        let data = self.inner.read().await;

        let mut reservations: Vec<GuestReservation> = data
            .reservations
            .iter()
            .filter(|r| r.guest_id == guest_id)
            .filter_map(|r| {
                let property = data.properties.iter().find(|p| p.id == r.property_id)?;
                Some(GuestReservation {
                    reservation: r.clone(),
                    property: property.clone(),
                    average_rating: average_rating(&data.reviews, property.id),
                })
            })
            .collect();

        reservations.sort_by_key(|r| r.reservation.start_date);
        reservations.truncate(capped(limit));

        Ok(reservations)
    }

    async fn get_all_properties(
        &self,
        filter: &PropertyFilter,
        limit: i64,
    ) -> Result<Vec<PropertyListing>> {
        let data = self.inner.read().await;
        let city = filter.city.as_ref().map(|c| c.to_lowercase());
        let price_range = filter.price_range_cents();

        let mut listings: Vec<PropertyListing> = data
            .properties
            .iter()
            .filter(|p| match &city {
                Some(c) => p.city.to_lowercase().contains(c.as_str()),
                None => true,
            })
            .filter(|p| filter.owner_id.is_none_or(|owner| p.owner_id == owner))
            .filter(|p| {
                price_range.is_none_or(|(min, max)| {
                    p.cost_per_night >= min && p.cost_per_night <= max
                })
            })
            .map(|p| PropertyListing {
                property: p.clone(),
                average_rating: average_rating(&data.reviews, p.id),
            })
            // an unreviewed property has no average and cannot clear a
            // minimum-rating bar, same as HAVING over a NULL aggregate
            .filter(|listing| {
                filter.minimum_rating.is_none_or(|min| {
                    listing.average_rating.is_some_and(|avg| avg >= min)
                })
            })
            .collect();

        listings.sort_by_key(|l| l.property.cost_per_night);
        listings.truncate(capped(limit));

        Ok(listings)
    }

    async fn add_property(&self, new_property: &NewProperty) -> Result<Property> {
        validate_new_property(new_property)?;

        let mut data = self.inner.write().await;
        let property = Property {
            id: data.next_property_id,
            owner_id: new_property.owner_id,
            title: new_property.title.clone(),
            description: new_property.description.clone(),
            thumbnail_photo_url: new_property.thumbnail_photo_url.clone(),
            cover_photo_url: new_property.cover_photo_url.clone(),
            cost_per_night: new_property.cost_per_night,
            parking_spaces: new_property.parking_spaces,
            number_of_bathrooms: new_property.number_of_bathrooms,
            number_of_bedrooms: new_property.number_of_bedrooms,
            active: true,
            street: new_property.street.clone(),
            city: new_property.city.clone(),
            province: new_property.province.clone(),
            post_code: new_property.post_code.clone(),
            country: new_property.country.clone(),
        };
        data.next_property_id += 1;
        data.properties.push(property.clone());

        Ok(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bundled_seed_data_parses() {
        let store = FixtureStore::new().unwrap();

        let user = store
            .get_user_with_email("sebastianguerra@ymail.com")
            .await
            .unwrap();
        assert!(user.is_some());

        let listings = store
            .get_all_properties(&PropertyFilter::default(), 10)
            .await
            .unwrap();
        assert!(!listings.is_empty());
    }

    #[tokio::test]
    async fn seeded_ids_are_not_reused_by_inserts() {
        let store = FixtureStore::new().unwrap();

        let created = store
            .add_user(&NewUser {
                name: "New Guest".to_string(),
                email: "new.guest@example.com".to_string(),
                password: "$2a$10$hash".to_string(),
            })
            .await
            .unwrap();

        let seeded_max = {
            let data = store.inner.read().await;
            data.users
                .iter()
                .filter(|u| u.id != created.id)
                .map(|u| u.id)
                .max()
                .unwrap()
        };
        assert!(created.id > seeded_max);
    }

    #[tokio::test]
    async fn concurrent_property_inserts_get_distinct_ids() {
        use std::sync::Arc;

        let store = Arc::new(FixtureStore::from_records(vec![], vec![], vec![], vec![]));
        let new_property = NewProperty {
            owner_id: 1,
            title: "Blank corner".to_string(),
            description: String::new(),
            thumbnail_photo_url: String::new(),
            cover_photo_url: String::new(),
            cost_per_night: 85_234,
            street: "651 Nami Road".to_string(),
            city: "Bohbatev".to_string(),
            province: "Alberta".to_string(),
            post_code: "83680".to_string(),
            country: "Canada".to_string(),
            parking_spaces: 6,
            number_of_bathrooms: 4,
            number_of_bedrooms: 8,
        };

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                let new_property = new_property.clone();
                tokio::spawn(async move { store.add_property(&new_property).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }
}

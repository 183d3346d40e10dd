//! Store trait both backends implement

use async_trait::async_trait;
use lightbnb_types::{
    GuestReservation, NewProperty, NewUser, Property, PropertyFilter, PropertyListing, User,
};

use crate::{Result, StoreError};

/// Cap on list results when the caller does not pass one.
pub const DEFAULT_LIMIT: i64 = 10;

/// Data-access facade for the rental application.
///
/// Every operation is a stateless, single-shot asynchronous request; calls
/// may run concurrently with no ordering guarantees between them. No
/// operation retries, times out, or supports cancellation.
#[async_trait]
pub trait RentalStore: Send + Sync {
    /// Look up a user by email. The input is lowercased before the lookup,
    /// so the match is case-insensitive. Zero rows is `Ok(None)`.
    async fn get_user_with_email(&self, email: &str) -> Result<Option<User>>;

    /// Look up a user by id. Zero rows is `Ok(None)`.
    async fn get_user_with_id(&self, id: i64) -> Result<Option<User>>;

    /// Insert a user and return it with its generated id. The password is
    /// expected to be hashed by the caller. A duplicate email surfaces as
    /// [`StoreError::Constraint`].
    async fn add_user(&self, new_user: &NewUser) -> Result<User>;

    /// Up to `limit` reservations for a guest, ordered by start date
    /// ascending, each carrying the booked property and that property's
    /// average review rating.
    async fn get_all_reservations(
        &self,
        guest_id: i64,
        limit: i64,
    ) -> Result<Vec<GuestReservation>>;

    /// Search property listings. Filter fields combine conjunctively;
    /// results are ordered by ascending nightly cost and capped at `limit`.
    async fn get_all_properties(
        &self,
        filter: &PropertyFilter,
        limit: i64,
    ) -> Result<Vec<PropertyListing>>;

    /// Insert a property with `active` forced true and return it with its
    /// generated id.
    async fn add_property(&self, new_property: &NewProperty) -> Result<Property>;
}

/// Required-field checks shared by both backends.
pub(crate) fn validate_new_user(new_user: &NewUser) -> Result<()> {
    for (field, value) in [
        ("name", &new_user.name),
        ("email", &new_user.email),
        ("password", &new_user.password),
    ] {
        if value.trim().is_empty() {
            return Err(StoreError::Validation(format!(
                "user {field} must not be empty"
            )));
        }
    }
    Ok(())
}

pub(crate) fn validate_new_property(new_property: &NewProperty) -> Result<()> {
    if new_property.title.trim().is_empty() {
        return Err(StoreError::Validation(
            "property title must not be empty".to_string(),
        ));
    }
    if new_property.cost_per_night < 0 {
        return Err(StoreError::Validation(
            "property cost_per_night must not be negative".to_string(),
        ));
    }
    Ok(())
}

//! Contract tests for the `RentalStore` operations, run against the fixture
//! backend through a trait object so nothing here depends on the concrete
//! store type.

use std::sync::Arc;

use chrono::NaiveDate;
use lightbnb_db::{FixtureStore, RentalStore, StoreError, DEFAULT_LIMIT};
use lightbnb_types::{
    NewProperty, NewUser, Property, PropertyFilter, PropertyReview, Reservation, User,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("lightbnb_db=debug")
        .with_test_writer()
        .try_init();
}

fn user(id: i64, name: &str, email: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        password: "$2a$10$FB/BOAVhpuLvpOREQVmvmezD4ED/.JBIDRh70tGevYzYzQgFId2u.".to_string(),
    }
}

fn property(id: i64, owner_id: i64, city: &str, cost_per_night: i64) -> Property {
    Property {
        id,
        owner_id,
        title: format!("Listing {id}"),
        description: "description".to_string(),
        thumbnail_photo_url: String::new(),
        cover_photo_url: String::new(),
        cost_per_night,
        parking_spaces: 1,
        number_of_bathrooms: 1,
        number_of_bedrooms: 2,
        active: true,
        street: "536 Namsub Highway".to_string(),
        city: city.to_string(),
        province: "British Columbia".to_string(),
        post_code: "28142".to_string(),
        country: "Canada".to_string(),
    }
}

fn reservation(id: i64, property_id: i64, guest_id: i64, start: &str, end: &str) -> Reservation {
    Reservation {
        id,
        property_id,
        guest_id,
        start_date: start.parse::<NaiveDate>().unwrap(),
        end_date: end.parse::<NaiveDate>().unwrap(),
    }
}

fn store_with(
    users: Vec<User>,
    properties: Vec<Property>,
    reservations: Vec<Reservation>,
    reviews: Vec<PropertyReview>,
) -> Arc<dyn RentalStore> {
    init_tracing();
    Arc::new(FixtureStore::from_records(
        users,
        properties,
        reservations,
        reviews,
    ))
}

fn new_property(owner_id: i64, city: &str, cost_per_night: i64) -> NewProperty {
    NewProperty {
        owner_id,
        title: "Game fill".to_string(),
        description: "description".to_string(),
        thumbnail_photo_url: String::new(),
        cover_photo_url: String::new(),
        cost_per_night,
        street: "162 Dubud Square".to_string(),
        city: city.to_string(),
        province: "British Columbia".to_string(),
        post_code: "28041".to_string(),
        country: "Canada".to_string(),
        parking_spaces: 1,
        number_of_bathrooms: 1,
        number_of_bedrooms: 1,
    }
}

#[tokio::test]
async fn email_lookup_is_case_insensitive() {
    let store = store_with(
        vec![user(1, "Eva Stanley", "sebastianguerra@ymail.com")],
        vec![],
        vec![],
        vec![],
    );

    let lower = store
        .get_user_with_email("sebastianguerra@ymail.com")
        .await
        .unwrap();
    let upper = store
        .get_user_with_email("SEBASTIANGUERRA@YMAIL.COM")
        .await
        .unwrap();

    assert_eq!(lower, upper);
    assert_eq!(lower.unwrap().id, 1);
}

#[tokio::test]
async fn unknown_email_resolves_none_not_error() {
    let store = store_with(vec![], vec![], vec![], vec![]);

    let found = store.get_user_with_email("nobody@example.com").await.unwrap();
    assert_eq!(found, None);
}

#[tokio::test]
async fn added_user_round_trips_through_id_lookup() {
    let store = store_with(vec![], vec![], vec![], vec![]);

    let created = store
        .add_user(&NewUser {
            name: "Louisa Meyer".to_string(),
            email: "Jacksonrose@Hotmail.com".to_string(),
            password: "$2a$10$hash".to_string(),
        })
        .await
        .unwrap();

    let fetched = store.get_user_with_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Louisa Meyer");
    // stored lowercased so email lookups stay case-insensitive
    assert_eq!(fetched.email, "jacksonrose@hotmail.com");
}

#[tokio::test]
async fn duplicate_email_is_a_constraint_error() {
    let store = store_with(
        vec![user(1, "Eva Stanley", "sebastianguerra@ymail.com")],
        vec![],
        vec![],
        vec![],
    );

    let err = store
        .add_user(&NewUser {
            name: "Impostor".to_string(),
            email: "SebastianGuerra@ymail.com".to_string(),
            password: "$2a$10$hash".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Constraint(_)));
}

#[tokio::test]
async fn blank_fields_are_validation_errors() {
    let store = store_with(vec![], vec![], vec![], vec![]);

    let err = store
        .add_user(&NewUser {
            name: String::new(),
            email: "a@b.com".to_string(),
            password: "x".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let mut untitled = new_property(1, "Vancouver", 10_000);
    untitled.title = "   ".to_string();
    let err = store.add_property(&untitled).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn price_range_is_inclusive_and_cents_scaled() {
    let store = store_with(
        vec![],
        vec![
            property(1, 1, "Vancouver", 9_999),
            property(2, 1, "Vancouver", 10_000),
            property(3, 1, "Vancouver", 15_000),
            property(4, 1, "Vancouver", 20_000),
            property(5, 1, "Vancouver", 20_001),
        ],
        vec![],
        vec![],
    );

    // dollars in, cents compared
    let filter = PropertyFilter {
        minimum_price_per_night: Some(100),
        maximum_price_per_night: Some(200),
        ..Default::default()
    };
    let listings = store.get_all_properties(&filter, DEFAULT_LIMIT).await.unwrap();

    let ids: Vec<i64> = listings.iter().map(|l| l.property.id).collect();
    assert_eq!(ids, vec![2, 3, 4]);
}

#[tokio::test]
async fn one_sided_price_bound_applies_no_price_filter() {
    let store = store_with(
        vec![],
        vec![
            property(1, 1, "Vancouver", 5_000),
            property(2, 1, "Vancouver", 50_000),
        ],
        vec![],
        vec![],
    );

    let filter = PropertyFilter {
        minimum_price_per_night: Some(100),
        ..Default::default()
    };
    let listings = store.get_all_properties(&filter, DEFAULT_LIMIT).await.unwrap();
    assert_eq!(listings.len(), 2);
}

#[tokio::test]
async fn city_filter_matches_substring_capped_and_cost_ordered() {
    let store = store_with(
        vec![],
        vec![
            property(1, 1, "Vancouver", 30_000),
            property(2, 1, "North Vancouver", 10_000),
            property(3, 1, "Toronto", 5_000),
            property(4, 1, "Vancouver", 20_000),
            property(5, 1, "West Vancouver", 40_000),
            property(6, 1, "Vancouver", 25_000),
            property(7, 1, "Vancouver", 35_000),
            property(8, 1, "Montreal", 1_000),
        ],
        vec![],
        vec![],
    );

    let filter = PropertyFilter {
        city: Some("van".to_string()),
        ..Default::default()
    };
    let listings = store.get_all_properties(&filter, 5).await.unwrap();

    assert_eq!(listings.len(), 5);
    for listing in &listings {
        assert!(listing.property.city.to_lowercase().contains("van"));
    }
    let costs: Vec<i64> = listings.iter().map(|l| l.property.cost_per_night).collect();
    assert_eq!(costs, vec![10_000, 20_000, 25_000, 30_000, 35_000]);
}

#[tokio::test]
async fn minimum_rating_excludes_low_and_unreviewed_properties() {
    let store = store_with(
        vec![],
        vec![
            property(1, 1, "Vancouver", 10_000),
            property(2, 1, "Vancouver", 20_000),
            property(3, 1, "Vancouver", 30_000),
        ],
        vec![],
        vec![
            // property 1 averages 4.5, property 2 averages 3.0, property 3
            // has no reviews at all
            PropertyReview { property_id: 1, rating: 4 },
            PropertyReview { property_id: 1, rating: 5 },
            PropertyReview { property_id: 2, rating: 3 },
        ],
    );

    let filter = PropertyFilter {
        minimum_rating: Some(4.0),
        ..Default::default()
    };
    let listings = store.get_all_properties(&filter, DEFAULT_LIMIT).await.unwrap();

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].property.id, 1);
    assert_eq!(listings[0].average_rating, Some(4.5));
}

#[tokio::test]
async fn added_property_shows_up_exactly_once_for_its_owner() {
    let store = store_with(
        vec![],
        vec![property(1, 1, "Vancouver", 10_000)],
        vec![],
        vec![],
    );

    let created = store.add_property(&new_property(7, "Vancouver", 12_000)).await.unwrap();
    assert!(created.active);

    let filter = PropertyFilter {
        owner_id: Some(7),
        ..Default::default()
    };
    let listings = store.get_all_properties(&filter, DEFAULT_LIMIT).await.unwrap();

    let matching: Vec<_> = listings
        .iter()
        .filter(|l| l.property.id == created.id)
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(listings.len(), 1);
}

#[tokio::test]
async fn reservations_are_guest_filtered_date_ordered_and_enriched() {
    let store = store_with(
        vec![],
        vec![
            property(1, 1, "Vancouver", 10_000),
            property(2, 1, "Toronto", 20_000),
            property(3, 1, "Montreal", 30_000),
        ],
        vec![
            reservation(1, 2, 9, "2023-10-01", "2023-10-14"),
            reservation(2, 1, 9, "2023-01-04", "2023-02-01"),
            reservation(3, 3, 9, "2023-05-27", "2023-05-28"),
            reservation(4, 1, 8, "2023-03-01", "2023-03-05"),
        ],
        vec![
            PropertyReview { property_id: 1, rating: 5 },
            PropertyReview { property_id: 1, rating: 4 },
        ],
    );

    let reservations = store.get_all_reservations(9, DEFAULT_LIMIT).await.unwrap();

    let ids: Vec<i64> = reservations.iter().map(|r| r.reservation.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
    for r in &reservations {
        assert_eq!(r.reservation.guest_id, 9);
        assert_eq!(r.property.id, r.reservation.property_id);
    }
    // property 1 carries its aggregate rating, the others have none
    assert_eq!(reservations[0].average_rating, Some(4.5));
    assert_eq!(reservations[1].average_rating, None);

    let capped = store.get_all_reservations(9, 2).await.unwrap();
    assert_eq!(capped.len(), 2);
}

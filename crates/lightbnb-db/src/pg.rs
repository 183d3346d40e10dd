//! PostgreSQL backend over a shared connection pool

use async_trait::async_trait;
use chrono::NaiveDate;
use lightbnb_types::{
    GuestReservation, NewProperty, NewUser, Property, PropertyFilter, PropertyListing, Reservation,
    User,
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::DbConfig;
use crate::query::property_search;
use crate::store::{validate_new_property, validate_new_user, RentalStore};
use crate::Result;

/// The relational backend. All operations run as single-shot parameterized
/// queries against the pool; the pool manages concurrent connections.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to PostgreSQL and bootstrap the schema.
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        tracing::info!(
            host = %config.host,
            database = %config.database,
            "connecting to PostgreSQL"
        );

        let options = PgConnectOptions::new()
            .host(&config.host)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        Self::bootstrap_schema(&pool).await?;
        tracing::info!("PostgreSQL connection established");

        Ok(Self { pool })
    }

    /// Wrap an existing pool. Useful when the caller manages its own pool.
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent table bootstrap so a fresh database is usable. Full
    /// migration tooling stays out of this layer.
    async fn bootstrap_schema(pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS properties (
                id BIGSERIAL PRIMARY KEY,
                owner_id BIGINT NOT NULL REFERENCES users (id),
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                thumbnail_photo_url TEXT NOT NULL DEFAULT '',
                cover_photo_url TEXT NOT NULL DEFAULT '',
                cost_per_night BIGINT NOT NULL,
                parking_spaces INTEGER NOT NULL DEFAULT 0,
                number_of_bathrooms INTEGER NOT NULL DEFAULT 1,
                number_of_bedrooms INTEGER NOT NULL DEFAULT 1,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                street TEXT NOT NULL,
                city TEXT NOT NULL,
                province TEXT NOT NULL,
                post_code TEXT NOT NULL,
                country TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reservations (
                id BIGSERIAL PRIMARY KEY,
                property_id BIGINT NOT NULL REFERENCES properties (id),
                guest_id BIGINT NOT NULL REFERENCES users (id),
                start_date DATE NOT NULL,
                end_date DATE NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS property_reviews (
                property_id BIGINT NOT NULL REFERENCES properties (id),
                rating SMALLINT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl RentalStore for PgStore {
    async fn get_user_with_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, password FROM users WHERE email = $1
            "#,
        )
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn get_user_with_id(&self, id: i64) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, password FROM users WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn add_user(&self, new_user: &NewUser) -> Result<User> {
        validate_new_user(new_user)?;

        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password
            "#,
        )
        .bind(&new_user.name)
        .bind(new_user.email.to_lowercase())
        .bind(&new_user.password)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_all_reservations(
        &self,
        guest_id: i64,
        limit: i64,
    ) -> Result<Vec<GuestReservation>> {
        let rows: Vec<GuestReservationRow> = sqlx::query_as(
            r#"
            SELECT reservations.id AS reservation_id, reservations.property_id,
                   reservations.guest_id, reservations.start_date, reservations.end_date,
                   properties.owner_id, properties.title, properties.description,
                   properties.thumbnail_photo_url, properties.cover_photo_url,
                   properties.cost_per_night, properties.parking_spaces,
                   properties.number_of_bathrooms, properties.number_of_bedrooms,
                   properties.active, properties.street, properties.city,
                   properties.province, properties.post_code, properties.country,
                   avg(property_reviews.rating)::float8 AS average_rating
            FROM reservations
            JOIN properties ON properties.id = reservations.property_id
            LEFT JOIN property_reviews ON property_reviews.property_id = properties.id
            WHERE reservations.guest_id = $1
            GROUP BY reservations.id, properties.id
            ORDER BY reservations.start_date
            LIMIT $2
            "#,
        )
        .bind(guest_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_all_properties(
        &self,
        filter: &PropertyFilter,
        limit: i64,
    ) -> Result<Vec<PropertyListing>> {
        tracing::debug!(filtered = !filter.is_empty(), limit, "searching properties");

        let mut query = property_search(filter, limit);
        let rows: Vec<ListingRow> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn add_property(&self, new_property: &NewProperty) -> Result<Property> {
        validate_new_property(new_property)?;

        let row: PropertyRow = sqlx::query_as(
            r#"
            INSERT INTO properties (owner_id, title, description, thumbnail_photo_url,
                                    cover_photo_url, cost_per_night, parking_spaces,
                                    number_of_bathrooms, number_of_bedrooms, active,
                                    street, city, province, post_code, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE, $10, $11, $12, $13, $14)
            RETURNING id, owner_id, title, description, thumbnail_photo_url,
                      cover_photo_url, cost_per_night, parking_spaces,
                      number_of_bathrooms, number_of_bedrooms, active,
                      street, city, province, post_code, country
            "#,
        )
        .bind(new_property.owner_id)
        .bind(&new_property.title)
        .bind(&new_property.description)
        .bind(&new_property.thumbnail_photo_url)
        .bind(&new_property.cover_photo_url)
        .bind(new_property.cost_per_night)
        .bind(new_property.parking_spaces)
        .bind(new_property.number_of_bathrooms)
        .bind(new_property.number_of_bedrooms)
        .bind(&new_property.street)
        .bind(&new_property.city)
        .bind(&new_property.province)
        .bind(&new_property.post_code)
        .bind(&new_property.country)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

// Helper structs for sqlx query_as

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password: String,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            name: r.name,
            email: r.email,
            password: r.password,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PropertyRow {
    id: i64,
    owner_id: i64,
    title: String,
    description: String,
    thumbnail_photo_url: String,
    cover_photo_url: String,
    cost_per_night: i64,
    parking_spaces: i32,
    number_of_bathrooms: i32,
    number_of_bedrooms: i32,
    active: bool,
    street: String,
    city: String,
    province: String,
    post_code: String,
    country: String,
}

impl From<PropertyRow> for Property {
    fn from(r: PropertyRow) -> Self {
        Property {
            id: r.id,
            owner_id: r.owner_id,
            title: r.title,
            description: r.description,
            thumbnail_photo_url: r.thumbnail_photo_url,
            cover_photo_url: r.cover_photo_url,
            cost_per_night: r.cost_per_night,
            parking_spaces: r.parking_spaces,
            number_of_bathrooms: r.number_of_bathrooms,
            number_of_bedrooms: r.number_of_bedrooms,
            active: r.active,
            street: r.street,
            city: r.city,
            province: r.province,
            post_code: r.post_code,
            country: r.country,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ListingRow {
    #[sqlx(flatten)]
    property: PropertyRow,
    average_rating: Option<f64>,
}

impl From<ListingRow> for PropertyListing {
    fn from(r: ListingRow) -> Self {
        PropertyListing {
            property: r.property.into(),
            average_rating: r.average_rating,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GuestReservationRow {
    reservation_id: i64,
    property_id: i64,
    guest_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    owner_id: i64,
    title: String,
    description: String,
    thumbnail_photo_url: String,
    cover_photo_url: String,
    cost_per_night: i64,
    parking_spaces: i32,
    number_of_bathrooms: i32,
    number_of_bedrooms: i32,
    active: bool,
    street: String,
    city: String,
    province: String,
    post_code: String,
    country: String,
    average_rating: Option<f64>,
}

impl From<GuestReservationRow> for GuestReservation {
    fn from(r: GuestReservationRow) -> Self {
        GuestReservation {
            reservation: Reservation {
                id: r.reservation_id,
                property_id: r.property_id,
                guest_id: r.guest_id,
                start_date: r.start_date,
                end_date: r.end_date,
            },
            property: Property {
                id: r.property_id,
                owner_id: r.owner_id,
                title: r.title,
                description: r.description,
                thumbnail_photo_url: r.thumbnail_photo_url,
                cover_photo_url: r.cover_photo_url,
                cost_per_night: r.cost_per_night,
                parking_spaces: r.parking_spaces,
                number_of_bathrooms: r.number_of_bathrooms,
                number_of_bedrooms: r.number_of_bedrooms,
                active: r.active,
                street: r.street,
                city: r.city,
                province: r.province,
                post_code: r.post_code,
                country: r.country,
            },
            average_rating: r.average_rating,
        }
    }
}

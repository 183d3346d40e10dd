//! Structured assembly of the property search query
//!
//! The filter clauses are appended through an explicit WHERE/AND state flag
//! and `push_bind`, so placeholder numbering and clause chaining can never
//! drift apart.

use lightbnb_types::PropertyFilter;
use sqlx::{Postgres, QueryBuilder};

/// Columns selected for every listing query, in `ListingRow` order.
const LISTING_SELECT: &str = "SELECT properties.id, properties.owner_id, properties.title, \
     properties.description, properties.thumbnail_photo_url, properties.cover_photo_url, \
     properties.cost_per_night, properties.parking_spaces, properties.number_of_bathrooms, \
     properties.number_of_bedrooms, properties.active, properties.street, properties.city, \
     properties.province, properties.post_code, properties.country, \
     avg(property_reviews.rating)::float8 AS average_rating \
     FROM properties \
     LEFT JOIN property_reviews ON properties.id = property_reviews.property_id";

/// Open the WHERE clause on first use, chain with AND afterwards.
fn clause_prefix(where_open: &mut bool) -> &'static str {
    if *where_open {
        " AND "
    } else {
        *where_open = true;
        " WHERE "
    }
}

/// Build the listing search for `filter`, ordered by ascending nightly cost
/// and capped at `limit`.
///
/// The minimum-rating filter runs after aggregation (HAVING); the grouping,
/// ordering, and limit are emitted unconditionally.
pub(crate) fn property_search(
    filter: &PropertyFilter,
    limit: i64,
) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(LISTING_SELECT);
    let mut where_open = false;

    if let Some(city) = &filter.city {
        qb.push(clause_prefix(&mut where_open));
        qb.push("properties.city ILIKE ");
        qb.push_bind(format!("%{city}%"));
    }

    if let Some(owner_id) = filter.owner_id {
        qb.push(clause_prefix(&mut where_open));
        qb.push("properties.owner_id = ");
        qb.push_bind(owner_id);
    }

    // Both bounds or neither; a one-sided price bound is ignored.
    if let Some((min_cents, max_cents)) = filter.price_range_cents() {
        qb.push(clause_prefix(&mut where_open));
        qb.push("properties.cost_per_night >= ");
        qb.push_bind(min_cents);
        qb.push(" AND properties.cost_per_night <= ");
        qb.push_bind(max_cents);
    }

    qb.push(" GROUP BY properties.id");

    if let Some(minimum_rating) = filter.minimum_rating {
        qb.push(" HAVING avg(property_reviews.rating) >= ");
        qb.push_bind(minimum_rating);
    }

    qb.push(" ORDER BY properties.cost_per_night LIMIT ");
    qb.push_bind(limit);

    qb
}

//! SQLite location repository
//!
//! Implements the `LocationRepository` port on the `locations` table.

use std::sync::Arc;

use application::{error::ApplicationError, ports::LocationRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    BoundingBox, DomainError, GeoLocation, LocationCategory, LocationId, NewLocation,
    StoredLocation,
};
use rusqlite::{Row, params, params_from_iter, types::Value};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

const SELECT_COLUMNS: &str =
    "SELECT id, category, name, latitude, longitude, fact, category_tag, created_at FROM locations";

/// Listing order: themed categories first, generic locations last
const CATEGORY_ORDER: &str = "CASE category
        WHEN 'Architecture' THEN 0
        WHEN 'Films' THEN 1
        WHEN 'History' THEN 2
        WHEN 'Music' THEN 3
        ELSE 4
    END, id";

/// SQLite-based location repository
#[derive(Debug, Clone)]
pub struct SqliteLocationRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteLocationRepository {
    /// Create a new repository over a pool
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepository for SqliteLocationRepository {
    #[instrument(skip(self))]
    async fn list_all(
        &self,
        category: Option<LocationCategory>,
    ) -> Result<Vec<StoredLocation>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let locations = match category {
                Some(category) => {
                    let mut stmt = conn
                        .prepare(&format!(
                            "{SELECT_COLUMNS} WHERE category = ?1 ORDER BY id"
                        ))
                        .map_err(|e| ApplicationError::Internal(e.to_string()))?;
                    stmt.query_map([category.as_str()], row_to_location)
                        .map_err(|e| ApplicationError::Internal(e.to_string()))?
                        .collect::<Result<Vec<_>, _>>()
                },
                None => {
                    let mut stmt = conn
                        .prepare(&format!("{SELECT_COLUMNS} ORDER BY {CATEGORY_ORDER}"))
                        .map_err(|e| ApplicationError::Internal(e.to_string()))?;
                    stmt.query_map([], row_to_location)
                        .map_err(|e| ApplicationError::Internal(e.to_string()))?
                        .collect::<Result<Vec<_>, _>>()
                },
            }
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(count = locations.len(), "Loaded locations");
            Ok(locations)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, location), fields(category = %location.category))]
    async fn create(&self, location: &NewLocation) -> Result<StoredLocation, ApplicationError> {
        location.validate()?;

        let pool = Arc::clone(&self.pool);
        let location = location.clone();
        let created_at = Utc::now();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let name = location.name.trim().to_string();
            conn.execute(
                "INSERT INTO locations
                    (category, name, latitude, longitude, fact, category_tag, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    location.category.as_str(),
                    name,
                    location.coordinate.latitude(),
                    location.coordinate.longitude(),
                    location.fact,
                    location.category_tag,
                    created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let id = LocationId::new(conn.last_insert_rowid());
            debug!(%id, "Inserted location");

            Ok(StoredLocation::restore(
                id,
                location.category,
                name,
                location.coordinate,
                location.fact,
                location.category_tag,
                created_at,
            ))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, categories, center), fields(categories = categories.len()))]
    async fn filter_by(
        &self,
        categories: &[LocationCategory],
        center: &GeoLocation,
        radius_km: f64,
    ) -> Result<Vec<StoredLocation>, ApplicationError> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(DomainError::ValidationError(format!(
                "radius must be a non-negative number of kilometers, got {radius_km}"
            ))
            .into());
        }
        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let bbox = BoundingBox::around(center, radius_km);
        let mut values: Vec<Value> = categories
            .iter()
            .map(|c| Value::Text(c.as_str().to_string()))
            .collect();
        values.extend([
            Value::Real(bbox.min_latitude),
            Value::Real(bbox.max_latitude),
            Value::Real(bbox.min_longitude),
            Value::Real(bbox.max_longitude),
        ]);

        let placeholders = vec!["?"; categories.len()].join(", ");
        let sql = format!(
            "{SELECT_COLUMNS}
             WHERE category IN ({placeholders})
               AND latitude BETWEEN ? AND ?
               AND longitude BETWEEN ? AND ?
             ORDER BY {CATEGORY_ORDER}"
        );
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;
            let hits = stmt
                .query_map(params_from_iter(values), row_to_location)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(hits = hits.len(), "Bounding box search complete");
            Ok(hits)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

fn conversion_error(
    column: usize,
    error: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        Box::new(error),
    )
}

fn row_to_location(row: &Row<'_>) -> rusqlite::Result<StoredLocation> {
    let category: String = row.get(1)?;
    let category = category
        .parse::<LocationCategory>()
        .map_err(|e| conversion_error(1, DomainError::InvalidCategory(e)))?;

    let created_at: String = row.get(7)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| conversion_error(7, e))?
        .with_timezone(&Utc);

    Ok(StoredLocation::restore(
        LocationId::new(row.get(0)?),
        category,
        row.get(2)?,
        GeoLocation::new_unchecked(row.get(3)?, row.get(4)?),
        row.get(5)?,
        row.get(6)?,
        created_at,
    ))
}

use std::path::Path;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use super::schema::SCHEMA;
use super::{AppFilter, AppPredicate, CategorySelector, DateField, NumericField, Store, StringField};
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::error!("Invalid date in database: '{}' - {}", s, e);
            None
        }
    }
}

fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        Ok(ts) => Some(ts),
        Err(e) => {
            tracing::error!("Invalid timestamp in database: '{}' - {}", s, e);
            None
        }
    }
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;

/// Unique collisions become AlreadyExists; a dangling category or
/// developer reference becomes BadRequest.
fn map_constraint(e: rusqlite::Error) -> Error {
    match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            if err.extended_code == SQLITE_CONSTRAINT_FOREIGNKEY {
                Error::BadRequest("unknown category or developer reference".to_string())
            } else {
                Error::AlreadyExists
            }
        }
        e => Error::from(e),
    }
}

const APP_COLUMNS: &str = "id, app_id, app_name, category_id, developer_id, rating, rating_count, \
     installs, min_installs, max_installs, free, price, currency, size, min_android, released, \
     last_updated, content_rating, ad_supported, in_app_purchases, editors_choice, scraped_time";

fn row_to_app(row: &rusqlite::Row<'_>) -> rusqlite::Result<App> {
    Ok(App {
        id: row.get(0)?,
        app_id: row.get(1)?,
        app_name: row.get(2)?,
        category_id: row.get(3)?,
        developer_id: row.get(4)?,
        rating: row.get(5)?,
        rating_count: row.get(6)?,
        installs: row.get(7)?,
        min_installs: row.get(8)?,
        max_installs: row.get(9)?,
        free: row.get(10)?,
        price: row.get(11)?,
        currency: row.get(12)?,
        size: row.get(13)?,
        min_android: row.get(14)?,
        released: row
            .get::<_, Option<String>>(15)?
            .as_deref()
            .and_then(parse_date),
        last_updated: row
            .get::<_, Option<String>>(16)?
            .as_deref()
            .and_then(parse_date),
        content_rating: row.get(17)?,
        ad_supported: row.get(18)?,
        in_app_purchases: row.get(19)?,
        editors_choice: row.get(20)?,
        scraped_time: row
            .get::<_, Option<String>>(21)?
            .as_deref()
            .and_then(parse_timestamp),
    })
}

/// Resolve the filter's category name against the categories table and
/// compile the predicate. An unresolvable name compiles to the zero-row
/// predicate, never to an unfiltered query.
fn compile_filter(conn: &Connection, filter: &AppFilter) -> Result<AppPredicate> {
    let selector = match filter.category.as_deref() {
        None => CategorySelector::Any,
        Some(name) => {
            let id: Option<i64> = conn
                .query_row(
                    "SELECT id FROM categories WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;
            id.map_or(CategorySelector::Unmatched, CategorySelector::Id)
        }
    };
    Ok(filter.compile(selector))
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Category operations

    fn create_category(&self, name: &str) -> Result<Category> {
        let conn = self.conn();
        conn.execute("INSERT INTO categories (name) VALUES (?1)", params![name])
            .map_err(map_constraint)?;
        Ok(Category {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name FROM categories WHERE id = ?1",
            params![id],
            |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name FROM categories WHERE name = ?1",
            params![name],
            |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY name")?;

        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_category(&self, category: &Category) -> Result<bool> {
        let rows = self
            .conn()
            .execute(
                "UPDATE categories SET name = ?1 WHERE id = ?2",
                params![category.name, category.id],
            )
            .map_err(map_constraint)?;
        Ok(rows > 0)
    }

    fn delete_category(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn count_category_apps(&self, id: i64) -> Result<i64> {
        let conn = self.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM apps WHERE category_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // Developer operations

    fn create_developer(&self, name: &str, email: &str) -> Result<Developer> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO developers (name, email) VALUES (?1, ?2)",
            params![name, email],
        )
        .map_err(map_constraint)?;
        Ok(Developer {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    fn get_developer(&self, id: i64) -> Result<Option<Developer>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, email FROM developers WHERE id = ?1",
            params![id],
            |row| {
                Ok(Developer {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_developer_by_email(&self, email: &str) -> Result<Option<Developer>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, email FROM developers WHERE email = ?1",
            params![email],
            |row| {
                Ok(Developer {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_developers(&self) -> Result<Vec<Developer>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, name, email FROM developers ORDER BY name")?;

        let rows = stmt.query_map([], |row| {
            Ok(Developer {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_developer(&self, developer: &Developer) -> Result<bool> {
        let rows = self
            .conn()
            .execute(
                "UPDATE developers SET name = ?1, email = ?2 WHERE id = ?3",
                params![developer.name, developer.email, developer.id],
            )
            .map_err(map_constraint)?;
        Ok(rows > 0)
    }

    fn delete_developer(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM developers WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn count_developer_apps(&self, id: i64) -> Result<i64> {
        let conn = self.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM apps WHERE developer_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // App operations

    fn create_app(&self, app: &App) -> Result<App> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO apps (app_id, app_name, category_id, developer_id, rating, rating_count,
                 installs, min_installs, max_installs, free, price, currency, size, min_android,
                 released, last_updated, content_rating, ad_supported, in_app_purchases,
                 editors_choice, scraped_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                 ?18, ?19, ?20, ?21)",
            params![
                app.app_id,
                app.app_name,
                app.category_id,
                app.developer_id,
                app.rating,
                app.rating_count,
                app.installs,
                app.min_installs,
                app.max_installs,
                app.free,
                app.price,
                app.currency,
                app.size,
                app.min_android,
                app.released.as_ref().map(format_date),
                app.last_updated.as_ref().map(format_date),
                app.content_rating,
                app.ad_supported,
                app.in_app_purchases,
                app.editors_choice,
                app.scraped_time.as_ref().map(format_timestamp),
            ],
        )
        .map_err(map_constraint)?;

        Ok(App {
            id: conn.last_insert_rowid(),
            ..app.clone()
        })
    }

    fn get_app(&self, id: i64) -> Result<Option<App>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {APP_COLUMNS} FROM apps WHERE id = ?1"),
            params![id],
            row_to_app,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_app_by_app_id(&self, app_id: &str) -> Result<Option<App>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {APP_COLUMNS} FROM apps WHERE app_id = ?1"),
            params![app_id],
            row_to_app,
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_app(&self, app: &App) -> Result<bool> {
        let rows = self
            .conn()
            .execute(
                "UPDATE apps SET app_id = ?1, app_name = ?2, category_id = ?3, developer_id = ?4,
                     rating = ?5, rating_count = ?6, installs = ?7, min_installs = ?8,
                     max_installs = ?9, free = ?10, price = ?11, currency = ?12, size = ?13,
                     min_android = ?14, released = ?15, last_updated = ?16, content_rating = ?17,
                     ad_supported = ?18, in_app_purchases = ?19, editors_choice = ?20,
                     scraped_time = ?21
                 WHERE id = ?22",
                params![
                    app.app_id,
                    app.app_name,
                    app.category_id,
                    app.developer_id,
                    app.rating,
                    app.rating_count,
                    app.installs,
                    app.min_installs,
                    app.max_installs,
                    app.free,
                    app.price,
                    app.currency,
                    app.size,
                    app.min_android,
                    app.released.as_ref().map(format_date),
                    app.last_updated.as_ref().map(format_date),
                    app.content_rating,
                    app.ad_supported,
                    app.in_app_purchases,
                    app.editors_choice,
                    app.scraped_time.as_ref().map(format_timestamp),
                    app.id,
                ],
            )
            .map_err(map_constraint)?;
        Ok(rows > 0)
    }

    fn delete_app(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM apps WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Query operations

    fn count_apps(&self, filter: &AppFilter) -> Result<i64> {
        let conn = self.conn();
        let predicate = compile_filter(&conn, filter)?;
        let sql = format!("SELECT COUNT(*) FROM apps{}", predicate.where_sql());
        let count: i64 = conn.query_row(&sql, params_from_iter(predicate.params()), |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    fn list_apps(&self, filter: &AppFilter, limit: i64, offset: i64) -> Result<Vec<App>> {
        let conn = self.conn();
        let predicate = compile_filter(&conn, filter)?;
        let sql = format!(
            "SELECT {APP_COLUMNS} FROM apps{} ORDER BY id LIMIT ? OFFSET ?",
            predicate.where_sql()
        );

        let mut binds = predicate.params();
        binds.push(Value::Integer(limit));
        binds.push(Value::Integer(offset));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(binds), row_to_app)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn distinct_strings(&self, field: StringField) -> Result<Vec<String>> {
        let conn = self.conn();
        let col = field.column();
        let sql = format!("SELECT DISTINCT {col} FROM apps WHERE {col} IS NOT NULL ORDER BY {col}");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn extremes(&self, field: NumericField) -> Result<(f64, f64)> {
        let conn = self.conn();
        let col = field.column();
        let sql = format!("SELECT MIN({col}), MAX({col}) FROM apps");

        let (min, max): (Option<f64>, Option<f64>) =
            conn.query_row(&sql, [], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let (empty_min, empty_max) = field.empty_bounds();
        Ok((min.unwrap_or(empty_min), max.unwrap_or(empty_max)))
    }

    fn rating_histogram(&self, filter: &AppFilter) -> Result<Vec<RatingBucket>> {
        let conn = self.conn();
        let predicate = compile_filter(&conn, filter)?;

        let mut conditions = vec!["rating IS NOT NULL".to_string()];
        if let Some(cond) = predicate.condition_sql() {
            conditions.push(cond);
        }
        let sql = format!(
            "SELECT ROUND(rating, 1) AS bucket, COUNT(*) FROM apps WHERE {}
             GROUP BY bucket ORDER BY bucket",
            conditions.join(" AND ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(predicate.params()), |row| {
            Ok(RatingBucket {
                rating: row.get(0)?,
                count: row.get(1)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn year_trend(&self, filter: &AppFilter, field: DateField) -> Result<Vec<YearCount>> {
        let conn = self.conn();
        let predicate = compile_filter(&conn, filter)?;
        let col = field.column();

        let mut conditions = vec![format!("{col} IS NOT NULL")];
        if let Some(cond) = predicate.condition_sql() {
            conditions.push(cond);
        }
        let sql = format!(
            "SELECT CAST(strftime('%Y', {col}) AS INTEGER) AS year, COUNT(*) FROM apps WHERE {}
             GROUP BY year ORDER BY year",
            conditions.join(" AND ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(predicate.params()), |row| {
            Ok(YearCount {
                year: row.get(0)?,
                count: row.get(1)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn average(&self, filter: &AppFilter, field: NumericField) -> Result<Option<f64>> {
        let conn = self.conn();
        let predicate = compile_filter(&conn, filter)?;
        let sql = format!(
            "SELECT AVG({}) FROM apps{}",
            field.column(),
            predicate.where_sql()
        );

        conn.query_row(&sql, params_from_iter(predicate.params()), |row| {
            row.get::<_, Option<f64>>(0)
        })
        .map_err(Error::from)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

//! SQLite-Implementierung des UserStore

use chrono::{DateTime, Utc};
use wordcraft_core::{UserId, Zugangsdaten};

use crate::error::{DbError, DbResult};
use crate::models::{BenutzerRecord, NeuerBenutzer};
use crate::repository::UserStore;
use crate::sqlite::pool::SqliteDb;

const SPALTEN: &str = "id, email, password_hash, password_salt, created_at";

impl UserStore for SqliteDb {
    async fn find_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM users WHERE email = ?");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn get(&self, id: UserId) -> DbResult<Option<BenutzerRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM users WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.inner())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn list(&self) -> DbResult<Vec<BenutzerRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM users ORDER BY id");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(row_to_benutzer).collect()
    }

    async fn add(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, password_salt, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(data.email)
        .bind(data.zugangsdaten.passwort_hash.as_slice())
        .bind(data.zugangsdaten.passwort_salt.as_slice())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| eindeutigkeit_abbilden(e, data.email))?;

        Ok(BenutzerRecord {
            id: UserId(result.last_insert_rowid()),
            email: data.email.to_string(),
            zugangsdaten: data.zugangsdaten.clone(),
            erstellt_am: now,
        })
    }

    async fn update(&self, record: &BenutzerRecord) -> DbResult<()> {
        let affected = sqlx::query(
            "UPDATE users SET email = ?, password_hash = ?, password_salt = ? WHERE id = ?",
        )
        .bind(&record.email)
        .bind(record.zugangsdaten.passwort_hash.as_slice())
        .bind(record.zugangsdaten.passwort_salt.as_slice())
        .bind(record.id.inner())
        .execute(&self.pool)
        .await
        .map_err(|e| eindeutigkeit_abbilden(e, &record.email))?
        .rows_affected();

        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("User {}", record.id)));
        }
        Ok(())
    }

    async fn remove(&self, id: UserId) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.inner())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}

/// UNIQUE-Verletzungen auf `email` als `DbError::Eindeutigkeit` melden
fn eindeutigkeit_abbilden(e: sqlx::Error, email: &str) -> DbError {
    let ist_unique = e
        .as_database_error()
        .map(|d| d.is_unique_violation())
        .unwrap_or(false);
    if ist_unique {
        DbError::Eindeutigkeit(format!("E-Mail '{email}' bereits vergeben"))
    } else {
        DbError::Sqlx(e)
    }
}

fn row_to_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    use sqlx::Row as _;

    let created_at_str: String = row.try_get("created_at")?;
    let erstellt_am = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| DbError::intern(format!("Ungueltige created_at '{created_at_str}': {e}")))?
        .with_timezone(&Utc);

    Ok(BenutzerRecord {
        id: UserId(row.try_get("id")?),
        email: row.try_get("email")?,
        zugangsdaten: Zugangsdaten {
            passwort_hash: row.try_get("password_hash")?,
            passwort_salt: row.try_get("password_salt")?,
        },
        erstellt_am,
    })
}

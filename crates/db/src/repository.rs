//! Repository-Trait-Definitionen
//!
//! Der `UserStore` entkoppelt den Auth-Service von der konkreten
//! Datenbank-Implementierung. Eindeutigkeit der E-Mail-Adresse muss der
//! Store selbst garantieren (die SQLite-Implementierung ueber einen
//! UNIQUE-Index), die Vorab-Pruefung im Service ist nur beratend.

use wordcraft_core::UserId;

use crate::error::DbResult;
use crate::models::{BenutzerRecord, NeuerBenutzer};

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://wordcraft.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://wordcraft.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Datenzugriff fuer Benutzerkonten
#[allow(async_fn_in_trait)]
pub trait UserStore: Send + Sync {
    /// Einen Benutzer anhand seiner E-Mail-Adresse laden
    async fn find_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>>;

    /// Einen Benutzer anhand seiner ID laden
    async fn get(&self, id: UserId) -> DbResult<Option<BenutzerRecord>>;

    /// Alle Benutzer laden, sortiert nach ID
    async fn list(&self) -> DbResult<Vec<BenutzerRecord>>;

    /// Einen neuen Benutzer anlegen
    ///
    /// Gibt `DbError::Eindeutigkeit` zurueck wenn die E-Mail bereits vergeben ist.
    async fn add(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord>;

    /// E-Mail und Zugangsdaten eines bestehenden Benutzers ueberschreiben
    async fn update(&self, record: &BenutzerRecord) -> DbResult<()>;

    /// Einen Benutzer loeschen, gibt `true` zurueck wenn er existierte
    async fn remove(&self, id: UserId) -> DbResult<bool>;
}

//! Datenbankmodelle fuer Wordcraft
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.

use chrono::{DateTime, Utc};
use wordcraft_core::{BenutzerIdentitaet, UserId, Zugangsdaten};

/// Benutzer-Datensatz aus der Datenbank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenutzerRecord {
    pub id: UserId,
    pub email: String,
    pub zugangsdaten: Zugangsdaten,
    pub erstellt_am: DateTime<Utc>,
}

impl BenutzerRecord {
    /// Oeffentliche Identitaet ohne Zugangsdaten
    pub fn identitaet(&self) -> BenutzerIdentitaet {
        BenutzerIdentitaet {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// Daten zum Erstellen eines neuen Benutzers
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub email: &'a str,
    pub zugangsdaten: &'a Zugangsdaten,
}

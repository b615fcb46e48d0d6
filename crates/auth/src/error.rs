//! Fehlertypen fuer den Auth-Service

use thiserror::Error;

/// Alle moeglichen Fehler im Auth-Service
///
/// Eine fehlgeschlagene Anmeldung ist kein Fehler, sondern `Ok(None)`.
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Eingaben ---
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    // --- Benutzerverwaltung ---
    #[error("Benutzername {0} ist bereits vergeben")]
    EmailVergeben(String),

    #[error("Benutzer nicht gefunden: {0}")]
    BenutzerNichtGefunden(String),

    // --- Gespeicherte Daten ---
    #[error("Gespeicherte Zugangsdaten beschaedigt: {0}")]
    ZugangsdatenBeschaedigt(String),

    // --- Token ---
    #[error("Token ungueltig")]
    TokenUngueltig,

    #[error("Token abgelaufen")]
    TokenAbgelaufen,

    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    // --- Datenbank ---
    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] wordcraft_db::DbError),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    pub fn ungueltige_eingabe(msg: impl Into<String>) -> Self {
        Self::UngueltigeEingabe(msg.into())
    }

    /// Token-Fehler werden nach aussen einheitlich als "nicht autorisiert" gemeldet
    pub fn ist_token_fehler(&self) -> bool {
        matches!(self, Self::TokenUngueltig | Self::TokenAbgelaufen)
    }

    /// Fehler, die der Aufrufer durch eine andere Eingabe beheben kann
    pub fn ist_client_fehler(&self) -> bool {
        matches!(
            self,
            Self::UngueltigeEingabe(_) | Self::EmailVergeben(_) | Self::BenutzerNichtGefunden(_)
        )
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;

//! wordcraft-core – Gemeinsame Typen und Fehlertypen
//!
//! Dieses Crate stellt die Bausteine bereit, die Datenbank-, Auth- und
//! REST-Crate gemeinsam nutzen: die Benutzer-ID, die oeffentliche
//! Identitaet eines Benutzers und das gespeicherte Passwort-Paar.

pub mod error;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{CoreError, Result};
pub use types::{BenutzerIdentitaet, UserId, Zugangsdaten};

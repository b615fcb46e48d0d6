//! Fehlertypen fuer wordcraft-core

use thiserror::Error;

/// Result-Alias fuer wordcraft-core
pub type Result<T> = std::result::Result<T, CoreError>;

/// Fehler beim Umgang mit den gemeinsamen Typen
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Ungueltige Benutzer-ID: '{0}'")]
    UngueltigeId(String),
}

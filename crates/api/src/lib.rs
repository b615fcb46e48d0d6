//! wordcraft-api – REST-Schnittstelle fuer Benutzerkonten
//!
//! Uebersetzt HTTP-Anfragen in Aufrufe des `AuthService` und dessen
//! Fehler in JSON-Antworten der Form `{"message": ...}`.

pub mod error;
pub mod rest;

pub use error::{ApiError, ApiResult};
pub use rest::{api_router, ApiState, RestServer, RestServerKonfig};

//! wordcraft-auth – Zugangsdaten- und Token-Service
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit HMAC-SHA512 (Salt = HMAC-Schluessel)
//! - Signierte, zeitlich begrenzte Tokens (JWT, HS256)
//! - AuthService (Anmeldung, Registrierung, Zugangsdaten aendern, Loeschen)

pub mod error;
pub mod password;
pub mod service;
pub mod token;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult};
pub use password::{passwort_verifizieren, zugangsdaten_ableiten};
pub use service::{Anmeldung, AuthService};
pub use token::{AppSecret, TokenIssuer};

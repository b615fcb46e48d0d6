//! Fehlertypen fuer die REST-Schnittstelle

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use wordcraft_auth::AuthError;

use crate::rest::middleware::fehler_antwort;

/// Generische Antwort bei fehlgeschlagener Anmeldung; verraet nicht, ob die
/// E-Mail unbekannt oder das Passwort falsch war
pub const ANMELDUNG_FEHLGESCHLAGEN: &str = "Benutzername oder Passwort ist falsch";

/// Alle moeglichen Fehler der REST-Schnittstelle
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Nicht autorisiert")]
    NichtAutorisiert,

    #[error("{0}")]
    UngueltigeEingabe(String),

    #[error("{0}")]
    NichtGefunden(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP-Statuscode fuer den Fehler
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NichtAutorisiert => StatusCode::UNAUTHORIZED,
            Self::UngueltigeEingabe(_) => StatusCode::BAD_REQUEST,
            Self::NichtGefunden(_) => StatusCode::NOT_FOUND,
            Self::Auth(e) if e.ist_token_fehler() => StatusCode::UNAUTHORIZED,
            Self::Auth(AuthError::BenutzerNichtGefunden(_)) => StatusCode::NOT_FOUND,
            Self::Auth(e) if e.ist_client_fehler() => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Nachricht fuer den Client; interne Details bleiben im Log
    pub fn nachricht(&self) -> String {
        if self.http_status() == StatusCode::UNAUTHORIZED {
            return "Nicht autorisiert".to_string();
        }
        if self.http_status().is_server_error() {
            return "Interner Serverfehler".to_string();
        }
        self.to_string()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!(fehler = %self, "Anfrage mit internem Fehler abgebrochen");
        }
        fehler_antwort(status, &self.nachricht())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordcraft_db::DbError;

    #[test]
    fn statuscodes() {
        assert_eq!(ApiError::NichtAutorisiert.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(AuthError::TokenAbgelaufen).http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::EmailVergeben("a@b.de".into())).http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AuthError::ungueltige_eingabe("Passwort ist erforderlich")).http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AuthError::BenutzerNichtGefunden("7".into())).http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(AuthError::ZugangsdatenBeschaedigt("x".into())).http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn nachricht_traegt_fachlichen_grund() {
        let e = ApiError::from(AuthError::EmailVergeben("a@b.de".into()));
        assert_eq!(e.nachricht(), "Benutzername a@b.de ist bereits vergeben");
    }

    #[test]
    fn interne_details_werden_nicht_ausgegeben() {
        let e = ApiError::from(AuthError::Datenbank(DbError::intern("disk voll")));
        assert_eq!(e.nachricht(), "Interner Serverfehler");

        let e = ApiError::from(AuthError::TokenAbgelaufen);
        assert_eq!(e.nachricht(), "Nicht autorisiert");
    }
}

//! Axum-Middleware und Extraktoren fuer die Authentifizierung

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde_json::json;
use wordcraft_auth::AuthError;
use wordcraft_core::BenutzerIdentitaet;

use crate::error::ApiError;
use crate::rest::ApiState;

/// Fehlerantwort fuer die REST-API
pub fn fehler_antwort(status: StatusCode, nachricht: &str) -> Response {
    (status, Json(json!({ "message": nachricht }))).into_response()
}

/// Extrahiert Bearer-Token aus Authorization-Header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Der per Bearer-Token authentifizierte Benutzer
///
/// Das Token wird bei jeder Anfrage geprueft und der Benutzer neu geladen,
/// sodass Tokens geloeschter Konten sofort ungueltig sind.
#[derive(Debug, Clone)]
pub struct AuthBenutzer(pub BenutzerIdentitaet);

#[async_trait]
impl FromRequestParts<ApiState> for AuthBenutzer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, ApiError> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::NichtAutorisiert)?;

        match state.auth.token_validieren(token, Utc::now()).await {
            Ok(identitaet) => Ok(AuthBenutzer(identitaet)),
            Err(e) if e.ist_token_fehler() => {
                tracing::debug!(fehler = %e, "Token abgelehnt");
                Err(ApiError::NichtAutorisiert)
            }
            Err(AuthError::BenutzerNichtGefunden(id)) => {
                tracing::debug!(user_id = %id, "Token eines geloeschten Kontos abgelehnt");
                Err(ApiError::NichtAutorisiert)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_extrahieren() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_static("Bearer mein_token_123"),
        );
        assert_eq!(bearer_token(&headers), Some("mein_token_123"));
    }

    #[test]
    fn bearer_token_fehlt() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn bearer_token_falsches_schema() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic YTpi"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn fehler_antwort_status() {
        let antwort = fehler_antwort(StatusCode::BAD_REQUEST, "kaputt");
        assert_eq!(antwort.status(), StatusCode::BAD_REQUEST);
    }
}

//! REST-Handler fuer Benutzer-Endpunkte

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use wordcraft_core::{BenutzerIdentitaet, UserId};
use wordcraft_observability::AnmeldeErgebnis;

use crate::error::{ApiError, ApiResult, ANMELDUNG_FEHLGESCHLAGEN};
use crate::rest::middleware::AuthBenutzer;
use crate::rest::ApiState;

/// Body fuer Anmeldung und Registrierung
#[derive(Debug, Deserialize)]
pub struct ZugangsdatenBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body fuer `PUT /users/:id`; fehlende Felder bleiben unveraendert
#[derive(Debug, Default, Deserialize)]
pub struct AenderungBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Oeffentliche Sicht auf einen Benutzer
#[derive(Debug, Serialize, Deserialize)]
pub struct BenutzerDto {
    pub id: i64,
    pub email: String,
}

impl From<BenutzerIdentitaet> for BenutzerDto {
    fn from(i: BenutzerIdentitaet) -> Self {
        Self {
            id: i.id.inner(),
            email: i.email,
        }
    }
}

/// Antwort auf eine erfolgreiche Anmeldung
#[derive(Debug, Serialize, Deserialize)]
pub struct AnmeldungDto {
    pub id: i64,
    pub email: String,
    pub token: String,
}

fn user_id_parsen(roh: &str) -> ApiResult<UserId> {
    roh.parse()
        .map_err(|e: wordcraft_core::CoreError| ApiError::UngueltigeEingabe(e.to_string()))
}

/// POST /users/authenticate
pub async fn authenticate(
    State(state): State<ApiState>,
    Json(body): Json<ZugangsdatenBody>,
) -> ApiResult<Json<AnmeldungDto>> {
    let ergebnis = state
        .auth
        .anmelden(&body.email, &body.password, Utc::now())
        .await;

    match ergebnis {
        Ok(Some(anmeldung)) => {
            state.metriken.anmeldung_zaehlen(AnmeldeErgebnis::Erfolg);
            Ok(Json(AnmeldungDto {
                id: anmeldung.identitaet.id.inner(),
                email: anmeldung.identitaet.email,
                token: anmeldung.token,
            }))
        }
        Ok(None) => {
            state.metriken.anmeldung_zaehlen(AnmeldeErgebnis::Abgelehnt);
            Err(ApiError::UngueltigeEingabe(
                ANMELDUNG_FEHLGESCHLAGEN.to_string(),
            ))
        }
        Err(e) => {
            state.metriken.anmeldung_zaehlen(AnmeldeErgebnis::Fehler);
            Err(e.into())
        }
    }
}

/// POST /users/register
pub async fn register(
    State(state): State<ApiState>,
    Json(body): Json<ZugangsdatenBody>,
) -> ApiResult<Json<BenutzerDto>> {
    let identitaet = state.auth.registrieren(&body.email, &body.password).await?;
    state.metriken.registrierung_zaehlen();
    Ok(Json(identitaet.into()))
}

/// GET /users
pub async fn list_users(State(state): State<ApiState>) -> ApiResult<Json<Vec<BenutzerDto>>> {
    let alle = state.auth.alle().await?;
    Ok(Json(alle.into_iter().map(BenutzerDto::from).collect()))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<ApiState>,
    AuthBenutzer(_aufrufer): AuthBenutzer,
    Path(id): Path<String>,
) -> ApiResult<Json<BenutzerDto>> {
    let id = user_id_parsen(&id)?;
    state
        .auth
        .laden(id)
        .await?
        .map(|i| Json(i.into()))
        .ok_or_else(|| ApiError::NichtGefunden(format!("Benutzer {id} nicht gefunden")))
}

/// PUT /users/:id
pub async fn update_user(
    State(state): State<ApiState>,
    AuthBenutzer(aufrufer): AuthBenutzer,
    Path(id): Path<String>,
    Json(body): Json<AenderungBody>,
) -> ApiResult<StatusCode> {
    let id = user_id_parsen(&id)?;
    tracing::debug!(aufrufer = %aufrufer.id, user_id = %id, "Zugangsdaten aendern");

    state
        .auth
        .zugangsdaten_aendern(id, body.email.as_deref(), body.password.as_deref())
        .await?;
    Ok(StatusCode::OK)
}

/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<ApiState>,
    AuthBenutzer(aufrufer): AuthBenutzer,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = user_id_parsen(&id)?;
    tracing::debug!(aufrufer = %aufrufer.id, user_id = %id, "Benutzer loeschen");

    state.auth.loeschen(id).await?;
    Ok(StatusCode::OK)
}

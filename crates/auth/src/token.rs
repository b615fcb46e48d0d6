//! Signierte Zugangs-Tokens
//!
//! Tokens sind kompakte JWTs (HS256), signiert mit dem prozessweiten
//! `AppSecret`. Der Claim `sub` enthaelt die Benutzer-ID als String,
//! `exp` liegt standardmaessig sieben Tage nach der Ausstellung.
//!
//! Die Uhrzeit wird immer explizit uebergeben; die eingebaute
//! Ablaufpruefung von `jsonwebtoken` ist deaktiviert.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use wordcraft_core::{BenutzerIdentitaet, UserId};

use crate::error::{AuthError, AuthResult};

/// Standard-Gueltigkeit eines Tokens: 7 Tage
pub const TOKEN_GUELTIGKEIT_TAGE: i64 = 7;

/// Mindestlaenge des Signaturschluessels (128 Bit)
pub const MIN_SECRET_LAENGE: usize = 16;

/// Prozessweiter Signaturschluessel
///
/// Wird einmal beim Start geladen und danach nur gelesen.
#[derive(Clone)]
pub struct AppSecret(Arc<[u8]>);

impl AppSecret {
    /// Erstellt ein AppSecret aus den Bytes des konfigurierten Schluessels
    pub fn neu(secret: impl AsRef<[u8]>) -> AuthResult<Self> {
        let bytes = secret.as_ref();
        if bytes.len() < MIN_SECRET_LAENGE {
            return Err(AuthError::Konfiguration(format!(
                "AppSecret zu kurz: {} Bytes, mindestens {MIN_SECRET_LAENGE} erforderlich",
                bytes.len()
            )));
        }
        Ok(Self(Arc::from(bytes)))
    }

    fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AppSecret(<{} Bytes>)", self.0.len())
    }
}

/// Claims eines Wordcraft-Tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Benutzer-ID als String
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

/// Stellt Tokens aus und prueft sie
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    gueltigkeit: Duration,
}

impl TokenIssuer {
    /// Erstellt einen TokenIssuer mit der Standard-Gueltigkeit von 7 Tagen
    pub fn neu(secret: &AppSecret) -> Self {
        Self::mit_gueltigkeit(secret, Duration::days(TOKEN_GUELTIGKEIT_TAGE))
    }

    /// Erstellt einen TokenIssuer mit abweichender Gueltigkeit
    pub fn mit_gueltigkeit(secret: &AppSecret, gueltigkeit: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.bytes()),
            decoding: DecodingKey::from_secret(secret.bytes()),
            gueltigkeit,
        }
    }

    pub fn gueltigkeit(&self) -> Duration {
        self.gueltigkeit
    }

    /// Stellt ein signiertes Token fuer den Benutzer aus
    pub fn ausstellen(
        &self,
        subjekt: &BenutzerIdentitaet,
        jetzt: DateTime<Utc>,
    ) -> AuthResult<String> {
        let ablauf = jetzt.checked_add_signed(self.gueltigkeit).ok_or_else(|| {
            AuthError::intern(format!(
                "Ablaufzeitpunkt ausserhalb des Datumsbereichs (Gueltigkeit {})",
                self.gueltigkeit
            ))
        })?;

        let claims = Claims {
            sub: subjekt.id.to_string(),
            iat: jetzt.timestamp(),
            nbf: jetzt.timestamp(),
            exp: ablauf.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::intern(format!("Token-Signatur fehlgeschlagen: {e}")))
    }

    /// Prueft Signatur und Ablauf eines Tokens und gibt die Benutzer-ID zurueck
    ///
    /// Gibt `AuthError::TokenUngueltig` bei falscher Signatur oder
    /// unlesbarem Token zurueck, `AuthError::TokenAbgelaufen` wenn `jetzt`
    /// den Ablaufzeitpunkt erreicht hat. Ob der Benutzer noch existiert,
    /// prueft der Aufrufer.
    pub fn pruefen(&self, token: &str, jetzt: DateTime<Utc>) -> AuthResult<UserId> {
        let claims = self.claims_lesen(token)?;

        let zeitpunkt = jetzt.timestamp();
        if zeitpunkt >= claims.exp {
            return Err(AuthError::TokenAbgelaufen);
        }
        if zeitpunkt < claims.nbf {
            tracing::debug!(nbf = claims.nbf, jetzt = zeitpunkt, "Token noch nicht gueltig");
            return Err(AuthError::TokenUngueltig);
        }

        claims.sub.parse::<UserId>().map_err(|_| AuthError::TokenUngueltig)
    }

    fn claims_lesen(&self, token: &str) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|daten| daten.claims)
            .map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => {
                        tracing::debug!("Token-Signatur ungueltig")
                    }
                    andere => tracing::debug!(fehler = ?andere, "Token nicht lesbar"),
                }
                AuthError::TokenUngueltig
            })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("gueltigkeit", &self.gueltigkeit)
            .finish_non_exhaustive()
    }
}

//! Auth-Service fuer Wordcraft
//!
//! Zentraler Service fuer Anmeldung, Registrierung, Aenderung der
//! Zugangsdaten und Loeschen von Benutzerkonten. Nutzt den `UserStore`,
//! den Passwort-Hasher und den TokenIssuer.
//!
//! Die Pruefung auf doppelte E-Mail-Adressen vor dem Schreiben ist nur
//! beratend: zwei gleichzeitige Registrierungen koennen sie beide bestehen.
//! Den Ausschlag gibt der UNIQUE-Index des Stores, dessen Fehler hier als
//! `AuthError::EmailVergeben` gemeldet wird.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use wordcraft_core::{BenutzerIdentitaet, UserId, Zugangsdaten};
use wordcraft_db::{models::NeuerBenutzer, DbError, UserStore};

use crate::{
    error::{AuthError, AuthResult},
    password::{attrappe, passwort_verifizieren, zugangsdaten_ableiten},
    token::TokenIssuer,
};

/// Ergebnis einer erfolgreichen Anmeldung
#[derive(Debug, Clone)]
pub struct Anmeldung {
    pub identitaet: BenutzerIdentitaet,
    pub token: String,
}

/// Auth-Service – zentraler Einstiegspunkt fuer alle Kontovorgaenge
pub struct AuthService<U: UserStore> {
    store: Arc<U>,
    tokens: TokenIssuer,
    /// Vergleichsdaten fuer unbekannte E-Mail-Adressen
    attrappe: Zugangsdaten,
}

impl<U: UserStore> AuthService<U> {
    /// Erstellt einen neuen AuthService
    pub fn neu(store: Arc<U>, tokens: TokenIssuer) -> Self {
        Self {
            store,
            tokens,
            attrappe: attrappe(),
        }
    }

    pub fn store(&self) -> &Arc<U> {
        &self.store
    }

    /// Prueft E-Mail und Passwort
    ///
    /// Gibt `Ok(None)` zurueck wenn die E-Mail unbekannt oder das Passwort
    /// falsch ist; beide Faelle sind von aussen nicht unterscheidbar.
    pub async fn authentifizieren(
        &self,
        email: &str,
        passwort: &str,
    ) -> AuthResult<Option<BenutzerIdentitaet>> {
        if email.is_empty() || passwort.is_empty() {
            return Ok(None);
        }

        let benutzer = self.store.find_by_email(email).await?;

        // Unbekannte E-Mail: gleicher HMAC-Aufwand gegen die Attrappe
        let zugangsdaten = benutzer
            .as_ref()
            .map(|b| &b.zugangsdaten)
            .unwrap_or(&self.attrappe);

        let korrekt = passwort_verifizieren(passwort, zugangsdaten).inspect_err(|e| {
            if let AuthError::ZugangsdatenBeschaedigt(grund) = e {
                tracing::error!(
                    user_id = ?benutzer.as_ref().map(|b| b.id.inner()),
                    grund = %grund,
                    "Gespeicherte Zugangsdaten verletzen Laengen-Invariante"
                );
            }
        })?;

        match benutzer {
            Some(b) if korrekt => Ok(Some(b.identitaet())),
            _ => {
                tracing::warn!("Fehlgeschlagener Anmeldeversuch");
                Ok(None)
            }
        }
    }

    /// Meldet einen Benutzer an und stellt ein Token aus
    pub async fn anmelden(
        &self,
        email: &str,
        passwort: &str,
        jetzt: DateTime<Utc>,
    ) -> AuthResult<Option<Anmeldung>> {
        let Some(identitaet) = self.authentifizieren(email, passwort).await? else {
            return Ok(None);
        };

        let token = self.tokens.ausstellen(&identitaet, jetzt)?;

        tracing::info!(user_id = %identitaet.id, "Benutzer angemeldet");

        Ok(Some(Anmeldung { identitaet, token }))
    }

    /// Validiert ein Token und laedt den zugehoerigen Benutzer neu
    ///
    /// Tokens geloeschter Konten werden mit `AuthError::BenutzerNichtGefunden`
    /// abgelehnt.
    pub async fn token_validieren(
        &self,
        token: &str,
        jetzt: DateTime<Utc>,
    ) -> AuthResult<BenutzerIdentitaet> {
        let id = self.tokens.pruefen(token, jetzt)?;

        self.store
            .get(id)
            .await?
            .map(|b| b.identitaet())
            .ok_or_else(|| AuthError::BenutzerNichtGefunden(id.to_string()))
    }

    /// Registriert einen neuen Benutzer
    pub async fn registrieren(
        &self,
        email: &str,
        passwort: &str,
    ) -> AuthResult<BenutzerIdentitaet> {
        if passwort.trim().is_empty() {
            return Err(AuthError::ungueltige_eingabe("Passwort ist erforderlich"));
        }
        if email.trim().is_empty() {
            return Err(AuthError::ungueltige_eingabe("E-Mail ist erforderlich"));
        }

        if self.store.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailVergeben(email.to_string()));
        }

        let zugangsdaten = zugangsdaten_ableiten(passwort)?;

        let benutzer = self
            .store
            .add(NeuerBenutzer {
                email,
                zugangsdaten: &zugangsdaten,
            })
            .await
            .map_err(|e| email_konflikt(e, email))?;

        tracing::info!(user_id = %benutzer.id, "Neuer Benutzer registriert");

        Ok(benutzer.identitaet())
    }

    /// Aendert E-Mail und/oder Passwort eines Benutzers
    ///
    /// Fehlende oder leere Felder bleiben unveraendert. Ein neues Passwort
    /// erhaelt immer einen frischen Salt.
    pub async fn zugangsdaten_aendern(
        &self,
        user_id: UserId,
        neue_email: Option<&str>,
        neues_passwort: Option<&str>,
    ) -> AuthResult<()> {
        let mut benutzer = self
            .store
            .get(user_id)
            .await?
            .ok_or_else(|| AuthError::BenutzerNichtGefunden(user_id.to_string()))?;

        if let Some(email) = neue_email.filter(|e| !e.trim().is_empty()) {
            if email != benutzer.email {
                if self.store.find_by_email(email).await?.is_some() {
                    return Err(AuthError::EmailVergeben(email.to_string()));
                }
                benutzer.email = email.to_string();
            }
        }

        if let Some(passwort) = neues_passwort.filter(|p| !p.trim().is_empty()) {
            benutzer.zugangsdaten = zugangsdaten_ableiten(passwort)?;
        }

        self.store
            .update(&benutzer)
            .await
            .map_err(|e| match e {
                DbError::NichtGefunden(_) => AuthError::BenutzerNichtGefunden(user_id.to_string()),
                andere => email_konflikt(andere, &benutzer.email),
            })?;

        tracing::info!(user_id = %user_id, "Zugangsdaten aktualisiert");

        Ok(())
    }

    /// Loescht einen Benutzer; unbekannte IDs sind kein Fehler
    pub async fn loeschen(&self, user_id: UserId) -> AuthResult<()> {
        if self.store.get(user_id).await?.is_none() {
            tracing::debug!(user_id = %user_id, "Loeschen: Benutzer existiert nicht");
            return Ok(());
        }

        self.store.remove(user_id).await?;
        tracing::info!(user_id = %user_id, "Benutzer geloescht");
        Ok(())
    }

    /// Alle Benutzer als oeffentliche Identitaeten
    pub async fn alle(&self) -> AuthResult<Vec<BenutzerIdentitaet>> {
        let benutzer = self.store.list().await?;
        Ok(benutzer.iter().map(|b| b.identitaet()).collect())
    }

    /// Einen Benutzer als oeffentliche Identitaet laden
    pub async fn laden(&self, user_id: UserId) -> AuthResult<Option<BenutzerIdentitaet>> {
        Ok(self.store.get(user_id).await?.map(|b| b.identitaet()))
    }
}

/// UNIQUE-Verletzungen des Stores als `EmailVergeben` melden
fn email_konflikt(e: DbError, email: &str) -> AuthError {
    if e.ist_eindeutigkeit() {
        AuthError::EmailVergeben(email.to_string())
    } else {
        AuthError::Datenbank(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Mutex;
    use wordcraft_db::{models::BenutzerRecord, DbResult};

    use crate::token::AppSecret;

    // Minimaler In-Memory UserStore fuer Tests
    #[derive(Default)]
    struct TestUserStore {
        benutzer: Mutex<Vec<BenutzerRecord>>,
        naechste_id: Mutex<i64>,
    }

    impl UserStore for TestUserStore {
        async fn find_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
            Ok(self.benutzer.lock().unwrap().iter().find(|u| u.email == email).cloned())
        }

        async fn get(&self, id: UserId) -> DbResult<Option<BenutzerRecord>> {
            Ok(self.benutzer.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }

        async fn list(&self) -> DbResult<Vec<BenutzerRecord>> {
            Ok(self.benutzer.lock().unwrap().clone())
        }

        async fn add(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
            let mut benutzer = self.benutzer.lock().unwrap();
            if benutzer.iter().any(|u| u.email == data.email) {
                return Err(DbError::Eindeutigkeit(data.email.to_string()));
            }
            let mut id = self.naechste_id.lock().unwrap();
            *id += 1;
            let record = BenutzerRecord {
                id: UserId(*id),
                email: data.email.to_string(),
                zugangsdaten: data.zugangsdaten.clone(),
                erstellt_am: Utc::now(),
            };
            benutzer.push(record.clone());
            Ok(record)
        }

        async fn update(&self, record: &BenutzerRecord) -> DbResult<()> {
            let mut benutzer = self.benutzer.lock().unwrap();
            let user = benutzer
                .iter_mut()
                .find(|u| u.id == record.id)
                .ok_or_else(|| DbError::nicht_gefunden(record.id.to_string()))?;
            *user = record.clone();
            Ok(())
        }

        async fn remove(&self, id: UserId) -> DbResult<bool> {
            let mut benutzer = self.benutzer.lock().unwrap();
            let vorher = benutzer.len();
            benutzer.retain(|u| u.id != id);
            Ok(benutzer.len() < vorher)
        }
    }

    // Store, der das Rennen nach der Vorab-Pruefung verliert: die E-Mail
    // erscheint frei, Schreiben scheitert am UNIQUE-Index
    struct KonfliktStore {
        vorhanden: BenutzerRecord,
    }

    impl KonfliktStore {
        fn neu() -> Self {
            Self {
                vorhanden: BenutzerRecord {
                    id: UserId(1),
                    email: "erst@x.com".into(),
                    zugangsdaten: zugangsdaten_ableiten("passwort").unwrap(),
                    erstellt_am: Utc::now(),
                },
            }
        }
    }

    impl UserStore for KonfliktStore {
        async fn find_by_email(&self, _email: &str) -> DbResult<Option<BenutzerRecord>> {
            Ok(None)
        }

        async fn get(&self, id: UserId) -> DbResult<Option<BenutzerRecord>> {
            Ok((id == self.vorhanden.id).then(|| self.vorhanden.clone()))
        }

        async fn list(&self) -> DbResult<Vec<BenutzerRecord>> {
            Ok(vec![self.vorhanden.clone()])
        }

        async fn add(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
            Err(DbError::Eindeutigkeit(data.email.to_string()))
        }

        async fn update(&self, record: &BenutzerRecord) -> DbResult<()> {
            Err(DbError::Eindeutigkeit(record.email.clone()))
        }

        async fn remove(&self, _id: UserId) -> DbResult<bool> {
            Ok(false)
        }
    }

    fn konflikt_service() -> AuthService<KonfliktStore> {
        let secret = AppSecret::neu("test-secret-fuer-tokens").unwrap();
        AuthService::neu(Arc::new(KonfliktStore::neu()), TokenIssuer::neu(&secret))
    }

    #[tokio::test]
    async fn registrieren_eindeutigkeit_im_store_ist_email_vergeben() {
        let service = konflikt_service();

        let ergebnis = service.registrieren("parallel@x.com", "passwort").await;
        match ergebnis {
            Err(AuthError::EmailVergeben(email)) => assert_eq!(email, "parallel@x.com"),
            anderes => panic!("EmailVergeben erwartet, war {anderes:?}"),
        }
    }

    #[tokio::test]
    async fn aendern_eindeutigkeit_im_store_ist_email_vergeben() {
        let service = konflikt_service();

        let ergebnis = service
            .zugangsdaten_aendern(UserId(1), Some("parallel@x.com"), None)
            .await;
        match ergebnis {
            Err(AuthError::EmailVergeben(email)) => assert_eq!(email, "parallel@x.com"),
            anderes => panic!("EmailVergeben erwartet, war {anderes:?}"),
        }
    }

    fn test_service() -> AuthService<TestUserStore> {
        let secret = AppSecret::neu("test-secret-fuer-tokens").unwrap();
        AuthService::neu(Arc::new(TestUserStore::default()), TokenIssuer::neu(&secret))
    }

    async fn gespeichert(service: &AuthService<TestUserStore>, id: UserId) -> BenutzerRecord {
        service.store().get(id).await.unwrap().expect("Benutzer fehlt")
    }

    #[tokio::test]
    async fn registrieren_und_authentifizieren() {
        let service = test_service();

        let user = service
            .registrieren("real@x.com", "sicheres_passwort!")
            .await
            .expect("Registrierung fehlgeschlagen");
        assert_eq!(user.email, "real@x.com");

        let angemeldet = service
            .authentifizieren("real@x.com", "sicheres_passwort!")
            .await
            .unwrap()
            .expect("Anmeldung muss gelingen");
        assert_eq!(angemeldet, user);
    }

    #[tokio::test]
    async fn unbekannte_email_und_falsches_passwort_gleich() {
        let service = test_service();
        service.registrieren("real@x.com", "richtig").await.unwrap();

        let unbekannt = service.authentifizieren("nobody@x.com", "anything").await;
        let falsch = service.authentifizieren("real@x.com", "wrongpass").await;

        assert!(matches!(unbekannt, Ok(None)));
        assert!(matches!(falsch, Ok(None)));
    }

    #[tokio::test]
    async fn leere_eingaben_sind_kein_treffer() {
        let service = test_service();
        service.registrieren("real@x.com", "richtig").await.unwrap();

        assert!(service.authentifizieren("", "richtig").await.unwrap().is_none());
        assert!(service.authentifizieren("real@x.com", "").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn beschaedigte_zugangsdaten_sind_fehler() {
        let service = test_service();
        let user = service.registrieren("kaputt@x.com", "passwort").await.unwrap();

        let mut record = gespeichert(&service, user.id).await;
        record.zugangsdaten.passwort_salt.truncate(10);
        service.store().update(&record).await.unwrap();

        let ergebnis = service.authentifizieren("kaputt@x.com", "passwort").await;
        assert!(matches!(ergebnis, Err(AuthError::ZugangsdatenBeschaedigt(_))));
    }

    #[tokio::test]
    async fn doppelte_registrierung_schlaegt_fehl() {
        let service = test_service();
        let erster = service.registrieren("dup@x.com", "passwort").await.unwrap();
        let vorher = gespeichert(&service, erster.id).await;

        let ergebnis = service.registrieren("dup@x.com", "anderes").await;
        assert!(matches!(ergebnis, Err(AuthError::EmailVergeben(_))));

        // Erster Benutzer bleibt unberuehrt
        let nachher = gespeichert(&service, erster.id).await;
        assert_eq!(vorher, nachher);
        assert!(service
            .authentifizieren("dup@x.com", "passwort")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn registrieren_ohne_passwort_abgelehnt() {
        let service = test_service();
        for passwort in ["", "   "] {
            let ergebnis = service.registrieren("a@x.com", passwort).await;
            assert!(matches!(ergebnis, Err(AuthError::UngueltigeEingabe(_))));
        }
        assert!(service.alle().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn registrieren_ohne_email_abgelehnt() {
        let service = test_service();
        let ergebnis = service.registrieren("  ", "passwort").await;
        assert!(matches!(ergebnis, Err(AuthError::UngueltigeEingabe(_))));
    }

    #[tokio::test]
    async fn nur_email_aendern_laesst_zugangsdaten_unveraendert() {
        let service = test_service();
        let user = service.registrieren("alt@x.com", "passwort").await.unwrap();
        let vorher = gespeichert(&service, user.id).await;

        service
            .zugangsdaten_aendern(user.id, Some("neu@x.com"), None)
            .await
            .unwrap();

        let nachher = gespeichert(&service, user.id).await;
        assert_eq!(nachher.email, "neu@x.com");
        assert_eq!(nachher.zugangsdaten.passwort_hash, vorher.zugangsdaten.passwort_hash);
        assert_eq!(nachher.zugangsdaten.passwort_salt, vorher.zugangsdaten.passwort_salt);
        assert!(service
            .authentifizieren("neu@x.com", "passwort")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn passwort_aendern_erzeugt_frischen_salt() {
        let service = test_service();
        let user = service.registrieren("pw@x.com", "altes_pw").await.unwrap();
        let vorher = gespeichert(&service, user.id).await;

        service
            .zugangsdaten_aendern(user.id, None, Some("neues_pw"))
            .await
            .unwrap();

        let nachher = gespeichert(&service, user.id).await;
        assert_eq!(nachher.email, "pw@x.com");
        assert_ne!(nachher.zugangsdaten.passwort_salt, vorher.zugangsdaten.passwort_salt);

        // Altes Passwort funktioniert nicht mehr
        assert!(service.authentifizieren("pw@x.com", "altes_pw").await.unwrap().is_none());
        // Neues Passwort funktioniert
        assert!(service.authentifizieren("pw@x.com", "neues_pw").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn leere_felder_bleiben_unveraendert() {
        let service = test_service();
        let user = service.registrieren("fest@x.com", "passwort").await.unwrap();
        let vorher = gespeichert(&service, user.id).await;

        service
            .zugangsdaten_aendern(user.id, Some(" "), Some(""))
            .await
            .unwrap();
        service.zugangsdaten_aendern(user.id, None, None).await.unwrap();

        assert_eq!(gespeichert(&service, user.id).await, vorher);
    }

    #[tokio::test]
    async fn email_aendern_auf_vergebene_email() {
        let service = test_service();
        service.registrieren("eins@x.com", "passwort").await.unwrap();
        let zwei = service.registrieren("zwei@x.com", "passwort").await.unwrap();

        let ergebnis = service
            .zugangsdaten_aendern(zwei.id, Some("eins@x.com"), None)
            .await;
        assert!(matches!(ergebnis, Err(AuthError::EmailVergeben(_))));

        // Gleiche E-Mail wie bisher ist kein Konflikt
        service
            .zugangsdaten_aendern(zwei.id, Some("zwei@x.com"), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn aendern_unbekannter_benutzer() {
        let service = test_service();
        let ergebnis = service
            .zugangsdaten_aendern(UserId(404), Some("x@x.com"), None)
            .await;
        assert!(matches!(ergebnis, Err(AuthError::BenutzerNichtGefunden(_))));
    }

    #[tokio::test]
    async fn loeschen_ist_idempotent() {
        let service = test_service();
        let user = service.registrieren("weg@x.com", "passwort").await.unwrap();

        service.loeschen(user.id).await.unwrap();
        assert!(service.laden(user.id).await.unwrap().is_none());

        // Zweites Loeschen und unbekannte ID sind kein Fehler
        service.loeschen(user.id).await.unwrap();
        service.loeschen(UserId(12345)).await.unwrap();
    }

    #[tokio::test]
    async fn anmelden_stellt_pruefbares_token_aus() {
        let service = test_service();
        let user = service.registrieren("token@x.com", "passwort").await.unwrap();
        let jetzt = Utc::now();

        let anmeldung = service
            .anmelden("token@x.com", "passwort", jetzt)
            .await
            .unwrap()
            .expect("Anmeldung muss gelingen");
        assert_eq!(anmeldung.identitaet, user);

        let validiert = service
            .token_validieren(&anmeldung.token, jetzt + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(validiert, user);
    }

    #[tokio::test]
    async fn anmelden_mit_falschem_passwort_ohne_token() {
        let service = test_service();
        service.registrieren("token@x.com", "passwort").await.unwrap();

        let anmeldung = service
            .anmelden("token@x.com", "falsch", Utc::now())
            .await
            .unwrap();
        assert!(anmeldung.is_none());
    }

    #[tokio::test]
    async fn token_eines_geloeschten_kontos_abgelehnt() {
        let service = test_service();
        let user = service.registrieren("geloescht@x.com", "passwort").await.unwrap();
        let jetzt = Utc::now();
        let anmeldung = service
            .anmelden("geloescht@x.com", "passwort", jetzt)
            .await
            .unwrap()
            .unwrap();

        service.loeschen(user.id).await.unwrap();

        let ergebnis = service.token_validieren(&anmeldung.token, jetzt).await;
        assert!(matches!(ergebnis, Err(AuthError::BenutzerNichtGefunden(_))));
    }

    #[tokio::test]
    async fn abgelaufenes_token_abgelehnt() {
        let service = test_service();
        service.registrieren("alt@x.com", "passwort").await.unwrap();
        let jetzt = Utc::now();
        let anmeldung = service
            .anmelden("alt@x.com", "passwort", jetzt)
            .await
            .unwrap()
            .unwrap();

        let ergebnis = service
            .token_validieren(&anmeldung.token, jetzt + Duration::days(8))
            .await;
        assert!(matches!(ergebnis, Err(AuthError::TokenAbgelaufen)));
    }

    #[tokio::test]
    async fn alle_und_laden_ohne_zugangsdaten() {
        let service = test_service();
        let a = service.registrieren("a@x.com", "passwort").await.unwrap();
        let b = service.registrieren("b@x.com", "passwort").await.unwrap();

        let alle = service.alle().await.unwrap();
        assert_eq!(alle, vec![a.clone(), b]);
        assert_eq!(service.laden(a.id).await.unwrap(), Some(a));
        assert_eq!(service.laden(UserId(77)).await.unwrap(), None);
    }
}

//! wordcraft-server – Bibliotheks-Root
//!
//! Verdrahtet Konfiguration, Datenbank, Auth-Service, REST-API und
//! Observability-Server.

pub mod config;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::Duration;
use config::{ServerConfig, MAX_TOKEN_GUELTIGKEIT_TAGE};
use wordcraft_api::{ApiState, RestServer, RestServerKonfig};
use wordcraft_auth::{AppSecret, AuthService, TokenIssuer};
use wordcraft_db::{DatabaseConfig, SqliteDb};
use wordcraft_observability::{observability_server_starten, HealthState, WordcraftMetrics};

/// Intervall der Datenbank-Probe fuer den Health-Check
const DB_PROBE_INTERVALL: StdDuration = StdDuration::from_secs(30);

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Baut den Auth-Service aus Konfiguration und geoeffneter Datenbank
    pub fn auth_service_erstellen(&self, db: SqliteDb) -> Result<AuthService<SqliteDb>> {
        let secret = AppSecret::neu(self.config.auth.secret.as_bytes())
            .context("Signaturschluessel ungueltig (WORDCRAFT_SECRET oder [auth] secret)")?;

        let tage = self.config.auth.token_gueltigkeit_tage;
        if !(1..=MAX_TOKEN_GUELTIGKEIT_TAGE).contains(&tage) {
            anyhow::bail!(
                "[auth] token_gueltigkeit_tage muss zwischen 1 und {MAX_TOKEN_GUELTIGKEIT_TAGE} liegen, ist {tage}"
            );
        }
        let tokens = TokenIssuer::mit_gueltigkeit(&secret, Duration::days(tage));
        tracing::info!(
            gueltigkeit_tage = tokens.gueltigkeit().num_days(),
            "Token-Aussteller bereit"
        );

        Ok(AuthService::neu(Arc::new(db), tokens))
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbankverbindung herstellen, Migrationen ausfuehren
    /// 2. Auth-Service mit Signaturschluessel erstellen
    /// 3. Observability-Server starten (falls aktiviert)
    /// 4. REST-API starten
    /// 5. Auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        let api_adresse = self.config.api_bind_adresse()?;

        tracing::info!(
            server_name = %self.config.server.name,
            api = %api_adresse,
            "Server startet"
        );

        let db = SqliteDb::oeffnen(&DatabaseConfig::from(&self.config.datenbank))
            .await
            .context("Datenbank konnte nicht geoeffnet werden")?;

        let health = HealthState::neu();
        health.db_status_setzen(true);
        tokio::spawn(db_probe(db.clone(), health.clone()));

        let auth = self.auth_service_erstellen(db)?;
        let metriken = WordcraftMetrics::neu()?;

        if self.config.observability.aktiviert {
            let adresse = self.config.observability_bind_adresse()?;
            let metriken = metriken.clone();
            let health = health.clone();
            tokio::spawn(async move {
                if let Err(e) = observability_server_starten(adresse, metriken, health).await {
                    tracing::error!(fehler = %e, "Observability-Server beendet");
                }
            });
        }

        let state = ApiState::neu(Arc::new(auth), metriken, health);
        let rest = RestServer::neu(RestServerKonfig {
            bind_addr: api_adresse,
            cors_origins: self.config.api.cors_origins.clone(),
        });

        rest.starten(state, shutdown_signal()).await?;

        tracing::info!("Server beendet");
        Ok(())
    }
}

/// Prueft periodisch die Datenbank und aktualisiert den Health-Status
async fn db_probe(db: SqliteDb, health: HealthState) {
    let mut intervall = tokio::time::interval(DB_PROBE_INTERVALL);
    loop {
        intervall.tick().await;
        let erreichbar = db.erreichbar().await;
        if erreichbar != health.db_verbunden() {
            tracing::warn!(erreichbar, "Datenbank-Status geaendert");
        }
        health.db_status_setzen(erreichbar);
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown-Signal empfangen, Server wird beendet"),
        Err(e) => tracing::error!(fehler = %e, "Ctrl-C-Handler konnte nicht registriert werden"),
    }
}

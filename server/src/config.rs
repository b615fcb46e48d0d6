//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder ausser dem
//! Signaturschluessel haben sinnvolle Standardwerte.

use std::net::SocketAddr;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use wordcraft_db::DatabaseConfig;
use wordcraft_observability::logging::{log_format_gueltig, log_level_gueltig};

/// Umgebungsvariable, die `[auth] secret` ueberschreibt
pub const SECRET_ENV: &str = "WORDCRAFT_SECRET";

/// Obergrenze fuer `[auth] token_gueltigkeit_tage` (10 Jahre)
pub const MAX_TOKEN_GUELTIGKEIT_TAGE: i64 = 3650;

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
    /// Token- und Schluessel-Einstellungen
    pub auth: AuthEinstellungen,
    /// REST-API-Einstellungen
    pub api: ApiEinstellungen,
    /// Observability-Einstellungen (Metriken, Health)
    pub observability: ObservabilityEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Wordcraft API".into(),
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer alle Listener
    pub bind_adresse: String,
    /// Port fuer die REST-API
    pub api_port: u16,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            api_port: 4000,
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    /// WAL-Modus fuer SQLite
    pub sqlite_wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_verbindungen: db.max_verbindungen,
            sqlite_wal: db.sqlite_wal,
        }
    }
}

impl From<&DatenbankEinstellungen> for DatabaseConfig {
    fn from(e: &DatenbankEinstellungen) -> Self {
        DatabaseConfig {
            url: e.url.clone(),
            max_verbindungen: e.max_verbindungen,
            sqlite_wal: e.sqlite_wal,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Token- und Schluessel-Einstellungen
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthEinstellungen {
    /// Signaturschluessel fuer Tokens (mindestens 16 Bytes)
    pub secret: String,
    /// Gueltigkeit ausgestellter Tokens in Tagen
    pub token_gueltigkeit_tage: i64,
}

impl Default for AuthEinstellungen {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_gueltigkeit_tage: wordcraft_auth::token::TOKEN_GUELTIGKEIT_TAGE,
        }
    }
}

// Schluessel nie im Klartext loggen
impl std::fmt::Debug for AuthEinstellungen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEinstellungen")
            .field("secret", &format_args!("<{} Bytes>", self.secret.len()))
            .field("token_gueltigkeit_tage", &self.token_gueltigkeit_tage)
            .finish()
    }
}

/// REST-API-Einstellungen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiEinstellungen {
    /// CORS-Origins (leer = alle erlaubt)
    pub cors_origins: Vec<String>,
}

/// Observability-Einstellungen (Metriken + Health-Check)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityEinstellungen {
    /// Aktiviert den Observability-Server
    pub aktiviert: bool,
    /// Port fuer Metriken und Health
    pub port: u16,
}

impl Default for ObservabilityEinstellungen {
    fn default() -> Self {
        Self {
            aktiviert: true,
            port: 9300,
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    ///
    /// Gibt `None` zurueck wenn die Datei nicht existiert; der Aufrufer
    /// verwendet dann die Standardwerte und meldet das nach dem
    /// Initialisieren des Loggings.
    pub fn laden(pfad: &str) -> anyhow::Result<Option<Self>> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                config
                    .validieren()
                    .with_context(|| format!("Konfigurationsfehler in '{pfad}'"))?;
                Ok(Some(config))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Prueft Wertebereiche, die serde nicht abdeckt
    pub fn validieren(&self) -> anyhow::Result<()> {
        if !log_level_gueltig(&self.logging.level) {
            anyhow::bail!(
                "[logging] level '{}' ungueltig (trace, debug, info, warn, error)",
                self.logging.level
            );
        }
        if !log_format_gueltig(&self.logging.format) {
            anyhow::bail!(
                "[logging] format '{}' ungueltig (text, json)",
                self.logging.format
            );
        }
        let tage = self.auth.token_gueltigkeit_tage;
        if !(1..=MAX_TOKEN_GUELTIGKEIT_TAGE).contains(&tage) {
            anyhow::bail!(
                "[auth] token_gueltigkeit_tage muss zwischen 1 und {MAX_TOKEN_GUELTIGKEIT_TAGE} liegen, ist {tage}"
            );
        }
        Ok(())
    }

    /// Uebernimmt den Schluessel aus `WORDCRAFT_SECRET`, falls gesetzt
    pub fn umgebung_anwenden(&mut self) {
        self.secret_ueberschreiben(std::env::var(SECRET_ENV).ok());
    }

    fn secret_ueberschreiben(&mut self, wert: Option<String>) {
        if let Some(secret) = wert.filter(|s| !s.is_empty()) {
            self.auth.secret = secret;
        }
    }

    /// Gibt die Bind-Adresse fuer die REST-API zurueck
    pub fn api_bind_adresse(&self) -> anyhow::Result<SocketAddr> {
        self.bind_adresse(self.netzwerk.api_port)
    }

    /// Gibt die Bind-Adresse fuer den Observability-Server zurueck
    pub fn observability_bind_adresse(&self) -> anyhow::Result<SocketAddr> {
        self.bind_adresse(self.observability.port)
    }

    fn bind_adresse(&self, port: u16) -> anyhow::Result<SocketAddr> {
        let adresse = format!("{}:{}", self.netzwerk.bind_adresse, port);
        adresse
            .parse()
            .with_context(|| format!("Ungueltige Bind-Adresse '{adresse}'"))
    }
}

//! Prometheus-kompatible Metriken fuer Wordcraft
//!
//! Registrierte Metriken:
//! - `wordcraft_logins_total` – Counter: Anmeldeversuche (ergebnis)
//! - `wordcraft_registrations_total` – Counter: Erfolgreiche Registrierungen
//! - `wordcraft_http_requests_total` – Counter: HTTP-Anfragen (method, status)
//! - `wordcraft_http_request_duration_seconds` – Histogram: HTTP-Antwortzeit

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Ausgang eines Anmeldeversuchs (Label `ergebnis`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnmeldeErgebnis {
    Erfolg,
    Abgelehnt,
    Fehler,
}

impl AnmeldeErgebnis {
    pub fn label(self) -> &'static str {
        match self {
            AnmeldeErgebnis::Erfolg => "erfolg",
            AnmeldeErgebnis::Abgelehnt => "abgelehnt",
            AnmeldeErgebnis::Fehler => "fehler",
        }
    }
}

/// Alle Wordcraft-Prometheus-Metriken
///
/// Jede Instanz hat eine eigene Registry, damit Tests sich nicht
/// gegenseitig beeinflussen.
#[derive(Clone)]
pub struct WordcraftMetrics {
    pub registry: Arc<Registry>,

    // Konto-Metriken
    pub logins_total: IntCounterVec,
    pub registrations_total: IntCounter,

    // HTTP-Metriken
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
}

impl WordcraftMetrics {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        let logins_total = IntCounterVec::new(
            Opts::new("wordcraft_logins_total", "Anmeldeversuche nach Ergebnis"),
            &["ergebnis"],
        )?;
        registry.register(Box::new(logins_total.clone()))?;

        let registrations_total = IntCounter::with_opts(Opts::new(
            "wordcraft_registrations_total",
            "Gesamtanzahl erfolgreicher Registrierungen",
        ))?;
        registry.register(Box::new(registrations_total.clone()))?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("wordcraft_http_requests_total", "Gesamtanzahl HTTP-Anfragen"),
            &["method", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "wordcraft_http_request_duration_seconds",
                "HTTP-Antwortzeit in Sekunden",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
            ]),
            &["method"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            logins_total,
            registrations_total,
            http_requests_total,
            http_request_duration_seconds,
        })
    }

    /// Zaehlt einen Anmeldeversuch
    pub fn anmeldung_zaehlen(&self, ergebnis: AnmeldeErgebnis) {
        self.logins_total
            .with_label_values(&[ergebnis.label()])
            .inc();
    }

    /// Zaehlt eine erfolgreiche Registrierung
    pub fn registrierung_zaehlen(&self) {
        self.registrations_total.inc();
    }

    /// Erfasst eine abgeschlossene HTTP-Anfrage
    pub fn anfrage_erfassen(&self, methode: &str, status: u16, dauer_sekunden: f64) {
        self.http_requests_total
            .with_label_values(&[methode, &status.to_string()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[methode])
            .observe(dauer_sekunden);
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn exportieren(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Axum-Router fuer den `/metrics`-Endpunkt
pub fn metrics_router(metriken: WordcraftMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metriken)
}

async fn metrics_handler(State(metriken): State<WordcraftMetrics>) -> impl IntoResponse {
    match metriken.exportieren() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Metriken-Export fehlgeschlagen: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

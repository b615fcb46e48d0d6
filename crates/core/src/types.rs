//! Gemeinsame Identifikationstypen fuer Wordcraft
//!
//! Die Benutzer-ID verwendet das Newtype-Pattern, damit sie nicht mit
//! beliebigen Ganzzahlen verwechselt werden kann.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Eindeutige Benutzer-ID (Primaerschluessel der `users`-Tabelle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl UserId {
    /// Gibt den inneren Wert zurueck
    pub fn inner(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| CoreError::UngueltigeId(s.to_string()))
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Oeffentliche Identitaet eines Benutzers
///
/// Wird als Kopie aus dem Store uebernommen und enthaelt niemals
/// Passwort-Hash oder Salt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenutzerIdentitaet {
    pub id: UserId,
    pub email: String,
}

/// Gespeichertes Passwort-Paar aus Hash und Salt
///
/// Beide Felder werden immer gemeinsam ersetzt. Die Laengen-Invarianten
/// (64 bzw. 128 Bytes) prueft der Passwort-Hasher im Auth-Crate.
#[derive(Clone, PartialEq, Eq)]
pub struct Zugangsdaten {
    pub passwort_hash: Vec<u8>,
    pub passwort_salt: Vec<u8>,
}

// Keine Rohbytes in Logs
impl std::fmt::Debug for Zugangsdaten {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zugangsdaten")
            .field("passwort_hash", &format_args!("<{} Bytes>", self.passwort_hash.len()))
            .field("passwort_salt", &format_args!("<{} Bytes>", self.passwort_salt.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_display_ist_zahl() {
        assert_eq!(UserId(42).to_string(), "42");
    }

    #[test]
    fn user_id_aus_string() {
        assert_eq!("42".parse::<UserId>().unwrap(), UserId(42));
        assert_eq!(" 7 ".parse::<UserId>().unwrap(), UserId(7));
        assert!(matches!(
            "abc".parse::<UserId>(),
            Err(CoreError::UngueltigeId(_))
        ));
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn ids_sind_serde_kompatibel() {
        let uid = UserId(1337);
        let json = serde_json::to_string(&uid).unwrap();
        assert_eq!(json, "1337");
        let uid2: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(uid, uid2);
    }

    #[test]
    fn zugangsdaten_debug_zeigt_keine_bytes() {
        let z = Zugangsdaten {
            passwort_hash: vec![0xAB; 64],
            passwort_salt: vec![0xCD; 128],
        };
        let text = format!("{z:?}");
        assert!(text.contains("<64 Bytes>"));
        assert!(text.contains("<128 Bytes>"));
        assert!(!text.contains("171"), "Rohbytes duerfen nicht erscheinen");
    }

    #[test]
    fn identitaet_serialisierung() {
        let identitaet = BenutzerIdentitaet {
            id: UserId(3),
            email: "a@b.de".into(),
        };
        let json = serde_json::to_value(&identitaet).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["email"], "a@b.de");
    }
}

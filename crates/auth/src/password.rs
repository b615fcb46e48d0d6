//! Passwort-Hashing mit HMAC-SHA512
//!
//! Der Salt ist ein zufaelliger 128-Byte-Schluessel, mit dem die UTF-8-Bytes
//! des Passworts per HMAC-SHA512 zu einem 64-Byte-Digest verarbeitet werden.
//! Der Vergleich beim Verifizieren laeuft in konstanter Zeit ueber
//! `Mac::verify_slice`.
//!
//! Ein speicherharter KDF (z.B. Argon2id) waere staerker; das Verfahren bleibt
//! kompatibel zu bestehenden Datensaetzen, bis eine Migration geplant ist.

use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;
use wordcraft_core::Zugangsdaten;

use crate::error::{AuthError, AuthResult};

type HmacSha512 = Hmac<Sha512>;

/// Laenge des HMAC-SHA512-Digests in Bytes
pub const HASH_LAENGE: usize = 64;

/// Laenge des Salts (HMAC-Schluessel, eine SHA-512-Blockgroesse) in Bytes
pub const SALT_LAENGE: usize = 128;

/// Leitet aus einem Klartext-Passwort neue Zugangsdaten ab
///
/// Jeder Aufruf erzeugt einen frischen Salt aus dem OS-Zufallsgenerator.
/// Leere oder nur aus Leerzeichen bestehende Passwoerter werden abgelehnt.
pub fn zugangsdaten_ableiten(passwort: &str) -> AuthResult<Zugangsdaten> {
    if passwort.trim().is_empty() {
        return Err(AuthError::ungueltige_eingabe(
            "Passwort darf nicht leer sein",
        ));
    }

    let passwort_salt = zufallsbytes(SALT_LAENGE);
    let passwort_hash = hmac_instanz(&passwort_salt)?
        .chain_update(passwort.as_bytes())
        .finalize()
        .into_bytes()
        .to_vec();

    Ok(Zugangsdaten {
        passwort_hash,
        passwort_salt,
    })
}

/// Verifiziert ein Klartext-Passwort gegen gespeicherte Zugangsdaten
///
/// Gibt `AuthError::ZugangsdatenBeschaedigt` zurueck wenn Hash oder Salt
/// nicht die erwartete Laenge haben. Ein falsches oder leeres Passwort ist
/// kein Fehler, sondern `Ok(false)`.
pub fn passwort_verifizieren(passwort: &str, zugangsdaten: &Zugangsdaten) -> AuthResult<bool> {
    if zugangsdaten.passwort_hash.len() != HASH_LAENGE {
        return Err(AuthError::ZugangsdatenBeschaedigt(format!(
            "Passwort-Hash hat {} Bytes, erwartet {HASH_LAENGE}",
            zugangsdaten.passwort_hash.len()
        )));
    }
    if zugangsdaten.passwort_salt.len() != SALT_LAENGE {
        return Err(AuthError::ZugangsdatenBeschaedigt(format!(
            "Passwort-Salt hat {} Bytes, erwartet {SALT_LAENGE}",
            zugangsdaten.passwort_salt.len()
        )));
    }
    if passwort.is_empty() {
        return Ok(false);
    }

    let mac = hmac_instanz(&zugangsdaten.passwort_salt)?.chain_update(passwort.as_bytes());

    // verify_slice vergleicht ohne fruehen Abbruch
    Ok(mac.verify_slice(&zugangsdaten.passwort_hash).is_ok())
}

/// Zufaellige Zugangsdaten, die zu keinem Passwort passen
///
/// Dient als Attrappe fuer unbekannte E-Mail-Adressen, damit die Anmeldung
/// in beiden Fehlerfaellen denselben Rechenweg nimmt.
pub fn attrappe() -> Zugangsdaten {
    Zugangsdaten {
        passwort_hash: zufallsbytes(HASH_LAENGE),
        passwort_salt: zufallsbytes(SALT_LAENGE),
    }
}

fn hmac_instanz(schluessel: &[u8]) -> AuthResult<HmacSha512> {
    HmacSha512::new_from_slice(schluessel)
        .map_err(|e| AuthError::intern(format!("HMAC-Schluessel ungueltig: {e}")))
}

fn zufallsbytes(laenge: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; laenge];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

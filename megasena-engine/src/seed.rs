//! Dérivation déterministe du seed d'un lot.
//!
//! La clé canonique est `MEGASENA-{concours}-{AAAA-MM-JJ}`. Elle est hachée en SHA-256 et les
//! 32 octets initialisent le générateur : mêmes entrées, même lot, y compris après un redémarrage.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedKey {
    key: String,
}

pub fn derive_seed(contest_number: u32, next_draw_date: NaiveDate) -> Result<SeedKey> {
    if contest_number == 0 {
        return Err(EngineError::SeedInput("numéro de concours manquant (0)".to_string()));
    }
    Ok(SeedKey {
        key: format!("MEGASENA-{}-{}", contest_number, next_draw_date.format("%Y-%m-%d")),
    })
}

/// Accepte `AAAA-MM-JJ` ou le format brésilien `JJ/MM/AAAA`.
pub fn parse_draw_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .map_err(|_| EngineError::SeedInput(format!("date illisible : '{}'", raw)))
}

fn hash_to_seed(text: &str) -> [u8; 32] {
    let digest = Sha256::digest(text.as_bytes());
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&digest);
    seed
}

impl SeedKey {
    pub fn parse(contest_number: &str, next_draw_date: &str) -> Result<Self> {
        let contest: u32 = contest_number
            .trim()
            .parse()
            .map_err(|_| EngineError::SeedInput(format!("numéro de concours illisible : '{}'", contest_number)))?;
        derive_seed(contest, parse_draw_date(next_draw_date)?)
    }

    /// Clé libre (lots « surpresinha » ou clé relue en base).
    pub fn from_raw(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(EngineError::SeedInput("clé de seed vide".to_string()));
        }
        Ok(SeedKey { key })
    }

    /// Nouveau lot volontaire : un autre tirage de jeux, toujours reproductible à partir de la clé obtenue.
    pub fn with_salt(&self, salt: &str) -> SeedKey {
        SeedKey {
            key: format!("{}-NEW-{}", self.key, salt),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn rng(&self) -> StdRng {
        StdRng::from_seed(hash_to_seed(&self.key))
    }

    /// Flux séparé pour l'ordre d'affichage, sans perturber la génération.
    pub fn display_rng(&self) -> StdRng {
        StdRng::from_seed(hash_to_seed(&format!("{}-DISPLAY", self.key)))
    }
}

impl std::fmt::Display for SeedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)
    }
}

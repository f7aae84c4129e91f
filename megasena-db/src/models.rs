use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Plus grand numéro tirable (1-60).
pub const POOL_SIZE: u8 = 60;
/// Nombre de numéros par tirage et par jeu.
pub const PICK_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub contest: u32,
    /// Date ISO (YYYY-MM-DD).
    pub date: String,
    pub numbers: [u8; 6],
}

/// Ce que le collecteur de résultats transmet : le dernier concours connu et le suivant.
#[derive(Debug, Clone)]
pub struct ContestInfo {
    pub contest_number: u32,
    /// Vide tant que le tirage n'a pas eu lieu.
    pub drawn_numbers: Option<[u8; 6]>,
    pub next_contest_number: u32,
    pub next_draw_date: String,
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub gap: u32,
}

/// Enregistrement publié pour un concours : `{contest_number, games}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub contest_number: u32,
    pub games: Vec<[u8; 6]>,
}

/// Lot tel que stocké en base, avec la clé de seed qui permet de le régénérer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBatch {
    pub record: BatchRecord,
    pub seed_key: String,
    pub created_at: String,
}

pub fn validate_numbers(numbers: &[u8; 6]) -> Result<()> {
    for &n in numbers {
        if n < 1 || n > POOL_SIZE {
            bail!("Numéro {} hors limites (1-{})", n, POOL_SIZE);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

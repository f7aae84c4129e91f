use std::fmt;

use megasena_db::models::{PICK_COUNT, POOL_SIZE};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{EngineError, Result};

/// Nombre de jeux d'un lot de concours.
pub const BATCH_SIZE: usize = 10;

/// Combinaison de 6 numéros distincts dans 1..=60, stockée triée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Game([u8; 6]);

impl Game {
    pub fn new(numbers: &[u8]) -> Result<Self> {
        if numbers.len() != PICK_COUNT {
            return Err(EngineError::Validation(format!(
                "attendu {} numéros, reçu {}",
                PICK_COUNT,
                numbers.len()
            )));
        }
        let mut sorted = [0u8; 6];
        sorted.copy_from_slice(numbers);
        sorted.sort_unstable();

        if let Some(&n) = sorted.iter().find(|&&n| n < 1 || n > POOL_SIZE) {
            return Err(EngineError::Validation(format!(
                "numéro {} hors limites (1-{})",
                n, POOL_SIZE
            )));
        }
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(EngineError::Validation(format!("numéro en double : {}", w[0])));
        }
        Ok(Game(sorted))
    }

    pub fn numbers(&self) -> &[u8; 6] {
        &self.0
    }

    pub fn contains(&self, n: u8) -> bool {
        self.0.binary_search(&n).is_ok()
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&n| n as u32).sum()
    }

    /// Les 15 paires, en ordre croissant.
    pub fn pairs(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        let t = &self.0;
        (0..6).flat_map(move |i| ((i + 1)..6).map(move |j| (t[i], t[j])))
    }

    /// Les 20 triplets, en ordre croissant.
    pub fn triples(&self) -> impl Iterator<Item = (u8, u8, u8)> + '_ {
        let t = &self.0;
        (0..6).flat_map(move |i| {
            ((i + 1)..6).flat_map(move |j| ((j + 1)..6).map(move |k| (t[i], t[j], t[k])))
        })
    }

    /// Nombre de numéros en commun avec un tirage.
    pub fn hits(&self, drawn: &[u8]) -> usize {
        self.0.iter().filter(|n| drawn.contains(n)).count()
    }

    /// Ordre de présentation mélangé ; le jeu lui-même reste trié.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> [u8; 6] {
        let mut out = self.0;
        out.shuffle(rng);
        out
    }
}

impl TryFrom<[u8; 6]> for Game {
    type Error = EngineError;

    fn try_from(numbers: [u8; 6]) -> Result<Self> {
        Game::new(&numbers)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| format!("{:02}", n)).collect();
        write!(f, "{}", parts.join(" - "))
    }
}

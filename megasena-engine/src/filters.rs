//! Filtres statistiques appliqués à chaque combinaison candidate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::game::Game;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub sum_min: u32,
    pub sum_max: u32,
    /// Seuil au-dessus duquel un numéro compte comme « haut » (hors dates).
    pub high_threshold: u8,
    pub min_high: usize,
    pub odd_min: usize,
    pub odd_max: usize,
    pub max_per_decade: usize,
    pub max_same_ending: usize,
    pub max_multiples_of_five: usize,
    /// Plus longue suite d'entiers consécutifs tolérée.
    pub max_run: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            sum_min: 170,
            sum_max: 215,
            high_threshold: 31,
            min_high: 3,
            odd_min: 2,
            odd_max: 4,
            max_per_decade: 4,
            max_same_ending: 2,
            max_multiples_of_five: 3,
            max_run: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Sum(u32),
    TooFewHigh(usize),
    OddCount(usize),
    DecadeCrowded { decade: u8, count: usize },
    EndingRepeated { ending: u8, count: usize },
    TooManyMultiplesOfFive(usize),
    ConsecutiveRun(usize),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Sum(s) => write!(f, "somme {} hors de la bande", s),
            Rejection::TooFewHigh(n) => write!(f, "seulement {} numéros hauts", n),
            Rejection::OddCount(n) => write!(f, "{} numéros impairs", n),
            Rejection::DecadeCrowded { decade, count } => write!(
                f,
                "{} numéros dans la dizaine {}-{}",
                count,
                decade * 10 + 1,
                decade * 10 + 10
            ),
            Rejection::EndingRepeated { ending, count } => {
                write!(f, "{} numéros finissant par {}", count, ending)
            }
            Rejection::TooManyMultiplesOfFive(n) => write!(f, "{} multiples de 5", n),
            Rejection::ConsecutiveRun(n) => write!(f, "suite de {} consécutifs", n),
        }
    }
}

/// Dizaine 0..=5 : 1-10 → 0, 11-20 → 1, ..., 51-60 → 5.
fn decade(n: u8) -> u8 {
    (n - 1) / 10
}

/// Plus longue suite d'entiers consécutifs (le jeu est trié).
pub fn longest_run(game: &Game) -> usize {
    let mut best = 1;
    let mut run = 1;
    for w in game.numbers().windows(2) {
        if w[1] == w[0] + 1 {
            run += 1;
            best = best.max(run);
        } else {
            run = 1;
        }
    }
    best
}

impl FilterConfig {
    /// Premier critère non respecté, dans l'ordre de déclaration.
    pub fn check(&self, game: &Game) -> std::result::Result<(), Rejection> {
        let t = game.numbers();

        let sum = game.sum();
        if sum < self.sum_min || sum > self.sum_max {
            return Err(Rejection::Sum(sum));
        }

        let high = t.iter().filter(|&&n| n > self.high_threshold).count();
        if high < self.min_high {
            return Err(Rejection::TooFewHigh(high));
        }

        let odds = t.iter().filter(|&&n| n % 2 == 1).count();
        if odds < self.odd_min || odds > self.odd_max {
            return Err(Rejection::OddCount(odds));
        }

        let mut decades = [0usize; 6];
        for &n in t {
            decades[decade(n) as usize] += 1;
        }
        if let Some((d, &count)) = decades.iter().enumerate().find(|(_, c)| **c > self.max_per_decade) {
            return Err(Rejection::DecadeCrowded { decade: d as u8, count });
        }

        let mut endings = [0usize; 10];
        for &n in t {
            endings[(n % 10) as usize] += 1;
        }
        if let Some((e, &count)) = endings.iter().enumerate().find(|(_, c)| **c > self.max_same_ending) {
            return Err(Rejection::EndingRepeated { ending: e as u8, count });
        }

        let fives = t.iter().filter(|&&n| n % 5 == 0).count();
        if fives > self.max_multiples_of_five {
            return Err(Rejection::TooManyMultiplesOfFive(fives));
        }

        let run = longest_run(game);
        if run > self.max_run {
            return Err(Rejection::ConsecutiveRun(run));
        }

        Ok(())
    }

    pub fn is_valid(&self, game: &Game) -> bool {
        self.check(game).is_ok()
    }

    pub fn validate(&self) -> Result<()> {
        if self.sum_min > self.sum_max {
            return Err(EngineError::Config(format!(
                "sum_min ({}) > sum_max ({})",
                self.sum_min, self.sum_max
            )));
        }
        if self.odd_min > self.odd_max || self.odd_max > 6 {
            return Err(EngineError::Config(format!(
                "bande d'impairs incohérente : {}..={}",
                self.odd_min, self.odd_max
            )));
        }
        if self.min_high > 6 {
            return Err(EngineError::Config(format!("min_high ({}) > 6", self.min_high)));
        }
        if self.max_run == 0 {
            return Err(EngineError::Config("max_run doit valoir au moins 1".to_string()));
        }
        Ok(())
    }
}

/// Évaluation avec les seuils par défaut.
pub fn is_valid(game: &Game) -> bool {
    FilterConfig::default().is_valid(game)
}

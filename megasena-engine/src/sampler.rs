use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;

use crate::error::{EngineError, Result};
use crate::filters::FilterConfig;
use crate::frequency::NumberWeights;
use crate::game::Game;
use crate::seed::SeedKey;

/// Flux déterministe de combinaisons candidates.
pub struct CandidateSampler {
    rng: StdRng,
    weights: NumberWeights,
    draws: u64,
}

impl CandidateSampler {
    pub fn new(seed: &SeedKey, weights: NumberWeights) -> Self {
        Self::from_rng(seed.rng(), weights)
    }

    pub fn from_rng(rng: StdRng, weights: NumberWeights) -> Self {
        Self { rng, weights, draws: 0 }
    }

    /// Nombre de combinaisons tirées depuis la création.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Tire 6 numéros sans remise, proportionnellement aux poids.
    pub fn next_candidate(&mut self) -> Result<Game> {
        let mut available: Vec<(u8, f64)> = self
            .weights
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, &p)| ((i + 1) as u8, p))
            .collect();
        let mut selected = [0u8; 6];

        for slot in selected.iter_mut() {
            let weights: Vec<f64> = available.iter().map(|(_, w)| *w).collect();
            let dist = WeightedIndex::new(&weights)
                .map_err(|e| EngineError::Config(format!("poids d'échantillonnage inutilisables : {}", e)))?;
            let idx = dist.sample(&mut self.rng);
            *slot = available.remove(idx).0;
        }

        self.draws += 1;
        Game::new(&selected)
    }

    /// Premier candidat qui passe les filtres, ou `None` si `max_draws` tirages n'ont rien donné.
    pub fn next_valid(&mut self, filters: &FilterConfig, max_draws: u64) -> Result<Option<Game>> {
        for _ in 0..max_draws {
            let candidate = self.next_candidate()?;
            if filters.is_valid(&candidate) {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::seed::derive_seed;

    fn key() -> SeedKey {
        derive_seed(2801, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()).unwrap()
    }

    #[test]
    fn test_candidates_are_well_formed() {
        let mut sampler = CandidateSampler::new(&key(), NumberWeights::uniform());
        for _ in 0..200 {
            let g = sampler.next_candidate().unwrap();
            assert!(g.numbers().windows(2).all(|w| w[0] < w[1]));
            assert!(g.numbers().iter().all(|&n| (1..=60).contains(&n)));
        }
        assert_eq!(sampler.draws(), 200);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = CandidateSampler::new(&key(), NumberWeights::uniform());
        let mut b = CandidateSampler::new(&key(), NumberWeights::uniform());
        for _ in 0..50 {
            assert_eq!(a.next_candidate().unwrap(), b.next_candidate().unwrap());
        }
    }

    #[test]
    fn test_next_valid_passes_filters() {
        let filters = FilterConfig::default();
        let mut sampler = CandidateSampler::new(&key(), NumberWeights::uniform());
        for _ in 0..20 {
            let g = sampler.next_valid(&filters, 10_000).unwrap().expect("candidat valide");
            assert!(filters.is_valid(&g), "{} devrait passer les filtres", g);
        }
    }

    #[test]
    fn test_next_valid_gives_up_within_budget() {
        let filters = FilterConfig { sum_min: 400, sum_max: 500, ..FilterConfig::default() };
        let mut sampler = CandidateSampler::new(&key(), NumberWeights::uniform());
        assert!(sampler.next_valid(&filters, 100).unwrap().is_none());
        assert_eq!(sampler.draws(), 100);

        assert!(sampler.next_valid(&FilterConfig::default(), 0).unwrap().is_none());
        assert_eq!(sampler.draws(), 100);
    }

    #[test]
    fn test_bias_favours_heavy_numbers() {
        let mut counts = vec![0u32; 60];
        for c in counts.iter_mut().take(10) {
            *c = 500;
        }
        let weights = NumberWeights::from_frequencies(&counts, 1.0);
        let mut sampler = CandidateSampler::new(&key(), weights);
        let mut low = 0;
        for _ in 0..200 {
            low += sampler.next_candidate().unwrap().numbers().iter().filter(|&&n| n <= 10).count();
        }
        // Sans biais on attendrait ~200 (1/6 des 1200 numéros tirés).
        assert!(low > 600, "numéros favorisés tirés {} fois", low);
    }
}

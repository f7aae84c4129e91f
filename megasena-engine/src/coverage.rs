use std::collections::HashMap;

use megasena_db::models::POOL_SIZE;

use crate::error::{EngineError, Result};
use crate::game::Game;

/// Score d'un candidat, comparé lexicographiquement (plus petit = meilleur).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct CoverageScore {
    /// Dépassement cumulé du plafond d'exposition si le candidat était retenu.
    pub overflow: u32,
    /// Paires du candidat déjà présentes dans le lot.
    pub seen_pairs: u32,
    /// Triplets du candidat déjà présents (0 si le suivi des triplets est coupé).
    pub seen_triples: u32,
    /// Exposition actuelle cumulée des 6 numéros.
    pub exposure: u32,
}

impl CoverageScore {
    pub fn exceeds_cap(&self) -> bool {
        self.overflow > 0
    }
}

/// Compteurs d'exposition, de paires et de triplets pour le lot en cours.
#[derive(Debug, Clone)]
pub struct CoverageTracker {
    max_exposure: u32,
    track_triples: bool,
    exposure: Vec<u32>,
    pairs: HashMap<(u8, u8), u32>,
    triples: HashMap<(u8, u8, u8), u32>,
    games: Vec<Game>,
}

impl CoverageTracker {
    pub fn new(max_exposure: u32, track_triples: bool) -> Self {
        Self {
            max_exposure,
            track_triples,
            exposure: vec![0; POOL_SIZE as usize + 1],
            pairs: HashMap::new(),
            triples: HashMap::new(),
            games: Vec::new(),
        }
    }

    pub fn max_exposure(&self) -> u32 {
        self.max_exposure
    }

    pub fn exposure_of(&self, number: u8) -> u32 {
        self.exposure[number as usize]
    }

    pub fn pair_count(&self, pair: (u8, u8)) -> u32 {
        self.pairs.get(&pair).copied().unwrap_or(0)
    }

    pub fn triple_count(&self, triple: (u8, u8, u8)) -> u32 {
        self.triples.get(&triple).copied().unwrap_or(0)
    }

    pub fn distinct_pairs(&self) -> usize {
        self.pairs.len()
    }

    pub fn contains(&self, game: &Game) -> bool {
        self.games.contains(game)
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn into_games(self) -> Vec<Game> {
        self.games
    }

    pub fn score(&self, candidate: &Game) -> CoverageScore {
        let mut score = CoverageScore::default();

        for &n in candidate.numbers() {
            let current = self.exposure_of(n);
            score.exposure += current;
            score.overflow += (current + 1).saturating_sub(self.max_exposure);
        }
        score.seen_pairs = candidate.pairs().filter(|p| self.pairs.contains_key(p)).count() as u32;
        if self.track_triples {
            score.seen_triples = candidate.triples().filter(|t| self.triples.contains_key(t)).count() as u32;
        }

        score
    }

    pub fn commit(&mut self, game: Game) -> Result<()> {
        if self.contains(&game) {
            return Err(EngineError::Validation(format!("jeu déjà présent dans le lot : {}", game)));
        }
        for &n in game.numbers() {
            self.exposure[n as usize] += 1;
        }
        for pair in game.pairs() {
            *self.pairs.entry(pair).or_insert(0) += 1;
        }
        if self.track_triples {
            for triple in game.triples() {
                *self.triples.entry(triple).or_insert(0) += 1;
            }
        }
        self.games.push(game);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(numbers: [u8; 6]) -> Game {
        Game::new(&numbers).unwrap()
    }

    #[test]
    fn test_empty_tracker_scores_zero() {
        let tracker = CoverageTracker::new(5, true);
        assert_eq!(tracker.score(&g([5, 18, 33, 41, 47, 52])), CoverageScore::default());
    }

    #[test]
    fn test_commit_updates_counters() {
        let mut tracker = CoverageTracker::new(5, true);
        tracker.commit(g([5, 18, 33, 41, 47, 52])).unwrap();
        tracker.commit(g([5, 18, 34, 42, 48, 53])).unwrap();

        assert_eq!(tracker.exposure_of(5), 2);
        assert_eq!(tracker.exposure_of(33), 1);
        assert_eq!(tracker.exposure_of(60), 0);
        assert_eq!(tracker.pair_count((5, 18)), 2);
        assert_eq!(tracker.pair_count((33, 41)), 1);
        assert_eq!(tracker.triple_count((5, 18, 33)), 1);
        assert_eq!(tracker.distinct_pairs(), 29);
        assert_eq!(tracker.games().len(), 2);
    }

    #[test]
    fn test_score_counts_seen_pairs_and_exposure() {
        let mut tracker = CoverageTracker::new(5, true);
        tracker.commit(g([5, 18, 33, 41, 47, 52])).unwrap();

        let score = tracker.score(&g([5, 18, 33, 42, 48, 53]));
        assert_eq!(score.overflow, 0);
        assert_eq!(score.seen_pairs, 3);
        assert_eq!(score.seen_triples, 1);
        assert_eq!(score.exposure, 3);
    }

    #[test]
    fn test_overflow_when_cap_reached() {
        let mut tracker = CoverageTracker::new(1, false);
        tracker.commit(g([5, 18, 33, 41, 47, 52])).unwrap();

        let score = tracker.score(&g([5, 19, 34, 42, 48, 53]));
        assert_eq!(score.overflow, 1);
        assert!(score.exceeds_cap());
        assert!(!tracker.score(&g([6, 19, 34, 42, 48, 53])).exceeds_cap());
    }

    #[test]
    fn test_priority_is_lexicographic() {
        let fewer_pairs = CoverageScore { overflow: 0, seen_pairs: 1, seen_triples: 9, exposure: 30 };
        let more_pairs = CoverageScore { overflow: 0, seen_pairs: 2, seen_triples: 0, exposure: 0 };
        assert!(fewer_pairs < more_pairs);

        let capped = CoverageScore { overflow: 1, ..CoverageScore::default() };
        assert!(more_pairs < capped);
    }

    #[test]
    fn test_triples_ignored_when_disabled() {
        let mut tracker = CoverageTracker::new(5, false);
        tracker.commit(g([5, 18, 33, 41, 47, 52])).unwrap();
        assert_eq!(tracker.score(&g([5, 18, 33, 42, 48, 53])).seen_triples, 0);
        assert_eq!(tracker.triple_count((5, 18, 33)), 0);
    }

    #[test]
    fn test_duplicate_commit_rejected() {
        let mut tracker = CoverageTracker::new(5, true);
        tracker.commit(g([5, 18, 33, 41, 47, 52])).unwrap();
        assert!(matches!(
            tracker.commit(g([5, 18, 33, 41, 47, 52])),
            Err(EngineError::Validation(_))
        ));
        assert_eq!(tracker.exposure_of(5), 1);
    }
}

//! Sélection gloutonne d'un lot : échantillonnage, filtrage, score de couverture, validation.

use std::time::{Duration, Instant};

use crate::config::SelectionConfig;
use crate::coverage::{CoverageScore, CoverageTracker};
use crate::error::{EngineError, Result};
use crate::filters::FilterConfig;
use crate::game::Game;
use crate::sampler::CandidateSampler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    Sampling,
    Scoring,
    Committed,
    Done,
    Failed,
}

/// Meilleur candidat du pool ; à score égal le premier tiré l'emporte.
/// Si tous dépassent le plafond d'exposition, c'est celui qui le dépasse le moins.
pub fn pick_best(pool: &[Game], tracker: &CoverageTracker) -> Option<(Game, CoverageScore)> {
    let mut best: Option<(Game, CoverageScore)> = None;
    for candidate in pool {
        let score = tracker.score(candidate);
        match best {
            Some((_, best_score)) if score >= best_score => {}
            _ => best = Some((*candidate, score)),
        }
    }
    best
}

pub struct BatchSelector<'a> {
    filters: &'a FilterConfig,
    selection: &'a SelectionConfig,
    sampler: CandidateSampler,
    tracker: CoverageTracker,
    requested: usize,
    pool: Vec<Game>,
    state: SelectorState,
    started: Instant,
    relaxed_slots: usize,
}

impl<'a> BatchSelector<'a> {
    pub fn new(
        filters: &'a FilterConfig,
        selection: &'a SelectionConfig,
        sampler: CandidateSampler,
        requested: usize,
    ) -> Self {
        let cap = selection.effective_exposure_cap(requested);
        Self {
            filters,
            selection,
            sampler,
            tracker: CoverageTracker::new(cap, selection.track_triples),
            requested,
            pool: Vec::with_capacity(selection.candidates_per_slot),
            state: SelectorState::Sampling,
            started: Instant::now(),
            relaxed_slots: 0,
        }
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn tracker(&self) -> &CoverageTracker {
        &self.tracker
    }

    /// Jeux pour lesquels le plafond d'exposition a dû être relâché.
    pub fn relaxed_slots(&self) -> usize {
        self.relaxed_slots
    }

    fn draws_exhausted(&self) -> bool {
        self.sampler.draws() >= self.selection.max_draws
    }

    /// Le délai n'est consulté qu'entre deux tours : un tour commencé va jusqu'au bout.
    fn deadline_passed(&self) -> bool {
        self.started.elapsed() >= Duration::from_millis(self.selection.time_budget_ms)
    }

    fn exhausted(&mut self) -> EngineError {
        self.state = SelectorState::Failed;
        EngineError::GenerationExhausted {
            filled: self.tracker.games().len(),
            requested: self.requested,
            draws: self.sampler.draws(),
        }
    }

    fn sample_round(&mut self) -> Result<()> {
        self.pool.clear();
        let round_end = self
            .sampler
            .draws()
            .saturating_add(self.selection.draws_per_slot)
            .min(self.selection.max_draws);
        while self.pool.len() < self.selection.candidates_per_slot {
            let remaining = round_end.saturating_sub(self.sampler.draws());
            let Some(candidate) = self.sampler.next_valid(self.filters, remaining)? else {
                break;
            };
            if self.tracker.contains(&candidate) || self.pool.contains(&candidate) {
                continue;
            }
            self.pool.push(candidate);
        }
        Ok(())
    }

    /// Avance d'une transition.
    pub fn step(&mut self) -> Result<SelectorState> {
        match self.state {
            SelectorState::Sampling => {
                if self.draws_exhausted() || self.deadline_passed() {
                    return Err(self.exhausted());
                }
                self.sample_round()?;
                if self.pool.is_empty() {
                    log::warn!(
                        "Jeu {}/{} : aucun candidat valide après {} tirages",
                        self.tracker.games().len() + 1,
                        self.requested,
                        self.sampler.draws()
                    );
                } else {
                    self.state = SelectorState::Scoring;
                }
            }
            SelectorState::Scoring => {
                let Some((game, score)) = pick_best(&self.pool, &self.tracker) else {
                    self.state = SelectorState::Sampling;
                    return Ok(self.state);
                };
                if score.exceeds_cap() {
                    self.relaxed_slots += 1;
                    log::warn!(
                        "Jeu {}/{} : plafond d'exposition {} relâché (dépassement {})",
                        self.tracker.games().len() + 1,
                        self.requested,
                        self.tracker.max_exposure(),
                        score.overflow
                    );
                }
                self.tracker.commit(game)?;
                log::debug!(
                    "Jeu {}/{} retenu : {} ({:?}, {} candidats)",
                    self.tracker.games().len(),
                    self.requested,
                    game,
                    score,
                    self.pool.len()
                );
                self.state = SelectorState::Committed;
            }
            SelectorState::Committed => {
                self.state = if self.tracker.games().len() >= self.requested {
                    SelectorState::Done
                } else {
                    SelectorState::Sampling
                };
            }
            SelectorState::Done | SelectorState::Failed => {}
        }
        Ok(self.state)
    }

    pub fn run(mut self) -> Result<Vec<Game>> {
        if self.requested == 0 {
            return Ok(Vec::new());
        }
        loop {
            match self.step()? {
                SelectorState::Done => break,
                SelectorState::Failed => return Err(self.exhausted()),
                _ => {}
            }
        }
        log::info!(
            "{} jeux sélectionnés en {} tirages ({} ms, {} plafonds relâchés)",
            self.requested,
            self.sampler.draws(),
            self.started.elapsed().as_millis(),
            self.relaxed_slots
        );
        Ok(self.tracker.into_games())
    }
}

use chrono::NaiveDate;
use megasena_db::models::{BatchRecord, ContestInfo, StoredBatch};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::frequency::NumberWeights;
use crate::game::{Game, BATCH_SIZE};
use crate::sampler::CandidateSampler;
use crate::seed::{derive_seed, parse_draw_date, SeedKey};
use crate::selector::BatchSelector;

/// Les 10 jeux proposés pour un concours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    contest_number: u32,
    seed_key: SeedKey,
    games: Vec<Game>,
}

impl Batch {
    pub fn contest_number(&self) -> u32 {
        self.contest_number
    }

    pub fn seed_key(&self) -> &SeedKey {
        &self.seed_key
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn to_record(&self) -> BatchRecord {
        BatchRecord {
            contest_number: self.contest_number,
            games: self.games.iter().map(|g| *g.numbers()).collect(),
        }
    }

    pub fn to_stored(&self, created_at: impl Into<String>) -> StoredBatch {
        StoredBatch {
            record: self.to_record(),
            seed_key: self.seed_key.to_string(),
            created_at: created_at.into(),
        }
    }

    /// Relit un lot persisté en revalidant chaque jeu.
    pub fn from_stored(stored: &StoredBatch) -> Result<Self> {
        let games = stored
            .record
            .games
            .iter()
            .map(|&numbers| Game::try_from(numbers))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            contest_number: stored.record.contest_number,
            seed_key: SeedKey::from_raw(stored.seed_key.clone())?,
            games,
        })
    }
}

/// Génère `count` jeux à partir d'une clé de seed.
pub fn generate_games(
    seed: &SeedKey,
    count: usize,
    config: &EngineConfig,
    weights: NumberWeights,
) -> Result<Vec<Game>> {
    config.validate()?;
    let sampler = CandidateSampler::new(seed, weights);
    let selector = BatchSelector::new(&config.filters, &config.selection, sampler, count);
    selector.run()
}

pub fn generate_batch_with_key(
    contest_number: u32,
    seed_key: SeedKey,
    config: &EngineConfig,
    weights: NumberWeights,
) -> Result<Batch> {
    let games = generate_games(&seed_key, BATCH_SIZE, config, weights)?;
    log::info!("Lot du concours {} généré (seed {})", contest_number, seed_key);
    Ok(Batch {
        contest_number,
        seed_key,
        games,
    })
}

pub fn generate_batch(
    contest_number: u32,
    next_draw_date: NaiveDate,
    config: &EngineConfig,
    weights: NumberWeights,
) -> Result<Batch> {
    let seed_key = derive_seed(contest_number, next_draw_date)?;
    generate_batch_with_key(contest_number, seed_key, config, weights)
}

/// Lot du prochain concours annoncé par le collecteur de résultats.
pub fn generate_next_batch(
    info: &ContestInfo,
    config: &EngineConfig,
    weights: NumberWeights,
) -> Result<Batch> {
    let date = parse_draw_date(&info.next_draw_date)?;
    generate_batch(info.next_contest_number, date, config, weights)
}

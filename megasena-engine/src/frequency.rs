use megasena_db::models::{Draw, NumberStats, POOL_SIZE};

/// Poids d'échantillonnage par numéro, normalisés (somme = 1).
#[derive(Debug, Clone, PartialEq)]
pub struct NumberWeights {
    probs: Vec<f64>,
}

impl NumberWeights {
    pub fn uniform() -> Self {
        let n = POOL_SIZE as usize;
        Self { probs: vec![1.0 / n as f64; n] }
    }

    /// Lissage de Dirichlet : (alpha + count) / (60·alpha + total).
    /// `counts[i]` est la fréquence observée du numéro i + 1.
    pub fn from_frequencies(counts: &[u32], alpha: f64) -> Self {
        let n = POOL_SIZE as usize;
        let count_of = |i: usize| counts.get(i).copied().unwrap_or(0) as f64;
        let total: f64 = (0..n).map(count_of).sum();
        let denominator = n as f64 * alpha + total;
        if denominator <= 0.0 {
            return Self::uniform();
        }
        let probs = (0..n).map(|i| (alpha + count_of(i)) / denominator).collect();
        Self { probs }
    }

    pub fn from_draws(draws: &[Draw], alpha: f64) -> Self {
        Self::from_frequencies(&frequencies(draws), alpha)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.probs
    }
}

impl Default for NumberWeights {
    fn default() -> Self {
        Self::uniform()
    }
}

pub fn frequencies(draws: &[Draw]) -> Vec<u32> {
    let mut counts = vec![0u32; POOL_SIZE as usize];
    for draw in draws {
        for &n in &draw.numbers {
            if (1..=POOL_SIZE).contains(&n) {
                counts[(n - 1) as usize] += 1;
            }
        }
    }
    counts
}

/// Fréquence et retard de chaque numéro ; `draws[0]` est le tirage le plus récent.
pub fn number_stats(draws: &[Draw]) -> Vec<NumberStats> {
    let mut stats: Vec<NumberStats> = (1..=POOL_SIZE)
        .map(|n| NumberStats {
            number: n,
            frequency: 0,
            gap: 0,
        })
        .collect();
    let mut seen = vec![false; POOL_SIZE as usize];

    for (i, draw) in draws.iter().enumerate() {
        for &n in &draw.numbers {
            if !(1..=POOL_SIZE).contains(&n) {
                continue;
            }
            let idx = (n - 1) as usize;
            stats[idx].frequency += 1;
            if !seen[idx] {
                seen[idx] = true;
                stats[idx].gap = i as u32;
            }
        }
    }

    for (stat, &was_seen) in stats.iter_mut().zip(&seen) {
        if !was_seen {
            stat.gap = draws.len() as u32;
        }
    }

    stats
}

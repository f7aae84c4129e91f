use std::fmt;

use crate::batch::Batch;
use crate::game::Game;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameScore {
    pub game: Game,
    pub hits: usize,
}

/// Rangs de gain de la Mega-Sena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Prize {
    Quadra,
    Quina,
    Sena,
}

impl Prize {
    pub fn from_hits(hits: usize) -> Option<Prize> {
        match hits {
            4 => Some(Prize::Quadra),
            5 => Some(Prize::Quina),
            6 => Some(Prize::Sena),
            _ => None,
        }
    }
}

impl fmt::Display for Prize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prize::Quadra => write!(f, "QUADRA"),
            Prize::Quina => write!(f, "QUINA"),
            Prize::Sena => write!(f, "SENA"),
        }
    }
}

/// Bons numéros de chaque jeu, dans l'ordre du lot.
pub fn score_games(games: &[Game], drawn: &[u8]) -> Vec<GameScore> {
    games
        .iter()
        .map(|&game| GameScore {
            game,
            hits: game.hits(drawn),
        })
        .collect()
}

pub fn score_batch(batch: &Batch, drawn: &[u8]) -> Vec<GameScore> {
    score_games(batch.games(), drawn)
}

/// Index (à partir de 1) et score du premier jeu ayant le plus de bons numéros.
pub fn best_game(scores: &[GameScore]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for (i, s) in scores.iter().enumerate() {
        match best {
            Some((_, hits)) if s.hits <= hits => {}
            _ => best = Some((i + 1, s.hits)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(numbers: [u8; 6]) -> Game {
        Game::new(&numbers).unwrap()
    }

    #[test]
    fn test_hits_per_game_in_order() {
        let games = vec![
            g([5, 18, 33, 41, 47, 52]),
            g([3, 14, 25, 32, 45, 51]),
            g([12, 28, 33, 41, 47, 54]),
        ];
        let scores = score_games(&games, &[33, 41, 47, 52, 5, 60]);
        let hits: Vec<usize> = scores.iter().map(|s| s.hits).collect();
        assert_eq!(hits, vec![5, 0, 3]);
        assert_eq!(scores[1].game, games[1]);
    }

    #[test]
    fn test_best_game_first_max() {
        let games = vec![
            g([5, 18, 33, 41, 47, 52]),
            g([3, 14, 25, 32, 45, 51]),
            g([5, 18, 33, 41, 48, 53]),
        ];
        let scores = score_games(&games, &[5, 18, 33, 41, 2, 60]);
        assert_eq!(best_game(&scores), Some((1, 4)));
        assert_eq!(best_game(&[]), None);
    }

    #[test]
    fn test_prize_tiers() {
        assert_eq!(Prize::from_hits(3), None);
        assert_eq!(Prize::from_hits(4), Some(Prize::Quadra));
        assert_eq!(Prize::from_hits(5), Some(Prize::Quina));
        assert_eq!(Prize::from_hits(6), Some(Prize::Sena));
        assert!(Prize::Sena > Prize::Quadra);
    }
}

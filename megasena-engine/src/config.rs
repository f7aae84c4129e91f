use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::filters::FilterConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Nombre maximal de jeux du lot contenant un même numéro.
    pub max_exposure: u32,
    /// Candidats valides évalués pour chaque jeu.
    pub candidates_per_slot: usize,
    /// Tirages bruts par tour d'échantillonnage d'un jeu.
    pub draws_per_slot: u64,
    /// Budget global de tirages bruts pour tout le lot.
    pub max_draws: u64,
    /// Budget global en millisecondes.
    pub time_budget_ms: u64,
    pub track_triples: bool,
    /// Plafond d'exposition à 1 quand jeux × 6 ≤ 60.
    pub balanced: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_exposure: 5,
            candidates_per_slot: 200,
            draws_per_slot: 5_000,
            max_draws: 200_000,
            time_budget_ms: 2_000,
            track_triples: true,
            balanced: false,
        }
    }
}

impl SelectionConfig {
    pub fn effective_exposure_cap(&self, games: usize) -> u32 {
        if self.balanced && games * 6 <= 60 {
            1
        } else {
            self.max_exposure
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub filters: FilterConfig,
    pub selection: SelectionConfig,
    /// Prior de Dirichlet appliqué aux fréquences historiques.
    pub frequency_alpha: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            filters: FilterConfig::default(),
            selection: SelectionConfig::default(),
            frequency_alpha: 1.0,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.filters.validate()?;
        let s = &self.selection;
        if s.max_exposure == 0 {
            return Err(EngineError::Config("max_exposure doit valoir au moins 1".to_string()));
        }
        if s.candidates_per_slot == 0 || s.draws_per_slot == 0 || s.max_draws == 0 {
            return Err(EngineError::Config("budgets d'échantillonnage nuls".to_string()));
        }
        if !(self.frequency_alpha > 0.0) {
            return Err(EngineError::Config(format!(
                "frequency_alpha doit être > 0 (reçu {})",
                self.frequency_alpha
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.filters.sum_min, 170);
        assert_eq!(config.filters.sum_max, 215);
        assert_eq!(config.selection.max_exposure, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("megasena.json");

        let mut config = EngineConfig::default();
        config.selection.max_exposure = 4;
        config.filters.max_run = 3;
        config.save(&path).unwrap();

        let restored = EngineConfig::load(&path).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{"selection": {"balanced": true}}"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert!(config.selection.balanced);
        assert_eq!(config.selection.max_exposure, 5);
        assert_eq!(config.filters, FilterConfig::default());
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            EngineConfig::load(&dir.path().join("absent.json")),
            Err(EngineError::ConfigIo(_))
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ pas du json").unwrap();
        assert!(matches!(EngineConfig::load(&bad), Err(EngineError::ConfigFormat(_))));

        let inconsistent = dir.path().join("inconsistent.json");
        std::fs::write(&inconsistent, r#"{"frequency_alpha": 0.0}"#).unwrap();
        assert!(matches!(EngineConfig::load(&inconsistent), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_balanced_cap() {
        let selection = SelectionConfig { balanced: true, ..SelectionConfig::default() };
        assert_eq!(selection.effective_exposure_cap(10), 1);
        assert_eq!(selection.effective_exposure_cap(11), 5);
        assert_eq!(SelectionConfig::default().effective_exposure_cap(10), 5);
    }
}

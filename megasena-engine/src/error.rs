//! Erreurs du moteur de génération.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Jeu mal formé transmis au moteur (nombre d'éléments, bornes, doublons).
    #[error("Jeu invalide : {0}")]
    Validation(String),

    /// Budget épuisé avant d'avoir rempli tous les jeux, même après relâchement de l'exposition.
    #[error("Génération épuisée : {filled}/{requested} jeux après {draws} tirages de candidats")]
    GenerationExhausted {
        filled: usize,
        requested: usize,
        draws: u64,
    },

    /// Numéro de concours ou date inutilisable pour dériver le seed.
    #[error("Entrée de seed invalide : {0}")]
    SeedInput(String),

    #[error("Configuration invalide : {0}")]
    Config(String),

    #[error("Lecture de la configuration : {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Format de configuration : {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

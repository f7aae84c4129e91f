mod display;
mod import;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::Rng;

use megasena_db::db::{count_draws, db_path, fetch_draw, fetch_last_draws, load_batch, migrate, open_db, save_batch};
use megasena_db::models::{validate_numbers, ContestInfo};
use megasena_db::rusqlite::Connection;
use megasena_engine::frequency::{number_stats, NumberWeights};
use megasena_engine::seed::parse_draw_date;
use megasena_engine::{
    derive_seed, generate_batch_with_key, generate_games, generate_next_batch, score_batch, Batch, EngineConfig,
    Game, SeedKey,
};

use crate::display::{
    display_draws, display_games, display_import_summary, display_scores, display_stats, display_validation,
};

const DEFAULT_CONFIG: &str = "megasena.json";

#[derive(Parser)]
#[command(name = "megasena", about = "Jeux recommandés pour la Mega-Sena")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer l'historique des tirages depuis un fichier CSV (séparateur ';')
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "assets/mega_sena.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Fréquences et retards par numéro
    Stats {
        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "100")]
        window: u32,
    },

    /// Générer et enregistrer les 10 jeux d'un concours
    Generate {
        /// Concours cible (défaut : dernier tirage en base + 1)
        #[arg(short, long)]
        contest: Option<u32>,

        /// Date du tirage cible (AAAA-MM-JJ ou JJ/MM/AAAA)
        #[arg(short, long)]
        date: String,

        /// Nouveau lot : ajoute un sel à la clé de seed
        #[arg(long)]
        fresh: bool,

        /// Biaiser l'échantillonnage par les fréquences historiques
        #[arg(long)]
        bias: bool,

        /// Fenêtre historique utilisée par --bias
        #[arg(short, long, default_value = "100")]
        window: u32,

        /// Mélanger l'ordre d'affichage des numéros
        #[arg(long)]
        shuffle: bool,

        /// Fichier de configuration du moteur
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Jeux « surpresinha », non enregistrés
    Surprise {
        /// Nombre de jeux
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// Limiter chaque numéro à un seul jeu quand c'est possible
        #[arg(long)]
        balanced: bool,

        /// Clé de seed pour la reproductibilité (défaut : horodatage aléatoire)
        #[arg(long)]
        seed: Option<String>,

        /// Mélanger l'ordre d'affichage des numéros
        #[arg(long)]
        shuffle: bool,

        /// Fichier de configuration du moteur
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Afficher le lot enregistré d'un concours
    Show {
        #[arg(short, long)]
        contest: u32,

        /// Mélanger l'ordre d'affichage des numéros
        #[arg(long)]
        shuffle: bool,
    },

    /// Compter les acertos d'un lot contre un tirage
    Check {
        #[arg(short, long)]
        contest: u32,

        /// 6 numéros tirés (défaut : tirage du concours en base)
        numbers: Vec<u8>,
    },

    /// Expliquer si une combinaison passe les filtres
    Validate {
        /// 6 numéros
        numbers: Vec<u8>,

        /// Fichier de configuration du moteur
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Exporter le lot d'un concours en JSON
    Export {
        #[arg(short, long)]
        contest: u32,

        /// Fichier de sortie (défaut : megasena_<concours>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Écrire la configuration par défaut
    Config {
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { window } => cmd_stats(&conn, window),
        Command::Generate {
            contest,
            date,
            fresh,
            bias,
            window,
            shuffle,
            config,
        } => cmd_generate(&conn, contest, &date, fresh, bias, window, shuffle, config.as_deref()),
        Command::Surprise {
            count,
            balanced,
            seed,
            shuffle,
            config,
        } => cmd_surprise(count, balanced, seed, shuffle, config.as_deref()),
        Command::Show { contest, shuffle } => cmd_show(&conn, contest, shuffle),
        Command::Check { contest, numbers } => cmd_check(&conn, contest, &numbers),
        Command::Validate { numbers, config } => cmd_validate(&numbers, config.as_deref()),
        Command::Export { contest, output } => cmd_export(&conn, contest, output),
        Command::Config { output } => cmd_config(&output),
    }
}

/// Fichier explicite, sinon `megasena.json` s'il existe, sinon les valeurs par défaut.
fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    if let Some(path) = path {
        return EngineConfig::load(path)
            .with_context(|| format!("Impossible de charger la configuration {:?}", path));
    }
    let default_path = Path::new(DEFAULT_CONFIG);
    if default_path.exists() {
        return EngineConfig::load(default_path)
            .with_context(|| format!("Impossible de charger la configuration {:?}", default_path));
    }
    println!("(Pas de fichier de configuration, utilisation des valeurs par défaut)");
    Ok(EngineConfig::default())
}

fn six_numbers(numbers: &[u8]) -> Result<[u8; 6]> {
    if numbers.len() != 6 {
        bail!("Attendu 6 numéros. Reçu : {}", numbers.len());
    }
    let mut arr = [0u8; 6];
    arr.copy_from_slice(numbers);
    validate_numbers(&arr)?;
    Ok(arr)
}

fn random_salt() -> String {
    let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S");
    format!("{}-{}", stamp, rand::rng().random_range(0..1_000_000u32))
}

fn load_stored(conn: &Connection, contest: u32) -> Result<Batch> {
    let Some(stored) = load_batch(conn, contest)? else {
        bail!("Aucun lot enregistré pour le concours {}. Lancez d'abord : megasena generate", contest);
    };
    Ok(Batch::from_stored(&stored)?)
}

fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : megasena import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, window: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : megasena import");
        return Ok(());
    }
    let effective_window = window.min(n);
    let draws = fetch_last_draws(conn, effective_window)?;
    display_stats(&number_stats(&draws), effective_window);
    Ok(())
}

fn cmd_generate(
    conn: &Connection,
    contest: Option<u32>,
    date: &str,
    fresh: bool,
    bias: bool,
    window: u32,
    shuffle: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;

    let latest = fetch_last_draws(conn, 1)?.into_iter().next();
    let info = match (contest, &latest) {
        (Some(next), _) => ContestInfo {
            contest_number: next.saturating_sub(1),
            drawn_numbers: None,
            next_contest_number: next,
            next_draw_date: date.to_string(),
        },
        (None, Some(last)) => ContestInfo {
            contest_number: last.contest,
            drawn_numbers: Some(last.numbers),
            next_contest_number: last.contest + 1,
            next_draw_date: date.to_string(),
        },
        (None, None) => bail!("Base vide : précisez le concours avec --contest"),
    };

    let weights = if bias {
        let draws = fetch_last_draws(conn, window)?;
        if draws.is_empty() {
            println!("(Historique vide, échantillonnage uniforme)");
        }
        NumberWeights::from_draws(&draws, config.frequency_alpha)
    } else {
        NumberWeights::uniform()
    };

    let batch = if fresh {
        let key = derive_seed(info.next_contest_number, parse_draw_date(&info.next_draw_date)?)?
            .with_salt(&random_salt());
        generate_batch_with_key(info.next_contest_number, key, &config, weights)?
    } else {
        generate_next_batch(&info, &config, weights)?
    };

    save_batch(conn, &batch.to_stored(chrono::Local::now().to_rfc3339()))?;

    display_games(
        &format!("Jeux recommandés pour le concours {}", batch.contest_number()),
        &presentation(batch.games(), batch.seed_key(), shuffle),
    );
    println!("Seed : {}", batch.seed_key());
    Ok(())
}

fn cmd_surprise(
    count: usize,
    balanced: bool,
    seed: Option<String>,
    shuffle: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    config.selection.balanced |= balanced;

    let key = match seed {
        Some(s) => SeedKey::from_raw(s)?,
        None => SeedKey::from_raw(format!("SURPRESINHA-{}", random_salt()))?,
    };
    let games = generate_games(&key, count, &config, NumberWeights::uniform())?;

    display_games(
        &format!("Surpresinha ({} jeux)", count),
        &presentation(&games, &key, shuffle),
    );
    println!("Seed : {}", key);
    Ok(())
}

/// Ordre d'affichage : trié, ou mélangé par le flux d'affichage de la seed.
fn presentation(games: &[Game], key: &SeedKey, shuffle: bool) -> Vec<[u8; 6]> {
    if shuffle {
        let mut rng = key.display_rng();
        games.iter().map(|g| g.shuffled(&mut rng)).collect()
    } else {
        games.iter().map(|g| *g.numbers()).collect()
    }
}

fn cmd_show(conn: &Connection, contest: u32, shuffle: bool) -> Result<()> {
    let batch = load_stored(conn, contest)?;
    display_games(
        &format!("Jeux du concours {}", contest),
        &presentation(batch.games(), batch.seed_key(), shuffle),
    );
    println!("Seed : {}", batch.seed_key());
    Ok(())
}

fn cmd_check(conn: &Connection, contest: u32, numbers: &[u8]) -> Result<()> {
    let batch = load_stored(conn, contest)?;
    let drawn = if numbers.is_empty() {
        match fetch_draw(conn, contest)? {
            Some(draw) => draw.numbers,
            None => bail!("Tirage du concours {} absent de la base : passez les 6 numéros", contest),
        }
    } else {
        six_numbers(numbers)?
    };

    let scores = score_batch(&batch, &drawn);
    display_scores(contest, &drawn, &scores);
    Ok(())
}

fn cmd_validate(numbers: &[u8], config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let game = Game::new(&six_numbers(numbers)?)?;
    display_validation(numbers, config.filters.check(&game));
    Ok(())
}

fn cmd_export(conn: &Connection, contest: u32, output: Option<PathBuf>) -> Result<()> {
    let batch = load_stored(conn, contest)?;
    let output = output.unwrap_or_else(|| PathBuf::from(format!("megasena_{}.json", contest)));
    let json = serde_json::to_string_pretty(&batch.to_record())?;
    std::fs::write(&output, json)
        .with_context(|| format!("Impossible d'écrire {:?}", output))?;
    println!("Lot exporté dans : {}", output.display());
    Ok(())
}

fn cmd_config(output: &Path) -> Result<()> {
    EngineConfig::default().save(output)?;
    println!("Configuration par défaut écrite dans : {}", output.display());
    Ok(())
}

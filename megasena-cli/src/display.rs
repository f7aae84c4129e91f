use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::import::ImportResult;
use megasena_db::models::{Draw, NumberStats};
use megasena_engine::{best_game, GameScore, Prize, Rejection};

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Concours", "Date", "Numéros"]);
    for draw in draws {
        table.add_row(vec![
            draw.contest.to_string(),
            draw.date.clone(),
            join_numbers(&draw.numbers),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_stats(stats: &[NumberStats], window: u32) {
    println!("\n📊 Statistiques sur les {} derniers tirages\n", window);

    let mut table = new_table(vec!["Numéro", "Fréquence", "Retard"]);
    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));

    for stat in &sorted {
        table.add_row(vec![
            format!("{:02}", stat.number),
            stat.frequency.to_string(),
            stat.gap.to_string(),
        ]);
    }
    println!("{table}");
}

/// `games` est déjà dans l'ordre de présentation voulu.
pub fn display_games(title: &str, games: &[[u8; 6]]) {
    println!("\n🎲 {title}\n");

    let mut table = new_table(vec!["Jeu", "Numéros"]);
    for (i, numbers) in games.iter().enumerate() {
        table.add_row(vec![format!("{}", i + 1), join_numbers(numbers)]);
    }
    println!("{table}");
}

pub fn display_scores(contest: u32, drawn: &[u8; 6], scores: &[GameScore]) {
    let mut sorted_drawn = *drawn;
    sorted_drawn.sort();
    println!("\n🎯 Concours {}, tirage : {}\n", contest, join_numbers(&sorted_drawn));

    let mut table = new_table(vec!["Jeu", "Numéros", "Bons numéros", "Rang"]);
    for (i, score) in scores.iter().enumerate() {
        let prize = Prize::from_hits(score.hits);
        let prize_cell = match prize {
            Some(p) => Cell::new(p.to_string()).fg(Color::Green),
            None => Cell::new("-"),
        };
        let numbers = score
            .game
            .numbers()
            .iter()
            .map(|n| {
                if drawn.contains(n) {
                    format!("[{:02}]", n)
                } else {
                    format!("{:02}", n)
                }
            })
            .collect::<Vec<_>>()
            .join(" - ");
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(numbers),
            Cell::new(score.hits),
            prize_cell,
        ]);
    }
    println!("{table}");

    if let Some((index, hits)) = best_game(scores) {
        println!("Meilleur jeu : n°{} avec {} bons numéros", index, hits);
    }
}

pub fn display_validation(numbers: &[u8], outcome: Result<(), Rejection>) {
    let mut sorted = numbers.to_vec();
    sorted.sort();
    match outcome {
        Ok(()) => println!("✅ {} passe tous les filtres", join_numbers(&sorted)),
        Err(reason) => println!("❌ {} rejeté : {}", join_numbers(&sorted), reason),
    }
}

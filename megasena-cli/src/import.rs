use anyhow::{bail, Context, Result};
use megasena_db::rusqlite::Connection;
use std::path::Path;

use megasena_db::db::insert_draw;
use megasena_db::models::{validate_numbers, Draw, PICK_COUNT, POOL_SIZE};
use megasena_engine::seed::parse_draw_date;

/// Premiers entiers 1-60 trouvés dans les champs, dans l'ordre.
fn scan_numbers<'a>(fields: impl Iterator<Item = &'a str>) -> Vec<u8> {
    fields
        .filter_map(|s| s.trim().parse::<u32>().ok())
        .filter(|&n| n >= 1 && n <= POOL_SIZE as u32)
        .map(|n| n as u8)
        .take(PICK_COUNT)
        .collect()
}

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let raw_contest = get(0)?;
    let contest: u32 = raw_contest
        .parse()
        .with_context(|| format!("Numéro de concours illisible : '{}'", raw_contest))?;

    let date = parse_draw_date(&get(1)?)?.format("%Y-%m-%d").to_string();

    let found = scan_numbers(record.iter().skip(2));
    if found.len() < PICK_COUNT {
        bail!("Concours {} : {} numéros trouvés sur {}", contest, found.len(), PICK_COUNT);
    }
    let mut numbers = [0u8; 6];
    numbers.copy_from_slice(&found);
    numbers.sort();
    validate_numbers(&numbers)?;

    Ok(Draw { contest, date, numbers })
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        let draw = match record_result.map_err(anyhow::Error::from).and_then(|r| parse_record(&r)) {
            Ok(draw) => draw,
            Err(e) => {
                log::warn!("Ligne {} ignorée : {:#}", result.total_records, e);
                result.errors += 1;
                continue;
            }
        };
        match insert_draw(&tx, &draw) {
            Ok(true) => result.inserted += 1,
            Ok(false) => result.skipped += 1,
            Err(e) => {
                log::warn!("Erreur insertion concours {} : {:#}", draw.contest, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    log::info!("Import de {:?} : {} insérés", path, result.inserted);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use megasena_db::db::{count_draws, fetch_draw, migrate};
    use std::io::Write;

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_parse_record_brazilian_date() {
        let draw = parse_record(&record(&["2801", "31/12/2024", "52", "05", "33", "18", "47", "41"])).unwrap();
        assert_eq!(draw.contest, 2801);
        assert_eq!(draw.date, "2024-12-31");
        assert_eq!(draw.numbers, [5, 18, 33, 41, 47, 52]);
    }

    #[test]
    fn test_parse_record_skips_noise() {
        let draw = parse_record(&record(&[
            "2801", "2024-12-31", "SP", "0", "52", "x", "5", "33", "18", "47", "41", "99", "7",
        ]))
        .unwrap();
        assert_eq!(draw.numbers, [5, 18, 33, 41, 47, 52]);
    }

    #[test]
    fn test_parse_record_errors() {
        assert!(parse_record(&record(&["abc", "31/12/2024", "1", "2", "3", "4", "5", "6"])).is_err());
        assert!(parse_record(&record(&["2801", "31-12-2024", "1", "2", "3", "4", "5", "6"])).is_err());
        assert!(parse_record(&record(&["2801", "31/12/2024", "1", "2", "3"])).is_err());
        assert!(parse_record(&record(&["2801", "31/12/2024", "1", "2", "3", "4", "5", "5"])).is_err());
    }

    #[test]
    fn test_import_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Concurso;Data do Sorteio;Bola1;Bola2;Bola3;Bola4;Bola5;Bola6").unwrap();
        writeln!(file, "2800;28/12/2024;05;18;33;41;47;52").unwrap();
        writeln!(file, "2801;31/12/2024;03;14;25;32;45;51").unwrap();
        writeln!(file, "2801;31/12/2024;03;14;25;32;45;51").unwrap();
        writeln!(file, "ligne;cassée").unwrap();
        file.flush().unwrap();

        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let result = import_csv(&conn, file.path()).unwrap();

        assert_eq!(result.total_records, 4);
        assert_eq!(result.inserted, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors, 1);
        assert_eq!(count_draws(&conn).unwrap(), 2);
        assert_eq!(fetch_draw(&conn, 2800).unwrap().unwrap().numbers, [5, 18, 33, 41, 47, 52]);
    }
}

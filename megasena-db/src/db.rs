use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;

use crate::models::{BatchRecord, Draw, StoredBatch};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    contest  INTEGER PRIMARY KEY,
    date     TEXT NOT NULL,
    n_1      INTEGER NOT NULL,
    n_2      INTEGER NOT NULL,
    n_3      INTEGER NOT NULL,
    n_4      INTEGER NOT NULL,
    n_5      INTEGER NOT NULL,
    n_6      INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS batches (
    contest_number  INTEGER PRIMARY KEY,
    seed_key        TEXT NOT NULL,
    created_at      TEXT NOT NULL,
    games           TEXT NOT NULL
);
";

const DRAW_COLUMNS: &str = "contest, date, n_1, n_2, n_3, n_4, n_5, n_6";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("megasena.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

fn draw_from_row(row: &Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        contest: row.get(0)?,
        date: row.get(1)?,
        numbers: [
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
    })
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (contest, date, n_1, n_2, n_3, n_4, n_5, n_6)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            draw.contest,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DRAW_COLUMNS} FROM draws ORDER BY contest DESC LIMIT ?1"
    ))?;
    let draws = stmt
        .query_map([limit], draw_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn fetch_draw(conn: &Connection, contest: u32) -> Result<Option<Draw>> {
    let draw = conn
        .query_row(
            &format!("SELECT {DRAW_COLUMNS} FROM draws WHERE contest = ?1"),
            [contest],
            draw_from_row,
        )
        .optional()
        .with_context(|| format!("Échec de lecture du concours {}", contest))?;
    Ok(draw)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

/// Enregistre le lot d'un concours ; un lot existant pour le même concours est remplacé.
pub fn save_batch(conn: &Connection, batch: &StoredBatch) -> Result<()> {
    let games = serde_json::to_string(&batch.record.games)
        .context("Impossible de sérialiser les jeux")?;
    conn.execute(
        "INSERT OR REPLACE INTO batches (contest_number, seed_key, created_at, games)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            batch.record.contest_number,
            batch.seed_key,
            batch.created_at,
            games,
        ],
    ).with_context(|| format!("Échec de l'enregistrement du lot {}", batch.record.contest_number))?;
    Ok(())
}

pub fn load_batch(conn: &Connection, contest_number: u32) -> Result<Option<StoredBatch>> {
    let row = conn
        .query_row(
            "SELECT seed_key, created_at, games FROM batches WHERE contest_number = ?1",
            [contest_number],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()
        .with_context(|| format!("Échec de lecture du lot {}", contest_number))?;

    let Some((seed_key, created_at, games_json)) = row else {
        return Ok(None);
    };
    let games: Vec<[u8; 6]> = serde_json::from_str(&games_json)
        .with_context(|| format!("Jeux illisibles pour le lot {}", contest_number))?;

    Ok(Some(StoredBatch {
        record: BatchRecord { contest_number, games },
        seed_key,
        created_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(contest: u32, date: &str) -> Draw {
        Draw {
            contest,
            date: date.to_string(),
            numbers: [4, 15, 27, 38, 49, 60],
        }
    }

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_count() {
        let conn = test_conn();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw(2700, "2024-03-02")).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = test_conn();

        assert!(insert_draw(&conn, &test_draw(2700, "2024-03-02")).unwrap());
        assert!(!insert_draw(&conn, &test_draw(2700, "2024-03-02")).unwrap());
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_order() {
        let conn = test_conn();

        insert_draw(&conn, &test_draw(2700, "2024-03-02")).unwrap();
        insert_draw(&conn, &test_draw(2702, "2024-03-07")).unwrap();
        insert_draw(&conn, &test_draw(2701, "2024-03-05")).unwrap();

        let draws = fetch_last_draws(&conn, 10).unwrap();
        let contests: Vec<u32> = draws.iter().map(|d| d.contest).collect();
        assert_eq!(contests, vec![2702, 2701, 2700]);

        let limited = fetch_last_draws(&conn, 2).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_fetch_single_draw() {
        let conn = test_conn();
        insert_draw(&conn, &test_draw(2700, "2024-03-02")).unwrap();

        let draw = fetch_draw(&conn, 2700).unwrap().unwrap();
        assert_eq!(draw.numbers, [4, 15, 27, 38, 49, 60]);
        assert!(fetch_draw(&conn, 9999).unwrap().is_none());
    }

    #[test]
    fn test_batch_roundtrip_and_replace() {
        let conn = test_conn();
        let mut batch = StoredBatch {
            record: BatchRecord {
                contest_number: 2801,
                games: vec![[3, 19, 32, 44, 51, 58], [8, 21, 36, 40, 47, 55]],
            },
            seed_key: "MEGASENA-2801-2024-12-31".to_string(),
            created_at: "2024-12-29T10:00:00-03:00".to_string(),
        };
        save_batch(&conn, &batch).unwrap();
        assert_eq!(load_batch(&conn, 2801).unwrap().unwrap(), batch);

        batch.record.games.pop();
        batch.seed_key.push_str("-NEW-1");
        save_batch(&conn, &batch).unwrap();
        let loaded = load_batch(&conn, 2801).unwrap().unwrap();
        assert_eq!(loaded.record.games.len(), 1);
        assert_eq!(loaded.seed_key, "MEGASENA-2801-2024-12-31-NEW-1");
    }

    #[test]
    fn test_missing_batch() {
        let conn = test_conn();
        assert!(load_batch(&conn, 1).unwrap().is_none());
    }
}

//! Leaderboard persistence through the JSON file store.

use haulage::leaderboard::{JsonFileScoreStore, Leaderboard, ScoreStore, MAX_ENTRIES};
use haulage::StoreError;
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn dir() -> TempDir {
    tempfile::tempdir().expect("temp dir")
}

#[rstest]
fn missing_file_is_an_empty_table(dir: TempDir) {
    let store = JsonFileScoreStore::new(dir.path().join("scores.json"));
    assert!(store.load().expect("load").is_empty());
}

#[rstest]
fn scores_survive_a_reload(dir: TempDir) {
    let path = dir.path().join("nested").join("scores.json");
    let mut board = Leaderboard::new(JsonFileScoreStore::new(&path));
    assert_eq!(board.submit("ana", 1200, "Standard Delivery").expect("submit"), 1);
    assert_eq!(board.submit("bo", 2400, "Time Trial").expect("submit"), 1);
    assert!(path.exists());

    let reopened = Leaderboard::new(JsonFileScoreStore::new(&path));
    let entries = reopened.entries().expect("entries");
    let rows: Vec<_> = entries
        .iter()
        .map(|entry| (entry.name.as_str(), entry.score, entry.mission.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![("bo", 2400, "Time Trial"), ("ana", 1200, "Standard Delivery")]
    );
    assert_eq!(reopened.rank_for(1800).expect("rank"), 2);
}

#[rstest]
fn table_is_capped_on_disk(dir: TempDir) {
    let path = dir.path().join("scores.json");
    let mut board = Leaderboard::new(JsonFileScoreStore::new(&path));
    for score in 0..15 {
        board.submit("p", score, "Parking Challenge").expect("submit");
    }
    let entries = board.entries().expect("entries");
    assert_eq!(entries.len(), MAX_ENTRIES);
    assert_eq!(entries.first().map(|e| e.score), Some(14));
    assert_eq!(entries.last().map(|e| e.score), Some(5));
}

#[rstest]
fn clear_removes_the_file(dir: TempDir) {
    let path = dir.path().join("scores.json");
    let mut board = Leaderboard::new(JsonFileScoreStore::new(&path));
    board.submit("p", 10, "Standard Delivery").expect("submit");
    board.clear().expect("clear");
    assert!(!path.exists());
    board.clear().expect("clearing twice is fine");
}

#[rstest]
fn corrupt_file_is_reported(dir: TempDir) {
    let path = dir.path().join("scores.json");
    std::fs::write(&path, "{ not json").expect("write");
    let board = Leaderboard::new(JsonFileScoreStore::new(&path));
    assert!(matches!(board.entries(), Err(StoreError::Format(_))));
}

use battleship_adt::prelude::*;
use battleship_adt::{
    HistoryError, BOARD_SIZE, MATCH_ID_ALPHABET, MATCH_ID_ATTEMPTS, MATCH_ID_LEN,
};
use rand::{rngs::SmallRng, RngCore, SeedableRng};

/// Generator stuck on one output, so every drawn id is the same.
struct StuckRng;

impl RngCore for StuckRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}

#[test]
fn test_move_log_replays_newest_first() {
    let mut log = MoveLog::new();
    log.record(0, 0, Outcome::Miss);
    log.record(4, 5, Outcome::Hit);
    let last = log.record(4, 6, Outcome::Sunk);
    assert_eq!(last.turn, 3);
    assert_eq!(log.len(), 3);
    assert_eq!(log.strikes(), 2);

    let turns: Vec<_> = log.replay().map(|s| s.turn).collect();
    assert_eq!(turns, vec![3, 2, 1]);

    assert_eq!(log.undo(), Some(last));
    assert_eq!(log.last().map(|s| (s.row, s.col)), Some((4, 5)));
    // the next shot reuses the undone turn number
    assert_eq!(log.record(9, 9, Outcome::Miss).turn, 3);
}

#[test]
fn test_start_match_ids() -> Result<(), HistoryError> {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut book = HistoryBook::new();
    let id = book.start_match("alice", &mut rng)?;
    assert_eq!(id.len(), MATCH_ID_LEN);
    assert!(id.bytes().all(|b| MATCH_ID_ALPHABET.contains(&b)));

    let record = book.find(&id).expect("match on record");
    assert_eq!(record.id(), id);
    assert_eq!(record.player(), "alice");
    assert!(record.moves().is_empty());
    Ok(())
}

#[test]
fn test_same_seed_same_ids() -> Result<(), HistoryError> {
    let mut rng1 = SmallRng::seed_from_u64(12345);
    let mut rng2 = SmallRng::seed_from_u64(12345);
    let mut book1 = HistoryBook::new();
    let mut book2 = HistoryBook::new();
    for _ in 0..5 {
        assert_eq!(
            book1.start_match("p", &mut rng1)?,
            book2.start_match("p", &mut rng2)?
        );
    }
    Ok(())
}

#[test]
fn test_record_and_undo_shots() -> Result<(), HistoryError> {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut book = HistoryBook::new();
    let id = book.start_match("bob", &mut rng)?;

    book.record_shot(&id, 1, 2, Outcome::Hit)?;
    let shot = book.record_shot(&id, 1, 3, Outcome::Miss)?;
    assert_eq!(shot.turn, 2);

    let err = book.record_shot(&id, BOARD_SIZE, 0, Outcome::Miss).unwrap_err();
    assert_eq!(err, HistoryError::OutOfBounds { row: BOARD_SIZE, col: 0 });

    assert_eq!(book.undo_shot(&id)?, Some(shot));
    let record = book.find(&id).unwrap();
    assert_eq!(record.moves().len(), 1);
    assert_eq!(book.undo_shot(&id)?.map(|s| s.turn), Some(1));
    assert_eq!(book.undo_shot(&id)?, None);
    Ok(())
}

#[test]
fn test_unknown_match() {
    let mut book = HistoryBook::new();
    let missing = HistoryError::UnknownMatch("ZZZZZ".to_string());
    assert_eq!(book.record_shot("ZZZZZ", 0, 0, Outcome::Hit).unwrap_err(), missing);
    assert_eq!(book.undo_shot("ZZZZZ").unwrap_err(), missing);
    assert_eq!(book.forget("ZZZZZ").unwrap_err(), missing);
    assert!(book.find("ZZZZZ").is_none());
    assert_eq!(missing.to_string(), "No match with id ZZZZZ");
}

#[test]
fn test_players_and_forget() -> Result<(), HistoryError> {
    let mut rng = SmallRng::seed_from_u64(99);
    let mut book = HistoryBook::new();
    let a1 = book.start_match("alice", &mut rng)?;
    let b1 = book.start_match("bob", &mut rng)?;
    let a2 = book.start_match("alice", &mut rng)?;
    assert_eq!(book.len(), 3);
    assert_eq!(book.player_count(), 2);

    let alice: Vec<_> = book.matches_for("alice").map(|m| m.id().to_string()).collect();
    assert_eq!(alice, vec![a1.clone(), a2.clone()]);
    assert_eq!(book.matches_for("nobody").count(), 0);

    let mut players: Vec<_> = book.players().map(|(p, n)| (p.to_string(), n)).collect();
    players.sort();
    assert_eq!(players, vec![("alice".to_string(), 2), ("bob".to_string(), 1)]);

    book.record_shot(&b1, 0, 0, Outcome::Sunk)?;
    let forgotten = book.forget(&b1)?;
    assert_eq!(forgotten.moves().len(), 1);
    assert_eq!(book.player_count(), 1);
    assert!(book.find(&b1).is_none());

    book.forget(&a1)?;
    let alice: Vec<_> = book.matches_for("alice").map(|m| m.id().to_string()).collect();
    assert_eq!(alice, vec![a2.clone()]);
    assert!(book.find(&a2).is_some());
    book.forget(&a2)?;
    assert!(book.is_empty());
    assert_eq!(book.player_count(), 0);
    Ok(())
}

#[test]
fn test_many_matches_stay_reachable() -> Result<(), HistoryError> {
    let mut rng = SmallRng::seed_from_u64(2024);
    let mut book = HistoryBook::new();
    let mut ids = Vec::new();
    for i in 0..300 {
        let player = format!("player{}", i % 120);
        let id = book.start_match(&player, &mut rng)?;
        book.record_shot(&id, (i % 10) as u8, 0, Outcome::Miss)?;
        ids.push((id, player));
    }
    assert_eq!(book.len(), 300);
    assert_eq!(book.player_count(), 120);
    for (id, player) in &ids {
        let record = book.find(id).expect("match reachable");
        assert_eq!(record.player(), player);
        assert_eq!(record.moves().len(), 1);
    }
    Ok(())
}

#[test]
fn test_outcome_parsing() {
    assert_eq!("hit".parse::<Outcome>(), Ok(Outcome::Hit));
    assert_eq!("m".parse::<Outcome>(), Ok(Outcome::Miss));
    assert_eq!("sink".parse::<Outcome>(), Ok(Outcome::Sunk));
    assert_eq!(
        "splash".parse::<Outcome>(),
        Err(HistoryError::InvalidOutcome("splash".to_string()))
    );
    assert_eq!(Outcome::Sunk.to_string(), "sunk");
    assert!(!Outcome::Miss.is_strike());
}

#[test]
fn test_start_match_gives_up_when_ids_collide() -> Result<(), HistoryError> {
    let mut book = HistoryBook::new();
    let mut rng = StuckRng;
    let id = book.start_match("dave", &mut rng)?;

    let err = book.start_match("erin", &mut rng).unwrap_err();
    assert_eq!(
        err,
        HistoryError::IdsExhausted {
            attempts: MATCH_ID_ATTEMPTS
        }
    );
    assert_eq!(book.len(), 1);
    assert_eq!(book.player_count(), 1);
    assert_eq!(book.matches_for("erin").count(), 0);

    // freeing the id makes it available again
    book.forget(&id)?;
    assert_eq!(book.start_match("erin", &mut rng)?, id);
    Ok(())
}

//! Match history built on the crate's containers.
//!
//! A [`HistoryBook`] keeps, per player, a [`Sequence`] of [`MatchRecord`]s in
//! the order the matches were started. A second dictionary maps each match id
//! to its player and the [`NodeId`] of its record, so lookups by id never
//! scan. Each match logs its shots on a [`Stack`] through [`MoveLog`], which
//! replays newest first and supports undo.
//!
//! Outcomes are whatever the caller reports; no rules are enforced here
//! beyond keeping coordinates on the board.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use rand::Rng;

use crate::common::CollectionError;
use crate::config::{BOARD_SIZE, MATCH_ID_ALPHABET, MATCH_ID_ATTEMPTS, MATCH_ID_LEN};
use crate::dictionary::Dictionary;
use crate::hash::{key_eq, string_hash};
use crate::sequence::{NodeId, Sequence};
use crate::stack::{self, Stack};

/// Errors returned by history operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// No match with this id is on record.
    UnknownMatch(String),
    /// Shot coordinates fall outside the board.
    OutOfBounds { row: u8, col: u8 },
    /// Text could not be read as an [`Outcome`].
    InvalidOutcome(String),
    /// Every drawn match id was already taken.
    IdsExhausted { attempts: usize },
    /// Underlying container failure.
    Collection(CollectionError),
}

impl From<CollectionError> for HistoryError {
    fn from(err: CollectionError) -> Self {
        HistoryError::Collection(err)
    }
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::UnknownMatch(id) => write!(f, "No match with id {}", id),
            HistoryError::OutOfBounds { row, col } => write!(
                f,
                "Shot ({}, {}) is outside the {}x{} board",
                row, col, BOARD_SIZE, BOARD_SIZE
            ),
            HistoryError::InvalidOutcome(s) => {
                write!(f, "Unknown outcome '{}', expected hit, miss or sunk", s)
            }
            HistoryError::IdsExhausted { attempts } => {
                write!(f, "No unused match id found after {} attempts", attempts)
            }
            HistoryError::Collection(e) => write!(f, "Collection error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HistoryError {}

/// Reported result of a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Hit,
    Miss,
    Sunk,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Hit => "hit",
            Outcome::Miss => "miss",
            Outcome::Sunk => "sunk",
        }
    }

    /// Hits and sinks both strike a ship segment.
    pub fn is_strike(&self) -> bool {
        !matches!(self, Outcome::Miss)
    }
}

impl FromStr for Outcome {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hit" | "h" => Ok(Outcome::Hit),
            "miss" | "m" => Ok(Outcome::Miss),
            "sunk" | "sink" | "s" => Ok(Outcome::Sunk),
            _ => Err(HistoryError::InvalidOutcome(String::from(s))),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded shot. Turns are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shot {
    pub turn: usize,
    pub row: u8,
    pub col: u8,
    pub outcome: Outcome,
}

/// Shots of a single match, newest on top.
#[derive(Debug, Default)]
pub struct MoveLog {
    moves: Stack<Shot>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a shot as the next turn and return it.
    pub fn record(&mut self, row: u8, col: u8, outcome: Outcome) -> Shot {
        let shot = Shot {
            turn: self.moves.len() + 1,
            row,
            col,
            outcome,
        };
        self.moves.push(shot);
        shot
    }

    /// Take back the most recent shot.
    pub fn undo(&mut self) -> Option<Shot> {
        self.moves.pop()
    }

    pub fn last(&self) -> Option<&Shot> {
        self.moves.top()
    }

    /// Shots in reverse order of play.
    pub fn replay(&self) -> stack::Iter<'_, Shot> {
        self.moves.iter()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Number of shots that struck a ship.
    pub fn strikes(&self) -> usize {
        self.moves.iter().filter(|s| s.outcome.is_strike()).count()
    }
}

/// A match and its shots.
#[derive(Debug)]
pub struct MatchRecord {
    id: String,
    player: String,
    moves: MoveLog,
}

impl MatchRecord {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn moves(&self) -> &MoveLog {
        &self.moves
    }
}

#[derive(Debug, Clone)]
struct MatchSlot {
    player: String,
    node: NodeId,
}

/// All matches on record, grouped by player.
#[derive(Debug)]
pub struct HistoryBook {
    by_player: Dictionary<String, Sequence<MatchRecord>>,
    index: Dictionary<String, MatchSlot>,
}

impl Default for HistoryBook {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..MATCH_ID_LEN)
        .map(|_| char::from(MATCH_ID_ALPHABET[rng.random_range(0..MATCH_ID_ALPHABET.len())]))
        .collect()
}

impl HistoryBook {
    pub fn new() -> Self {
        Self {
            by_player: Dictionary::new(string_hash::<String>, key_eq::<String>),
            index: Dictionary::new(string_hash::<String>, key_eq::<String>),
        }
    }

    /// Number of matches on record.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn player_count(&self) -> usize {
        self.by_player.len()
    }

    /// Open a new match for `player` and return its freshly drawn id.
    ///
    /// Gives up with [`HistoryError::IdsExhausted`] when
    /// [`MATCH_ID_ATTEMPTS`] draws in a row hit ids already in use.
    pub fn start_match<R: Rng + ?Sized>(
        &mut self,
        player: &str,
        rng: &mut R,
    ) -> Result<String, HistoryError> {
        let id = (0..MATCH_ID_ATTEMPTS)
            .map(|_| generate_id(&mut *rng))
            .find(|candidate| !self.index.contains_key(candidate))
            .ok_or_else(|| {
                log::warn!("no free match id after {} draws", MATCH_ID_ATTEMPTS);
                HistoryError::IdsExhausted {
                    attempts: MATCH_ID_ATTEMPTS,
                }
            })?;
        let player = String::from(player);
        let record = MatchRecord {
            id: id.clone(),
            player: player.clone(),
            moves: MoveLog::new(),
        };

        let node = match self.by_player.get_mut(&player) {
            Some(matches) => matches.try_push_back(record)?,
            None => {
                let mut matches = Sequence::new();
                let node = matches.try_push_back(record)?;
                self.by_player.insert(player.clone(), matches)?;
                node
            }
        };

        let slot = MatchSlot {
            player: player.clone(),
            node,
        };
        if let Err(err) = self.index.insert(id.clone(), slot) {
            self.detach(&player, node);
            return Err(err.into());
        }
        log::info!("started match {} for {}", id, player);
        Ok(id)
    }

    /// Unlink a record from its player's sequence, dropping the player
    /// entry once it has no matches left.
    fn detach(&mut self, player: &String, node: NodeId) -> Option<MatchRecord> {
        let matches = self.by_player.get_mut(player)?;
        let record = matches.remove(node);
        if matches.is_empty() {
            self.by_player.remove(player);
        }
        record
    }

    fn unknown(id: &str) -> HistoryError {
        HistoryError::UnknownMatch(String::from(id))
    }

    /// Record of match `id`.
    pub fn find(&self, id: &str) -> Option<&MatchRecord> {
        let slot = self.index.get(&String::from(id))?;
        self.by_player.get(&slot.player)?.get(slot.node)
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut MatchRecord, HistoryError> {
        let slot = self
            .index
            .get(&String::from(id))
            .ok_or_else(|| Self::unknown(id))?;
        self.by_player
            .get_mut(&slot.player)
            .and_then(|matches| matches.get_mut(slot.node))
            .ok_or_else(|| Self::unknown(id))
    }

    /// Log a shot for match `id`.
    pub fn record_shot(
        &mut self,
        id: &str,
        row: u8,
        col: u8,
        outcome: Outcome,
    ) -> Result<Shot, HistoryError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(HistoryError::OutOfBounds { row, col });
        }
        let shot = self.find_mut(id)?.moves.record(row, col, outcome);
        log::debug!("match {}: turn {} at ({}, {}) {}", id, shot.turn, row, col, outcome);
        Ok(shot)
    }

    /// Take back the latest shot of match `id`.
    pub fn undo_shot(&mut self, id: &str) -> Result<Option<Shot>, HistoryError> {
        Ok(self.find_mut(id)?.moves.undo())
    }

    /// Matches of `player`, oldest first.
    pub fn matches_for(&self, player: &str) -> impl Iterator<Item = &MatchRecord> + '_ {
        self.by_player
            .get(&String::from(player))
            .into_iter()
            .flat_map(|matches| matches.iter())
    }

    /// Every player with the number of matches on record.
    pub fn players(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.by_player
            .iter()
            .map(|(name, matches)| (name.as_str(), matches.len()))
    }

    /// Drop match `id` from the book and hand back its record.
    pub fn forget(&mut self, id: &str) -> Result<MatchRecord, HistoryError> {
        let slot = self
            .index
            .remove(&String::from(id))
            .ok_or_else(|| Self::unknown(id))?;
        let record = self
            .detach(&slot.player, slot.node)
            .ok_or_else(|| Self::unknown(id))?;
        log::info!("forgot match {} of {}", id, slot.player);
        Ok(record)
    }
}

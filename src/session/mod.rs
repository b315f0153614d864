//! Session registry: the surface adapters call into.
//!
//! Each session is keyed by an opaque random token. Mutating operations take
//! `&mut self`; a host serving concurrent callers wraps the registry in a lock.

use crate::card::CardSlot;
use crate::config::RulesConfig;
use crate::error::{ErrorKind, GameError};
use crate::game::{AttackMode, GameSession, Snapshot};
use crate::rng::GameRng;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    fn generate() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SessionId(Uuid::parse_str(s)?))
    }
}

/// Answer to `check_enemy`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub can_defeat: bool,
    pub expression: Option<String>,
    pub result: Option<f64>,
    pub target: u32,
}

/// Answer to `validate_expression`. Validation failures are reported here
/// rather than as errors, so adapters can show them inline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub result: Option<f64>,
    pub target: u32,
    pub error: Option<String>,
    pub kind: Option<ErrorKind>,
}

/// A hand card with its value in the hand context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandValue {
    pub card: CardSlot,
    pub label: String,
    pub value: u32,
}

#[derive(Debug)]
struct Entry {
    session: GameSession,
    seed: u64,
    created: DateTime<Utc>,
    last_touched: DateTime<Utc>,
}

/// Creation and activity times of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionMeta {
    pub seed: u64,
    pub created: DateTime<Utc>,
    pub last_touched: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SessionRegistry {
    rules: RulesConfig,
    seeds: GameRng,
    sessions: HashMap<SessionId, Entry>,
}

impl SessionRegistry {
    pub fn new(rules: RulesConfig) -> Self {
        Self::with_seed(rules, None)
    }

    /// Registry whose unseeded sessions still follow a reproducible sequence
    pub fn with_seed(rules: RulesConfig, seed: Option<u64>) -> Self {
        SessionRegistry {
            rules,
            seeds: GameRng::new(seed),
            sessions: HashMap::new(),
        }
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Deal a new game. Without a seed one is drawn from the registry.
    pub fn new_session(&mut self, seed: Option<u64>) -> (SessionId, Snapshot) {
        let seed = seed.unwrap_or_else(|| self.seeds.next_seed());
        let mut rng = GameRng::new(Some(seed));
        let session = GameSession::start(self.rules, &mut rng);
        let snapshot = session.snapshot();

        let id = SessionId::generate();
        let now = Utc::now();
        self.sessions.insert(
            id,
            Entry {
                session,
                seed,
                created: now,
                last_touched: now,
            },
        );
        info!(session = %id, seed, "session created");
        (id, snapshot)
    }

    fn entry(&self, id: SessionId) -> Result<&Entry, GameError> {
        self.sessions.get(&id).ok_or(GameError::SessionNotFound(id))
    }

    fn entry_mut(&mut self, id: SessionId) -> Result<&mut Entry, GameError> {
        self.sessions.get_mut(&id).ok_or(GameError::SessionNotFound(id))
    }

    pub fn get_state(&self, id: SessionId) -> Result<Snapshot, GameError> {
        Ok(self.entry(id)?.session.snapshot())
    }

    pub fn meta(&self, id: SessionId) -> Result<SessionMeta, GameError> {
        let entry = self.entry(id)?;
        Ok(SessionMeta {
            seed: entry.seed,
            created: entry.created,
            last_touched: entry.last_touched,
        })
    }

    pub fn check_enemy(&self, id: SessionId, enemy_index: usize) -> Result<CheckReport, GameError> {
        let check = self.entry(id)?.session.check_enemy(enemy_index)?;
        Ok(CheckReport {
            can_defeat: check.solution.is_some(),
            expression: check.solution.as_ref().map(|s| s.expression.clone()),
            result: check.solution.as_ref().map(|s| s.result),
            target: check.target,
        })
    }

    pub fn attack(
        &mut self,
        id: SessionId,
        enemy_index: usize,
        mode: AttackMode,
    ) -> Result<Snapshot, GameError> {
        let entry = self.entry_mut(id)?;
        entry.session.attack(enemy_index, mode)?;
        entry.last_touched = Utc::now();
        Ok(entry.session.snapshot())
    }

    /// Check an expression against an enemy without attacking. Only a bad
    /// session id or enemy index is an error.
    pub fn validate_expression(
        &self,
        id: SessionId,
        enemy_index: usize,
        expression: &str,
    ) -> Result<ValidationReport, GameError> {
        let session = &self.entry(id)?.session;
        let target = session.enemy_target(enemy_index)?;
        let report = match session.validate_expression(enemy_index, expression) {
            Ok(result) => ValidationReport {
                valid: true,
                result: Some(result),
                target,
                error: None,
                kind: None,
            },
            Err(err) => ValidationReport {
                valid: false,
                result: None,
                target,
                error: Some(err.to_string()),
                kind: Some(err.kind()),
            },
        };
        Ok(report)
    }

    pub fn discard(&mut self, id: SessionId, card_index: usize) -> Result<Snapshot, GameError> {
        let entry = self.entry_mut(id)?;
        entry.session.discard(card_index)?;
        entry.last_touched = Utc::now();
        Ok(entry.session.snapshot())
    }

    pub fn hand_values(&self, id: SessionId) -> Result<Vec<HandValue>, GameError> {
        let hand = self.entry(id)?.session.hand();
        Ok(hand
            .cards()
            .iter()
            .zip(hand.values())
            .map(|(slot, value)| HandValue {
                card: *slot,
                label: slot.card.to_string(),
                value,
            })
            .collect())
    }

    /// Drop a session. Returns false if it was already gone.
    pub fn expire(&mut self, id: SessionId) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            debug!(session = %id, "session expired");
        }
        removed
    }

    /// Drop every session untouched for longer than `max_idle`
    pub fn expire_idle(&mut self, max_idle: Duration) -> usize {
        self.expire_idle_at(Utc::now(), max_idle)
    }

    fn expire_idle_at(&mut self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| now - entry.last_touched <= max_idle);
        let dropped = before - self.sessions.len();
        if dropped > 0 {
            info!(dropped, remaining = self.sessions.len(), "expired idle sessions");
        }
        dropped
    }
}

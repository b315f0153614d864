use crate::card::{card_value, full_card_set, CardSlot, ANCHOR_ID};
use crate::config::RulesConfig;
use crate::error::{GameError, Zone};
use crate::game::zones::{Deck, EnemyRow, Hand};
use crate::rng::GameRng;
use crate::solver::{validate, Expr, Solution, Solver, SolverValue};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

/// Where a session is in its turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    /// Created, cards not yet dealt
    Dealt,
    /// Waiting for an attack
    Active,
    /// An attack succeeded; one non-anchor card must be discarded
    DiscardPending,
    Over { victory: bool },
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Dealt => write!(f, "cards are not dealt"),
            Phase::Active => write!(f, "waiting for an attack"),
            Phase::DiscardPending => write!(f, "a discard is pending"),
            Phase::Over { victory: true } => write!(f, "the game is won"),
            Phase::Over { victory: false } => write!(f, "the game is lost"),
        }
    }
}

/// How the player proves an attack
#[derive(Debug, Clone, PartialEq)]
pub enum AttackMode {
    /// Let the solver find an expression
    Auto,
    /// Player-supplied expression
    Manual(String),
}

/// Result of asking whether an enemy can be defeated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyCheck {
    pub target: u32,
    pub solution: Option<Solution>,
}

/// What a successful attack did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackReport {
    pub defeated: CardSlot,
    pub target: u32,
    pub expression: String,
    pub result: f64,
    pub used_anchor: bool,
    pub king_defeated: bool,
}

struct Proof {
    target: u32,
    expression: String,
    result: f64,
    used_anchor: bool,
}

/// One game: deck, hand, enemy row and the counters that decide it
#[derive(Debug, Clone)]
pub struct GameSession {
    rules: RulesConfig,
    solver: Solver,
    deck: Deck,
    hand: Hand,
    enemies: EnemyRow,
    kings_defeated: u8,
    phase: Phase,
    attacks: u32,
}

impl GameSession {
    /// A session waiting for its deal
    pub fn new(rules: RulesConfig) -> Self {
        GameSession {
            solver: Solver::new(rules.solver_value_limit),
            rules,
            deck: Deck::new(),
            hand: Hand::new(),
            enemies: EnemyRow::new(),
            kings_defeated: 0,
            phase: Phase::Dealt,
            attacks: 0,
        }
    }

    /// Create and deal in one step
    pub fn start(rules: RulesConfig, rng: &mut GameRng) -> Self {
        let mut session = GameSession::new(rules);
        session.deal_cards(rng);
        session
    }

    /// Build a session from explicit zones, already past its deal.
    /// The hand must hold the anchor exactly once and no slot may repeat.
    pub fn arranged(
        rules: RulesConfig,
        deck: Vec<CardSlot>,
        hand: Vec<CardSlot>,
        enemies: Vec<CardSlot>,
        kings_defeated: u8,
    ) -> Result<Self, GameError> {
        let anchors = hand.iter().filter(|s| s.id == ANCHOR_ID).count();
        if anchors != 1 {
            return Err(GameError::InvalidLayout(format!(
                "hand must hold the anchor exactly once, found {}",
                anchors
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = deck.iter().chain(&hand).chain(&enemies).find(|s| !seen.insert(s.id)) {
            return Err(GameError::InvalidLayout(format!("card {} appears twice", dup.card)));
        }
        if kings_defeated >= rules.kings_to_win {
            return Err(GameError::InvalidLayout(format!(
                "{} kings defeated already decides the game",
                kings_defeated
            )));
        }
        if enemies.len() > rules.enemy_row_size {
            return Err(GameError::InvalidLayout(format!(
                "enemy row holds at most {} cards",
                rules.enemy_row_size
            )));
        }

        let mut session = GameSession::new(rules);
        session.deck = Deck::from_cards(deck);
        session.hand = Hand::from_cards(hand);
        session.enemies = EnemyRow::from_cards(enemies);
        session.kings_defeated = kings_defeated;
        session.phase = Phase::Active;
        Ok(session)
    }

    /// Shuffle and deal. Only valid once, straight after `new`.
    pub fn deal(&mut self, rng: &mut GameRng) -> Result<(), GameError> {
        if self.phase != Phase::Dealt {
            return Err(GameError::IllegalStateTransition {
                action: "deal",
                phase: self.phase,
            });
        }
        self.deal_cards(rng);
        Ok(())
    }

    fn deal_cards(&mut self, rng: &mut GameRng) {
        let (anchor, rest): (Vec<CardSlot>, Vec<CardSlot>) =
            full_card_set().into_iter().partition(|s| s.id == ANCHOR_ID);

        let mut deck = Deck::from_cards(rest);
        deck.shuffle(rng);

        let mut hand = Hand::from_cards(anchor);
        for _ in 0..self.rules.opening_draw {
            if let Some(card) = deck.draw() {
                hand.add_card(card);
            }
        }

        self.deck = deck;
        self.hand = hand;
        self.enemies = EnemyRow::new();
        self.refill();
        self.phase = Phase::Active;
        debug!(seed = rng.seed(), deck = self.deck.size(), "dealt");
    }

    fn refill(&mut self) {
        while self.enemies.size() < self.rules.enemy_row_size {
            match self.deck.draw() {
                Some(card) => self.enemies.add_card(card),
                None => break,
            }
        }
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn enemies(&self) -> &EnemyRow {
        &self.enemies
    }

    pub fn kings_defeated(&self) -> u8 {
        self.kings_defeated
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Successful attacks so far
    pub fn attacks(&self) -> u32 {
        self.attacks
    }

    pub fn discard_pending(&self) -> bool {
        self.phase == Phase::DiscardPending
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Over { .. })
    }

    pub fn is_victory(&self) -> bool {
        self.phase == Phase::Over { victory: true }
    }

    /// Value the hand must reach to defeat the enemy at `index`
    pub fn enemy_target(&self, index: usize) -> Result<u32, GameError> {
        let enemy = self.enemies.get(index).ok_or(GameError::InvalidIndex {
            zone: Zone::EnemyRow,
            index,
            len: self.enemies.size(),
        })?;
        Ok(card_value(&enemy.card, self.enemies.cards()))
    }

    /// Hand cards as solver inputs, valued in the hand context
    pub fn solver_values(&self) -> Vec<SolverValue> {
        self.hand
            .cards()
            .iter()
            .zip(self.hand.values())
            .map(|(slot, value)| SolverValue::new(f64::from(value), slot.id))
            .collect()
    }

    /// Values every attack must use, and everything the hand offers
    fn required_and_available(&self) -> (Vec<f64>, Vec<f64>) {
        let mut required = Vec::with_capacity(self.hand.size());
        let mut available = Vec::with_capacity(self.hand.size());
        for (slot, value) in self.hand.cards().iter().zip(self.hand.values()) {
            let value = f64::from(value);
            if slot.id != ANCHOR_ID {
                required.push(value);
            }
            available.push(value);
        }
        (required, available)
    }

    /// Read-only: can the current hand defeat this enemy, and how
    pub fn check_enemy(&self, index: usize) -> Result<EnemyCheck, GameError> {
        let target = self.enemy_target(index)?;
        let solution = self
            .solver
            .solve(&self.solver_values(), f64::from(target), Some(ANCHOR_ID));
        Ok(EnemyCheck { target, solution })
    }

    /// Read-only: check a player's expression against this enemy
    pub fn validate_expression(&self, index: usize, expression: &str) -> Result<f64, GameError> {
        let target = self.enemy_target(index)?;
        let (required, available) = self.required_and_available();
        Ok(validate(expression, &required, &available, f64::from(target))?)
    }

    fn prove(&self, index: usize, mode: &AttackMode) -> Result<Proof, GameError> {
        let target = self.enemy_target(index)?;
        match mode {
            AttackMode::Auto => {
                let solution = self
                    .solver
                    .solve(&self.solver_values(), f64::from(target), Some(ANCHOR_ID))
                    .ok_or(GameError::NoSolutionFound { target })?;
                Ok(Proof {
                    target,
                    expression: solution.expression,
                    result: solution.result,
                    used_anchor: solution.used_exempt,
                })
            }
            AttackMode::Manual(expression) => {
                let (required, available) = self.required_and_available();
                let result = validate(expression, &required, &available, f64::from(target))?;
                let literals = Expr::parse(expression)?.literals().len();
                Ok(Proof {
                    target,
                    expression: expression.trim().to_string(),
                    result,
                    used_anchor: literals > required.len(),
                })
            }
        }
    }

    /// Defeat the enemy at `index`. The enemy joins the hand, the row is
    /// refilled, and unless the game ends a discard becomes due.
    pub fn attack(&mut self, index: usize, mode: AttackMode) -> Result<AttackReport, GameError> {
        if self.phase != Phase::Active {
            return Err(GameError::IllegalStateTransition {
                action: "attack",
                phase: self.phase,
            });
        }
        let proof = self.prove(index, &mode)?;

        let len = self.enemies.size();
        let defeated = self.enemies.remove_card(index).ok_or(GameError::InvalidIndex {
            zone: Zone::EnemyRow,
            index,
            len,
        })?;
        let king_defeated = defeated.card.is_any_king();
        if king_defeated {
            self.kings_defeated += 1;
        }
        self.hand.add_card(defeated);
        self.refill();
        self.attacks += 1;

        debug!(
            enemy = %defeated.card,
            target = proof.target,
            expression = %proof.expression,
            used_anchor = proof.used_anchor,
            "enemy defeated"
        );

        if self.kings_defeated >= self.rules.kings_to_win {
            self.phase = Phase::Over { victory: true };
            info!(attacks = self.attacks, "all kings defeated");
        } else if self.enemies.is_empty() && self.deck.is_empty() {
            self.phase = Phase::Over { victory: false };
            info!(
                attacks = self.attacks,
                kings = self.kings_defeated,
                "no enemies left, game lost"
            );
        } else {
            self.phase = Phase::DiscardPending;
        }

        Ok(AttackReport {
            defeated,
            target: proof.target,
            expression: proof.expression,
            result: proof.result,
            used_anchor: proof.used_anchor,
            king_defeated,
        })
    }

    /// Discard a non-anchor card from the hand to settle a pending discard
    pub fn discard(&mut self, index: usize) -> Result<CardSlot, GameError> {
        if self.hand.get(index).is_some_and(|slot| slot.id == ANCHOR_ID) {
            return Err(GameError::NotDiscardable { index });
        }
        if self.phase != Phase::DiscardPending {
            return Err(GameError::IllegalStateTransition {
                action: "discard",
                phase: self.phase,
            });
        }
        let len = self.hand.size();
        let card = self.hand.remove_card(index).ok_or(GameError::InvalidIndex {
            zone: Zone::Hand,
            index,
            len,
        })?;
        self.phase = Phase::Active;
        debug!(card = %card.card, "discarded");
        Ok(card)
    }
}

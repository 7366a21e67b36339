//! Turn controller.
//!
//! [`Battle`] is the authoritative reducer for one battle. It owns both
//! rosters, the random stream and the action log, and advances exactly one
//! turn per call:
//!
//! 1. reject the call if the battle is over
//! 2. pick the acting combatant from the turn pointer
//! 3. skip the turn if that combatant is frozen
//! 4. otherwise select an ability, resolve targets, compute and apply effects
//! 5. log the action, then either end the battle or advance the pointer
//!
//! Collaborators that let a human choose targets use the two-phase
//! [`Battle::begin_turn`] / [`Battle::complete_turn`] flow. It draws from the
//! random stream in exactly the same order as [`Battle::resolve_turn`], so
//! both flows stay interchangeable for replay.

mod errors;
mod snapshot;
mod turns;

pub use errors::TurnError;
pub use snapshot::{BattleSnapshot, BattleSummary, PendingCast, TurnStart};

use std::fmt;

use crate::action::{
    Action, ActionKind, CombatantSnapshot, Sides, SkipReason, apply_effect, candidate_targets,
    compute_effects, resolve_targets, select_ability,
};
use crate::env::{Clock, LcgRng, RandomSource, SystemClock};
use crate::state::{
    Ability, CombatantId, RawCharacter, Rosters, TeamTag, TurnPhase, TurnPointer, Winner,
    initialize_team,
};

/// One battle between two teams.
pub struct Battle<R: RandomSource = LcgRng> {
    battle_id: String,
    rosters: Rosters,
    pointer: TurnPointer,
    phase: TurnPhase,
    winner: Option<Winner>,
    pending: Option<PendingCast>,
    log: Vec<Action>,
    rng: R,
    clock: Box<dyn Clock>,
}

impl Battle<LcgRng> {
    /// Starts a battle seeded from `battle_id`, stamping actions with the
    /// system clock.
    ///
    /// Every party that must agree on the outcome has to use the same id.
    pub fn start(
        battle_id: impl Into<String>,
        team1: &[RawCharacter],
        team2: &[RawCharacter],
    ) -> Self {
        let battle_id = battle_id.into();
        let rng = LcgRng::from_battle_id(&battle_id);
        Self::with_parts(battle_id, team1, team2, rng, SystemClock)
    }
}

impl<R: RandomSource> Battle<R> {
    /// Starts a battle with an injected random source and clock.
    ///
    /// A battle with an empty roster on either side is created already ended.
    pub fn with_parts(
        battle_id: impl Into<String>,
        team1: &[RawCharacter],
        team2: &[RawCharacter],
        rng: R,
        clock: impl Clock + 'static,
    ) -> Self {
        let mut battle = Self {
            battle_id: battle_id.into(),
            rosters: Rosters::new(
                initialize_team(team1, TeamTag::Team1),
                initialize_team(team2, TeamTag::Team2),
            ),
            pointer: TurnPointer::default(),
            phase: TurnPhase::AwaitingTurn,
            winner: None,
            pending: None,
            log: Vec::new(),
            rng,
            clock: Box::new(clock),
        };
        battle.check_for_winner();
        battle
    }

    // ===== accessors =====

    pub fn battle_id(&self) -> &str {
        &self.battle_id
    }

    pub fn rosters(&self) -> &Rosters {
        &self.rosters
    }

    pub fn turn_pointer(&self) -> TurnPointer {
        self.pointer
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn pending_cast(&self) -> Option<&PendingCast> {
        self.pending.as_ref()
    }

    /// Every action so far, in turn order.
    pub fn log(&self) -> &[Action] {
        &self.log
    }

    pub fn last_action(&self) -> Option<&Action> {
        self.log.last()
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Digest of the action log, comparable across simulators.
    #[cfg(feature = "serde")]
    pub fn log_digest(&self) -> [u8; 32] {
        crate::action::compute_log_digest(&self.log)
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            battle_id: self.battle_id.clone(),
            rosters: self.rosters.clone(),
            turn_pointer: self.pointer,
            phase: self.phase,
            turns_resolved: self.turns_resolved(),
            is_complete: self.is_complete(),
            winner: self.winner,
            last_action: self.log.last().cloned(),
            pending_cast: self.pending.clone(),
        }
    }

    /// Battle-end notification. `None` while the battle is running.
    pub fn summary(&self) -> Option<BattleSummary> {
        self.winner.map(|winner| BattleSummary {
            battle_id: self.battle_id.clone(),
            winner,
            turns: self.turns_resolved(),
            final_state: self.rosters.clone(),
        })
    }

    // ===== turn driving =====

    /// Resolves one whole turn.
    ///
    /// `explicit_target` overrides automatic target selection when it names a
    /// combatant on either side. If a cast is pending from
    /// [`Self::begin_turn`], this completes it.
    pub fn resolve_turn(&mut self, explicit_target: Option<&str>) -> Result<Action, TurnError> {
        self.ensure_running()?;
        if self.pending.is_some() {
            return self.complete_turn(explicit_target);
        }
        match self.start_turn(false, explicit_target)? {
            TurnStart::Resolved(action) => Ok(action),
            // start_turn never defers when asked not to.
            TurnStart::AwaitingTarget(_) => Err(TurnError::NoPendingCast),
        }
    }

    /// First half of a turn.
    ///
    /// Selects the ability and, when it targets a single enemy, stops before
    /// target resolution so a player can choose. Calling this again while a
    /// cast is pending returns the same cast without touching the random
    /// stream.
    pub fn begin_turn(&mut self) -> Result<TurnStart, TurnError> {
        self.ensure_running()?;
        if let Some(pending) = &self.pending {
            return Ok(TurnStart::AwaitingTarget(pending.clone()));
        }
        self.start_turn(true, None)
    }

    /// Second half of a turn begun with [`Self::begin_turn`].
    pub fn complete_turn(&mut self, explicit_target: Option<&str>) -> Result<Action, TurnError> {
        self.ensure_running()?;
        let pending = self.pending.take().ok_or(TurnError::NoPendingCast)?;
        self.finish_cast(pending.caster, pending.ability, explicit_target)
    }

    fn ensure_running(&self) -> Result<(), TurnError> {
        match self.winner {
            Some(winner) => Err(TurnError::BattleComplete { winner }),
            None => Ok(()),
        }
    }

    fn start_turn(
        &mut self,
        defer_choice: bool,
        explicit_target: Option<&str>,
    ) -> Result<TurnStart, TurnError> {
        let team = self.pointer.team;
        let Some(caster) = turns::acting_combatant(&self.rosters, &self.pointer) else {
            self.check_for_winner();
            return Err(TurnError::NoActingCombatant { team });
        };
        let snapshot = CombatantSnapshot::from(caster);

        if caster.status.is_frozen() {
            return Ok(TurnStart::Resolved(self.skip_frozen(snapshot)));
        }

        self.phase = TurnPhase::ResolvingCast;
        let ability = select_ability(caster, &mut self.rng);

        if defer_choice && ability.effect.requires_target_choice() {
            let sides = Sides::new(self.rosters.team(team.opponent()), self.rosters.team(team));
            let candidates = candidate_targets(&ability, sides);
            if !candidates.is_empty() {
                let pending = PendingCast {
                    caster: snapshot,
                    ability,
                    candidates,
                };
                self.pending = Some(pending.clone());
                self.phase = TurnPhase::AwaitingTarget;
                return Ok(TurnStart::AwaitingTarget(pending));
            }
        }

        self.finish_cast(snapshot, ability, explicit_target)
            .map(TurnStart::Resolved)
    }

    /// Logs a skipped turn. The snapshot still shows the frozen flag; the
    /// roster copy is thawed.
    fn skip_frozen(&mut self, snapshot: CombatantSnapshot) -> Action {
        if let Some(caster) = self.rosters.find_mut(snapshot.instance_id.as_str()) {
            caster.status.thaw();
        }

        let action = Action::skipped(
            self.next_turn_number(),
            snapshot,
            SkipReason::Frozen,
            self.clock.now_millis(),
        );
        self.log.push(action.clone());
        self.pointer.advance();
        self.phase = TurnPhase::AwaitingTurn;
        action
    }

    fn finish_cast(
        &mut self,
        caster: CombatantSnapshot,
        ability: Ability,
        explicit_target: Option<&str>,
    ) -> Result<Action, TurnError> {
        self.phase = TurnPhase::ResolvingEffects;
        let team = caster.team;

        let (target_ids, effects) = {
            let Some(acting) = self
                .rosters
                .team(team)
                .iter()
                .find(|c| c.instance_id == caster.instance_id)
            else {
                self.phase = TurnPhase::AwaitingTurn;
                return Err(TurnError::NoActingCombatant { team });
            };
            let sides = Sides::new(self.rosters.team(team.opponent()), self.rosters.team(team));
            let targets = resolve_targets(&ability, acting, sides, explicit_target, &mut self.rng);
            let effects = compute_effects(&ability, acting, &targets, &mut self.rng);

            let mut target_ids: Vec<CombatantId> = Vec::with_capacity(targets.len());
            for target in &targets {
                if !target_ids.contains(&target.instance_id) {
                    target_ids.push(target.instance_id.clone());
                }
            }
            (target_ids, effects)
        };

        for effect in &effects {
            if let Some(target) = self.rosters.find_mut(effect.target_id.as_str()) {
                apply_effect(effect, target);
            }
        }

        let targets = target_ids
            .iter()
            .filter_map(|id| self.rosters.find(id.as_str()))
            .map(CombatantSnapshot::from)
            .collect();

        let action = Action {
            turn: self.next_turn_number(),
            kind: ActionKind::AbilityUsed,
            caster,
            ability: Some(ability),
            targets,
            effects,
            skip_reason: None,
            timestamp_ms: self.clock.now_millis(),
        };
        self.log.push(action.clone());

        self.phase = TurnPhase::TurnComplete;
        if !self.check_for_winner() {
            self.pointer.advance();
            self.phase = TurnPhase::AwaitingTurn;
        }
        Ok(action)
    }

    /// Ends the battle if either side is wiped out. Returns whether it ended.
    fn check_for_winner(&mut self) -> bool {
        match turns::decide_winner(&self.rosters) {
            Some(winner) => {
                self.winner = Some(winner);
                self.pending = None;
                self.phase = TurnPhase::BattleEnded;
                true
            }
            None => false,
        }
    }

    fn turns_resolved(&self) -> u32 {
        u32::try_from(self.log.len()).unwrap_or(u32::MAX)
    }

    fn next_turn_number(&self) -> u32 {
        self.turns_resolved().saturating_add(1)
    }
}

impl<R: RandomSource + fmt::Debug> fmt::Debug for Battle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Battle")
            .field("battle_id", &self.battle_id)
            .field("phase", &self.phase)
            .field("pointer", &self.pointer)
            .field("winner", &self.winner)
            .field("turns", &self.log.len())
            .field("rng", &self.rng)
            .finish_non_exhaustive()
    }
}

use crate::ai::AiController;
use crate::catalog::AttackCatalog;
use crate::combat::{connecting_attack, resolve_hit, Contact, HitOutcome};
use crate::config::MatchConfig;
use crate::constants::*;
use crate::error::ConfigError;
use crate::escalation::EscalationFlags;
use crate::fighter::{human_intent, Fighter};
use crate::hazard::{clear_hazard, update_hazard, Hazard};
use crate::init::{default_config, initial_match_state, spawn_fighters};
use crate::physics::separate_bodies;
use crate::prng::Rng;
use crate::snapshot::{FighterView, FrameSnapshot, HazardView, HudView};
use crate::types::*;

/// Everything the outside world supplies for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickInput {
    pub player: PlayerInput,
    pub escalation_level: u32,
}

/// Round/match controller: sole owner of both fighters and the match state.
#[derive(Clone, Debug)]
pub struct MatchController {
    config: MatchConfig,
    catalog: AttackCatalog,
    fighters: [Fighter; 2],
    state: MatchState,
    stats: MatchStats,
    ai: AiController,
    rng: Rng,
    prev_input: PlayerInput,
    /// Action the human started this tick. Moved into `observation` at the
    /// start of the next fighting tick.
    staged_observation: Option<ObservedAction>,
    /// Most recent action the human started; taken by the AI's next decision.
    observation: Option<ObservedAction>,
    hazard: Option<Hazard>,
    escalation_level: u32,
    flags: EscalationFlags,
    /// Wall-clock seconds since the match was (re)built. Drives the
    /// falsified health bar's oscillation.
    elapsed: f64,
    /// Events raised outside `step` (construction, resets), delivered with
    /// the next tick.
    pending: Vec<SimEvent>,
}

impl MatchController {
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let catalog = config.catalog()?;
        Ok(Self::build(config, catalog))
    }

    /// Standard rules, built-in move table.
    pub fn with_defaults(seed: u32) -> Self {
        Self::build(default_config(seed), AttackCatalog::standard())
    }

    fn build(config: MatchConfig, catalog: AttackCatalog) -> Self {
        let mut ctl = Self {
            fighters: spawn_fighters(&config),
            state: initial_match_state(&config),
            stats: MatchStats::default(),
            ai: AiController::new(),
            rng: Rng::new(config.seed),
            prev_input: NULL_INPUT,
            staged_observation: None,
            observation: None,
            hazard: None,
            escalation_level: 0,
            flags: EscalationFlags::default(),
            elapsed: 0.0,
            pending: Vec::new(),
            config,
            catalog,
        };
        ctl.reset_match();
        ctl
    }

    // ── Resets ──────────────────────────────────────────────

    /// Abandon everything and start over at round 1.
    pub fn reset_match(&mut self) {
        log::info!("match reset (seed {})", self.config.seed);
        self.state = initial_match_state(&self.config);
        self.stats = MatchStats::default();
        self.rng = Rng::new(self.config.seed);
        self.prev_input = NULL_INPUT;
        self.elapsed = 0.0;
        self.pending.clear();
        let mut events = Vec::new();
        self.start_round(1, &mut events);
        self.pending = events;
    }

    /// Abandon the current round and replay it from its intro. Tallies from
    /// earlier rounds are kept; a win already awarded for this round (reset
    /// during the outro) is taken back. Ignored once the match is over.
    pub fn reset_round(&mut self) {
        if self.state.phase == RoundPhase::MatchOver {
            log::warn!("reset_round ignored: match is over");
            return;
        }
        if self.state.phase == RoundPhase::Ended {
            self.revoke_last_round();
        }
        log::info!("round {} reset", self.state.round_number);
        let mut events = std::mem::take(&mut self.pending);
        self.start_round(self.state.round_number, &mut events);
        self.pending = events;
    }

    fn revoke_last_round(&mut self) {
        let Some(result) = self.state.last_round else {
            return;
        };
        if result.round != self.state.round_number {
            return;
        }
        let wins = match result.winner {
            Side::Player => &mut self.state.player_wins,
            Side::Opponent => &mut self.state.opponent_wins,
        };
        *wins = wins.saturating_sub(1);
        self.state.last_round = None;
        log::info!(
            "round {} result revoked ({}-{})",
            result.round,
            self.state.player_wins,
            self.state.opponent_wins
        );
    }

    fn start_round(&mut self, round: u32, events: &mut Vec<SimEvent>) {
        self.fighters = spawn_fighters(&self.config);
        self.ai = AiController::new();
        self.staged_observation = None;
        self.observation = None;
        clear_hazard(&mut self.hazard, events);
        self.state.round_number = round;
        self.state.round_timer = self.config.round_time;
        self.state.phase = RoundPhase::Starting;
        self.state.phase_timer = self.config.round_intro;
        self.state.combo_count = 0;
        self.state.combo_window = 0.0;
        log::info!("round {} announced", round);
        events.push(SimEvent::RoundAnnounced { round });
    }

    // ── Tick ────────────────────────────────────────────────

    /// Advance the simulation by `dt` seconds and return what happened.
    ///
    /// Sub-step order:
    ///  1. Round-level timers and phase; anything but `Fighting` ends the tick
    ///  2. Human fighter from input (stages the observation for the AI's
    ///     next tick)
    ///  3. AI decision + fighter update
    ///  4. Body separation
    ///  5. Hits in both directions, from a snapshot taken before either lands;
    ///     then the hazard
    ///  6. Round-end check (KO or time)
    ///  7. Combo window
    pub fn step(&mut self, dt: f64, input: &TickInput) -> Vec<SimEvent> {
        let mut events = std::mem::take(&mut self.pending);
        debug_assert!(
            self.state.phase != RoundPhase::MatchOver,
            "step called after the match ended"
        );
        if self.state.phase == RoundPhase::MatchOver {
            return events;
        }

        self.set_escalation_level(input.escalation_level);
        self.elapsed += dt;

        // 1. Round-level timers
        if !self.advance_phase(dt, &mut events) {
            self.prev_input = input.player;
            return events;
        }
        self.state.round_timer = (self.state.round_timer - dt).max(0.0);

        let arena = &self.config.arena;
        let [player, opponent] = &mut self.fighters;

        // 2. Human fighter. Last tick's action becomes visible to the AI first.
        if let Some(action) = self.staged_observation.take() {
            self.observation = Some(action);
        }
        let intent = human_intent(player, &input.player, &self.prev_input, opponent.center_x());
        let opponent_cx = opponent.center_x();
        if let Some(action) =
            player.update(dt, &intent, opponent_cx, arena, &self.catalog, &mut events)
        {
            self.staged_observation = Some(action);
        }
        self.prev_input = input.player;

        // 3. AI fighter
        let ai_intent = self.ai.update(
            dt,
            opponent,
            player,
            &mut self.observation,
            &self.flags,
            &mut self.rng,
            &mut events,
        );
        let player_cx = player.center_x();
        opponent.update(dt, &ai_intent, player_cx, arena, &self.catalog, &mut events);

        // 4. Body separation
        separate_bodies(player, opponent, arena);

        // 5. Hits, then the hazard
        let player_attack = connecting_attack(player);
        let opponent_attack = connecting_attack(opponent);
        if let Some(attack) = player_attack {
            if let Some(outcome) = resolve_hit(player, opponent, &attack, &self.flags) {
                record_hit(&mut self.state, &mut self.stats, &outcome, &mut events);
            }
        }
        if let Some(attack) = opponent_attack {
            if let Some(outcome) = resolve_hit(opponent, player, &attack, &self.flags) {
                record_hit(&mut self.state, &mut self.stats, &outcome, &mut events);
            }
        }
        update_hazard(
            &mut self.hazard,
            dt,
            &self.flags,
            player,
            arena,
            &mut self.rng,
            &mut events,
        );

        // 6. Round end
        let knockout = player.health <= 0 || opponent.health <= 0;
        if knockout || self.state.round_timer <= 0.0 {
            // Ties go to the opponent
            let winner = if player.health > opponent.health {
                Side::Player
            } else {
                Side::Opponent
            };
            let reason = if knockout {
                RoundEndReason::Knockout
            } else {
                RoundEndReason::TimeUp
            };
            self.end_round(winner, reason, &mut events);
        }

        // 7. Combo window
        if self.state.combo_window > 0.0 {
            self.state.combo_window -= dt;
            if self.state.combo_window <= 0.0 {
                self.state.combo_window = 0.0;
                self.state.combo_count = 0;
            }
        }

        events
    }

    /// Count down `Starting`/`Ended`. Returns true when gameplay should run
    /// this tick.
    fn advance_phase(&mut self, dt: f64, events: &mut Vec<SimEvent>) -> bool {
        match self.state.phase {
            RoundPhase::Fighting => true,
            RoundPhase::MatchOver => false,
            RoundPhase::Starting => {
                self.state.phase_timer -= dt;
                if self.state.phase_timer <= 0.0 {
                    self.state.phase_timer = 0.0;
                    self.state.phase = RoundPhase::Fighting;
                    let round = self.state.round_number;
                    log::info!("round {} fight", round);
                    events.push(SimEvent::FightStarted { round });
                }
                false
            }
            RoundPhase::Ended => {
                self.state.phase_timer -= dt;
                if self.state.phase_timer <= 0.0 {
                    self.state.phase_timer = 0.0;
                    self.after_outro(events);
                }
                false
            }
        }
    }

    fn end_round(&mut self, winner: Side, reason: RoundEndReason, events: &mut Vec<SimEvent>) {
        match winner {
            Side::Player => self.state.player_wins += 1,
            Side::Opponent => self.state.opponent_wins += 1,
        }
        let result = RoundResult {
            round: self.state.round_number,
            winner,
            reason,
        };
        log::info!(
            "round {} to {:?} by {:?} ({}-{})",
            result.round,
            winner,
            reason,
            self.state.player_wins,
            self.state.opponent_wins
        );
        self.state.last_round = Some(result);
        self.state.phase = RoundPhase::Ended;
        self.state.phase_timer = self.config.round_outro;
        self.staged_observation = None;
        self.observation = None;
        clear_hazard(&mut self.hazard, events);
        events.push(SimEvent::RoundOver { result });
    }

    fn after_outro(&mut self, events: &mut Vec<SimEvent>) {
        let target = self.config.rounds_to_win;
        let decided = Side::BOTH
            .into_iter()
            .find(|&side| self.state.wins(side) >= target);
        match decided {
            Some(winner) => {
                log::info!("match over, {:?} wins", winner);
                self.state.phase = RoundPhase::MatchOver;
                events.push(SimEvent::MatchOver { winner });
            }
            None => self.start_round(self.state.round_number + 1, events),
        }
    }

    // ── Accessors ───────────────────────────────────────────

    /// Re-derive the escalation flags. Also applied at the start of every tick.
    pub fn set_escalation_level(&mut self, level: u32) {
        if level != self.escalation_level {
            log::info!("escalation level {} -> {}", self.escalation_level, level);
            self.escalation_level = level;
            self.flags = EscalationFlags::from_level(level);
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn catalog(&self) -> &AttackCatalog {
        &self.catalog
    }

    pub fn fighter(&self, side: Side) -> &Fighter {
        &self.fighters[side.index()]
    }

    /// Direct access for tooling and tests; the controller remains the only
    /// writer during `step`.
    pub fn fighter_mut(&mut self, side: Side) -> &mut Fighter {
        &mut self.fighters[side.index()]
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    pub fn escalation_level(&self) -> u32 {
        self.escalation_level
    }

    /// The human action the AI has not consumed yet, newest first.
    pub fn pending_observation(&self) -> Option<ObservedAction> {
        self.staged_observation.or(self.observation)
    }

    pub fn ai(&self) -> &AiController {
        &self.ai
    }

    pub fn is_match_over(&self) -> bool {
        self.state.phase == RoundPhase::MatchOver
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let [player, opponent] = &self.fighters;
        FrameSnapshot {
            fighters: [
                FighterView::of(player, &self.flags, self.elapsed),
                FighterView::of(opponent, &self.flags, self.elapsed),
            ],
            hud: HudView::of(&self.state),
            hazard: self.hazard.as_ref().map(HazardView::from),
            escalation_level: self.escalation_level,
            flags: self.flags,
            stats: self.stats,
        }
    }
}

/// Tally a resolved hit: stats, the human's combo and score, cues, sparks.
fn record_hit(
    state: &mut MatchState,
    stats: &mut MatchStats,
    outcome: &HitOutcome,
    events: &mut Vec<SimEvent>,
) {
    match outcome.contact {
        Contact::Blocked => {
            stats.hits_blocked[outcome.defender.index()] += 1;
            events.push(SimEvent::Cue { cue: Cue::Block });
        }
        Contact::Clean => {
            stats.hits_landed[outcome.attacker.index()] += 1;
            events.push(SimEvent::Cue { cue: Cue::Hit });
            if outcome.attacker == Side::Player {
                state.combo_count += 1;
                state.combo_window = COMBO_WINDOW_SECONDS;
                state.score += outcome.damage.max(0) as u32 * SCORE_PER_DAMAGE;
                stats.best_combo = stats.best_combo.max(state.combo_count);
            } else {
                state.combo_count = 0;
                state.combo_window = 0.0;
            }
        }
    }
    events.push(SimEvent::HitSpark {
        at: outcome.spark,
        blocked: outcome.contact == Contact::Blocked,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = FRAME_SECONDS;

    fn idle(level: u32) -> TickInput {
        TickInput {
            player: NULL_INPUT,
            escalation_level: level,
        }
    }

    /// Step through the intro until gameplay starts.
    fn fight(ctl: &mut MatchController) -> Vec<SimEvent> {
        let mut events = Vec::new();
        let mut ticks = 0;
        while ctl.state.phase != RoundPhase::Fighting {
            events.extend(ctl.step(DT, &idle(0)));
            ticks += 1;
            assert!(ticks < 1000);
        }
        events
    }

    fn finish_outro(ctl: &mut MatchController) -> Vec<SimEvent> {
        let mut events = Vec::new();
        let mut ticks = 0;
        while ctl.state.phase == RoundPhase::Ended {
            events.extend(ctl.step(DT, &idle(0)));
            ticks += 1;
            assert!(ticks < 1000);
        }
        events
    }

    #[test]
    fn intro_announces_then_fights() {
        let mut ctl = MatchController::with_defaults(1);
        let events = fight(&mut ctl);
        assert_eq!(events[0], SimEvent::RoundAnnounced { round: 1 });
        assert_eq!(events.last(), Some(&SimEvent::FightStarted { round: 1 }));
        assert_eq!(ctl.state.round_timer, ROUND_TIME_SECONDS);
        // No gameplay during the intro
        assert_eq!(ctl.fighter(Side::Player).x, PLAYER_SPAWN_X);
    }

    #[test]
    fn time_up_goes_to_higher_health() {
        let mut ctl = MatchController::with_defaults(1);
        fight(&mut ctl);
        ctl.fighter_mut(Side::Player).health = 40;
        ctl.fighter_mut(Side::Opponent).health = 55;
        ctl.state.round_timer = DT / 2.0;

        let events = ctl.step(DT, &idle(0));
        assert_eq!(ctl.state.phase, RoundPhase::Ended);
        assert_eq!(ctl.state.opponent_wins, 1);
        assert_eq!(ctl.state.player_wins, 0);
        assert!(events.contains(&SimEvent::RoundOver {
            result: RoundResult {
                round: 1,
                winner: Side::Opponent,
                reason: RoundEndReason::TimeUp,
            }
        }));
    }

    #[test]
    fn tie_on_time_goes_to_opponent() {
        let mut ctl = MatchController::with_defaults(2);
        fight(&mut ctl);
        ctl.fighter_mut(Side::Player).health = 70;
        ctl.fighter_mut(Side::Opponent).health = 70;
        ctl.state.round_timer = DT / 2.0;

        ctl.step(DT, &idle(0));
        assert_eq!(ctl.state.last_round.map(|r| r.winner), Some(Side::Opponent));
    }

    #[test]
    fn knockout_on_connecting_punch() {
        let mut ctl = MatchController::with_defaults(3);
        fight(&mut ctl);

        let punch = BoundAttack {
            kind: AttackKind::Punch,
            definition: attack_stats(AttackKind::Punch),
        };
        {
            let p = ctl.fighter_mut(Side::Player);
            p.x = 300.0;
            p.state = CombatState::Attacking;
            p.active_attack = Some(punch);
            p.attack_frame_counter = punch.definition.startup_frames - 1;
        }
        {
            let o = ctl.fighter_mut(Side::Opponent);
            o.x = 370.0;
            o.health = 1;
        }

        let events = ctl.step(DT, &idle(0));
        assert_eq!(ctl.fighter(Side::Opponent).health, 0);
        assert!(events.contains(&SimEvent::Cue { cue: Cue::Hit }));
        assert_eq!(
            ctl.state.last_round,
            Some(RoundResult {
                round: 1,
                winner: Side::Player,
                reason: RoundEndReason::Knockout,
            })
        );
        assert_eq!(ctl.stats.hits_landed, [1, 0]);
        assert_eq!(ctl.state.score, SCORE_PER_DAMAGE);
        assert_eq!(ctl.state.combo_count, 1);
    }

    #[test]
    fn match_ends_exactly_at_two_wins() {
        let mut ctl = MatchController::with_defaults(4);
        for round in 1..=2 {
            fight(&mut ctl);
            assert_eq!(ctl.state.round_number, round);
            ctl.fighter_mut(Side::Player).health = 0;
            ctl.step(DT, &idle(0));
            assert_eq!(ctl.state.opponent_wins, round);
            assert!(!ctl.is_match_over(), "outro still running");

            let events = finish_outro(&mut ctl);
            if round == 1 {
                assert!(events.contains(&SimEvent::RoundAnnounced { round: 2 }));
                assert_eq!(ctl.fighter(Side::Player).health, MAX_HEALTH);
            } else {
                assert_eq!(
                    events.last(),
                    Some(&SimEvent::MatchOver {
                        winner: Side::Opponent
                    })
                );
            }
        }
        assert!(ctl.is_match_over());
        assert_eq!(ctl.state.winner(), Some(Side::Opponent));
        assert_eq!(ctl.state.round_number, 2);
    }

    #[test]
    fn reset_match_clears_tallies() {
        let mut ctl = MatchController::with_defaults(5);
        fight(&mut ctl);
        ctl.fighter_mut(Side::Player).health = 0;
        ctl.step(DT, &idle(0));
        assert_eq!(ctl.state.opponent_wins, 1);

        ctl.reset_match();
        assert_eq!(ctl.state.opponent_wins, 0);
        assert_eq!(ctl.state.round_number, 1);
        assert_eq!(ctl.state.phase, RoundPhase::Starting);
        assert_eq!(ctl.stats, MatchStats::default());
        let events = ctl.step(DT, &idle(0));
        assert_eq!(events, vec![SimEvent::RoundAnnounced { round: 1 }]);
    }

    #[test]
    fn reset_round_keeps_tallies_and_drops_round_state() {
        let mut ctl = MatchController::with_defaults(6);
        fight(&mut ctl);
        ctl.fighter_mut(Side::Player).health = 0;
        ctl.step(DT, &idle(0));
        finish_outro(&mut ctl);
        fight(&mut ctl);

        ctl.fighter_mut(Side::Opponent).health = 12;
        ctl.observation = Some(ObservedAction::Kick);
        ctl.state.combo_count = 3;
        ctl.reset_round();

        assert_eq!(ctl.state.round_number, 2);
        assert_eq!(ctl.state.opponent_wins, 1);
        assert_eq!(ctl.state.phase, RoundPhase::Starting);
        assert_eq!(ctl.fighter(Side::Opponent).health, MAX_HEALTH);
        assert_eq!(ctl.pending_observation(), None);
        assert_eq!(ctl.state.combo_count, 0);
    }

    #[test]
    fn reset_during_outro_replays_the_round_without_its_win() {
        let mut ctl = MatchController::with_defaults(9);
        fight(&mut ctl);
        ctl.fighter_mut(Side::Player).health = 0;
        ctl.step(DT, &idle(0));
        assert_eq!(ctl.state.phase, RoundPhase::Ended);
        assert_eq!(ctl.state.opponent_wins, 1);

        ctl.reset_round();
        assert_eq!(ctl.state.round_number, 1);
        assert_eq!(ctl.state.opponent_wins, 0);
        assert_eq!(ctl.state.last_round, None);

        fight(&mut ctl);
        ctl.fighter_mut(Side::Player).health = 0;
        ctl.step(DT, &idle(0));
        assert_eq!(ctl.state.opponent_wins, 1);
        let events = finish_outro(&mut ctl);
        assert!(!ctl.is_match_over());
        assert!(events.contains(&SimEvent::RoundAnnounced { round: 2 }));
    }

    #[test]
    fn ai_sees_an_attack_only_on_the_following_tick() {
        let punch = TickInput {
            player: PlayerInput::new(button::PUNCH),
            escalation_level: 2,
        };
        // Vary the lead-in so the AI's decision cycle lands on every phase
        for lead in 0..8 {
            let mut ctl = MatchController::with_defaults(10);
            fight(&mut ctl);
            for _ in 0..lead {
                ctl.step(DT, &idle(2));
            }
            ctl.step(DT, &punch);
            assert_eq!(ctl.fighter(Side::Player).state, CombatState::Attacking);
            assert_eq!(
                ctl.pending_observation(),
                Some(ObservedAction::Punch),
                "lead {}: observation consumed on the tick it was made",
                lead
            );

            let mut ticks = 0;
            while ctl.pending_observation().is_some() {
                ctl.step(DT, &idle(2));
                ticks += 1;
                assert!(ticks < 30);
            }
            assert!(ctl.ai().last_intent().block, "lead {}", lead);
        }
    }

    #[test]
    fn observed_special_makes_omniscient_ai_jump() {
        let mut ctl = MatchController::with_defaults(7);
        fight(&mut ctl);
        ctl.fighter_mut(Side::Player).special_charge = SPECIAL_CHARGE_MAX;

        let special = TickInput {
            player: PlayerInput::new(button::SPECIAL),
            escalation_level: 4,
        };
        ctl.step(DT, &special);
        assert_eq!(ctl.fighter(Side::Player).state, CombatState::Attacking);

        let mut ticks = 0;
        while ctl.pending_observation().is_some() {
            ctl.step(DT, &idle(4));
            ticks += 1;
            assert!(ticks < 10);
        }
        assert!(ctl.ai().last_intent().jump);
        assert!(!ctl.ai().last_intent().block);
        assert_eq!(ctl.fighter(Side::Opponent).state, CombatState::Jumping);
    }

    #[test]
    fn snapshot_reflects_escalation() {
        let mut ctl = MatchController::with_defaults(8);
        fight(&mut ctl);
        ctl.fighter_mut(Side::Player).health = 50;
        ctl.step(DT, &idle(3));

        let snap = ctl.snapshot();
        assert_eq!(snap.escalation_level, 3);
        assert!(snap.flags.health_display_falsified);
        let player = &snap.fighters[Side::Player.index()];
        assert_eq!(player.true_health_fraction, 0.5);
        assert!(player.displayed_health_fraction > 0.5);
        assert_eq!(snap.hud.banner, None);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = MatchConfig {
            rounds_to_win: 0,
            ..MatchConfig::default()
        };
        assert_eq!(
            MatchController::new(config).err(),
            Some(ConfigError::NoRoundsToWin)
        );
    }
}

use hexcade_core::{
    default_config, AttackEntry, Cue, FighterView, FrameSnapshot, HazardView, HudView,
    MatchConfig, MatchController, PlayerInput, RoundEndReason, RoundPhase, SimEvent, Side,
    TickInput,
};
use log::LevelFilter;
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod logger;

/// Longest frame simulated per `step` call.
const MAX_FRAME_SECONDS: f64 = 0.25;

/// Install the panic hook and the console logger.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logger::init(LevelFilter::Info);
}

/// Change the console log level ("off", "error", "warn", "info", "debug",
/// "trace"). Returns false for an unknown name.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match logger::parse_level(level) {
        Some(filter) => {
            logger::init(filter);
            true
        }
        None => false,
    }
}

// ── JS mirrors ──────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsFighter {
    side: &'static str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    facing: i32,
    state: &'static str,
    attack: Option<&'static str>,
    attack_frame: u32,
    attack_total_frames: u32,
    health: i32,
    max_health: i32,
    true_health: f64,
    displayed_health: f64,
    invincible: bool,
    crouching: bool,
    on_ground: bool,
    special_charge: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsHud {
    round_number: u32,
    round_timer: f64,
    timer_display: u32,
    player_wins: u32,
    opponent_wins: u32,
    phase: &'static str,
    banner: Option<String>,
    combo_count: u32,
    combo_window: f64,
    score: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsHazard {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    lifetime: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsFlags {
    ai_aggressive: bool,
    ai_omniscient: bool,
    health_display_falsified: bool,
    chip_damage_on_block: bool,
    hazard_eligible: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsStats {
    player_hits: u32,
    opponent_hits: u32,
    player_blocks: u32,
    opponent_blocks: u32,
    best_combo: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsFrame {
    player: JsFighter,
    opponent: JsFighter,
    hud: JsHud,
    hazard: Option<JsHazard>,
    escalation_level: u32,
    flags: JsFlags,
    stats: JsStats,
}

/// Flat event record; `kind` says which of the optional fields are set.
#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsEvent {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cue: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    round: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsAttack {
    name: String,
    damage: i32,
    range: f64,
    startup_frames: u32,
    active_frames: u32,
    recovery_frames: u32,
    hitstun_frames: u32,
    total_frames: u32,
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::Player => "player",
        Side::Opponent => "opponent",
    }
}

fn phase_name(phase: RoundPhase) -> &'static str {
    match phase {
        RoundPhase::Starting => "starting",
        RoundPhase::Fighting => "fighting",
        RoundPhase::Ended => "ended",
        RoundPhase::MatchOver => "matchOver",
    }
}

fn cue_name(cue: Cue) -> &'static str {
    match cue {
        Cue::Jump => "jump",
        Cue::Hit => "hit",
        Cue::Block => "block",
        Cue::Strike => "strike",
        Cue::Special => "special",
    }
}

fn fighter_to_js(f: &FighterView) -> JsFighter {
    JsFighter {
        side: side_name(f.side),
        x: f.x,
        y: f.y,
        width: f.width,
        height: f.height,
        facing: f.facing,
        state: f.state.as_str(),
        attack: f.attack.map(|a| a.name()),
        attack_frame: f.attack_frame,
        attack_total_frames: f.attack_total_frames,
        health: f.health,
        max_health: f.max_health,
        true_health: f.true_health_fraction,
        displayed_health: f.displayed_health_fraction,
        invincible: f.invincible,
        crouching: f.crouching,
        on_ground: f.on_ground,
        special_charge: f.special_charge,
    }
}

fn hud_to_js(h: &HudView) -> JsHud {
    JsHud {
        round_number: h.round_number,
        round_timer: h.round_timer,
        timer_display: h.timer_display,
        player_wins: h.player_wins,
        opponent_wins: h.opponent_wins,
        phase: phase_name(h.phase),
        banner: h.banner.clone(),
        combo_count: h.combo_count,
        combo_window: h.combo_window,
        score: h.score,
    }
}

fn hazard_to_js(h: &HazardView) -> JsHazard {
    JsHazard {
        x: h.x,
        y: h.y,
        width: h.width,
        height: h.height,
        lifetime: h.lifetime,
    }
}

fn frame_to_js(s: &FrameSnapshot) -> JsFrame {
    let [player, opponent] = &s.fighters;
    JsFrame {
        player: fighter_to_js(player),
        opponent: fighter_to_js(opponent),
        hud: hud_to_js(&s.hud),
        hazard: s.hazard.as_ref().map(hazard_to_js),
        escalation_level: s.escalation_level,
        flags: JsFlags {
            ai_aggressive: s.flags.ai_aggressive,
            ai_omniscient: s.flags.ai_omniscient,
            health_display_falsified: s.flags.health_display_falsified,
            chip_damage_on_block: s.flags.chip_damage_on_block,
            hazard_eligible: s.flags.hazard_eligible,
        },
        stats: JsStats {
            player_hits: s.stats.hits_landed[Side::Player.index()],
            opponent_hits: s.stats.hits_landed[Side::Opponent.index()],
            player_blocks: s.stats.hits_blocked[Side::Player.index()],
            opponent_blocks: s.stats.hits_blocked[Side::Opponent.index()],
            best_combo: s.stats.best_combo,
        },
    }
}

fn event_to_js(e: &SimEvent) -> JsEvent {
    match e {
        SimEvent::Cue { cue } => JsEvent {
            kind: "cue",
            cue: Some(cue_name(*cue)),
            ..Default::default()
        },
        SimEvent::HitSpark { at, blocked } => JsEvent {
            kind: "hitSpark",
            x: Some(at.x),
            y: Some(at.y),
            blocked: Some(*blocked),
            ..Default::default()
        },
        SimEvent::RoundAnnounced { round } => JsEvent {
            kind: "roundAnnounced",
            round: Some(*round),
            ..Default::default()
        },
        SimEvent::FightStarted { round } => JsEvent {
            kind: "fightStarted",
            round: Some(*round),
            ..Default::default()
        },
        SimEvent::RoundOver { result } => JsEvent {
            kind: "roundOver",
            round: Some(result.round),
            winner: Some(side_name(result.winner)),
            reason: Some(match result.reason {
                RoundEndReason::Knockout => "ko",
                RoundEndReason::TimeUp => "time",
            }),
            ..Default::default()
        },
        SimEvent::MatchOver { winner } => JsEvent {
            kind: "matchOver",
            winner: Some(side_name(*winner)),
            ..Default::default()
        },
        SimEvent::Narrative { narrative } => JsEvent {
            kind: "narrative",
            message: Some(narrative.message()),
            ..Default::default()
        },
        SimEvent::HazardSpawned { at } => JsEvent {
            kind: "hazardSpawned",
            x: Some(at.x),
            y: Some(at.y),
            ..Default::default()
        },
        SimEvent::HazardDespawned => JsEvent {
            kind: "hazardDespawned",
            ..Default::default()
        },
    }
}

fn attack_to_js(entry: &AttackEntry) -> JsAttack {
    let d = &entry.definition;
    JsAttack {
        name: entry.name.clone(),
        damage: d.damage,
        range: d.range,
        startup_frames: d.startup_frames,
        active_frames: d.active_frames,
        recovery_frames: d.recovery_frames,
        hitstun_frames: d.hitstun_frames,
        total_frames: d.total_frames(),
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        log::error!("failed to convert to JS: {}", e);
        JsValue::NULL
    })
}

/// Parse a JSON config (empty means defaults) and build a controller. The
/// `seed` argument always wins over a seed inside the JSON.
fn build_controller(seed: u32, config_json: &str) -> Result<MatchController, String> {
    let mut config: MatchConfig = if config_json.trim().is_empty() {
        default_config(seed)
    } else {
        serde_json::from_str(config_json).map_err(|e| format!("invalid config JSON: {}", e))?
    };
    config.seed = seed;
    MatchController::new(config).map_err(|e| e.to_string())
}

// ── Match handle ────────────────────────────────────────────

#[wasm_bindgen]
pub struct WasmMatch {
    inner: MatchController,
}

#[wasm_bindgen]
impl WasmMatch {
    /// Build from seed and config JSON. Malformed or invalid config falls back
    /// to the defaults with a console warning.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, config_json: &str) -> WasmMatch {
        let inner = build_controller(seed, config_json).unwrap_or_else(|e| {
            log::warn!("{}; using default match config", e);
            MatchController::with_defaults(seed)
        });
        WasmMatch { inner }
    }

    /// Strict variant of the constructor: rejects bad config.
    pub fn try_new(seed: u32, config_json: &str) -> Result<WasmMatch, JsValue> {
        build_controller(seed, config_json)
            .map(|inner| WasmMatch { inner })
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Standard rules.
    pub fn new_default(seed: u32) -> WasmMatch {
        WasmMatch {
            inner: MatchController::with_defaults(seed),
        }
    }

    /// Strict construction from a plain JS config object.
    pub fn from_config_object(seed: u32, config: JsValue) -> Result<WasmMatch, JsValue> {
        // JSON.stringify -> serde_json, same path as the string constructor
        let json = js_sys::JSON::stringify(&config)
            .map(String::from)
            .map_err(|_| JsValue::from_str("config object is not JSON-serializable"))?;
        WasmMatch::try_new(seed, &json)
    }

    /// Advance by `dt` seconds. Returns the tick's events as an array of
    /// `{ kind, ... }` objects.
    pub fn step(&mut self, dt: f64, buttons: u8, escalation_level: u32) -> JsValue {
        if self.inner.is_match_over() || !dt.is_finite() || dt <= 0.0 {
            return to_js(&Vec::<JsEvent>::new());
        }
        let input = TickInput {
            player: PlayerInput::new(buttons),
            escalation_level,
        };
        let events = self.inner.step(dt.min(MAX_FRAME_SECONDS), &input);
        let js: Vec<JsEvent> = events.iter().map(event_to_js).collect();
        to_js(&js)
    }

    /// Everything needed to draw the current frame.
    pub fn export_frame(&self) -> JsValue {
        to_js(&frame_to_js(&self.inner.snapshot()))
    }

    /// The move table in effect.
    pub fn attack_catalog(&self) -> JsValue {
        let js: Vec<JsAttack> = self.inner.catalog().entries().iter().map(attack_to_js).collect();
        to_js(&js)
    }

    /// Config in effect, as JSON.
    pub fn export_config(&self) -> String {
        serde_json::to_string(self.inner.config()).unwrap_or_default()
    }

    pub fn reset_match(&mut self) {
        self.inner.reset_match();
    }

    pub fn reset_round(&mut self) {
        self.inner.reset_round();
    }

    pub fn set_escalation_level(&mut self, level: u32) {
        self.inner.set_escalation_level(level);
    }

    // Quick accessors
    pub fn round_number(&self) -> u32 { self.inner.state().round_number }
    pub fn player_wins(&self) -> u32 { self.inner.state().player_wins }
    pub fn opponent_wins(&self) -> u32 { self.inner.state().opponent_wins }
    pub fn phase(&self) -> String { phase_name(self.inner.state().phase).to_string() }
    pub fn match_over(&self) -> bool { self.inner.is_match_over() }
    pub fn escalation_level(&self) -> u32 { self.inner.escalation_level() }

    /// 0 = player, 1 = opponent, -1 while undecided.
    pub fn winner(&self) -> i32 {
        self.inner.state().winner().map_or(-1, |s| s.index() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexcade_core::{Narrative, RoundResult, Vec2};

    #[test]
    fn empty_json_means_defaults() {
        let ctl = build_controller(9, "").unwrap();
        assert_eq!(ctl.config(), &default_config(9));
    }

    #[test]
    fn seed_argument_overrides_json() {
        let ctl = build_controller(3, r#"{"seed": 100, "round_time": 45.0}"#).unwrap();
        assert_eq!(ctl.config().seed, 3);
        assert_eq!(ctl.config().round_time, 45.0);
    }

    #[test]
    fn bad_config_is_reported() {
        let err = build_controller(1, "{not json").err().unwrap();
        assert!(err.starts_with("invalid config JSON"));

        let err = build_controller(1, r#"{"rounds_to_win": 0}"#).err().unwrap();
        assert!(err.contains("round"));
    }

    #[test]
    fn events_flatten_for_js() {
        let spark = event_to_js(&SimEvent::HitSpark {
            at: Vec2 { x: 10.0, y: 20.0 },
            blocked: true,
        });
        assert_eq!(spark.kind, "hitSpark");
        assert_eq!(spark.x, Some(10.0));
        assert_eq!(spark.blocked, Some(true));
        assert_eq!(spark.round, None);

        let over = event_to_js(&SimEvent::RoundOver {
            result: RoundResult {
                round: 2,
                winner: Side::Opponent,
                reason: RoundEndReason::TimeUp,
            },
        });
        assert_eq!(over.winner, Some("opponent"));
        assert_eq!(over.reason, Some("time"));

        let taunt = event_to_js(&SimEvent::Narrative {
            narrative: Narrative::OpponentOmniscient,
        });
        assert_eq!(taunt.message, Some(Narrative::OpponentOmniscient.message()));
    }

    #[test]
    fn frame_mirrors_snapshot() {
        let ctl = MatchController::with_defaults(1);
        let frame = frame_to_js(&ctl.snapshot());
        assert_eq!(frame.player.side, "player");
        assert_eq!(frame.opponent.facing, -1);
        assert_eq!(frame.hud.phase, "starting");
        assert_eq!(frame.hud.banner.as_deref(), Some("ROUND 1"));
        assert!(frame.hazard.is_none());
    }
}

pub mod ai;
pub mod catalog;
pub mod combat;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod escalation;
pub mod fighter;
pub mod hazard;
pub mod init;
pub mod physics;
pub mod prng;
pub mod snapshot;
pub mod types;

pub use ai::{decide, AiController, AiDecision};
pub use catalog::{AttackCatalog, AttackEntry};
pub use combat::{attack_hurtbox, connecting_attack, resolve_hit, Contact, HitOutcome};
pub use config::{ArenaBounds, MatchConfig};
pub use constants::*;
pub use controller::{MatchController, TickInput};
pub use error::{CatalogError, ConfigError};
pub use escalation::{displayed_health_fraction, EscalationFlags};
pub use fighter::{human_intent, Fighter};
pub use hazard::Hazard;
pub use init::*;
pub use prng::Rng;
pub use snapshot::{FighterView, FrameSnapshot, HazardView, HudView};
pub use types::*;

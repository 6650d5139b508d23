use serde::{Deserialize, Serialize};

use crate::constants::{attack_stats, ATTACK_ROTATION};
use crate::error::CatalogError;
use crate::types::{AttackDefinition, AttackKind};

/// A named definition as it appears in configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackEntry {
    pub name: String,
    #[serde(flatten)]
    pub definition: AttackDefinition,
}

/// Static table of move definitions.
///
/// A catalog is validated once, when it is built. After that every lookup
/// is keyed by [`AttackKind`] and cannot fail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackCatalog {
    definitions: [AttackDefinition; 3],
}

impl AttackCatalog {
    /// The built-in move table.
    pub fn standard() -> Self {
        Self {
            definitions: ATTACK_ROTATION.map(attack_stats),
        }
    }

    /// Build a catalog from named entries. Every move must appear exactly once.
    pub fn from_entries<I>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = AttackEntry>,
    {
        let mut slots: [Option<AttackDefinition>; 3] = [None; 3];
        for entry in entries {
            let kind = AttackKind::from_name(&entry.name)
                .ok_or_else(|| CatalogError::UnknownMove(entry.name.clone()))?;
            validate_definition(kind, &entry.definition)?;
            let slot = &mut slots[kind.index()];
            if slot.is_some() {
                return Err(CatalogError::DuplicateMove(kind.name()));
            }
            *slot = Some(entry.definition);
        }

        let mut definitions = ATTACK_ROTATION.map(attack_stats);
        for kind in ATTACK_ROTATION {
            definitions[kind.index()] =
                slots[kind.index()].ok_or(CatalogError::MissingMove(kind.name()))?;
        }
        Ok(Self { definitions })
    }

    pub fn get(&self, kind: AttackKind) -> &AttackDefinition {
        &self.definitions[kind.index()]
    }

    /// Name-based lookup for callers holding a move name from outside the crate.
    pub fn lookup(&self, name: &str) -> Result<&AttackDefinition, CatalogError> {
        AttackKind::from_name(name)
            .map(|kind| self.get(kind))
            .ok_or_else(|| CatalogError::UnknownMove(name.to_string()))
    }

    pub fn entries(&self) -> Vec<AttackEntry> {
        ATTACK_ROTATION
            .iter()
            .map(|kind| AttackEntry {
                name: kind.name().to_string(),
                definition: *self.get(*kind),
            })
            .collect()
    }
}

impl Default for AttackCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn validate_definition(kind: AttackKind, def: &AttackDefinition) -> Result<(), CatalogError> {
    let invalid = |reason| CatalogError::InvalidDefinition {
        name: kind.name(),
        reason,
    };
    if def.damage < 0 {
        return Err(invalid("damage is negative"));
    }
    if !(def.range > 0.0) {
        return Err(invalid("range must be positive"));
    }
    if def.active_frames == 0 {
        return Err(invalid("no active frames"));
    }
    if def.hitstun_frames == 0 {
        return Err(invalid("hitstun must last at least one frame"));
    }
    Ok(())
}

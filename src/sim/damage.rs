//! Per-side damage statistics
//!
//! Purely for the end-of-battle readout: keyed by the attacker's display name,
//! only ever increased, and reset with the battle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::UnitRole;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageEntry {
    pub total: f32,
    pub color: u32,
    pub role: UnitRole,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageTracker {
    entries: BTreeMap<String, DamageEntry>,
}

impl DamageTracker {
    /// Add `amount` to `name`'s running total (negative amounts are ignored)
    pub fn record(&mut self, name: &str, amount: f32, color: u32, role: UnitRole) {
        let amount = amount.max(0.0);
        match self.entries.get_mut(name) {
            Some(entry) => entry.total += amount,
            None => {
                self.entries.insert(
                    name.to_string(),
                    DamageEntry {
                        total: amount,
                        color,
                        role,
                    },
                );
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&DamageEntry> {
        self.entries.get(name)
    }

    pub fn total(&self) -> f32 {
        self.entries.values().map(|e| e.total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries sorted by total damage, highest first
    pub fn ranked(&self) -> Vec<(&str, &DamageEntry)> {
        let mut ranked: Vec<_> = self.entries.iter().map(|(k, v)| (k.as_str(), v)).collect();
        ranked.sort_by(|a, b| b.1.total.total_cmp(&a.1.total));
        ranked
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::progression;

/// Starting values for a brand-new save.
#[derive(Debug, Clone)]
pub struct SaveDefaults {
    pub initial_money: u64,
    pub initial_level: u32,
    /// Dev toggle: fresh saves start with ten times the money.
    pub enable_test_data: bool,
}

impl Default for SaveDefaults {
    fn default() -> Self {
        Self {
            initial_money: 100,
            initial_level: 1,
            enable_test_data: false,
        }
    }
}

/// A player's persistent progress record, written to disk as JSON.
///
/// Field names on the wire are PascalCase so existing save files keep
/// loading; `Rebirth` is optional there because older saves predate it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerSave {
    pub money: u64,
    pub level: u32,
    pub experience_points: u64,
    #[serde(default)]
    pub rebirth: u32,
    pub last_play_time: DateTime<Utc>,
}

impl PlayerSave {
    pub fn fresh(defaults: &SaveDefaults) -> Self {
        let money = if defaults.enable_test_data {
            defaults.initial_money * 10
        } else {
            defaults.initial_money
        };
        Self {
            money,
            level: progression::clamp_level(defaults.initial_level),
            experience_points: 0,
            rebirth: 0,
            last_play_time: Utc::now(),
        }
    }

    pub fn add_money(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        self.money += amount;
        tracing::debug!("added {} money, total {}", amount, self.money);
    }

    /// Spend money if the balance covers it. Zero is refused, matching the
    /// positive-amount guard the spend path always had.
    pub fn spend_money(&mut self, amount: u64) -> bool {
        if amount == 0 || self.money < amount {
            return false;
        }
        self.money -= amount;
        tracing::debug!("spent {} money, {} left", amount, self.money);
        true
    }

    /// Grant XP and resolve any level-ups. Returns whether a level was
    /// gained.
    pub fn add_experience(&mut self, amount: u64) -> bool {
        if amount == 0 {
            return false;
        }
        let gain = progression::apply_experience(self.level, self.experience_points + amount);
        self.level = gain.level;
        self.experience_points = gain.xp;
        if gain.leveled_up {
            tracing::info!("level up! now level {}", self.level);
        }
        gain.leveled_up
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = progression::clamp_level(level);
    }

    /// Overwrite the XP counter and resolve any level-ups that implies.
    pub fn set_xp(&mut self, xp: u64) -> bool {
        let gain = progression::apply_experience(self.level, xp);
        self.level = gain.level;
        self.experience_points = gain.xp;
        gain.leveled_up
    }

    pub fn has_level(&self, required: u32) -> bool {
        progression::has_level(self.level, required)
    }

    pub fn xp_for_next_level(&self) -> u64 {
        progression::xp_for_next_level(self.level)
    }

    pub fn level_progress(&self) -> f32 {
        progression::level_progress(self.level, self.experience_points)
    }

    pub fn add_rebirth(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.rebirth += amount;
        tracing::info!("rebirth added, total {}", self.rebirth);
    }

    pub fn reset_rebirth(&mut self) {
        self.rebirth = 0;
    }

    /// Start the level grind over, keeping money and bumping the rebirth
    /// counter.
    pub fn do_rebirth(&mut self, defaults: &SaveDefaults) {
        self.level = progression::clamp_level(defaults.initial_level);
        self.experience_points = 0;
        self.rebirth += 1;
        tracing::info!("rebirth complete, now at rebirth {}", self.rebirth);
    }

    /// Stamp the record with the current wall-clock time. Called right
    /// before it is written to disk.
    pub fn touch(&mut self) {
        self.last_play_time = Utc::now();
    }
}

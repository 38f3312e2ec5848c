use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// XP awarded for each completed task.
pub const XP_PER_COMPLETED_TASK: u32 = 20;
/// XP span of one level.
pub const XP_PER_LEVEL: u32 = 500;

/// Per-user profile record: identity, onboarding state and gamification
/// counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub total_xp: u32,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default)]
    pub last_completed: Option<NaiveDate>,
    #[serde(default)]
    pub onboarded: bool,
}

impl UserProfile {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            subjects: Vec::new(),
            total_xp: 0,
            streak_days: 0,
            last_completed: None,
            onboarded: false,
        }
    }

    pub fn level(&self) -> u32 {
        self.total_xp / XP_PER_LEVEL + 1
    }

    pub fn xp_into_level(&self) -> u32 {
        self.total_xp % XP_PER_LEVEL
    }

    pub fn xp_to_next_level(&self) -> u32 {
        XP_PER_LEVEL - self.xp_into_level()
    }

    /// Award XP for a completed task and feed the daily streak.
    ///
    /// The first completion on a new day extends the streak when the day is
    /// consecutive with the last active one and resets it to 1 otherwise;
    /// further completions on the same day only add XP.
    pub fn record_task_completion(&mut self, today: NaiveDate) {
        self.total_xp += XP_PER_COMPLETED_TASK;

        match self.last_completed {
            Some(last) if last >= today => {
                // Same day (or a clock went backwards): streak unchanged.
            }
            Some(last) if last.succ_opt() == Some(today) => {
                self.streak_days += 1;
                self.last_completed = Some(today);
            }
            _ => {
                self.streak_days = 1;
                self.last_completed = Some(today);
            }
        }
    }

    /// Take back the XP of a completion that was toggled off. The streak is
    /// never rewound.
    pub fn revoke_task_completion(&mut self) {
        self.total_xp = self.total_xp.saturating_sub(XP_PER_COMPLETED_TASK);
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use super::error::StoreError;
use super::types::{Achievement, AchievementCondition, EventKind, ProgressSnapshot};

#[derive(Debug, Clone, Copy)]
pub struct QuarterFacts {
    pub aum: f64,
    pub trust: f64,
    pub quarter: u32,
    pub event: EventKind,
}

impl AchievementCondition {
    pub fn is_met(&self, facts: &QuarterFacts) -> bool {
        match *self {
            AchievementCondition::Aum(threshold) => facts.aum >= threshold,
            AchievementCondition::Trust(threshold) => facts.trust >= threshold,
            AchievementCondition::Quarter(threshold) => facts.quarter >= threshold,
            AchievementCondition::Event(kind) => facts.event == kind,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    snapshot: ProgressSnapshot,
}

impl Progress {
    pub fn from_snapshot(snapshot: ProgressSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.snapshot.achievements.get(id).copied().unwrap_or(false)
    }

    pub fn evaluate(
        &mut self,
        catalog: &'static [Achievement],
        facts: &QuarterFacts,
    ) -> Vec<&'static Achievement> {
        let mut unlocked = Vec::new();
        for achievement in catalog {
            if self.is_unlocked(achievement.id) {
                continue;
            }
            if achievement.condition.is_met(facts) {
                self.snapshot
                    .achievements
                    .insert(achievement.id.to_string(), true);
                unlocked.push(achievement);
            }
        }
        unlocked
    }

    pub fn record_high_scores(&mut self, aum: f64, quarters: u32, trust: f64) -> bool {
        let scores = &mut self.snapshot.high_scores;
        let before = *scores;
        scores.aum = scores.aum.max(aum);
        scores.quarters = scores.quarters.max(quarters);
        scores.trust = scores.trust.max(trust);
        *scores != before
    }
}

pub trait ProgressStore: Send {
    fn load(&self) -> Result<ProgressSnapshot, StoreError>;
    fn save(&mut self, snapshot: &ProgressSnapshot) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Option<ProgressSnapshot>,
}

impl MemoryStore {
    pub fn with_snapshot(snapshot: ProgressSnapshot) -> Self {
        Self {
            saved: Some(snapshot),
        }
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<ProgressSnapshot, StoreError> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, snapshot: &ProgressSnapshot) -> Result<(), StoreError> {
        self.saved = Some(snapshot.clone());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self) -> Result<ProgressSnapshot, StoreError> {
        if !self.path.exists() {
            return Ok(ProgressSnapshot::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&mut self, snapshot: &ProgressSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(snapshot)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

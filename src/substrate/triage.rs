//! Heal Triage
//!
//! Ranks injured group members by predicted health: current health percent
//! minus the average of recent damage taken, so a tank eating heavy hits
//! outranks a dps at the same health. Buckets order the queue; within a
//! bucket the lowest health percent goes first.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::constants::{
    DPS_SAMPLE_WINDOW, TRIAGE_CRITICAL_PCT, TRIAGE_EMERGENCY_PCT, TRIAGE_MAINTENANCE_PCT,
    TRIAGE_MODERATE_PCT, TRIAGE_SCAN_PCT,
};
use crate::host::UnitId;

/// Urgency buckets, most urgent first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TriageBucket {
    Emergency,
    Critical,
    Moderate,
    Maintenance,
}

impl TriageBucket {
    /// Bucket for a predicted health percent. Units at or above the
    /// maintenance ceiling are not queued at all.
    pub fn classify(predicted_pct: f32) -> Option<TriageBucket> {
        if predicted_pct < TRIAGE_EMERGENCY_PCT {
            Some(TriageBucket::Emergency)
        } else if predicted_pct < TRIAGE_CRITICAL_PCT {
            Some(TriageBucket::Critical)
        } else if predicted_pct < TRIAGE_MODERATE_PCT {
            Some(TriageBucket::Moderate)
        } else if predicted_pct < TRIAGE_MAINTENANCE_PCT {
            Some(TriageBucket::Maintenance)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TriageEntry {
    pub unit: UnitId,
    pub bucket: TriageBucket,
    pub health_pct: f32,
    pub predicted_pct: f32,
    pub missing_health: f32,
}

/// Sliding window of recent damage per unit, fed by health observations.
#[derive(Debug, Clone, Default)]
pub struct DamageTracker {
    samples: HashMap<UnitId, SmallVec<[f32; DPS_SAMPLE_WINDOW]>>,
    last_health: HashMap<UnitId, f32>,
}

impl DamageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a health observation. Only drops count as damage; heals and
    /// unchanged readings leave the window alone.
    pub fn observe(&mut self, unit: UnitId, health: f32) {
        if let Some(&last) = self.last_health.get(&unit) {
            let delta = last - health;
            if delta > 0.0 {
                let window = self.samples.entry(unit).or_default();
                if window.len() >= DPS_SAMPLE_WINDOW {
                    window.remove(0);
                }
                window.push(delta);
            }
        }
        self.last_health.insert(unit, health);
    }

    /// Average of the recorded damage events, zero with no history.
    pub fn recent_damage(&self, unit: UnitId) -> f32 {
        self.samples
            .get(&unit)
            .filter(|w| !w.is_empty())
            .map(|w| w.iter().sum::<f32>() / w.len() as f32)
            .unwrap_or(0.0)
    }

    pub fn forget(&mut self, unit: UnitId) {
        self.samples.remove(&unit);
        self.last_health.remove(&unit);
    }
}

/// Priority-ordered list of heal candidates, rebuilt every healer tick.
#[derive(Debug, Clone, Default)]
pub struct TriageQueue {
    entries: Vec<TriageEntry>,
}

impl TriageQueue {
    /// Build from `(unit, health, max_health)` observations. Dead units and
    /// units above the scan ceiling are skipped.
    pub fn build(
        members: impl IntoIterator<Item = (UnitId, f32, f32)>,
        damage: &DamageTracker,
    ) -> Self {
        let mut entries: Vec<TriageEntry> = members
            .into_iter()
            .filter(|&(_, health, max)| max > 0.0 && health > 0.0)
            .filter_map(|(unit, health, max)| {
                let pct = health / max * 100.0;
                if pct >= TRIAGE_SCAN_PCT {
                    return None;
                }
                let predicted = (pct - damage.recent_damage(unit) / max * 100.0).max(0.0);
                TriageBucket::classify(predicted).map(|bucket| TriageEntry {
                    unit,
                    bucket,
                    health_pct: pct,
                    predicted_pct: predicted,
                    missing_health: max - health,
                })
            })
            .collect();
        entries.sort_by(|a, b| {
            a.bucket
                .cmp(&b.bucket)
                .then(a.health_pct.total_cmp(&b.health_pct))
        });
        Self { entries }
    }

    pub fn peek(&self) -> Option<&TriageEntry> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TriageEntry> {
        self.entries.iter()
    }

    /// Entries in `bucket` or a more urgent one.
    pub fn count_at_or_worse(&self, bucket: TriageBucket) -> usize {
        self.entries.iter().filter(|e| e.bucket <= bucket).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(TriageBucket::classify(5.0), Some(TriageBucket::Emergency));
        assert_eq!(TriageBucket::classify(19.9), Some(TriageBucket::Emergency));
        assert_eq!(TriageBucket::classify(20.0), Some(TriageBucket::Critical));
        assert_eq!(TriageBucket::classify(40.0), Some(TriageBucket::Moderate));
        assert_eq!(TriageBucket::classify(70.0), Some(TriageBucket::Maintenance));
        assert_eq!(TriageBucket::classify(90.0), None);
        assert_eq!(TriageBucket::classify(100.0), None);
    }

    #[test]
    fn test_queue_orders_by_bucket_then_health() {
        let damage = DamageTracker::new();
        let members = vec![
            (UnitId(1), 95.0, 100.0),
            (UnitId(2), 90.0, 100.0),
            (UnitId(3), 35.0, 100.0),
            (UnitId(4), 60.0, 100.0),
            (UnitId(5), 92.0, 100.0),
        ];
        let queue = TriageQueue::build(members, &damage);
        // 95 and 92 are above the scan ceiling; 90 predicts at 90 and is
        // not bucketed. That leaves 35 (critical) then 60 (moderate).
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek().map(|e| e.unit), Some(UnitId(3)));
        let order: Vec<UnitId> = queue.iter().map(|e| e.unit).collect();
        assert_eq!(order, vec![UnitId(3), UnitId(4)]);
    }

    #[test]
    fn test_prediction_uses_recent_damage_average() {
        let mut damage = DamageTracker::new();
        let tank = UnitId(1);
        damage.observe(tank, 100.0);
        damage.observe(tank, 80.0);
        damage.observe(tank, 60.0);
        assert!((damage.recent_damage(tank) - 20.0).abs() < 0.001);
        // 60% health with an average 20-point hit predicts 40%, one bucket
        // worse than the raw reading.
        let queue = TriageQueue::build(vec![(tank, 60.0, 100.0)], &damage);
        assert_eq!(queue.peek().map(|e| e.bucket), Some(TriageBucket::Moderate));
        assert!((queue.peek().map(|e| e.predicted_pct).unwrap_or(0.0) - 40.0).abs() < 0.001);
    }

    #[test]
    fn test_damage_window_keeps_last_five_samples() {
        let mut damage = DamageTracker::new();
        let unit = UnitId(1);
        let mut health = 1000.0;
        damage.observe(unit, health);
        for hit in [10.0, 10.0, 10.0, 10.0, 10.0, 50.0] {
            health -= hit;
            damage.observe(unit, health);
        }
        // Window holds 10,10,10,10,50.
        assert!((damage.recent_damage(unit) - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_healing_is_not_a_damage_event() {
        let mut damage = DamageTracker::new();
        let unit = UnitId(1);
        damage.observe(unit, 50.0);
        damage.observe(unit, 80.0);
        assert_eq!(damage.recent_damage(unit), 0.0);
    }

    #[test]
    fn test_count_at_or_worse() {
        let damage = DamageTracker::new();
        let members = vec![
            (UnitId(1), 10.0, 100.0),
            (UnitId(2), 30.0, 100.0),
            (UnitId(3), 55.0, 100.0),
            (UnitId(4), 80.0, 100.0),
        ];
        let queue = TriageQueue::build(members, &damage);
        assert_eq!(queue.count_at_or_worse(TriageBucket::Emergency), 1);
        assert_eq!(queue.count_at_or_worse(TriageBucket::Critical), 2);
        assert_eq!(queue.count_at_or_worse(TriageBucket::Moderate), 3);
        assert_eq!(queue.count_at_or_worse(TriageBucket::Maintenance), 4);
    }
}

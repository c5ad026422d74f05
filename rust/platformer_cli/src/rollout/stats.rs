// rust/platformer_cli/src/rollout/stats.rs
#![forbid(unsafe_code)]

use std::time::Instant;

use platformer_engine::{DecisionCounts, EpisodeReport, GameStats};

fn stat_u64(stats: &GameStats, key: &str) -> u64 {
    stats.get(key).and_then(serde_json::Value::as_u64).unwrap_or(0)
}

fn stat_bool(stats: &GameStats, key: &str) -> bool {
    stats
        .get(key)
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}

#[derive(Clone, Debug)]
pub struct RolloutStats {
    pub episodes_finished: u64,

    pub total_ticks: u64,
    pub total_steps: u64,

    // outcome counters
    pub completions: u64,
    pub deaths: u64,
    pub truncations: u64,

    // per-episode sums
    pub sum_score: u64,
    pub sum_coins: u64,
    pub sum_distance: u64,
    pub max_distance: u64,

    pub decisions: DecisionCounts,

    // last finished episode
    pub last_score: u64,
    pub last_complete: bool,

    // internal
    t0: Instant,
}

impl RolloutStats {
    pub fn new() -> Self {
        Self {
            episodes_finished: 0,
            total_ticks: 0,
            total_steps: 0,
            completions: 0,
            deaths: 0,
            truncations: 0,
            sum_score: 0,
            sum_coins: 0,
            sum_distance: 0,
            max_distance: 0,
            decisions: DecisionCounts::default(),
            last_score: 0,
            last_complete: false,
            t0: Instant::now(),
        }
    }

    /// Call once per finished episode.
    pub fn on_episode_end(&mut self, report: &EpisodeReport) {
        let s = &report.stats;

        self.episodes_finished += 1;
        self.total_ticks += report.ticks;
        self.total_steps += report.steps;

        let complete = stat_bool(s, "level_complete");
        if complete {
            self.completions += 1;
        }
        let dead = stat_bool(s, "dead");
        if dead {
            self.deaths += 1;
        }
        if report.truncated {
            self.truncations += 1;
        }

        let score = stat_u64(s, "score");
        let distance = stat_u64(s, "distance");
        self.sum_score += score;
        self.sum_coins += stat_u64(s, "coins");
        self.sum_distance += distance;
        self.max_distance = self.max_distance.max(distance);

        self.decisions.merge(&report.decisions);

        self.last_score = score;
        self.last_complete = complete;
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.t0.elapsed().as_secs_f64()
    }

    pub fn ticks_per_sec(&self) -> f64 {
        let dt = self.elapsed_secs();
        if dt > 0.0 {
            self.total_ticks as f64 / dt
        } else {
            0.0
        }
    }

    fn per_episode(&self, sum: u64) -> f64 {
        if self.episodes_finished > 0 {
            sum as f64 / self.episodes_finished as f64
        } else {
            0.0
        }
    }

    pub fn avg_score(&self) -> f64 {
        self.per_episode(self.sum_score)
    }

    pub fn avg_coins(&self) -> f64 {
        self.per_episode(self.sum_coins)
    }

    pub fn avg_distance(&self) -> f64 {
        self.per_episode(self.sum_distance)
    }

    /// `kind=count` pairs for every decision kind seen so far.
    pub fn decision_summary(&self) -> String {
        self.decisions
            .iter()
            .map(|(k, n)| format!("{}={}", k.name(), n))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn live_msg(&self) -> String {
        format!(
            "tps={:.0} eps={} done={} dead={} avg_score={:.1} avg_dist={:.1} max_dist={}",
            self.ticks_per_sec(),
            self.episodes_finished,
            self.completions,
            self.deaths,
            self.avg_score(),
            self.avg_distance(),
            self.max_distance,
        )
    }

    pub fn final_report(&self, policy_name: &str) -> FinalReport {
        FinalReport {
            policy: policy_name.to_string(),

            episodes: self.episodes_finished,
            elapsed_s: self.elapsed_secs(),
            total_ticks: self.total_ticks,
            ticks_per_s: self.ticks_per_sec(),

            completions: self.completions,
            deaths: self.deaths,
            truncations: self.truncations,

            avg_score: self.avg_score(),
            avg_coins: self.avg_coins(),
            avg_distance: self.avg_distance(),
            max_distance: self.max_distance,

            decisions: self.decision_summary(),

            last_score: self.last_score,
            last_complete: self.last_complete,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FinalReport {
    pub policy: String,

    pub episodes: u64,
    pub elapsed_s: f64,
    pub total_ticks: u64,
    pub ticks_per_s: f64,

    pub completions: u64,
    pub deaths: u64,
    pub truncations: u64,

    pub avg_score: f64,
    pub avg_coins: f64,
    pub avg_distance: f64,
    pub max_distance: u64,

    pub decisions: String,

    pub last_score: u64,
    pub last_complete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use platformer_engine::DecisionKind;
    use serde_json::json;

    fn report(score: u64, distance: u64, complete: bool, dead: bool) -> EpisodeReport {
        let mut stats = GameStats::new();
        stats.insert("score".into(), json!(score));
        stats.insert("coins".into(), json!(1));
        stats.insert("distance".into(), json!(distance));
        stats.insert("level_complete".into(), json!(complete));
        stats.insert("dead".into(), json!(dead));
        let mut decisions = DecisionCounts::default();
        decisions.record(DecisionKind::Run);
        EpisodeReport {
            ticks: 100,
            steps: 40,
            decisions,
            stats,
            truncated: false,
        }
    }

    #[test]
    fn aggregates_across_episodes() {
        let mut s = RolloutStats::new();
        s.on_episode_end(&report(300, 50, false, true));
        s.on_episode_end(&report(100, 150, true, false));

        assert_eq!(s.episodes_finished, 2);
        assert_eq!(s.total_ticks, 200);
        assert_eq!((s.completions, s.deaths), (1, 1));
        assert_eq!(s.avg_score(), 200.0);
        assert_eq!(s.avg_distance(), 100.0);
        assert_eq!(s.max_distance, 150);
        assert_eq!(s.decision_summary(), "run=2");

        let r = s.final_report("expert");
        assert_eq!(r.last_score, 100);
        assert!(r.last_complete);
    }

    #[test]
    fn missing_stats_count_as_zero() {
        let mut s = RolloutStats::new();
        s.on_episode_end(&EpisodeReport::default());
        assert_eq!(s.avg_score(), 0.0);
        assert_eq!(s.completions, 0);
        assert_eq!(s.truncations, 0);
    }

    #[test]
    fn truncation_comes_from_the_report() {
        let mut s = RolloutStats::new();
        let mut r = report(0, 20, false, false);
        r.truncated = true;
        s.on_episode_end(&r);
        s.on_episode_end(&report(0, 20, false, true));
        assert_eq!((s.truncations, s.deaths), (1, 1));
    }
}

//! Per-run statistics and the aggregated simulation report.

use crate::core::events::{EventSink, GameEvent};
use serde::Serialize;
use std::collections::BTreeMap;

/// Statistics for one simulated run. Filled by listening to game events.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub moves: u32,
    pub blocked_moves: u32,
    pub encounters: u32,
    pub victories: u32,
    pub defeats: u32,
    pub total_rounds: u64,
    pub monsters_slain: u32,
    pub heroes_fainted: u32,
    pub level_ups: u32,
    pub potions_used: u32,
    pub final_level: u32,
    pub final_gold: u32,
    pub survived: bool,
}

impl EventSink for RunStats {
    fn emit(&mut self, event: GameEvent) {
        match event {
            GameEvent::MoveBlocked { .. } => self.blocked_moves += 1,
            GameEvent::EncounterTriggered { .. } => self.encounters += 1,
            GameEvent::Victory { rounds } => {
                self.victories += 1;
                self.total_rounds += rounds as u64;
            }
            GameEvent::Defeat { rounds } => {
                self.defeats += 1;
                self.total_rounds += rounds as u64;
            }
            GameEvent::MonsterSlain { .. } => self.monsters_slain += 1,
            GameEvent::HeroFainted { .. } => self.heroes_fainted += 1,
            GameEvent::LevelUp { .. } => self.level_ups += 1,
            GameEvent::PotionUsed { .. } => self.potions_used += 1,
            _ => {}
        }
    }
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub runs_survived: u32,

    pub avg_encounters: f64,
    pub avg_victories: f64,
    pub avg_rounds_per_battle: f64,
    pub avg_monsters_slain: f64,
    pub avg_heroes_fainted: f64,
    pub avg_potions_used: f64,
    pub avg_final_level: f64,
    pub avg_final_gold: f64,

    /// Highest party level reached -> number of runs
    pub level_distribution: BTreeMap<u32, u32>,

    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>) -> Self {
        let num_runs = runs.len() as u32;
        let n = num_runs.max(1) as f64;
        let avg = |f: fn(&RunStats) -> f64| runs.iter().map(f).sum::<f64>() / n;

        let battles: u64 = runs.iter().map(|r| (r.victories + r.defeats) as u64).sum();
        let rounds: u64 = runs.iter().map(|r| r.total_rounds).sum();

        let mut level_distribution = BTreeMap::new();
        for run in &runs {
            *level_distribution.entry(run.final_level).or_insert(0) += 1;
        }

        Self {
            num_runs,
            runs_survived: runs.iter().filter(|r| r.survived).count() as u32,
            avg_encounters: avg(|r| r.encounters as f64),
            avg_victories: avg(|r| r.victories as f64),
            avg_rounds_per_battle: rounds as f64 / battles.max(1) as f64,
            avg_monsters_slain: avg(|r| r.monsters_slain as f64),
            avg_heroes_fainted: avg(|r| r.heroes_fainted as f64),
            avg_potions_used: avg(|r| r.potions_used as f64),
            avg_final_level: avg(|r| r.final_level as f64),
            avg_final_gold: avg(|r| r.final_gold as f64),
            level_distribution,
            run_stats: runs,
        }
    }

    pub fn survival_rate(&self) -> f64 {
        if self.num_runs == 0 {
            return 0.0;
        }
        self.runs_survived as f64 / self.num_runs as f64 * 100.0
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} survived ({:.1}%)\n\n",
            self.num_runs,
            self.runs_survived,
            self.survival_rate()
        ));

        report.push_str("── BATTLES ──────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Encounters:      {:.1}\n", self.avg_encounters));
        report.push_str(&format!("  Avg Victories:       {:.1}\n", self.avg_victories));
        report.push_str(&format!(
            "  Avg Rounds/Battle:   {:.1}\n",
            self.avg_rounds_per_battle
        ));
        report.push_str(&format!("  Avg Monsters Slain:  {:.1}\n", self.avg_monsters_slain));
        report.push_str(&format!("  Avg Heroes Fainted:  {:.1}\n", self.avg_heroes_fainted));
        report.push_str(&format!("  Avg Potions Used:    {:.1}\n\n", self.avg_potions_used));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Level:     {:.1}\n", self.avg_final_level));
        report.push_str(&format!("  Avg Final Gold:      {:.0}\n\n", self.avg_final_gold));

        report.push_str("── LEVEL DISTRIBUTION ───────────────────────────────────────────\n");
        for (level, count) in &self.level_distribution {
            let pct = *count as f64 / self.num_runs.max(1) as f64 * 100.0;
            let bar = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  Level {:2}: {:>5.1}% {}\n", level, pct, bar));
        }

        report.push_str("\n── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let rating = match self.survival_rate() {
            r if r >= 95.0 => "TOO EASY - Parties rarely fall",
            r if r >= 60.0 => "GOOD - Challenging but fair",
            r if r >= 30.0 => "HARD - Many parties wiped",
            _ => "TOO HARD - Most parties wiped",
        };
        report.push_str(&format!("  Survival Rating: {}\n", rating));
        if self.avg_rounds_per_battle > 30.0 {
            report.push_str("  ⚠️  Battles drag on - hero damage too low?\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");
        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

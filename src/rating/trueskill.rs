//! TrueSkill rating system implementation
//!
//! This module provides a concrete implementation of the skill rater using
//! the two-player TrueSkill update from the skillratings crate. The update
//! shifts means by the v-function and shrinks variances by the w-function of
//! the normalized performance margin.

use crate::error::JudgeError;
use crate::rating::rater::{RatingUpdate, SkillRater};
use crate::rating::table::{BeliefEntry, BeliefTable};
use crate::types::{BeliefChange, Competitor, SkillBelief};
use serde::{Deserialize, Serialize};
use skillratings::trueskill::{trueskill, TrueSkillConfig, TrueSkillRating};
use skillratings::Outcomes;
use tracing::debug;

/// Extended configuration for the TrueSkill rating system
/// This carries the skillratings TrueSkillConfig parameters plus the prior
/// and the standard deviation floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedTrueSkillConfig {
    /// Prior mean for every competitor
    pub initial_mean: f64,
    /// Prior standard deviation for every competitor
    pub initial_std_dev: f64,
    /// Performance noise around skill
    pub beta: f64,
    /// Additive dynamics applied to the variance before each update
    pub dynamics: f64,
    /// Probability of a draw; outcomes here are strict win/loss
    pub draw_probability: f64,
    /// Lower bound applied to every posterior standard deviation
    pub min_std_dev: f64,
}

impl Default for ExtendedTrueSkillConfig {
    fn default() -> Self {
        let initial_std_dev = 25.0 / 3.0;
        Self {
            initial_mean: 25.0,
            initial_std_dev,
            beta: initial_std_dev / 2.0,
            dynamics: 0.0,
            draw_probability: 0.0,
            min_std_dev: 0.01,
        }
    }
}

impl ExtendedTrueSkillConfig {
    /// Classic TrueSkill library defaults: 10% draw margin and additive dynamics.
    /// With dynamics enabled a heavily expected win can widen the winner's
    /// standard deviation slightly.
    pub fn legacy_compatible() -> Self {
        Self::default().with_legacy_dynamics()
    }

    /// Switch on the classic draw margin and dynamics, keeping prior, beta
    /// and floor as configured
    pub fn with_legacy_dynamics(&self) -> Self {
        Self {
            draw_probability: 0.1,
            dynamics: self.initial_std_dev / 100.0,
            ..self.clone()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.initial_mean.is_finite() {
            return Err(config_error("Initial mean must be finite"));
        }

        if self.initial_std_dev <= 0.0 || !self.initial_std_dev.is_finite() {
            return Err(config_error("Initial standard deviation must be positive"));
        }

        if self.beta <= 0.0 || !self.beta.is_finite() {
            return Err(config_error("Beta must be positive"));
        }

        if self.dynamics < 0.0 || !self.dynamics.is_finite() {
            return Err(config_error("Dynamics must be non-negative"));
        }

        if !(0.0..1.0).contains(&self.draw_probability) {
            return Err(config_error("Draw probability must be in [0, 1)"));
        }

        if !self.min_std_dev.is_finite()
            || self.min_std_dev <= 0.0
            || self.min_std_dev >= self.initial_std_dev
        {
            return Err(config_error(
                "Standard deviation floor must be positive and below the initial standard deviation",
            ));
        }

        Ok(())
    }

    /// Prior belief shared by all competitors
    pub fn initial_belief(&self) -> SkillBelief {
        SkillBelief {
            mean: self.initial_mean,
            std_dev: self.initial_std_dev,
        }
    }

    fn trueskill_config(&self) -> TrueSkillConfig {
        TrueSkillConfig {
            draw_probability: self.draw_probability,
            beta: self.beta,
            default_dynamics: self.dynamics,
        }
    }
}

fn config_error(message: &str) -> anyhow::Error {
    JudgeError::ConfigurationError {
        message: message.to_string(),
    }
    .into()
}

/// TrueSkill rater over a fixed competitor set
#[derive(Debug, Clone)]
pub struct TrueSkillRater {
    config: ExtendedTrueSkillConfig,
    trueskill_config: TrueSkillConfig,
    table: BeliefTable,
}

impl TrueSkillRater {
    /// Create a rater with every competitor at the configured prior
    pub fn new(
        config: ExtendedTrueSkillConfig,
        competitors: &[Competitor],
    ) -> crate::error::Result<Self> {
        config.validate()?;
        let table = BeliefTable::new(competitors, config.initial_belief())?;

        Ok(Self {
            trueskill_config: config.trueskill_config(),
            config,
            table,
        })
    }

    pub fn config(&self) -> &ExtendedTrueSkillConfig {
        &self.config
    }

    /// Probability that `first` beats `second` under current beliefs
    pub fn expected_win_probability(&self, first: &str, second: &str) -> crate::error::Result<f64> {
        let a: TrueSkillRating = self.table.get(first)?.belief.into();
        let b: TrueSkillRating = self.table.get(second)?.belief.into();
        let (win, _) = skillratings::trueskill::expected_score(&a, &b, &self.trueskill_config);
        Ok(win)
    }

    /// Draw-based match quality (1.0 means perfectly balanced)
    pub fn match_quality(&self, first: &str, second: &str) -> crate::error::Result<f64> {
        let a: TrueSkillRating = self.table.get(first)?.belief.into();
        let b: TrueSkillRating = self.table.get(second)?.belief.into();
        Ok(skillratings::trueskill::match_quality(
            &a,
            &b,
            &self.trueskill_config,
        ))
    }

    fn floored(&self, rating: TrueSkillRating) -> SkillBelief {
        SkillBelief {
            mean: rating.rating,
            std_dev: rating.uncertainty.max(self.config.min_std_dev),
        }
    }
}

impl SkillRater for TrueSkillRater {
    fn current_belief(&self, competitor: &str) -> crate::error::Result<SkillBelief> {
        Ok(self.table.get(competitor)?.belief)
    }

    fn update(&mut self, winner: &str, loser: &str) -> crate::error::Result<RatingUpdate> {
        if winner == loser {
            return Err(JudgeError::InvalidInput {
                reason: format!("Competitor {} cannot be compared with itself", winner),
            }
            .into());
        }

        let winner_before = self.table.get(winner)?.belief;
        let loser_before = self.table.get(loser)?.belief;

        let winner_rating: TrueSkillRating = winner_before.into();
        let loser_rating: TrueSkillRating = loser_before.into();
        let (winner_after, loser_after) = trueskill(
            &winner_rating,
            &loser_rating,
            &Outcomes::WIN,
            &self.trueskill_config,
        );
        let winner_after = self.floored(winner_after);
        let loser_after = self.floored(loser_after);

        self.table.get_mut(winner)?.record(winner_after, true);
        self.table.get_mut(loser)?.record(loser_after, false);

        debug!(
            winner,
            loser,
            winner_mean = winner_after.mean,
            loser_mean = loser_after.mean,
            "Applied rating update"
        );

        Ok(RatingUpdate {
            winner: BeliefChange {
                competitor: winner.to_string(),
                before: winner_before,
                after: winner_after,
            },
            loser: BeliefChange {
                competitor: loser.to_string(),
                before: loser_before,
                after: loser_after,
            },
        })
    }

    fn entries(&self) -> &[BeliefEntry] {
        self.table.entries()
    }

    fn initial_belief(&self) -> SkillBelief {
        self.config.initial_belief()
    }
}

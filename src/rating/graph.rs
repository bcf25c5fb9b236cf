//! Per-match factor graph and its message schedule
//!
//! For `n` rank-ordered players the graph holds one skill, one performance
//! and `n - 1` performance-difference variables:
//!
//! ```text
//! prior -> skill[i] -> likelihood -> perf[i] --+
//!                                              +-> weighted sum -> diff[i] -> greater-than / within
//! prior -> skill[i+1] -> likelihood -> perf[i+1]
//! ```
//!
//! Everything here is owned by a single inference call.

use crate::config::TrueSkillConfig;
use crate::factor::{DistributionArena, FactorFactory, FactorId, FactorList, Handle};
use crate::gaussian::Gaussian;
use crate::schedule::{RunStats, Schedule};
use tracing::debug;

/// Scalar model parameters consumed by the graph builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphParams {
    pub beta: f64,
    pub tau: f64,
    pub draw_margin: f64,
    pub loop_max_delta: f64,
    pub max_loop_iterations: Option<usize>,
}

impl From<&TrueSkillConfig> for GraphParams {
    fn from(config: &TrueSkillConfig) -> Self {
        Self {
            beta: config.beta,
            tau: config.tau,
            draw_margin: config.draw_margin(),
            loop_max_delta: config.loop_max_delta,
            max_loop_iterations: config.max_loop_iterations,
        }
    }
}

/// Factor ids grouped by layer, in player / pair order.
#[derive(Debug, Clone, Default)]
struct Layers {
    priors: Vec<FactorId>,
    likelihoods: Vec<FactorId>,
    differences: Vec<FactorId>,
    outcomes: Vec<FactorId>,
}

/// Result of running a match graph to convergence.
#[derive(Debug, Clone)]
pub struct Inference {
    /// Posterior skill of every player, in input order
    pub posteriors: Vec<Gaussian>,
    /// Log evidence of the observed ranking
    pub log_normalization: f64,
    pub stats: RunStats,
}

impl Inference {
    /// Probability of the observed ranking under the model.
    pub fn probability(&self) -> f64 {
        self.log_normalization.exp()
    }
}

/// Factor graph for one ranked match.
#[derive(Debug)]
pub struct SkillGraph {
    variables: DistributionArena,
    messages: DistributionArena,
    factors: FactorList,
    skills: Vec<Handle>,
    layers: Layers,
    schedule: Schedule<FactorId>,
}

impl SkillGraph {
    /// Build the graph for rank-ordered `skills` (mean, variance) with one
    /// draw flag per adjacent pair.
    ///
    /// # Panics
    /// With fewer than two players or a draw vector whose length is not
    /// `skills.len() - 1`; callers validate this first.
    pub fn build(skills: &[Gaussian], draws: &[bool], params: &GraphParams) -> Self {
        let players = skills.len();
        assert!(players >= 2, "a match graph needs at least 2 players");
        assert_eq!(
            draws.len(),
            players - 1,
            "one draw flag is required per adjacent pair"
        );

        let mut variables = DistributionArena::new(Gaussian::UNIFORM);
        let mut factory = FactorFactory::new();
        let mut factors = FactorList::new();
        let mut layers = Layers::default();

        let skill_handles: Vec<Handle> = (0..players).map(|_| variables.next_index()).collect();
        for (skill, &handle) in skills.iter().zip(&skill_handles) {
            let variance = skill.variance() + params.tau * params.tau;
            layers
                .priors
                .push(factors.add(factory.prior(skill.mean(), variance, handle)));
        }

        let performances: Vec<Handle> = (0..players).map(|_| variables.next_index()).collect();
        for (&performance, &skill) in performances.iter().zip(&skill_handles) {
            let likelihood = factory.likelihood(params.beta * params.beta, performance, skill);
            layers.likelihoods.push(factors.add(likelihood));
        }

        let differences: Vec<Handle> =
            (0..players - 1).map(|_| variables.next_index()).collect();
        for (i, &difference) in differences.iter().enumerate() {
            let sum =
                factory.weighted_sum(1.0, -1.0, difference, performances[i], performances[i + 1]);
            layers.differences.push(factors.add(sum));
        }

        for (&draw, &difference) in draws.iter().zip(&differences) {
            let outcome = if draw {
                factory.within(params.draw_margin, difference)
            } else {
                factory.greater_than(params.draw_margin, difference)
            };
            layers.outcomes.push(factors.add(outcome));
        }

        let schedule = build_schedule(&layers, params);

        debug!(
            players,
            factors = factors.len(),
            variables = variables.len(),
            messages = factory.messages().len(),
            "Built match factor graph"
        );

        Self {
            variables,
            messages: factory.into_messages(),
            factors,
            skills: skill_handles,
            layers,
            schedule,
        }
    }

    /// Run the schedule once, updating every marginal in place.
    pub fn run(&mut self) -> RunStats {
        let Self {
            variables,
            messages,
            factors,
            schedule,
            ..
        } = self;

        let mut stats = RunStats::default();
        let mut update =
            |id: &FactorId, port: usize| factors.update_message(*id, port, variables, messages);
        schedule.run_with_stats(&mut update, &mut stats);
        stats
    }

    /// Current skill marginals in player order.
    pub fn posteriors(&self) -> Vec<Gaussian> {
        self.skills
            .iter()
            .map(|&handle| self.variables.get(handle))
            .collect()
    }

    /// Aggregate log evidence of the graph under the current messages.
    ///
    /// Rebuilds every marginal from the stored messages as a side effect.
    pub fn log_normalization(&mut self) -> f64 {
        self.factors
            .log_normalization(&mut self.variables, &self.messages)
    }

    /// Run to convergence and collect posteriors and evidence.
    pub fn infer(mut self) -> Inference {
        let stats = self.run();
        let posteriors = self.posteriors();
        let log_normalization = self.log_normalization();

        Inference {
            posteriors,
            log_normalization,
            stats,
        }
    }

    pub fn schedule(&self) -> &Schedule<FactorId> {
        &self.schedule
    }

    pub fn factors(&self) -> &FactorList {
        &self.factors
    }

    pub fn num_players(&self) -> usize {
        self.skills.len()
    }
}

fn updates(ids: &[FactorId], port: usize) -> Schedule<FactorId> {
    Schedule::sequence(ids.iter().map(|&id| Schedule::step(id, port)).collect())
}

fn build_schedule(layers: &Layers, params: &GraphParams) -> Schedule<FactorId> {
    let differences = &layers.differences;
    let outcomes = &layers.outcomes;
    let pairs = differences.len();

    // Skill priors, then skill -> performance.
    let prior_pass = Schedule::sequence(vec![
        updates(&layers.priors, 0),
        updates(&layers.likelihoods, 0),
    ]);

    let ranking_pass = if pairs == 1 {
        Schedule::sequence(vec![
            Schedule::step(differences[0], 0),
            Schedule::step(outcomes[0], 0),
        ])
    } else {
        let mut forward = Vec::with_capacity(3 * (pairs - 1));
        let mut backward = Vec::with_capacity(3 * (pairs - 1));
        for i in 0..pairs - 1 {
            forward.push(Schedule::step(differences[i], 0));
            forward.push(Schedule::step(outcomes[i], 0));
            forward.push(Schedule::step(differences[i], 2));

            let j = pairs - 1 - i;
            backward.push(Schedule::step(differences[j], 0));
            backward.push(Schedule::step(outcomes[j], 0));
            backward.push(Schedule::step(differences[j], 1));
        }

        Schedule::repeat_at_most(
            Schedule::sequence(vec![
                Schedule::sequence(forward),
                Schedule::sequence(backward),
            ]),
            params.loop_max_delta,
            params.max_loop_iterations,
        )
    };

    let inner = Schedule::sequence(vec![
        ranking_pass,
        Schedule::step(differences[0], 1),
        Schedule::step(differences[pairs - 1], 2),
    ]);

    // Performance -> skill for every player.
    let posterior_pass = updates(&layers.likelihoods, 1);

    Schedule::sequence(vec![prior_pass, inner, posterior_pass])
}

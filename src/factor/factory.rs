//! Construction of concrete factors and their message-update rules
//!
//! A `FactorFactory` owns the message arena. Each factor it builds reserves
//! one message slot per port, so factors never share messages.

use super::arena::{DistributionArena, Handle};
use super::node::{Factor, FactorKind};
use crate::gaussian::Gaussian;

/// Builds factors whose messages live in a private arena.
#[derive(Debug, Clone, Default)]
pub struct FactorFactory {
    messages: DistributionArena,
}

impl FactorFactory {
    /// Create a factory whose messages start out flat.
    pub fn new() -> Self {
        Self {
            messages: DistributionArena::new(Gaussian::UNIFORM),
        }
    }

    /// Prior on `variable` with the given mean and (dynamics-inflated) variance.
    pub fn prior(&mut self, mean: f64, variance: f64, variable: Handle) -> Factor {
        let message = self.messages.next_index();
        Factor::new(
            FactorKind::Prior {
                message: Gaussian::from_mean_and_variance(mean, variance),
            },
            vec![variable],
            vec![message],
        )
    }

    /// Gaussian channel `performance ~ N(skill, variance)`.
    pub fn likelihood(&mut self, variance: f64, performance: Handle, skill: Handle) -> Factor {
        let messages = vec![self.messages.next_index(), self.messages.next_index()];
        Factor::new(
            FactorKind::Likelihood {
                precision: 1.0 / variance,
            },
            vec![performance, skill],
            messages,
        )
    }

    /// `sum = a1 * first + a2 * second`.
    pub fn weighted_sum(
        &mut self,
        a1: f64,
        a2: f64,
        sum: Handle,
        first: Handle,
        second: Handle,
    ) -> Factor {
        let messages = vec![
            self.messages.next_index(),
            self.messages.next_index(),
            self.messages.next_index(),
        ];
        // Solving the linear relation for each operand in turn.
        let weights = [[a1, a2], [-a2 / a1, 1.0 / a1], [-a1 / a2, 1.0 / a2]];
        Factor::new(
            FactorKind::WeightedSum { weights },
            vec![sum, first, second],
            messages,
        )
    }

    /// Truncation `variable > epsilon`.
    pub fn greater_than(&mut self, epsilon: f64, variable: Handle) -> Factor {
        let message = self.messages.next_index();
        Factor::new(
            FactorKind::GreaterThan { epsilon },
            vec![variable],
            vec![message],
        )
    }

    /// Truncation `|variable| <= epsilon`.
    pub fn within(&mut self, epsilon: f64, variable: Handle) -> Factor {
        let message = self.messages.next_index();
        Factor::new(FactorKind::Within { epsilon }, vec![variable], vec![message])
    }

    pub fn messages(&self) -> &DistributionArena {
        &self.messages
    }

    pub fn into_messages(self) -> DistributionArena {
        self.messages
    }
}

pub(super) fn update_prior(
    message: Gaussian,
    variable: Handle,
    slot: Handle,
    variables: &mut DistributionArena,
    messages: &mut DistributionArena,
) -> f64 {
    let old_marginal = variables.get(variable);
    let old_message = messages.get(slot);
    let new_marginal = Gaussian::from_precision(
        old_marginal.precision_mean + message.precision_mean - old_message.precision_mean,
        old_marginal.precision + message.precision - old_message.precision,
    );

    variables.put(variable, new_marginal);
    messages.put(slot, message);

    old_marginal.distance(&new_marginal)
}

pub(super) fn update_likelihood(
    precision: f64,
    (target, target_slot): (Handle, Handle),
    (source, source_slot): (Handle, Handle),
    variables: &mut DistributionArena,
    messages: &mut DistributionArena,
) -> f64 {
    let target_message = messages.get(target_slot);
    let source_message = messages.get(source_slot);
    let target_marginal = variables.get(target);
    let source_marginal = variables.get(source);

    let a = precision / (precision + source_marginal.precision - source_message.precision);
    let new_message = Gaussian::from_precision(
        a * (source_marginal.precision_mean - source_message.precision_mean),
        a * (source_marginal.precision - source_message.precision),
    );
    let new_marginal = target_marginal / target_message * new_message;

    messages.put(target_slot, new_message);
    variables.put(target, new_marginal);

    new_marginal.distance(&target_marginal)
}

pub(super) fn update_weighted_sum(
    [w0, w1]: [f64; 2],
    (target, target_slot): (Handle, Handle),
    (first, first_slot): (Handle, Handle),
    (second, second_slot): (Handle, Handle),
    variables: &mut DistributionArena,
    messages: &mut DistributionArena,
) -> f64 {
    let d0 = variables.get(first) / messages.get(first_slot);
    let d1 = variables.get(second) / messages.get(second_slot);
    let target_message = messages.get(target_slot);
    let target_marginal = variables.get(target);

    let denominator = w0 * w0 * d1.precision + w1 * w1 * d0.precision;
    let new_message = Gaussian::from_precision(
        (w0 * d1.precision * d0.precision_mean + w1 * d0.precision * d1.precision_mean)
            / denominator,
        d0.precision * d1.precision / denominator,
    );
    let new_marginal = target_marginal / target_message * new_message;

    messages.put(target_slot, new_message);
    variables.put(target, new_marginal);

    new_marginal.distance(&target_marginal)
}

pub(super) fn update_truncated(
    epsilon: f64,
    v: fn(f64, f64) -> f64,
    w: fn(f64, f64) -> f64,
    variable: Handle,
    slot: Handle,
    variables: &mut DistributionArena,
    messages: &mut DistributionArena,
) -> f64 {
    let old_marginal = variables.get(variable);
    let old_message = messages.get(slot);
    let from_variable = old_marginal / old_message;

    let c = from_variable.precision;
    let d = from_variable.precision_mean;
    let sqrt_c = c.sqrt();
    let t = d / sqrt_c;
    let scaled_epsilon = epsilon * sqrt_c;

    let denominator = 1.0 - w(t, scaled_epsilon);
    let new_marginal = Gaussian::from_precision(
        (d + sqrt_c * v(t, scaled_epsilon)) / denominator,
        c / denominator,
    );
    let new_message = old_message * new_marginal / old_marginal;

    messages.put(slot, new_message);
    variables.put(variable, new_marginal);

    new_marginal.distance(&old_marginal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(count: usize) -> (DistributionArena, Vec<Handle>) {
        let mut variables = DistributionArena::default();
        let handles = (0..count).map(|_| variables.next_index()).collect();
        (variables, handles)
    }

    #[test]
    fn test_factories_reserve_one_message_per_port() {
        let (_, vars) = setup(3);
        let mut factory = FactorFactory::new();

        assert_eq!(factory.prior(0.0, 1.0, vars[0]).num_messages(), 1);
        assert_eq!(factory.likelihood(1.0, vars[0], vars[1]).num_messages(), 2);
        assert_eq!(
            factory
                .weighted_sum(1.0, -1.0, vars[0], vars[1], vars[2])
                .num_messages(),
            3
        );
        assert_eq!(factory.greater_than(0.1, vars[0]).num_messages(), 1);
        assert_eq!(factory.within(0.1, vars[0]).num_messages(), 1);
        assert_eq!(factory.messages().len(), 8);
    }

    #[test]
    fn test_prior_update_injects_fixed_message() {
        let (mut variables, vars) = setup(1);
        let mut factory = FactorFactory::new();
        let prior = factory.prior(25.0, 9.0, vars[0]);
        let mut messages = factory.into_messages();

        let delta = prior.update_message(0, &mut variables, &mut messages);
        let marginal = variables.get(vars[0]);
        assert!((marginal.mean() - 25.0).abs() < 1e-12);
        assert!((marginal.variance() - 9.0).abs() < 1e-12);
        assert!(delta > 0.0);

        // The message is constant, so a second update changes nothing.
        assert!(prior.update_message(0, &mut variables, &mut messages) < 1e-12);
    }

    #[test]
    fn test_likelihood_adds_channel_noise() {
        let (mut variables, vars) = setup(2);
        let (performance, skill) = (vars[0], vars[1]);
        let mut factory = FactorFactory::new();
        let prior = factory.prior(10.0, 4.0, skill);
        let likelihood = factory.likelihood(1.0, performance, skill);
        let mut messages = factory.into_messages();

        prior.update_message(0, &mut variables, &mut messages);
        likelihood.update_message(0, &mut variables, &mut messages);

        let perf = variables.get(performance);
        assert!((perf.mean() - 10.0).abs() < 1e-12);
        assert!((perf.variance() - 5.0).abs() < 1e-12);

        // Nothing new arrived on the performance side yet.
        let delta = likelihood.update_message(1, &mut variables, &mut messages);
        assert!(delta < 1e-12);
        assert!((variables.get(skill).variance() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_sum_difference() {
        let (mut variables, vars) = setup(3);
        let (diff, a, b) = (vars[0], vars[1], vars[2]);
        let mut factory = FactorFactory::new();
        let prior_a = factory.prior(5.0, 2.0, a);
        let prior_b = factory.prior(3.0, 1.0, b);
        let sum = factory.weighted_sum(1.0, -1.0, diff, a, b);
        let mut messages = factory.into_messages();

        prior_a.update_message(0, &mut variables, &mut messages);
        prior_b.update_message(0, &mut variables, &mut messages);
        sum.update_message(0, &mut variables, &mut messages);

        let d = variables.get(diff);
        assert!((d.mean() - 2.0).abs() < 1e-12);
        assert!((d.variance() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_sum_solves_for_each_operand() {
        let (mut variables, vars) = setup(3);
        let (sum_var, a, b) = (vars[0], vars[1], vars[2]);
        let mut factory = FactorFactory::new();
        let prior_sum = factory.prior(10.0, 1.0, sum_var);
        let prior_b = factory.prior(4.0, 1.0, b);
        let sum = factory.weighted_sum(2.0, 1.0, sum_var, a, b);
        let mut messages = factory.into_messages();

        prior_sum.update_message(0, &mut variables, &mut messages);
        prior_b.update_message(0, &mut variables, &mut messages);
        // a = (sum - b) / 2 => mean 3, variance (1 + 1) / 4
        sum.update_message(1, &mut variables, &mut messages);

        let solved = variables.get(a);
        assert!((solved.mean() - 3.0).abs() < 1e-12);
        assert!((solved.variance() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_greater_than_shifts_mean_up() {
        let (mut variables, vars) = setup(1);
        let mut factory = FactorFactory::new();
        let prior = factory.prior(0.0, 1.0, vars[0]);
        let truncation = factory.greater_than(0.0, vars[0]);
        let mut messages = factory.into_messages();

        prior.update_message(0, &mut variables, &mut messages);
        truncation.update_message(0, &mut variables, &mut messages);

        // Half-normal moments: mean sqrt(2 / pi), variance 1 - 2 / pi
        let marginal = variables.get(vars[0]);
        let pi = std::f64::consts::PI;
        assert!((marginal.mean() - (2.0 / pi).sqrt()).abs() < 1e-12);
        assert!((marginal.variance() - (1.0 - 2.0 / pi)).abs() < 1e-12);
    }

    #[test]
    fn test_within_keeps_centered_mean_and_shrinks_variance() {
        let (mut variables, vars) = setup(1);
        let mut factory = FactorFactory::new();
        let prior = factory.prior(0.0, 4.0, vars[0]);
        let truncation = factory.within(0.5, vars[0]);
        let mut messages = factory.into_messages();

        prior.update_message(0, &mut variables, &mut messages);
        truncation.update_message(0, &mut variables, &mut messages);

        let marginal = variables.get(vars[0]);
        assert!(marginal.mean().abs() < 1e-12);
        assert!(marginal.variance() < 0.25);
    }
}

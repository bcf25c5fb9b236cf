//! Factor nodes and the factor collection
//!
//! Every factor exposes the same contract regardless of its kind, so the
//! schedule and the evidence computation never branch on the concrete
//! variant. Arenas are passed in explicitly on every call; a factor only
//! stores handles into them.

use super::arena::{DistributionArena, Handle};
use super::factory;
use super::truncated::{v_greater_than, v_within, w_greater_than, w_within};
use crate::gaussian::{cdf, log_prod_norm, log_ratio_norm, Gaussian};

/// Kind-specific parameters of a factor.
#[derive(Debug, Clone, PartialEq)]
pub enum FactorKind {
    /// Fixed Gaussian observation on one variable.
    Prior { message: Gaussian },
    /// `variables[0] ~ N(variables[1], 1 / precision)`.
    Likelihood { precision: f64 },
    /// `variables[0] = a1 * variables[1] + a2 * variables[2]`; one weight
    /// pair per message direction.
    WeightedSum { weights: [[f64; 2]; 3] },
    /// `variables[0] > epsilon`.
    GreaterThan { epsilon: f64 },
    /// `|variables[0]| <= epsilon`.
    Within { epsilon: f64 },
}

impl FactorKind {
    pub fn name(&self) -> &'static str {
        match self {
            FactorKind::Prior { .. } => "prior",
            FactorKind::Likelihood { .. } => "likelihood",
            FactorKind::WeightedSum { .. } => "weighted-sum",
            FactorKind::GreaterThan { .. } => "greater-than",
            FactorKind::Within { .. } => "within",
        }
    }
}

/// A factor node bound to variable handles and its own message handles.
///
/// `variables[i]` receives the message stored at `messages[i]`.
#[derive(Debug, Clone)]
pub struct Factor {
    kind: FactorKind,
    variables: Vec<Handle>,
    messages: Vec<Handle>,
}

impl Factor {
    pub(super) fn new(kind: FactorKind, variables: Vec<Handle>, messages: Vec<Handle>) -> Self {
        debug_assert_eq!(variables.len(), messages.len());
        Self {
            kind,
            variables,
            messages,
        }
    }

    pub fn kind(&self) -> &FactorKind {
        &self.kind
    }

    pub fn variables(&self) -> &[Handle] {
        &self.variables
    }

    pub fn messages(&self) -> &[Handle] {
        &self.messages
    }

    pub fn num_messages(&self) -> usize {
        self.messages.len()
    }

    fn check_port(&self, port: usize) {
        assert!(
            port < self.messages.len(),
            "message port {port} out of range for {} factor with {} ports",
            self.kind.name(),
            self.messages.len()
        );
    }

    /// Recompute the outgoing message on `port` and the marginal it feeds.
    ///
    /// Returns the distance between the old and new marginal.
    ///
    /// # Panics
    /// If `port` is not a port of this factor.
    pub fn update_message(
        &self,
        port: usize,
        variables: &mut DistributionArena,
        messages: &mut DistributionArena,
    ) -> f64 {
        self.check_port(port);

        match &self.kind {
            FactorKind::Prior { message } => factory::update_prior(
                *message,
                self.variables[0],
                self.messages[0],
                variables,
                messages,
            ),
            FactorKind::Likelihood { precision } => {
                let (target, source) = if port == 0 { (0, 1) } else { (1, 0) };
                factory::update_likelihood(
                    *precision,
                    (self.variables[target], self.messages[target]),
                    (self.variables[source], self.messages[source]),
                    variables,
                    messages,
                )
            }
            FactorKind::WeightedSum { weights } => {
                let (target, first, second) = match port {
                    0 => (0, 1, 2),
                    1 => (1, 2, 0),
                    _ => (2, 1, 0),
                };
                factory::update_weighted_sum(
                    weights[port],
                    (self.variables[target], self.messages[target]),
                    (self.variables[first], self.messages[first]),
                    (self.variables[second], self.messages[second]),
                    variables,
                    messages,
                )
            }
            FactorKind::GreaterThan { epsilon } => factory::update_truncated(
                *epsilon,
                v_greater_than,
                w_greater_than,
                self.variables[0],
                self.messages[0],
                variables,
                messages,
            ),
            FactorKind::Within { epsilon } => factory::update_truncated(
                *epsilon,
                v_within,
                w_within,
                self.variables[0],
                self.messages[0],
                variables,
                messages,
            ),
        }
    }

    /// Multiply the stored message on `port` into its variable's marginal.
    ///
    /// Returns the log normalization of that product.
    ///
    /// # Panics
    /// If `port` is not a port of this factor.
    pub fn send_message(
        &self,
        port: usize,
        variables: &mut DistributionArena,
        messages: &DistributionArena,
    ) -> f64 {
        self.check_port(port);

        let variable = self.variables[port];
        let marginal = variables.get(variable);
        let message = messages.get(self.messages[port]);
        variables.put(variable, marginal * message);

        log_prod_norm(&marginal, &message)
    }

    /// Factor-specific log normalization term.
    pub fn log_normalization(
        &self,
        variables: &DistributionArena,
        messages: &DistributionArena,
    ) -> f64 {
        let ratio = |port: usize| {
            log_ratio_norm(
                &variables.get(self.variables[port]),
                &messages.get(self.messages[port]),
            )
        };

        match &self.kind {
            FactorKind::Prior { .. } => 0.0,
            FactorKind::Likelihood { .. } => ratio(0),
            FactorKind::WeightedSum { .. } => ratio(1) + ratio(2),
            FactorKind::GreaterThan { epsilon } | FactorKind::Within { epsilon } => {
                let epsilon = *epsilon;
                let message = messages.get(self.messages[0]);
                let from_variable = variables.get(self.variables[0]) / message;
                let mean = from_variable.mean();
                let std_dev = from_variable.std_dev();

                let z = if matches!(self.kind, FactorKind::GreaterThan { .. }) {
                    cdf((mean - epsilon) / std_dev)
                } else {
                    cdf((epsilon - mean) / std_dev) - cdf((-epsilon - mean) / std_dev)
                };

                -log_prod_norm(&from_variable, &message) + z.ln()
            }
        }
    }

    /// Reset every variable this factor touches to the arena prior.
    pub fn reset_marginals(&self, variables: &mut DistributionArena) {
        for &variable in &self.variables {
            variables.put_prior_at(variable);
        }
    }
}

/// Index of a factor inside a [`FactorList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FactorId(usize);

/// Ordered collection of factors.
#[derive(Debug, Clone, Default)]
pub struct FactorList {
    factors: Vec<Factor>,
}

impl FactorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, factor: Factor) -> FactorId {
        self.factors.push(factor);
        FactorId(self.factors.len() - 1)
    }

    pub fn get(&self, id: FactorId) -> &Factor {
        &self.factors[id.0]
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Factor> {
        self.factors.iter()
    }

    pub fn update_message(
        &self,
        id: FactorId,
        port: usize,
        variables: &mut DistributionArena,
        messages: &mut DistributionArena,
    ) -> f64 {
        self.get(id).update_message(port, variables, messages)
    }

    /// Total log evidence of the graph under the current messages.
    ///
    /// Resets every marginal to the prior, re-sends every stored message and
    /// adds the per-factor terms, so repeated calls agree.
    pub fn log_normalization(
        &self,
        variables: &mut DistributionArena,
        messages: &DistributionArena,
    ) -> f64 {
        for factor in &self.factors {
            factor.reset_marginals(variables);
        }

        let mut sum_log_z = 0.0;
        for factor in &self.factors {
            for port in 0..factor.num_messages() {
                sum_log_z += factor.send_message(port, variables, messages);
            }
        }

        let sum_log_s: f64 = self
            .factors
            .iter()
            .map(|factor| factor.log_normalization(variables, messages))
            .sum();

        sum_log_z + sum_log_s
    }
}

//! Message-passing schedules
//!
//! A schedule is a small tree of steps, sequences and convergence loops. It
//! knows nothing about factors: each step names a target and a port, and the
//! caller supplies the function that performs the update and reports how
//! much the affected belief moved.

use tracing::{trace, warn};

/// Control-flow tree evaluated by [`Schedule::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum Schedule<K> {
    /// Apply the update function to one port of `target`.
    Step { target: K, port: usize },
    /// Run children in order; the delta is the largest child delta.
    Sequence(Vec<Schedule<K>>),
    /// Re-run `body` until its delta is at most `max_delta`.
    ///
    /// Without `max_iterations` the loop is unbounded.
    Loop {
        body: Box<Schedule<K>>,
        max_delta: f64,
        max_iterations: Option<usize>,
    },
}

/// Counters collected while running a schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    /// Number of steps executed
    pub steps: usize,
    /// Number of loop-body passes across all loops
    pub loop_passes: usize,
    /// Loops stopped by their iteration cap rather than by convergence
    pub exhausted_loops: usize,
    /// Delta of the most recent loop pass
    pub last_loop_delta: Option<f64>,
}

impl<K> Schedule<K> {
    pub fn step(target: K, port: usize) -> Self {
        Schedule::Step { target, port }
    }

    pub fn sequence(children: Vec<Schedule<K>>) -> Self {
        Schedule::Sequence(children)
    }

    /// Unbounded convergence loop.
    pub fn repeat_until(body: Schedule<K>, max_delta: f64) -> Self {
        Self::repeat_at_most(body, max_delta, None)
    }

    pub fn repeat_at_most(body: Schedule<K>, max_delta: f64, max_iterations: Option<usize>) -> Self {
        Schedule::Loop {
            body: Box::new(body),
            max_delta,
            max_iterations,
        }
    }

    /// Run the schedule and return its delta.
    pub fn run<F>(&self, update: &mut F) -> f64
    where
        F: FnMut(&K, usize) -> f64,
    {
        let mut stats = RunStats::default();
        self.run_with_stats(update, &mut stats)
    }

    /// Run the schedule, recording counters into `stats`.
    pub fn run_with_stats<F>(&self, update: &mut F, stats: &mut RunStats) -> f64
    where
        F: FnMut(&K, usize) -> f64,
    {
        match self {
            Schedule::Step { target, port } => {
                stats.steps += 1;
                update(target, *port)
            }
            Schedule::Sequence(children) => children
                .iter()
                .fold(0.0_f64, |delta, child| delta.max(child.run_with_stats(update, stats))),
            Schedule::Loop {
                body,
                max_delta,
                max_iterations,
            } => {
                let mut delta = f64::INFINITY;
                let mut passes = 0;
                while delta > *max_delta {
                    if max_iterations.is_some_and(|limit| passes >= limit) {
                        warn!(passes, delta, "Schedule loop stopped before converging");
                        stats.exhausted_loops += 1;
                        break;
                    }

                    delta = body.run_with_stats(update, stats);
                    passes += 1;
                    stats.loop_passes += 1;
                    stats.last_loop_delta = Some(delta);
                    trace!(pass = passes, delta, "Schedule loop pass");
                }
                delta
            }
        }
    }
}

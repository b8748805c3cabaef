use super::{eval::*, policy::*, Mdp, MdpSolver};
use crate::common::{config::*, defs::*, error::*};
use crate::ui;
use itertools::Itertools;
use std::rc::Rc;
use tracing::{info, warn};

/// Policy iteration - Sutton & Barto 2018, 4.3.
#[derive(Clone)]
pub struct PolicyIteration {
    mdp: Rc<dyn Mdp>,
    config: Configuration,
    policy: TabularPolicy,
    v: Vec<Continous>,
    iterations: usize,
}

impl PolicyIteration {
    pub fn new(config: Configuration, mdp: Rc<dyn Mdp>, policy: TabularPolicy) -> Result<Self> {
        config.validate()?;
        if mdp.n_s() != config.n * config.n || policy.n_s() != mdp.n_s() {
            return Err(GridWorldError::InvalidConfiguration(format!(
                "N = {} does not match an environment of {} states and a policy of {} states",
                config.n,
                mdp.n_s(),
                policy.n_s()
            )));
        }

        let n_s = mdp.n_s();
        Ok(Self {
            mdp,
            config,
            policy,
            v: vec![0.; n_s],
            iterations: 0,
        })
    }

    pub fn policy(&self) -> &TabularPolicy {
        &self.policy
    }

    pub fn v(&self) -> &[Continous] {
        &self.v
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn policy_evaluation(&self) -> Result<Vec<Continous>> {
        IterativePolicyEvaluation::new(
            Rc::clone(&self.mdp),
            self.config.theta,
            self.config.discount,
            self.config.max_sweeps,
        )
        .eval(&self.policy)
    }

    /// Makes the policy greedy with respect to the current value function.
    /// Returns the policy and whether no row changed.
    pub fn policy_improvement(&mut self) -> (&TabularPolicy, bool) {
        // Terminal states get the best value so that neighbours are pulled into them.
        let mut v = self.v.clone();
        let boost = v.iter().copied().fold(Continous::NEG_INFINITY, Continous::max) + 1.;
        for &t in self.mdp.terminal_states() {
            v[t] = boost;
        }

        let mut policy_stable = true;
        for s in (0..self.mdp.n_s()).filter(|&s| !self.mdp.is_terminal(s)) {
            let probs = self.greedy_actions(&v, s);
            if *self.policy.row(s) != probs {
                policy_stable = false;
            }
            self.policy.set_row(s, probs);
        }

        info!(policy_stable, "policy improvement");
        (&self.policy, policy_stable)
    }

    /// Splits probability evenly between the actions leading to the best neighbour value.
    pub fn greedy_actions(&self, v: &[Continous], s: Discrete) -> ActionProbs {
        let values = self.action_values(v, s);
        let max = values
            .iter()
            .copied()
            .fold(Continous::NEG_INFINITY, Continous::max);
        let best = values.iter().positions(|&x| x == max).collect_vec();

        let mut probs = [0.; 4];
        for &i in &best {
            probs[i] = 1. / best.len() as Continous;
        }

        probs
    }

    /// Value of the state every action leads to from `s`.
    pub fn action_values(&self, v: &[Continous], s: Discrete) -> [Continous; 4] {
        Action::ALL.map(|a| v[self.mdp.successor(s, a)])
    }

    /// Alternates evaluation and improvement until the policy stops changing.
    pub fn execute(&mut self, verbose: bool) -> Result<(TabularPolicy, Vec<Continous>)> {
        let n = self.config.n;
        self.iterations = 0;

        loop {
            if let Some(limit) = self.config.max_iterations {
                if self.iterations >= limit {
                    warn!(limit, "policy iteration did not converge");
                    return Err(GridWorldError::ConvergenceTimeout {
                        phase: "policy iteration",
                        limit,
                    });
                }
            }

            self.v = self.policy_evaluation()?;
            self.iterations += 1;
            if verbose {
                println!("Policy Value Function");
                println!("{}", ui::format_v(&self.v, n));
            }

            let (policy, policy_stable) = self.policy_improvement();
            if verbose {
                println!("Policy");
                println!("{}", ui::format_policy(policy.rows(), n));
            }

            if policy_stable {
                break;
            }
        }

        info!(iterations = self.iterations, "policy iteration converged");
        Ok((self.policy.clone(), self.v.clone()))
    }
}

impl MdpSolver for PolicyIteration {
    fn v_star(&self, s: Discrete) -> Continous {
        self.v[s]
    }

    fn q_star(&self, s: Discrete, a: Action) -> Option<Continous> {
        if self.mdp.is_terminal(s) {
            return None;
        }

        let t = self.mdp.transition(s, a);
        Some(t.reward + self.config.discount * self.v[t.next_state])
    }

    fn pi_star(&self, s: Discrete) -> Option<Action> {
        if self.mdp.is_terminal(s) {
            return None;
        }

        let row = self.policy.row(s);
        let max = row.iter().copied().fold(Continous::NEG_INFINITY, Continous::max);
        row.iter()
            .position(|&p| p == max)
            .and_then(Action::from_index)
    }
}

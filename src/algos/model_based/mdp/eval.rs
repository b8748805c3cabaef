use super::{policy::*, Mdp};
use crate::common::{defs::*, error::*};
use std::rc::Rc;
use tracing::{debug, warn};

const ROUND_FACTOR: Continous = 1e4;

/// Rounds to 4 decimals, exact halves going to the even neighbour.
pub fn round4(v: Continous) -> Continous {
    (v * ROUND_FACTOR).round_ties_even() / ROUND_FACTOR
}

/// Iterative policy evaluation (synchronous backups). Sutton & Barto 2018, 4.1.
pub struct IterativePolicyEvaluation {
    mdp: Rc<dyn Mdp>,
    theta: Continous,
    gamma: Continous,
    max_sweeps: Option<usize>,
}

impl IterativePolicyEvaluation {
    pub fn new(
        mdp: Rc<dyn Mdp>,
        theta: Continous,
        gamma: Continous,
        max_sweeps: Option<usize>,
    ) -> Self {
        Self {
            mdp,
            theta,
            gamma,
            max_sweeps,
        }
    }

    /// Value function of `policy`, accurate to within `theta` per sweep.
    pub fn eval(&self, policy: &TabularPolicy) -> Result<Vec<Continous>> {
        let n_s = self.mdp.n_s();
        let mut v = vec![0 as Continous; n_s];
        let mut vc = vec![0 as Continous; n_s];

        let mut sweeps = 0;
        loop {
            let mut delta: Continous = 0.;
            for (s, vc_s) in vc.iter_mut().enumerate() {
                let value = Action::ALL
                    .iter()
                    .map(|&a| self.calc_value(&v, s, a) * policy.get_action_probs(s, a))
                    .sum::<Continous>();

                *vc_s = round4(value);
                delta = delta.max((*vc_s - v[s]).abs());
            }

            std::mem::swap(&mut v, &mut vc);
            vc.fill(0.);
            sweeps += 1;
            debug!(sweeps, delta, "policy evaluation sweep");

            if delta < self.theta {
                return Ok(v);
            }

            if let Some(limit) = self.max_sweeps {
                if sweeps >= limit {
                    warn!(limit, delta, "policy evaluation did not converge");
                    return Err(GridWorldError::ConvergenceTimeout {
                        phase: "policy evaluation",
                        limit,
                    });
                }
            }
        }
    }

    /// One step look-ahead of `a` in `s` against the previous sweep's values.
    fn calc_value(&self, v: &[Continous], s: Discrete, a: Action) -> Continous {
        if self.mdp.is_terminal(s) {
            return 0.;
        }

        let t = self.mdp.transition(s, a);
        t.reward + self.gamma * v[t.next_state]
    }
}

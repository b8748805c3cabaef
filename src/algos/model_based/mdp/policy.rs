use crate::common::{defs::*, error::*};
use crate::envs::grid_world::GridWorld;
use rand::distributions::WeightedIndex;
use rand::prelude::*;

pub type ActionProbs = [Continous; 4];

/// Per state probabilities of taking each action, in `Action` index order.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularPolicy {
    state_actions_probs: Vec<ActionProbs>,
}

impl TabularPolicy {
    /// Copies `initial_probs` into every state of an `n`x`n` grid.
    pub fn new(initial_probs: ActionProbs, n: Discrete) -> Result<Self> {
        if initial_probs.iter().any(|&p| !p.is_finite() || p < 0.) {
            return Err(GridWorldError::InvalidPolicy(format!(
                "probabilities must be non-negative, got {initial_probs:?}"
            )));
        }

        let total = initial_probs.iter().sum::<Continous>();
        if (total - 1.).abs() > 1e-9 {
            return Err(GridWorldError::InvalidPolicy(format!(
                "probabilities must sum to 1, got {total}"
            )));
        }

        Ok(Self {
            state_actions_probs: vec![initial_probs; n * n],
        })
    }

    pub fn uniform(n: Discrete) -> Self {
        Self {
            state_actions_probs: vec![[0.25; 4]; n * n],
        }
    }

    pub fn n_s(&self) -> usize {
        self.state_actions_probs.len()
    }

    pub fn get_action_probs(&self, s: Discrete, a: Action) -> Continous {
        self.state_actions_probs[s][a.index()]
    }

    pub fn row(&self, s: Discrete) -> &ActionProbs {
        &self.state_actions_probs[s]
    }

    pub fn set_row(&mut self, s: Discrete, probs: ActionProbs) {
        self.state_actions_probs[s] = probs;
    }

    pub fn rows(&self) -> &[ActionProbs] {
        &self.state_actions_probs
    }

    /// Samples an action for the state the environment is currently in.
    pub fn get_action<R: Rng>(&self, env: &GridWorld, rng: &mut R) -> Result<Action> {
        let s = env.current().ok_or(GridWorldError::NotReset)?;
        let dist = WeightedIndex::new(self.row(s))
            .map_err(|e| GridWorldError::InvalidPolicy(format!("state {s}: {e}")))?;

        Ok(Action::ALL[dist.sample(rng)])
    }
}

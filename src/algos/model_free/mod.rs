pub mod monte_carlo;

use crate::algos::model_based::mdp::policy::TabularPolicy;
use crate::common::{defs::*, error::*};
use crate::envs::grid_world::GridWorld;
use rand::prelude::*;

pub trait EpisodeGenerator {
    fn generate(&self, n: usize, seed: Option<u64>) -> Result<Vec<Vec<EpisodeEvent>>>;
}

/// Plays a tabular policy on a fresh grid world, one episode per random start.
pub struct PolicyRollout<'a> {
    pub policy: &'a TabularPolicy,
    pub n: Discrete,
    pub max_steps: usize,
}

impl EpisodeGenerator for PolicyRollout<'_> {
    fn generate(&self, n_ep: usize, seed: Option<u64>) -> Result<Vec<Vec<EpisodeEvent>>> {
        let seed = seed.unwrap_or_else(|| thread_rng().gen());
        let env = &mut GridWorld::with_seed(self.n, seed)?;
        let rng = &mut StdRng::seed_from_u64(seed.wrapping_add(1));

        let mut eps = Vec::with_capacity(n_ep);
        for _ in 0..n_ep {
            let mut ep = vec![EpisodeEvent {
                s: env.reset(),
                r: Default::default(),
            }];

            for _ in 0..self.max_steps {
                let a = self.policy.get_action(env, rng)?;
                let si = env.step(a)?;
                ep.push(EpisodeEvent {
                    s: si.observation,
                    r: si.reward,
                });
                if si.terminated {
                    break;
                }
            }

            eps.push(ep);
        }

        Ok(eps)
    }
}

/// Discounted sum of the rewards collected after the start state.
pub fn discounted_return(ep: &[EpisodeEvent], gamma: Continous) -> Continous {
    ep.iter()
        .skip(1)
        .rev()
        .fold(0., |g, e| e.r + gamma * g)
}

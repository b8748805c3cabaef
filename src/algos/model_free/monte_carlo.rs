use super::EpisodeGenerator;
use crate::common::{defs::*, error::*};
use std::iter::zip;

/// Which occurrences of a state inside one episode contribute a sampled return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    First,
    Every,
}

/// Monte Carlo prediction of the value of the policy behind `ep_gen`: the mean
/// return observed after each state. States never visited are left at 0.
/// Ref: Sutton & Barto 2018, 5.1.
pub fn mc_prediction(
    ep_gen: &dyn EpisodeGenerator,
    gamma: Continous,
    n_s: usize,
    n_ep: usize,
    seed: Option<u64>,
    visit: Visit,
) -> Result<Vec<Continous>> {
    let mut totals = vec![(0 as Continous, 0usize); n_s];

    for ep in ep_gen.generate(n_ep, seed)? {
        let mut seen = vec![false; n_s];
        for (e, g) in zip(&ep, returns_to_go(&ep, gamma)) {
            let repeated = std::mem::replace(&mut seen[e.s], true);
            if visit == Visit::First && repeated {
                continue;
            }

            let (sum, count) = &mut totals[e.s];
            *sum += g;
            *count += 1;
        }
    }

    Ok(totals
        .into_iter()
        .map(|(sum, count)| match count {
            0 => 0.,
            c => sum / c as Continous,
        })
        .collect())
}

/// Return following every event but the last, which has no successor.
fn returns_to_go(ep: &[EpisodeEvent], gamma: Continous) -> Vec<Continous> {
    let mut g = ep
        .iter()
        .skip(1)
        .rev()
        .scan(0 as Continous, |g, e| {
            *g = e.r + gamma * *g;
            Some(*g)
        })
        .collect::<Vec<_>>();
    g.reverse();

    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algos::model_based::mdp::{pi::PolicyIteration, policy::TabularPolicy};
    use crate::algos::model_free::{discounted_return, PolicyRollout};
    use crate::common::config::Configuration;
    use crate::envs::grid_world::GridWorld;
    use float_eq::*;
    use std::rc::Rc;
    use Action::*;

    struct Recorded(Vec<Vec<EpisodeEvent>>);

    impl EpisodeGenerator for Recorded {
        fn generate(&self, _n: usize, _seed: Option<u64>) -> Result<Vec<Vec<EpisodeEvent>>> {
            Ok(self.0.clone())
        }
    }

    /// Walks a 4x4 grid from `start` through `actions`.
    fn play(start: Discrete, actions: &[Action]) -> Vec<EpisodeEvent> {
        let mut env = GridWorld::with_seed(4, 2718).unwrap();
        env.set_state(start);

        let mut ep = vec![EpisodeEvent { s: start, r: 0. }];
        for &a in actions {
            let si = env.step(a).unwrap();
            ep.push(EpisodeEvent {
                s: si.observation,
                r: si.reward,
            });
        }

        ep
    }

    fn walks() -> Recorded {
        Recorded(vec![
            // 6 -> 2 -> 1 -> 0
            play(6, &[Up, Left, Left]),
            // 5 -> 1, bump the top wall, then 0
            play(5, &[Up, Up, Left]),
            // 10 -> 14 -> 15
            play(10, &[Down, Right]),
            play(14, &[Right]),
        ])
    }

    #[test]
    fn returns_to_go_ends_with_the_last_reward() {
        let ep = play(6, &[Up, Left, Left]);
        let g = returns_to_go(&ep, 0.9);

        assert_float_eq!(g, vec![2.15, 3.5, 5.], abs_all <= 1e-12);
        assert_float_eq!(g[0], discounted_return(&ep, 0.9), abs <= 1e-12);
    }

    #[test]
    fn first_visit_on_recorded_walks() {
        let v = mc_prediction(&walks(), 0.9, 16, 4, None, Visit::First).unwrap();

        let mut expected = vec![0.; 16];
        expected[1] = (5. + 2.5) / 2.;
        expected[2] = 3.5;
        expected[5] = 1.25;
        expected[6] = 2.15;
        expected[10] = 8.;
        expected[14] = 10.;
        assert_float_eq!(v, expected, abs_all <= 1e-9);
    }

    #[test]
    fn every_visit_counts_the_wall_bump_twice() {
        let v = mc_prediction(&walks(), 0.9, 16, 4, None, Visit::Every).unwrap();

        assert_float_eq!(v[1], (5. + 2.5 + 5.) / 3., abs <= 1e-9);
        assert_float_eq!(v[5], 1.25, abs <= 1e-9);
        assert_float_eq!(v[0], 0., abs <= 1e-12);
        assert_float_eq!(v[15], 0., abs <= 1e-12);
    }

    #[test]
    fn sampled_returns_agree_with_policy_iteration() {
        let n = 4;
        let config = Configuration::new(n, 0.001, 0.9).unwrap();
        let pi = &mut PolicyIteration::new(
            config,
            Rc::new(GridWorld::new(n).unwrap()),
            TabularPolicy::uniform(n),
        )
        .unwrap();
        let (policy, v) = pi.execute(false).unwrap();

        let rollout = PolicyRollout {
            policy: &policy,
            n,
            max_steps: 4 * n,
        };
        let v_mc = mc_prediction(&rollout, 0.9, n * n, 500, Some(2718), Visit::First).unwrap();

        for s in 1..(n * n - 1) {
            assert_float_eq!(v_mc[s], v[s], abs <= 1e-3);
        }
    }
}

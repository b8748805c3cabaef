use crate::algos::model_based::mdp::Mdp;
use crate::common::{defs::*, error::*};
use rand::distributions::WeightedIndex;
use rand::prelude::*;

pub const TL_REWARD: Continous = 5.;
pub const RB_REWARD: Continous = 10.;
pub const STEP_REWARD: Continous = -1.;
pub const BLOCKED_REWARD: Continous = -2.;

/// Cell reached from `s` by `a` on an `n`x`n` grid. Moves off the grid leave the agent in place.
pub fn neighbour(n: Discrete, s: Discrete, a: Action) -> Discrete {
    match a {
        Action::Up if s >= n => s - n,
        Action::Down if s < n * (n - 1) => s + n,
        Action::Left if s % n != 0 => s - 1,
        Action::Right if (s + 1) % n != 0 => s + 1,
        _ => s,
    }
}

pub fn terminal_states(n: Discrete) -> [Discrete; 2] {
    [0, n * n - 1]
}

/// Reward for arriving in `to` after leaving `from`.
pub fn reward(n: Discrete, from: Discrete, to: Discrete) -> Continous {
    let [tl, rb] = terminal_states(n);
    if to == tl {
        TL_REWARD
    } else if to == rb {
        RB_REWARD
    } else if from == to {
        BLOCKED_REWARD
    } else {
        STEP_REWARD
    }
}

/// Outcome of taking `a` in `s`. Terminal states are absorbing.
pub fn evaluate_state(n: Discrete, s: Discrete, a: Action) -> Transition {
    let next_state = if terminal_states(n).contains(&s) {
        s
    } else {
        neighbour(n, s, a)
    };

    Transition {
        next_state,
        reward: reward(n, s, next_state),
        done: terminal_states(n).contains(&next_state),
    }
}

/// Square grid with absorbing corners at the top-left and the bottom-right.
#[derive(Debug, Clone)]
pub struct GridWorld {
    n: Discrete,
    terminal_states: [Discrete; 2],
    action_probs: [Continous; 4],
    current: Option<Discrete>,
    previous: Option<Discrete>,
    rng: StdRng,
}

impl GridWorld {
    pub fn new(n: Discrete) -> Result<Self> {
        Self::with_rng(n, StdRng::from_entropy())
    }

    pub fn with_seed(n: Discrete, seed: u64) -> Result<Self> {
        Self::with_rng(n, StdRng::seed_from_u64(seed))
    }

    /// Grids smaller than 2x2 have no non-terminal state to start from.
    fn with_rng(n: Discrete, rng: StdRng) -> Result<Self> {
        if n < 2 {
            return Err(GridWorldError::InvalidConfiguration(format!(
                "N must be at least 2, got {n}"
            )));
        }

        Ok(Self {
            n,
            terminal_states: terminal_states(n),
            action_probs: [0.25; 4],
            current: None,
            previous: None,
            rng,
        })
    }

    pub fn n(&self) -> Discrete {
        self.n
    }

    pub fn current(&self) -> Option<Discrete> {
        self.current
    }

    pub fn previous(&self) -> Option<Discrete> {
        self.previous
    }

    /// Starts in a random state that is not terminal.
    pub fn reset(&mut self) -> Discrete {
        let s = self.rng.gen_range(1..self.n * self.n - 1);
        self.current = Some(s);
        self.previous = None;

        s
    }

    /// Forces the agent into `s`.
    pub fn set_state(&mut self, s: Discrete) {
        self.current = Some(s);
    }

    pub fn sample_action(&mut self) -> Action {
        // The weights are a fixed valid distribution.
        let dist = WeightedIndex::new(self.action_probs).unwrap();
        Action::ALL[dist.sample(&mut self.rng)]
    }

    /// Computes the state `action` leads to and remembers where the agent came from.
    pub fn try_move(&mut self, action: Action) -> Result<Discrete> {
        let s = self.current.ok_or(GridWorldError::NotReset)?;
        self.previous = Some(s);

        Ok(evaluate_state(self.n, s, action).next_state)
    }

    pub fn step(&mut self, action: Action) -> Result<StepInfo> {
        let s = self.try_move(action)?;
        self.current = Some(s);

        Ok(StepInfo {
            observation: s,
            reward: self.get_reward()?,
            terminated: self.is_terminal_state(),
        })
    }

    /// Reward of the last movement.
    pub fn get_reward(&self) -> Result<Continous> {
        let s = self.current.ok_or(GridWorldError::NotReset)?;
        let [tl, rb] = self.terminal_states;
        if s == tl {
            return Ok(TL_REWARD);
        }
        if s == rb {
            return Ok(RB_REWARD);
        }

        if self.previous == Some(s) {
            Ok(BLOCKED_REWARD)
        } else {
            Ok(STEP_REWARD)
        }
    }

    pub fn is_terminal_state(&self) -> bool {
        self.current
            .map_or(false, |s| self.terminal_states.contains(&s))
    }
}

impl Mdp for GridWorld {
    fn n_s(&self) -> usize {
        self.n * self.n
    }

    fn n_a(&self) -> usize {
        Action::ALL.len()
    }

    fn terminal_states(&self) -> &[Discrete] {
        &self.terminal_states
    }

    fn successor(&self, s: Discrete, a: Action) -> Discrete {
        neighbour(self.n, s, a)
    }

    fn transition(&self, s: Discrete, a: Action) -> Transition {
        evaluate_state(self.n, s, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertor::*;
    use float_eq::*;
    use rstest::*;

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    #[case(7)]
    fn exactly_two_terminal_corners(#[case] n: Discrete) {
        let env = GridWorld::new(n).unwrap();
        let terminals = (0..env.n_s())
            .filter(|&s| env.is_terminal(s))
            .collect::<Vec<_>>();

        assert_that!(terminals).is_equal_to(vec![0, n * n - 1]);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn grids_below_two_are_rejected(#[case] n: Discrete) {
        assert!(matches!(
            GridWorld::new(n),
            Err(GridWorldError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            GridWorld::with_seed(n, 2718),
            Err(GridWorldError::InvalidConfiguration(_))
        ));
    }

    #[rstest]
    #[case(1, Action::Up, 1, BLOCKED_REWARD)]
    #[case(1, Action::Down, 5, STEP_REWARD)]
    #[case(1, Action::Left, 0, TL_REWARD)]
    #[case(1, Action::Right, 2, STEP_REWARD)]
    #[case(4, Action::Left, 4, BLOCKED_REWARD)]
    #[case(4, Action::Up, 0, TL_REWARD)]
    #[case(7, Action::Right, 7, BLOCKED_REWARD)]
    #[case(13, Action::Down, 13, BLOCKED_REWARD)]
    #[case(11, Action::Down, 15, RB_REWARD)]
    #[case(14, Action::Right, 15, RB_REWARD)]
    #[case(5, Action::Up, 1, STEP_REWARD)]
    fn step_on_4x4(
        #[case] s: Discrete,
        #[case] a: Action,
        #[case] expected: Discrete,
        #[case] r: Continous,
    ) {
        let mut env = GridWorld::with_seed(4, 2718).unwrap();
        env.set_state(s);

        let si = env.step(a).unwrap();

        assert_eq!(si.observation, expected);
        assert_eq!(env.current(), Some(expected));
        assert_eq!(env.previous(), Some(s));
        assert_float_eq!(si.reward, r, abs <= 1e-12);
        assert_eq!(si.terminated, expected == 0 || expected == 15);
    }

    #[rstest]
    #[case(0, TL_REWARD)]
    #[case(15, RB_REWARD)]
    fn terminal_states_are_absorbing(#[case] s: Discrete, #[case] r: Continous) {
        let mut env = GridWorld::with_seed(4, 2718).unwrap();
        for a in Action::ALL {
            env.set_state(s);
            let si = env.step(a).unwrap();

            assert_eq!(si.observation, s);
            assert_float_eq!(si.reward, r, abs <= 1e-12);
            assert!(si.terminated);
        }
    }

    #[test]
    fn move_does_not_change_current() {
        let mut env = GridWorld::with_seed(4, 2718).unwrap();
        env.set_state(6);

        assert_eq!(env.try_move(Action::Down).unwrap(), 10);
        assert_eq!(env.current(), Some(6));
        assert_eq!(env.previous(), Some(6));
    }

    #[test]
    fn reset_never_starts_in_a_terminal_state() {
        let mut env = GridWorld::with_seed(3, 31415).unwrap();
        for _ in 0..500 {
            let s = env.reset();

            assert!((1..8).contains(&s));
            assert!(!env.is_terminal_state());
            assert_eq!(env.previous(), None);
        }
    }

    #[test]
    fn step_before_reset_fails() {
        let mut env = GridWorld::new(4).unwrap();

        assert!(matches!(env.step(Action::Up), Err(GridWorldError::NotReset)));
        assert!(matches!(env.get_reward(), Err(GridWorldError::NotReset)));
        assert!(!env.is_terminal_state());
    }

    #[test]
    fn sample_action_is_roughly_uniform() {
        let mut env = GridWorld::with_seed(4, 2718).unwrap();
        let counts = &mut [0; 4];
        let n = 10000;
        for _ in 0..n {
            counts[env.sample_action().index()] += 1;
        }

        for c in counts.iter() {
            assert_float_eq!(*c as f64 / n as f64, 0.25, abs <= 2e-2);
        }
    }

    #[test]
    fn pure_model_matches_stateful_environment() {
        let n = 5;
        let mut env = GridWorld::with_seed(n, 2718).unwrap();
        for s in 0..n * n {
            for a in Action::ALL {
                env.set_state(s);
                let si = env.step(a).unwrap();
                let t = evaluate_state(n, s, a);

                assert_eq!(si.observation, t.next_state);
                assert_float_eq!(si.reward, t.reward, abs <= 1e-12);
                assert_eq!(si.terminated, t.done);
            }
        }
    }
}

pub mod eval;
pub mod pi;
pub mod policy;

use crate::common::defs::*;

/// Markov Decision Process - Sutton & Barto 2018.
pub trait Mdp {
    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    fn terminal_states(&self) -> &[Discrete];

    fn is_terminal(&self, s: Discrete) -> bool {
        self.terminal_states().contains(&s)
    }

    /// Adjacent state in direction `a`, ignoring whether `s` is absorbing.
    fn successor(&self, s: Discrete, a: Action) -> Discrete;

    fn transition(&self, s: Discrete, a: Action) -> Transition;
}

pub trait MdpSolver {
    fn v_star(&self, s: Discrete) -> Continous;

    fn q_star(&self, s: Discrete, a: Action) -> Option<Continous>;

    fn pi_star(&self, s: Discrete) -> Option<Action>;
}

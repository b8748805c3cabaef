pub mod algos;
pub mod common;
pub mod envs;
pub mod ui;

pub use algos::model_based::mdp::{
    eval::IterativePolicyEvaluation, pi::PolicyIteration, policy::TabularPolicy, Mdp, MdpSolver,
};
pub use algos::model_free::{
    discounted_return,
    monte_carlo::{mc_prediction, Visit},
    EpisodeGenerator, PolicyRollout,
};
pub use common::{config::*, defs::*, error::*};
pub use envs::grid_world::GridWorld;

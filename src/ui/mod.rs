use crate::algos::model_based::mdp::policy::ActionProbs;
use crate::common::defs::*;
use itertools::Itertools;

/// Value function as an `n`x`n` grid.
pub fn format_v(v: &[Continous], n: Discrete) -> String {
    format_grid(v.iter().map(|x| format!("{x:.2}")), n)
}

/// Surviving actions of every state as arrows.
pub fn format_policy(policy: &[ActionProbs], n: Discrete) -> String {
    format_grid(
        policy.iter().map(|probs| {
            let arrows = Action::ALL
                .iter()
                .filter(|a| probs[a.index()] != 0.)
                .map(|a| a.glyph())
                .collect::<String>();
            format!("{arrows:^4}")
        }),
        n,
    )
}

fn format_grid<I: Iterator<Item = String>>(cells: I, n: Discrete) -> String {
    let mut grid = String::new();
    for mut row in &cells.chunks(n) {
        grid += &row.join("\t");
        grid.push('\n');
    }

    grid
}

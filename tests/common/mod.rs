use gridworld_pi::*;
use std::rc::Rc;

#[allow(dead_code)]
pub fn transpose(s: Discrete, n: Discrete) -> Discrete {
    (s % n) * n + s / n
}

#[allow(dead_code)]
pub fn make_pi(n: Discrete, theta: Continous, discount: Continous) -> PolicyIteration {
    let config = Configuration::new(n, theta, discount).unwrap();
    PolicyIteration::new(
        config,
        Rc::new(GridWorld::new(n).unwrap()),
        TabularPolicy::new([0.25, 0.25, 0.25, 0.25], n).unwrap(),
    )
    .unwrap()
}

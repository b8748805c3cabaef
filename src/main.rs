use clap::Parser;
use gridworld_pi::{
    discounted_return, mc_prediction, ui, Configuration, EpisodeGenerator, GridWorld, Mdp,
    PolicyIteration, PolicyRollout, TabularPolicy, Visit,
};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Policy iteration on a square grid world with absorbing corners.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON file with N, theta and discount.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of rows and columns.
    #[arg(short)]
    n: Option<usize>,

    #[arg(long)]
    theta: Option<f64>,

    #[arg(long)]
    discount: Option<f64>,

    #[arg(long)]
    max_sweeps: Option<usize>,

    /// Cap on evaluation/improvement rounds.
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Only print the final value function and policy.
    #[arg(long, short)]
    quiet: bool,

    /// Roll out the final policy this many times and report Monte Carlo estimates of V.
    #[arg(long, default_value_t = 0)]
    episodes: usize,

    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    /// Layers the flags over `config`, then validates the result.
    fn apply(&self, mut config: Configuration) -> gridworld_pi::Result<Configuration> {
        config.n = self.n.unwrap_or(config.n);
        config.theta = self.theta.unwrap_or(config.theta);
        config.discount = self.discount.unwrap_or(config.discount);
        if self.max_sweeps.is_some() {
            config.max_sweeps = self.max_sweeps;
        }
        if self.max_iterations.is_some() {
            config.max_iterations = self.max_iterations;
        }
        config.validate()?;

        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = args.apply(match &args.config {
        Some(path) => Configuration::from_file(path)?,
        None => Configuration::default(),
    })?;

    let n = config.n;
    let env = Rc::new(GridWorld::new(n)?) as Rc<dyn Mdp>;
    let policy = TabularPolicy::new([0.25, 0.25, 0.25, 0.25], n)?;

    let pi = &mut PolicyIteration::new(config.clone(), env, policy)?;
    let (policy, v) = pi.execute(!args.quiet)?;
    println!(
        "Theta: {}, Discount: {}, Number of iterations: {}",
        config.theta,
        config.discount,
        pi.iterations()
    );
    println!("{}", ui::format_v(&v, n));
    println!("{}", ui::format_policy(policy.rows(), n));

    if args.episodes > 0 {
        let rollout = PolicyRollout {
            policy: &policy,
            n,
            max_steps: 4 * n * n,
        };
        let eps = rollout.generate(args.episodes, args.seed)?;
        let mean = eps
            .iter()
            .map(|ep| discounted_return(ep, config.discount))
            .sum::<f64>()
            / eps.len() as f64;
        println!("Mean discounted return over {} episodes: {mean:.4}", eps.len());

        let v_mc = mc_prediction(
            &rollout,
            config.discount,
            n * n,
            args.episodes,
            args.seed,
            Visit::First,
        )?;
        let gap = v
            .iter()
            .zip(&v_mc)
            .map(|(a, b)| (a - b).abs())
            .fold(0., f64::max);
        info!(gap, "largest gap between evaluated and sampled values");
        println!("Monte Carlo estimate of V:");
        println!("{}", ui::format_v(&v_mc, n));
    }

    Ok(())
}

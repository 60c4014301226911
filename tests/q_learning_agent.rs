//! Q-learning agent end to end

mod common;

use common::{Corridor, Misreporting};
use polebalance::{
    Error,
    discretizer::Discretizer,
    envs::{CartPole, DISCRETIZATION_HIGH, DISCRETIZATION_LOW},
    pipeline::{TrainingConfig, TrainingPipeline},
    q_learning::{Hyperparameters, QLearningAgent},
};

fn corridor() -> Discretizer<Corridor> {
    Discretizer::new(Corridor::new(30), 4).unwrap()
}

#[test]
fn learns_to_walk_the_corridor() {
    let mut env = corridor();
    let mut agent = QLearningAgent::for_environment(&env, Hyperparameters::default())
        .unwrap()
        .with_seed(2024);

    let result = agent.train(&mut env, 500).unwrap();
    assert_eq!(result.episodes(), 500);
    assert_eq!(result.max_reward, 1.0);

    let rewards = agent.evaluate(&mut env, 20).unwrap();
    assert_eq!(rewards, vec![1.0; 20]);

    // greedy policy moves right in every bin on the path
    for state in 1..=4 {
        assert!(agent.q_value(state, 1).unwrap() > agent.q_value(state, 0).unwrap());
    }
    // one step from the goal the value is the goal reward
    assert!((agent.q_value(4, 1).unwrap() - 1.0).abs() < 1e-6);
}

#[test]
fn schedules_follow_their_formulas() {
    let mut env = corridor();
    let params = Hyperparameters {
        alpha: 0.5,
        alpha_decay: 0.9,
        epsilon: 1.0,
        epsilon_final: 0.2,
        ..Default::default()
    };
    let mut agent = QLearningAgent::for_environment(&env, params)
        .unwrap()
        .with_seed(1);

    agent.train(&mut env, 8).unwrap();
    assert!((agent.current_alpha() - 0.5 * 0.9f64.powi(8)).abs() < 1e-12);
    assert!((agent.current_epsilon() - 0.2).abs() < 1e-9);

    // a second run starts its linear drop from the floor and stays there
    agent.train(&mut env, 4).unwrap();
    assert!((agent.current_epsilon() - 0.2).abs() < 1e-9);
}

#[test]
fn evaluation_leaves_agent_untouched() {
    let mut env = corridor();
    let mut agent = QLearningAgent::for_environment(&env, Hyperparameters::default())
        .unwrap()
        .with_seed(5);
    agent.train(&mut env, 50).unwrap();

    let table = agent.q_table().clone();
    let (alpha, epsilon) = (agent.current_alpha(), agent.current_epsilon());
    agent.evaluate(&mut env, 10).unwrap();

    assert_eq!(agent.q_table(), &table);
    assert_eq!(agent.current_alpha(), alpha);
    assert_eq!(agent.current_epsilon(), epsilon);
}

#[test]
fn same_seed_reproduces_training() {
    let run = || {
        let mut env = corridor();
        let mut agent = QLearningAgent::for_environment(&env, Hyperparameters::default())
            .unwrap()
            .with_seed(77);
        let result = agent.train(&mut env, 40).unwrap();
        (result.reward_history, agent.q_table().clone())
    };
    assert_eq!(run(), run());
}

#[test]
fn bad_transition_aborts_training_with_context() {
    let mut env = Misreporting {
        state_count: 3,
        bad_state: 7,
    };
    let mut agent = QLearningAgent::for_environment(&env, Hyperparameters::default())
        .unwrap()
        .with_seed(3);

    match agent.train(&mut env, 5) {
        Err(Error::TransitionOutOfRange { transition, .. }) => {
            assert_eq!(transition.state, 0);
            assert_eq!(transition.next_state, 7);
            assert!(!transition.done);
        }
        other => panic!("expected TransitionOutOfRange, got {other:?}"),
    }
}

#[test]
fn mismatched_environment_rejected() {
    let mut env = corridor();
    let mut agent = QLearningAgent::new(10, 2, Hyperparameters::default()).unwrap();
    assert!(matches!(
        agent.train(&mut env, 1),
        Err(Error::InvalidConfiguration { .. })
    ));
    assert!(agent.evaluate(&mut env, 1).is_err());
}

#[test]
fn cart_pole_training_smoke() {
    let mut env = Discretizer::with_bounds(
        CartPole::new().with_seed(11),
        8,
        Some(DISCRETIZATION_LOW.to_vec()),
        Some(DISCRETIZATION_HIGH.to_vec()),
    )
    .unwrap();
    let mut agent = QLearningAgent::for_environment(&env, Hyperparameters::default()).unwrap();
    let mut pipeline = TrainingPipeline::new(TrainingConfig::new(30).with_seed(11));

    let result = agent.train_with(&mut env, &mut pipeline).unwrap();
    assert_eq!(result.reward_history.len(), 30);
    assert!(result.reward_history.iter().all(|&r| (1.0..=200.0).contains(&r)));
    assert_eq!(
        result.total_steps as f64,
        result.reward_history.iter().sum::<f64>()
    );
    assert_eq!(agent.rng_seed(), Some(11));

    let rewards = agent.evaluate(&mut env, 3).unwrap();
    assert_eq!(rewards.len(), 3);
}

//! Tests for the training pipeline and its observers

mod common;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    sync::{Arc, Mutex},
};

use common::Corridor;
use polebalance::{
    discretizer::Discretizer,
    pipeline::{
        CallbackObserver, EpisodeReport, JsonlObserver, MetricsObserver, RandomLearner,
        TrainingConfig, TrainingPipeline, TrainingResult,
    },
    ports::Observer,
    q_learning::{Hyperparameters, QLearningAgent},
    types::Transition,
};
use tempfile::tempdir;

fn corridor() -> Discretizer<Corridor> {
    Discretizer::new(Corridor::new(30), 4).unwrap()
}

/// Records the order of observer events.
struct EventLog(Arc<Mutex<Vec<String>>>);

impl Observer for EventLog {
    fn on_training_start(&mut self, total_episodes: usize) -> polebalance::Result<()> {
        self.0.lock().unwrap().push(format!("start {total_episodes}"));
        Ok(())
    }

    fn on_episode_start(&mut self, episode: usize) -> polebalance::Result<()> {
        self.0.lock().unwrap().push(format!("episode {episode}"));
        Ok(())
    }

    fn on_step(
        &mut self,
        _episode: usize,
        step: usize,
        transition: &Transition,
    ) -> polebalance::Result<()> {
        self.0
            .lock()
            .unwrap()
            .push(format!("step {step} done={}", transition.done));
        Ok(())
    }

    fn on_episode_end(&mut self, report: &EpisodeReport) -> polebalance::Result<()> {
        self.0.lock().unwrap().push(format!("end {}", report.episode));
        Ok(())
    }

    fn on_report(&mut self, report: &EpisodeReport) -> polebalance::Result<()> {
        self.0.lock().unwrap().push(format!("report {}", report.episode));
        Ok(())
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> polebalance::Result<()> {
        self.0
            .lock()
            .unwrap()
            .push(format!("finish {}", result.episodes()));
        Ok(())
    }
}

#[test]
fn observer_events_arrive_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut pipeline = TrainingPipeline::new(TrainingConfig::new(2).with_report_every(1))
        .with_observer(Box::new(EventLog(Arc::clone(&log))));

    // always-right learner reaches the goal in four steps
    let mut env = corridor();
    let mut agent = QLearningAgent::for_environment(
        &env,
        Hyperparameters {
            epsilon: 0.0,
            epsilon_final: 0.0,
            ..Default::default()
        },
    )
    .unwrap()
    .with_seed(1);
    for state in 0..6 {
        agent
            .update(&Transition::new(state, 1, state, 1.0, true))
            .unwrap();
    }

    pipeline.run(&mut agent, &mut env).unwrap();

    let events = log.lock().unwrap().clone();
    let expected = [
        "start 2",
        "episode 0",
        "step 0 done=false",
        "step 1 done=false",
        "step 2 done=false",
        "step 3 done=true",
        "end 0",
        "report 0",
        "episode 1",
        "step 0 done=false",
        "step 1 done=false",
        "step 2 done=false",
        "step 3 done=true",
        "end 1",
        "report 1",
        "finish 2",
    ];
    assert_eq!(events, expected);
}

#[test]
fn periodic_reports_carry_running_statistics() {
    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reports);
    let mut pipeline = TrainingPipeline::new(TrainingConfig::new(25).with_report_every(10))
        .with_observer(Box::new(CallbackObserver::new(move |r: &EpisodeReport| {
            sink.lock().unwrap().push(r.clone());
        })));

    let mut env = corridor();
    let mut agent = QLearningAgent::for_environment(&env, Hyperparameters::default())
        .unwrap()
        .with_seed(8);
    let result = agent.train_with(&mut env, &mut pipeline).unwrap();

    let reports = reports.lock().unwrap();
    assert_eq!(
        reports.iter().map(|r| r.episode).collect::<Vec<_>>(),
        vec![0, 10, 20]
    );

    let last = &reports[2];
    let history = &result.reward_history[..=20];
    assert_eq!(last.recent_rewards, history[16..].to_vec());
    assert_eq!(last.reward, history[20]);
    let recent_mean = history[11..].iter().sum::<f64>() / 10.0;
    assert!((last.recent_mean - recent_mean).abs() < 1e-12);
    assert_eq!(
        last.best_reward,
        history.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    );
    assert!((last.average_reward - result.reward_averaged[20]).abs() < 1e-12);
    assert!(last.alpha.is_some());
    assert!(last.epsilon.unwrap() < 1.0);
}

#[test]
fn jsonl_observer_logs_every_episode() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("episodes.jsonl");

    let mut pipeline = TrainingPipeline::new(TrainingConfig::new(6).with_seed(3))
        .with_observer(Box::new(JsonlObserver::new(&path).unwrap()));
    let mut learner = RandomLearner::new("Random", 2);
    let result = pipeline.run(&mut learner, &mut corridor()).unwrap();

    let lines: Vec<serde_json::Value> = BufReader::new(File::open(&path).unwrap())
        .lines()
        .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
        .collect();
    assert_eq!(lines.len(), 6);
    for (episode, line) in lines.iter().enumerate() {
        assert_eq!(line["episode"], episode);
        assert_eq!(line["reward"], result.reward_history[episode]);
    }
}

#[test]
fn random_baseline_trails_trained_agent() {
    let mut env = corridor();
    let mut baseline = RandomLearner::with_seed("Random", 2, 4);
    let mut pipeline = TrainingPipeline::new(TrainingConfig::new(200));
    let random_result = pipeline.run(&mut baseline, &mut env).unwrap();

    let mut agent = QLearningAgent::for_environment(&env, Hyperparameters::default())
        .unwrap()
        .with_seed(4);
    agent.train(&mut env, 300).unwrap();
    let trained = agent.evaluate(&mut env, 20).unwrap();
    let trained_mean = trained.iter().sum::<f64>() / trained.len() as f64;

    assert!(trained_mean >= random_result.mean_reward);
    assert_eq!(random_result.learner, "Random");
}

#[test]
fn metrics_observer_counts_steps() {
    let mut observer = MetricsObserver::new();
    observer.on_training_start(1).unwrap();
    observer.on_episode_start(0).unwrap();
    let t = Transition::new(1, 1, 2, 0.0, false);
    observer.on_step(0, 0, &t).unwrap();
    observer.on_step(0, 1, &t).unwrap();
    observer
        .on_episode_end(&EpisodeReport {
            episode: 0,
            steps: 2,
            reward: 0.0,
            total_steps: 2,
            best_reward: 0.0,
            recent_mean: 0.0,
            recent_rewards: vec![0.0],
            average_reward: 0.0,
            alpha: None,
            epsilon: None,
        })
        .unwrap();
    assert_eq!(observer.summary().total_steps, 2);
    assert_eq!(observer.summary().best_reward, Some(0.0));
}

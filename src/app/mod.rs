//! Application layer with dependency injection container.
//!
//! The container owns run-wide defaults (the fallback seed) and provides
//! factory methods for the domain objects of a run, following hexagonal
//! architecture principles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           Application Layer (app)           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │   App (DI Container) + RunConfig     │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ builds                     │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Adapters                            │   │
//! │  │  - CartPole simulator                │   │
//! │  │  - Discretizer                       │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ implements                 │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Ports (ports)                │   │
//! │  │  - Environment / Learner / Observer  │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ used by                    │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Logic                        │   │
//! │  │  - QLearningAgent                    │   │
//! │  │  - TrainingPipeline                  │   │
//! │  └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use polebalance::app::{App, RunConfig};
//!
//! let app = App::new();
//! let config = RunConfig::load("run.json")?;
//! let mut env = app.create_environment(&config)?;
//! let mut agent = app.create_agent(&config.agent, &env)?;
//! let mut pipeline = app.create_pipeline(&config);
//! let result = agent.train_with(&mut env, &mut pipeline)?;
//! let rewards = agent.evaluate(&mut env, config.eval_episodes)?;
//! # Ok::<(), polebalance::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::{AgentConfig, DiscretizerConfig, RunConfig};
pub use container::{App, AppBuilder, DiscreteCartPole};

//! Инфраструктурный слой вокруг покерного движка:
//! - RNG-реализации для движка;
//! - конфигурация и логирование;
//! - запись истории раздач;
//! - время.

pub mod clock;
pub mod config;
pub mod persistence;
pub mod rng;
pub mod telemetry;

pub use clock::now_ts;
pub use config::{ConfigError, EngineConfig};
pub use persistence::{FileHandLog, HandLogSink, MemoryHandLog, PersistenceError};
pub use rng::{DeterministicRng, SystemRng};
pub use telemetry::init_tracing;

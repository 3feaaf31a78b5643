//! Внешний API стола: входящие действия, снапшоты, ошибки для клиента.
//!
//! - commands.rs – разбор и диспетчеризация действий с транспорта;
//! - queries.rs – снапшот стола для конкретного зрителя;
//! - dto.rs – структуры снапшота;
//! - errors.rs – то, что видит клиент.

pub mod commands;
pub mod dto;
pub mod errors;
pub mod queries;

pub use commands::*;
pub use dto::*;
pub use errors::*;
pub use queries::*;

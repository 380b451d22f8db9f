mod base;
mod engine;
mod provider;
mod session;

pub use base::{Metadata, Table};
pub use engine::{Engine, EngineOptions, create_engine, is_in_memory};
pub use provider::DbProvider;
pub use session::{Session, SessionFactory, SessionProbe};

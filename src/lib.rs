pub mod automation;
pub mod channel;
pub mod config;
pub mod context;
pub mod engine;
pub mod knowledge;
pub mod memory;
pub mod nlp;
pub mod profile;
pub mod respond;
pub mod telemetry;
pub mod types;

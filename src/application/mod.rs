// Application layer - engine, polling, and control use cases
pub mod chart_engine;
pub mod connection;
pub mod poller;
pub mod snapshot_source;

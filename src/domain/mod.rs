// Domain layer - chart math and typed models
pub mod axis;
pub mod chart;
pub mod priority;
pub mod snapshot;

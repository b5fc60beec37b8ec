// Presentation layer - HTTP surface for the page renderer
pub mod app_state;
pub mod handlers;

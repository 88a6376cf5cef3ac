//! Personal workout tracker: drop running and cycling workouts on a map,
//! list them, and keep them in a local key-value store between sessions.

pub mod app;
pub mod cli;
pub mod form;
pub mod map;
pub mod render;
pub mod storage;
pub mod terminal;
pub mod types;
pub mod ui;
pub mod utils;

// App module for rider-dash
// Holds the dashboard state and maps keys onto it

pub mod input;
pub mod state;

pub use input::{action_for, perform, Action};
pub use state::App;

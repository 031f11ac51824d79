// App module for sighting-globe
// Holds interactive state on top of the timeline engine

pub mod actions;
pub mod input;
pub mod state;

pub use actions::{AppActions, LoadMessage};
pub use input::handle_input;
pub use state::{App, AppScreen, DataOrigin, InputState};

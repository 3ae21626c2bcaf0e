use druid::Data;

/// Application state
#[derive(Clone, Data)]
pub struct AppState {
    /// Show the debug overlay
    pub debug: bool,
    /// Simulation paused
    pub paused: bool,
    /// Number of bodies in the simulation, mirrored for the overlay
    pub body_count: usize,
}

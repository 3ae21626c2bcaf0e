pub mod body;
pub mod config;
pub mod graphics;
pub mod math;
pub mod pointer;
pub mod simulation;

#[cfg(feature = "gui")]
pub mod state;
#[cfg(feature = "gui")]
pub mod widget;

pub use body::Body;
pub use config::{SimConfig, SpawnConfig, World};
pub use graphics::{Canvas, PixelCanvas};
pub use math::Rgb;
pub use pointer::{DragState, PointerButton, PointerEvent, PointerEventKind, PointerTracker};
pub use simulation::Simulation;

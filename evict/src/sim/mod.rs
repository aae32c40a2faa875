pub mod cache;
pub mod shared;
pub mod simulator;
pub mod trace;

pub use cache::SimulatedCache;
pub use shared::SharedCache;
pub use simulator::{miss_ratio_reduction, SimulationReport, Simulator};
pub use trace::Trace;

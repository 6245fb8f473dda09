//! Polaron Runtime Prelude — convenient imports for common usage.
//!
//! ```rust
//! use polaron_runtime::prelude::*;
//! ```

pub use crate::metrics::{self, TransportMetrics};
pub use crate::report::{MemorySink, NullSink, ReportOptions, ReportSink};
pub use crate::simulation::{Simulation, SimulationEvent, SimulationStats};

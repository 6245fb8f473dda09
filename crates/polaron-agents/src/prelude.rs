//! Polaron Agents Prelude — convenient imports for common usage.
//!
//! ```rust
//! use polaron_agents::prelude::*;
//! ```

pub use crate::carrier::CarrierAgent;
pub use crate::drain::DrainAgent;
pub use crate::source::SourceAgent;
pub use crate::view::WorldView;

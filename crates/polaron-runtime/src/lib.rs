//! # Polaron Runtime
//!
//! The simulation controller and its collaborators. The runtime owns
//! the lattice, the potential field, the random stream, and the live
//! carrier set, and drives discrete ticks:
//!
//! 1. **Propose** — every live carrier evaluates a candidate hop in
//!    parallel against a read-only view of the committed state
//! 2. **Resolve/Commit** — proposals are applied sequentially in
//!    ascending carrier-id order under exclusive lattice access
//! 3. **Inject** — the source attempts to introduce new carriers
//! 4. **Collect** — absorption records and events are emitted
//!
//! Reporting goes through the [`report::ReportSink`] contract; the
//! runtime produces values and never touches a filesystem path.

pub mod metrics;
pub mod report;
pub mod simulation;
pub mod prelude;

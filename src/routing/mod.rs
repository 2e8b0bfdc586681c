//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (method, path, :id)
//!     → http handler names its Operation
//!     → table.rs (RouteTable::binding)
//!     → RouteBinding (upstream method, URL template, payload)
//!     → upstream client
//! ```
//!
//! # Design Decisions
//! - Routes are static; the table is built once and never mutated
//! - The table owns upstream URL construction so handlers stay thin

pub mod table;

pub use table::{Operation, RouteBinding, RouteTable, RoutingError, Segment};

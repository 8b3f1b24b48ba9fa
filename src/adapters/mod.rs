//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements   | Connects to                 |
//! |------------|--------------|-----------------------------|
//! | `log_sink` | EventSink    | `log` facade                |
//! | `replay`   | PollSource   | JSON-lines poll recordings  |
//!
//! The physical output driver lives in [`crate::drivers::outputs`].

pub mod log_sink;
pub mod replay;

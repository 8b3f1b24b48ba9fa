//! Hardware drivers.
//!
//! Only the output side lives here; sensor acquisition and switch
//! debouncing belong to the board support layer that feeds
//! [`PollSource`](crate::app::ports::PollSource).

pub mod outputs;

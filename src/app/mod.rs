//! Application core: the device poll loop around the controller.
//!
//! [`service::AppService`] pulls one poll from a [`ports::PollSource`],
//! runs the [`ValveController`](crate::fsm::ValveController), pushes the
//! resulting outputs to an [`ports::ActuatorPort`] and reports what
//! happened as [`events::AppEvent`]s.  All I/O goes through the port
//! traits, so the whole loop runs on the host against mocks.

pub mod events;
pub mod ports;
pub mod service;

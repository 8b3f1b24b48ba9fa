//! Sensor-side signal conditioning.
//!
//! Raw acquisition and unit conversion live in the sensor driver; by the
//! time a reading reaches this crate it is a signed milli-psi value.  This
//! module only derives the rate-of-change signal the controller consumes.

pub mod pressure;

pub use pressure::PressureRateEstimator;

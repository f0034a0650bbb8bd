//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter        | Implements     | Connects to                 |
//! |----------------|----------------|-----------------------------|
//! | `pin_solenoid` | SolenoidPort   | embedded-hal output pins    |
//! | `time`         | Clock          | `std::time::Instant`        |
//! | `log_sink`     | TelemetrySink  | `log` facade, debug level   |
//!
//! Motor controllers, the drive base and the cargo arm are vendor
//! devices; their adapters live with the host runtime.

pub mod log_sink;
pub mod pin_solenoid;
pub mod time;

//! dnsprobe application layer: ports, probe engine services and use cases.
pub mod ports;
pub mod services;
pub mod use_cases;

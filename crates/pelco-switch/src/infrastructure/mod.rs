//! Infrastructure layer for the switch.
//!
//! Contains OS-facing adapters: serial ports, the HTTP control surface and
//! file-system configuration.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `pelco_core`, but MUST NOT be imported by the `application` layer.

pub mod http;
pub mod serial;
pub mod storage;

//! Application layer use cases for the switch.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the protocol
//! types in `pelco-core` and the infrastructure (serial ports, HTTP, files).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** protocol objects to fulfil an operator goal (e.g.,
//!   "send every joystick frame to the camera currently on air").
//! - **Depend on abstractions** (the [`route_frames::FrameSink`] trait)
//!   rather than on serial ports, so tests can substitute in-memory sinks.
//! - **Contain no OS calls and no file system access**.
//!
//! # Sub-modules
//!
//! - **`manage_targets`** – The route table: configured cameras, the current
//!   target and the current mode.
//!
//! - **`route_frames`** – Writes a frame to one named target, to the current
//!   target, or to every target.
//!
//! - **`ingest_joystick`** – Reads the joystick stream, extracts frames and
//!   forwards each one to the current target.  Runs for the lifetime of the
//!   process.

pub mod ingest_joystick;
pub mod manage_targets;
pub mod route_frames;

//! Registrar library modules.
//!
//! Course enrollment decisions and academic standing, arranged as a
//! hexagon: [`domain`] holds the rules and ports, [`outbound`] the adapters
//! the domain drives, and [`inbound`] the command-line surface.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

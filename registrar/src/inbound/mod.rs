//! Inbound adapters that translate external requests into driving port
//! calls while keeping framework details at the edge.
//!
//! The command-line surface lives under [`cli`].

pub mod cli;

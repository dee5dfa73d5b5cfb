//! Networking modules for the hosted backend and the upload proxy.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` is the shared browser transport, `rpc` wraps the team procedures,
//! `upload` talks to the server's upload proxy, and `types` defines the
//! boundary DTOs.

pub mod http;
pub mod rpc;
pub mod types;
pub mod upload;

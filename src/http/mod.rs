//! HTTP server module.
//!
//! This module binds the listener with the configured accept backlog and
//! serves the router until SIGTERM/SIGINT, draining in-flight requests on the
//! way out.

mod server;
mod shutdown;

pub use server::{bind_listener, start_server};

// Gateway module for connection - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod builder;
mod client;
mod gateway;
mod tokens;

// Public re-exports - the ONLY way to access connection functionality
pub use builder::{connection_from_config, create_connection, ConnectionBuilder};
pub use client::Connection;
pub use gateway::{resolve_gateway_url, Environment};

/// Environment of the gateway a connection talks to
pub fn current_env(connection: &Connection) -> Environment {
    connection.environment()
}

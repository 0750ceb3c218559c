mod relay_server;
mod server_config;

pub use relay_server::RelayServer;
pub use server_config::RelayConfig;

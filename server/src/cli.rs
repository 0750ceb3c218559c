use std::path::PathBuf;

use clap::Parser;

use crate::server::RelayConfig;

/// Main control software for the motorized turret.
#[derive(Parser, Debug)]
#[command(name = "turret-server", version, about)]
pub struct Cli {
    /// Runs the scripted command test sequence instead of serving
    #[arg(short = 't', long = "test-mode")]
    pub test_mode: bool,

    /// The name of the serial port to connect to the turret on
    #[arg(short = 's', long = "serial-port")]
    pub serial_port: Option<String>,

    /// Runs without creating a serial connection
    #[arg(short = 'n', long = "no-turret")]
    pub no_turret: bool,

    /// The port the command listener will listen on
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Path to the TOML config file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded config.
    pub fn apply_to(&self, config: &mut RelayConfig) {
        if let Some(serial_port) = &self.serial_port {
            config.serial_port = serial_port.clone();
        }
        if self.no_turret {
            config.no_turret = true;
        }
        if let Some(port) = self.port {
            config.listen_port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_only_when_given() {
        let cli = Cli::parse_from(["turret-server", "-n", "-p", "9002"]);
        let mut config = RelayConfig::default();
        cli.apply_to(&mut config);
        assert!(config.no_turret);
        assert_eq!(config.listen_port, 9002);
        assert_eq!(config.serial_port, "/dev/ttyUSB0");
    }

    #[test]
    fn no_flags_leaves_config_untouched() {
        let cli = Cli::parse_from(["turret-server"]);
        let mut config = RelayConfig::default();
        cli.apply_to(&mut config);
        assert!(!config.no_turret);
        assert_eq!(config.listen_port, 9001);
    }
}

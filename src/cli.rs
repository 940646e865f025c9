use clap::Parser;

use crate::config::Overrides;

/// Development web server for the localstore browser app
#[derive(Debug, Parser)]
#[command(name = "localstore-web", version, about)]
pub struct Cli {
    /// Config file path without extension (config.toml is optional)
    #[arg(short, long, env = "APP_CONFIG", default_value = "config")]
    pub config: String,

    /// Listen port, overrides `server.port`
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Listen address, overrides `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Disable debug mode (template auto-reload, detailed error pages)
    #[arg(long)]
    pub no_debug: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            no_debug: self.no_debug,
        }
    }
}

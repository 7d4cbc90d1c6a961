//! Entry point for the **aerospace-ipc** command.
//!
//! Connects to the AeroSpace daemon and prints every window, one per line.
//!
//! ```text
//! aerospace-ipc [--socket <path>] [--validate-version]
//! ```
//!
//! Settings come from `$XDG_CONFIG_HOME/aerospace-ipc/config.json` (or
//! `~/.config/aerospace-ipc/config.json`) when it exists; command-line
//! flags override them.  Set `RUST_LOG=debug` to see
//! the traffic.

use aerospace_ipc::config::{self, ClientConfig};
use aerospace_ipc::Client;
use log::{debug, error, info, warn};
use std::path::PathBuf;

/// Read the config file if there is one.
///
/// A missing file is normal; an unreadable or malformed one is reported
/// and skipped.  Either way the command-line flags are applied afterwards.
fn load_config() -> ClientConfig {
    let Some(path) = config::config_file_path() else {
        debug!("neither XDG_CONFIG_HOME nor HOME is set, relying on --socket / --validate-version");
        return ClientConfig::default();
    };
    if !path.exists() {
        debug!("no config file at {}, relying on --socket / --validate-version", path.display());
        return ClientConfig::default();
    }
    match ClientConfig::load(&path) {
        Ok(cfg) => {
            info!("loaded {} (--socket and --validate-version take precedence)", path.display());
            cfg
        }
        Err(e) => {
            warn!("ignoring config file: {}", e);
            ClientConfig::default()
        }
    }
}

/// Apply command-line flags on top of `config`.
fn apply_args(mut config: ClientConfig, args: impl IntoIterator<Item = String>) -> ClientConfig {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--socket" => match args.next() {
                Some(path) => config.socket_path = Some(PathBuf::from(path)),
                None => warn!("--socket needs a path, ignoring"),
            },
            "--validate-version" => config.validate_version = true,
            other => warn!("unknown argument {:?}, ignoring", other),
        }
    }
    config
}

fn main() {
    env_logger::init();

    let config = apply_args(load_config(), std::env::args().skip(1));

    let client = match Client::from_config(&config) {
        Ok(client) => client,
        Err(e) if e.is_version_mismatch() => {
            warn!("{}", e);
            match e.into_connection() {
                Some(conn) => Client::from_connection(conn),
                None => std::process::exit(1),
            }
        }
        Err(e) => {
            error!("failed to connect: {}", e);
            std::process::exit(1);
        }
    };

    match client.windows().get_all_windows() {
        Ok(windows) => {
            for window in windows {
                println!("{}", window);
            }
        }
        Err(e) => {
            error!("failed to list windows: {}", e);
            let _ = client.close();
            std::process::exit(1);
        }
    }

    if let Err(e) = client.close() {
        error!("{}", e);
    }
}

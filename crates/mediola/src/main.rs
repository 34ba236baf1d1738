mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use mediola_config::{self as config, Profile};
use mediola_core::GatewayConfig;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a gateway
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "mediola", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let gateway = build_gateway_config(&cli.global)?;
            tracing::debug!(command = ?cmd, host = %gateway.host, "dispatching command");
            commands::dispatch(cmd, gateway, &cli.global).await
        }
    }
}

/// Build a `GatewayConfig` from the config file, profile, and CLI overrides.
///
/// Without a matching profile, `--host` (plus credentials from flags or the
/// environment) is enough to run.
fn build_gateway_config(global: &GlobalOpts) -> Result<GatewayConfig, CliError> {
    let cfg = config::load_config()?;
    let profile_name = cfg.active_profile_name(global.profile.as_deref());

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(config::ConfigError::ProfileNotFound { name: profile_name }.into());
        }
        None => {
            let host = global.host.clone().ok_or_else(|| CliError::NoConfig {
                path: config::config_path().display().to_string(),
            })?;
            Profile {
                host,
                ..Profile::default()
            }
        }
    };

    apply_overrides(&mut profile, global);

    let mut gateway = config::profile_to_gateway_config(&profile, &profile_name, &cfg.defaults)?;
    // The explicit flag beats anything the credential chain found.
    if let Some(ref password) = global.password {
        gateway.password = SecretString::from(password.clone());
    }
    Ok(gateway)
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if let Some(ref password) = global.password {
        profile.password = Some(password.clone());
    }
    if let Some(secs) = global.interval {
        profile.scan_interval = Some(secs);
    }
    if let Some(secs) = global.timeout {
        profile.timeout = Some(secs);
    }
}

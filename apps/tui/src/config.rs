use std::env;
use std::fs::File;
use std::sync::Mutex;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use dotenv::dotenv;
use parajes_core::{DashboardConfig, Region};
use tracing_subscriber::EnvFilter;

use crate::cli::CliArgs;

pub const API_URL_VAR: &str = "PARAJES_API_URL";
pub const LOG_VAR: &str = "PARAJES_LOG";
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
/// Interactive sessions log here; stderr belongs to the alternate screen.
pub const LOG_FILE: &str = "parajes.log";

/// Builds the dashboard configuration from `.env`, the environment and the
/// command line, in increasing order of precedence.
pub fn init_app_config(args: &CliArgs) -> DashboardConfig {
    dotenv().ok();
    let base = api_base(args.api.as_deref(), env::var(API_URL_VAR).ok());
    DashboardConfig::default().with_api_base(base)
}

fn api_base(flag: Option<&str>, env_value: Option<String>) -> String {
    flag.map(str::to_string)
        .or(env_value)
        .filter(|base| !base.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Region the session starts in.
pub fn initial_region(args: &CliArgs) -> Region {
    Region::parse(args.depto.as_deref().unwrap_or_default().trim())
}

/// Filter directive for the log subscriber, `None` when logging is off.
pub fn log_filter(debug: bool, env_value: Option<String>) -> Option<String> {
    if debug {
        return Some("debug".to_string());
    }
    env_value.filter(|value| !value.trim().is_empty())
}

/// Installs the tracing subscriber. Headless runs log to stderr, the
/// interactive console to [`LOG_FILE`].
pub fn init_logging(debug: bool, headless: bool) -> Result<()> {
    let Some(filter) = log_filter(debug, env::var(LOG_VAR).ok()) else {
        return Ok(());
    };
    let filter = EnvFilter::try_new(filter)?;

    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| eyre!("logging already initialised: {err}"))?;
    } else {
        let file = File::create(LOG_FILE)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .map_err(|err| eyre!("logging already initialised: {err}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_environment_beats_default() {
        assert_eq!(
            api_base(Some("http://flag"), Some("http://env".into())),
            "http://flag"
        );
        assert_eq!(api_base(None, Some("http://env".into())), "http://env");
        assert_eq!(api_base(None, Some("  ".into())), DEFAULT_API_URL);
        assert_eq!(api_base(None, None), DEFAULT_API_URL);
    }

    #[test]
    fn debug_flag_forces_debug_logging() {
        assert_eq!(log_filter(true, None).as_deref(), Some("debug"));
        assert_eq!(
            log_filter(false, Some("parajes_core=info".into())).as_deref(),
            Some("parajes_core=info")
        );
        assert_eq!(log_filter(false, Some(String::new())), None);
        assert_eq!(log_filter(false, None), None);
    }

    #[test]
    fn initial_region_defaults_to_all() {
        assert_eq!(initial_region(&CliArgs::default()), Region::All);

        let args = CliArgs {
            depto: Some(" Libertador General San Martín ".into()),
            ..CliArgs::default()
        };
        assert_eq!(
            initial_region(&args),
            Region::Named("Libertador General San Martín".into())
        );
    }
}

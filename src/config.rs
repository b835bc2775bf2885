// Configuration: command-line flags with environment fallbacks. The
// `URL` and `PORT` variables mirror what the server's own tooling uses, so
// `PORT=3000 simpleql` keeps working without any flag.

use std::path::PathBuf;

use clap::Parser;
use env_logger::{Builder, Env};
use reqwest::Url;

use crate::error::CliError;

pub const DEFAULT_URL: &str = "http://localhost";
pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_KEY_PATH: &str = "privateKey.pem";

/// Interactive client for a SimpleQL API.
///
/// Without COMMAND an interactive prompt is started. With COMMAND (for
/// example `login "{User: {login: 'test', password: 'test'}}"`) that single
/// command runs and the program exits.
#[derive(Parser, Debug, Clone)]
#[command(name = "simpleql")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Base scheme, host and optional path of the API
    #[arg(long, env = "URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Port the API listens on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Private key used by the `admin` command
    #[arg(long, env = "ADMIN_KEY", default_value = DEFAULT_KEY_PATH)]
    pub key: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Run a single command instead of the prompt
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            url: DEFAULT_URL.into(),
            port: DEFAULT_PORT,
            key: PathBuf::from(DEFAULT_KEY_PATH),
            verbose: false,
            command: Vec::new(),
        }
    }
}

impl Config {
    /// Resolve the final endpoint: `{scheme}://{host}:{port}{path}`.
    ///
    /// The port always comes from `port`, even when `url` carries one.
    pub fn endpoint(&self) -> Result<String, CliError> {
        let parsed = Url::parse(&self.url)
            .map_err(|e| CliError::Config(format!("URL `{}`: {}", self.url, e)))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| CliError::Config(format!("URL `{}` has no host", self.url)))?;
        Ok(format!(
            "{}://{}:{}{}",
            parsed.scheme(),
            host,
            self.port,
            parsed.path()
        ))
    }

    /// Default log filter: `debug` with `--verbose`, `warn` otherwise.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    /// Logger for the process. `RUST_LOG` still wins over `--verbose`.
    pub fn log_builder(&self) -> Builder {
        self.log_builder_from(Env::default())
    }

    fn log_builder_from(&self, env: Env<'_>) -> Builder {
        let mut builder = Builder::from_env(env.default_filter_or(self.log_filter()));
        builder.format_timestamp(None);
        builder
    }

    /// The one-shot command line, if any was given after the flags.
    pub fn one_shot(&self) -> Option<String> {
        if self.command.is_empty() {
            None
        } else {
            Some(self.command.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_is_localhost_port_80() {
        let cfg = Config::default();
        assert_eq!(cfg.endpoint().unwrap(), "http://localhost:80/");
    }

    #[test]
    fn endpoint_keeps_path_and_uses_port() {
        let cfg = Config {
            url: "https://api.example.com/v1".into(),
            port: 8443,
            ..Config::default()
        };
        assert_eq!(cfg.endpoint().unwrap(), "https://api.example.com:8443/v1");
    }

    #[test]
    fn port_flag_overrides_port_in_url() {
        let cfg = Config {
            url: "http://127.0.0.1:9999/api".into(),
            port: 3000,
            ..Config::default()
        };
        assert_eq!(cfg.endpoint().unwrap(), "http://127.0.0.1:3000/api");
    }

    #[test]
    fn invalid_url_is_config_error() {
        let cfg = Config {
            url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(cfg.endpoint(), Err(CliError::Config(_))));
    }

    #[test]
    fn verbose_raises_logger_to_debug() {
        let env = || Env::new().filter("SIMPLEQL_TEST_UNSET_LOG");
        let quiet = Config::default();
        assert_eq!(quiet.log_builder_from(env()).build().filter(), log::LevelFilter::Warn);

        let verbose = Config {
            verbose: true,
            ..Config::default()
        };
        assert_eq!(verbose.log_builder_from(env()).build().filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn trailing_args_form_one_shot_command() {
        let cfg = Config::parse_from(["simpleql", "--port", "3000", "req", "{a: 1}"]);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.one_shot().as_deref(), Some("req {a: 1}"));
    }
}

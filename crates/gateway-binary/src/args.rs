use std::{fs, net::SocketAddr, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use gateway_config::Config;
use tracing::Subscriber;
use tracing_subscriber::{registry::LookupSpan, Layer};
use url::Url;

mod log;

pub(crate) use log::{LogLevel, LogStyle};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

#[derive(Debug, Parser)]
#[command(name = "REST bridge gateway", version)]
/// GraphQL gateway in front of a REST API
pub(crate) struct Args {
    /// IP address on which the server will listen for incoming connections. Defaults to 127.0.0.1:5000.
    #[arg(short, long)]
    pub listen_address: Option<SocketAddr>,
    /// Path to the TOML configuration file. Every setting has a default when not given.
    #[arg(long, short, env = "GATEWAY_CONFIG_PATH")]
    pub config: Option<PathBuf>,
    /// Base url of the upstream REST API. Overrides `upstream.url` from the configuration.
    #[arg(long, short, env = "GATEWAY_UPSTREAM_URL")]
    pub upstream_url: Option<Url>,
    /// Set the logging level
    #[arg(long = "log", env = "GATEWAY_LOG")]
    pub log_level: Option<LogLevel>,
    /// Set the style of log output
    #[arg(long, env = "GATEWAY_LOG_STYLE", default_value_t = LogStyle::Text)]
    pub log_style: LogStyle,
}

impl Args {
    /// The configuration file, with the command line overrides applied.
    pub fn config(&self) -> anyhow::Result<Config> {
        let mut config: Config = match self.config {
            Some(ref path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("reading configuration from {}", path.display()))?;

                toml::from_str(&content).with_context(|| format!("parsing configuration {}", path.display()))?
            }
            None => Config::default(),
        };

        if let Some(ref url) = self.upstream_url {
            config.upstream.url = Some(url.clone());
        }

        if config.upstream.url.is_none() {
            anyhow::bail!("the upstream url must be set with --upstream-url or `upstream.url` in the configuration");
        }

        Ok(config)
    }

    pub fn log_format<S>(&self) -> BoxedLayer<S>
    where
        S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync,
    {
        let layer = tracing_subscriber::fmt::layer();

        match self.log_style {
            // for interactive terminals we provide colored output
            LogStyle::Text if atty::is(atty::Stream::Stdout) => layer.with_ansi(true).boxed(),
            // for server logs, colors are off
            LogStyle::Text => layer.with_ansi(false).boxed(),
            LogStyle::Json => layer.json().boxed(),
        }
    }
}

pub(crate) fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_url_flag_overrides_the_file_default() {
        let args = Args::parse_from(["rest-bridge-gateway", "--upstream-url", "https://portal.example.com/api/"]);
        let config = args.config().unwrap();

        assert_eq!(
            Some("https://portal.example.com/api/"),
            config.upstream.url.as_ref().map(Url::as_str)
        );
        assert_eq!(None, args.log_level);
        assert_eq!(LogStyle::Text, args.log_style);
    }

    #[test]
    fn missing_upstream_url_is_an_error() {
        let args = Args::parse_from(["rest-bridge-gateway"]);

        assert!(args.config().is_err());
    }

    #[test]
    fn log_flags() {
        let args = Args::parse_from(["rest-bridge-gateway", "--log", "debug", "--log-style", "json"]);

        assert_eq!(Some(LogLevel::Debug), args.log_level);
        assert_eq!(LogStyle::Json, args.log_style);
    }
}

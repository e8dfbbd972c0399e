//! dashgate entry point.

use {
    clap::{Parser, Subcommand},
    dashgate::{Config, FluentRouter, Result, SessionIssuer},
    std::time::Duration,
};

/// Session-gated dashboard server
#[derive(Debug, Parser)]
#[command(name = "dashgate", version, about, long_about = None)]
struct Cli {
    /// Configuration profile, read from `config/{env}.toml`. Defaults to `RUST_ENV`.
    #[arg(short, long)]
    env: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the gated server (default)
    Serve,
    /// Sign a session token with the configured secret and print it
    IssueToken {
        /// Subject (caller id)
        #[arg(long)]
        sub: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Lifetime such as `1h` or `30days`; defaults to `auth.token_ttl`
        #[arg(long, value_parser = humantime::parse_duration)]
        ttl: Option<Duration>,
    },
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let config = match &self.env {
            Some(env) => Config::from_toml_file(env)?,
            None => Config::from_rust_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    async fn execute(self) -> Result<()> {
        let config = self.load_config()?;

        match self.command.unwrap_or(Command::Serve) {
            Command::Serve => {
                config.setup_tracing();
                FluentRouter::without_state(config)?
                    .setup_pages()
                    .setup_mock_integrations()
                    .setup_middleware()
                    .await?
                    .start()
                    .await
            }
            Command::IssueToken {
                sub,
                name,
                email,
                ttl,
            } => {
                let mut issuer = SessionIssuer::new(&config.auth)?;
                if let Some(ttl) = ttl {
                    issuer = issuer.with_ttl(ttl);
                }
                println!("{}", issuer.issue(&sub, name, email)?);
                Ok(())
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.execute().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

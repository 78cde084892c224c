use clap::{Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "todo",
    version,
    about = "Serverless to-do: run the bearer-token authorizer and inspect client config"
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Authorize a token-authorizer event and print the policy decision
    Authorize(AuthorizeArgs),
    /// Print the frontend client configuration as JSON
    ClientConfig(ClientConfigArgs),
}

/// Flags override the `TODO_AUTH_*` environment.
#[derive(Parser, Debug)]
pub struct AuthorizeArgs {
    /// Gateway event JSON file ("-" for stdin)
    #[arg(long, conflicts_with = "header")]
    pub event: Option<PathBuf>,

    /// Raw Authorization header value, instead of an event
    #[arg(long)]
    pub header: Option<String>,

    /// PEM certificate or public key file
    #[arg(long, conflicts_with = "jwks_uri")]
    pub cert_path: Option<PathBuf>,

    /// HTTPS JWKS endpoint
    #[arg(long)]
    pub jwks_uri: Option<Url>,

    /// Required issuer
    #[arg(long)]
    pub issuer: Option<String>,

    /// Accepted audience (repeatable)
    #[arg(long = "audience", value_delimiter = ',')]
    pub audience: Vec<String>,

    /// Clock skew tolerance in seconds
    #[arg(long)]
    pub leeway_secs: Option<u64>,

    /// Exit with a non-zero code when the decision is Deny
    #[arg(long)]
    pub fail_on_deny: bool,
}

#[derive(Parser, Debug)]
pub struct ClientConfigArgs {
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

use anyhow::{bail, Context};
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use todo_authorizer::{
    AuthConfig, AuthorizationRequest, Authorizer, AuthorizerResponse, CredentialSource,
    TokenValidator,
};

use crate::cli::args::AuthorizeArgs;
use crate::exit_codes;

pub async fn run(args: AuthorizeArgs) -> anyhow::Result<i32> {
    let config = auth_config(&args)?;
    let validator = TokenValidator::from_config(&config)
        .await
        .context("initializing signing credential")?;
    let authorizer = Authorizer::new(validator);

    let request = read_request(&args)?;
    let decision = authorizer.authorize(&request).await;
    println!("{}", serde_json::to_string(&AuthorizerResponse::from(&decision))?);

    if args.fail_on_deny && !decision.is_allowed() {
        return Ok(exit_codes::DENIED);
    }
    Ok(exit_codes::SUCCESS)
}

fn auth_config(args: &AuthorizeArgs) -> anyhow::Result<AuthConfig> {
    let mut config = AuthConfig::from_env();

    if let Some(path) = &args.cert_path {
        config.credential = CredentialSource::PemFile(path.clone());
    }
    if let Some(uri) = &args.jwks_uri {
        if uri.scheme() != "https" {
            bail!("--jwks-uri must be HTTPS, got '{uri}'");
        }
        config.credential = CredentialSource::Jwks(uri.clone());
    }
    if let Some(issuer) = &args.issuer {
        config.issuer = Some(issuer.clone());
    }
    if !args.audience.is_empty() {
        config.audience = args.audience.clone();
    }
    if let Some(secs) = args.leeway_secs {
        config.clock_skew_leeway = Duration::from_secs(secs);
    }
    Ok(config)
}

fn read_request(args: &AuthorizeArgs) -> anyhow::Result<AuthorizationRequest> {
    if let Some(header) = &args.header {
        return Ok(AuthorizationRequest::with_header(header.clone()));
    }

    let Some(path) = &args.event else {
        bail!("one of --event or --header is required");
    };
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading event {}", path.display()))?
    };

    serde_json::from_str(&raw).context("parsing token-authorizer event")
}

use super::args::*;

pub mod authorize;
pub mod client_config;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Authorize(args) => authorize::run(args).await,
        Command::ClientConfig(args) => client_config::run(args),
    }
}

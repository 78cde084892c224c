use anyhow::Context;
use todo_core::ClientConfig;

use crate::cli::args::ClientConfigArgs;
use crate::exit_codes;

pub fn run(args: ClientConfigArgs) -> anyhow::Result<i32> {
    let cfg = ClientConfig::from_env().context("loading client configuration")?;
    let out = if args.pretty {
        serde_json::to_string_pretty(&cfg)?
    } else {
        serde_json::to_string(&cfg)?
    };
    println!("{out}");
    Ok(exit_codes::SUCCESS)
}

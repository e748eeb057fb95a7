use anyhow::{anyhow, Error};
use clap::{Args, Command};
use env_logger::Builder;
use medialink::configs::MLConfig;
use medialink::identities::fixed::MLFixedIdentityFactory;
use medialink::identities::supabase::MLSupabaseIdentityFactory;
use medialink::identity::register_identity_factory;
use medialink::servers::http;
use medialink::signer::register_signer_factory;
use medialink::signers::mock::MLMockSignerFactory;
use medialink::signers::s3::MLS3SignerFactory;
use medialink::signers::worker::MLWorkerSignerFactory;
use medialink::state::MLState;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct MLOption {
    #[arg(short = 'c', long, help = "Config file")]
    config: Option<String>,

    #[arg(short = 'l', long, help = "Log filters")]
    logfilter: Option<String>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Error> {
    let cmd = Command::new("MediaLink");
    let cmd = MLOption::augment_args(cmd);
    let args = cmd.get_matches();

    if let Some(filter) = args.get_one::<String>("logfilter") {
        Builder::new().parse_filters(filter.as_str()).init();
    } else {
        env_logger::init();
    }

    let config = match args.get_one::<String>("config") {
        Some(config) => MLConfig::from_file(config)?,
        None => return Err(anyhow!("could not find config file")),
    };

    register_signer_factory("s3", Box::new(MLS3SignerFactory::new())).await;
    register_signer_factory("worker", Box::new(MLWorkerSignerFactory::new())).await;
    register_signer_factory("mock", Box::new(MLMockSignerFactory::new())).await;
    register_identity_factory("supabase", Box::new(MLSupabaseIdentityFactory::new())).await;
    register_identity_factory("static", Box::new(MLFixedIdentityFactory::new())).await;

    let state = Arc::new(MLState::try_new(config.clone()).await?);

    http::server::serve(&config, http::router(state)).await?;

    Ok(())
}

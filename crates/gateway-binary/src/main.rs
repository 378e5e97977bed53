#![cfg_attr(test, allow(unused_crate_dependencies))]

use clap::crate_version;
use gateway_server::ServerConfig;
use mimalloc::MiMalloc;
use tokio::runtime;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod args;
mod telemetry;

const THREAD_NAME: &str = "rest-bridge-gateway";

fn main() -> anyhow::Result<()> {
    let args = self::args::parse();
    let config = args.config()?;

    let runtime = runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name(THREAD_NAME)
        .build()?;

    runtime.block_on(async move {
        telemetry::init(&args)?;

        let crate_version = crate_version!();
        tracing::info!("REST bridge gateway {crate_version}");

        let config = ServerConfig {
            listen_addr: args.listen_address,
            config,
        };

        gateway_server::serve(config).await?;

        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}

#![warn(clippy::perf, clippy::style, warnings)]

mod common;
mod error;
mod fetch;
mod integrate;
mod page;
mod parse;
mod prelude;
mod render;
mod store;

use std::io::Write;

use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::fetch::HttpFetcher;
use crate::integrate::Integrator;
use crate::page::PageSource;
use crate::prelude::*;
use crate::render::RenderStrategy;

fn main() -> Result<()> {
    color_eyre::install()?;
    install_logging();

    let ctx = InnerContext::init()?;

    match &ctx.args.command {
        Command::Augment { page, output, mode } => {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .wrap_err("Failed to start the async runtime.")?
                .block_on(augment(&ctx, page, output.as_deref(), *mode))
        }
        Command::Mode(sub) => mode_command(&ctx, sub),
    }
}

fn install_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wikigh=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(ErrorLayer::default())
        .init();
}

async fn augment(
    ctx: &Context,
    page: &str,
    output: Option<&std::path::Path>,
    overridden: Option<render::Mode>,
) -> Result<()> {
    let source = PageSource::parse(page);
    let origin = source.origin();
    let fetcher = HttpFetcher::new(&ctx.config)?;

    let mode = ctx.resolve_mode(&origin, overridden)?;
    info!("Augmenting {page} in {mode} mode (origin {origin}).");

    let document = source.load(&fetcher).await?;
    let strategy = RenderStrategy::for_mode(mode, &ctx.config)?;
    let integrator = Integrator::new(strategy, fetcher, &ctx.config)?;

    let augmented = integrator.augment(&document).await?;

    match output {
        Some(path) => std::fs::write(path, &augmented.html)
            .wrap_err_with(|| format!("Could not write augmented page to {path:?}."))?,
        None => std::io::stdout()
            .lock()
            .write_all(augmented.html.as_bytes())?,
    }

    Ok(())
}

fn mode_command(ctx: &Context, sub: &ModeSubcommand) -> Result<()> {
    match sub {
        ModeSubcommand::Get { origin } => {
            let mode = ctx.resolve_mode(origin, None)?;
            println!("{mode}");
        }
        ModeSubcommand::Set { mode, origin } => {
            store::write_mode(&ctx.store(origin)?, *mode)?;
            info!("Stored {mode} mode for {origin}.");
        }
        ModeSubcommand::Toggle { origin } => {
            let mode = integrate::toggle_mode(&ctx.store(origin)?)?;
            println!("{mode}");
        }
    }

    Ok(())
}

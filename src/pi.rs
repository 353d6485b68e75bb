use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use mcp3208_sampler::cli::Args;
use mcp3208_sampler::Driver;

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let args = Args::parse();

    let sampler = args.sampler()?;

    let mut mcp = Driver::new(args.bus_config())?;

    let mut stdout = io::stdout().lock();

    let taken = sampler
        .run(&mut mcp, |data| -> anyhow::Result<()> {
            writeln!(stdout, "{data}")?;
            Ok(())
        })
        .inspect_err(|err| error!("{err}"))
        .with_context(|| format!("sampling channel {}", sampler.channel()))?;

    mcp.close();

    info!("took {taken} samples");

    Ok(())
}

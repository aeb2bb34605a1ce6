use anyhow::{Result, bail};
use tazview::convert_shapefile;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ConvertArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", args.output.display());
    }

    let count = convert_shapefile(&args.input, &args.output)?;
    if cli.verbose > 0 {
        eprintln!("[convert] wrote {count} features to {}", args.output.display());
    }

    Ok(())
}

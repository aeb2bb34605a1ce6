use anyhow::{Context, Result, ensure};
use tazview::{Catalog, DiskStore, FeatureType, read_geojson_file};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ImportArgs) -> Result<()> {
    let inputs = [
        (FeatureType::OldZone, &args.old),
        (FeatureType::NewZone, &args.new),
        (FeatureType::Block, &args.blocks),
    ];
    ensure!(inputs.iter().any(|(_, path)| path.is_some()), "nothing to import: pass --old, --new and/or --blocks");

    let catalog = Catalog::new(Box::new(DiskStore::new(&args.store)));
    for (ty, path) in inputs {
        let Some(path) = path else { continue };
        let geojson = read_geojson_file(path)?;
        let count = catalog.replace(ty, &geojson)
            .with_context(|| format!("[import] {} layer from {}", ty.to_str(), path.display()))?;

        if cli.verbose > 0 {
            eprintln!("[import] {} <- {} ({count} features)", ty.storage_key(), path.display());
        }
    }

    Ok(())
}

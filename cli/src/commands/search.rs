use std::io::Write;

use anyhow::{Context, Result, ensure};
use serde_json::{Map, Value, json};
use tazview::{Catalog, DiskStore, DistanceUnit, FeatureId, FeatureType, PanelView, Session, Settings, View};
use tracing::warn;

use crate::cli::UnitArg;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::SearchArgs) -> Result<()> {
    ensure!(args.store.is_dir(), "layer directory does not exist: {}", args.store.display());

    let mut settings = match &args.config {
        Some(path) => Settings::from_json_file(path)?,
        None => Settings::default(),
    };
    if let Some(unit) = args.unit {
        settings.unit = match unit {
            UnitArg::Miles => DistanceUnit::Miles,
            UnitArg::Km => DistanceUnit::Kilometers,
        };
    }

    let catalog = Catalog::load(Box::new(DiskStore::new(&args.store)));
    let mut session = Session::new(catalog.into(), settings);
    if let Some(radius) = &args.radius {
        session.set_radius_text(radius);
    }
    session.search(&args.taz_id);
    select(&mut session, FeatureType::NewZone, &args.select_zones);
    select(&mut session, FeatureType::Block, &args.select_blocks);

    let report = report(&session);
    let text = serde_json::to_string_pretty(&report).context("[search] Failed to serialize report")?;

    match &args.output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("[search] Failed to write {}", path.display()))?,
        None => writeln!(std::io::stdout().lock(), "{text}")?,
    }

    Ok(())
}

/// Toggle each id on once; repeated ids stay selected.
fn select(session: &mut Session, ty: FeatureType, ids: &[String]) {
    for raw in ids {
        let Some(id) = FeatureId::parse(ty, raw) else {
            warn!(id = raw.as_str(), "ignoring blank {} id", ty.to_str());
            continue;
        };
        if session.selections().get(ty).is_some_and(|set| set.contains(&id)) {
            continue;
        }
        session.toggle(id);
    }
}

fn report(session: &Session) -> Value {
    let radius = session.radius();
    let circle = session.circle()
        .map(|polygon| polygon.exterior().coords().map(|c| [c.x, c.y]).collect::<Vec<_>>());

    let panels = View::ALL.iter()
        .filter(|view| !view.is_table())
        .map(|&view| (view.to_str().to_string(), panel_json(&session.panel(view))))
        .collect::<Map<_, _>>();

    json!({
        "search": session.status(),
        "radius": {
            "meters": radius.meters(),
            "value": radius.in_unit(session.unit()),
            "unit": session.unit().to_str(),
        },
        "circle": circle,
        "camera": session.camera().map(|b| b.to_array()),
        "panels": panels,
        "tables": {
            "new_zone_table": session.table(View::NewZoneTable),
            "block_table": session.table(View::BlockTable),
        },
    })
}

fn panel_json(panel: &PanelView) -> Value {
    let layers = panel.layers.iter()
        .map(|layer| {
            let ids = layer.features.iter()
                .map(|f| f.id().map_or(Value::Null, |id| Value::String(id.id().to_string())))
                .collect::<Vec<_>>();
            (layer.ty.layer_id().to_string(), Value::Array(ids))
        })
        .collect::<Map<_, _>>();

    json!({
        "layers": layers,
        "bounds": panel.bounds.map(|b| b.to_array()),
        "highlight": panel.highlight.sorted(),
        "linked": panel.linked.sorted(),
    })
}

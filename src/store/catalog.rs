use std::sync::{Arc, Mutex, PoisonError, RwLock};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::geom::SpatialIndex;
use crate::layer::{FeatureCollection, FeatureType};
use super::source::Store;

/// One immutable snapshot of the three indexed collections.
#[derive(Debug, Clone)]
pub struct Layers {
    old_zones: Arc<SpatialIndex>,
    new_zones: Arc<SpatialIndex>,
    blocks: Arc<SpatialIndex>,
}

impl Layers {
    pub fn from_collections(old_zones: FeatureCollection, new_zones: FeatureCollection, blocks: FeatureCollection) -> Self {
        let build = |c: FeatureCollection| Arc::new(SpatialIndex::build(Arc::new(c)));
        Self { old_zones: build(old_zones), new_zones: build(new_zones), blocks: build(blocks) }
    }

    /// Three empty layers.
    pub fn empty() -> Self {
        Self::from_collections(
            FeatureCollection::empty(FeatureType::OldZone.to_str()),
            FeatureCollection::empty(FeatureType::NewZone.to_str()),
            FeatureCollection::empty(FeatureType::Block.to_str()),
        )
    }

    /// Indexed layer of the given type.
    pub fn layer(&self, ty: FeatureType) -> &Arc<SpatialIndex> {
        match ty {
            FeatureType::OldZone => &self.old_zones,
            FeatureType::NewZone => &self.new_zones,
            FeatureType::Block => &self.blocks,
        }
    }

    /// Collection of the given type.
    #[inline]
    pub fn collection(&self, ty: FeatureType) -> &Arc<FeatureCollection> { self.layer(ty).collection() }

    /// Copy with one layer swapped out; the other two are shared.
    fn with_layer(&self, ty: FeatureType, index: SpatialIndex) -> Self {
        let mut next = self.clone();
        let slot = match ty {
            FeatureType::OldZone => &mut next.old_zones,
            FeatureType::NewZone => &mut next.new_zones,
            FeatureType::Block => &mut next.blocks,
        };
        *slot = Arc::new(index);
        next
    }
}

impl Default for Layers {
    fn default() -> Self { Self::empty() }
}

/// Current layer snapshot plus the store it is persisted to.
/// Replacing a layer swaps in a new snapshot; readers holding the old one are unaffected.
pub struct Catalog {
    store: Mutex<Box<dyn Store>>,
    layers: RwLock<Arc<Layers>>,
}

impl Catalog {
    /// A catalog with empty layers over `store` (nothing is read yet).
    pub fn new(store: Box<dyn Store>) -> Self {
        Self { store: Mutex::new(store), layers: RwLock::new(Arc::new(Layers::empty())) }
    }

    /// Open a catalog from whatever the store holds.
    /// A missing or unreadable entry leaves that layer empty.
    pub fn load(store: Box<dyn Store>) -> Self {
        let load = |ty: FeatureType| -> FeatureCollection {
            let key = ty.storage_key();
            if !store.has(key) {
                info!(key, "no stored layer");
                return FeatureCollection::empty(ty.to_str());
            }
            store.get(key)
                .and_then(|text| FeatureCollection::from_geojson_bytes(ty, text.as_bytes()))
                .unwrap_or_else(|e| {
                    warn!(key, error = %e, "stored layer is unreadable, starting empty");
                    FeatureCollection::empty(ty.to_str())
                })
        };

        let layers = Layers::from_collections(
            load(FeatureType::OldZone),
            load(FeatureType::NewZone),
            load(FeatureType::Block),
        );
        info!(
            old_zones = layers.collection(FeatureType::OldZone).len(),
            new_zones = layers.collection(FeatureType::NewZone).len(),
            blocks = layers.collection(FeatureType::Block).len(),
            "catalog loaded"
        );

        Self { store: Mutex::new(store), layers: RwLock::new(Arc::new(layers)) }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Layers> {
        self.layers.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Normalize `geojson` as the `ty` layer, index it, persist it, and publish it.
    /// Returns the number of features loaded.
    pub fn replace(&self, ty: FeatureType, geojson: &Value) -> Result<usize> {
        let collection = FeatureCollection::from_geojson(ty, geojson)
            .with_context(|| format!("[Catalog.replace] Failed to read {} layer", ty.to_str()))?;
        let text = serde_json::to_string(&collection.to_geojson())
            .context("[Catalog.replace] Failed to serialize layer")?;
        let count = collection.len();
        let index = SpatialIndex::build(Arc::new(collection));

        self.store.lock().unwrap_or_else(PoisonError::into_inner)
            .put(ty.storage_key(), &text)?;

        let mut layers = self.layers.write().unwrap_or_else(PoisonError::into_inner);
        *layers = Arc::new(layers.with_layer(ty, index));

        info!(layer = ty.to_str(), features = count, "layer replaced");
        Ok(count)
    }

    /// As `replace`, from raw GeoJSON bytes.
    pub fn replace_bytes(&self, ty: FeatureType, bytes: &[u8]) -> Result<usize> {
        let geojson: Value = serde_json::from_slice(bytes)
            .with_context(|| format!("[Catalog.replace_bytes] {} input is not valid JSON", ty.to_str()))?;
        self.replace(ty, &geojson)
    }

    /// Drop one layer (or all of them) from the store and the current snapshot.
    /// If removal fails part way, the layers already removed from the store are cleared
    /// from the snapshot too before the error is returned.
    pub fn clear(&self, ty: Option<FeatureType>) -> Result<()> {
        let types = match ty {
            Some(ty) => vec![ty],
            None => FeatureType::ALL.to_vec(),
        };

        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        let mut layers = self.layers.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = layers.as_ref().clone();
        let mut result = Ok(());
        for ty in types {
            if let Err(e) = store.remove(ty.storage_key()) {
                result = Err(e.context(format!("[Catalog.clear] Failed to remove {} layer", ty.to_str())));
                break;
            }
            next = next.with_layer(ty, SpatialIndex::build(Arc::new(FeatureCollection::empty(ty.to_str()))));
            info!(layer = ty.to_str(), "layer cleared");
        }
        *layers = Arc::new(next);
        result
    }
}

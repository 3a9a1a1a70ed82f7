//! Immutable per-crop model registry.
//!
//! Built once at process startup by loading every configured profile's
//! artifact, then shared read-only for the process lifetime. A missing or
//! corrupt artifact skips that crop and records a diagnostic instead of
//! failing startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use leafscan_models::{canonical_crop_key, CropProfile};

use crate::backend::{ModelBackend, OnnxModel};

/// A loaded classifier bound to exactly one crop profile.
pub struct CropModel {
    pub profile: CropProfile,
    backend: Box<dyn ModelBackend>,
}

impl CropModel {
    pub fn new(profile: CropProfile, backend: Box<dyn ModelBackend>) -> Self {
        Self { profile, backend }
    }

    pub fn backend(&self) -> &dyn ModelBackend {
        self.backend.as_ref()
    }
}

/// A crop whose model artifact could not be loaded at startup.
#[derive(Debug, Clone)]
pub struct SkippedCrop {
    pub crop_key: String,
    pub attempted_path: PathBuf,
    pub reason: String,
}

/// Read-only mapping from crop key to loaded model.
///
/// No hot reload: a crop skipped at startup stays unavailable until the
/// process restarts.
pub struct ModelRegistry {
    models: HashMap<String, Arc<CropModel>>,
    skipped: Vec<SkippedCrop>,
}

impl ModelRegistry {
    /// Load every profile's artifact from `model_dir`.
    ///
    /// Never fails as a whole: crops whose artifact cannot be loaded are
    /// omitted and recorded in [`ModelRegistry::skipped`], everything else
    /// stays functional.
    pub fn load(model_dir: &Path, profiles: Vec<CropProfile>) -> Self {
        let mut models = HashMap::new();
        let mut skipped = Vec::new();

        for profile in profiles {
            let path = model_dir.join(&profile.model_file);
            match OnnxModel::load(profile.crop_key.clone(), &path) {
                Ok(backend) => {
                    info!(crop = %profile.crop_key, path = %path.display(), "loaded crop model");
                    models.insert(
                        profile.crop_key.clone(),
                        Arc::new(CropModel::new(profile, Box::new(backend))),
                    );
                }
                Err(e) => {
                    warn!(
                        crop = %profile.crop_key,
                        path = %path.display(),
                        error = %e,
                        "skipping crop, model unavailable"
                    );
                    skipped.push(SkippedCrop {
                        crop_key: profile.crop_key,
                        attempted_path: path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Self { models, skipped }
    }

    /// Build a registry from preconstructed models. Lets embedders and
    /// tests supply their own backends.
    pub fn from_models(models: Vec<CropModel>) -> Self {
        Self {
            models: models
                .into_iter()
                .map(|m| (m.profile.crop_key.clone(), Arc::new(m)))
                .collect(),
            skipped: Vec::new(),
        }
    }

    /// Case-insensitive lookup of a loaded model.
    pub fn resolve(&self, crop: &str) -> Option<Arc<CropModel>> {
        self.models.get(&canonical_crop_key(crop)).cloned()
    }

    /// Profiles of the crops that loaded, sorted by key for stable output.
    pub fn available(&self) -> Vec<&CropProfile> {
        let mut profiles: Vec<&CropProfile> =
            self.models.values().map(|m| &m.profile).collect();
        profiles.sort_by(|a, b| a.crop_key.cmp(&b.crop_key));
        profiles
    }

    /// Crops skipped at startup, with the attempted artifact path.
    pub fn skipped(&self) -> &[SkippedCrop] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

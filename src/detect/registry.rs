use std::collections::BTreeMap;

use anyhow::{anyhow, Result};

use crate::config::ClassifierSettings;

use super::backend::DetectorBackend;
use super::backends::StubBackend;
#[cfg(feature = "backend-tract")]
use super::backends::TractBackend;

type BackendFactory = Box<dyn Fn(&ClassifierSettings) -> Result<Box<dyn DetectorBackend>>>;

/// Named classifier constructors.
///
/// The referee loop owns exactly one backend, so the registry only builds:
/// `build` looks up `settings.backend` and hands back an owned instance.
pub struct BackendRegistry {
    factories: BTreeMap<&'static str, BackendFactory>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Every backend compiled into this build.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("stub", |_| Ok(Box::new(StubBackend::new())));
        #[cfg(feature = "backend-tract")]
        registry.register("tract", |settings| {
            let model_path = settings
                .model_path
                .as_ref()
                .ok_or_else(|| anyhow!("the tract backend requires a model path"))?;
            let backend =
                TractBackend::new(model_path, settings.input_size, settings.labels.clone())?
                    .with_threshold(settings.confidence)
                    .with_iou_threshold(settings.iou_threshold);
            Ok(Box::new(backend))
        });
        registry
    }

    /// Register a constructor under `name`, replacing any earlier one.
    pub fn register<F>(&mut self, name: &'static str, factory: F)
    where
        F: Fn(&ClassifierSettings) -> Result<Box<dyn DetectorBackend>> + 'static,
    {
        self.factories.insert(name, Box::new(factory));
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    /// Construct the backend named by `settings.backend`.
    pub fn build(&self, settings: &ClassifierSettings) -> Result<Box<dyn DetectorBackend>> {
        let factory = self.factories.get(settings.backend.as_str()).ok_or_else(|| {
            anyhow!(
                "classifier backend '{}' is not available in this build (have: {})",
                settings.backend,
                self.names().join(", ")
            )
        })?;
        let backend = factory(settings)?;
        log::info!("classifier backend '{}' ready", backend.name());
        Ok(backend)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{BoundingBox, Detection, ScriptedBackend};

    fn settings(backend: &str) -> ClassifierSettings {
        ClassifierSettings {
            backend: backend.to_string(),
            model_path: None,
            input_size: 640,
            confidence: 0.5,
            iou_threshold: 0.7,
            labels: vec!["paper".into(), "rock".into(), "scissors".into()],
        }
    }

    #[test]
    fn builtin_registry_builds_stub() {
        let registry = BackendRegistry::builtin();
        assert!(registry.names().contains(&"stub"));
        let backend = registry.build(&settings("stub")).unwrap();
        assert_eq!(backend.name(), "stub");
    }

    #[test]
    fn unknown_backend_lists_alternatives() {
        let registry = BackendRegistry::builtin();
        let err = registry.build(&settings("opencv")).err().unwrap();
        let msg = format!("{err:#}");
        assert!(msg.contains("opencv"));
        assert!(msg.contains("stub"));
    }

    #[test]
    fn registered_factory_is_used_by_name() {
        let mut registry = BackendRegistry::new();
        let det = Detection::new("paper", 0.7, BoundingBox::new(0, 0, 4, 4));
        let script = vec![vec![det.clone()]];
        registry.register("scripted", move |_| {
            Ok(Box::new(ScriptedBackend::new(script.clone())))
        });

        let mut backend = registry.build(&settings("scripted")).unwrap();
        let result = backend.detect(&[], 0, 0).unwrap();
        assert_eq!(result.detections, vec![det]);
        assert_eq!(registry.names(), vec!["scripted"]);
    }
}

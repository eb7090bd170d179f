use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::field::{Field, FieldValue};
use crate::object::ObjectEntry;
use crate::overlay::OverlayController;

/// One editable field as written in a console manifest.
///
/// A field without `choices` whose `default` is a boolean becomes a `{false, true}` toggle.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub choices: Vec<FieldValue>,
    #[serde(default)]
    pub default: Option<FieldValue>,
}

impl FieldSpec {
    pub fn build(&self) -> Result<Field> {
        match (&self.default, self.choices.is_empty()) {
            (Some(FieldValue::Bool(default)), true) => Ok(Field::boolean(&self.name, *default)),
            (Some(default), false) => Field::with_default_value(&self.name, self.choices.clone(), default),
            (None, false) => Field::cyclable(&self.name, self.choices.clone(), 0),
            (_, true) => Field::cyclable(&self.name, Vec::new(), 0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectSpec {
    pub name: String,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// Data-driven list of console objects.
///
/// Templates are field lists shared by several objects; each object gets its own copy of the
/// template fields followed by its own `fields`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsoleManifest {
    #[serde(default)]
    pub templates: HashMap<String, Vec<FieldSpec>>,
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
}

impl ConsoleManifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_json_str(&contents).with_context(|| format!("Failed to load manifest {}", path.display()))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(json).context("Invalid console manifest JSON")?;
        Ok(manifest)
    }

    /// Builds every object, failing on the first configuration error.
    pub fn build_entries(&self) -> Result<Vec<ObjectEntry>> {
        let mut templates: HashMap<&str, Vec<Field>> = HashMap::new();
        for (name, specs) in &self.templates {
            let fields = build_fields(specs).with_context(|| format!("in template '{name}'"))?;
            templates.insert(name.as_str(), fields);
        }

        let mut entries = Vec::with_capacity(self.objects.len());
        for object in &self.objects {
            if object.name.trim().is_empty() {
                bail!("Console object #{} has an empty name", entries.len());
            }
            let mut fields = match &object.template {
                Some(template) => templates
                    .get(template.as_str())
                    .cloned()
                    .ok_or_else(|| anyhow!("Object '{}' uses unknown template '{template}'", object.name))?,
                None => Vec::new(),
            };
            fields.extend(build_fields(&object.fields).with_context(|| format!("in object '{}'", object.name))?);
            entries.push(ObjectEntry::new(object.name.clone(), fields));
        }
        Ok(entries)
    }

    /// Builds and registers every object; returns how many were added.
    pub fn register_into(&self, overlay: &mut OverlayController) -> Result<usize> {
        let entries = self.build_entries()?;
        let count = entries.len();
        for entry in entries {
            overlay.register(entry);
        }
        Ok(count)
    }
}

fn build_fields(specs: &[FieldSpec]) -> Result<Vec<Field>> {
    specs.iter().map(FieldSpec::build).collect()
}

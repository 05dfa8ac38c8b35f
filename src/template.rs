//! Prebuilt sign templates and the catalog they are loaded from.
//!
//! Templates are JSON documents carrying a canvas size and an ordered object
//! list. Any ids or stacking values inside the list are ignored: applying a
//! template assigns fresh ids and stacks objects in list order.

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

use serde::{Deserialize, Serialize};

use crate::doc::NewObject;
use crate::engine::{Action, EngineCore};

/// Errors produced while loading or resolving templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The JSON could not be parsed into a template or catalog.
    #[error("template parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// A template declared a canvas dimension that is not a positive number.
    #[error("template {id} has invalid canvas size {width}x{height}")]
    InvalidSize { id: String, width: f64, height: f64 },

    /// No template with the requested id exists in the catalog.
    #[error("unknown template: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub objects: Vec<NewObject>,
}

impl Template {
    /// Parse and validate a single template.
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let template: Self = serde_json::from_str(json)?;
        template.validate()?;
        Ok(template)
    }

    /// Reject non-positive or non-finite canvas dimensions.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.canvas_width) && ok(self.canvas_height) {
            Ok(())
        } else {
            Err(TemplateError::InvalidSize { id: self.id.clone(), width: self.canvas_width, height: self.canvas_height })
        }
    }

    /// Replace the front side and canvas size of `engine` with this template.
    pub fn apply(&self, engine: &mut EngineCore) -> Vec<Action> {
        tracing::debug!(id = %self.id, name = %self.name, "applying template");
        engine.apply_template(self.objects.clone(), self.canvas_width, self.canvas_height)
    }
}

/// An ordered, id-addressable collection of templates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    #[must_use]
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// Parse a catalog (one template object or an array of them), validating
    /// every template.
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let templates: Vec<Template> = if json.trim_start().starts_with('[') {
            serde_json::from_str(json)?
        } else {
            vec![serde_json::from_str(json)?]
        };
        for template in &templates {
            template.validate()?;
        }
        tracing::debug!(count = templates.len(), "template catalog loaded");
        Ok(Self { templates })
    }

    /// Look a template up by id.
    pub fn find(&self, id: &str) -> Result<&Template, TemplateError> {
        self.templates.iter().find(|t| t.id == id).ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Templates in `category`, in catalog order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Template> + 'a {
        self.templates.iter().filter(move |t| t.category == category)
    }

    #[must_use]
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

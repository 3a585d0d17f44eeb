// src/eligibility/taxonomy.rs
//! Curated technology and skill taxonomy: category label -> surface forms

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::Path;
use tracing::info;

use super::EngineError;

pub const LANGUAGE: &str = "Language";
pub const ROLE_EXPERIENCE: &str = "Role Experience";
pub const PROGRAMMING_LANGUAGE: &str = "Programming Language";
pub const BACKEND_WEB_FRAMEWORK: &str = "Backend Web Framework";

/// Immutable mapping from category label to lowercase surface forms.
///
/// Categories keep the order of the source file, which decides the label of a
/// surface form listed under several categories.
#[derive(Debug, Clone, Default)]
pub struct EntityTaxonomy {
    categories: Vec<(String, BTreeSet<String>)>,
    surface_forms: HashSet<String>,
}

impl EntityTaxonomy {
    pub fn from_categories<I, L, F, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = (L, F)>,
        L: Into<String>,
        F: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut taxonomy = Self::default();
        for (label, forms) in categories {
            let label = label.into();
            let forms: BTreeSet<String> = forms
                .into_iter()
                .map(|f| f.as_ref().trim().to_lowercase())
                .filter(|f| !f.is_empty())
                .collect();

            taxonomy.surface_forms.extend(forms.iter().cloned());
            match taxonomy.categories.iter_mut().find(|(l, _)| *l == label) {
                Some((_, existing)) => existing.extend(forms),
                None => taxonomy.categories.push((label, forms)),
            }
        }
        taxonomy
    }

    /// Load the taxonomy JSON file (`{"Category": ["form", ...], ...}`)
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| EngineError::TaxonomyUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        let taxonomy: Self =
            serde_json::from_str(&content).map_err(|source| EngineError::InvalidTaxonomy {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            "Loaded entity taxonomy from {}: {} categories, {} surface forms",
            path.display(),
            taxonomy.categories.len(),
            taxonomy.surface_forms.len()
        );
        Ok(taxonomy)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.categories.iter().map(|(l, f)| (l.as_str(), f))
    }

    pub fn contains_category(&self, label: &str) -> bool {
        self.categories.iter().any(|(l, _)| l == label)
    }

    pub fn surface_forms_of(&self, label: &str) -> Option<&BTreeSet<String>> {
        self.categories
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, forms)| forms)
    }

    /// Case-insensitive surface-form lookup across all categories
    pub fn contains_surface_form(&self, text: &str) -> bool {
        self.surface_forms.contains(&text.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.surface_forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surface_forms.is_empty()
    }
}

impl<'de> Deserialize<'de> for EntityTaxonomy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TaxonomyVisitor;

        impl<'de> Visitor<'de> for TaxonomyVisitor {
            type Value = EntityTaxonomy;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category label to a list of surface forms")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut categories: Vec<(String, Vec<String>)> = Vec::new();
                while let Some(entry) = map.next_entry::<String, Vec<String>>()? {
                    categories.push(entry);
                }
                Ok(EntityTaxonomy::from_categories(categories))
            }
        }

        deserializer.deserialize_map(TaxonomyVisitor)
    }
}

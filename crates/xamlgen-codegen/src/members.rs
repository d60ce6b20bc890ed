//! Member names a generated class declares beside the schema's properties.
//!
//! Dialog and legacy view-models host one observable property per schema
//! property, so their own plumbing shares a namespace with the model.
//! Private plumbing is renamed around a clash; public members the rest of
//! the generated code depends on are reserved and a clash fails the run.

use crate::platform::PlatformProfile;
use std::collections::HashMap;
use xamlgen_core::{GenerationError, ModelSchema};

/// Names taken in one generated class. Names a property rendered to keep
/// the property's name.
#[derive(Debug, Clone)]
pub struct MemberScope {
    class: String,
    taken: HashMap<String, Option<String>>,
}

impl MemberScope {
    /// Scope holding every name the schema's properties render to in this
    /// profile: the property itself and its backing field.
    pub fn for_properties(class: &str, schema: &ModelSchema, profile: &PlatformProfile) -> Self {
        let mut taken = HashMap::new();
        for property in &schema.properties {
            let name = property.name().to_string();
            taken.insert(profile.field_name(&name), Some(name.clone()));
            taken.insert(name.clone(), Some(name));
        }
        Self {
            class: class.to_string(),
            taken,
        }
    }

    /// Claim a private member name. Falls back to the alternatives in order,
    /// then to `preferred` with a numeric suffix.
    pub fn claim(&mut self, preferred: &str, alternatives: &[&str]) -> String {
        let name = std::iter::once(preferred)
            .chain(alternatives.iter().copied())
            .find(|candidate| !self.taken.contains_key(*candidate))
            .map(str::to_string)
            .unwrap_or_else(|| {
                let mut n = 2;
                while self.taken.contains_key(&format!("{}{}", preferred, n)) {
                    n += 1;
                }
                format!("{}{}", preferred, n)
            });
        self.taken.insert(name.clone(), None);
        name
    }

    /// Reserve public member names, failing on the first one a property
    /// already renders to.
    pub fn reserve<I, S>(&mut self, names: I) -> Result<(), GenerationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            if let Some(Some(property)) = self.taken.get(name) {
                return Err(GenerationError::InvalidSchema(format!(
                    "property '{}' collides with the member '{}' that {} declares",
                    property, name, self.class
                )));
            }
            self.taken.insert(name.to_string(), None);
        }
        Ok(())
    }
}

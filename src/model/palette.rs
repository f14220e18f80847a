use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::input::InputError;

pub const DEFAULT_COLOR: &str = "#8c8c8c";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryStyle {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy)]
struct CategoryDef {
    id: &'static str,
    name: &'static str,
    color: &'static str,
}

// split-pipe sample wells for the three-line mixture.
const BUILTIN_CATEGORIES: &[CategoryDef] = &[
    CategoryDef {
        id: "xcond_1",
        name: "K562",
        color: "#1f77b4",
    },
    CategoryDef {
        id: "xcond_2",
        name: "SK-N-SH",
        color: "#ff7f0e",
    },
    CategoryDef {
        id: "xcond_3",
        name: "HepG2",
        color: "#2ca02c",
    },
];

/// Category id to display name and color, shared by extraction and both renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPalette {
    styles: BTreeMap<String, CategoryStyle>,
    default_color: String,
}

impl Default for CategoryPalette {
    fn default() -> Self {
        let mut palette = Self::empty();
        palette.styles.extend(BUILTIN_CATEGORIES.iter().map(|def| {
            (
                def.id.to_string(),
                CategoryStyle {
                    name: def.name.to_string(),
                    color: def.color.to_string(),
                },
            )
        }));
        palette
    }
}

impl CategoryPalette {
    pub fn empty() -> Self {
        Self {
            styles: BTreeMap::new(),
            default_color: DEFAULT_COLOR.to_string(),
        }
    }

    /// Overrides entries from a JSON object `{"<id>": {"name": .., "color": ..}}`.
    pub fn merge_json(mut self, text: &str) -> Result<Self, InputError> {
        let overrides: BTreeMap<String, CategoryStyle> = serde_json::from_str(text)
            .map_err(|e| InputError::Parse(format!("palette: {e}")))?;
        self.styles.extend(overrides);
        Ok(self)
    }

    pub fn load(path: &Path) -> Result<Self, InputError> {
        if !path.exists() {
            return Err(InputError::MissingInput(format!(
                "palette file not found: {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        Self::default().merge_json(&text)
    }

    /// Unknown categories keep their raw id and get the default color.
    pub fn resolve(&self, category_id: &str) -> (String, String) {
        match self.styles.get(category_id) {
            Some(style) => (style.name.clone(), style.color.clone()),
            None => (category_id.to_string(), self.default_color.clone()),
        }
    }
}

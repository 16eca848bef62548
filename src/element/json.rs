//! Layout documents — JSON (de)serialization of element trees.
//!
//! A layout file is a JSON object with a single `configuration_data`
//! array holding the root elements. The engine itself never touches
//! files; everything funnels through here.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::Element;

/// On-disk document shape.
#[derive(Debug, Serialize, Deserialize)]
pub struct LayoutDoc {
    pub configuration_data: Vec<Element>,
}

/// Read a layout file into its root elements.
///
/// Rejects paths without a `.json` extension so a mistyped path fails
/// loudly instead of producing a parse error on binary data.
pub fn load_layout(path: &Path) -> Result<Vec<Element>> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        bail!("{} is not recognized as .json", path.display());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading layout {}", path.display()))?;
    let doc: LayoutDoc = serde_json::from_str(&raw)
        .with_context(|| format!("parsing layout {}", path.display()))?;
    Ok(doc.configuration_data)
}

/// Write root elements back out as a pretty-printed layout document.
pub fn save_layout(path: &Path, roots: &[Element]) -> Result<()> {
    let doc = LayoutDoc {
        configuration_data: roots.to_vec(),
    };
    let formatted = serde_json::to_string_pretty(&doc)?;
    std::fs::write(path, formatted)
        .with_context(|| format!("writing layout {}", path.display()))?;
    Ok(())
}

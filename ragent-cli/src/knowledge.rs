//! Knowledge-base folder selection.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Folder and collection used when nothing else is chosen.
pub const DEFAULT_KNOWLEDGE_BASE: &str = "facts";

/// A folder of `.txt` files and the collection it is ingested into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    pub folder: PathBuf,
    pub collection: String,
}

impl KnowledgeBase {
    /// `data_root/<name>` ingested into collection `<name>`.
    pub fn named(data_root: &Path, name: &str) -> Self {
        Self { folder: data_root.join(name), collection: name.to_string() }
    }
}

/// Sub-folders of `data_root`, sorted by name.
pub fn list_folders(data_root: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(data_root)
        .with_context(|| format!("cannot read DATA_ROOT {}", data_root.display()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("cannot read DATA_ROOT {}", data_root.display()))?;
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// `facts` when present, else the first folder.
pub fn default_index(folders: &[String]) -> usize {
    folders.iter().position(|f| f == DEFAULT_KNOWLEDGE_BASE).unwrap_or(0)
}

/// Interpret a 1-based menu choice; anything else selects `default`.
pub fn parse_selection(input: &str, count: usize, default: usize) -> usize {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => n - 1,
        _ => default,
    }
}

/// The menu shown before the selection prompt.
pub fn render_menu(folders: &[String]) -> String {
    let mut menu = String::from("Available knowledge base folders:\n");
    for (idx, folder) in folders.iter().enumerate() {
        menu.push_str(&format!("  [{}] {folder}\n", idx + 1));
    }
    menu
}

/// Fail early when there is nothing to choose from.
pub fn require_folders(data_root: &Path, folders: &[String]) -> Result<()> {
    if folders.is_empty() {
        bail!("no knowledge base folders found under {}", data_root.display());
    }
    Ok(())
}

//! `--dump-store` output.

use std::io::Write;

use anyhow::Result;
use ragent_rag::VectorStore;

/// Print every collection with each record's id, text and metadata.
pub async fn dump_store(store: &dyn VectorStore, out: &mut dyn Write) -> Result<()> {
    let collections = store.list_collections().await?;
    writeln!(out, "Collections: {collections:?}")?;

    for name in &collections {
        writeln!(out, "\nCollection: {name}")?;
        for record in store.get_all(name).await? {
            let mut metadata: Vec<_> = record.metadata.iter().collect();
            metadata.sort();
            writeln!(out, "  ID: {}", record.id)?;
            writeln!(out, "  Document: {}", record.text)?;
            writeln!(out, "  Metadata: {metadata:?}")?;
        }
    }
    Ok(())
}

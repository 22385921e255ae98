//! `url` subcommand

use crate::cli::push::id_from_path;
use crate::resource::Registry;
use anyhow::Result;
use std::path::Path;

/// Print the app webpage URL for a snapshot file.
pub fn run(registry: &Registry, file: &Path) -> Result<()> {
    let rt = registry.for_local_path(file)?;
    let id = id_from_path(file)?;
    println!("{}", rt.webpage_url(&id));
    Ok(())
}

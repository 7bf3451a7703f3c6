use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    catalogue::Catalogue,
    config::ProjectConfig,
    error::{Error, Result},
    record::CatalogueRecord,
};

pub mod doi;
pub mod mapper;
pub mod sitemap;
pub mod slug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSummary {
    pub written: usize,
    /// Entries in the sitemap, when one was requested.
    pub sitemap_entries: Option<usize>,
}

/// File name for the record at 1-based position `index`.
pub fn output_file_name(record: &CatalogueRecord, index: usize) -> String {
    let record_id = record.record_id();
    let base = record
        .name()
        .map(str::to_owned)
        .or_else(|| record_id.map(str::to_owned))
        .unwrap_or_else(|| format!("record-{index}"));
    slug::file_name(&slug::slugify(&base), record_id)
}

/// `path` relative to `base`, when it lies under it.
fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(Path::to_path_buf)
}

/// Write one `Project` file per catalogue record and, optionally, a sitemap over their `@id`s.
pub fn run(config: &ProjectConfig) -> Result<ProjectSummary> {
    let records = Catalogue::load(&config.input)?;
    if records.is_empty() {
        return Err(Error::EmptyCatalogue {
            path: config.input.clone(),
        });
    }

    let out_dir = &config.out_dir;
    fs::create_dir_all(out_dir).map_err(|e| Error::io(out_dir, e))?;
    let out_dir_abs = fs::canonicalize(out_dir).map_err(|e| Error::io(out_dir, e))?;
    let cwd = env::current_dir()
        .and_then(fs::canonicalize)
        .map_err(|e| Error::io(".", e))?;

    let mut ids = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let file_name = output_file_name(record, i + 1);
        let out_path = out_dir.join(&file_name);
        let rel_path = relative_to(&out_dir_abs.join(&file_name), &cwd)
            .unwrap_or_else(|| PathBuf::from(&file_name));

        let project = mapper::to_project(record, config.base_url.as_deref(), &rel_path);
        let json = serde_json::to_string_pretty(&project)?;
        fs::write(&out_path, json).map_err(|e| Error::io(&out_path, e))?;
        debug!(path = %out_path.display(), "wrote project record");

        if let Some(id) = project.id.filter(|id| !id.is_empty()) {
            ids.push(id);
        }
    }
    info!(
        "Wrote {} project JSON file(s) under {}",
        records.len(),
        out_dir.display()
    );

    let sitemap_entries = match &config.sitemap {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            fs::write(path, sitemap::build_sitemap(&ids)).map_err(|e| Error::io(path, e))?;
            info!(
                "Wrote sitemap with {} entries to {}",
                ids.len(),
                path.display()
            );
            Some(ids.len())
        }
        None => None,
    };

    Ok(ProjectSummary {
        written: records.len(),
        sitemap_entries,
    })
}

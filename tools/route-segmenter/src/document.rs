use anyhow::{Context, Result};
use pt_assistant_transit::{DocumentStore, RouteDocument, RouteSequence, Segment};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::pbf::extract_routes;

/// On-disk form of a route document
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DocumentFile {
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub routes: Vec<RouteSequence>,
}

impl DocumentFile {
    pub fn from_document(document: &RouteDocument) -> Self {
        let mut segments: Vec<Segment> = document.segments().map(|s| s.as_ref().clone()).collect();
        segments.sort_by_key(|s| s.id);
        Self {
            segments,
            routes: document.routes().iter().map(|r| r.as_ref().clone()).collect(),
        }
    }

    pub fn into_document(self) -> Result<RouteDocument> {
        RouteDocument::from_data(self.segments, self.routes).context("Invalid route document")
    }
}

/// Load a document from a `.pbf` extract or a JSON document file
pub fn read_document(path: &Path) -> Result<RouteDocument> {
    let is_pbf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pbf"))
        .unwrap_or(false);

    let file = if is_pbf {
        let extracted = extract_routes(path).context("Failed to read routes from PBF")?;
        DocumentFile {
            segments: extracted.segments,
            routes: extracted.routes,
        }
    } else {
        let reader = BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        );
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse document {}", path.display()))?
    };

    let document = file.into_document()?;
    log::info!(
        "Loaded {} routes and {} ways",
        document.route_count(),
        document.segment_count()
    );
    Ok(document)
}

/// Write a document as pretty-printed JSON
pub fn write_document(document: &RouteDocument, path: &Path) -> Result<()> {
    let writer = BufWriter::new(
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
    );
    serde_json::to_writer_pretty(writer, &DocumentFile::from_document(document))
        .with_context(|| format!("Failed to write document {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

//! File-backed tabular store over JSON documents.
//!
//! Each document is one JSON file holding the [`Document`] model. Sources are
//! loaded on open and dropped on close; only `save_document` and
//! `backup_document` touch the disk for writes, so closing a source without
//! persisting really does discard its in-memory state.

use crate::addressing::RangeRef;
use crate::document::{Document, NamedRegion, SheetData};
use crate::grid::Grid;
use crate::store::{DocId, StoreError, TabularStore, backup_timestamp, check_range_matches};
use crate::value::CellValue;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
struct FileSlot {
    path: PathBuf,
    doc: Document,
    open: bool,
}

#[derive(Debug, Default)]
pub struct JsonStore {
    slots: Vec<FileSlot>,
    active: Option<DocId>,
}

impl JsonStore {
    /// Open the base document; it stays the active document for the store's
    /// lifetime.
    pub fn open_base(path: impl AsRef<Path>) -> Result<JsonStore, StoreError> {
        let path = path.as_ref().to_path_buf();
        let doc = load_document(&path)?;
        Ok(JsonStore {
            slots: vec![FileSlot {
                path,
                doc,
                open: true,
            }],
            active: Some(DocId(0)),
        })
    }

    pub fn document(&self, doc: DocId) -> Option<&Document> {
        self.slots.get(doc.0 as usize).map(|s| &s.doc)
    }

    fn slot(&self, doc: DocId) -> Result<&FileSlot, StoreError> {
        let slot = self
            .slots
            .get(doc.0 as usize)
            .ok_or(StoreError::InvalidHandle)?;
        if !slot.open {
            return Err(StoreError::DocumentClosed {
                path: slot.path.display().to_string(),
            });
        }
        Ok(slot)
    }

    fn slot_mut(&mut self, doc: DocId) -> Result<&mut FileSlot, StoreError> {
        let slot = self
            .slots
            .get_mut(doc.0 as usize)
            .ok_or(StoreError::InvalidHandle)?;
        if !slot.open {
            return Err(StoreError::DocumentClosed {
                path: slot.path.display().to_string(),
            });
        }
        Ok(slot)
    }

    fn sheet<'a>(&'a self, doc: DocId, sheet: &str) -> Result<&'a SheetData, StoreError> {
        self.slot(doc)?
            .doc
            .sheet(sheet)
            .ok_or_else(|| StoreError::SheetNotFound {
                sheet: sheet.to_string(),
            })
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn load_document(path: &Path) -> Result<Document, StoreError> {
    if !path.exists() {
        return Err(StoreError::DocumentNotFound {
            path: path.display().to_string(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    serde_json::from_str(&text).map_err(|e| StoreError::MalformedDocument {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn persist_document(path: &Path, doc: &Document) -> Result<(), StoreError> {
    let text = serde_json::to_string_pretty(doc).map_err(|e| StoreError::MalformedDocument {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    fs::write(path, text).map_err(|e| io_error(path, e))
}

fn backup_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let ext = path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "json".to_string());
    let file = format!("{}_backup_{}.{}", stem, backup_timestamp(), ext);
    path.with_file_name(file)
}

impl TabularStore for JsonStore {
    fn active_document(&self) -> Option<DocId> {
        self.active
    }

    fn open_source(&mut self, path: &str) -> Result<DocId, StoreError> {
        let path = PathBuf::from(path);
        let doc = load_document(&path)?;
        let id = DocId(self.slots.len() as u32);
        self.slots.push(FileSlot {
            path,
            doc,
            open: true,
        });
        Ok(id)
    }

    fn close_source(&mut self, doc: DocId, persist: bool) -> Result<(), StoreError> {
        if self.active == Some(doc) {
            // The base stays open for the session's writes.
            return Ok(());
        }
        let slot = self.slot_mut(doc)?;
        if persist {
            persist_document(&slot.path, &slot.doc)?;
        }
        slot.open = false;
        slot.doc = Document::default();
        Ok(())
    }

    fn sheet_exists(&self, doc: DocId, sheet: &str) -> Result<bool, StoreError> {
        Ok(self.slot(doc)?.doc.sheet(sheet).is_some())
    }

    fn named_region(
        &self,
        doc: DocId,
        sheet: &str,
        name: &str,
    ) -> Result<Option<NamedRegion>, StoreError> {
        Ok(self.sheet(doc, sheet)?.named_region(name).cloned())
    }

    fn read_cell(
        &self,
        doc: DocId,
        sheet: &str,
        row: u32,
        col: u32,
    ) -> Result<CellValue, StoreError> {
        Ok(self.sheet(doc, sheet)?.cell_at(row, col))
    }

    fn read_grid(&self, doc: DocId, sheet: &str, range: &RangeRef) -> Result<Grid, StoreError> {
        Ok(self.sheet(doc, sheet)?.read_range(range))
    }

    fn write_grid(
        &mut self,
        doc: DocId,
        sheet: &str,
        range: &RangeRef,
        grid: &Grid,
    ) -> Result<(), StoreError> {
        check_range_matches(range, grid)?;
        let slot = self.slot_mut(doc)?;
        let target = slot
            .doc
            .sheet_mut(sheet)
            .ok_or_else(|| StoreError::SheetNotFound {
                sheet: sheet.to_string(),
            })?;
        target.write_range(range, grid);
        Ok(())
    }

    fn save_document(&mut self, doc: DocId) -> Result<(), StoreError> {
        let slot = self.slot(doc)?;
        persist_document(&slot.path, &slot.doc)
    }

    fn backup_document(&mut self, doc: DocId) -> Result<String, StoreError> {
        let slot = self.slot(doc)?;
        let target = backup_path(&slot.path);
        persist_document(&target, &slot.doc)?;
        Ok(target.display().to_string())
    }
}

//! In-memory tabular store.
//!
//! Documents live in a vector keyed by name; "opening" a source marks its
//! slot open and hands back a handle. The store backs the integration tests
//! and gives embedders a way to drive a merge without touching disk.

use crate::addressing::RangeRef;
use crate::document::{Document, NamedRegion};
use crate::grid::Grid;
use crate::store::{DocId, StoreError, TabularStore, backup_timestamp, check_range_matches};
use crate::value::CellValue;

#[derive(Debug)]
struct Slot {
    name: String,
    doc: Document,
    open: bool,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Vec<Slot>,
    active: Option<DocId>,
    backups: Vec<(String, Document)>,
    saves: u32,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Insert a document under a name; the first inserted document becomes
    /// the active base unless [`set_active`](Self::set_active) overrides it.
    pub fn insert_document(&mut self, name: impl Into<String>, doc: Document) -> DocId {
        let id = DocId(self.slots.len() as u32);
        self.slots.push(Slot {
            name: name.into(),
            doc,
            open: true,
        });
        if self.active.is_none() {
            self.active = Some(id);
        }
        id
    }

    pub fn set_active(&mut self, doc: DocId) {
        self.active = Some(doc);
    }

    /// Clear the active document, simulating a host with no open base.
    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn document(&self, doc: DocId) -> Option<&Document> {
        self.slots.get(doc.0 as usize).map(|s| &s.doc)
    }

    pub fn backups(&self) -> &[(String, Document)] {
        &self.backups
    }

    pub fn save_count(&self) -> u32 {
        self.saves
    }

    fn slot(&self, doc: DocId) -> Result<&Slot, StoreError> {
        let slot = self
            .slots
            .get(doc.0 as usize)
            .ok_or(StoreError::InvalidHandle)?;
        if !slot.open {
            return Err(StoreError::DocumentClosed {
                path: slot.name.clone(),
            });
        }
        Ok(slot)
    }

    fn slot_mut(&mut self, doc: DocId) -> Result<&mut Slot, StoreError> {
        let slot = self
            .slots
            .get_mut(doc.0 as usize)
            .ok_or(StoreError::InvalidHandle)?;
        if !slot.open {
            return Err(StoreError::DocumentClosed {
                path: slot.name.clone(),
            });
        }
        Ok(slot)
    }

    fn sheet<'a>(&'a self, doc: DocId, sheet: &str) -> Result<&'a crate::document::SheetData, StoreError> {
        self.slot(doc)?
            .doc
            .sheet(sheet)
            .ok_or_else(|| StoreError::SheetNotFound {
                sheet: sheet.to_string(),
            })
    }
}

impl TabularStore for MemoryStore {
    fn active_document(&self) -> Option<DocId> {
        self.active
    }

    fn open_source(&mut self, path: &str) -> Result<DocId, StoreError> {
        let idx = self
            .slots
            .iter()
            .position(|s| s.name == path)
            .ok_or_else(|| StoreError::DocumentNotFound {
                path: path.to_string(),
            })?;
        self.slots[idx].open = true;
        Ok(DocId(idx as u32))
    }

    fn close_source(&mut self, doc: DocId, _persist: bool) -> Result<(), StoreError> {
        let slot = self
            .slots
            .get_mut(doc.0 as usize)
            .ok_or(StoreError::InvalidHandle)?;
        if self.active == Some(doc) {
            // The base stays open for the session's writes.
            return Ok(());
        }
        slot.open = false;
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
        self.slot(doc)?;
        self.saves += 1;
        Ok(())
    }

    fn backup_document(&mut self, doc: DocId) -> Result<String, StoreError> {
        let (name, copy) = {
            let slot = self.slot(doc)?;
            (slot.name.clone(), slot.doc.clone())
        };
        let backup_name = format!("{}_backup_{}", name, backup_timestamp());
        self.backups.push((backup_name.clone(), copy));
        Ok(backup_name)
    }
}

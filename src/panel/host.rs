//! Host spreadsheet binding used by the insert action.

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertionError {
    #[error("No cell is selected")]
    NoSelection,
    #[error("Host spreadsheet API is not available")]
    HostUnavailable,
    #[error("Host rejected the write: {0}")]
    Rejected(String),
}

/// A formula bound for the active cell, plus the number format to apply.
/// `None` leaves the cell's existing format alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWrite {
    /// Identifies the generated formula this write belongs to.
    pub formula_id: u64,
    pub formula: String,
    pub number_format: Option<String>,
}

#[async_trait(?Send)]
pub trait HostWorkbook {
    /// Writes into the active cell and returns its address.
    async fn write_active_cell(&self, write: &CellWrite) -> Result<String, InsertionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellContent {
    pub formula: String,
    pub number_format: String,
}

/// In-process workbook with a single selectable cell.
#[derive(Debug, Default)]
pub struct MemoryWorkbook {
    selection: RefCell<Option<String>>,
    cells: RefCell<HashMap<String, CellContent>>,
    writes: RefCell<usize>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection(address: impl Into<String>) -> Self {
        let workbook = Self::new();
        workbook.select(address);
        workbook
    }

    pub fn select(&self, address: impl Into<String>) {
        *self.selection.borrow_mut() = Some(address.into());
    }

    pub fn deselect(&self) {
        *self.selection.borrow_mut() = None;
    }

    pub fn cell(&self, address: &str) -> Option<CellContent> {
        self.cells.borrow().get(address).cloned()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

#[async_trait(?Send)]
impl HostWorkbook for MemoryWorkbook {
    async fn write_active_cell(&self, write: &CellWrite) -> Result<String, InsertionError> {
        let address = self
            .selection
            .borrow()
            .clone()
            .ok_or(InsertionError::NoSelection)?;

        let mut cells = self.cells.borrow_mut();
        let cell = cells.entry(address.clone()).or_insert_with(|| CellContent {
            formula: String::new(),
            number_format: "General".to_string(),
        });
        cell.formula = write.formula.clone();
        if let Some(format) = &write.number_format {
            debug!(%address, %format, "Setting number format");
            cell.number_format = format.clone();
        }
        *self.writes.borrow_mut() += 1;

        info!(%address, "Formula inserted");
        Ok(address)
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open existing PDF documents with `lopdf` to count pages and
// read their geometry.

use lopdf::{Document, Object, ObjectId};
use pagearmor_core::error::ArmorError;
use tracing::{debug, instrument};

/// Read-only view of an existing PDF.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, ArmorError> {
        let document = Document::load_mem(data).map_err(|err| {
            ArmorError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height in points of every page, in page order, taken from
    /// each page's (possibly inherited) /MediaBox.
    pub fn page_sizes(&self) -> Result<Vec<(f32, f32)>, ArmorError> {
        // get_pages() is a BTreeMap keyed by 1-indexed page number.
        self.document
            .get_pages()
            .into_iter()
            .map(|(page_number, page_id)| {
                let media_box = self.media_box(page_id).ok_or_else(|| {
                    ArmorError::PdfError(format!("page {} has no /MediaBox", page_number))
                })?;
                Ok((media_box[2] - media_box[0], media_box[3] - media_box[1]))
            })
            .collect()
    }

    // -- Helpers --------------------------------------------------------------

    /// Walk from the page up through /Parent links until a /MediaBox is found.
    fn media_box(&self, page_id: ObjectId) -> Option<[f32; 4]> {
        let mut current = self.document.get_dictionary(page_id).ok();
        while let Some(dict) = current {
            if let Some(rect) = dict.get(b"MediaBox").ok().and_then(|obj| self.read_rect(obj)) {
                return Some(rect);
            }
            current = match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => self.document.get_dictionary(*parent).ok(),
                _ => None,
            };
        }
        None
    }

    fn read_rect(&self, object: &Object) -> Option<[f32; 4]> {
        let resolved = match object {
            Object::Reference(id) => self.document.get_object(*id).ok()?,
            other => other,
        };
        let values = resolved.as_array().ok()?;
        if values.len() != 4 {
            return None;
        }
        let mut rect = [0.0f32; 4];
        for (slot, value) in rect.iter_mut().zip(values) {
            *slot = value.as_float().ok()?;
        }
        Some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_a_pdf_error() {
        let result = PdfReader::from_bytes(b"not a pdf at all");
        assert!(matches!(result, Err(ArmorError::PdfError(_))));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON envelope for handing a hardened PDF to callers that expect text.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use pagearmor_core::HardenedDocument;
use pagearmor_core::error::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope {
    pub filename: String,
    pub generated_at: DateTime<Utc>,
    pub fingerprint: String,
    pub pages: usize,
    pub pdf_base64: String,
}

impl Envelope {
    pub fn new(filename: impl Into<String>, document: &HardenedDocument) -> Self {
        Self {
            filename: filename.into(),
            generated_at: Utc::now(),
            fingerprint: document.fingerprint.to_string(),
            pages: document.page_count,
            pdf_base64: STANDARD.encode(&document.bytes),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Name offered for the hardened copy of `input_name`.
pub fn protected_filename(input_name: &str) -> String {
    let stem = input_name
        .rsplit_once('.')
        .map_or(input_name, |(stem, _)| stem);
    let stem = if stem.is_empty() { "document" } else { stem };
    format!("{stem}-protected.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagearmor_core::Fingerprint;

    #[test]
    fn envelope_carries_decodable_pdf() {
        let document = HardenedDocument {
            bytes: b"%PDF-1.4 body".to_vec(),
            fingerprint: Fingerprint::new("feedfacecafebeef", "0123456789abcdef"),
            page_count: 3,
        };
        let json = Envelope::new("report-protected.pdf", &document).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["filename"], "report-protected.pdf");
        assert_eq!(value["fingerprint"], "feedfacecafebeef-0123456789abcdef");
        assert_eq!(value["pages"], 3);
        assert!(value["generated_at"].is_string());
        let pdf = STANDARD.decode(value["pdf_base64"].as_str().unwrap()).unwrap();
        assert_eq!(pdf, document.bytes);
    }

    #[test]
    fn protected_filename_replaces_extension() {
        assert_eq!(protected_filename("report.pdf"), "report-protected.pdf");
        assert_eq!(protected_filename("scan.v2.png"), "scan.v2-protected.pdf");
        assert_eq!(protected_filename("notes"), "notes-protected.pdf");
        assert_eq!(protected_filename(".pdf"), "document-protected.pdf");
    }
}

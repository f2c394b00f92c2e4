//! Scan sources: where point ids come from.
//!
//! The session manager only ever sees a point id string. How that string
//! is obtained (camera QR decoding, an NFC tag, or a test button) lives
//! behind [`Scanner`], and the application picks a variant at runtime with
//! [`select_scanner`].

mod ndef;

use std::collections::VecDeque;

pub use ndef::decode_ndef_text;

/// Errors from turning a raw scan into a point id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("scan payload is empty")]
    Empty,

    #[error("NFC payload is truncated: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("NFC payload is not valid {0} text")]
    Encoding(&'static str),

    #[error("invalid hex payload: {0}")]
    Hex(String),
}

/// The kinds of scan source an application can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScannerKind {
    /// A camera reading QR codes.
    Camera,

    /// An NFC reader reading NDEF text records.
    Nfc,

    /// Point ids fed in by hand, for testing without hardware.
    Simulated,
}

/// A source of point ids.
pub trait Scanner {
    fn kind(&self) -> ScannerKind;

    /// The next scanned point id, or `None` when the source is exhausted.
    fn next_point_id(&mut self) -> Option<Result<String, ScanError>>;
}

/// A scanner fed from a queue of point ids.
#[derive(Debug, Default, Clone)]
pub struct SimulatedScanner {
    queue: VecDeque<String>,
}

impl SimulatedScanner {
    pub fn new<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            queue: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, point_id: impl Into<String>) {
        self.queue.push_back(point_id.into());
    }
}

impl Scanner for SimulatedScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::Simulated
    }

    fn next_point_id(&mut self) -> Option<Result<String, ScanError>> {
        self.queue.pop_front().map(|raw| decode_qr_payload(&raw))
    }
}

/// A scanner over raw QR payloads, as delivered by a camera decoder.
#[derive(Debug, Default, Clone)]
pub struct QrScanner {
    payloads: VecDeque<String>,
}

impl QrScanner {
    pub fn new<I, T>(payloads: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            payloads: payloads.into_iter().map(Into::into).collect(),
        }
    }
}

impl Scanner for QrScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::Camera
    }

    fn next_point_id(&mut self) -> Option<Result<String, ScanError>> {
        self.payloads.pop_front().map(|raw| decode_qr_payload(&raw))
    }
}

/// A scanner over raw NDEF text record payloads, as read from NFC tags.
#[derive(Debug, Default, Clone)]
pub struct NfcScanner {
    records: VecDeque<Vec<u8>>,
}

impl NfcScanner {
    pub fn new(records: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }
}

impl Scanner for NfcScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::Nfc
    }

    fn next_point_id(&mut self) -> Option<Result<String, ScanError>> {
        self.records
            .pop_front()
            .map(|record| decode_ndef_text(&record).and_then(|text| decode_qr_payload(&text)))
    }
}

/// A QR payload is the point id itself, give or take surrounding whitespace.
pub fn decode_qr_payload(raw: &str) -> Result<String, ScanError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ScanError::Empty);
    }
    Ok(id.to_string())
}

/// Parses a hex string (whitespace allowed) into NFC record bytes.
pub fn parse_hex_payload(s: &str) -> Result<Vec<u8>, ScanError> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(compact).map_err(|e| ScanError::Hex(e.to_string()))
}

/// What the device can do, as detected by the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub camera: bool,
    pub nfc: bool,

    /// Use NFC over the camera when both are present.
    pub prefer_nfc: bool,
}

/// Picks the scanner variant for the detected capabilities.
///
/// Falls back to [`ScannerKind::Simulated`] when no hardware is available.
pub fn select_scanner(caps: Capabilities) -> ScannerKind {
    if caps.nfc && (caps.prefer_nfc || !caps.camera) {
        ScannerKind::Nfc
    } else if caps.camera {
        ScannerKind::Camera
    } else {
        ScannerKind::Simulated
    }
}

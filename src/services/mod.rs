// AI Content Detector Services
// Extraction, scoring and the collaborators the boundary depends on

pub mod text_extractor;
pub mod document;
pub mod detection;
pub mod store;
pub mod notifier;
pub mod clock;

pub use text_extractor::*;
pub use document::{DocumentSource, ExtractionError, FileDocument, StaticDocument};
pub use notifier::{EventNotifier, LogNotifier, Notifier};
pub use clock::{Clock, FixedClock, SystemClock};
pub use store::{
    DetectionRepository, JsonFileStore, KeyValueStore, MemoryStore, StoreError,
    StoredDetectionData, ALERT_CAPACITY,
};

// Re-export detection module functions
pub use detection::{
    analyze_sample,
    analyze_text,
    derive_detection,
    ScanReport,
};

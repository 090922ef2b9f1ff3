// AI Content Detector API
// Boundary protocol, message relay and the services behind it

pub mod background;
pub mod content;
pub mod dashboard;
pub mod error;
pub mod protocol;
pub mod router;

pub use background::BackgroundService;
pub use content::ContentAnalyzer;
pub use dashboard::{format_timestamp, DashboardController, DashboardSnapshot, ScanOutcome, ScanTarget};
pub use error::ServiceError;
pub use protocol::{parse_request, Request, Response, KNOWN_ACTIONS};
pub use router::{ServiceHandle, ServiceRouter};

//! JSON/HTTP client for the curriculum backend.
//!
//! Every remote call flows through one `ApiClient` wrapper and one
//! error-normalization function, so per-entity call sites never hand-roll
//! envelope unwrapping or ad hoc error parsing.
mod client;
mod error;
pub mod routes;
mod transport;
mod types;

pub use client::{ApiClient, TokenPair};
pub use error::{normalize_error_body, ApiError};
pub use transport::{ApiRequest, ApiResponse, Method, Transport, UreqTransport};
pub use types::{
    AnalysisDto, AssignmentDto, BibliographyDto, CpmkDto, Created, Envelope, GradingRowDto,
    ListData, RefreshedTokens, RpsDocument, SubCpmkDto, WeeklyPlanDto,
};

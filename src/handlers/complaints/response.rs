//! Complaint response DTOs
//!
//! Bulk, page and stats bodies come straight from the service.

pub use crate::services::complaint_service::{
    BulkCreateResult, BulkUpdateResult, ComplaintPage, ComplaintStats,
};

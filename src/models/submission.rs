//! Submission domain models and DTOs.
//!
//! Every form type shares this row shape; the table it lives in comes from
//! the form registry.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Workflow status of a submission.
///
/// The machine: a submission enters review on submit; a reviewer either
/// approves it or sends it back; a send-back row is the user's open draft
/// and returns to review on the next submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReviewStatus {
    #[serde(rename = "review")]
    UnderReview,
    #[serde(rename = "Needs revision")]
    NeedsRevision,
    #[serde(rename = "approved")]
    Approved,
}

impl ReviewStatus {
    /// Wire/database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnderReview => "review",
            Self::NeedsRevision => "Needs revision",
            Self::Approved => "approved",
        }
    }

    /// Parse the wire/database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "review" => Some(Self::UnderReview),
            "Needs revision" => Some(Self::NeedsRevision),
            "approved" => Some(Self::Approved),
            _ => None,
        }
    }

    /// Whether `next` is a legal transition from this status.
    /// Reviewers move UnderReview forward; a resubmission reopens a
    /// NeedsRevision row back to UnderReview.
    pub fn can_transition_to(&self, next: ReviewStatus) -> bool {
        matches!(
            (self, next),
            (Self::UnderReview, Self::NeedsRevision)
                | (Self::UnderReview, Self::Approved)
                | (Self::NeedsRevision, Self::UnderReview)
        )
    }
}

/// A full submission row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Submission {
    pub id: i64,
    pub policy_title: Option<String>,
    pub review_date: Option<String>,
    pub upload_date: Option<String>,
    pub reviewed_by: Option<String>,
    pub review_status: ReviewStatus,
    pub comments: Option<String>,
    pub user_id: String,
    pub uploaded_by: Option<String>,
    pub submission_time: Option<String>,
    pub modified_on: Option<String>,
    pub modified_by: Option<String>,
    pub file_name: Option<String>,
    pub file_id: Option<String>,
}

/// Summary projection for the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionSummary {
    pub id: i64,
    pub policy_title: Option<String>,
    pub submission_time: Option<String>,
}

/// Form fields accepted by create-or-revise.
#[derive(Debug, Clone, Default)]
pub struct SubmissionFields {
    pub policy_title: Option<String>,
    pub comments: Option<String>,
}

/// Reviewer update request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewUpdateRequest {
    pub policy_title: Option<String>,
    pub review_date: Option<String>,
    pub review_status: String,
    pub comments: Option<String>,
    pub reviewed_by: Option<String>,
}

/// Attachment binding in the `file_info` side table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileInfo {
    pub file_id: String,
    pub original_filename: String,
    pub user_id: String,
    pub form_id: i64,
    pub form_type: String,
}

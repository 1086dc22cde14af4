//! Service record status and its lifecycle graph.

use crate::transition::Lifecycle;

define_label! {
    /// Progress of the work described by a service record.
    #[derive(Default)]
    ServiceRecordStatus for "status" {
        Scheduled => "scheduled",
        InProgress => "in_progress",
        /// Default for records entered directly after the visit.
        #[default]
        Completed => "completed",
        /// Work paused until parts arrive. Also used to flag records for review.
        PendingParts => "pending_parts",
        FollowUpRequired => "follow_up_required",
        Cancelled => "cancelled",
    }
}

impl Lifecycle for ServiceRecordStatus {
    const ENTITY: &'static str = "ServiceRecord";

    fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Scheduled => &[Self::InProgress, Self::Cancelled, Self::Completed],
            Self::InProgress => &[Self::Completed, Self::PendingParts, Self::FollowUpRequired],
            Self::Completed => &[Self::FollowUpRequired],
            Self::Cancelled => &[],
            Self::PendingParts => &[Self::InProgress, Self::Completed],
            Self::FollowUpRequired => &[Self::Scheduled, Self::Completed],
        }
    }
}

//! Webhook merge policy
//!
//! Provider webhooks arrive at-least-once and unordered, each carrying only
//! the subset of fields known at that point in the call lifecycle. This
//! module defines how such a partial event folds into an existing record:
//! for every field, keep the stored value when the event carries nothing for
//! it, otherwise take the event's value.
//!
//! For `status` this means last-write-observed. The provider supplies no
//! sequence number, so if two status callbacks race over independent
//! connections the final label is whichever merge committed last. Accepted
//! limitation; in practice status callbacks arrive in call-progress order.
//! For the fill-once fields (duration, recording URL, IVR selection) the rule
//! prevents a later, less-informative event from blanking a known value.

use crate::models::CallRecord;
use serde::{Deserialize, Serialize};

/// Partial update extracted from a single webhook event
///
/// `None` means the event carried no information for that field, never
/// "clear the field".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPatch {
    pub phone_number: Option<String>,
    pub status: Option<String>,
    pub duration: Option<i32>,
    pub recording_url: Option<String>,
    pub ivr_selection: Option<String>,
}

impl CallPatch {
    /// True when the event carried no usable fields at all
    pub fn is_empty(&self) -> bool {
        self.phone_number.is_none()
            && self.status.is_none()
            && self.duration.is_none()
            && self.recording_url.is_none()
            && self.ivr_selection.is_none()
    }

    /// Fold this patch into a record, returning whether anything changed
    ///
    /// `updated_at` is owned by the store (bumped on every merge) and is not
    /// touched here.
    pub fn apply_to(&self, record: &mut CallRecord) -> bool {
        let mut changed = false;

        changed |= merge_field(&mut record.phone_number, &self.phone_number);
        changed |= merge_field(&mut record.status, &self.status);
        changed |= merge_field(&mut record.duration, &self.duration);
        changed |= merge_field(&mut record.recording_url, &self.recording_url);
        changed |= merge_field(&mut record.ivr_selection, &self.ivr_selection);

        changed
    }
}

/// Replace `existing` with `incoming` when the event carries a value,
/// keep `existing` otherwise.
fn merge_field<T: Clone + PartialEq>(existing: &mut Option<T>, incoming: &Option<T>) -> bool {
    match incoming {
        Some(value) if existing.as_ref() != Some(value) => {
            *existing = Some(value.clone());
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Department;
    use chrono::Utc;

    fn blank_record(call_sid: &str) -> CallRecord {
        let now = Utc::now();
        CallRecord {
            call_sid: call_sid.to_string(),
            customer_name: None,
            phone_number: None,
            department: None,
            status: None,
            duration: None,
            recording_url: None,
            ivr_selection: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn initiated_record(call_sid: &str) -> CallRecord {
        let mut record = blank_record(call_sid);
        record.customer_name = Some("Priya".to_string());
        record.phone_number = Some("+15550001111".to_string());
        record.department = Some(Department::Support);
        record.status = Some("initiated".to_string());
        record
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut record = initiated_record("CA1");
        let before = record.clone();

        let patch = CallPatch::default();
        assert!(patch.is_empty());
        assert!(!patch.apply_to(&mut record));

        assert_eq!(record.status, before.status);
        assert_eq!(record.phone_number, before.phone_number);
    }

    #[test]
    fn test_merge_never_regresses_known_fields() {
        let mut record = initiated_record("CA1");
        record.duration = Some(42);
        record.recording_url = Some("https://x/rec.mp3".to_string());
        record.ivr_selection = Some("1".to_string());

        // A pure status event carries nothing for the other fields
        let patch = CallPatch {
            status: Some("completed".to_string()),
            ..Default::default()
        };
        patch.apply_to(&mut record);

        assert_eq!(record.status.as_deref(), Some("completed"));
        assert_eq!(record.duration, Some(42));
        assert_eq!(record.recording_url.as_deref(), Some("https://x/rec.mp3"));
        assert_eq!(record.ivr_selection.as_deref(), Some("1"));
        assert_eq!(record.phone_number.as_deref(), Some("+15550001111"));
    }

    #[test]
    fn test_fill_once_fields_are_order_independent() {
        let sets = CallPatch {
            recording_url: Some("https://x/rec.mp3".to_string()),
            duration: Some(30),
            ivr_selection: Some("2".to_string()),
            ..Default::default()
        };
        let omits = CallPatch {
            status: Some("completed".to_string()),
            ..Default::default()
        };

        let mut forward = blank_record("CA1");
        sets.apply_to(&mut forward);
        omits.apply_to(&mut forward);

        let mut reverse = blank_record("CA1");
        omits.apply_to(&mut reverse);
        sets.apply_to(&mut reverse);

        assert_eq!(forward.recording_url, reverse.recording_url);
        assert_eq!(forward.duration, reverse.duration);
        assert_eq!(forward.ivr_selection, reverse.ivr_selection);
        assert_eq!(forward.recording_url.as_deref(), Some("https://x/rec.mp3"));
    }

    #[test]
    fn test_status_is_last_write_observed() {
        // Status is deliberately order-dependent: with no provider sequence
        // number, whichever merge applies last wins.
        let ringing = CallPatch {
            status: Some("ringing".to_string()),
            ..Default::default()
        };
        let completed = CallPatch {
            status: Some("completed".to_string()),
            ..Default::default()
        };

        let mut in_order = blank_record("CA1");
        ringing.apply_to(&mut in_order);
        completed.apply_to(&mut in_order);
        assert_eq!(in_order.status.as_deref(), Some("completed"));

        let mut reversed = blank_record("CA1");
        completed.apply_to(&mut reversed);
        ringing.apply_to(&mut reversed);
        assert_eq!(reversed.status.as_deref(), Some("ringing"));
    }

    #[test]
    fn test_duplicate_delivery_is_idempotent() {
        let patch = CallPatch {
            status: Some("completed".to_string()),
            duration: Some(42),
            ..Default::default()
        };

        let mut record = initiated_record("CA1");
        assert!(patch.apply_to(&mut record));
        let after_first = record.clone();

        // Provider retries the same callback
        assert!(!patch.apply_to(&mut record));
        assert_eq!(record.status, after_first.status);
        assert_eq!(record.duration, after_first.duration);
    }

    #[test]
    fn test_lifecycle_scenario() {
        // initiate -> ringing -> completed(42s) -> recording -> duplicate completed
        let mut record = initiated_record("CA123");

        CallPatch {
            status: Some("ringing".to_string()),
            ..Default::default()
        }
        .apply_to(&mut record);

        CallPatch {
            status: Some("completed".to_string()),
            duration: Some(42),
            ..Default::default()
        }
        .apply_to(&mut record);

        CallPatch {
            recording_url: Some("https://x/rec.mp3".to_string()),
            ..Default::default()
        }
        .apply_to(&mut record);

        CallPatch {
            status: Some("completed".to_string()),
            duration: Some(42),
            ..Default::default()
        }
        .apply_to(&mut record);

        assert_eq!(record.status.as_deref(), Some("completed"));
        assert_eq!(record.duration, Some(42));
        assert_eq!(record.recording_url.as_deref(), Some("https://x/rec.mp3"));
        assert_eq!(record.department, Some(Department::Support));
    }
}

//! Issue aggregate root.

use super::{
    EscalationLevel, IssueDomainError, IssueId, IssuePriority, IssueStatus, IssueVersion,
};
use crate::directory::domain::{Jurisdiction, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Maximum title length, matching the `VARCHAR(200)` column.
const MAX_TITLE_LENGTH: usize = 200;
/// Maximum location length, matching the `VARCHAR(255)` column.
const MAX_LOCATION_LENGTH: usize = 255;
/// Maximum length of each jurisdiction field, matching `VARCHAR(100)`.
const MAX_JURISDICTION_FIELD_LENGTH: usize = 100;
/// Maximum postal code length, matching the `VARCHAR(10)` column.
const MAX_PINCODE_LENGTH: usize = 10;

/// Citizen-supplied fields for a new issue report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    title: String,
    description: String,
    location: String,
    jurisdiction: Jurisdiction,
    pincode: Option<String>,
    priority: IssuePriority,
}

impl IssueDraft {
    /// Creates a draft with the required free-text fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            location: location.into(),
            jurisdiction: Jurisdiction::new(),
            pincode: None,
            priority: IssuePriority::default(),
        }
    }

    /// Sets the routing jurisdiction.
    #[must_use]
    pub fn with_jurisdiction(mut self, jurisdiction: Jurisdiction) -> Self {
        self.jurisdiction = jurisdiction;
        self
    }

    /// Sets the postal code.
    #[must_use]
    pub fn with_pincode(mut self, pincode: impl Into<String>) -> Self {
        self.pincode = Some(pincode.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: IssuePriority) -> Self {
        self.priority = priority;
        self
    }
}

/// Issue aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    id: IssueId,
    title: String,
    description: String,
    location: String,
    jurisdiction: Jurisdiction,
    pincode: Option<String>,
    status: IssueStatus,
    priority: IssuePriority,
    escalation_level: EscalationLevel,
    last_escalated_at: Option<DateTime<Utc>>,
    reported_by: UserId,
    assigned_to: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: IssueVersion,
}

/// Parameter object for reconstructing a persisted issue aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIssueData {
    /// Persisted issue identifier.
    pub id: IssueId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted free-text location.
    pub location: String,
    /// Persisted routing jurisdiction.
    pub jurisdiction: Jurisdiction,
    /// Persisted postal code.
    pub pincode: Option<String>,
    /// Persisted status.
    pub status: IssueStatus,
    /// Persisted priority.
    pub priority: IssuePriority,
    /// Persisted escalation level.
    pub escalation_level: EscalationLevel,
    /// Persisted timestamp of the last scheduled escalation.
    pub last_escalated_at: Option<DateTime<Utc>>,
    /// Persisted reporting citizen.
    pub reported_by: UserId,
    /// Persisted assignee, if any.
    pub assigned_to: Option<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted concurrency token.
    pub version: IssueVersion,
}

impl Issue {
    /// Creates a newly reported issue in status `OPEN` at the Taluka tier.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyTitle`] or
    /// [`IssueDomainError::TitleTooLong`] when the title is invalid, and
    /// [`IssueDomainError::FieldTooLong`] when the location, a jurisdiction
    /// field, or the pincode exceeds its storage limit.
    pub fn report(
        draft: IssueDraft,
        reported_by: UserId,
        clock: &impl Clock,
    ) -> Result<Self, IssueDomainError> {
        let IssueDraft {
            title: raw_title,
            description,
            location,
            jurisdiction,
            pincode,
            priority,
        } = draft;

        let title = raw_title.trim();
        if title.is_empty() {
            return Err(IssueDomainError::EmptyTitle);
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(IssueDomainError::TitleTooLong);
        }
        ensure_fits("location", Some(location.as_str()), MAX_LOCATION_LENGTH)?;
        ensure_fits("state", jurisdiction.state(), MAX_JURISDICTION_FIELD_LENGTH)?;
        ensure_fits("district", jurisdiction.district(), MAX_JURISDICTION_FIELD_LENGTH)?;
        ensure_fits("taluka", jurisdiction.taluka(), MAX_JURISDICTION_FIELD_LENGTH)?;
        ensure_fits("pincode", pincode.as_deref(), MAX_PINCODE_LENGTH)?;

        let timestamp = clock.utc();
        Ok(Self {
            id: IssueId::new(),
            title: title.to_owned(),
            description,
            location,
            jurisdiction,
            pincode,
            status: IssueStatus::Open,
            priority,
            escalation_level: EscalationLevel::Taluka,
            last_escalated_at: None,
            reported_by,
            assigned_to: None,
            created_at: timestamp,
            updated_at: timestamp,
            version: IssueVersion::INITIAL,
        })
    }

    /// Reconstructs an issue from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIssueData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            location: data.location,
            jurisdiction: data.jurisdiction,
            pincode: data.pincode,
            status: data.status,
            priority: data.priority,
            escalation_level: data.escalation_level,
            last_escalated_at: data.last_escalated_at,
            reported_by: data.reported_by,
            assigned_to: data.assigned_to,
            created_at: data.created_at,
            updated_at: data.updated_at,
            version: data.version,
        }
    }

    /// Returns the issue identifier.
    #[must_use]
    pub const fn id(&self) -> IssueId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the free-text location.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the routing jurisdiction.
    #[must_use]
    pub const fn jurisdiction(&self) -> &Jurisdiction {
        &self.jurisdiction
    }

    /// Returns the postal code, if any.
    #[must_use]
    pub fn pincode(&self) -> Option<&str> {
        self.pincode.as_deref()
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> IssueStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> IssuePriority {
        self.priority
    }

    /// Returns the current escalation level.
    #[must_use]
    pub const fn escalation_level(&self) -> EscalationLevel {
        self.escalation_level
    }

    /// Returns when the scheduler last escalated the issue.
    #[must_use]
    pub const fn last_escalated_at(&self) -> Option<DateTime<Utc>> {
        self.last_escalated_at
    }

    /// Returns the reporting citizen.
    #[must_use]
    pub const fn reported_by(&self) -> UserId {
        self.reported_by
    }

    /// Returns the current assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the concurrency token.
    #[must_use]
    pub const fn version(&self) -> IssueVersion {
        self.version
    }

    /// Returns the tier directly above the current one.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::ResolvedIssue`] for resolved issues and
    /// [`IssueDomainError::FinalLevelReached`] at the State tier.
    pub fn next_escalation_level(&self) -> Result<EscalationLevel, IssueDomainError> {
        if self.status == IssueStatus::Resolved {
            return Err(IssueDomainError::ResolvedIssue(self.id));
        }
        self.escalation_level
            .next()
            .ok_or(IssueDomainError::FinalLevelReached(self.id))
    }

    /// Validates that `target` is exactly one tier above the current level.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::InvalidTransition`] when `target` is not
    /// the next tier, plus the errors of
    /// [`next_escalation_level`](Self::next_escalation_level).
    pub fn ensure_can_escalate_to(&self, target: EscalationLevel) -> Result<(), IssueDomainError> {
        let next = self.next_escalation_level()?;
        if next != target {
            return Err(IssueDomainError::InvalidTransition {
                issue_id: self.id,
                from: self.escalation_level,
                to: target,
            });
        }
        Ok(())
    }

    /// Applies a time-driven escalation.
    ///
    /// Moves the issue to `target`, stamps `last_escalated_at`, sets the
    /// status to `ESCALATED`, and reassigns the issue when an assignee was
    /// resolved. Without an assignee the previous assignment is kept.
    ///
    /// # Errors
    ///
    /// Returns the errors of
    /// [`ensure_can_escalate_to`](Self::ensure_can_escalate_to); the issue is
    /// left untouched on error.
    pub fn apply_scheduled_escalation(
        &mut self,
        target: EscalationLevel,
        assignee: Option<UserId>,
        escalated_at: DateTime<Utc>,
    ) -> Result<(), IssueDomainError> {
        self.ensure_can_escalate_to(target)?;
        self.escalation_level = target;
        self.last_escalated_at = Some(escalated_at);
        self.status = IssueStatus::Escalated;
        if let Some(assignee_id) = assignee {
            self.assigned_to = Some(assignee_id);
        }
        self.updated_at = escalated_at;
        self.version = self.version.next();
        Ok(())
    }

    /// Applies a representative-initiated escalation.
    ///
    /// Only the level moves; status, assignee, and `last_escalated_at` are
    /// left as they are.
    ///
    /// # Errors
    ///
    /// Returns the errors of
    /// [`next_escalation_level`](Self::next_escalation_level); the issue is
    /// left untouched on error.
    pub fn apply_manual_escalation(
        &mut self,
        clock: &impl Clock,
    ) -> Result<EscalationLevel, IssueDomainError> {
        let target = self.next_escalation_level()?;
        self.escalation_level = target;
        self.touch(clock);
        Ok(target)
    }

    /// Sets the status on behalf of a representative.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::ReservedStatus`] for `ESCALATED`, which
    /// only the escalation engine may set.
    pub fn update_status(
        &mut self,
        status: IssueStatus,
        clock: &impl Clock,
    ) -> Result<(), IssueDomainError> {
        if status == IssueStatus::Escalated {
            return Err(IssueDomainError::ReservedStatus(status));
        }
        self.status = status;
        self.touch(clock);
        Ok(())
    }

    /// Updates the `updated_at` timestamp and advances the version.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
        self.version = self.version.next();
    }
}

fn ensure_fits(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), IssueDomainError> {
    match value {
        Some(text) if text.chars().count() > max => {
            Err(IssueDomainError::FieldTooLong { field, max })
        }
        _ => Ok(()),
    }
}

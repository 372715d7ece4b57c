//! Duty business logic - Handles the catalogue of duty types.
//!
//! Duty labels are compared ignoring case: "Main Gate Security" and "main gate security"
//! name the same duty. Deleting a duty removes every assignment that referenced it.

use crate::{
    core::require_text,
    entities::{Assignment, Duty, assignment, duty},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, QueryTrait, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{info, instrument};

/// Fields of a duty as supplied by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutyInput {
    /// Duty label
    pub duty_type: String,
    /// Longer description
    pub description: String,
    /// Whether the duty is a standing one
    pub is_permanent: bool,
}

/// Lists duties ordered by label, optionally narrowed by a search term and permanence.
///
/// The search term matches the label or the description.
pub async fn list_duties(
    db: &DatabaseConnection,
    search: Option<&str>,
    permanent: Option<bool>,
) -> Result<Vec<duty::Model>> {
    Duty::find()
        .apply_if(search, |query, term| {
            query.filter(
                Condition::any()
                    .add(duty::Column::DutyType.contains(term))
                    .add(duty::Column::Description.contains(term)),
            )
        })
        .apply_if(permanent, |query, flag| {
            query.filter(duty::Column::IsPermanent.eq(flag))
        })
        .order_by_asc(duty::Column::DutyType)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a duty by primary key.
pub async fn get_duty_by_id(db: &DatabaseConnection, duty_id: i64) -> Result<Option<duty::Model>> {
    Duty::find_by_id(duty_id).one(db).await.map_err(Into::into)
}

/// Finds a duty whose label equals `duty_type` ignoring case.
pub async fn find_duty_by_type(
    db: &DatabaseConnection,
    duty_type: &str,
) -> Result<Option<duty::Model>> {
    let wanted = duty_type.trim().to_lowercase();
    let duties = Duty::find().all(db).await?;
    Ok(duties
        .into_iter()
        .find(|duty| duty.duty_type.to_lowercase() == wanted))
}

/// Creates a new duty type.
///
/// # Errors
/// - [`Error::Validation`] if the label or description is empty
/// - [`Error::DuplicateDutyType`] if a duty with the same label exists
#[instrument(skip(db))]
pub async fn create_duty(db: &DatabaseConnection, input: DutyInput) -> Result<duty::Model> {
    let duty_type = require_text("duty_type", &input.duty_type)?;
    let description = require_text("duty_description", &input.description)?;

    if let Some(existing) = find_duty_by_type(db, &duty_type).await? {
        return Err(Error::DuplicateDutyType {
            duty_type,
            existing_id: existing.id,
        });
    }

    let now = chrono::Utc::now().naive_utc();
    let duty = duty::ActiveModel {
        duty_type: Set(duty_type),
        description: Set(description),
        is_permanent: Set(input.is_permanent),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = duty.insert(db).await?;
    info!(id = model.id, duty_type = %model.duty_type, "Duty created");
    Ok(model)
}

/// Replaces a duty's label, description and permanence flag.
///
/// # Errors
/// - [`Error::Validation`] if the label or description is empty
/// - [`Error::DutyNotFound`] if the duty does not exist
/// - [`Error::DuplicateDutyType`] if another duty already uses the label
#[instrument(skip(db))]
pub async fn update_duty(
    db: &DatabaseConnection,
    duty_id: i64,
    input: DutyInput,
) -> Result<duty::Model> {
    let duty_type = require_text("duty_type", &input.duty_type)?;
    let description = require_text("duty_description", &input.description)?;

    let existing = get_duty_by_id(db, duty_id)
        .await?
        .ok_or(Error::DutyNotFound { id: duty_id })?;

    if let Some(other) = find_duty_by_type(db, &duty_type).await? {
        if other.id != duty_id {
            return Err(Error::DuplicateDutyType {
                duty_type,
                existing_id: other.id,
            });
        }
    }

    let mut active: duty::ActiveModel = existing.into();
    active.duty_type = Set(duty_type);
    active.description = Set(description);
    active.is_permanent = Set(input.is_permanent);
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    active.update(db).await.map_err(Into::into)
}

/// Deletes a duty together with every assignment of it.
///
/// # Errors
/// Returns [`Error::DutyNotFound`] if the duty does not exist.
#[instrument(skip(db))]
pub async fn delete_duty(db: &DatabaseConnection, duty_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let duty = Duty::find_by_id(duty_id)
        .one(&txn)
        .await?
        .ok_or(Error::DutyNotFound { id: duty_id })?;

    let removed = Assignment::delete_many()
        .filter(assignment::Column::DutyId.eq(duty_id))
        .exec(&txn)
        .await?;

    duty.delete(&txn).await?;
    txn.commit().await?;

    info!(
        id = duty_id,
        assignments_removed = removed.rows_affected,
        "Duty deleted"
    );
    Ok(())
}

/// Broad grouping of the duty catalogue, used to give administrators an overview.
///
/// Groups are independent keyword filters, so one duty can count towards several groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DutyCatalogSummary {
    /// Guard, security, gate and patrol duties
    pub guard: usize,
    /// Protection, bodyguard, escort and VIP duties
    pub bodyguard: usize,
    /// Desk, admin, filing and data work
    pub administrative: usize,
    /// Leave and vacation
    pub leave: usize,
    /// Training and courses
    pub training: usize,
    /// Special operations and investigations
    pub special: usize,
    /// Maintenance, equipment and cleaning
    pub maintenance: usize,
    /// Catalogue size minus the sum of all group counts, floored at zero
    pub other: usize,
}

const CATALOG_GROUPS: [(&str, &[&str]); 7] = [
    ("guard", &["guard", "security", "gate", "patrol"]),
    ("bodyguard", &["protection", "bodyguard", "escort", "vip"]),
    ("administrative", &["desk", "admin", "file", "data"]),
    ("leave", &["leave", "vacation"]),
    ("training", &["training", "course"]),
    ("special", &["special", "operation", "investigation"]),
    ("maintenance", &["maintenance", "equipment", "cleaning"]),
];

/// Counts the duties of a catalogue per broad group.
#[must_use]
pub fn summarize_catalog(duties: &[duty::Model]) -> DutyCatalogSummary {
    let mut counts = [0_usize; CATALOG_GROUPS.len()];
    for duty in duties {
        let label = duty.duty_type.to_lowercase();
        for (count, (_, keywords)) in counts.iter_mut().zip(CATALOG_GROUPS.iter()) {
            if keywords.iter().any(|keyword| label.contains(keyword)) {
                *count += 1;
            }
        }
    }

    let grouped: usize = counts.iter().sum();
    let [guard, bodyguard, administrative, leave, training, special, maintenance] = counts;
    DutyCatalogSummary {
        guard,
        bodyguard,
        administrative,
        leave,
        training,
        special,
        maintenance,
        other: duties.len().saturating_sub(grouped),
    }
}

//! Assignment business logic - Daily duty assignments and availability.
//!
//! An employee holds at most one duty per calendar date. The rule is enforced twice:
//! a lookup before every write produces a friendly conflict carrying the competing
//! assignment, and the unique index over (`date`, `employee_id`) settles races between
//! concurrent writers. A unique-index violation is reported as the same conflict.
//!
//! A duty may be held by several employees on the same date; nothing constrains
//! (`date`, `duty_id`).

use crate::{
    core::is_unique_violation,
    entities::{Assignment, Duty, Employee, assignment, duty, employee},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    FromQueryResult, JoinType, QueryOrder, QuerySelect, Select, Set,
    prelude::*,
    sea_query::Query,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// An assignment joined with the display fields of its duty and employee.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct AssignmentDetail {
    /// Assignment primary key
    pub id: i64,
    /// Roster date
    pub date: NaiveDate,
    /// Duty primary key
    pub duty_id: i64,
    /// Employee primary key
    pub employee_id: i64,
    /// Duty label
    pub duty_type: String,
    /// Duty description
    pub duty_description: String,
    /// Employee full name
    pub employee_name: String,
    /// Employee external code
    pub employee_code: String,
    /// Employee rank or designation
    pub designation: String,
    /// Employee contact number
    pub mobile_number: String,
}

/// Headcount figures for a single roster date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AssignmentStats {
    /// Number of assignments on the date
    pub total_assignments: u64,
    /// Number of distinct employees holding a duty on the date
    pub employees_assigned: u64,
    /// Employees without a duty on the date; never negative
    pub employees_available: u64,
    /// Number of employees on record
    pub total_employees: u64,
}

fn detail_query() -> Select<Assignment> {
    Assignment::find()
        .select_only()
        .column(assignment::Column::Id)
        .column(assignment::Column::Date)
        .column(assignment::Column::DutyId)
        .column(assignment::Column::EmployeeId)
        .column_as(duty::Column::DutyType, "duty_type")
        .column_as(duty::Column::Description, "duty_description")
        .column_as(employee::Column::Name, "employee_name")
        .column_as(employee::Column::EmployeeCode, "employee_code")
        .column_as(employee::Column::Designation, "designation")
        .column_as(employee::Column::MobileNumber, "mobile_number")
        .join(JoinType::InnerJoin, assignment::Relation::Duty.def())
        .join(JoinType::InnerJoin, assignment::Relation::Employee.def())
}

/// Lists every assignment on `date` with duty and employee details, ordered by duty label.
///
/// The ordering is a plain byte-wise comparison, so upper-case labels sort before
/// lower-case ones.
pub async fn get_assignments_for_date(
    db: &DatabaseConnection,
    date: NaiveDate,
) -> Result<Vec<AssignmentDetail>> {
    detail_query()
        .filter(assignment::Column::Date.eq(date))
        .order_by_asc(duty::Column::DutyType)
        .order_by_asc(assignment::Column::Id)
        .into_model::<AssignmentDetail>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads a single assignment with its display fields.
pub async fn get_assignment_detail(
    db: &DatabaseConnection,
    assignment_id: i64,
) -> Result<Option<AssignmentDetail>> {
    detail_query()
        .filter(assignment::Column::Id.eq(assignment_id))
        .into_model::<AssignmentDetail>()
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the assignment an employee holds on `date`, if any.
pub async fn get_assignment_for_employee(
    db: &DatabaseConnection,
    date: NaiveDate,
    employee_id: i64,
) -> Result<Option<AssignmentDetail>> {
    detail_query()
        .filter(assignment::Column::Date.eq(date))
        .filter(assignment::Column::EmployeeId.eq(employee_id))
        .into_model::<AssignmentDetail>()
        .one(db)
        .await
        .map_err(Into::into)
}

/// Computes assignment and availability counts for `date`.
pub async fn compute_stats(db: &DatabaseConnection, date: NaiveDate) -> Result<AssignmentStats> {
    let total_assignments = Assignment::find()
        .filter(assignment::Column::Date.eq(date))
        .count(db)
        .await?;

    let assigned_ids: Vec<i64> = Assignment::find()
        .select_only()
        .column(assignment::Column::EmployeeId)
        .filter(assignment::Column::Date.eq(date))
        .distinct()
        .into_tuple()
        .all(db)
        .await?;
    let employees_assigned = assigned_ids.len() as u64;

    let total_employees = Employee::find().count(db).await?;

    Ok(AssignmentStats {
        total_assignments,
        employees_assigned,
        employees_available: total_employees.saturating_sub(employees_assigned),
        total_employees,
    })
}

/// Lists employees with no assignment on `date`, ordered by name.
pub async fn get_available_employees(
    db: &DatabaseConnection,
    date: NaiveDate,
) -> Result<Vec<employee::Model>> {
    let assigned_on_date = Query::select()
        .column(assignment::Column::EmployeeId)
        .from(Assignment)
        .and_where(assignment::Column::Date.eq(date))
        .to_owned();

    Employee::find()
        .filter(employee::Column::Id.not_in_subquery(assigned_on_date))
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn ensure_references_exist(
    db: &DatabaseConnection,
    duty_id: i64,
    employee_id: i64,
) -> Result<()> {
    if Employee::find_by_id(employee_id).one(db).await?.is_none() {
        return Err(Error::EmployeeNotFound { id: employee_id });
    }
    if Duty::find_by_id(duty_id).one(db).await?.is_none() {
        return Err(Error::DutyNotFound { id: duty_id });
    }
    Ok(())
}

/// Builds the conflict error, attaching the competing assignment when it can be loaded.
async fn conflict(db: &DatabaseConnection, date: NaiveDate, employee_id: i64) -> Error {
    let existing = match get_assignment_for_employee(db, date, employee_id).await {
        Ok(found) => found.map(Box::new),
        Err(e) => {
            warn!("Could not load competing assignment: {}", e);
            None
        }
    };
    Error::AssignmentConflict {
        date,
        employee_id,
        existing,
    }
}

/// Inserts the assignment row. The unique index over (`date`, `employee_id`) is the final
/// word on double booking; a violation comes back as [`Error::AssignmentConflict`].
async fn insert_assignment(
    db: &DatabaseConnection,
    date: NaiveDate,
    duty_id: i64,
    employee_id: i64,
) -> Result<assignment::Model> {
    let new_assignment = assignment::ActiveModel {
        date: Set(date),
        duty_id: Set(duty_id),
        employee_id: Set(employee_id),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };

    match new_assignment.insert(db).await {
        Ok(model) => Ok(model),
        Err(err) if is_unique_violation(&err) => {
            warn!("Concurrent assignment rejected by unique index");
            Err(conflict(db, date, employee_id).await)
        }
        Err(err) => Err(err.into()),
    }
}

/// Writes a new duty and employee onto an existing row, with the same conflict mapping
/// as [`insert_assignment`].
async fn reassign(
    db: &DatabaseConnection,
    current: assignment::Model,
    duty_id: i64,
    employee_id: i64,
) -> Result<assignment::Model> {
    let date = current.date;
    let mut active: assignment::ActiveModel = current.into();
    active.duty_id = Set(duty_id);
    active.employee_id = Set(employee_id);

    match active.update(db).await {
        Ok(model) => Ok(model),
        Err(err) if is_unique_violation(&err) => {
            warn!("Concurrent reassignment rejected by unique index");
            Err(conflict(db, date, employee_id).await)
        }
        Err(err) => Err(err.into()),
    }
}

/// Assigns an employee to a duty on `date`.
///
/// # Errors
/// - [`Error::EmployeeNotFound`] / [`Error::DutyNotFound`] for dangling references
/// - [`Error::AssignmentConflict`] if the employee already holds a duty on `date`,
///   whether detected by the lookup or by the unique index
#[instrument(skip(db))]
pub async fn create_assignment(
    db: &DatabaseConnection,
    date: NaiveDate,
    duty_id: i64,
    employee_id: i64,
) -> Result<AssignmentDetail> {
    ensure_references_exist(db, duty_id, employee_id).await?;

    if let Some(existing) = get_assignment_for_employee(db, date, employee_id).await? {
        debug!(existing_id = existing.id, "Employee already assigned");
        return Err(Error::AssignmentConflict {
            date,
            employee_id,
            existing: Some(Box::new(existing)),
        });
    }

    let model = insert_assignment(db, date, duty_id, employee_id).await?;

    info!(id = model.id, %date, duty_id, employee_id, "Assignment created");
    get_assignment_detail(db, model.id)
        .await?
        .ok_or(Error::AssignmentNotFound { id: model.id })
}

/// Changes the duty and/or employee of an existing assignment. The date never changes.
///
/// # Errors
/// - [`Error::AssignmentNotFound`] if the assignment does not exist
/// - [`Error::EmployeeNotFound`] / [`Error::DutyNotFound`] for dangling references
/// - [`Error::AssignmentConflict`] if the employee holds a different assignment on the
///   same date
#[instrument(skip(db))]
pub async fn update_assignment(
    db: &DatabaseConnection,
    assignment_id: i64,
    duty_id: i64,
    employee_id: i64,
) -> Result<AssignmentDetail> {
    let current = Assignment::find_by_id(assignment_id)
        .one(db)
        .await?
        .ok_or(Error::AssignmentNotFound { id: assignment_id })?;

    ensure_references_exist(db, duty_id, employee_id).await?;

    let date = current.date;
    if let Some(other) = get_assignment_for_employee(db, date, employee_id).await? {
        if other.id != assignment_id {
            return Err(Error::AssignmentConflict {
                date,
                employee_id,
                existing: Some(Box::new(other)),
            });
        }
    }

    reassign(db, current, duty_id, employee_id).await?;

    info!(id = assignment_id, duty_id, employee_id, "Assignment updated");
    get_assignment_detail(db, assignment_id)
        .await?
        .ok_or(Error::AssignmentNotFound { id: assignment_id })
}

/// Removes an assignment, freeing the employee for that date.
///
/// # Errors
/// Returns [`Error::AssignmentNotFound`] if no assignment has this id.
#[instrument(skip(db))]
pub async fn delete_assignment(db: &DatabaseConnection, assignment_id: i64) -> Result<()> {
    let result = Assignment::delete_by_id(assignment_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::AssignmentNotFound { id: assignment_id });
    }
    info!(id = assignment_id, "Assignment deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_assignment_returns_joined_detail() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_custom_employee(&db, "E001", "Asha Rao", "Constable", "9812345678")
            .await?;
        let duty = create_custom_duty(&db, "Main Gate Security", "desc", true).await?;

        let detail = create_assignment(&db, date("2024-01-01"), duty.id, employee.id).await?;

        assert_eq!(detail.date, date("2024-01-01"));
        assert_eq!(detail.duty_type, "Main Gate Security");
        assert_eq!(detail.duty_description, "desc");
        assert_eq!(detail.employee_code, "E001");
        assert_eq!(detail.employee_name, "Asha Rao");
        assert_eq!(detail.designation, "Constable");
        assert_eq!(detail.mobile_number, "9812345678");
        Ok(())
    }

    #[tokio::test]
    async fn test_second_assignment_same_day_conflicts() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "E001", "Asha Rao").await?;
        let gate = create_test_duty(&db, "Main Gate Security").await?;
        let patrol = create_test_duty(&db, "Internal Patrol").await?;

        let first = create_assignment(&db, date("2024-01-01"), gate.id, employee.id).await?;

        for duty_id in [gate.id, patrol.id] {
            let result = create_assignment(&db, date("2024-01-01"), duty_id, employee.id).await;
            match result.unwrap_err() {
                Error::AssignmentConflict {
                    employee_id,
                    existing,
                    ..
                } => {
                    assert_eq!(employee_id, employee.id);
                    assert_eq!(existing.unwrap().id, first.id);
                }
                other => panic!("expected conflict, got {other:?}"),
            }
        }

        // Other dates are unaffected
        create_assignment(&db, date("2024-01-02"), patrol.id, employee.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_duty_can_be_shared_on_same_day() -> Result<()> {
        let db = setup_test_db().await?;
        let asha = create_test_employee(&db, "E001", "Asha Rao").await?;
        let vikram = create_test_employee(&db, "E002", "Vikram Singh").await?;
        let gate = create_test_duty(&db, "Main Gate Security").await?;

        create_assignment(&db, date("2024-01-01"), gate.id, asha.id).await?;
        create_assignment(&db, date("2024-01-01"), gate.id, vikram.id).await?;

        assert_eq!(get_assignments_for_date(&db, date("2024-01-01")).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_unique_index_violation_on_insert_is_conflict() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "E001", "Asha Rao").await?;
        let gate = create_test_duty(&db, "Main Gate Security").await?;
        let patrol = create_test_duty(&db, "Night Patrol").await?;
        let first = create_assignment(&db, date("2024-01-01"), gate.id, employee.id).await?;

        // Skips the lookup, as a writer racing the first one would
        let result = insert_assignment(&db, date("2024-01-01"), patrol.id, employee.id).await;
        match result.unwrap_err() {
            Error::AssignmentConflict {
                date: on,
                employee_id,
                existing,
            } => {
                assert_eq!(on, date("2024-01-01"));
                assert_eq!(employee_id, employee.id);
                assert_eq!(existing.unwrap().id, first.id);
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        assert_eq!(get_assignments_for_date(&db, date("2024-01-01")).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_unique_index_violation_on_reassign_is_conflict() -> Result<()> {
        let db = setup_test_db().await?;
        let asha = create_test_employee(&db, "E001", "Asha Rao").await?;
        let vikram = create_test_employee(&db, "E002", "Vikram Singh").await?;
        let gate = create_test_duty(&db, "Main Gate Security").await?;
        let first = create_assignment(&db, date("2024-01-01"), gate.id, asha.id).await?;
        let second = create_assignment(&db, date("2024-01-01"), gate.id, vikram.id).await?;

        let current = Assignment::find_by_id(second.id).one(&db).await?.unwrap();
        let result = reassign(&db, current, gate.id, asha.id).await;
        match result.unwrap_err() {
            Error::AssignmentConflict { existing, .. } => {
                assert_eq!(existing.unwrap().id, first.id);
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        let unchanged = get_assignment_detail(&db, second.id).await?.unwrap();
        assert_eq!(unchanged.employee_id, vikram.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_assignment_missing_references() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "E001", "Asha Rao").await?;
        let duty = create_test_duty(&db, "Main Gate Security").await?;

        let result = create_assignment(&db, date("2024-01-01"), duty.id, 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::EmployeeNotFound { id: 999 }
        ));

        let result = create_assignment(&db, date("2024-01-01"), 555, employee.id).await;
        assert!(matches!(result.unwrap_err(), Error::DutyNotFound { id: 555 }));

        assert!(get_assignments_for_date(&db, date("2024-01-01")).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_orders_by_duty_label_case_sensitive() -> Result<()> {
        let db = setup_test_db().await?;
        let labels = ["Zone Patrol", "armory watch", "Back Gate Guard"];
        for (index, label) in labels.iter().enumerate() {
            let employee =
                create_test_employee(&db, &format!("E00{index}"), &format!("Officer {index}"))
                    .await?;
            let duty = create_test_duty(&db, label).await?;
            create_assignment(&db, date("2024-03-05"), duty.id, employee.id).await?;
        }

        let ordered: Vec<String> = get_assignments_for_date(&db, date("2024-03-05"))
            .await?
            .into_iter()
            .map(|a| a.duty_type)
            .collect();
        assert_eq!(ordered, ["Back Gate Guard", "Zone Patrol", "armory watch"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_available_employees_exclude_assigned() -> Result<()> {
        let db = setup_test_db().await?;
        let vikram = create_test_employee(&db, "E002", "Vikram Singh").await?;
        let asha = create_test_employee(&db, "E001", "Asha Rao").await?;
        let meera = create_test_employee(&db, "E003", "Meera Gupta").await?;
        let duty = create_test_duty(&db, "Main Gate Security").await?;

        create_assignment(&db, date("2024-01-01"), duty.id, meera.id).await?;

        let available = get_available_employees(&db, date("2024-01-01")).await?;
        let ids: Vec<i64> = available.iter().map(|e| e.id).collect();
        assert_eq!(ids, [asha.id, vikram.id]);

        let assigned: Vec<i64> = get_assignments_for_date(&db, date("2024-01-01"))
            .await?
            .into_iter()
            .map(|a| a.employee_id)
            .collect();
        assert!(ids.iter().all(|id| !assigned.contains(id)));

        // A different date has everybody available
        assert_eq!(get_available_employees(&db, date("2024-01-02")).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_compute_stats() -> Result<()> {
        let db = setup_test_db().await?;
        let asha = create_test_employee(&db, "E001", "Asha Rao").await?;
        let vikram = create_test_employee(&db, "E002", "Vikram Singh").await?;
        create_test_employee(&db, "E003", "Meera Gupta").await?;
        let gate = create_test_duty(&db, "Main Gate Security").await?;

        let empty = compute_stats(&db, date("2024-01-01")).await?;
        assert_eq!(empty.total_assignments, 0);
        assert_eq!(empty.employees_assigned, 0);
        assert_eq!(empty.employees_available, 3);

        create_assignment(&db, date("2024-01-01"), gate.id, asha.id).await?;
        create_assignment(&db, date("2024-01-01"), gate.id, vikram.id).await?;

        let stats = compute_stats(&db, date("2024-01-01")).await?;
        assert_eq!(stats.total_assignments, 2);
        assert_eq!(stats.employees_assigned, 2);
        assert_eq!(stats.employees_available, 1);
        assert_eq!(
            stats.employees_available,
            stats.total_employees - stats.employees_assigned
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_restores_availability() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "E001", "Asha Rao").await?;
        let duty = create_test_duty(&db, "Main Gate Security").await?;
        let created = create_assignment(&db, date("2024-01-01"), duty.id, employee.id).await?;
        assert!(get_available_employees(&db, date("2024-01-01")).await?.is_empty());

        delete_assignment(&db, created.id).await?;

        assert!(get_assignments_for_date(&db, date("2024-01-01")).await?.is_empty());
        let available = get_available_employees(&db, date("2024-01-01")).await?;
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, employee.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_assignment_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "E001", "Asha Rao").await?;
        let duty = create_test_duty(&db, "Main Gate Security").await?;
        create_assignment(&db, date("2024-01-01"), duty.id, employee.id).await?;

        let result = delete_assignment(&db, 4242).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::AssignmentNotFound { id: 4242 }
        ));
        assert_eq!(get_assignments_for_date(&db, date("2024-01-01")).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_assignment_changes_duty_and_employee() -> Result<()> {
        let db = setup_test_db().await?;
        let asha = create_test_employee(&db, "E001", "Asha Rao").await?;
        let vikram = create_test_employee(&db, "E002", "Vikram Singh").await?;
        let gate = create_test_duty(&db, "Main Gate Security").await?;
        let escort = create_test_duty(&db, "VIP Escort Duty").await?;
        let created = create_assignment(&db, date("2024-01-01"), gate.id, asha.id).await?;

        // Same employee, new duty: colliding with itself is fine
        let updated = update_assignment(&db, created.id, escort.id, asha.id).await?;
        assert_eq!(updated.duty_type, "VIP Escort Duty");
        assert_eq!(updated.date, date("2024-01-01"));

        let reassigned = update_assignment(&db, created.id, escort.id, vikram.id).await?;
        assert_eq!(reassigned.employee_id, vikram.id);
        assert_eq!(
            get_available_employees(&db, date("2024-01-01")).await?[0].id,
            asha.id
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_update_assignment_conflicts_with_other_assignment() -> Result<()> {
        let db = setup_test_db().await?;
        let asha = create_test_employee(&db, "E001", "Asha Rao").await?;
        let vikram = create_test_employee(&db, "E002", "Vikram Singh").await?;
        let gate = create_test_duty(&db, "Main Gate Security").await?;
        let first = create_assignment(&db, date("2024-01-01"), gate.id, asha.id).await?;
        let second = create_assignment(&db, date("2024-01-01"), gate.id, vikram.id).await?;

        let result = update_assignment(&db, second.id, gate.id, asha.id).await;
        match result.unwrap_err() {
            Error::AssignmentConflict { existing, .. } => {
                assert_eq!(existing.unwrap().id, first.id);
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        let missing = update_assignment(&db, 999, gate.id, asha.id).await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::AssignmentNotFound { id: 999 }
        ));
        Ok(())
    }
}

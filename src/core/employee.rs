//! Employee business logic - Handles personnel records.
//!
//! Employees are identified externally by their `employee_code`, which is unique and
//! cannot be changed once created. Deleting an employee removes their assignments.

use crate::{
    core::{is_unique_violation, require_text},
    entities::{Assignment, Employee, assignment, employee},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Fields required to create an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    /// External identifier, unique across all employees
    pub employee_code: String,
    /// Full name
    pub name: String,
    /// Rank or designation
    pub designation: String,
    /// Contact number
    pub mobile_number: String,
}

/// Mutable employee fields. The employee code cannot change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeChanges {
    /// Full name
    pub name: String,
    /// Rank or designation
    pub designation: String,
    /// Contact number
    pub mobile_number: String,
}

/// Retrieves all employees ordered alphabetically by name.
pub async fn get_all_employees(db: &DatabaseConnection) -> Result<Vec<employee::Model>> {
    Employee::find()
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds employees whose name or code contains `term`, ordered by name.
pub async fn search_employees(
    db: &DatabaseConnection,
    term: &str,
) -> Result<Vec<employee::Model>> {
    Employee::find()
        .filter(
            Condition::any()
                .add(employee::Column::Name.contains(term))
                .add(employee::Column::EmployeeCode.contains(term)),
        )
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an employee by primary key.
pub async fn get_employee_by_id(
    db: &DatabaseConnection,
    employee_id: i64,
) -> Result<Option<employee::Model>> {
    Employee::find_by_id(employee_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an employee by external code.
pub async fn get_employee_by_code(
    db: &DatabaseConnection,
    employee_code: &str,
) -> Result<Option<employee::Model>> {
    Employee::find()
        .filter(employee::Column::EmployeeCode.eq(employee_code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new employee after validating that every field is present.
///
/// # Errors
/// - [`Error::Validation`] if a field is empty
/// - [`Error::DuplicateEmployeeCode`] if the code is already taken
#[instrument(skip(db))]
pub async fn create_employee(db: &DatabaseConnection, input: NewEmployee) -> Result<employee::Model> {
    let employee_code = require_text("employee_id", &input.employee_code)?;
    let name = require_text("name", &input.name)?;
    let designation = require_text("designation", &input.designation)?;
    let mobile_number = require_text("mobile_number", &input.mobile_number)?;

    if get_employee_by_code(db, &employee_code).await?.is_some() {
        return Err(Error::DuplicateEmployeeCode {
            code: employee_code,
        });
    }

    let now = chrono::Utc::now().naive_utc();
    let employee = employee::ActiveModel {
        employee_code: Set(employee_code.clone()),
        name: Set(name),
        designation: Set(designation),
        mobile_number: Set(mobile_number),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match employee.insert(db).await {
        Ok(model) => {
            info!(id = model.id, code = %model.employee_code, "Employee created");
            Ok(model)
        }
        Err(err) if is_unique_violation(&err) => Err(Error::DuplicateEmployeeCode {
            code: employee_code,
        }),
        Err(err) => Err(err.into()),
    }
}

/// Updates an employee's name, designation and contact number.
///
/// # Errors
/// - [`Error::Validation`] if a field is empty
/// - [`Error::EmployeeNotFound`] if the employee does not exist
#[instrument(skip(db))]
pub async fn update_employee(
    db: &DatabaseConnection,
    employee_id: i64,
    changes: EmployeeChanges,
) -> Result<employee::Model> {
    let name = require_text("name", &changes.name)?;
    let designation = require_text("designation", &changes.designation)?;
    let mobile_number = require_text("mobile_number", &changes.mobile_number)?;

    let existing = get_employee_by_id(db, employee_id)
        .await?
        .ok_or(Error::EmployeeNotFound { id: employee_id })?;

    let mut active: employee::ActiveModel = existing.into();
    active.name = Set(name);
    active.designation = Set(designation);
    active.mobile_number = Set(mobile_number);
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    active.update(db).await.map_err(Into::into)
}

/// Deletes an employee together with all of their assignments.
///
/// The foreign key also cascades; the explicit delete keeps the behaviour independent of
/// the connection's foreign-key pragma.
///
/// # Errors
/// Returns [`Error::EmployeeNotFound`] if the employee does not exist.
#[instrument(skip(db))]
pub async fn delete_employee(db: &DatabaseConnection, employee_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let employee = Employee::find_by_id(employee_id)
        .one(&txn)
        .await?
        .ok_or(Error::EmployeeNotFound { id: employee_id })?;

    let removed = Assignment::delete_many()
        .filter(assignment::Column::EmployeeId.eq(employee_id))
        .exec(&txn)
        .await?;

    employee.delete(&txn).await?;
    txn.commit().await?;

    info!(
        id = employee_id,
        assignments_removed = removed.rows_affected,
        "Employee deleted"
    );
    Ok(())
}

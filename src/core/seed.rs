//! Startup seeding of employees and duty types from the seed file.
//!
//! Seeding is idempotent per record: an employee whose code already exists and a duty whose
//! label already exists (ignoring case) are skipped, so running it on every start is safe.

use crate::{
    config::seed::SeedConfig,
    core::{
        duty::{DutyInput, create_duty, find_duty_by_type},
        employee::{NewEmployee, create_employee, get_employee_by_code},
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument};

/// Counts of records inserted and skipped by one seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Employees inserted by this run
    pub employees_created: usize,
    /// Employees whose code was already on record
    pub employees_skipped: usize,
    /// Duties inserted by this run
    pub duties_created: usize,
    /// Duties whose label (ignoring case) was already on record
    pub duties_skipped: usize,
}

/// Inserts the seed file's employees and duties that are not already present.
///
/// # Errors
/// Returns an error if a seed entry is invalid or the database fails.
#[instrument(skip_all)]
pub async fn seed_initial_data(db: &DatabaseConnection, config: &SeedConfig) -> Result<SeedSummary> {
    info!(
        employees = config.employees.len(),
        duties = config.duties.len(),
        "Seeding initial data"
    );
    let mut summary = SeedSummary::default();

    for seed in &config.employees {
        if get_employee_by_code(db, seed.employee_code.trim()).await?.is_some() {
            debug!(code = %seed.employee_code, "Employee already present, skipping");
            summary.employees_skipped += 1;
            continue;
        }
        create_employee(
            db,
            NewEmployee {
                employee_code: seed.employee_code.clone(),
                name: seed.name.clone(),
                designation: seed.designation.clone(),
                mobile_number: seed.mobile_number.clone(),
            },
        )
        .await?;
        summary.employees_created += 1;
    }

    for seed in &config.duties {
        if find_duty_by_type(db, &seed.duty_type).await?.is_some() {
            debug!(duty_type = %seed.duty_type, "Duty already present, skipping");
            summary.duties_skipped += 1;
            continue;
        }
        create_duty(
            db,
            DutyInput {
                duty_type: seed.duty_type.clone(),
                description: seed.description.clone(),
                is_permanent: seed.is_permanent,
            },
        )
        .await?;
        summary.duties_created += 1;
    }

    info!(?summary, "Seeding finished");
    Ok(summary)
}

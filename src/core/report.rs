//! Roster report generation business logic.
//!
//! A report groups one date's assignments into guard, protection and leave tables by
//! matching keywords against the duty label. Categories are independent filters rather
//! than a partition: "VIP Medical Leave Escort" lands in all three tables, and the summary
//! percentages are taken over the sum of the three table sizes. All functions here are
//! framework-agnostic; `crate::export` turns a [`RosterReport`] into a spreadsheet.

use crate::{
    core::assignment::{AssignmentDetail, get_assignments_for_date},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{debug, instrument};

/// Number of duty labels listed in the summary's most-common section.
pub const TOP_DUTY_LIMIT: usize = 10;

/// Named leave types reported in the leave breakdown, in display order.
pub const LEAVE_TYPES: [&str; 4] = [
    "Casual Leave",
    "Medical Leave",
    "Maternity Leave",
    "Compulsory Leave",
];

/// A report category, selected by case-insensitive keyword match on the duty label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyCategory {
    /// Static guard, gate and patrol duties
    Guard,
    /// Close protection and escort duties
    Protection,
    /// Leave of any kind
    Leave,
}

impl DutyCategory {
    /// All categories in report order.
    pub const ALL: [Self; 3] = [Self::Guard, Self::Protection, Self::Leave];

    /// Lower-case keywords that place a duty label in this category.
    #[must_use]
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Guard => &["guard", "security", "patrol", "gate", "monitoring", "control"],
            Self::Protection => &[
                "protection",
                "bodyguard",
                "escort",
                "vip",
                "commissioner",
                "dignitary",
            ],
            Self::Leave => &["leave", "vacation", "medical", "maternity", "casual"],
        }
    }

    /// Whether `duty_type` contains any of this category's keywords, ignoring case.
    #[must_use]
    pub fn matches(self, duty_type: &str) -> bool {
        let label = duty_type.to_lowercase();
        self.keywords().iter().any(|keyword| label.contains(keyword))
    }

    /// Category name used in the summary table.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Guard => "Guard Duties",
            Self::Protection => "Bodyguard Duties",
            Self::Leave => "Leave Records",
        }
    }

    /// Value of the category-specific last column for every row.
    ///
    /// Guard rows leave the mobile number column blank for manual entry.
    #[must_use]
    pub const fn detail_value(self) -> &'static str {
        match self {
            Self::Guard => "",
            Self::Protection => "Active",
            Self::Leave => "1 Day",
        }
    }

    /// Caption of the trailing count line.
    #[must_use]
    pub const fn total_caption(self) -> &'static str {
        match self {
            Self::Guard => "Total Guard Personnel",
            Self::Protection => "Total Bodyguard Personnel",
            Self::Leave => "Total Personnel on Leave",
        }
    }
}

/// One line of a category table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    /// 1-based position within the table
    pub serial: usize,
    /// Employee external code
    pub employee_code: String,
    /// Employee full name
    pub employee_name: String,
    /// Rank or designation
    pub designation: String,
    /// Duty label
    pub duty_type: String,
    /// Category-specific column (mobile placeholder, status or duration)
    pub detail: String,
}

/// All assignments of one category for the report date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTable {
    /// Category the rows were selected for
    pub category: DutyCategory,
    /// Matching assignments in listing order
    pub rows: Vec<CategoryRow>,
}

impl CategoryTable {
    /// Builds the table for `category` from the assignments that match it, keeping order.
    #[must_use]
    pub fn build(category: DutyCategory, assignments: &[AssignmentDetail]) -> Self {
        let rows = assignments
            .iter()
            .filter(|a| category.matches(&a.duty_type))
            .enumerate()
            .map(|(index, a)| CategoryRow {
                serial: index + 1,
                employee_code: a.employee_code.clone(),
                employee_name: a.employee_name.clone(),
                designation: a.designation.clone(),
                duty_type: a.duty_type.clone(),
                detail: category.detail_value().to_string(),
            })
            .collect();
        Self { category, rows }
    }

    /// Number of rows in the table.
    #[must_use]
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// Trailing summary line, e.g. `Total Guard Personnel: 4`.
    #[must_use]
    pub fn total_line(&self) -> String {
        format!("{}: {}", self.category.total_caption(), self.count())
    }
}

/// Count of leave rows for one named leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveTypeCount {
    /// One of [`LEAVE_TYPES`]
    pub leave_type: &'static str,
    /// Leave rows whose label contains the type, ignoring case
    pub count: usize,
}

/// Buckets leave rows by [`LEAVE_TYPES`], dropping empty buckets.
#[must_use]
pub fn leave_breakdown(leave: &CategoryTable) -> Vec<LeaveTypeCount> {
    LEAVE_TYPES
        .into_iter()
        .map(|leave_type| {
            let needle = leave_type.to_lowercase();
            let count = leave
                .rows
                .iter()
                .filter(|row| row.duty_type.to_lowercase().contains(&needle))
                .count();
            LeaveTypeCount { leave_type, count }
        })
        .filter(|bucket| bucket.count > 0)
        .collect()
}

/// One category's line in the summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    /// Summarized category
    pub category: DutyCategory,
    /// Rows in the category's table
    pub count: usize,
    /// Share of the category subtotal, 0 to 100
    pub percentage: f64,
}

/// Summary statistics over the three category tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterSummary {
    /// One share per category, in report order
    pub shares: Vec<CategoryShare>,
    /// Sum of the three category counts; an assignment in two tables counts twice
    pub total: usize,
    /// Most frequent duty labels over all tables, with their counts
    pub top_duty_types: Vec<(String, usize)>,
}

/// Complete categorized report for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterReport {
    /// Roster date the report covers
    pub date: NaiveDate,
    /// Guard and patrol duties
    pub guard: CategoryTable,
    /// Escort and protection duties
    pub protection: CategoryTable,
    /// Personnel on leave
    pub leave: CategoryTable,
    /// Non-empty leave-type buckets of the leave table
    pub leave_breakdown: Vec<LeaveTypeCount>,
    /// Counts, shares and most common duties
    pub summary: RosterSummary,
}

impl RosterReport {
    /// The three category tables in report order.
    #[must_use]
    pub fn tables(&self) -> [&CategoryTable; 3] {
        [&self.guard, &self.protection, &self.leave]
    }
}

/// Percentage of `count` in `total`; a zero total yields 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64) * 100.0
}

/// Formats a percentage with one decimal place, e.g. `33.3%`.
#[must_use]
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// Long form of a roster date, e.g. `January 01, 2024 (Monday)`.
#[must_use]
pub fn format_roster_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y (%A)").to_string()
}

/// Counts duty labels and returns the `limit` most frequent.
///
/// Sorting is stable, so labels with equal counts keep the order they were first seen.
#[must_use]
pub fn top_duty_types<'a, I>(labels: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|(seen, _)| seen == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label.to_string(), 1)),
        }
    }
    counts.sort_by(|(_, a), (_, b)| b.cmp(a));
    counts.truncate(limit);
    counts
}

/// Builds the categorized report from a date's assignments.
///
/// # Errors
/// Returns [`Error::Export`] if no assignment falls into any category.
pub fn build_roster_report(
    date: NaiveDate,
    assignments: &[AssignmentDetail],
) -> Result<RosterReport> {
    let guard = CategoryTable::build(DutyCategory::Guard, assignments);
    let protection = CategoryTable::build(DutyCategory::Protection, assignments);
    let leave = CategoryTable::build(DutyCategory::Leave, assignments);

    let total = guard.count() + protection.count() + leave.count();
    if total == 0 {
        return Err(Error::Export {
            message: format!("No roster entries to export for {date}"),
        });
    }

    let shares = [&guard, &protection, &leave]
        .iter()
        .map(|table| CategoryShare {
            category: table.category,
            count: table.count(),
            percentage: percentage(table.count(), total),
        })
        .collect();

    let labels = guard
        .rows
        .iter()
        .chain(&protection.rows)
        .chain(&leave.rows)
        .map(|row| row.duty_type.as_str());
    let top = top_duty_types(labels, TOP_DUTY_LIMIT);

    let breakdown = leave_breakdown(&leave);

    Ok(RosterReport {
        date,
        guard,
        protection,
        leave,
        leave_breakdown: breakdown,
        summary: RosterSummary {
            shares,
            total,
            top_duty_types: top,
        },
    })
}

/// Loads `date`'s assignments and builds the categorized report.
///
/// # Errors
/// Returns [`Error::Export`] if nothing on that date matches a category, or a database
/// error if the assignments cannot be loaded.
#[instrument(skip(db))]
pub async fn generate_roster_report(
    db: &DatabaseConnection,
    date: NaiveDate,
) -> Result<RosterReport> {
    let assignments = get_assignments_for_date(db, date).await?;
    debug!(count = assignments.len(), "Loaded assignments for report");
    build_roster_report(date, &assignments)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn detail(id: i64, duty_type: &str) -> AssignmentDetail {
        AssignmentDetail {
            id,
            date: date("2024-01-01"),
            duty_id: id,
            employee_id: id,
            duty_type: duty_type.to_string(),
            duty_description: String::new(),
            employee_name: format!("Officer {id}"),
            employee_code: format!("E{id:03}"),
            designation: "Constable".to_string(),
            mobile_number: "9800000000".to_string(),
        }
    }

    #[test]
    fn test_categorization_ignores_case() {
        for category in DutyCategory::ALL {
            assert_eq!(
                category.matches("GATE Security"),
                category.matches("gate security")
            );
        }
        assert!(DutyCategory::Guard.matches("GATE Security"));
        assert!(!DutyCategory::Leave.matches("GATE Security"));
    }

    #[test]
    fn test_categories_overlap() {
        let label = "VIP Medical Leave Escort";
        assert!(DutyCategory::Protection.matches(label));
        assert!(DutyCategory::Leave.matches(label));
        assert!(!DutyCategory::Guard.matches(label));
        assert!(DutyCategory::Guard.matches("VIP Gate Escort"));
    }

    #[test]
    fn test_single_vip_escort_report() {
        let report = build_roster_report(date("2024-01-01"), &[detail(1, "VIP Escort")]).unwrap();

        assert_eq!(report.protection.count(), 1);
        assert_eq!(report.protection.rows[0].detail, "Active");
        assert_eq!(report.protection.total_line(), "Total Bodyguard Personnel: 1");
        assert!(report.guard.rows.is_empty());
        assert!(report.leave.rows.is_empty());

        let percentages: Vec<f64> = report.summary.shares.iter().map(|s| s.percentage).collect();
        assert_eq!(percentages, [0.0, 100.0, 0.0]);
        assert_eq!(report.summary.total, 1);
        assert_eq!(report.summary.top_duty_types, [("VIP Escort".to_string(), 1)]);
    }

    #[test]
    fn test_overlapping_assignment_counts_in_every_table() {
        let assignments = [
            detail(1, "VIP Medical Leave Escort"),
            detail(2, "Main Gate Security"),
        ];
        let report = build_roster_report(date("2024-01-01"), &assignments).unwrap();

        assert_eq!(report.guard.count(), 1);
        assert_eq!(report.protection.count(), 1);
        assert_eq!(report.leave.count(), 1);
        assert_eq!(report.summary.total, 3);
        assert_eq!(
            report.summary.top_duty_types,
            [
                ("VIP Medical Leave Escort".to_string(), 2),
                ("Main Gate Security".to_string(), 1),
            ]
        );
        assert_eq!(format_percentage(report.summary.shares[0].percentage), "33.3%");
    }

    #[test]
    fn test_rows_are_numbered_per_table() {
        let assignments = [
            detail(1, "Back Gate Guard"),
            detail(2, "Casual Leave"),
            detail(3, "Night Duty Guard"),
        ];
        let report = build_roster_report(date("2024-01-01"), &assignments).unwrap();

        let serials: Vec<usize> = report.guard.rows.iter().map(|r| r.serial).collect();
        assert_eq!(serials, [1, 2]);
        assert_eq!(report.guard.rows[1].employee_code, "E003");
        assert_eq!(report.guard.rows[0].detail, "");
        assert_eq!(report.leave.rows[0].serial, 1);
        assert_eq!(report.leave.rows[0].detail, "1 Day");
    }

    #[test]
    fn test_leave_breakdown_reports_non_zero_buckets() {
        let assignments = [
            detail(1, "Casual Leave"),
            detail(2, "casual leave (half day)"),
            detail(3, "Medical Leave"),
            detail(4, "Vacation"),
        ];
        let report = build_roster_report(date("2024-01-01"), &assignments).unwrap();

        assert_eq!(report.leave.count(), 4);
        assert_eq!(
            report.leave_breakdown,
            [
                LeaveTypeCount {
                    leave_type: "Casual Leave",
                    count: 2
                },
                LeaveTypeCount {
                    leave_type: "Medical Leave",
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_empty_roster_fails_export() {
        let result = build_roster_report(date("2024-01-01"), &[]);
        assert!(matches!(result, Err(Error::Export { .. })));

        let uncategorized = build_roster_report(date("2024-01-01"), &[detail(1, "Reception Desk")]);
        assert!(matches!(uncategorized, Err(Error::Export { .. })));
    }

    #[test]
    fn test_percentage_guards_zero_total() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(format_percentage(percentage(2, 3)), "66.7%");
    }

    #[test]
    fn test_top_duty_types_ties_keep_first_seen_order() {
        let labels = ["B", "A", "C", "A", "B", "D"];
        let top = top_duty_types(labels, 3);
        assert_eq!(
            top,
            [
                ("B".to_string(), 2),
                ("A".to_string(), 2),
                ("C".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_top_duty_types_limit() {
        let labels: Vec<String> = (0..15).map(|i| format!("Duty {i:02}")).collect();
        let top = top_duty_types(labels.iter().map(String::as_str), TOP_DUTY_LIMIT);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].0, "Duty 00");
    }

    #[test]
    fn test_format_roster_date() {
        assert_eq!(format_roster_date(date("2024-01-01")), "January 01, 2024 (Monday)");
    }

    #[tokio::test]
    async fn test_generate_roster_report_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let asha = create_test_employee(&db, "E001", "Asha Rao").await?;
        let vikram = create_test_employee(&db, "E002", "Vikram Singh").await?;
        let gate = create_test_duty(&db, "Main Gate Security").await?;
        let leave = create_test_duty(&db, "Medical Leave").await?;
        create_test_assignment(&db, "2024-01-01", gate.id, asha.id).await?;
        create_test_assignment(&db, "2024-01-01", leave.id, vikram.id).await?;

        let report = generate_roster_report(&db, date("2024-01-01")).await?;
        assert_eq!(report.guard.rows[0].employee_name, "Asha Rao");
        assert_eq!(report.leave.rows[0].employee_name, "Vikram Singh");
        assert_eq!(report.summary.total, 2);

        let empty = generate_roster_report(&db, date("2024-01-02")).await;
        assert!(matches!(empty, Err(Error::Export { .. })));
        Ok(())
    }
}

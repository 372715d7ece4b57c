//! Spreadsheet rendering of the roster report.
//!
//! The workbook has one sheet per category table plus a summary sheet. Every sheet opens
//! with the same four-row letterhead, and those rows together with the column header repeat
//! on each printed page.

use crate::{
    core::report::{
        CategoryTable, DutyCategory, LeaveTypeCount, RosterReport, format_percentage,
        format_roster_date, generate_roster_report,
    },
    errors::Result,
};
use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use sea_orm::DatabaseConnection;
use tracing::{info, instrument};

/// MIME type of the generated workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const LETTERHEAD: &str = "POLICE HEADQUARTERS";
const SUMMARY_SHEET: &str = "Summary";
const HEADER_ROW: u32 = 4;
const TABLE_COLUMN_WIDTHS: [f64; 6] = [8.0, 14.0, 28.0, 20.0, 32.0, 16.0];
const SUMMARY_COLUMN_WIDTHS: [f64; 3] = [36.0, 12.0, 14.0];

/// A rendered workbook ready for download.
#[derive(Debug, Clone)]
pub struct ExportFile {
    /// Download name, always ending in `.xlsx`
    pub filename: String,
    /// Workbook bytes
    pub content: Vec<u8>,
}

/// Default download name, `Police_Duty_Roster_<date>.xlsx`.
#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("Police_Duty_Roster_{date}.xlsx")
}

/// Download name built from a user-supplied title.
///
/// Every character outside `[A-Za-z0-9]` becomes `_`. A blank title falls back to
/// [`export_filename`].
#[must_use]
pub fn custom_export_filename(title: &str, date: NaiveDate) -> String {
    let title = title.trim();
    if title.is_empty() {
        return export_filename(date);
    }
    let safe: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{safe}_{date}.xlsx")
}

const fn sheet_heading(category: DutyCategory) -> &'static str {
    match category {
        DutyCategory::Guard => "DUTY ROSTER - GUARD DUTIES",
        DutyCategory::Protection => "DUTY ROSTER - BODYGUARD ASSIGNMENTS",
        DutyCategory::Leave => "LEAVE RECORDS",
    }
}

const fn column_headers(category: DutyCategory) -> [&'static str; 6] {
    let (label, detail) = match category {
        DutyCategory::Guard => ("Duty Type", "Mobile Number"),
        DutyCategory::Protection => ("Protection Assignment", "Status"),
        DutyCategory::Leave => ("Leave Type", "Duration"),
    };
    ["S.No", "Employee ID", "Name", "Designation", label, detail]
}

struct Styles {
    title: Format,
    heading: Format,
    header: Format,
    cell: Format,
    bold: Format,
}

impl Styles {
    fn new() -> Self {
        let border = Format::new().set_border(FormatBorder::Thin);
        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(16)
                .set_align(FormatAlign::Center),
            heading: Format::new()
                .set_bold()
                .set_font_size(13)
                .set_align(FormatAlign::Center),
            header: border.clone().set_bold().set_background_color("#D9E1F2"),
            cell: border,
            bold: Format::new().set_bold(),
        }
    }
}

/// Writes the shared letterhead and page setup, returning the first free row.
fn write_letterhead(
    sheet: &mut Worksheet,
    styles: &Styles,
    heading: &str,
    date: NaiveDate,
    widths: &[f64],
) -> Result<u32> {
    let last_col = u16::try_from(widths.len().saturating_sub(1)).unwrap_or(0);
    for (col, width) in (0u16..).zip(widths) {
        sheet.set_column_width(col, *width)?;
    }
    sheet.merge_range(0, 0, 0, last_col, LETTERHEAD, &styles.title)?;
    sheet.merge_range(1, 0, 1, last_col, heading, &styles.heading)?;
    sheet.write_string_with_format(
        2,
        0,
        format!("Date: {}", format_roster_date(date)),
        &styles.bold,
    )?;

    // A4 with narrow margins
    sheet.set_paper_size(9);
    sheet.set_margins(0.7, 0.7, 0.75, 0.75, 0.3, 0.3);
    sheet.set_repeat_rows(0, HEADER_ROW)?;
    Ok(HEADER_ROW)
}

#[allow(clippy::cast_precision_loss)]
fn write_category_sheet(
    sheet: &mut Worksheet,
    styles: &Styles,
    table: &CategoryTable,
    report: &RosterReport,
) -> Result<()> {
    sheet.set_name(table.category.label())?;
    let mut row = write_letterhead(
        sheet,
        styles,
        sheet_heading(table.category),
        report.date,
        &TABLE_COLUMN_WIDTHS,
    )?;

    for (col, header) in (0u16..).zip(column_headers(table.category)) {
        sheet.write_string_with_format(row, col, header, &styles.header)?;
    }
    row += 1;

    for entry in &table.rows {
        sheet.write_number_with_format(row, 0, entry.serial as f64, &styles.cell)?;
        let values = [
            &entry.employee_code,
            &entry.employee_name,
            &entry.designation,
            &entry.duty_type,
            &entry.detail,
        ];
        for (col, value) in (1u16..).zip(values) {
            sheet.write_string_with_format(row, col, value.as_str(), &styles.cell)?;
        }
        row += 1;
    }

    row += 1;
    sheet.write_string_with_format(row, 0, table.total_line(), &styles.bold)?;

    if table.category == DutyCategory::Leave {
        row += 2;
        sheet.write_string_with_format(row, 0, "LEAVE SUMMARY:", &styles.bold)?;
        for (leave_type, personnel) in leave_summary_lines(&report.leave_breakdown) {
            row += 1;
            sheet.write_string(row, 0, leave_type)?;
            sheet.write_string(row, 1, personnel)?;
        }
    }
    Ok(())
}

/// Type and headcount cells under the `LEAVE SUMMARY:` heading,
/// e.g. `("Casual Leave", "2 personnel")`.
fn leave_summary_lines(breakdown: &[LeaveTypeCount]) -> Vec<(&'static str, String)> {
    breakdown
        .iter()
        .map(|bucket| (bucket.leave_type, format!("{} personnel", bucket.count)))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn write_summary_sheet(
    sheet: &mut Worksheet,
    styles: &Styles,
    report: &RosterReport,
    generated_at: NaiveDateTime,
) -> Result<()> {
    sheet.set_name(SUMMARY_SHEET)?;
    let mut row = write_letterhead(
        sheet,
        styles,
        "DUTY ROSTER SUMMARY",
        report.date,
        &SUMMARY_COLUMN_WIDTHS,
    )?;

    for (col, header) in (0u16..).zip(["Category", "Count", "Percentage"]) {
        sheet.write_string_with_format(row, col, header, &styles.header)?;
    }
    row += 1;

    let summary = &report.summary;
    for share in &summary.shares {
        sheet.write_string_with_format(row, 0, share.category.label(), &styles.cell)?;
        sheet.write_number_with_format(row, 1, share.count as f64, &styles.cell)?;
        sheet.write_string_with_format(
            row,
            2,
            format_percentage(share.percentage),
            &styles.cell,
        )?;
        row += 1;
    }
    sheet.write_string_with_format(row, 0, "TOTAL", &styles.header)?;
    sheet.write_number_with_format(row, 1, summary.total as f64, &styles.header)?;
    sheet.write_string_with_format(row, 2, format_percentage(100.0), &styles.header)?;

    row += 2;
    sheet.write_string_with_format(row, 0, "DETAILED BREAKDOWN", &styles.bold)?;
    row += 1;
    sheet.write_string_with_format(row, 0, "MOST COMMON DUTIES:", &styles.bold)?;
    for (rank, (duty_type, count)) in summary.top_duty_types.iter().enumerate() {
        row += 1;
        sheet.write_string(row, 0, format!("{}. {duty_type}", rank + 1))?;
        sheet.write_number(row, 1, *count as f64)?;
    }

    row += 2;
    sheet.write_string(
        row,
        0,
        format!(
            "Report Generated: {}",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        ),
    )?;
    Ok(())
}

/// Renders the report as an xlsx workbook in memory.
///
/// # Errors
/// Returns [`crate::errors::Error::Xlsx`] if the workbook cannot be assembled.
pub fn render_workbook(report: &RosterReport, generated_at: NaiveDateTime) -> Result<Vec<u8>> {
    let styles = Styles::new();
    let mut workbook = Workbook::new();

    for table in report.tables() {
        write_category_sheet(workbook.add_worksheet(), &styles, table, report)?;
    }
    write_summary_sheet(workbook.add_worksheet(), &styles, report, generated_at)?;

    Ok(workbook.save_to_buffer()?)
}

/// Builds the report for `date` and renders it, naming the file after `title` when given.
///
/// # Errors
/// Returns [`crate::errors::Error::Export`] when the date has nothing to export, or a
/// database or spreadsheet error.
#[instrument(skip(db))]
pub async fn export_roster(
    db: &DatabaseConnection,
    date: NaiveDate,
    title: Option<&str>,
) -> Result<ExportFile> {
    let report = generate_roster_report(db, date).await?;
    let content = render_workbook(&report, chrono::Local::now().naive_local())?;
    let filename = title.map_or_else(
        || export_filename(date),
        |title| custom_export_filename(title, date),
    );
    info!(%filename, bytes = content.len(), "Roster exported");
    Ok(ExportFile { filename, content })
}

//! Sales service for period reports with an optional comparison period

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use shared::{build_sales_report, validate_sales_period, SalesPeriod, SalesReport};

use crate::error::{AppError, AppResult};
use crate::external::SquareClient;
use crate::services::SettingsService;

/// Sales service for reporting units and revenue
#[derive(Clone)]
pub struct SalesService {
    square: SquareClient,
    settings: SettingsService,
    venue_offset: FixedOffset,
}

/// Period bounds as RFC 3339 timestamps or venue-local dates
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub compare_start: Option<String>,
    pub compare_end: Option<String>,
}

impl SalesService {
    /// Create a new SalesService
    pub fn new(square: SquareClient, settings: SettingsService, venue_offset: FixedOffset) -> Self {
        Self {
            square,
            settings,
            venue_offset,
        }
    }

    /// Build the sales report for a period
    pub async fn report(&self, query: SalesQuery) -> AppResult<SalesReport> {
        let start = query.start.as_deref().ok_or_else(|| required("start"))?;
        let end = query.end.as_deref().ok_or_else(|| required("end"))?;
        let main = parse_period(("start", start), ("end", end), self.venue_offset)?;

        let compare = match (query.compare_start.as_deref(), query.compare_end.as_deref()) {
            (Some(start), Some(end)) => Some(parse_period(
                ("compareStart", start),
                ("compareEnd", end),
                self.venue_offset,
            )?),
            _ => None,
        };

        let (main_sold, compare_sold) = tokio::try_join!(
            self.square.fetch_sales(&main),
            async {
                match &compare {
                    Some(period) => self.square.fetch_sales(period).await.map(Some),
                    None => Ok(None),
                }
            }
        )?;

        let settings = self.settings.item_settings_or_default().await;
        let report = build_sales_report(&main_sold, compare_sold.as_ref(), &settings);

        tracing::info!(
            "Sales report {} to {}: {} items, {} units",
            main.start,
            main.end,
            report.items.len(),
            report.totals.units_sold
        );

        Ok(report)
    }

}

fn required(field: &str) -> AppError {
    AppError::Validation {
        field: field.to_string(),
        message: format!("{} required", field),
    }
}

/// Parse both bounds of a period. Each `(field, value)` pair names the query
/// parameter reported when that bound is invalid.
fn parse_period(
    (start_field, start): (&str, &str),
    (end_field, end): (&str, &str),
    offset: FixedOffset,
) -> AppResult<SalesPeriod> {
    let invalid = |field: &str, message: String| AppError::Validation {
        field: field.to_string(),
        message,
    };

    let start = parse_bound(start, offset, false)
        .ok_or_else(|| invalid(start_field, format!("Invalid date: {}", start)))?;
    let end = parse_bound(end, offset, true)
        .ok_or_else(|| invalid(end_field, format!("Invalid date: {}", end)))?;

    let period = SalesPeriod::new(start, end);
    validate_sales_period(&period).map_err(|msg| invalid(end_field, msg.to_string()))?;
    Ok(period)
}

/// Parse a period bound. A bare date is a venue-local day: its start, or
/// the start of the following day for an end bound.
fn parse_bound(value: &str, offset: FixedOffset, is_end: bool) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let day = if is_end { date + Duration::days(1) } else { date };
    let midnight = day.and_hms_opt(0, 0, 0)?;
    offset
        .from_local_datetime(&midnight)
        .single()
        .map(|at| at.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brisbane() -> FixedOffset {
        FixedOffset::east_opt(10 * 3600).unwrap()
    }

    #[test]
    fn test_parse_bound_rfc3339() {
        let at = parse_bound("2024-06-01T08:30:00Z", brisbane(), false).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_bound_local_dates() {
        let start = parse_bound("2024-06-01", brisbane(), false).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 31, 14, 0, 0).unwrap());

        // End dates include the whole day
        let end = parse_bound("2024-06-01", brisbane(), true).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_bound_rejects_garbage() {
        assert!(parse_bound("last tuesday", brisbane(), false).is_none());
        assert!(parse_bound("2024-13-01", brisbane(), false).is_none());
    }

    fn invalid_field(result: AppResult<SalesPeriod>) -> Option<String> {
        match result {
            Err(AppError::Validation { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_bad_bounds_name_their_own_field() {
        let bad_end = parse_period(("start", "2024-06-01"), ("end", "soon"), brisbane());
        assert_eq!(invalid_field(bad_end).as_deref(), Some("end"));

        let bad_start = parse_period(("start", "whenever"), ("end", "2024-06-07"), brisbane());
        assert_eq!(invalid_field(bad_start).as_deref(), Some("start"));

        let bad_compare_end = parse_period(
            ("compareStart", "2024-05-25"),
            ("compareEnd", "2024-99-01"),
            brisbane(),
        );
        assert_eq!(invalid_field(bad_compare_end).as_deref(), Some("compareEnd"));
    }

    #[test]
    fn test_valid_period() {
        let period = parse_period(("start", "2024-06-01"), ("end", "2024-06-07"), brisbane()).unwrap();
        assert_eq!(period.start, Utc.with_ymd_and_hms(2024, 5, 31, 14, 0, 0).unwrap());
        assert_eq!(period.end, Utc.with_ymd_and_hms(2024, 6, 7, 14, 0, 0).unwrap());
    }
}

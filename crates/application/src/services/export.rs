//! Snapshot export and import

use chrono::NaiveDate;
use domain::{DomainError, WeatherSnapshot};

use crate::error::ApplicationError;

/// A snapshot rendered as a downloadable JSON file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotExport {
    pub file_name: String,
    pub contents: String,
}

impl SnapshotExport {
    /// Export `snapshot` as it would be downloaded on `date`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Serialization` if encoding fails.
    pub fn from_snapshot(snapshot: &WeatherSnapshot, date: NaiveDate) -> Result<Self, DomainError> {
        Ok(Self {
            file_name: snapshot.export_file_name(date),
            contents: snapshot.to_export_json()?,
        })
    }

    /// Read back a previously exported document
    ///
    /// The document passes the same validation gate as fetched data.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::MalformedPayload` for invalid JSON and a
    /// domain error when a section is missing or invalid.
    pub fn parse(contents: &str) -> Result<WeatherSnapshot, ApplicationError> {
        let value: serde_json::Value = serde_json::from_str(contents)
            .map_err(|e| ApplicationError::MalformedPayload(e.to_string()))?;
        Ok(WeatherSnapshot::from_json_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::snapshot;

    #[test]
    fn export_round_trips_through_parse() {
        let original = snapshot("Lisbon");
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let export = SnapshotExport::from_snapshot(&original, date).unwrap();

        assert_eq!(export.file_name, "weather-data-Lisbon-2024-06-03.json");
        assert_eq!(SnapshotExport::parse(&export.contents).unwrap(), original);
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            SnapshotExport::parse("{not json"),
            Err(ApplicationError::MalformedPayload(_))
        ));
    }

    #[test]
    fn missing_section_is_rejected() {
        let err = SnapshotExport::parse(r#"{"location": {}, "current": {}}"#).unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::IncompleteSnapshot(_))
        ));
    }
}

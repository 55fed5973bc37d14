//! Dashboard records
//!
//! Canned past analyses shown on the dashboard, with the summary counts and
//! the search box filter.

use serde::{Deserialize, Serialize};

/// Diagnosis label for a clean result
pub const NORMAL_DIAGNOSIS: &str = "Normal";

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/100x100.png?text=X-Ray";

/// One past analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    pub patient_id: String,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    pub image_url: String,
    pub primary_diagnosis: String,
    pub probability: f64,
}

impl AnalysisRecord {
    fn canned(id: &str, patient_id: &str, date: &str, diagnosis: &str, probability: f64) -> Self {
        Self {
            id: id.to_string(),
            patient_id: patient_id.to_string(),
            date: date.to_string(),
            image_url: PLACEHOLDER_IMAGE.to_string(),
            primary_diagnosis: diagnosis.to_string(),
            probability,
        }
    }

    /// Whether the primary diagnosis is anything other than normal
    pub fn is_abnormal(&self) -> bool {
        self.primary_diagnosis != NORMAL_DIAGNOSIS
    }

    /// Confidence as a whole percentage
    pub fn percent(&self) -> u32 {
        (self.probability * 100.0).round() as u32
    }
}

/// The records every dashboard shows, newest first
pub fn canned_records() -> Vec<AnalysisRecord> {
    vec![
        AnalysisRecord::canned("1", "P12345", "2025-05-10", "Pneumonia", 0.82),
        AnalysisRecord::canned("2", "P12346", "2025-05-09", NORMAL_DIAGNOSIS, 0.95),
        AnalysisRecord::canned("3", "P12347", "2025-05-07", "COVID-19", 0.78),
    ]
}

/// Case-insensitive match on patient id or diagnosis; blank query matches all
pub fn search<'a>(records: &'a [AnalysisRecord], query: &str) -> Vec<&'a AnalysisRecord> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .filter(|record| {
            needle.is_empty()
                || record.patient_id.to_lowercase().contains(&needle)
                || record.primary_diagnosis.to_lowercase().contains(&needle)
        })
        .collect()
}

// ----------------------------------------------------------------------------
// Summary
// ----------------------------------------------------------------------------

/// Headline counts above the records table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub abnormal: usize,
    pub normal: usize,
}

impl DashboardSummary {
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        let abnormal = records.iter().filter(|r| r.is_abnormal()).count();
        Self {
            total: records.len(),
            abnormal,
            normal: records.len() - abnormal,
        }
    }

    pub fn abnormal_percent(&self) -> u32 {
        Self::share(self.abnormal, self.total)
    }

    pub fn normal_percent(&self) -> u32 {
        Self::share(self.normal, self.total)
    }

    fn share(part: usize, total: usize) -> u32 {
        if total == 0 {
            return 0;
        }
        ((part as f64 / total as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_canned_records() {
        let summary = DashboardSummary::from_records(&canned_records());
        assert_eq!(summary.total, 3);
        assert_eq!(summary.abnormal, 2);
        assert_eq!(summary.normal, 1);
        assert_eq!(summary.abnormal_percent(), 67);
        assert_eq!(summary.normal_percent(), 33);
    }

    #[test]
    fn test_empty_summary() {
        let summary = DashboardSummary::from_records(&[]);
        assert_eq!(summary.abnormal_percent(), 0);
        assert_eq!(summary.normal_percent(), 0);
    }

    #[test]
    fn test_search() {
        let records = canned_records();
        assert_eq!(search(&records, "").len(), 3);
        assert_eq!(search(&records, "  ").len(), 3);

        let covid = search(&records, "covid");
        assert_eq!(covid.len(), 1);
        assert_eq!(covid[0].patient_id, "P12347");

        assert_eq!(search(&records, "p1234").len(), 3);
        assert_eq!(search(&records, "P12346")[0].primary_diagnosis, "Normal");
        assert!(search(&records, "fracture").is_empty());
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(&canned_records()[0]).unwrap();
        assert_eq!(json["patientId"], "P12345");
        assert_eq!(json["primaryDiagnosis"], "Pneumonia");
        assert_eq!(canned_records()[0].percent(), 82);
    }
}

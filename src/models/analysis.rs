use serde::Serialize;

use super::enums::UrgencyLevel;
use crate::config::DISCLAIMER;
use crate::pipeline::normalize::ranking::{gate_scan_insights, rank_findings};

/// A single clinical finding extracted from the uploaded records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyFinding {
    pub finding: String,
    pub detail: String,
    pub urgency: UrgencyLevel,
    /// Which input produced this finding.
    pub source: String,
}

/// Observation from an uploaded scan image. Never diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanInsight {
    pub observation: String,
    pub region: Option<String>,
    pub note: String,
}

/// Structured result returned to the doctor.
///
/// Only constructible through [`DoctorAnalysisResult::assemble`], so the
/// ranking list always mirrors `key_findings` and the disclaimer cannot
/// be swapped out.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorAnalysisResult {
    patient_summary: String,
    key_findings: Vec<KeyFinding>,
    scan_insights: Vec<ScanInsight>,
    urgency_ranking: Vec<String>,
    disclaimer: &'static str,
}

impl DoctorAnalysisResult {
    /// Rank findings, gate scan insights on image presence, derive the ranking.
    pub fn assemble(
        patient_summary: String,
        key_findings: Vec<KeyFinding>,
        scan_insights: Vec<ScanInsight>,
        had_image: bool,
    ) -> Self {
        let (key_findings, urgency_ranking) = rank_findings(key_findings);
        Self {
            patient_summary,
            key_findings,
            scan_insights: gate_scan_insights(scan_insights, had_image),
            urgency_ranking,
            disclaimer: DISCLAIMER,
        }
    }

    pub fn patient_summary(&self) -> &str {
        &self.patient_summary
    }

    pub fn key_findings(&self) -> &[KeyFinding] {
        &self.key_findings
    }

    pub fn scan_insights(&self) -> &[ScanInsight] {
        &self.scan_insights
    }

    pub fn urgency_ranking(&self) -> &[String] {
        &self.urgency_ranking
    }

    pub fn disclaimer(&self) -> &str {
        self.disclaimer
    }
}

/// Plain-language explanation returned to the patient.
#[derive(Debug, Clone, Serialize)]
pub struct PatientExplanationResult {
    simplified_explanation: String,
    disclaimer: &'static str,
}

impl PatientExplanationResult {
    /// Message used when no explanation text survives validation.
    pub const UNAVAILABLE: &'static str = "We were unable to generate an explanation for this document. Please try again or contact your healthcare provider.";

    pub fn new(simplified_explanation: String) -> Self {
        let simplified_explanation = if simplified_explanation.trim().is_empty() {
            Self::UNAVAILABLE.to_string()
        } else {
            simplified_explanation
        };
        Self {
            simplified_explanation,
            disclaimer: DISCLAIMER,
        }
    }

    pub fn simplified_explanation(&self) -> &str {
        &self.simplified_explanation
    }

    pub fn disclaimer(&self) -> &str {
        self.disclaimer
    }
}

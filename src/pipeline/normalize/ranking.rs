use crate::models::{KeyFinding, ScanInsight};

/// Stable sort by urgency (HIGH first) and the matching title list.
pub fn rank_findings(mut findings: Vec<KeyFinding>) -> (Vec<KeyFinding>, Vec<String>) {
    findings.sort_by_key(|f| f.urgency.rank());
    let ranking = findings.iter().map(|f| f.finding.clone()).collect();
    (findings, ranking)
}

/// No image in, no scan insights out.
pub fn gate_scan_insights(insights: Vec<ScanInsight>, had_image: bool) -> Vec<ScanInsight> {
    if had_image {
        insights
    } else {
        if !insights.is_empty() {
            tracing::debug!(dropped = insights.len(), "Scan insights dropped, no image supplied");
        }
        Vec::new()
    }
}

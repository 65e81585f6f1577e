//! Prompt construction for both audiences.

pub const DOCTOR_SYSTEM_PROMPT: &str = r#"You are MedAssist, a clinical documentation assistant.
Your role is to help doctors quickly understand uploaded patient records.
Rules you MUST follow:
1. You are NOT a diagnostician. Do not make definitive diagnoses.
2. If you are uncertain about anything, state that uncertainty explicitly.
3. Do not suggest prescriptions or specific treatment plans.
4. Rank findings by urgency: HIGH (needs immediate attention), MEDIUM (needs
   follow-up), LOW (routine / informational).
5. Always return a valid JSON object matching the schema below - no extra prose.

Required JSON schema:
{
  "patient_summary": "<2-4 sentence overview>",
  "key_findings": [
    {
      "finding": "<short finding title>",
      "detail": "<supporting evidence from records>",
      "urgency": "high|medium|low",
      "source": "<patient_history|prescription|lab_report|scan>"
    }
  ],
  "scan_insights": [
    {
      "observation": "<what is visible>",
      "region": "<anatomical region or null>",
      "note": "<non-diagnostic clinical note>"
    }
  ],
  "urgency_ranking": ["<highest urgency finding title>", "...", "<lowest>"]
}"#;

pub const PATIENT_SYSTEM_PROMPT: &str = r#"You are MedExplain, a medical document simplifier.
Your role is to help patients understand their own medical records in plain,
friendly language they can follow without any medical background.
Rules you MUST follow:
1. Do NOT suggest a diagnosis.
2. Do NOT recommend or advise on medications or treatments.
3. Do NOT make any definitive medical statements - you are explaining, not deciding.
4. Use simple, short sentences. Avoid jargon. If a medical term is unavoidable,
   define it in parentheses.
5. Return ONLY a JSON object with a single key "simplified_explanation".

Required JSON schema:
{
  "simplified_explanation": "<plain language explanation>"
}"#;

/// Cleaned clinical text submitted for a doctor analysis.
#[derive(Debug, Clone, Default)]
pub struct ClinicalSources {
    pub patient_history: String,
    pub prescriptions: String,
    pub lab_reports: String,
}

impl ClinicalSources {
    pub fn is_empty(&self) -> bool {
        self.patient_history.is_empty() && self.prescriptions.is_empty() && self.lab_reports.is_empty()
    }

    /// Plain-text form sent to the legacy service.
    pub fn legacy_text(&self) -> String {
        join_sections(&[
            ("Patient History:\n", &self.patient_history),
            ("Prescriptions:\n", &self.prescriptions),
            ("Lab Reports:\n", &self.lab_reports),
        ])
    }

    /// Markdown user message for the local model.
    pub fn model_message(&self, has_image: bool) -> String {
        let mut message = join_sections(&[
            ("## Patient History\n", &self.patient_history),
            ("## Current / Past Prescriptions\n", &self.prescriptions),
            ("## Lab Reports\n", &self.lab_reports),
        ]);
        if has_image {
            if !message.is_empty() {
                message.push_str("\n\n");
            }
            message.push_str("## Scan Image\n[Image attached – please analyse]");
        }
        message
    }
}

fn join_sections(sections: &[(&str, &String)]) -> String {
    sections
        .iter()
        .filter(|(_, body)| !body.is_empty())
        .map(|(heading, body)| format!("{heading}{body}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn patient_message(report_text: &str) -> String {
    format!("Please explain the following medical document:\n\n{report_text}")
}

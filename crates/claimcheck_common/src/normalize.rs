//! Result normalizer
//!
//! Maps the service's partially-present JSON record into `AnalysisResult`.
//! Every function here is total: missing keys and wrong types become empty
//! sections, never panics.

use crate::model::{
    AnalysisReport, AnalysisResult, ExternalSource, FailureKind, OfficialResource, Verdict,
};
use serde_json::Value;
use tracing::warn;

/// Normalize a response body that came back with a 2xx status
pub fn normalize_body(body: &str) -> AnalysisResult {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => normalize(&value),
        Err(e) => {
            warn!(error = %e, "response body is not JSON");
            AnalysisResult::error(
                FailureKind::Malformed,
                "The analysis service returned an unreadable response.",
            )
        }
    }
}

/// Normalize a parsed payload.
///
/// A top-level `error` string wins over everything else, since the
/// service reports some failures with a 200 status.
pub fn normalize(raw: &Value) -> AnalysisResult {
    if let Some(message) = error_field(raw) {
        return AnalysisResult::error(FailureKind::Server, message);
    }

    if !raw.is_object() {
        warn!("response payload is not an object; rendering empty report");
    }

    let analysis = raw.get("claim_analysis");
    let verdict_label = analysis.and_then(|a| text(a.get("verdict")));
    let verdict = verdict_label
        .as_deref()
        .map(Verdict::classify)
        .unwrap_or(Verdict::Unknown);

    let points = raw.get("categorized_points");
    let guidance = raw.get("public_guidance_and_resources");

    AnalysisResult::Report(AnalysisReport {
        verdict_label,
        verdict,
        score: analysis.and_then(|a| score(a.get("score"))),
        explanation: analysis.and_then(|a| text(a.get("explanation"))),
        supporting_points: string_list(points.and_then(|p| p.get("points_supporting_truthfulness"))),
        refuting_points: string_list(points.and_then(|p| p.get("points_refuting_the_claim"))),
        possible_consequences: string_list(
            raw.get("risk_assessment")
                .and_then(|r| r.get("possible_consequences")),
        ),
        guidance_tips: string_list(guidance.and_then(|g| g.get("tips_to_identify_similar_scams"))),
        official_resource: official_resource(
            guidance.and_then(|g| g.get("official_government_resources")),
        ),
        external_sources: external_sources(
            raw.get("evidence_log").and_then(|e| e.get("external_sources")),
        ),
        raw: raw.clone(),
    })
}

/// Message for a non-2xx response: the `{error}` field when readable,
/// otherwise a generic message carrying the status.
pub fn failure_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(error_field)
        .unwrap_or_else(|| {
            format!(
                "The analysis service returned an error (HTTP {}). Please try again.",
                status
            )
        })
}

pub(crate) fn error_field(raw: &Value) -> Option<String> {
    text(raw.get("error"))
}

/// Non-blank string, trimmed
fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|v| text(Some(v))).collect())
        .unwrap_or_default()
}

/// Scores are percentages. Decimals within [0, 1], as numbers or strings,
/// are fractions; a trailing `%` always means a percentage.
fn score(value: Option<&Value>) -> Option<u8> {
    let value = value?;

    let pct = if let Some(n) = value.as_u64() {
        n as f64
    } else if let Some(n) = value.as_i64() {
        n as f64
    } else if let Some(f) = value.as_f64() {
        if (0.0..=1.0).contains(&f) {
            f * 100.0
        } else {
            f
        }
    } else if let Some(s) = value.as_str() {
        let s = s.trim();
        match s.strip_suffix('%') {
            Some(percent) => percent.trim().parse::<f64>().ok()?,
            None if s.contains('.') => {
                let f = s.parse::<f64>().ok()?;
                if (0.0..=1.0).contains(&f) {
                    f * 100.0
                } else {
                    f
                }
            }
            None => s.parse::<f64>().ok()?,
        }
    } else {
        return None;
    };

    if !pct.is_finite() {
        return None;
    }
    Some(pct.round().clamp(0.0, 100.0) as u8)
}

fn official_resource(value: Option<&Value>) -> Option<OfficialResource> {
    let value = value?;
    let resource = OfficialResource {
        website: text(value.get("relevant_agency_website")),
        helpline: text(value.get("national_helpline_number")),
    };
    if resource.website.is_none() && resource.helpline.is_none() {
        None
    } else {
        Some(resource)
    }
}

fn external_sources(value: Option<&Value>) -> Vec<ExternalSource> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let url = text(item.get("url"))?;
            let name = text(item.get("source_name")).unwrap_or_else(|| url.clone());
            Some(ExternalSource { name, url })
        })
        .collect()
}

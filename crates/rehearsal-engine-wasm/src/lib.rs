//! WASM bindings for rehearsal-engine.
//!
//! Exposes occurrence expansion, conflict classification, recurrence planning,
//! slot synthesis and free-range computation to JavaScript via
//! `wasm-bindgen`. All complex types cross the boundary as JSON strings using
//! the engine's own serde shapes (`HH:MM` times, `YYYY-MM-DD` dates).
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p rehearsal-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/rehearsal-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/rehearsal_engine_wasm.wasm
//! ```

use rehearsal_engine::{
    check_recurrence, classify, expand_occurrences, format_date, free_ranges_across, synthesize,
    Activity, AvailabilityWindow, Interval, RecurrenceRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

fn parse<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn render<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn to_js(result: Result<String, String>) -> Result<String, JsValue> {
    result.map_err(|e| JsValue::from_str(&e))
}

// ---------------------------------------------------------------------------
// Boundary-free implementations (testable on the host target)
// ---------------------------------------------------------------------------

fn expand_occurrences_json(request_json: &str) -> Result<String, String> {
    let request: RecurrenceRequest = parse("request", request_json)?;
    let dates: Vec<String> = expand_occurrences(&request)
        .into_iter()
        .map(format_date)
        .collect();
    render(&dates)
}

fn classify_conflicts_json(candidate_json: &str, existing_json: &str) -> Result<String, String> {
    let candidate: Activity = parse("candidate", candidate_json)?;
    let existing: Vec<Activity> = parse("existing activities", existing_json)?;
    render(&classify(&candidate, &existing))
}

fn check_recurrence_json(request_json: &str, existing_json: &str) -> Result<String, String> {
    let request: RecurrenceRequest = parse("request", request_json)?;
    let existing: Vec<Activity> = parse("existing activities", existing_json)?;
    render(&check_recurrence(&request, &existing))
}

fn synthesize_slots_json(
    windows_json: &str,
    occupied_json: &str,
    chosen_json: &str,
    durations_json: &str,
) -> Result<String, String> {
    let windows: Vec<AvailabilityWindow> = parse("windows", windows_json)?;
    let occupied: Vec<Interval> = parse("occupied", occupied_json)?;
    let chosen: Vec<Interval> = parse("already chosen", chosen_json)?;
    let durations: Vec<u32> = parse("durations", durations_json)?;
    render(&synthesize(&windows, &occupied, &chosen, &durations))
}

fn free_ranges_json(windows_json: &str, occupied_json: &str) -> Result<String, String> {
    let windows: Vec<AvailabilityWindow> = parse("windows", windows_json)?;
    let occupied: Vec<Interval> = parse("occupied", occupied_json)?;
    render(&free_ranges_across(&windows, &occupied))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand a weekly recurrence request.
///
/// Returns a JSON array of `YYYY-MM-DD` strings.
#[wasm_bindgen(js_name = "expandOccurrences")]
pub fn expand_occurrences_js(request_json: &str) -> Result<String, JsValue> {
    to_js(expand_occurrences_json(request_json))
}

/// Classify a candidate activity against a JSON array of existing activities.
///
/// Returns a JSON conflict report `{findings, has_critical}`.
#[wasm_bindgen(js_name = "classifyConflicts")]
pub fn classify_conflicts_js(candidate_json: &str, existing_json: &str) -> Result<String, JsValue> {
    to_js(classify_conflicts_json(candidate_json, existing_json))
}

/// Expand a recurrence request and classify each occurrence.
///
/// Returns a JSON plan `{occurrences: [{date, candidate, report}], has_critical}`.
#[wasm_bindgen(js_name = "checkRecurrence")]
pub fn check_recurrence_js(request_json: &str, existing_json: &str) -> Result<String, JsValue> {
    to_js(check_recurrence_json(request_json, existing_json))
}

/// Synthesize candidate slots.
///
/// `windows_json` is an array of `{day, start, end, location?}`;
/// `occupied_json` and `chosen_json` are arrays of intervals; `durations_json`
/// is an array of minutes. Returns an array of
/// `{day, start, end, duration_minutes, location?}`.
#[wasm_bindgen(js_name = "synthesizeSlots")]
pub fn synthesize_slots_js(
    windows_json: &str,
    occupied_json: &str,
    chosen_json: &str,
    durations_json: &str,
) -> Result<String, JsValue> {
    to_js(synthesize_slots_json(
        windows_json,
        occupied_json,
        chosen_json,
        durations_json,
    ))
}

/// Free ranges inside each availability window, in window order.
#[wasm_bindgen(js_name = "freeRanges")]
pub fn free_ranges_js(windows_json: &str, occupied_json: &str) -> Result<String, JsValue> {
    to_js(free_ranges_json(windows_json, occupied_json))
}

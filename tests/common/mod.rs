#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

use seat_desk::{backend::BackendClient, config::Config, AppState};

pub fn client_for(server: &MockServer) -> BackendClient {
    BackendClient::from_config(&Config::for_backend(server.uri()).backend).unwrap()
}

pub fn state_for(server: &MockServer) -> Arc<AppState> {
    AppState::new(Config::for_backend(server.uri())).unwrap()
}

pub fn student(seat: &str, name: &str, day_type: &str) -> Value {
    json!({
        "Seat No": seat,
        "Name": name,
        "Day Type": day_type,
        "Charge": 800,
        "Status": "Pending",
        "Start Date": "01 April",
        "Expiry Date": "01 May 2025",
        "Phone": "9800000000",
    })
}

pub fn sample_roster() -> Value {
    json!([
        student("10", "Ravi", "Full Day"),
        student("2", "Vacant", "Morning Half"),
        student("31_B", "Meera", "Evening Half"),
        student("31", "Anita", "Full Day"),
        student("31_A", "vacant", "Morning Half"),
        student("abc", "Ghost", ""),
    ])
}

pub fn seats(entries: &[Value]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e["Seat No"].as_str().unwrap_or_default().to_string())
        .collect()
}

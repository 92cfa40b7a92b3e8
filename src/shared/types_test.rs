//! Test to trigger ts-rs bindings export
//! Run with: cargo test export_bindings

#[cfg(test)]
mod tests {
    use crate::shared::settings::AppSettings;
    use crate::shared::types::*;
    use ts_rs::TS;

    #[test]
    fn export_bindings() {
        // Writes into the ts-rs output directory (TS_RS_EXPORT_DIR, default ./bindings)
        ActionType::export().expect("Failed to export ActionType");
        QuickAction::export().expect("Failed to export QuickAction");
        ConvertUnitsRequest::export().expect("Failed to export ConvertUnitsRequest");
        CaseConvertResponse::export().expect("Failed to export CaseConvertResponse");
        AppSettings::export().expect("Failed to export AppSettings");
    }

    #[test]
    fn action_type_wire_format() {
        let json = serde_json::to_value(ActionType::ConvertUnit { target: "km".into() }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "ConvertUnit", "payload": { "target": "km" } }));

        let back: ActionType = serde_json::from_value(serde_json::json!({ "type": "AnalyzeText" })).unwrap();
        assert_eq!(back, ActionType::AnalyzeText);
    }
}

use crate::core::operation::Operation;
use crate::core::rules::{rules_for, Check, Expectations};
use crate::core::{Payload, PayloadShape, ResponseEnvelope};
use crate::utils::json_path::{as_text, lookup_in, lookup_non_null};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// 單次驗證的結果：所有失敗訊息都會保留
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub operation: String,
    pub failures: Vec<String>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 依操作名稱分派的欄位驗證器，本身不保存任何呼叫之間的狀態
#[derive(Debug, Clone, Default)]
pub struct FieldValidator {
    expectations: Expectations,
}

impl FieldValidator {
    pub fn new(expectations: Expectations) -> Self {
        Self { expectations }
    }

    /// 以操作名稱驗證；未知名稱一律判定失敗
    pub fn validate_by_name(&self, name: &str, envelope: &ResponseEnvelope) -> ValidationReport {
        match name.parse::<Operation>() {
            Ok(operation) => self.validate(operation, envelope),
            Err(e) => {
                tracing::warn!("❌ {}", e);
                ValidationReport {
                    operation: name.to_string(),
                    failures: vec![e.to_string()],
                }
            }
        }
    }

    pub fn validate(&self, operation: Operation, envelope: &ResponseEnvelope) -> ValidationReport {
        tracing::debug!("🔍 {} response:\n{}", operation, envelope.pretty_body());

        let rules = rules_for(operation, &self.expectations);

        let mut failures = status_failures(envelope);
        failures.extend(
            rules
                .checks
                .iter()
                .flat_map(|check| evaluate(check, &envelope.payload)),
        );

        for failure in &failures {
            tracing::warn!("❌ {}: {}", operation, failure);
        }

        if failures.is_empty() {
            tracing::info!("✅ {}: All validations passed.", operation);
        } else {
            tracing::warn!("⚠️ {}: {} validation(s) failed.", operation, failures.len());
        }

        ValidationReport {
            operation: operation.name().to_string(),
            failures,
        }
    }
}

fn status_failures(envelope: &ResponseEnvelope) -> Vec<String> {
    let mut failures = Vec::new();

    if lookup_non_null(&envelope.body, "Status").is_none() {
        failures.push("Missing field in response: Status".to_string());
    }

    if envelope.domain_status.as_deref() != Some("OK") {
        failures.push("Status field is missing or invalid in the response.".to_string());
    }

    failures
}

fn evaluate(check: &Check, payload: &Payload) -> Vec<String> {
    match check {
        Check::ValuesUnique(field) => match payload {
            Payload::List(items) => unique_failures(field, items),
            Payload::Single(_) => vec![format!("{} uniqueness requires a list payload.", field)],
            Payload::Absent => vec![format!("Results are missing; cannot check {} uniqueness.", field)],
        },
        Check::PayloadNonEmpty if payload.is_empty() => {
            vec!["Results array is missing or empty.".to_string()]
        }
        Check::PayloadNonEmpty => Vec::new(),
        Check::Each { path, checks } => match payload {
            Payload::Single(map) => nested_failures(map, path, checks),
            _ => vec![format!("{} requires a single object payload.", path)],
        },
        element_check => match payload {
            Payload::Single(map) => element_failures(element_check, map, None),
            Payload::List(items) => items
                .iter()
                .enumerate()
                .flat_map(|(index, item)| element_failures(element_check, item, Some(index)))
                .collect(),
            Payload::Absent => vec![format!(
                "Results are missing; cannot check {}.",
                check_field(element_check)
            )],
        },
    }
}

fn unique_failures(field: &str, items: &[Map<String, Value>]) -> Vec<String> {
    let values: HashSet<String> = items
        .iter()
        .map(|item| {
            lookup_in(item, field)
                .map(Value::to_string)
                .unwrap_or_else(|| Value::Null.to_string())
        })
        .collect();

    if values.len() == items.len() {
        Vec::new()
    } else {
        vec![format!(
            "{} is not unique ({} distinct values across {} items).",
            field,
            values.len(),
            items.len()
        )]
    }
}

fn nested_failures(map: &Map<String, Value>, path: &str, checks: &[Check]) -> Vec<String> {
    let nested = Payload::from_value(lookup_in(map, path), PayloadShape::List);

    match &nested {
        Payload::List(items) if !items.is_empty() => checks
            .iter()
            .flat_map(|check| evaluate(check, &nested))
            .map(|failure| format!("{}: {}", path, failure))
            .collect(),
        _ => vec![format!("{} array is missing or empty.", path)],
    }
}

fn element_failures(check: &Check, item: &Map<String, Value>, index: Option<usize>) -> Vec<String> {
    let location = match index {
        Some(i) => format!(" for object at index {}", i),
        None => " in the response".to_string(),
    };
    let value = lookup_in(item, check_field(check)).filter(|v| !v.is_null());

    let failure = match check {
        Check::FieldPresent(field) => value.is_none().then(|| format!("{} is missing{}.", field, location)),
        Check::FieldNonEmpty(field) => value
            .filter(|v| !as_text(v).is_empty())
            .is_none()
            .then(|| format!("{} is missing or empty{}.", field, location)),
        Check::FieldEquals { field, expected } => (value != Some(expected)).then(|| {
            format!(
                "{} is missing or does not match the expected value {}{}.",
                field, expected, location
            )
        }),
        Check::NonZeroInteger(field) => {
            let is_valid = value
                .and_then(|v| v.as_i64().or_else(|| v.as_u64().map(|_| 1)))
                .is_some_and(|n| n != 0);
            (!is_valid).then(|| format!("{} is missing or invalid{}.", field, location))
        }
        Check::DateInRange { field, from, to } => {
            let in_range = value
                .and_then(Value::as_str)
                .is_some_and(|date| date >= from.as_str() && date <= to.as_str());
            (!in_range).then(|| {
                format!(
                    "{} date is out of range [{}, {}]: {}{}.",
                    field,
                    from,
                    to,
                    value.map(as_text).unwrap_or_else(|| "null".to_string()),
                    location
                )
            })
        }
        Check::ValuesUnique(_) | Check::PayloadNonEmpty | Check::Each { .. } => None,
    };

    failure.into_iter().collect()
}

fn check_field(check: &Check) -> &str {
    match check {
        Check::FieldPresent(field)
        | Check::FieldNonEmpty(field)
        | Check::NonZeroInteger(field)
        | Check::ValuesUnique(field) => field.as_str(),
        Check::FieldEquals { field, .. } | Check::DateInRange { field, .. } => field.as_str(),
        Check::Each { path, .. } => path.as_str(),
        Check::PayloadNonEmpty => "Results",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(operation: Operation, body: Value) -> ResponseEnvelope {
        let domain_status = lookup_non_null(&body, "Status").map(as_text);
        let payload = Payload::from_value(
            crate::utils::json_path::lookup(&body, operation.payload_path()),
            operation.payload_shape(),
        );

        ResponseEnvelope {
            raw_body: body.to_string(),
            body,
            status_code: 200,
            domain_status,
            payload,
        }
    }

    fn validate(operation: Operation, body: Value) -> ValidationReport {
        FieldValidator::default().validate(operation, &envelope(operation, body))
    }

    fn doctors(results: Value) -> Value {
        json!({"Status": "OK", "Results": results})
    }

    #[test]
    fn test_doctors_list_all_fields_present_passes() {
        let report = validate(
            Operation::DoctorsList,
            doctors(json!([
                {"EmployeeId": 1, "FirstName": "Ada", "LastName": "Lovelace"},
                {"EmployeeId": 2, "FirstName": "Grace", "LastName": "Hopper"}
            ])),
        );
        assert!(report.passed(), "{:?}", report.failures);
    }

    #[test]
    fn test_doctors_list_single_null_field_fails() {
        let report = validate(
            Operation::DoctorsList,
            doctors(json!([
                {"EmployeeId": 1, "FirstName": "Ada", "LastName": "Lovelace"},
                {"EmployeeId": 2, "FirstName": null, "LastName": "Hopper"}
            ])),
        );
        assert!(!report.passed());
        assert_eq!(report.failures, vec!["FirstName is missing for object at index 1."]);
    }

    #[test]
    fn test_doctors_list_empty_fails() {
        let report = validate(Operation::DoctorsList, doctors(json!([])));
        assert_eq!(report.failures, vec!["Results array is missing or empty."]);
    }

    #[test]
    fn test_missing_status_fails_every_operation() {
        for op in Operation::ALL {
            let report = validate(op, json!({"Results": []}));
            assert!(!report.passed(), "{} passed without Status", op);
            assert!(report
                .failures
                .contains(&"Missing field in response: Status".to_string()));
        }
    }

    #[test]
    fn test_non_ok_status_fails() {
        let report = validate(
            Operation::FilmTypesInRadiology,
            json!({"Status": "Failed", "Results": [{"FilmTypeId": 1, "FilmType": "X-Ray"}]}),
        );
        assert_eq!(
            report.failures,
            vec!["Status field is missing or invalid in the response."]
        );
    }

    #[test]
    fn test_duplicate_identifiers_fail_uniqueness() {
        let report = validate(
            Operation::FilmTypesInRadiology,
            json!({"Status": "OK", "Results": [
                {"FilmTypeId": 1, "FilmType": "X-Ray"},
                {"FilmTypeId": 1, "FilmType": "CT"}
            ]}),
        );
        assert!(!report.passed());
        assert!(report.failures[0].starts_with("FilmTypeId is not unique"));
    }

    #[test]
    fn test_unique_identifiers_pass() {
        let results = json!([
            {"PatientVisitId": 10, "PatientAdmissionId": 100, "PatientId": 1},
            {"PatientVisitId": 11, "PatientAdmissionId": 101, "PatientId": 2},
            {"PatientVisitId": 12, "PatientAdmissionId": 102, "PatientId": 1}
        ]);
        let report = validate(
            Operation::DischargedPatients,
            json!({"Status": "OK", "Results": results}),
        );
        assert!(report.passed(), "{:?}", report.failures);

        let ids: HashSet<i64> = results
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["PatientVisitId"].as_i64().unwrap())
            .collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_missing_identifiers_collapse_into_duplicate() {
        let report = validate(
            Operation::ConsumptionsListOfAPatientById,
            json!({"Status": "OK", "Results": [{"TotalAmount": 1}, {"TotalAmount": 2}]}),
        );
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].starts_with("PatientConsumptionId is not unique"));
    }

    fn imaging(created_on: &str) -> Value {
        json!({"Status": "OK", "Results": [{"ImagingRequisitionId": 1, "CreatedOn": created_on}]})
    }

    #[test]
    fn test_created_on_inside_range_passes() {
        let report = validate(Operation::ImagingReportsWithStatusAndDateRange, imaging("2024-06-01"));
        assert!(report.passed(), "{:?}", report.failures);
    }

    #[test]
    fn test_created_on_before_range_fails() {
        let report = validate(Operation::ImagingReportsWithStatusAndDateRange, imaging("2023-12-31"));
        assert!(!report.passed());
        assert!(report.failures[0].contains("2023-12-31"));
    }

    #[test]
    fn test_created_on_bounds_are_inclusive() {
        assert!(validate(Operation::ImagingReportsWithStatusAndDateRange, imaging("2024-01-14")).passed());
        // 帶時間的字串字典序大於純日期上界
        assert!(!validate(
            Operation::ImagingReportsWithStatusAndDateRange,
            imaging("2025-01-21T10:00:00")
        )
        .passed());
    }

    fn admitted(bill_items: Value) -> Value {
        json!({"Status": "OK", "Results": {
            "Patient": {"PatientId": 176},
            "BillItems": bill_items
        }})
    }

    #[test]
    fn test_admitted_patient_with_valid_bill_items_passes() {
        let report = validate(
            Operation::AdmittedPatientData,
            admitted(json!([{
                "PatientId": 176,
                "Price": 250.0,
                "BillStatus": "provisional",
                "BillingType": "inpatient",
                "VisitType": "inpatient"
            }])),
        );
        assert!(report.passed(), "{:?}", report.failures);
    }

    #[test]
    fn test_admitted_patient_empty_bill_items_fails() {
        let report = validate(Operation::AdmittedPatientData, admitted(json!([])));
        assert_eq!(report.failures, vec!["BillItems array is missing or empty."]);
    }

    #[test]
    fn test_admitted_patient_wrong_literals_fail_cumulatively() {
        let report = validate(
            Operation::AdmittedPatientData,
            json!({"Status": "OK", "Results": {
                "Patient": {"PatientId": 177},
                "BillItems": [{
                    "PatientId": 176,
                    "Price": 250.0,
                    "BillStatus": "paid",
                    "BillingType": "outpatient",
                    "VisitType": "inpatient"
                }]
            }}),
        );
        assert_eq!(report.failures.len(), 3);
        assert!(report.failures[0].starts_with("Patient.PatientId"));
        assert!(report.failures[1].starts_with("BillItems: BillStatus"));
        assert!(report.failures[2].starts_with("BillItems: BillingType"));
    }

    #[test]
    fn test_main_store_requires_non_zero_store_id() {
        let ok = validate(Operation::MainStore, json!({"Status": "OK", "Results": {"StoreId": 1}}));
        assert!(ok.passed());

        let zero = validate(Operation::MainStore, json!({"Status": "OK", "Results": {"StoreId": 0}}));
        assert_eq!(zero.failures, vec!["StoreId is missing or invalid in the response."]);

        let text = validate(Operation::MainStore, json!({"Status": "OK", "Results": {"StoreId": "1"}}));
        assert!(!text.passed());
    }

    #[test]
    fn test_all_stocks_rejects_empty_strings() {
        let report = validate(
            Operation::AllStocks,
            json!({"Status": "OK", "Results": [
                {"ItemId": 1, "ItemName": "", "GenericName": "Paracetamol"}
            ]}),
        );
        assert_eq!(report.failures, vec!["ItemName is missing or empty for object at index 0."]);
    }

    #[test]
    fn test_absent_payload_is_a_local_failure() {
        let report = validate(
            Operation::PatientConsumptionInfoByPatientIdAndVisitId,
            json!({"Status": "OK", "Results": {}}),
        );
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures.iter().all(|f| f.starts_with("Results are missing")));
    }

    #[test]
    fn test_nested_payload_path_is_validated() {
        let report = validate(
            Operation::RequisitionByDateRange,
            json!({"Status": "OK", "Results": {"requisitionList": [
                {"RequisitionId": 1, "RequistionNo": 11, "RequisitionStatus": "active"},
                {"RequisitionId": 2, "RequistionNo": 12, "RequisitionStatus": "complete"}
            ]}}),
        );
        assert!(report.passed(), "{:?}", report.failures);
    }

    #[test]
    fn test_created_on_missing_or_not_text_fails() {
        let missing = validate(
            Operation::ImagingReportsWithStatusAndDateRange,
            json!({"Status": "OK", "Results": [{"ImagingRequisitionId": 1}]}),
        );
        assert_eq!(
            missing.failures,
            vec!["CreatedOn date is out of range [2024-01-14, 2025-01-21]: null for object at index 0."]
        );

        let numeric = validate(
            Operation::ImagingReportsWithStatusAndDateRange,
            json!({"Status": "OK", "Results": [{"ImagingRequisitionId": 1, "CreatedOn": 20240601}]}),
        );
        assert_eq!(numeric.failures.len(), 1);
        assert!(numeric.failures[0].contains("20240601"));
    }

    fn prov_items(bill_items: Value) -> Value {
        json!({"Status": "OK", "Results": {"BillItems": bill_items}})
    }

    #[test]
    fn test_in_patient_prov_items_complete_passes() {
        let report = validate(
            Operation::InPatientProvItems,
            prov_items(json!([
                {"BillingTransactionItemId": 1, "ServiceDepartmentName": "Lab", "ItemName": "CBC"}
            ])),
        );
        assert!(report.passed(), "{:?}", report.failures);
    }

    #[test]
    fn test_in_patient_prov_items_empty_bill_items_fails() {
        let report = validate(Operation::InPatientProvItems, prov_items(json!([])));
        assert_eq!(report.failures, vec!["Results array is missing or empty."]);
    }

    #[test]
    fn test_in_patient_prov_items_absent_bill_items_fails() {
        let report = validate(
            Operation::InPatientProvItems,
            json!({"Status": "OK", "Results": {}}),
        );
        assert_eq!(report.failures[0], "Results array is missing or empty.");
        assert!(report
            .failures
            .contains(&"Results are missing; cannot check ServiceDepartmentName.".to_string()));
    }

    #[test]
    fn test_in_patient_prov_items_missing_department_fails() {
        let report = validate(
            Operation::InPatientProvItems,
            prov_items(json!([
                {"BillingTransactionItemId": 1, "ItemName": "CBC"}
            ])),
        );
        assert_eq!(
            report.failures,
            vec!["ServiceDepartmentName is missing for object at index 0."]
        );
    }

    #[test]
    fn test_missing_required_field_per_operation() {
        let cases = [
            (
                Operation::RequisitionsByOrderStatusAndDateRange,
                json!([
                    {"ImagingRequisitionId": 1, "CreatedOn": "2024-02-01"},
                    {"ImagingRequisitionId": 2}
                ]),
                "CreatedOn is missing for object at index 1.",
            ),
            (
                Operation::PatientConsumptions,
                json!([{"PatientId": 1}]),
                "HospitalNo is missing for object at index 0.",
            ),
            (
                Operation::BillingSchemeBySchemeId,
                json!({"SchemeId": 4}),
                "SchemeCode is missing in the response.",
            ),
            (
                Operation::BillingSummaryByPatientId,
                json!({"PatientId": 176, "TotalDue": null}),
                "TotalDue is missing in the response.",
            ),
        ];

        for (operation, results, expected) in cases {
            let report = validate(operation, json!({"Status": "OK", "Results": results}));
            assert_eq!(report.failures, vec![expected.to_string()], "{}", operation);
        }
    }

    #[test]
    fn test_uniqueness_on_absent_list_fails() {
        let missing = validate(Operation::FilmTypesInRadiology, json!({"Status": "OK"}));
        assert_eq!(
            missing.failures,
            vec![
                "Results are missing; cannot check FilmTypeId uniqueness.",
                "Results are missing; cannot check FilmType.",
            ]
        );

        // 物件而非陣列同樣視為缺失
        let wrong_shape = validate(
            Operation::FilmTypesInRadiology,
            json!({"Status": "OK", "Results": {"FilmTypeId": 1}}),
        );
        assert!(wrong_shape.failures[0].contains("cannot check FilmTypeId uniqueness"));
    }

    #[test]
    fn test_unknown_operation_fails_explicitly() {
        let env = envelope(Operation::DoctorsList, doctors(json!([])));
        let report = FieldValidator::default().validate_by_name("getEverything", &env);
        assert_eq!(report.operation, "getEverything");
        assert_eq!(
            report.failures,
            vec!["Method getEverything is not recognized for validation"]
        );
    }

    #[test]
    fn test_validation_is_idempotent() {
        let validator = FieldValidator::default();
        let env = envelope(
            Operation::ReturnConsumptionsList,
            json!({"Status": "OK", "Results": [
                {"ConsumptionReturnReceiptNo": 5, "PatientId": 1},
                {"ConsumptionReturnReceiptNo": 5, "PatientId": null}
            ]}),
        );

        let first = validator.validate_by_name("getReturnConsumptionsList", &env);
        let second = validator.validate_by_name("getReturnConsumptionsList", &env);
        assert_eq!(first, second);
        assert!(!first.passed());
    }
}

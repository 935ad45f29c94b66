use crate::core::operation::Operation;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 規則表中會用到的預期值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expectations {
    pub admitted_patient_id: i64,
    pub date_from: String,
    pub date_to: String,
}

impl Default for Expectations {
    fn default() -> Self {
        Self {
            admitted_patient_id: 176,
            date_from: "2024-01-14".to_string(),
            date_to: "2025-01-21".to_string(),
        }
    }
}

/// 單一宣告式檢查
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    /// 欄位存在且不為 null
    FieldPresent(String),
    /// 欄位存在且文字形式不為空字串
    FieldNonEmpty(String),
    FieldEquals { field: String, expected: Value },
    /// 非零整數
    NonZeroInteger(String),
    /// 清單中該欄位的值不可重複
    ValuesUnique(String),
    /// ISO-8601 日期字串落在 [from, to]（字典序比較）
    DateInRange {
        field: String,
        from: String,
        to: String,
    },
    PayloadNonEmpty,
    /// 單一物件內的巢狀陣列：必須非空，且每個元素都要通過 `checks`
    Each { path: String, checks: Vec<Check> },
}

impl Check {
    pub fn present(field: &str) -> Self {
        Check::FieldPresent(field.to_string())
    }

    pub fn non_empty(field: &str) -> Self {
        Check::FieldNonEmpty(field.to_string())
    }

    pub fn equals(field: &str, expected: impl Into<Value>) -> Self {
        Check::FieldEquals {
            field: field.to_string(),
            expected: expected.into(),
        }
    }

    pub fn unique(field: &str) -> Self {
        Check::ValuesUnique(field.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub operation: Operation,
    pub checks: Vec<Check>,
}

pub fn rules_for(operation: Operation, expectations: &Expectations) -> RuleSet {
    let checks = match operation {
        Operation::AllStocks => vec![
            Check::non_empty("ItemId"),
            Check::non_empty("ItemName"),
            Check::non_empty("GenericName"),
        ],
        Operation::MainStore => vec![Check::NonZeroInteger("StoreId".to_string())],
        Operation::RequisitionByDateRange => vec![
            Check::unique("RequisitionId"),
            // 後端欄位名稱本身就拼成 RequistionNo
            Check::present("RequistionNo"),
            Check::present("RequisitionStatus"),
        ],
        Operation::PatientConsumptions => {
            vec![Check::present("PatientId"), Check::present("HospitalNo")]
        }
        Operation::PatientConsumptionInfoByPatientIdAndVisitId => {
            vec![Check::present("PatientId"), Check::present("PatientVisitId")]
        }
        Operation::BillingSchemeBySchemeId => {
            vec![Check::present("SchemeId"), Check::present("SchemeCode")]
        }
        Operation::BillingSummaryByPatientId => {
            vec![Check::present("PatientId"), Check::present("TotalDue")]
        }
        Operation::ConsumptionsListOfAPatientById => vec![
            Check::unique("PatientConsumptionId"),
            Check::present("TotalAmount"),
        ],
        Operation::ReturnConsumptionsList => vec![
            Check::unique("ConsumptionReturnReceiptNo"),
            Check::present("PatientId"),
        ],
        Operation::DischargedPatients => vec![
            Check::unique("PatientVisitId"),
            Check::unique("PatientAdmissionId"),
            Check::present("PatientId"),
        ],
        Operation::FilmTypesInRadiology => {
            vec![Check::unique("FilmTypeId"), Check::present("FilmType")]
        }
        Operation::RequisitionsByOrderStatusAndDateRange => vec![
            Check::unique("ImagingRequisitionId"),
            Check::present("CreatedOn"),
        ],
        Operation::ImagingReportsWithStatusAndDateRange => vec![
            Check::unique("ImagingRequisitionId"),
            Check::DateInRange {
                field: "CreatedOn".to_string(),
                from: expectations.date_from.clone(),
                to: expectations.date_to.clone(),
            },
        ],
        Operation::AdmittedPatientData => vec![
            Check::equals("Patient.PatientId", expectations.admitted_patient_id),
            Check::Each {
                path: "BillItems".to_string(),
                checks: vec![
                    Check::present("PatientId"),
                    Check::present("Price"),
                    Check::equals("BillStatus", "provisional"),
                    Check::equals("BillingType", "inpatient"),
                    Check::equals("VisitType", "inpatient"),
                ],
            },
        ],
        Operation::InPatientProvItems => vec![
            Check::PayloadNonEmpty,
            Check::present("BillingTransactionItemId"),
            Check::present("ServiceDepartmentName"),
            Check::present("ItemName"),
        ],
        Operation::DoctorsList => vec![
            Check::PayloadNonEmpty,
            Check::present("EmployeeId"),
            Check::present("FirstName"),
            Check::present("LastName"),
        ],
    };

    RuleSet { operation, checks }
}

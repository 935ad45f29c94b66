use crate::core::PayloadShape;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 受支援的 API 操作（封閉集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operation {
    AllStocks,
    MainStore,
    RequisitionByDateRange,
    PatientConsumptions,
    PatientConsumptionInfoByPatientIdAndVisitId,
    BillingSchemeBySchemeId,
    BillingSummaryByPatientId,
    ConsumptionsListOfAPatientById,
    ReturnConsumptionsList,
    DischargedPatients,
    FilmTypesInRadiology,
    RequisitionsByOrderStatusAndDateRange,
    ImagingReportsWithStatusAndDateRange,
    AdmittedPatientData,
    InPatientProvItems,
    DoctorsList,
}

impl Operation {
    pub const ALL: [Operation; 16] = [
        Operation::AllStocks,
        Operation::MainStore,
        Operation::RequisitionByDateRange,
        Operation::PatientConsumptions,
        Operation::PatientConsumptionInfoByPatientIdAndVisitId,
        Operation::BillingSchemeBySchemeId,
        Operation::BillingSummaryByPatientId,
        Operation::ConsumptionsListOfAPatientById,
        Operation::ReturnConsumptionsList,
        Operation::DischargedPatients,
        Operation::FilmTypesInRadiology,
        Operation::RequisitionsByOrderStatusAndDateRange,
        Operation::ImagingReportsWithStatusAndDateRange,
        Operation::AdmittedPatientData,
        Operation::InPatientProvItems,
        Operation::DoctorsList,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::AllStocks => "getAllStocks",
            Operation::MainStore => "getMainStore",
            Operation::RequisitionByDateRange => "getRequisitionByDateRange",
            Operation::PatientConsumptions => "getPatientConsumptions",
            Operation::PatientConsumptionInfoByPatientIdAndVisitId => {
                "getPatientConsumptionInfoByPatientIdAndVisitId"
            }
            Operation::BillingSchemeBySchemeId => "getBillingSchemeBySchemeId",
            Operation::BillingSummaryByPatientId => "getBillingSummaryByPatientId",
            Operation::ConsumptionsListOfAPatientById => "getConsumptionsListOfAPatientById",
            Operation::ReturnConsumptionsList => "getReturnConsumptionsList",
            Operation::DischargedPatients => "getDischargedPatients",
            Operation::FilmTypesInRadiology => "getFilmTypesInRadiology",
            Operation::RequisitionsByOrderStatusAndDateRange => {
                "getRequisitionsByOrderStatusAndDateRange"
            }
            Operation::ImagingReportsWithStatusAndDateRange => {
                "getImagingReportsWithStatusAndDateRange"
            }
            Operation::AdmittedPatientData => "getAdmittedPatientData",
            Operation::InPatientProvItems => "getInPatientProvItems",
            Operation::DoctorsList => "getDoctorsList",
        }
    }

    /// 回應中 payload 所在的路徑
    pub fn payload_path(&self) -> &'static str {
        match self {
            Operation::RequisitionByDateRange => "Results.requisitionList",
            Operation::PatientConsumptionInfoByPatientIdAndVisitId => {
                "Results.PatientConsumption"
            }
            Operation::InPatientProvItems => "Results.BillItems",
            _ => "Results",
        }
    }

    pub fn payload_shape(&self) -> PayloadShape {
        match self {
            Operation::MainStore
            | Operation::PatientConsumptionInfoByPatientIdAndVisitId
            | Operation::BillingSchemeBySchemeId
            | Operation::BillingSummaryByPatientId
            | Operation::AdmittedPatientData => PayloadShape::Single,
            _ => PayloadShape::List,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl fmt::Display for UnknownOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method {} is not recognized for validation", self.0)
    }
}

impl std::error::Error for UnknownOperation {}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

impl TryFrom<String> for Operation {
    type Error = UnknownOperation;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        op.name().to_string()
    }
}

//! Registry of compliance form types.
//!
//! Every operation that takes a form name (submit, list, get-one, last
//! submission, extract, reviewer update) resolves it here. The per-form
//! tables are created from this registry at migration time, so the schema
//! and the routing table cannot drift apart.

use crate::error::{AppError, AppResult};

/// A compliance form type. One SQLite table per variant, all sharing the
/// same column shape (see `db::migrations::ensure_form_tables`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    InformationSecurityPolicy,
    InformationSecurityRoles,
    EmployeeScreening,
    AssetInventory,
    AccessControlRequest,
    CryptographicControl,
    PhysicalSecurityChecklist,
    OperationsSecurityLog,
    NetworkSecurityIncidentLog,
    SecureDevelopmentChecklist,
    SupplierSecurityAssessment,
    IncidentResponseReport,
    BusinessContinuityPlanTestingLog,
    LegalRegulatoryComplianceChecklist,
}

/// (human-readable name, table name) for every form kind, in display order.
const FORMS: &[(FormKind, &str, &str)] = &[
    (
        FormKind::InformationSecurityPolicy,
        "Information Security Policy Review",
        "information_security_policy",
    ),
    (
        FormKind::InformationSecurityRoles,
        "Information Security Roles and Responsibilities",
        "information_security_roles",
    ),
    (
        FormKind::EmployeeScreening,
        "Employee Screening and Training Record",
        "employee_screening",
    ),
    (FormKind::AssetInventory, "Asset Inventory", "asset_inventory"),
    (
        FormKind::AccessControlRequest,
        "Access Control Request",
        "access_control_request",
    ),
    (
        FormKind::CryptographicControl,
        "Cryptographic Control Use",
        "cryptographic_control",
    ),
    (
        FormKind::PhysicalSecurityChecklist,
        "Physical Security Checklist",
        "physical_security_checklist",
    ),
    (
        FormKind::OperationsSecurityLog,
        "Operations Security Log",
        "operations_security_log",
    ),
    (
        FormKind::NetworkSecurityIncidentLog,
        "Network Security Incident Log",
        "network_security_incident_log",
    ),
    (
        FormKind::SecureDevelopmentChecklist,
        "Secure Development Checklist",
        "secure_development_checklist",
    ),
    (
        FormKind::SupplierSecurityAssessment,
        "Supplier Security Assessment",
        "supplier_security_assessment",
    ),
    (
        FormKind::IncidentResponseReport,
        "Incident Response Report",
        "incident_response_report",
    ),
    (
        FormKind::BusinessContinuityPlanTestingLog,
        "Business Continuity Plan Testing Log",
        "business_continuity_plan_testing_log",
    ),
    (
        FormKind::LegalRegulatoryComplianceChecklist,
        "Legal and Regulatory Compliance Checklist",
        "legal_regulatory_compliance_checklist",
    ),
];

impl FormKind {
    /// All form kinds, in display order.
    pub fn all() -> impl Iterator<Item = FormKind> {
        FORMS.iter().map(|(kind, _, _)| *kind)
    }

    /// Resolve a human-readable form name.
    pub fn from_name(name: &str) -> Option<FormKind> {
        FORMS
            .iter()
            .find(|(_, form_name, _)| *form_name == name)
            .map(|(kind, _, _)| *kind)
    }

    /// Resolve a form name, mapping unknown names to a 400-class error.
    pub fn resolve(name: &str) -> AppResult<FormKind> {
        FormKind::from_name(name)
            .ok_or_else(|| AppError::InvalidInput("Invalid form name".to_string()))
    }

    /// Human-readable form name.
    pub fn name(&self) -> &'static str {
        self.entry().1
    }

    /// SQLite table backing this form.
    pub fn table(&self) -> &'static str {
        self.entry().2
    }

    fn entry(&self) -> &'static (FormKind, &'static str, &'static str) {
        FORMS
            .iter()
            .find(|(kind, _, _)| kind == self)
            .expect("FormKind missing from registry")
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{validate_amount, validate_required, ValidationErrors};

/// One payee's transfer data; one record becomes exactly one invoice.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    #[schema(example = "INV-001")]
    pub invoice_num: String,
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "1 Main St, Tokyo")]
    pub full_address: String,
    #[schema(example = 10000.0)]
    pub amount: f64,
    #[schema(example = "Test Bank")]
    pub bank_name: String,
    #[schema(example = "HQ")]
    pub bank_branch: String,
    #[schema(example = "123456")]
    pub account_number: String,
}

impl InvoiceRecord {
    /// Validate all fields, collecting every problem before reporting.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        validate_required(&self.invoice_num, "invoiceNum", "Invoice number", &mut errors);
        validate_required(&self.full_name, "fullName", "Payee name", &mut errors);
        validate_required(&self.full_address, "fullAddress", "Payee address", &mut errors);
        validate_amount(self.amount, "amount", &mut errors);
        validate_required(&self.bank_name, "bankName", "Bank name", &mut errors);
        validate_required(&self.bank_branch, "bankBranch", "Branch name", &mut errors);
        validate_required(
            &self.account_number,
            "accountNumber",
            "Account number",
            &mut errors,
        );

        errors.into_result()
    }
}

/// Payload for the bulk endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchRequest {
    pub invoices: Vec<InvoiceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> InvoiceRecord {
        InvoiceRecord {
            invoice_num: "INV-001".to_string(),
            full_name: "Jane Doe".to_string(),
            full_address: "1 Main St".to_string(),
            amount: 10000.0,
            bank_name: "Test Bank".to_string(),
            bank_branch: "HQ".to_string(),
            account_number: "123456".to_string(),
        }
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(record().validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut r = record();
        r.full_name = "   ".to_string();
        let errors = r.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.to_report().contains("Payee name"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut r = record();
        r.amount = -1.0;
        assert!(r.validate().is_err());
    }
}

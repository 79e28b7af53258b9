//! Spreadsheet template filler.
//!
//! Loads the fixed `Invoice.xlsx` asset, writes one record's values into its
//! named cells, and saves the result as a uniquely named workbook in the
//! scratch directory. The cell coordinates below are a hard contract with
//! the template asset; changing the template means changing this mapping.

use std::path::PathBuf;

use chrono::Local;
use umya_spreadsheet::{reader, writer, HorizontalAlignmentValues};
use uuid::Uuid;

use super::models::InvoiceRecord;
use super::InvoiceError;
use crate::config::AppConfig;

/// Worksheet the template must contain.
pub const INVOICE_SHEET: &str = "Invoice";

// Cell contract with the template asset.
const CELL_DATE: &str = "F4";
const CELL_INVOICE_NUM: &str = "F5";
const CELL_FULL_NAME: &str = "B12";
const CELL_FULL_ADDRESS: &str = "B15";
const CELL_AMOUNT: &str = "F19";
const CELL_SUBTOTAL: &str = "F24";
const CELL_TAX_RATE: &str = "F25";
const CELL_TAX_AMOUNT: &str = "F26";
const CELL_OTHER: &str = "F27";
const CELL_TOTAL: &str = "F28";
const CELL_BANK_NAME: &str = "B26";
const CELL_BANK_BRANCH: &str = "B27";
const CELL_ACCOUNT_NUMBER: &str = "B29";
const CELL_ACCOUNT_HOLDER: &str = "B30";

const FMT_AMOUNT: &str = "#,##0.00";
const FMT_TOTAL: &str = "\u{a5}#,##0.00";

/// Placeholder rendered in money cells that do not apply.
const PLACEHOLDER_DASH: &str = "-";

/// Derived money lines for one invoice. `tax` is `None` when the template's
/// default tax rate is zero, in which case the tax cell renders a dash and
/// the total equals the subtotal.
#[derive(Debug, PartialEq)]
pub struct ComputedTotals {
    pub subtotal: f64,
    pub tax: Option<f64>,
    pub total: f64,
}

pub fn compute_totals(amount: f64, tax_rate: f64) -> ComputedTotals {
    let subtotal = amount;
    if tax_rate > 0.0 {
        let tax = subtotal * tax_rate;
        ComputedTotals {
            subtotal,
            tax: Some(tax),
            total: subtotal + tax,
        }
    } else {
        ComputedTotals {
            subtotal,
            tax: None,
            total: subtotal,
        }
    }
}

pub struct TemplateFiller {
    config: AppConfig,
}

impl TemplateFiller {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Fill the template for one record and return the path of the filled
    /// workbook. The caller owns the returned file and must delete it.
    pub fn fill(&self, record: &InvoiceRecord) -> Result<PathBuf, InvoiceError> {
        let template_path = self.config.template_path();
        if !template_path.exists() {
            return Err(InvoiceError::TemplateMissing(template_path));
        }

        let mut book = reader::xlsx::read(&template_path)
            .map_err(|e| InvoiceError::TemplateRead(e.to_string()))?;
        let sheet = book
            .get_sheet_by_name_mut(INVOICE_SHEET)
            .ok_or_else(|| InvoiceError::TemplateMalformed(INVOICE_SHEET.to_string()))?;

        let date = Local::now().format("%Y.%m.%d").to_string();
        sheet.get_cell_mut(CELL_DATE).set_value(date);
        sheet
            .get_style_mut(CELL_DATE)
            .get_alignment_mut()
            .set_horizontal(HorizontalAlignmentValues::Center);

        sheet
            .get_cell_mut(CELL_INVOICE_NUM)
            .set_value(record.invoice_num.clone());
        sheet
            .get_style_mut(CELL_INVOICE_NUM)
            .get_alignment_mut()
            .set_horizontal(HorizontalAlignmentValues::Center);

        sheet
            .get_cell_mut(CELL_FULL_NAME)
            .set_value(record.full_name.clone());
        sheet
            .get_cell_mut(CELL_FULL_ADDRESS)
            .set_value(record.full_address.clone());

        sheet
            .get_cell_mut(CELL_BANK_NAME)
            .set_value(format!(" Bank name: {}", record.bank_name));
        sheet
            .get_cell_mut(CELL_BANK_BRANCH)
            .set_value(format!(" Branch name: {}", record.bank_branch));
        sheet
            .get_cell_mut(CELL_ACCOUNT_NUMBER)
            .set_value(format!(" Account number: {}", record.account_number));
        sheet
            .get_cell_mut(CELL_ACCOUNT_HOLDER)
            .set_value(format!(" Account holder: {}", record.full_name));

        // The tax rate defaults live in the template itself.
        let tax_rate = sheet.get_value(CELL_TAX_RATE).parse::<f64>().unwrap_or(0.0);
        let totals = compute_totals(record.amount, tax_rate);

        sheet.get_cell_mut(CELL_AMOUNT).set_value_number(record.amount);
        sheet
            .get_cell_mut(CELL_SUBTOTAL)
            .set_value_number(totals.subtotal);

        match totals.tax {
            Some(tax) => {
                sheet.get_cell_mut(CELL_TAX_AMOUNT).set_value_number(tax);
                sheet
                    .get_style_mut(CELL_TAX_AMOUNT)
                    .get_number_format_mut()
                    .set_format_code(FMT_AMOUNT);
            }
            None => {
                sheet.get_cell_mut(CELL_TAX_AMOUNT).set_value(PLACEHOLDER_DASH);
                sheet
                    .get_style_mut(CELL_TAX_AMOUNT)
                    .get_alignment_mut()
                    .set_horizontal(HorizontalAlignmentValues::Right);
            }
        }

        sheet.get_cell_mut(CELL_OTHER).set_value(PLACEHOLDER_DASH);
        sheet
            .get_style_mut(CELL_OTHER)
            .get_alignment_mut()
            .set_horizontal(HorizontalAlignmentValues::Right);

        sheet.get_cell_mut(CELL_TOTAL).set_value_number(totals.total);

        for cell in [CELL_AMOUNT, CELL_SUBTOTAL] {
            sheet
                .get_style_mut(cell)
                .get_number_format_mut()
                .set_format_code(FMT_AMOUNT);
        }
        sheet
            .get_style_mut(CELL_TOTAL)
            .get_number_format_mut()
            .set_format_code(FMT_TOTAL);

        let out_path = self
            .config
            .tmp_dir
            .join(format!("invoice_{}.xlsx", Uuid::new_v4()));
        writer::xlsx::write(&book, &out_path)
            .map_err(|e| InvoiceError::TemplateWrite(e.to_string()))?;

        Ok(out_path)
    }
}

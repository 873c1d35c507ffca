use crate::error::ValidationErrors;
use crate::models::{Finance, Property};
use crate::sections::SectionForm;
use crate::wizard::progress::WizardStep;
use crate::wizard::validator::validate_finance;

/// Step 7 form: payout bank account and tax ids
#[derive(Debug, Clone, Default)]
pub struct FinanceForm {
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub pan_number: String,
    pub gst_number: String,
}

impl FinanceForm {
    /// Account number with all but the last four digits hidden
    pub fn masked_account_number(&self) -> String {
        let chars: Vec<char> = self.account_number.trim().chars().collect();
        let hidden = chars.len().saturating_sub(4);
        let tail: String = chars[hidden..].iter().collect();
        format!("{}{}", "*".repeat(hidden), tail)
    }
}

impl SectionForm for FinanceForm {
    type Payload = Finance;

    fn step(&self) -> WizardStep {
        WizardStep::Finance
    }

    fn load(property: &Property) -> Self {
        let f = &property.finance;
        Self {
            account_holder_name: f.account_holder_name.clone(),
            account_number: f.account_number.clone(),
            ifsc_code: f.ifsc_code.clone(),
            pan_number: f.pan_number.clone(),
            gst_number: f.gst_number.clone().unwrap_or_default(),
        }
    }

    /// Bank and tax identifiers are upper-cased; spaces in the account number dropped
    fn payload(&self) -> Finance {
        let gst = self.gst_number.trim().to_ascii_uppercase();
        Finance {
            account_holder_name: self.account_holder_name.trim().to_string(),
            account_number: self.account_number.chars().filter(|c| !c.is_whitespace()).collect(),
            ifsc_code: self.ifsc_code.trim().to_ascii_uppercase(),
            pan_number: self.pan_number.trim().to_ascii_uppercase(),
            gst_number: (!gst.is_empty()).then_some(gst),
        }
    }

    fn validate(&self) -> ValidationErrors {
        validate_finance(&self.payload())
    }

    fn is_dirty(&self, property: &Property) -> bool {
        self.payload() != property.finance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_normalises_identifiers() {
        let form = FinanceForm {
            account_holder_name: " Gita Bhawan Trust ".into(),
            account_number: "1234 5678 9012".into(),
            ifsc_code: "sbin0001234".into(),
            pan_number: "aaatg1234k".into(),
            gst_number: " ".into(),
        };
        let finance = form.payload();
        assert_eq!(finance.account_number, "123456789012");
        assert_eq!(finance.ifsc_code, "SBIN0001234");
        assert_eq!(finance.gst_number, None);
        assert!(form.validate().is_empty());
    }

    #[test]
    fn account_number_is_masked() {
        let form = FinanceForm {
            account_number: "123456789012".into(),
            ..Default::default()
        };
        assert_eq!(form.masked_account_number(), "********9012");
    }
}

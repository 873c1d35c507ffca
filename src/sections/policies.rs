use crate::error::ValidationErrors;
use crate::models::{Policies, Property};
use crate::sections::SectionForm;
use crate::wizard::progress::WizardStep;
use crate::wizard::validator::validate_policies;

/// Step 6 form: check-in/out, cancellation and house rules
#[derive(Debug, Clone, Default)]
pub struct PoliciesForm {
    pub check_in_time: String,
    pub check_out_time: String,
    pub cancellation_policy: String,
    house_rules: Vec<String>,
    pub pets_allowed: bool,
    pub smoking_allowed: bool,
}

impl PoliciesForm {
    pub fn house_rules(&self) -> &[String] {
        &self.house_rules
    }

    /// Blank and repeated rules are ignored
    pub fn add_rule(&mut self, rule: &str) {
        let rule = rule.trim();
        if !rule.is_empty() && !self.house_rules.iter().any(|r| r == rule) {
            self.house_rules.push(rule.to_string());
        }
    }

    pub fn remove_rule(&mut self, rule: &str) {
        self.house_rules.retain(|r| r != rule);
    }
}

impl SectionForm for PoliciesForm {
    type Payload = Policies;

    fn step(&self) -> WizardStep {
        WizardStep::Policies
    }

    fn load(property: &Property) -> Self {
        let p = &property.policies;
        Self {
            check_in_time: p.check_in_time.clone(),
            check_out_time: p.check_out_time.clone(),
            cancellation_policy: p.cancellation_policy.clone(),
            house_rules: p.house_rules.clone(),
            pets_allowed: p.pets_allowed,
            smoking_allowed: p.smoking_allowed,
        }
    }

    fn payload(&self) -> Policies {
        Policies {
            check_in_time: self.check_in_time.trim().to_string(),
            check_out_time: self.check_out_time.trim().to_string(),
            cancellation_policy: self.cancellation_policy.trim().to_string(),
            house_rules: self.house_rules.clone(),
            pets_allowed: self.pets_allowed,
            smoking_allowed: self.smoking_allowed,
        }
    }

    fn validate(&self) -> ValidationErrors {
        validate_policies(&self.payload())
    }

    fn is_dirty(&self, property: &Property) -> bool {
        self.payload() != property.policies
    }
}

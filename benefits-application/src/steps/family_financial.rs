use wizard_flow::Result;

use super::{FAMILY_FINANCIAL, StepEnv};
use crate::models::FamilyFinancialInfo;
use crate::rules::validate_family_financial_info;

pub async fn validate(env: &StepEnv, draft: &FamilyFinancialInfo) -> Result<bool> {
    if !env.check(FAMILY_FINANCIAL, validate_family_financial_info(draft))? {
        return Ok(false);
    }
    env.store.update_family_financial_info(draft.clone())?;
    env.step_saved("steps.family");
    Ok(true)
}

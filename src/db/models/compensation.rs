//! Compensation (CTC) models. Stored flat, returned with the allowance,
//! bonus and deduction groups nested.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// CTC record as stored, one current row per employee
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Compensation {
    pub id: String,
    pub employee_id: String,
    pub effective_date: String,
    pub annual_ctc: f64,
    pub monthly_in_hand: f64,
    pub housing_allowance: f64,
    pub transport_allowance: f64,
    pub meal_allowance: f64,
    pub performance_bonus: f64,
    pub year_end_bonus: f64,
    pub tax_deduction: f64,
    pub health_insurance: f64,
    pub provident_fund: f64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allowances {
    pub housing: f64,
    pub transport: f64,
    pub meal: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bonuses {
    pub performance: f64,
    pub year_end: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deductions {
    pub tax: f64,
    pub health_insurance: f64,
    pub provident_fund: f64,
}

/// CTC record shaped for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompensationResponse {
    pub id: String,
    pub employee_id: String,
    pub effective_date: String,
    pub annual_ctc: f64,
    pub monthly_in_hand: f64,
    pub allowances: Allowances,
    pub bonuses: Bonuses,
    pub deductions: Deductions,
}

impl From<Compensation> for CompensationResponse {
    fn from(c: Compensation) -> Self {
        Self {
            id: c.id,
            employee_id: c.employee_id,
            effective_date: c.effective_date,
            annual_ctc: c.annual_ctc,
            monthly_in_hand: c.monthly_in_hand,
            allowances: Allowances {
                housing: c.housing_allowance,
                transport: c.transport_allowance,
                meal: c.meal_allowance,
            },
            bonuses: Bonuses {
                performance: c.performance_bonus,
                year_end: c.year_end_bonus,
            },
            deductions: Deductions {
                tax: c.tax_deduction,
                health_insurance: c.health_insurance,
                provident_fund: c.provident_fund,
            },
        }
    }
}

/// Employee profile together with their current CTC record.
/// Compensation is optional on reads: a directory row can exist without
/// a matching compensation row.
#[derive(Debug, Serialize)]
pub struct EmployeeWithCompensation {
    pub employee: super::employee::EmployeeResponse,
    pub compensation: Option<CompensationResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_groups_components() {
        let record = Compensation {
            id: "c1".to_string(),
            employee_id: "e1".to_string(),
            effective_date: "2024-01-15".to_string(),
            annual_ctc: 60000.0,
            monthly_in_hand: 4000.0,
            housing_allowance: 500.0,
            transport_allowance: 150.0,
            meal_allowance: 100.0,
            performance_bonus: 2000.0,
            year_end_bonus: 1000.0,
            tax_deduction: 450.0,
            health_insurance: 120.0,
            provident_fund: 200.0,
            created_at: "2024-01-15T00:00:00Z".to_string(),
            updated_at: "2024-01-15T00:00:00Z".to_string(),
        };

        let response = CompensationResponse::from(record);
        assert_eq!(response.allowances.housing, 500.0);
        assert_eq!(response.bonuses.year_end, 1000.0);
        assert_eq!(response.deductions.provident_fund, 200.0);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["deductions"]["tax"], 450.0);
        assert!(json.get("housing_allowance").is_none());
    }
}

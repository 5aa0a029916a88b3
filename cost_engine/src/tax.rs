//! Rate tables and cost model calculators.
//!
//! The `tax` module centralises every rate the calculator uses in a
//! single [`RateTable`] and defines the [`CostModel`] trait that each
//! employment model implements.  Two implementations cover all four
//! models: [`GrossUpModel`] for payroll-style models where net pay is
//! grossed up through income tax withholding, and [`FlatFeeModel`] for
//! models that charge flat percentages on top of net pay.

use crate::error::RateError;
use crate::models::{Breakdown, CalculationInput, ModelKind, ModelResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rates for a model where the employer pays gross salary plus
/// contributions on the gross.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrossUpRates {
    /// Personal income tax withheld from gross pay (НДФЛ).
    pub income_tax: f64,
    /// Employer contributions charged on gross pay.
    pub insurance: f64,
}

/// Rates for a model charged as flat percentages of net pay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlatFeeRates {
    pub tax: f64,
    pub service_fee: f64,
}

/// Every rate used by the engine, keyed by model.
///
/// Rate tables may be stored externally as JSON:
///
/// ```json
/// {
///   "staff":          { "income_tax": 0.13, "insurance": 0.30 },
///   "civil_contract": { "income_tax": 0.13, "insurance": 0.076 },
///   "self_employed":  { "tax": 0.06, "service_fee": 0.02 },
///   "outstaffing":    { "tax": 0.09, "service_fee": 0.03 }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateTable {
    pub staff: GrossUpRates,
    pub civil_contract: GrossUpRates,
    pub self_employed: FlatFeeRates,
    pub outstaffing: FlatFeeRates,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            staff: GrossUpRates {
                income_tax: 0.13,
                insurance: 0.30,
            },
            // Pension and medical contributions only.
            civil_contract: GrossUpRates {
                income_tax: 0.13,
                insurance: 0.076,
            },
            self_employed: FlatFeeRates {
                tax: 0.06,
                service_fee: 0.02,
            },
            outstaffing: FlatFeeRates {
                tax: 0.09,
                service_fee: 0.03,
            },
        }
    }
}

impl RateTable {
    /// Parses and validates a rate table from JSON text.
    pub fn from_json_str(data: &str) -> Result<Self, RateError> {
        let table: RateTable = serde_json::from_str(data)?;
        table.validate()?;
        Ok(table)
    }

    /// Reads, parses and validates a rate table file.
    pub fn load(path: &Path) -> Result<Self, RateError> {
        let data = std::fs::read_to_string(path).map_err(|source| RateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&data)
    }

    /// Checks that every rate is usable: a finite share between 0.0 and
    /// 1.0.  Income tax rates must stay below 1.0 since gross pay is
    /// `net / (1 - income_tax)`.
    pub fn validate(&self) -> Result<(), RateError> {
        let rates = [
            ("staff.income_tax", self.staff.income_tax),
            ("staff.insurance", self.staff.insurance),
            ("civil_contract.income_tax", self.civil_contract.income_tax),
            ("civil_contract.insurance", self.civil_contract.insurance),
            ("self_employed.tax", self.self_employed.tax),
            ("self_employed.service_fee", self.self_employed.service_fee),
            ("outstaffing.tax", self.outstaffing.tax),
            ("outstaffing.service_fee", self.outstaffing.service_fee),
        ];
        for (field, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                return Err(RateError::Invalid { field, value });
            }
        }
        for (field, value) in [
            ("staff.income_tax", self.staff.income_tax),
            ("civil_contract.income_tax", self.civil_contract.income_tax),
        ] {
            if value >= 1.0 {
                return Err(RateError::IncomeRateTooHigh { field, value });
            }
        }
        Ok(())
    }
}

/// A cost model turns a normalised input into a [`ModelResult`].
///
/// Cost models must be thread-safe (`Send + Sync`) because batch
/// comparisons evaluate them concurrently.
pub trait CostModel: Send + Sync {
    fn kind(&self) -> ModelKind;
    fn compute(&self, input: &CalculationInput) -> ModelResult;
}

/// Payroll-style model: net pay is grossed up through income tax and
/// contributions are charged on the gross.  Used for staff and
/// civil-contract engagements.
pub struct GrossUpModel {
    pub kind: ModelKind,
    pub rates: GrossUpRates,
}

impl CostModel for GrossUpModel {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn compute(&self, input: &CalculationInput) -> ModelResult {
        let count = f64::from(input.employee_count);
        let gross = input.net_salary / (1.0 - self.rates.income_tax);
        let income_tax = gross * self.rates.income_tax;
        let insurance = gross * self.rates.insurance;
        let tax = income_tax + insurance;

        let mut breakdown = Breakdown::new();
        breakdown.insert("ndfl".to_string(), income_tax * count);
        breakdown.insert("insurance".to_string(), insurance * count);

        ModelResult {
            total: (gross + insurance) * count,
            tax: tax * count,
            net: input.net_salary * count,
            breakdown,
            percentage: burden_percent(
                tax,
                gross,
                self.rates.income_tax + self.rates.insurance,
            ),
        }
    }
}

/// Fee-style model: flat tax and service fee on top of net pay.  Used
/// for self-employed contractors and the outstaffing service.
pub struct FlatFeeModel {
    pub kind: ModelKind,
    pub rates: FlatFeeRates,
}

impl FlatFeeModel {
    fn tax_key(&self) -> &'static str {
        match self.kind {
            ModelKind::Outstaffing => "ourTax",
            _ => "tax",
        }
    }
}

impl CostModel for FlatFeeModel {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn compute(&self, input: &CalculationInput) -> ModelResult {
        let count = f64::from(input.employee_count);
        let tax = input.net_salary * self.rates.tax;
        let service_fee = input.net_salary * self.rates.service_fee;
        let burden = tax + service_fee;

        let mut breakdown = Breakdown::new();
        breakdown.insert(self.tax_key().to_string(), tax * count);
        breakdown.insert("serviceFee".to_string(), service_fee * count);

        ModelResult {
            total: (input.net_salary + burden) * count,
            tax: burden * count,
            net: input.net_salary * count,
            breakdown,
            percentage: burden_percent(
                burden,
                input.net_salary,
                self.rates.tax + self.rates.service_fee,
            ),
        }
    }
}

/// Whole-percent burden of `tax` relative to `base`.  A zero base has no
/// meaningful ratio, so the nominal rate sum is reported instead.
fn burden_percent(tax: f64, base: f64, nominal_rate: f64) -> u32 {
    let ratio = if base > 0.0 { tax / base } else { nominal_rate };
    (ratio * 100.0).round() as u32
}

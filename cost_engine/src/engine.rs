//! Cost comparison engine.
//!
//! The `engine` module turns a [`CalculationInput`] into a
//! [`ComparisonResult`].  Each employment model is an independent
//! [`CostModel`] built from the active [`RateTable`]; the comparison
//! runs all four and derives the savings figures.  Headcount batches
//! use the [`rayon`] crate to evaluate comparisons across CPU cores.
//!
//! The free functions `compute_*_model` and [`compare_models`] use the
//! built-in rate table and accept plain numbers, clamping them into the
//! engine's domain first.

use crate::models::{CalculationInput, ComparisonResult, ModelKind, ModelResult, ModelSet};
use crate::tax::{CostModel, FlatFeeModel, GrossUpModel, RateTable};
use rayon::prelude::*;
use tracing::debug;

/// Months used for the yearly saving projection.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// The recommended model shown with a badge on the site.
pub const BEST_OPTION: ModelKind = ModelKind::Outstaffing;

/// Runs comparisons against one rate table.  Holds no mutable state, so
/// a single engine can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct CostEngine {
    rates: RateTable,
}

impl CostEngine {
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// The calculator for one employment model under this engine's rates.
    pub fn model(&self, kind: ModelKind) -> Box<dyn CostModel> {
        match kind {
            ModelKind::Staff => Box::new(GrossUpModel {
                kind,
                rates: self.rates.staff,
            }),
            ModelKind::CivilContract => Box::new(GrossUpModel {
                kind,
                rates: self.rates.civil_contract,
            }),
            ModelKind::SelfEmployed => Box::new(FlatFeeModel {
                kind,
                rates: self.rates.self_employed,
            }),
            ModelKind::Outstaffing => Box::new(FlatFeeModel {
                kind,
                rates: self.rates.outstaffing,
            }),
        }
    }

    pub fn staff(&self, input: &CalculationInput) -> ModelResult {
        self.model(ModelKind::Staff).compute(input)
    }

    pub fn civil_contract(&self, input: &CalculationInput) -> ModelResult {
        self.model(ModelKind::CivilContract).compute(input)
    }

    pub fn self_employed(&self, input: &CalculationInput) -> ModelResult {
        self.model(ModelKind::SelfEmployed).compute(input)
    }

    pub fn outstaffing(&self, input: &CalculationInput) -> ModelResult {
        self.model(ModelKind::Outstaffing).compute(input)
    }

    /// Computes all four models for `input` and the saving of
    /// outstaffing over staff employment.
    pub fn compare(&self, input: &CalculationInput) -> ComparisonResult {
        let models = ModelSet {
            staff: self.staff(input),
            civil_contract: self.civil_contract(input),
            self_employed: self.self_employed(input),
            outstaffing: self.outstaffing(input),
        };
        let staff_total = models.staff.total;
        let monthly_saving = staff_total - models.outstaffing.total;
        let saving_percent = if staff_total.is_finite() && staff_total > 0.0 {
            round_to_tenth(monthly_saving / staff_total * 100.0)
        } else {
            0.0
        };
        debug!(
            net_salary = input.net_salary,
            employee_count = input.employee_count,
            region = input.region.as_deref().unwrap_or(""),
            monthly_saving,
            saving_percent,
            "compared employment models"
        );
        ComparisonResult {
            input: input.clone(),
            models,
            best_option: BEST_OPTION,
            monthly_saving,
            yearly_saving: monthly_saving * MONTHS_PER_YEAR,
            saving_percent,
        }
    }

    /// Compares the same salary across several headcounts, e.g. the
    /// quick-select presets on the calculator.  Results keep the order of
    /// `headcounts`; each headcount is clamped to at least one.
    pub fn compare_headcounts(&self, net_salary: f64, headcounts: &[u32]) -> Vec<ComparisonResult> {
        headcounts
            .par_iter()
            .map(|&count| self.compare(&CalculationInput::new(net_salary, i64::from(count))))
            .collect()
    }
}

pub fn compute_staff_model(net_salary: f64, employee_count: i64) -> ModelResult {
    CostEngine::default().staff(&CalculationInput::new(net_salary, employee_count))
}

pub fn compute_civil_contract_model(net_salary: f64, employee_count: i64) -> ModelResult {
    CostEngine::default().civil_contract(&CalculationInput::new(net_salary, employee_count))
}

pub fn compute_self_employed_model(net_salary: f64, employee_count: i64) -> ModelResult {
    CostEngine::default().self_employed(&CalculationInput::new(net_salary, employee_count))
}

pub fn compute_outstaffing_model(net_salary: f64, employee_count: i64) -> ModelResult {
    CostEngine::default().outstaffing(&CalculationInput::new(net_salary, employee_count))
}

pub fn compare_models(net_salary: f64, employee_count: i64) -> ComparisonResult {
    CostEngine::default().compare(&CalculationInput::new(net_salary, employee_count))
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-6 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_reference_scenario() {
        let result = compare_models(50_000.0, 10);
        let per_employee = compute_staff_model(50_000.0, 1);
        assert_close(per_employee.breakdown["ndfl"] + per_employee.net, 57_471.264_367_8);
        assert_close(per_employee.total, 74_712.643_678_2);
        assert_close(result.models.staff.total, 747_126.436_782);
        assert_close(result.models.self_employed.total, 540_000.0);
        assert_close(result.models.outstaffing.total, 560_000.0);
        assert_close(result.monthly_saving, 187_126.436_782);
        assert_close(result.yearly_saving, 2_245_517.241_38);
        assert_eq!(result.saving_percent, 25.0);
        assert_eq!(result.best_option, ModelKind::Outstaffing);
    }

    #[test]
    fn test_totals_balance_for_every_model() {
        for (salary, count) in [(50_000.0, 10), (1.0, 1), (123_456.78, 37), (0.0, 5)] {
            let result = compare_models(salary, count);
            for (kind, model) in result.models.iter() {
                assert_close(model.total, model.net + model.tax);
                let components: f64 = model.breakdown.values().sum();
                assert_close(components, model.tax);
                assert_eq!(model.breakdown.len(), 2, "{kind:?}");
            }
        }
    }

    #[test]
    fn test_percentages_are_rate_driven() {
        for (salary, count) in [(30_000.0, 1), (30_000.0, 250), (1_000_000.0, 7), (0.0, 1)] {
            let result = compare_models(salary, count);
            assert_eq!(result.models.staff.percentage, 43);
            assert_eq!(result.models.civil_contract.percentage, 21);
            assert_eq!(result.models.self_employed.percentage, 8);
            assert_eq!(result.models.outstaffing.percentage, 12);
        }
    }

    #[test]
    fn test_zero_salary() {
        for count in [1, 10, 1000] {
            let result = compare_models(0.0, count);
            for (_, model) in result.models.iter() {
                assert_eq!(model.total, 0.0);
                assert_eq!(model.tax, 0.0);
            }
            assert_eq!(result.monthly_saving, 0.0);
            assert_eq!(result.saving_percent, 0.0);
        }
    }

    #[test]
    fn test_linear_in_headcount() {
        for count in [1, 3, 50] {
            let single = compare_models(48_500.0, count);
            let double = compare_models(48_500.0, count * 2);
            for kind in ModelKind::ALL {
                assert_close(double.models.get(kind).total, 2.0 * single.models.get(kind).total);
            }
        }
    }

    #[test]
    fn test_out_of_domain_numbers_are_clamped() {
        let result = compare_models(-5_000.0, 0);
        assert_eq!(result.input.net_salary, 0.0);
        assert_eq!(result.input.employee_count, 1);
        assert_eq!(result.saving_percent, 0.0);

        let result = compare_models(f64::NAN, -3);
        assert!(!result.monthly_saving.is_nan());
    }

    #[test]
    fn test_huge_inputs_stay_finite() {
        let result = compare_models(1e300, 1_000_000_000);
        for (kind, model) in result.models.iter() {
            assert!(model.total.is_finite(), "{kind:?} total");
            assert!(model.tax.is_finite(), "{kind:?} tax");
            assert!(model.net.is_finite(), "{kind:?} net");
            assert!(model.breakdown.values().all(|v| v.is_finite()), "{kind:?} breakdown");
        }
        assert!(result.monthly_saving.is_finite());
        assert!(result.yearly_saving.is_finite());
        assert!(result.saving_percent.is_finite());
        assert_eq!(result.saving_percent, 25.0);

        let value = serde_json::to_value(&result).unwrap();
        assert!(value["monthly_saving"].is_number());
        assert!(value["saving_percent"].is_number());
    }

    #[test]
    fn test_compare_is_idempotent() {
        let engine = CostEngine::default();
        let input = CalculationInput::new(77_777.7, 13).with_region("moscow");
        assert_eq!(engine.compare(&input), engine.compare(&input));
    }

    #[test]
    fn test_best_option_is_fixed() {
        let mut rates = RateTable::default();
        rates.outstaffing.tax = 0.50;
        let result = CostEngine::new(rates).compare(&CalculationInput::new(50_000.0, 1));
        assert!(result.models.outstaffing.total > result.models.self_employed.total);
        assert_eq!(result.best_option, ModelKind::Outstaffing);
    }

    #[test]
    fn test_model_lookup() {
        let engine = CostEngine::default();
        for kind in ModelKind::ALL {
            assert_eq!(engine.model(kind).kind(), kind);
        }
    }

    #[test]
    fn test_compare_headcounts_keeps_order() {
        let engine = CostEngine::default();
        let results = engine.compare_headcounts(50_000.0, &[1, 5, 10, 0]);
        let counts: Vec<u32> = results.iter().map(|r| r.input.employee_count).collect();
        assert_eq!(counts, vec![1, 5, 10, 1]);
        assert_eq!(results[2], compare_models(50_000.0, 10));
    }
}

//! Data models for the Cost Engine.
//!
//! The `models` module defines the serialisable value types that flow
//! through the engine: the normalised [`CalculationInput`], one
//! [`ModelResult`] per employment model and the aggregate
//! [`ComparisonResult`].  All of them are plain immutable values built
//! fresh on every recalculation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalised input to the engine.
///
/// Construct it through [`CalculationInput::new`] (numeric values) or
/// [`crate::normalize::normalize`] (raw form values) so that the
/// invariants below always hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Take-home pay per employee per month, in rubles.  Never negative
    /// and never NaN.
    pub net_salary: f64,
    /// Number of employees.  Always at least one.
    pub employee_count: u32,
    /// Region code as selected on the form (e.g. `"moscow"`).  Carried
    /// through for the presentation layer; the rate table is the same
    /// for every region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl CalculationInput {
    /// Builds an input from already-numeric values, clamping anything
    /// outside the engine's domain to the floor values.
    pub fn new(net_salary: f64, employee_count: i64) -> Self {
        Self {
            net_salary: crate::normalize::clamp_salary(net_salary),
            employee_count: crate::normalize::clamp_employees(employee_count),
            region: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// The four employment models compared by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// A formally employed worker on the payroll.
    Staff,
    /// A civil-law contract (ГПХ) with reduced contributions.
    CivilContract,
    /// A self-employed contractor paid through a platform.
    SelfEmployed,
    /// The vendor's managed outstaffing service.
    Outstaffing,
}

impl ModelKind {
    /// All models in display order.
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Staff,
        ModelKind::CivilContract,
        ModelKind::SelfEmployed,
        ModelKind::Outstaffing,
    ];

    /// Heading shown on the model's result card.
    pub fn title(self) -> &'static str {
        match self {
            ModelKind::Staff => "Штатные сотрудники",
            ModelKind::CivilContract => "Договоры ГПХ",
            ModelKind::SelfEmployed => "Самозанятые",
            ModelKind::Outstaffing => "Наш аутстаффинг",
        }
    }

    /// Short label used under the comparison chart bars.
    pub fn chart_label(self) -> &'static str {
        match self {
            ModelKind::Staff => "Штатные",
            ModelKind::CivilContract => "ГПХ",
            ModelKind::SelfEmployed => "Самозанятые",
            ModelKind::Outstaffing => "Наш аутстаффинг",
        }
    }

    /// CSS colour of the model's comparison chart bar.
    pub fn chart_color(self) -> &'static str {
        match self {
            ModelKind::Staff => "#e63946",
            ModelKind::CivilContract => "#ff9f1c",
            ModelKind::SelfEmployed => "#2a9d8f",
            ModelKind::Outstaffing => "#25D366",
        }
    }
}

/// Named components of a model's tax burden.  Values sum to
/// [`ModelResult::tax`].
pub type Breakdown = BTreeMap<String, f64>;

/// Cost of one employment model, aggregated over all employees for one
/// month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    /// Total monthly cost to the employer.
    pub total: f64,
    /// Taxes, contributions and fees.
    pub tax: f64,
    /// Amount the employees take home.
    pub net: f64,
    /// Decomposition of `tax` with model-specific keys (`ndfl`,
    /// `insurance`, `tax`, `ourTax`, `serviceFee`).
    pub breakdown: Breakdown,
    /// Tax burden as a whole percentage of the model's base (gross pay
    /// for payroll models, net pay for fee models).
    pub percentage: u32,
}

/// One [`ModelResult`] per [`ModelKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSet {
    pub staff: ModelResult,
    pub civil_contract: ModelResult,
    pub self_employed: ModelResult,
    pub outstaffing: ModelResult,
}

impl ModelSet {
    pub fn get(&self, kind: ModelKind) -> &ModelResult {
        match kind {
            ModelKind::Staff => &self.staff,
            ModelKind::CivilContract => &self.civil_contract,
            ModelKind::SelfEmployed => &self.self_employed,
            ModelKind::Outstaffing => &self.outstaffing,
        }
    }

    /// Iterates the results in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ModelKind, &ModelResult)> + '_ {
        ModelKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

/// The aggregate produced by [`crate::engine::CostEngine::compare`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// The normalised input the comparison was computed from.
    pub input: CalculationInput,
    pub models: ModelSet,
    /// The option highlighted as recommended.  Always
    /// [`ModelKind::Outstaffing`]; this is a product decision and is not
    /// derived from the totals.
    pub best_option: ModelKind,
    /// Staff total minus outstaffing total.
    pub monthly_saving: f64,
    /// `monthly_saving * 12`.
    pub yearly_saving: f64,
    /// Monthly saving as a percentage of the staff total, one decimal.
    pub saving_percent: f64,
}

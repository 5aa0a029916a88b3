//! Presentation helpers.
//!
//! Formatting and chart data for the calculator widget.  Amounts are
//! shown in whole rubles with ru-RU digit grouping; nothing in here
//! feeds back into the engine.

use crate::models::{ComparisonResult, ModelKind};
use serde::{Deserialize, Serialize};

const COMPARISON_TITLE: &str = "🎯 Почему аутстаффинг лучше самозанятых";
const COMPARISON_SUBTITLE: &str =
    "При одинаковой налоговой нагрузке вы получаете полный пакет услуг";
const COMPARISON_NOTE: &str = "Самозанятые подходят только для простых задач без юридических рисков. \
    Для бизнеса с иностранными сотрудниками и защитой от проверок - только аутстаффинг через ЧАЗ.";
const OUTSTAFFING_ADVANTAGES: [&str; 8] = [
    "✅ Полная юридическая защита при проверках",
    "✅ Мы берем на себя все риски и общение с проверяющими",
    "✅ Работа с мигрантами (самозанятые - только россияне)",
    "✅ Отсутствие лимита по численности",
    "✅ Бухгалтерское и кадровое сопровождение",
    "✅ Защита от штрафов до 1 млн рублей за сотрудника",
    "✅ Оформление за 1-3 дня",
    "✅ Персональный менеджер 24/7",
];

const GROUP_SEPARATOR: char = '\u{a0}';
const RUBLE_SUFFIX: &str = "\u{a0}₽";

/// Formats `amount` as whole rubles, e.g. `747 126 ₽`.
pub fn format_rub(amount: f64) -> String {
    let mut out = format_number(amount);
    out.push_str(RUBLE_SUFFIX);
    out
}

/// Rounds to the nearest whole unit (halves away from zero) and groups
/// digits by three.  Non-finite amounts render as `0`.
pub fn format_number(amount: f64) -> String {
    let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

pub fn format_saving_percent(percent: f64) -> String {
    format!("{percent:.1}")
}

/// Yearly return on a one-off `initial_cost`, in percent.
pub fn roi_percent(initial_cost: f64, monthly_saving: f64) -> f64 {
    if initial_cost == 0.0 {
        return 0.0;
    }
    monthly_saving * 12.0 / initial_cost * 100.0
}

/// One bar of the total-cost comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub kind: ModelKind,
    pub label: String,
    pub color: String,
    pub value: f64,
    pub formatted: String,
    /// Bar height relative to the most expensive model, 0..=100.
    pub height_percent: f64,
}

pub fn chart_bars(result: &ComparisonResult) -> Vec<ChartBar> {
    let max = result
        .models
        .iter()
        .map(|(_, model)| model.total)
        .fold(0.0_f64, f64::max);
    result
        .models
        .iter()
        .map(|(kind, model)| ChartBar {
            kind,
            label: kind.chart_label().to_string(),
            color: kind.chart_color().to_string(),
            value: model.total,
            formatted: format_rub(model.total),
            height_percent: if max > 0.0 { model.total / max * 100.0 } else { 0.0 },
        })
        .collect()
}

/// A model's result card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub kind: ModelKind,
    pub title: String,
    pub total: String,
    pub tax: String,
    pub net: String,
    pub percentage: u32,
    pub is_best: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingSummary {
    pub monthly: String,
    pub yearly: String,
    pub percent: String,
}

/// Why outstaffing is preferred over self-employed contractors.  The
/// block is shown alongside every comparison regardless of the figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvantagesBlock {
    pub title: String,
    pub subtitle: String,
    pub advantages: Vec<String>,
    pub note: String,
}

impl Default for AdvantagesBlock {
    fn default() -> Self {
        Self {
            title: COMPARISON_TITLE.to_string(),
            subtitle: COMPARISON_SUBTITLE.to_string(),
            advantages: OUTSTAFFING_ADVANTAGES.iter().map(|a| a.to_string()).collect(),
            note: COMPARISON_NOTE.to_string(),
        }
    }
}

/// Everything the calculator widget renders for one comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub rows: Vec<ReportRow>,
    pub saving: SavingSummary,
    pub chart: Vec<ChartBar>,
    pub comparison: AdvantagesBlock,
}

impl From<&ComparisonResult> for ComparisonReport {
    fn from(result: &ComparisonResult) -> Self {
        let rows = result
            .models
            .iter()
            .map(|(kind, model)| ReportRow {
                kind,
                title: kind.title().to_string(),
                total: format_rub(model.total),
                tax: format_rub(model.tax),
                net: format_rub(model.net),
                percentage: model.percentage,
                is_best: kind == result.best_option,
            })
            .collect();
        Self {
            rows,
            saving: SavingSummary {
                monthly: format_rub(result.monthly_saving),
                yearly: format_rub(result.yearly_saving),
                percent: format_saving_percent(result.saving_percent),
            },
            chart: chart_bars(result),
            comparison: AdvantagesBlock::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compare_models;

    #[test]
    fn test_format_rub() {
        assert_eq!(format_rub(747_126.436_78), "747\u{a0}126\u{a0}₽");
        assert_eq!(format_rub(2_245_517.24), "2\u{a0}245\u{a0}517\u{a0}₽");
        assert_eq!(format_rub(0.0), "0\u{a0}₽");
        assert_eq!(format_rub(999.5), "1\u{a0}000\u{a0}₽");
        assert_eq!(format_rub(-187_126.4), "-187\u{a0}126\u{a0}₽");
        assert_eq!(format_rub(-0.2), "0\u{a0}₽");
    }

    #[test]
    fn test_format_number_edge_cases() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(123_456.0), "123\u{a0}456");
        assert_eq!(format_number(f64::NAN), "0");
        assert_eq!(format_saving_percent(25.0), "25.0");
    }

    #[test]
    fn test_roi_percent() {
        assert_eq!(roi_percent(0.0, 10_000.0), 0.0);
        assert_eq!(roi_percent(120_000.0, 10_000.0), 100.0);
    }

    #[test]
    fn test_chart_bars() {
        let bars = chart_bars(&compare_models(50_000.0, 10));
        assert_eq!(bars.len(), 4);
        assert_eq!(bars[0].kind, ModelKind::Staff);
        assert_eq!(bars[0].height_percent, 100.0);
        assert!(bars.iter().all(|b| b.height_percent <= 100.0));
        assert_eq!(bars[3].label, "Наш аутстаффинг");

        let empty = chart_bars(&compare_models(0.0, 1));
        assert!(empty.iter().all(|b| b.height_percent == 0.0));
    }

    #[test]
    fn test_report_marks_outstaffing() {
        let report = ComparisonReport::from(&compare_models(50_000.0, 10));
        let best: Vec<ModelKind> = report.rows.iter().filter(|r| r.is_best).map(|r| r.kind).collect();
        assert_eq!(best, vec![ModelKind::Outstaffing]);
        assert_eq!(report.rows[0].title, "Штатные сотрудники");
        assert_eq!(report.saving.percent, "25.0");
        assert_eq!(report.saving.monthly, "187\u{a0}126\u{a0}₽");

        let colors: Vec<&str> = report.chart.iter().map(|b| b.color.as_str()).collect();
        assert_eq!(colors, vec!["#e63946", "#ff9f1c", "#2a9d8f", "#25D366"]);

        assert_eq!(report.comparison.title, "🎯 Почему аутстаффинг лучше самозанятых");
        assert_eq!(report.comparison.advantages.len(), 8);
        assert_eq!(report.comparison.advantages[7], "✅ Персональный менеджер 24/7");
        assert!(report.comparison.note.contains("ЧАЗ"));
    }
}

//! Derived view data for the results panel, impact chart, and CLI output.
//!
//! Nothing here re-ranks or recomputes service figures. Cards follow the
//! order the service returned; chart values come straight from the
//! controller's current selection.

use std::fmt::Write as _;

use serde::Serialize;

use crate::controller::PredictionController;
use crate::labels::Rating;
use crate::types::MaterialRecommendation;

/// Cards listed before "show all" is toggled on.
pub const DEFAULT_VISIBLE_CARDS: usize = 3;
/// Suitability score that fills the ranking bar completely.
pub const RANKING_BAR_FULL_SCORE: f64 = 5.0;

const SUBMIT_CAPTION: &str = "Recommend Packaging";
const SUBMIT_CAPTION_LOADING: &str = "Predicting...";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCard {
    /// 1-based rank in service order.
    pub rank: usize,
    pub material: String,
    pub suitability_score: f64,
    pub predicted_cost: f64,
    pub predicted_co2: f64,
    /// Ranking bar fill, 0–100.
    pub bar_percent: f64,
    /// Top-ranked card is emphasised.
    pub highlighted: bool,
    /// Card is the one shown in the detail panel.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub name: &'static str,
    pub value: f64,
    /// Tooltip hint.
    pub info: &'static str,
    pub rating: Rating,
}

pub fn ranking_bar_percent(suitability_score: f64) -> f64 {
    (suitability_score / RANKING_BAR_FULL_SCORE * 100.0).clamp(0.0, 100.0)
}

pub fn submit_caption(loading: bool) -> &'static str {
    if loading {
        SUBMIT_CAPTION_LOADING
    } else {
        SUBMIT_CAPTION
    }
}

/// Cards for the results panel, truncated unless `show_all` is set.
pub fn ranked_cards(controller: &PredictionController) -> Vec<RankedCard> {
    let limit = if controller.show_all() {
        usize::MAX
    } else {
        DEFAULT_VISIBLE_CARDS
    };
    let selected = controller.selected_index();
    controller
        .recommendations()
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, m)| card(i, m, selected == Some(i)))
        .collect()
}

fn card(index: usize, m: &MaterialRecommendation, selected: bool) -> RankedCard {
    RankedCard {
        rank: index + 1,
        material: m.material.clone(),
        suitability_score: m.suitability_score,
        predicted_cost: m.predicted_cost,
        predicted_co2: m.predicted_co2,
        bar_percent: ranking_bar_percent(m.suitability_score),
        highlighted: index == 0,
        selected,
    }
}

/// Number of cards hidden behind the "show all" toggle.
pub fn hidden_card_count(controller: &PredictionController) -> usize {
    if controller.show_all() {
        0
    } else {
        controller
            .recommendations()
            .len()
            .saturating_sub(DEFAULT_VISIBLE_CARDS)
    }
}

/// The two-bar sustainability impact chart.
pub fn impact_chart(controller: &PredictionController) -> [ChartBar; 2] {
    [
        ChartBar {
            name: "Environmental Impact (CO₂)",
            value: controller.co2(),
            info: "Lower CO₂ Emission = Environment Friendly",
            rating: controller.co2_rating(),
        },
        ChartBar {
            name: "Packaging Cost",
            value: controller.cost(),
            info: "Lower Cost = Economical Packaging",
            rating: controller.cost_rating(),
        },
    ]
}

/// Plain-text ranked table.
pub fn render_table(cards: &[RankedCard]) -> String {
    let width = cards
        .iter()
        .map(|c| c.material.chars().count())
        .max()
        .unwrap_or(0)
        .max("Material".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<width$}  {:>8}  {:>8}  {:>11}",
        "#", "Material", "Cost", "CO₂", "Suitability"
    );
    for c in cards {
        let marker = if c.selected { "*" } else { " " };
        let _ = writeln!(
            out,
            "{:<4} {:<width$}  {:>8.2}  {:>8.2}  {:>11.3}",
            format!("{}{}", c.rank, marker),
            c.material,
            c.predicted_cost,
            c.predicted_co2,
            c.suitability_score
        );
    }
    out
}

/// Detail panel plus impact ratings for the current selection.
pub fn render_detail(controller: &PredictionController) -> String {
    let mut out = String::new();
    match controller.selected() {
        Some(m) => {
            let _ = writeln!(out, "Selected: {}", m.material);
            let _ = writeln!(out, "  Suitability: {}", m.suitability_score);
        }
        None => {
            let _ = writeln!(out, "No material selected");
        }
    }
    for bar in impact_chart(controller) {
        let _ = writeln!(out, "  {}: {} ({})", bar.name, bar.value, bar.rating);
    }
    out
}

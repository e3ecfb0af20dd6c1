//! Values derived from the controller state: price differences, the average
//! suggestion, the copy button and the dirty flag.

use pricematch_core::pricing::average;
use pricematch_core::PriceDifference;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::effect::{CopyButton, Effect, View};
use crate::state::ControllerState;

impl ControllerState {
    /// Difference between the main price and each source with a positive
    /// price, in source order. `None` hides that source's difference.
    #[must_use]
    pub fn differences(&self) -> Vec<(&str, Option<PriceDifference>)> {
        self.slots
            .iter()
            .map(|slot| {
                let diff = slot
                    .positive_price()
                    .and_then(|price| PriceDifference::between(self.main.price, price));
                (slot.config.name.as_str(), diff)
            })
            .collect()
    }

    /// The first two configured sources both have a positive price and report
    /// the same non-empty barcode.
    #[must_use]
    pub fn average_eligible(&self) -> bool {
        let [first, second, ..] = self.slots.as_slice() else {
            return false;
        };
        let (Some(a), Some(b)) = (first.selected.as_ref(), second.selected.as_ref()) else {
            return false;
        };
        if !a.has_positive_price() || !b.has_positive_price() {
            return false;
        }
        match (a.barcode.as_deref(), b.barcode.as_deref()) {
            (Some(x), Some(y)) => !x.trim().is_empty() && x.trim() == y.trim(),
            _ => false,
        }
    }

    /// Mean of the two designated sources' prices, when average-eligible.
    #[must_use]
    pub fn average(&self) -> Option<Decimal> {
        if !self.average_eligible() {
            return None;
        }
        let a = self.slots[0].positive_price()?;
        let b = self.slots[1].positive_price()?;
        average(a, b).map(|avg| avg.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    #[must_use]
    pub fn copy_button(&self) -> CopyButton {
        if self.average_eligible() {
            return CopyButton::CopyAverage;
        }
        let priced = self
            .slots
            .iter()
            .filter(|s| s.positive_price().is_some())
            .count();
        if priced == 0 || priced == self.slots.len() {
            CopyButton::Hidden
        } else {
            CopyButton::CopySelected
        }
    }

    /// Any tracked field differs from the snapshot taken at load (or last save).
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.main.changed_fields(&self.initial).is_empty()
    }

    /// Render instructions for every derived value.
    pub(crate) fn derived_effects(&self) -> Vec<Effect> {
        let mut effects: Vec<Effect> = self
            .differences()
            .into_iter()
            .map(|(source, diff)| {
                let source = source.to_string();
                Effect::Render(match diff {
                    Some(diff) => View::Difference {
                        source,
                        text: diff.display(),
                        tone: diff.tone(),
                    },
                    None => View::HideDifference(source),
                })
            })
            .collect();
        effects.push(Effect::Render(View::Average(self.average())));
        effects.push(Effect::Render(View::CopyButton(self.copy_button())));
        effects.push(Effect::Render(View::SaveControls {
            visible: self.is_dirty(),
        }));
        effects
    }
}

//! Controller state and its event handlers.

use pricematch_core::pricing::apply_percentage_adjustment;
use pricematch_core::{
    Candidate, MainField, MainRecord, SelectedProduct, SourceConfig, SourcesFile,
};
use rust_decimal::Decimal;

use crate::effect::{CandidateOption, CopyButton, Effect, FormAction, View};
use crate::error::CompareError;
use crate::event::{Event, FetchFailure};

const EMPTY_TERM_MESSAGE: &str = "Please enter a product name to search.";
const DETAIL_FAILED_MESSAGE: &str = "Failed to fetch product details.";
const DETAIL_ERROR_MESSAGE: &str = "An error occurred while fetching product details.";
const ADJUST_OVERFLOW_MESSAGE: &str = "The adjusted price is too large.";

/// Search and selection state of one configured source.
#[derive(Debug, Clone)]
pub(crate) struct SourceSlot {
    pub(crate) config: SourceConfig,
    /// The last rendered list.
    pub(crate) candidates: Vec<Candidate>,
    pub(crate) selected: Option<SelectedProduct>,
    /// Bumped on every selection change; detail responses carry the value
    /// they were requested under.
    pub(crate) selection: u64,
}

impl SourceSlot {
    fn new(config: SourceConfig) -> Self {
        Self {
            config,
            candidates: Vec::new(),
            selected: None,
            selection: 0,
        }
    }

    pub(crate) fn positive_price(&self) -> Option<Decimal> {
        self.selected
            .as_ref()
            .filter(|p| p.has_positive_price())
            .map(|p| p.price)
    }
}

/// Everything the comparison screen knows. Mutated only through [`Self::handle`].
#[derive(Debug, Clone)]
pub struct ControllerState {
    pub(crate) slots: Vec<SourceSlot>,
    pub(crate) main: MainRecord,
    pub(crate) initial: MainRecord,
    /// Search generation; bumped by every accepted search.
    generation: u64,
    in_flight: usize,
    markup_percent: Decimal,
}

impl ControllerState {
    /// Creates an empty controller over the configured sources, in order.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::NoSources`] if `sources` is empty.
    pub fn new(sources: &SourcesFile, markup_percent: Decimal) -> Result<Self, CompareError> {
        if sources.sources.is_empty() {
            return Err(CompareError::NoSources);
        }
        Ok(Self {
            slots: sources.sources.iter().cloned().map(SourceSlot::new).collect(),
            main: MainRecord::default(),
            initial: MainRecord::default(),
            generation: 0,
            in_flight: 0,
            markup_percent,
        })
    }

    /// Applies one event and returns what should happen next.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Load(record) => self.load(record),
            Event::Search(term) => self.search(&term),
            Event::SearchCompleted {
                source,
                generation,
                result,
            } => self.search_completed(&source, generation, result),
            Event::Select { source, identifier } => self.select(&source, &identifier),
            Event::DetailCompleted {
                source,
                generation,
                selection,
                result,
            } => self.detail_completed(&source, generation, selection, result),
            Event::EditField { field, value } => self.copy_field(field, &value),
            Event::CopyField { source, field } => self.copy_from_source(&source, field),
            Event::CopyPrice { percentage } => self.copy_price(percentage),
            Event::AdjustPrice { base, percentage } => {
                self.apply_percentage_adjustment(base, percentage)
            }
            Event::Submit(action) => self.submit(action),
            Event::SubmitCompleted {
                action,
                record,
                result,
            } => self.submit_completed(action, record, result),
            Event::Revert => self.revert(),
        }
    }

    // -- accessors ----------------------------------------------------------

    #[must_use]
    pub fn sources(&self) -> Vec<&SourceConfig> {
        self.slots.iter().map(|s| &s.config).collect()
    }

    #[must_use]
    pub fn candidates(&self, source: &str) -> Option<&[Candidate]> {
        self.slot(source).map(|s| s.candidates.as_slice())
    }

    #[must_use]
    pub fn selected(&self, source: &str) -> Option<&SelectedProduct> {
        self.slot(source).and_then(|s| s.selected.as_ref())
    }

    #[must_use]
    pub fn main(&self) -> &MainRecord {
        &self.main
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    #[must_use]
    pub fn markup_percent(&self) -> Decimal {
        self.markup_percent
    }

    fn slot(&self, source: &str) -> Option<&SourceSlot> {
        self.slots.iter().find(|s| s.config.name == source)
    }

    fn slot_index(&self, source: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.config.name == source)
    }

    // -- handlers -----------------------------------------------------------

    fn load(&mut self, record: MainRecord) -> Vec<Effect> {
        self.initial = record.clone();
        self.main = record;
        let mut effects = self.main_field_views();
        effects.extend(self.derived_effects());

        let name = self.main.product_name.trim().to_string();
        if !name.is_empty() {
            effects.extend(self.search(&name));
        }
        effects
    }

    fn search(&mut self, term: &str) -> Vec<Effect> {
        let term = term.trim();
        if term.is_empty() {
            return vec![alert(EMPTY_TERM_MESSAGE)];
        }

        self.generation += 1;
        let generation = self.generation;
        tracing::debug!(generation, term, "starting search");

        let mut effects = Vec::new();
        for slot in &mut self.slots {
            slot.candidates.clear();
            slot.selected = None;
            slot.selection += 1;
            effects.push(Effect::Render(View::ClearSource(slot.config.name.clone())));
        }
        effects.extend(self.derived_effects());
        effects.extend(self.begin_requests(self.slots.len()));
        effects.extend(self.slots.iter().map(|slot| Effect::Search {
            source: slot.config.clone(),
            term: term.to_string(),
            generation,
        }));
        effects
    }

    fn search_completed(
        &mut self,
        source: &str,
        generation: u64,
        result: Result<Vec<Candidate>, FetchFailure>,
    ) -> Vec<Effect> {
        let mut effects: Vec<Effect> = self.finish_request().into_iter().collect();

        if generation != self.generation {
            tracing::debug!(
                source,
                generation,
                current = self.generation,
                "dropping search response from superseded generation"
            );
            return effects;
        }
        let Some(idx) = self.slot_index(source) else {
            tracing::warn!(source, "search response for unknown source");
            return effects;
        };

        let slot = &mut self.slots[idx];
        match result {
            Ok(candidates) if !candidates.is_empty() => {
                let options = candidates
                    .iter()
                    .map(|c| CandidateOption {
                        id: c.id.clone(),
                        label: c.label(),
                    })
                    .collect();
                slot.candidates = candidates;
                effects.push(Effect::Render(View::Candidates {
                    source: source.to_string(),
                    options,
                }));
            }
            Ok(_) => {
                effects.push(Effect::Render(View::NoProducts(source.to_string())));
            }
            Err(failure) => {
                effects.push(Effect::Render(View::NoProducts(source.to_string())));
                if failure.transport {
                    tracing::warn!(source, error = %failure.detail, "search request failed");
                    effects.push(alert(&format!(
                        "An error occurred while fetching suggestions from {}.",
                        slot.config.label
                    )));
                } else {
                    tracing::info!(source, message = %failure.detail, "source returned no products");
                }
            }
        }
        effects
    }

    fn select(&mut self, source: &str, identifier: &str) -> Vec<Effect> {
        let Some(idx) = self.slot_index(source) else {
            return vec![alert(&format!("Unknown source '{source}'."))];
        };
        let identifier = identifier.trim();
        let slot = &mut self.slots[idx];

        if !identifier.is_empty() && !slot.candidates.iter().any(|c| c.id == identifier) {
            return vec![alert(&format!(
                "'{identifier}' is not in the {} results.",
                slot.config.label
            ))];
        }

        slot.selected = None;
        slot.selection += 1;
        let selection = slot.selection;
        let config = slot.config.clone();

        let mut effects = vec![Effect::Render(View::HideDetail(source.to_string()))];
        effects.extend(self.derived_effects());
        if identifier.is_empty() {
            return effects;
        }

        effects.extend(self.begin_requests(1));
        effects.push(Effect::FetchDetail {
            source: config,
            identifier: identifier.to_string(),
            generation: self.generation,
            selection,
        });
        effects
    }

    fn detail_completed(
        &mut self,
        source: &str,
        generation: u64,
        selection: u64,
        result: Result<SelectedProduct, FetchFailure>,
    ) -> Vec<Effect> {
        let mut effects: Vec<Effect> = self.finish_request().into_iter().collect();

        let Some(idx) = self.slot_index(source) else {
            tracing::warn!(source, "detail response for unknown source");
            return effects;
        };
        if generation != self.generation || selection != self.slots[idx].selection {
            tracing::debug!(source, generation, selection, "dropping superseded detail response");
            return effects;
        }

        match result {
            Ok(product) => {
                let copyable = product.copyable_fields();
                self.slots[idx].selected = Some(product.clone());
                effects.push(Effect::Render(View::Detail {
                    source: source.to_string(),
                    product,
                    copyable,
                }));
            }
            Err(failure) => {
                tracing::warn!(source, error = %failure.detail, "detail request failed");
                self.slots[idx].selected = None;
                let message = failure.message.as_deref().unwrap_or(if failure.transport {
                    DETAIL_ERROR_MESSAGE
                } else {
                    DETAIL_FAILED_MESSAGE
                });
                effects.push(alert(message));
                effects.push(Effect::Render(View::HideDetail(source.to_string())));
            }
        }
        effects.extend(self.derived_effects());
        effects
    }

    /// Writes `value` into a main-record field and recomputes everything that
    /// depends on it.
    fn copy_field(&mut self, field: MainField, value: &str) -> Vec<Effect> {
        self.main.set(field, value);
        let mut effects = vec![Effect::Render(View::MainField {
            field,
            value: self.main.get(field),
        })];
        effects.extend(self.derived_effects());
        effects
    }

    fn copy_from_source(&mut self, source: &str, field: MainField) -> Vec<Effect> {
        let value = match self.slot(source) {
            None => Err(format!("Unknown source '{source}'.")),
            Some(slot) => match slot.selected.as_ref() {
                None => Err(format!("No {} product is selected.", slot.config.label)),
                Some(product) => product.field(field).ok_or_else(|| {
                    format!(
                        "The selected {} product has no {field} to copy.",
                        slot.config.label
                    )
                }),
            },
        };
        match value {
            Ok(value) => self.copy_field(field, &value),
            Err(message) => vec![alert(&message)],
        }
    }

    fn copy_price(&mut self, percentage: Option<Decimal>) -> Vec<Effect> {
        let base = match self.copy_button() {
            CopyButton::CopyAverage => self.average(),
            CopyButton::CopySelected => self.slots.iter().find_map(SourceSlot::positive_price),
            CopyButton::Hidden => None,
        };
        match base {
            Some(base) => {
                let percentage = percentage.unwrap_or(self.markup_percent);
                self.apply_percentage_adjustment(base, percentage)
            }
            None => vec![alert("There is no price to copy.")],
        }
    }

    fn apply_percentage_adjustment(&mut self, base: Decimal, percentage: Decimal) -> Vec<Effect> {
        let Some(price) = apply_percentage_adjustment(base, percentage) else {
            tracing::warn!(%base, %percentage, "price adjustment overflowed");
            return vec![alert(ADJUST_OVERFLOW_MESSAGE)];
        };
        self.main.price = price;
        let mut effects = vec![Effect::Render(View::MainField {
            field: MainField::Price,
            value: self.main.get(MainField::Price),
        })];
        effects.extend(self.derived_effects());
        effects
    }

    fn submit(&mut self, action: FormAction) -> Vec<Effect> {
        if action == FormAction::Yes && !self.is_dirty() {
            return vec![alert("Nothing to save: the record has not changed.")];
        }
        if self.main.sku.trim().is_empty() {
            return vec![alert("No record is loaded.")];
        }

        let mut fields = vec![
            ("action", action.marker().to_string()),
            ("sku", self.main.sku.clone()),
        ];
        if action == FormAction::Yes {
            fields.extend(MainField::ALL.iter().map(|&f| (f.form_name(), self.main.get(f))));
        }

        let mut effects = self.begin_requests(1);
        effects.push(Effect::Submit {
            action,
            fields,
            record: self.main.clone(),
        });
        effects
    }

    /// On a successful save, the submitted values (not whatever was edited
    /// while the request was in flight) become the new snapshot.
    fn submit_completed(
        &mut self,
        action: FormAction,
        record: MainRecord,
        result: Result<(), FetchFailure>,
    ) -> Vec<Effect> {
        let mut effects: Vec<Effect> = self.finish_request().into_iter().collect();
        match result {
            Ok(()) => {
                if action == FormAction::Yes && record.sku == self.main.sku {
                    self.initial = record.clone();
                }
                let message = match action {
                    FormAction::Yes => format!("Product '{}' has been saved.", record.sku),
                    FormAction::No => {
                        format!("Product '{}' has been marked as not matched.", record.sku)
                    }
                    FormAction::Skip => format!("Product '{}' has been skipped.", record.sku),
                };
                effects.push(Effect::Render(View::Submitted { action, message }));
                effects.extend(self.derived_effects());
            }
            Err(failure) => {
                tracing::warn!(action = %action, error = %failure.detail, "form submission failed");
                effects.push(alert(&format!(
                    "Failed to submit the form: {}",
                    failure.message.as_deref().unwrap_or(&failure.detail)
                )));
            }
        }
        effects
    }

    fn revert(&mut self) -> Vec<Effect> {
        self.main = self.initial.clone();
        let mut effects = self.main_field_views();
        effects.extend(self.derived_effects());
        effects
    }

    // -- helpers ------------------------------------------------------------

    fn main_field_views(&self) -> Vec<Effect> {
        MainField::ALL
            .iter()
            .map(|&field| {
                Effect::Render(View::MainField {
                    field,
                    value: self.main.get(field),
                })
            })
            .collect()
    }

    fn begin_requests(&mut self, count: usize) -> Vec<Effect> {
        let was_idle = self.in_flight == 0;
        self.in_flight += count;
        if was_idle && count > 0 {
            vec![Effect::Render(View::Busy(true))]
        } else {
            Vec::new()
        }
    }

    fn finish_request(&mut self) -> Option<Effect> {
        if self.in_flight == 0 {
            return None;
        }
        self.in_flight -= 1;
        (self.in_flight == 0).then_some(Effect::Render(View::Busy(false)))
    }
}

fn alert(message: &str) -> Effect {
    Effect::Render(View::Alert(message.to_string()))
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

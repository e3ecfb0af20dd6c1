//! Line-oriented terminal rendering of controller views.

use std::collections::HashMap;
use std::io::Write;

use pricematch_compare::{Renderer, View};
use pricematch_core::pricing::format_rand;
use pricematch_core::SourcesFile;

/// Writes views as plain text. Derived values (differences, average, copy
/// button, save controls, main fields) are printed only when they change.
pub(crate) struct TerminalRenderer<W> {
    out: W,
    labels: HashMap<String, String>,
    shown: HashMap<String, String>,
}

impl<W: Write> TerminalRenderer<W> {
    pub(crate) fn new(out: W, sources: &SourcesFile) -> Self {
        Self {
            out,
            labels: sources
                .sources
                .iter()
                .map(|s| (s.name.clone(), s.label.clone()))
                .collect(),
            shown: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn label<'a>(&'a self, source: &'a str) -> &'a str {
        self.labels.get(source).map_or(source, String::as_str)
    }

    /// Records `value` under `key`; `true` if it differs from the last one.
    fn changed(&mut self, key: String, value: String) -> bool {
        self.shown.insert(key, value.clone()).as_ref() != Some(&value)
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::debug!(error = %e, "failed to write view");
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &View) {
        match view {
            View::Alert(message) => self.line(&format!("! {message}")),
            View::Busy(true) => self.line("... waiting for sources"),
            View::Busy(false) => {}
            View::ClearSource(source) => {
                self.shown.retain(|k, _| !k.ends_with(&format!(":{source}")));
            }
            View::Candidates { source, options } => {
                let mut text = format!("{}:", self.label(source));
                for option in options {
                    text.push_str(&format!("\n  [{}] {}", option.id, option.label));
                }
                self.line(&text);
            }
            View::NoProducts(source) => {
                let text = format!("{}: no products found", self.label(source));
                self.line(&text);
            }
            View::Detail {
                source,
                product,
                copyable,
            } => {
                let mut text = format!("{} selected [{}]:", self.label(source), product.identifier);
                for (field, value) in copyable {
                    text.push_str(&format!("\n  {field:<12} {value}"));
                }
                if let Some(uom) = &product.unit_of_measure {
                    text.push_str(&format!("\n  {:<12} {uom}", "unit"));
                }
                if let Some(url) = product.image_urls.first() {
                    text.push_str(&format!("\n  {:<12} {url}", "image"));
                }
                self.line(&text);
            }
            View::HideDetail(_) => {}
            View::Difference { source, text, tone } => {
                let value = format!("{text} {}", tone.color());
                if self.changed(format!("diff:{source}"), value.clone()) {
                    let text = format!("{} difference: {value}", self.label(source));
                    self.line(&text);
                }
            }
            View::HideDifference(source) => {
                self.shown.remove(&format!("diff:{source}"));
            }
            View::Average(average) => {
                let value = average.map(format_rand).unwrap_or_default();
                if self.changed("average".to_string(), value.clone()) && !value.is_empty() {
                    self.line(&format!("Average price: {value}"));
                }
            }
            View::CopyButton(button) => {
                let value = button.label().unwrap_or_default().to_string();
                if self.changed("copy".to_string(), value.clone()) && !value.is_empty() {
                    self.line(&format!("{value} available (copy-price)"));
                }
            }
            View::MainField { field, value } => {
                if self.changed(format!("main:{field}"), value.clone()) {
                    self.line(&format!("  {field:<12} = {value}"));
                }
            }
            View::SaveControls { visible } => {
                if self.changed("save".to_string(), visible.to_string()) && *visible {
                    self.line("Unsaved changes: 'save' to submit, 'revert' to discard.");
                }
            }
            View::Submitted { message, .. } => self.line(message),
        }
    }
}

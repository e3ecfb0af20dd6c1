//! Drives [`ControllerState`] against live sources.
//!
//! Requests run as spawned tasks so one slow source never blocks another;
//! each task reports back through an unbounded channel and its completion is
//! fed into the state as an ordinary [`Event`].

use pricematch_core::{AppConfig, SourcesFile};
use pricematch_sources::SourceClient;
use tokio::sync::mpsc;

use crate::effect::{Effect, View};
use crate::error::CompareError;
use crate::event::{Event, FetchFailure};
use crate::state::ControllerState;

/// Presentation sink for [`View`] instructions.
pub trait Renderer {
    fn render(&mut self, view: &View);
}

pub struct Runtime<R> {
    state: ControllerState,
    client: SourceClient,
    save_path: String,
    renderer: R,
    completions_tx: mpsc::UnboundedSender<Event>,
    completions_rx: mpsc::UnboundedReceiver<Event>,
}

impl<R: Renderer> Runtime<R> {
    pub fn new(
        state: ControllerState,
        client: SourceClient,
        save_path: impl Into<String>,
        renderer: R,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            state,
            client,
            save_path: save_path.into(),
            renderer,
            completions_tx,
            completions_rx,
        }
    }

    /// Builds the HTTP client and controller from application config.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::Source`] if the base URL or client settings
    /// are invalid, and [`CompareError::NoSources`] if `sources` is empty.
    pub fn from_config(
        config: &AppConfig,
        sources: &SourcesFile,
        renderer: R,
    ) -> Result<Self, CompareError> {
        let client = SourceClient::new(
            &config.base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        let state = ControllerState::new(sources, config.markup_percent)?;
        Ok(Self::new(state, client, config.save_path.clone(), renderer))
    }

    #[must_use]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Applies `event`, renders its views, and starts any requests it asks
    /// for. Must be called from within a Tokio runtime.
    pub fn dispatch(&mut self, event: Event) {
        for effect in self.state.handle(event) {
            match effect {
                Effect::Render(view) => self.renderer.render(&view),
                Effect::Search {
                    source,
                    term,
                    generation,
                } => {
                    let client = self.client.clone();
                    let tx = self.completions_tx.clone();
                    tokio::spawn(async move {
                        let result = client
                            .search(&source, &term)
                            .await
                            .map_err(|e| FetchFailure::from(&e));
                        let _ = tx.send(Event::SearchCompleted {
                            source: source.name,
                            generation,
                            result,
                        });
                    });
                }
                Effect::FetchDetail {
                    source,
                    identifier,
                    generation,
                    selection,
                } => {
                    let client = self.client.clone();
                    let tx = self.completions_tx.clone();
                    tokio::spawn(async move {
                        let result = client
                            .fetch_detail(&source, &identifier)
                            .await
                            .map_err(|e| FetchFailure::from(&e));
                        let _ = tx.send(Event::DetailCompleted {
                            source: source.name,
                            generation,
                            selection,
                            result,
                        });
                    });
                }
                Effect::Submit {
                    action,
                    fields,
                    record,
                } => {
                    let client = self.client.clone();
                    let tx = self.completions_tx.clone();
                    let path = self.save_path.clone();
                    tokio::spawn(async move {
                        let result = match client.submit_form(&path, &fields).await {
                            Ok(receipt) => {
                                tracing::info!(
                                    %action,
                                    status = receipt.status,
                                    final_url = %receipt.final_url,
                                    "form submitted"
                                );
                                Ok(())
                            }
                            Err(e) => Err(FetchFailure::from(&e)),
                        };
                        let _ = tx.send(Event::SubmitCompleted {
                            action,
                            record,
                            result,
                        });
                    });
                }
            }
        }
    }

    /// Waits until every outstanding request has completed and been applied.
    pub async fn settle(&mut self) {
        while self.state.in_flight() > 0 {
            let Some(event) = self.completions_rx.recv().await else {
                break;
            };
            self.dispatch(event);
        }
    }

    /// Processes user events and request completions until `inputs` closes,
    /// then drains outstanding requests.
    pub async fn run(&mut self, mut inputs: mpsc::Receiver<Event>) {
        loop {
            let event = tokio::select! {
                Some(event) = self.completions_rx.recv() => event,
                input = inputs.recv() => match input {
                    Some(event) => event,
                    None => break,
                },
            };
            self.dispatch(event);
        }
        self.settle().await;
    }
}

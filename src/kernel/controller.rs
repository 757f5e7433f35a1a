use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use super::context::{RunContext, RunId};
use super::event::Event;
use super::machine::{Effect, RunMachine};
use super::stage::Stage;
use crate::render::{Fragment, Presentation, Renderer};
use crate::services::backend::{fulfil, StageBackend};

const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Default)]
pub struct ControllerConfig {
    pub presentation: Presentation,
    /// None keeps the original behaviour: a stalled request stalls its stage.
    pub request_timeout: Option<Duration>,
}

/// Async driver around `RunMachine`.
///
/// Owns the only mutable run state. Backend calls run on spawned tasks that
/// never touch state; they report back over the channel and the controller
/// applies the result on its own task.
pub struct StageController<B: StageBackend> {
    backend: Arc<B>,
    pub machine: RunMachine,
    receiver: mpsc::Receiver<Event>,
    sender: mpsc::Sender<Event>,
    renderer: Renderer,
    request_timeout: Option<Duration>,
}

impl<B: StageBackend> StageController<B> {
    pub fn new(backend: Arc<B>, config: ControllerConfig) -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            backend,
            machine: RunMachine::new(),
            receiver,
            sender,
            renderer: Renderer::new(config.presentation),
            request_timeout: config.request_timeout,
        }
    }

    /// Handle for posting external inputs (submissions) into the loop.
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.sender.clone()
    }

    pub fn stage(&self) -> Stage {
        self.machine.stage()
    }

    pub fn run_id(&self) -> Option<RunId> {
        self.machine.run().map(|run| run.id())
    }

    pub fn is_done(&self) -> bool {
        self.machine.stage() == Stage::Done
    }

    /// Starts a fresh run. Returns the fragments to show immediately.
    /// Requests still in flight for a previous run are left to finish; their
    /// results are rejected by epoch.
    pub fn start(&mut self, context: RunContext) -> Vec<Fragment> {
        let effects = self.machine.start(context);
        self.execute(effects)
    }

    pub fn advance(&mut self) -> Vec<Fragment> {
        let effects = self.machine.advance();
        self.execute(effects)
    }

    /// Applies one event synchronously.
    pub fn apply(&mut self, event: Event) -> Vec<Fragment> {
        match event {
            Event::Submit(context) => self.start(context),
            other => {
                let effects = self.machine.step(vec![other]);
                self.execute(effects)
            }
        }
    }

    /// Waits for the next event and applies it.
    /// None only if every sender is gone, which cannot happen while `self` lives.
    pub async fn next_event(&mut self) -> Option<Vec<Fragment>> {
        let event = self.receiver.recv().await?;
        Some(self.apply(event))
    }

    /// Drives the active run until Done, collecting every fragment rendered on the way.
    /// Returns immediately when no run has been started.
    pub async fn run_to_completion(&mut self) -> Vec<Fragment> {
        let mut fragments = Vec::new();
        if self.machine.run().is_none() {
            return fragments;
        }
        while !self.is_done() {
            match self.next_event().await {
                Some(mut rendered) => fragments.append(&mut rendered),
                None => break,
            }
        }
        fragments
    }

    /// Current view of a stage under the configured presentation.
    pub fn render(&self, stage: Stage) -> Fragment {
        self.renderer
            .render(stage, self.machine.request(stage), self.machine.payload(stage))
    }

    fn execute(&mut self, effects: Vec<Effect>) -> Vec<Fragment> {
        let mut fragments = Vec::new();

        for effect in effects {
            match effect {
                Effect::Dispatch(request) => {
                    let backend = Arc::clone(&self.backend);
                    let tx = self.sender.clone();
                    let timeout = self.request_timeout;

                    tokio::spawn(async move {
                        let result = fulfil(backend.as_ref(), &request, timeout).await;
                        let _ = tx
                            .send(Event::StageResolved {
                                epoch: request.epoch(),
                                result,
                            })
                            .await;
                    });
                }
                Effect::Render(stage) => fragments.push(self.render(stage)),
                Effect::Completed(run_id) => info!("Demo run {} reached its terminal stage", run_id),
            }
        }

        fragments
    }
}

use super::{Fragment, Section};
use super::html;
use crate::kernel::fallback::FallbackSupplier;
use crate::payload::VisualizationUpdate;

/// Applies server-pushed updates: every frame re-renders all four stage
/// views plus the data-source list.
#[derive(Debug, Default, Clone, Copy)]
pub struct Visualizer;

impl Visualizer {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, update: &VisualizationUpdate) -> Vec<Fragment> {
        let mut fragments: Vec<Fragment> = update
            .stage_payloads()
            .iter()
            .map(|payload| {
                let stage = payload.stage();
                Fragment {
                    section: Section::Stage(stage),
                    markup: html::render_stage(stage, Some(payload)),
                }
            })
            .collect();

        let sources = update
            .data_sources
            .clone()
            .unwrap_or_else(FallbackSupplier::data_sources);
        fragments.push(Fragment {
            section: Section::DataSources,
            markup: html::render_data_sources(&sources),
        });

        fragments
    }
}

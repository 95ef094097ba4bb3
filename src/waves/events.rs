use super::WaveReport;
use crate::game_logic::placement::Shortfall;
use crate::map::TerrainId;
use std::sync::mpsc::Sender;

/// Notified synchronously by the orchestrator while a wave runs.
///
/// Every method has an empty default so listeners implement only what they need.
pub trait WaveListener {
    fn on_wave_completed(&mut self, _report: &WaveReport) {}

    fn on_growth_exhausted(&mut self, _wave_index: u32) {}

    fn on_shortfall(&mut self, _wave_index: u32, _shortfall: &Shortfall) {}
}

/// Owned summary of a listener callback, for sending across a channel
#[derive(Debug, Clone, PartialEq)]
pub enum WaveEvent {
    Completed {
        wave_index: u32,
        band_size: usize,
        props: usize,
        enemies: usize,
    },
    Exhausted {
        wave_index: u32,
    },
    Shortfall {
        wave_index: u32,
        terrain: Option<TerrainId>,
        missing: usize,
    },
}

impl From<&WaveReport> for WaveEvent {
    fn from(report: &WaveReport) -> Self {
        WaveEvent::Completed {
            wave_index: report.wave_index,
            band_size: report.band.len(),
            props: report.props.len(),
            enemies: report.enemies.len(),
        }
    }
}

// A dropped receiver only means nobody is listening any more
impl WaveListener for Sender<WaveEvent> {
    fn on_wave_completed(&mut self, report: &WaveReport) {
        let _ = self.send(report.into());
    }

    fn on_growth_exhausted(&mut self, wave_index: u32) {
        let _ = self.send(WaveEvent::Exhausted { wave_index });
    }

    fn on_shortfall(&mut self, wave_index: u32, shortfall: &Shortfall) {
        let _ = self.send(WaveEvent::Shortfall {
            wave_index,
            terrain: shortfall.terrain.clone(),
            missing: shortfall.missing(),
        });
    }
}

/// Keeps every event in memory
#[derive(Debug, Clone, Default)]
pub struct WaveLog {
    pub events: Vec<WaveEvent>,
}

impl WaveListener for WaveLog {
    fn on_wave_completed(&mut self, report: &WaveReport) {
        self.events.push(report.into());
    }

    fn on_growth_exhausted(&mut self, wave_index: u32) {
        self.events.push(WaveEvent::Exhausted { wave_index });
    }

    fn on_shortfall(&mut self, wave_index: u32, shortfall: &Shortfall) {
        self.events.push(WaveEvent::Shortfall {
            wave_index,
            terrain: shortfall.terrain.clone(),
            missing: shortfall.missing(),
        });
    }
}

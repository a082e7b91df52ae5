use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::api::dto::graph_dto::{GraphRequest, TooltipHoverRequest};
use crate::domain::perf::dto::chart_payload_dto::ChartPayload;
use crate::domain::perf::model::Meta;

/// Data loading lifecycle of one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum GraphPhase {
    Idle,
    Loading,
    Ready {
        payload: Box<ChartPayload>,
        reference_line: bool,
    },
    Failed {
        message: String,
    },
}

impl GraphPhase {
    pub fn name(&self) -> &'static str {
        match self {
            GraphPhase::Idle => "idle",
            GraphPhase::Loading => "loading",
            GraphPhase::Ready { .. } => "ready",
            GraphPhase::Failed { .. } => "failed",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, GraphPhase::Loading)
    }
}

/// The point under the pointer, resolved against the loaded payload.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipModel {
    pub dataset_index: usize,
    pub point_index: usize,
    pub label: String,
    pub meta: Option<Meta>,
    pub x: DateTime<Utc>,
    pub y: f64,
    pub caret_x: Option<f64>,
    pub caret_y: Option<f64>,
}

/// Tooltip lock and the last model shown; independent of the load phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TooltipState {
    pub locked: bool,
    pub model: Option<TooltipModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSession {
    pub id: Uuid,
    pub title: Option<String>,
    pub request: GraphRequest,
    #[serde(flatten)]
    pub phase: GraphPhase,
    pub tooltip: TooltipState,
    /// Bumped on every load so a stale load cannot overwrite a newer one.
    pub generation: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Last client interaction; the idle sweep evicts on this.
    pub last_seen_at: DateTime<Utc>,
}

impl GraphSession {
    pub fn new(request: GraphRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: request.title.clone(),
            request,
            phase: GraphPhase::Idle,
            tooltip: TooltipState::default(),
            generation: 0,
            created_at: now,
            updated_at: now,
            last_seen_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_seen_at = Utc::now();
    }

    /// Enter `Loading`. Returns the load generation, or `None` while a load
    /// is already running.
    pub fn start_loading(&mut self) -> Option<u64> {
        if self.phase.is_loading() {
            return None;
        }
        self.generation += 1;
        self.phase = GraphPhase::Loading;
        self.tooltip.model = None;
        self.updated_at = Utc::now();
        Some(self.generation)
    }

    /// Leave `Loading` with the load outcome. Ignored for a stale generation.
    pub fn finish_loading(&mut self, generation: u64, result: Result<ChartPayload, String>) -> bool {
        if generation != self.generation || !self.phase.is_loading() {
            return false;
        }

        self.phase = match result {
            Ok(payload) => GraphPhase::Ready {
                reference_line: payload.has_reference_line(),
                payload: Box::new(payload),
            },
            Err(message) => GraphPhase::Failed { message },
        };
        self.updated_at = Utc::now();
        true
    }

    /// Chart click: flip the tooltip lock. Returns the new lock state.
    pub fn toggle_tooltip_lock(&mut self) -> bool {
        self.tooltip.locked = !self.tooltip.locked;
        self.updated_at = Utc::now();
        self.tooltip.locked
    }

    /// Pointer moved over the chart. A locked tooltip keeps its model;
    /// otherwise the hovered point replaces it (or clears it when nothing
    /// plotted is under the pointer).
    pub fn hover(&mut self, hover: &TooltipHoverRequest) -> Option<&TooltipModel> {
        if !self.tooltip.locked {
            self.tooltip.model = self.resolve(hover);
            self.updated_at = Utc::now();
        }
        self.tooltip.model.as_ref()
    }

    fn resolve(&self, hover: &TooltipHoverRequest) -> Option<TooltipModel> {
        let GraphPhase::Ready { payload, .. } = &self.phase else {
            return None;
        };
        let dataset = payload.data.datasets.get(hover.dataset_index)?;
        let point = dataset.data.get(hover.point_index)?;

        Some(TooltipModel {
            dataset_index: hover.dataset_index,
            point_index: hover.point_index,
            label: dataset.label.clone(),
            meta: dataset.meta.clone(),
            x: point.x,
            y: point.y,
            caret_x: hover.caret_x,
            caret_y: hover.caret_y,
        })
    }
}

/// Compact listing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSessionSummary {
    pub id: Uuid,
    pub title: Option<String>,
    pub phase: String,
    pub tooltip_locked: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<&GraphSession> for GraphSessionSummary {
    fn from(s: &GraphSession) -> Self {
        Self {
            id: s.id,
            title: s.title.clone(),
            phase: s.phase.name().to_string(),
            tooltip_locked: s.tooltip.locked,
            updated_at: s.updated_at,
        }
    }
}

/// One session behind its own lock, so work on one chart never blocks or
/// copies another.
pub type SharedGraphSession = Arc<RwLock<GraphSession>>;

#[derive(Debug, Default)]
pub struct GraphRuntimeState {
    pub sessions: HashMap<Uuid, SharedGraphSession>,
}

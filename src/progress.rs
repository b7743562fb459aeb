//! Projection of an order status onto the fixed progress pipeline.
//!
//! The pipeline is `pending -> in_progress -> ready -> completed`. A
//! `cancelled` order (or a raw status value nobody recognises) is off the
//! pipeline: it gets a standalone notice instead of a step indicator.

use crate::domain::OrderStatus;

pub const STAGE_COUNT: usize = 4;

pub const PIPELINE: [OrderStatus; STAGE_COUNT] = [
    OrderStatus::Pending,
    OrderStatus::InProgress,
    OrderStatus::Ready,
    OrderStatus::Completed,
];

/// Zero-based pipeline position, or `None` when the status is off the pipeline.
pub fn stage_index(status: OrderStatus) -> Option<usize> {
    PIPELINE.iter().position(|stage| *stage == status)
}

/// Label shown under each step of the indicator.
pub fn stage_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Order Received",
        OrderStatus::InProgress => "In Progress",
        OrderStatus::Ready => "Ready for Pickup",
        OrderStatus::Completed => "Completed",
        OrderStatus::Cancelled => "Cancelled",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Completed,
    Current,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub status: OrderStatus,
    pub label: &'static str,
    pub state: StageState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    OnPipeline {
        index: usize,
        stages: [Stage; STAGE_COUNT],
    },
    Cancelled,
    /// A raw status value that did not parse.
    Unrecognized(String),
}

impl Progress {
    pub fn of(status: OrderStatus) -> Self {
        let Some(index) = stage_index(status) else {
            return Progress::Cancelled;
        };
        let stages = std::array::from_fn(|i| {
            let stage = PIPELINE[i];
            let state = match i.cmp(&index) {
                std::cmp::Ordering::Less => StageState::Completed,
                std::cmp::Ordering::Equal => StageState::Current,
                std::cmp::Ordering::Greater => StageState::Pending,
            };
            Stage { status: stage, label: stage_label(stage), state }
        });
        Progress::OnPipeline { index, stages }
    }

    /// Projects a status as stored, treating unknown values as off-pipeline.
    pub fn from_raw(raw: &str) -> Self {
        match raw.parse::<OrderStatus>() {
            Ok(status) => Self::of(status),
            Err(_) => Progress::Unrecognized(raw.to_string()),
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Progress::OnPipeline { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn is_on_pipeline(&self) -> bool {
        self.index().is_some()
    }

    /// Per-stage render flags; `None` means no step indicator is drawn.
    pub fn stages(&self) -> Option<&[Stage]> {
        match self {
            Progress::OnPipeline { stages, .. } => Some(stages.as_slice()),
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&Stage> {
        self.stages()?.iter().find(|stage| stage.state == StageState::Current)
    }

    /// Fraction of the bar to fill: 0.0 at `pending`, 1.0 at `completed`.
    pub fn percent_complete(&self) -> Option<f64> {
        self.index().map(|index| index as f64 / (STAGE_COUNT - 1) as f64)
    }

    /// Whether the connector between stage `i` and `i + 1` is lit.
    pub fn connector_lit(&self, i: usize) -> bool {
        i + 1 < STAGE_COUNT && self.index().is_some_and(|index| i < index)
    }

    /// One-line text rendering of the step indicator, or the off-pipeline notice.
    pub fn render(&self) -> String {
        match self {
            Progress::OnPipeline { stages, .. } => {
                let mut line = String::new();
                for (i, stage) in stages.iter().enumerate() {
                    let mark = match stage.state {
                        StageState::Completed => "[x]",
                        StageState::Current => "[>]",
                        StageState::Pending => "[ ]",
                    };
                    line.push_str(mark);
                    line.push(' ');
                    line.push_str(stage.label);
                    if i + 1 < stages.len() {
                        line.push_str(if self.connector_lit(i) { " === " } else { " --- " });
                    }
                }
                line
            }
            Progress::Cancelled => "This order has been cancelled".to_string(),
            Progress::Unrecognized(raw) => format!("Order status unavailable ({})", raw),
        }
    }
}

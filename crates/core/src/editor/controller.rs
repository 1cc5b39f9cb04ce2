//! Drag state machine for creating, moving and resizing blocks
//!
//! The controller never mutates the committed model. It snapshots the week
//! on `pointer_down`, recomputes a preview on every `pointer_move`, and on
//! `pointer_up` hands back either the validated days to persist or the
//! violation that blocked the drop.
//!
//! Previews are always derived from the interval captured at press time plus
//! the total pointer delta, so rounding never accumulates across moves.

use cadence_domain::constants::MIN_BLOCK_MINUTES;
use cadence_domain::types::time::quantize;
use cadence_domain::validation::{has_room_for_another, validate_candidate};
use cadence_domain::{
    CadenceError, DayAvailability, GridConfig, Result, TimeInterval, TimeOfDay, Violation,
    Weekday, WeeklyAvailability,
};
use tracing::debug;

use super::types::{DragMode, DragPreview, Edge, EditOutcome, PointerTarget};

/// Controller state.
#[derive(Debug, Clone, Default)]
pub enum EditState {
    #[default]
    Idle,
    Dragging(Box<DragSession>),
}

/// Everything captured when a drag starts.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub mode: DragMode,
    pub anchor_day: Weekday,
    pub target_day: Weekday,
    /// Sorted index of the grabbed block; `None` when creating.
    pub block_index: Option<usize>,
    pub initial: TimeInterval,
    pub pointer_origin_px: f64,
    pub preview: DragPreview,
    week: WeeklyAvailability,
}

/// One edit session over a single week.
#[derive(Debug, Clone)]
pub struct EditController {
    grid: GridConfig,
    state: EditState,
}

impl EditController {
    pub fn new(grid: GridConfig) -> Self {
        Self { grid, state: EditState::Idle }
    }

    pub const fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub const fn state(&self) -> &EditState {
        &self.state
    }

    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, EditState::Dragging(_))
    }

    pub fn preview(&self) -> Option<&DragPreview> {
        match &self.state {
            EditState::Dragging(session) => Some(&session.preview),
            EditState::Idle => None,
        }
    }

    /// Start a drag.
    ///
    /// # Errors
    /// - `InvalidArgument` if a drag is already active (the active drag is
    ///   kept) or the target names a block the day does not have.
    /// - `Violation(TooManyBlocks)` when pressing an empty cell of a full day.
    pub fn pointer_down(
        &mut self,
        week: &WeeklyAvailability,
        day: Weekday,
        target: PointerTarget,
        y_px: f64,
    ) -> Result<DragPreview> {
        if self.is_dragging() {
            return Err(CadenceError::InvalidArgument(
                "pointer_down while a drag is already active".to_string(),
            ));
        }

        let blocks = week.day(day).blocks();
        let (mode, block_index, initial) = match target {
            PointerTarget::EmptyCell => {
                if !has_room_for_another(blocks.len()) {
                    return Err(Violation::TooManyBlocks.into());
                }
                (DragMode::Create, None, self.create_slot(y_px))
            }
            PointerTarget::BlockBody(index) => {
                (DragMode::Move, Some(index), block_at(blocks, day, index)?)
            }
            PointerTarget::BlockEdge(index, Edge::Top) => {
                (DragMode::ResizeStart, Some(index), block_at(blocks, day, index)?)
            }
            PointerTarget::BlockEdge(index, Edge::Bottom) => {
                (DragMode::ResizeEnd, Some(index), block_at(blocks, day, index)?)
            }
        };

        let mut session = DragSession {
            mode,
            anchor_day: day,
            target_day: day,
            block_index,
            initial,
            pointer_origin_px: y_px,
            preview: DragPreview { mode, day, interval: initial, conflict: None },
            week: week.clone(),
        };
        session.preview.conflict = session.conflict_for(day, initial);

        debug!(mode = %mode, day = %day, interval = %initial, "drag started");
        let preview = session.preview;
        self.state = EditState::Dragging(Box::new(session));
        Ok(preview)
    }

    /// Recompute the preview. Ignored (returns `None`) while idle.
    pub fn pointer_move(&mut self, day: Weekday, y_px: f64) -> Option<DragPreview> {
        let grid = self.grid;
        let EditState::Dragging(session) = &mut self.state else {
            return None;
        };

        let delta = grid.px_to_offset_minutes(y_px - session.pointer_origin_px);
        let initial = session.initial;
        let interval = match session.mode {
            DragMode::Create => {
                let pointer = grid.snap_px(y_px);
                let anchor = initial.start.minutes();
                if pointer > anchor {
                    span(anchor, pointer.max(anchor + MIN_BLOCK_MINUTES))
                } else {
                    span(pointer, initial.end.minutes())
                }
            }
            DragMode::Move => {
                let shift = quantize(delta, grid.snap_minutes);
                let duration = initial.duration_minutes();
                // Blocks stored outside the grid may stay where they are.
                let lowest = grid.start_minutes.min(initial.start.minutes());
                let highest = (grid.end_minutes - duration).max(initial.start.minutes());
                let start = (initial.start.minutes() + shift).clamp(lowest, highest);
                span(start, start + duration)
            }
            DragMode::ResizeStart => {
                let start = snap_bound(&grid, initial.start.minutes(), delta);
                span(start.min(initial.end.minutes() - MIN_BLOCK_MINUTES), initial.end.minutes())
            }
            DragMode::ResizeEnd => {
                let end = snap_bound(&grid, initial.end.minutes(), delta);
                span(initial.start.minutes(), end.max(initial.start.minutes() + MIN_BLOCK_MINUTES))
            }
        };

        if session.mode == DragMode::Move {
            session.target_day = day;
        }
        let target_day = session.target_day;
        session.preview = DragPreview {
            mode: session.mode,
            day: target_day,
            interval,
            conflict: session.conflict_for(target_day, interval),
        };
        Some(session.preview)
    }

    /// Finish the drag and build the days to persist.
    ///
    /// # Algorithm
    /// 1. Create: append the preview to the anchor day.
    /// 2. Same-day move or resize: replace the grabbed block.
    /// 3. Cross-day move: add to the target day, remove from the source.
    ///
    /// The grabbed block is never compared with itself. Cross-day commits
    /// list the target day first, then the source.
    pub fn pointer_up(&mut self) -> EditOutcome {
        let EditState::Dragging(session) = std::mem::take(&mut self.state) else {
            return EditOutcome::Idle;
        };

        let outcome = session.commit();
        match &outcome {
            EditOutcome::Committed(_) => {
                debug!(mode = %session.mode, days = ?outcome.changed_days(), "drag committed");
            }
            EditOutcome::Rejected { day, violation } => {
                debug!(mode = %session.mode, day = %day, violation = %violation, "drag rejected");
            }
            EditOutcome::Unchanged | EditOutcome::Idle => {}
        }
        outcome
    }

    /// Abandon the drag. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        if was_dragging {
            debug!("drag cancelled");
        }
        self.state = EditState::Idle;
        was_dragging
    }

    /// Anchor slot for a new block, pulled back so it fits in the grid.
    fn create_slot(&self, y_px: f64) -> TimeInterval {
        let anchor = self.grid.snap_px(y_px).min(self.grid.end_minutes - MIN_BLOCK_MINUTES);
        span(anchor, anchor + MIN_BLOCK_MINUTES)
    }
}

impl DragSession {
    /// Blocks of `day` that `candidate` must not collide with.
    fn others(&self, day: Weekday) -> Vec<TimeInterval> {
        let blocks = self.week.day(day).blocks();
        match self.block_index {
            Some(index) if day == self.anchor_day => blocks
                .iter()
                .enumerate()
                .filter(|(position, _)| *position != index)
                .map(|(_, block)| *block)
                .collect(),
            _ => blocks.to_vec(),
        }
    }

    fn conflict_for(&self, day: Weekday, candidate: TimeInterval) -> Option<Violation> {
        validate_candidate(&self.others(day), candidate).err()
    }

    fn commit(&self) -> EditOutcome {
        let target = self.target_day;
        let candidate = self.preview.interval;

        let cross_day = self.anchor_day != target;
        if !cross_day && self.block_index.is_some() && candidate == self.initial {
            return EditOutcome::Unchanged;
        }

        let mut blocks = self.others(target);
        if let Err(violation) = validate_candidate(&blocks, candidate) {
            return EditOutcome::Rejected { day: target, violation };
        }
        blocks.push(candidate);
        let target_day = match DayAvailability::new(target, blocks) {
            Ok(day) => day,
            Err(violation) => return EditOutcome::Rejected { day: target, violation },
        };

        if !cross_day {
            return EditOutcome::Committed(vec![target_day]);
        }

        let source = self.anchor_day;
        match DayAvailability::new(source, self.others(source)) {
            Ok(source_day) => EditOutcome::Committed(vec![target_day, source_day]),
            Err(violation) => EditOutcome::Rejected { day: source, violation },
        }
    }
}

fn block_at(blocks: &[TimeInterval], day: Weekday, index: usize) -> Result<TimeInterval> {
    blocks.get(index).copied().ok_or_else(|| {
        CadenceError::InvalidArgument(format!("{day} has no block at index {index}"))
    })
}

fn span(start: i32, end: i32) -> TimeInterval {
    TimeInterval::new(TimeOfDay::saturating(start), TimeOfDay::saturating(end))
}

/// Snap a dragged bound into the grid. A bound stored outside the grid may
/// stay where it is.
fn snap_bound(grid: &GridConfig, initial: i32, delta: i32) -> i32 {
    let lowest = grid.start_minutes.min(initial);
    let highest = grid.end_minutes.max(initial);
    quantize(initial.saturating_add(delta), grid.snap_minutes).clamp(lowest, highest)
}

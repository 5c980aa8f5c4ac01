//! Timelines
//!
//! A [`Timeline`] is an ordered list of steps and nested timelines, each
//! placed by a [`Position`]. Building one is cheap and side-effect free; the
//! sequencer resolves every entry's absolute start once, when the timeline
//! is scheduled, against a snapshot of the tree.
//!
//! Nesting by value can never form a cycle, so sharing goes through
//! [`TimelineRef`]. A shared timeline may be nested in several parents, and
//! edits made after scheduling only affect later schedules.
//!
//! ```rust
//! use folio_animation::{AnimationStep, Position, Timeline};
//! use folio_core::ElementStore;
//! # let mut store = ElementStore::new();
//! # let card = store.create("card", Default::default());
//!
//! let timeline = Timeline::new()
//!     .add(AnimationStep::new([card]).property("opacity", 1.0).duration(0.8))
//!     .add(AnimationStep::new([card]).property("y", 0.0).duration(1.2))
//!     .add_at(AnimationStep::new([card]).property("scale", 1.0).duration(1.0), Position::parse("-=0.5"));
//!
//! assert!((timeline.duration().unwrap() - 2.5).abs() < 1e-4);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{self, ConfigurationError, Result};
use crate::step::{AnimationStep, Repeat};

/// Where an entry starts within its timeline
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Position {
    /// Right after the previous entry ends
    #[default]
    Sequential,
    /// Seconds from the timeline start
    Absolute(f32),
    /// Offset from the previous entry's end (`"+=0.5"`, `"-=0.3"`, `">"`)
    AfterPrevious(f32),
    /// Offset from the previous entry's start (`"<"`, `"<0.2"`)
    WithPrevious(f32),
}

impl Position {
    /// Parse the compact position strings used by timeline libraries
    ///
    /// Malformed input is logged and treated as [`Position::Sequential`].
    pub fn parse(text: &str) -> Position {
        let text = text.trim();
        let parsed = if text.is_empty() {
            Some(Position::Sequential)
        } else if let Some(rest) = text.strip_prefix("+=") {
            parse_offset(rest).map(Position::AfterPrevious)
        } else if let Some(rest) = text.strip_prefix("-=") {
            parse_offset(rest).map(|v| Position::AfterPrevious(-v))
        } else if let Some(rest) = text.strip_prefix('<') {
            parse_optional(rest).map(Position::WithPrevious)
        } else if let Some(rest) = text.strip_prefix('>') {
            parse_optional(rest).map(Position::AfterPrevious)
        } else {
            parse_offset(text).map(Position::Absolute)
        };

        parsed.unwrap_or_else(|| {
            tracing::warn!("Malformed timeline position '{}', placing sequentially", text);
            Position::Sequential
        })
    }
}

fn parse_offset(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_optional(text: &str) -> Option<f32> {
    if text.trim().is_empty() {
        Some(0.0)
    } else {
        parse_offset(text)
    }
}

impl From<f32> for Position {
    fn from(seconds: f32) -> Self {
        Position::Absolute(seconds)
    }
}

impl From<f64> for Position {
    fn from(seconds: f64) -> Self {
        Position::Absolute(seconds as f32)
    }
}

impl From<&str> for Position {
    fn from(text: &str) -> Self {
        Position::parse(text)
    }
}

/// A timeline entry
#[derive(Clone, Debug)]
pub enum TimelineEntry {
    Step(AnimationStep),
    Nested(TimelineRef),
}

/// Ordered, positioned steps and nested timelines
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    label: Option<String>,
    entries: Vec<(TimelineEntry, Position)>,
    repeat: Repeat,
    yoyo: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timeline with a label used in logs and error paths
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Append a step after the previous entry
    pub fn add(self, step: AnimationStep) -> Self {
        self.add_at(step, Position::Sequential)
    }

    /// Append a step at a position
    pub fn add_at(mut self, step: AnimationStep, position: impl Into<Position>) -> Self {
        self.push(step, position);
        self
    }

    /// Nest a timeline after the previous entry
    pub fn nest(self, child: impl Into<TimelineRef>) -> Self {
        self.nest_at(child, Position::Sequential)
    }

    /// Nest a timeline at a position
    pub fn nest_at(mut self, child: impl Into<TimelineRef>, position: impl Into<Position>) -> Self {
        self.push_nested(child, position);
        self
    }

    pub fn push(&mut self, step: AnimationStep, position: impl Into<Position>) {
        self.entries.push((TimelineEntry::Step(step), position.into()));
    }

    pub fn push_nested(&mut self, child: impl Into<TimelineRef>, position: impl Into<Position>) {
        self.entries
            .push((TimelineEntry::Nested(child.into()), position.into()));
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn repeat_infinite(self) -> Self {
        self.repeat(Repeat::Infinite)
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn entries(&self) -> &[(TimelineEntry, Position)] {
        &self.entries
    }

    pub fn get_repeat(&self) -> Repeat {
        self.repeat
    }

    pub fn is_yoyo(&self) -> bool {
        self.yoyo
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total duration including repeats; infinite when anything loops forever
    pub fn duration(&self) -> Result<f32> {
        // A by-value root has no identity; only its shared children can cycle
        let mut stack = Vec::new();
        resolve_entries(self, &mut stack).map(|resolved| resolved.timing.span)
    }

    /// Move into a shared handle so the timeline can be nested by reference
    pub fn into_shared(self) -> TimelineRef {
        TimelineRef::new(self)
    }
}

/// Shared, mutable handle to a timeline
///
/// The label is fixed at construction and kept outside the cell, so it can
/// be reported even while the timeline is borrowed.
#[derive(Clone)]
pub struct TimelineRef {
    timeline: Rc<RefCell<Timeline>>,
    label: Option<Rc<str>>,
}

impl TimelineRef {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            label: timeline.label.as_deref().map(Rc::from),
            timeline: Rc::new(RefCell::new(timeline)),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Nest another shared timeline inside this one
    ///
    /// Nothing is checked here; a cycle is reported when the outer timeline
    /// is scheduled.
    pub fn nest(&self, child: &TimelineRef, position: impl Into<Position>) {
        self.timeline.borrow_mut().push_nested(child.clone(), position);
    }

    /// Append a step to the shared timeline
    pub fn add(&self, step: AnimationStep, position: impl Into<Position>) {
        self.timeline.borrow_mut().push(step, position);
    }

    /// Run a closure against the timeline
    pub fn with<R>(&self, f: impl FnOnce(&Timeline) -> R) -> R {
        f(&self.timeline.borrow())
    }

    /// Whether both handles point at the same timeline
    pub fn ptr_eq(&self, other: &TimelineRef) -> bool {
        Rc::ptr_eq(&self.timeline, &other.timeline)
    }

    pub(crate) fn as_ptr(&self) -> *const RefCell<Timeline> {
        Rc::as_ptr(&self.timeline)
    }

    pub(crate) fn try_snapshot(&self) -> Option<std::cell::Ref<'_, Timeline>> {
        self.timeline.try_borrow().ok()
    }
}

impl fmt::Debug for TimelineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the label: printing children would recurse forever on a cycle
        match self.timeline.try_borrow() {
            Ok(timeline) => f
                .debug_struct("TimelineRef")
                .field("label", &timeline.label)
                .field("entries", &timeline.entries.len())
                .finish(),
            Err(_) => f
                .debug_struct("TimelineRef")
                .field("label", &self.label)
                .field("borrowed", &true)
                .finish(),
        }
    }
}

impl From<Timeline> for TimelineRef {
    fn from(timeline: Timeline) -> Self {
        TimelineRef::new(timeline)
    }
}

impl From<&TimelineRef> for TimelineRef {
    fn from(shared: &TimelineRef) -> Self {
        shared.clone()
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// A timeline with every entry's start computed
#[derive(Clone, Debug)]
pub(crate) struct ResolvedTimeline {
    pub label: Option<String>,
    pub entries: Vec<ResolvedEntry>,
    pub timing: GroupTiming,
}

/// Looping parameters of a resolved timeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GroupTiming {
    pub repeat: Repeat,
    pub yoyo: bool,
    /// Length of one run
    pub cycle: f32,
    /// Length including repeats
    pub span: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct ResolvedEntry {
    pub start: f32,
    pub span: f32,
    pub node: ResolvedNode,
}

#[derive(Clone, Debug)]
pub(crate) enum ResolvedNode {
    Step(AnimationStep),
    Group(ResolvedTimeline),
}

impl GroupTiming {
    /// Map time since the group start to time inside one run
    ///
    /// Returns `(inner_time, iteration)`. Past the end of a finite group the
    /// inner time rests where the last run finished.
    pub fn local_time(&self, t: f32) -> (f32, u64) {
        if t < 0.0 || self.cycle <= 0.0 || self.cycle.is_infinite() {
            return (t, 0);
        }

        let iteration = (t / self.cycle).floor();
        if let Some(n) = self.repeat.iterations() {
            if iteration >= n as f32 {
                let last = n - 1;
                let inner = if self.yoyo && last % 2 == 1 {
                    0.0
                } else {
                    self.cycle
                };
                return (inner, last);
            }
        }

        let iteration = iteration as u64;
        let mut inner = (t - iteration as f32 * self.cycle).clamp(0.0, self.cycle);
        if self.yoyo && iteration % 2 == 1 {
            inner = self.cycle - inner;
        }
        (inner, iteration)
    }

    /// Draw epoch for a run of this group, see [`AnimationStep::draw_epoch`]
    pub fn epoch(&self, iteration: u64) -> u64 {
        if self.yoyo {
            iteration / 2
        } else {
            iteration
        }
    }
}

/// Resolve a shared timeline, detecting cycles
pub(crate) fn resolve_shared(root: &TimelineRef) -> Result<ResolvedTimeline> {
    let mut stack = Vec::new();
    resolve_ref(root, &mut stack)
}

type Visit = (*const RefCell<Timeline>, String);

fn resolve_ref(shared: &TimelineRef, stack: &mut Vec<Visit>) -> Result<ResolvedTimeline> {
    let ptr = shared.as_ptr();

    if let Some(pos) = stack.iter().position(|(p, _)| *p == ptr) {
        let mut names: Vec<&str> = stack[pos..].iter().map(|(_, name)| name.as_str()).collect();
        names.push(stack[pos].1.as_str());
        return Err(ConfigurationError::CyclicNesting {
            path: names.join(" -> "),
        });
    }

    let name = shared.label().unwrap_or("<unnamed>").to_string();
    let Some(timeline) = shared.try_snapshot() else {
        let mut names: Vec<&str> = stack.iter().map(|(_, name)| name.as_str()).collect();
        names.push(&name);
        return Err(ConfigurationError::TimelineBusy {
            path: names.join(" -> "),
        });
    };

    stack.push((ptr, name));
    let resolved = resolve_entries(&timeline, stack);
    stack.pop();
    resolved
}

fn resolve_entries(timeline: &Timeline, stack: &mut Vec<Visit>) -> Result<ResolvedTimeline> {
    let mut entries = Vec::with_capacity(timeline.entries.len());
    let mut prev_start = 0.0_f32;
    let mut prev_end = 0.0_f32;
    let mut cycle = 0.0_f32;

    for (entry, position) in &timeline.entries {
        let node = match entry {
            TimelineEntry::Step(step) => ResolvedNode::Step(step.clone()),
            TimelineEntry::Nested(child) => ResolvedNode::Group(resolve_ref(child, stack)?),
        };
        let span = match &node {
            ResolvedNode::Step(step) => step.span(),
            ResolvedNode::Group(group) => group.timing.span,
        };

        let raw_start = match *position {
            Position::Sequential => prev_end,
            Position::Absolute(at) => at,
            Position::AfterPrevious(offset) => prev_end + offset,
            Position::WithPrevious(offset) => prev_start + offset,
        };
        let start = if raw_start.is_nan() || raw_start < 0.0 {
            error::non_negative("position", raw_start)
        } else {
            raw_start
        };

        let end = start + span;
        prev_start = start;
        prev_end = end;
        cycle = cycle.max(end);

        entries.push(ResolvedEntry { start, span, node });
    }

    let span = if cycle.is_infinite() {
        f32::INFINITY
    } else if cycle <= 0.0 {
        0.0
    } else {
        match timeline.repeat.iterations() {
            Some(n) => cycle * n as f32,
            None => f32::INFINITY,
        }
    };

    Ok(ResolvedTimeline {
        label: timeline.label.clone(),
        entries,
        timing: GroupTiming {
            repeat: timeline.repeat,
            yoyo: timeline.yoyo,
            cycle,
            span,
        },
    })
}

//! Timeline sequencer
//!
//! The sequencer owns every scheduled timeline and standalone tween of one
//! page scope and drives them from an explicit frame clock:
//!
//! ```text
//! host frame ──► tick(dt, host)
//!                  ├─ timelines: resolve phase per target, write values
//!                  └─ tweens:    overwrite tweens, applied last
//! ```
//!
//! Playback is phase based. Every target of every step is classified as
//! before, inside, or past its window on each frame. Values are only written
//! while a target is inside its window, or once when it crosses a boundary,
//! so a step the clock jumps over still lands exactly on its end value and
//! steps that are not playing never fight over a property.
//!
//! Boundary writes are ordered so time always reads consistently: targets
//! moving back before their window are reset latest-first, targets that just
//! finished settle in timeline order, and only then do playing targets write.

use folio_core::{AnimValue, ElementHost, ElementId, Interpolate};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::easing::Easing;
use crate::error::{self, Result};
use crate::step::{AnimationStep, StepPhase};
use crate::timeline::{
    resolve_shared, GroupTiming, ResolvedNode, ResolvedTimeline, Timeline, TimelineRef,
};
use crate::values::{entropy_source, seeded_source, ValueSource};

new_key_type! {
    /// Handle to a scheduled timeline
    pub struct TimelineHandle;
    /// Handle to a standalone overwrite tween
    pub struct TweenId;
}

/// Playback state of a scheduled timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Playing,
    Paused,
}

/// Which values a cancelled timeline leaves behind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetDirective {
    /// Restore the values captured when each target started
    Initial,
    /// Jump every target to where it would finally rest
    Final,
}

/// Lifecycle notifications, drained with [`Sequencer::drain_events`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerEvent {
    Started(TimelineHandle),
    Repeated { handle: TimelineHandle, iteration: u64 },
    Completed(TimelineHandle),
    Cancelled(TimelineHandle),
}

// ============================================================================
// Per-target playback state
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    /// Never sampled
    Unseen,
    Before,
    Active { epoch: u64 },
    After,
    /// An enclosing timeline started a new run
    Rewound,
}

#[derive(Clone, Debug)]
struct PropertyTrack {
    start: Option<AnimValue>,
    end: Option<AnimValue>,
}

#[derive(Clone, Debug)]
struct TargetTrack {
    target: ElementId,
    index: usize,
    properties: SmallVec<[PropertyTrack; 4]>,
    mark: Mark,
    gone: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pass {
    /// Targets moving back before their window, latest entry first
    Rewind,
    /// Targets that just finished, in timeline order
    Settle,
    /// Targets inside their window
    Play,
}

struct Frame<'a> {
    host: &'a mut dyn ElementHost,
    source: &'a mut dyn ValueSource,
}

struct StepRun {
    step: AnimationStep,
    tracks: Vec<TargetTrack>,
}

struct GroupRun {
    label: Option<String>,
    timing: GroupTiming,
    entries: Vec<(f32, RunNode)>,
    last_epoch: Option<u64>,
}

enum RunNode {
    Step(StepRun),
    Group(GroupRun),
}

impl StepRun {
    fn new(step: AnimationStep) -> Self {
        let tracks = if step.is_noop() {
            Vec::new()
        } else {
            let count = step.properties().len();
            step.targets()
                .iter()
                .enumerate()
                .map(|(index, &target)| TargetTrack {
                    target,
                    index,
                    properties: (0..count)
                        .map(|_| PropertyTrack {
                            start: None,
                            end: None,
                        })
                        .collect(),
                    mark: Mark::Unseen,
                    gone: false,
                })
                .collect()
        };
        Self { step, tracks }
    }

    fn render(&mut self, local: f32, pass: Pass, frame: &mut Frame<'_>) {
        let step = &self.step;

        for track in self.tracks.iter_mut().filter(|t| !t.gone) {
            let phase = step.phase_at(local, track.index);

            match (pass, phase) {
                (Pass::Rewind, StepPhase::Before) => {
                    if matches!(track.mark, Mark::Active { .. } | Mark::After | Mark::Rewound) {
                        write_starts(step, track, frame);
                    }
                    if !track.gone {
                        track.mark = Mark::Before;
                    }
                }
                (Pass::Settle, StepPhase::After { fraction }) => {
                    if track.mark == Mark::After {
                        continue;
                    }
                    let final_epoch = step
                        .get_repeat()
                        .iterations()
                        .map(|n| step.draw_epoch(n.saturating_sub(1)))
                        .unwrap_or(0);
                    let redraw = match track.mark {
                        Mark::Active { epoch } => epoch != final_epoch,
                        Mark::After => false,
                        Mark::Unseen | Mark::Before | Mark::Rewound => true,
                    };
                    prepare(step, track, redraw, frame);
                    write_at(step, track, fraction, frame);
                    track.mark = Mark::After;
                }
                (Pass::Play, StepPhase::Active { iteration, fraction }) => {
                    let epoch = step.draw_epoch(iteration);
                    let redraw = match track.mark {
                        Mark::Active { epoch: last } => last != epoch,
                        Mark::After => false,
                        Mark::Unseen | Mark::Before | Mark::Rewound => true,
                    };
                    prepare(step, track, redraw, frame);
                    write_at(step, track, fraction, frame);
                    track.mark = Mark::Active { epoch };
                }
                _ => {}
            }
        }

        if pass == Pass::Play {
            let before = self.tracks.len();
            self.tracks.retain(|t| !t.gone);
            if self.tracks.len() != before {
                tracing::debug!("Dropped {} gone target(s)", before - self.tracks.len());
            }
        }
    }

    fn cancel(&mut self, directive: ResetDirective, frame: &mut Frame<'_>) {
        let step = &self.step;
        for track in self.tracks.iter_mut().filter(|t| !t.gone) {
            match directive {
                ResetDirective::Initial => write_starts(step, track, frame),
                ResetDirective::Final => {
                    prepare(step, track, false, frame);
                    write_at(step, track, step.final_fraction(), frame);
                }
            }
        }
    }
}

/// Capture start values on first use and draw end values when asked
fn prepare(step: &AnimationStep, track: &mut TargetTrack, redraw: bool, frame: &mut Frame<'_>) {
    if !frame.host.is_alive(track.target) {
        track.gone = true;
        return;
    }

    let total = step.targets().len();
    for ((name, tween), slot) in step.properties().iter().zip(track.properties.iter_mut()) {
        let start = match slot.start {
            Some(start) => start,
            None => {
                let current = frame
                    .host
                    .read(track.target, name)
                    .unwrap_or_else(|| AnimValue::default_for(name, &tween.to.hint()));
                let start = match &tween.from {
                    Some(from) => from.resolve(track.index, total, &current, frame.source),
                    None => current,
                };
                slot.start = Some(start);
                start
            }
        };

        if redraw || slot.end.is_none() {
            slot.end = Some(tween.to.resolve(track.index, total, &start, frame.source));
        }
    }
}

fn write_at(step: &AnimationStep, track: &mut TargetTrack, fraction: f32, frame: &mut Frame<'_>) {
    if track.gone {
        return;
    }
    let eased = step.get_easing().apply(fraction);

    for (name, slot) in step.properties().keys().zip(track.properties.iter()) {
        let (Some(start), Some(end)) = (slot.start, slot.end) else {
            continue;
        };
        if let Err(err) = frame.host.write(track.target, name, start.lerp(&end, eased)) {
            tracing::debug!("Dropping target: {}", err);
            track.gone = true;
            return;
        }
    }
}

fn write_starts(step: &AnimationStep, track: &mut TargetTrack, frame: &mut Frame<'_>) {
    for (name, slot) in step.properties().keys().zip(track.properties.iter()) {
        let Some(start) = slot.start else {
            continue;
        };
        if let Err(err) = frame.host.write(track.target, name, start) {
            tracing::debug!("Dropping target: {}", err);
            track.gone = true;
            return;
        }
    }
}

impl GroupRun {
    fn new(resolved: ResolvedTimeline) -> Self {
        let entries = resolved
            .entries
            .into_iter()
            .map(|entry| {
                let node = match entry.node {
                    ResolvedNode::Step(step) => RunNode::Step(StepRun::new(step)),
                    ResolvedNode::Group(group) => RunNode::Group(GroupRun::new(group)),
                };
                (entry.start, node)
            })
            .collect();

        Self {
            label: resolved.label,
            timing: resolved.timing,
            entries,
            last_epoch: None,
        }
    }

    fn render(&mut self, t: f32, pass: Pass, frame: &mut Frame<'_>) {
        let (inner, iteration) = self.timing.local_time(t);

        if pass == Pass::Rewind {
            let epoch = self.timing.epoch(iteration);
            if self.last_epoch.is_some_and(|last| last != epoch) {
                self.rewind();
            }
            self.last_epoch = Some(epoch);
        }

        if pass == Pass::Rewind {
            for (start, node) in self.entries.iter_mut().rev() {
                node.render(inner - *start, pass, frame);
            }
        } else {
            for (start, node) in self.entries.iter_mut() {
                node.render(inner - *start, pass, frame);
            }
        }
    }

    /// Mark everything below as needing a fresh run
    fn rewind(&mut self) {
        for (_, node) in self.entries.iter_mut() {
            match node {
                RunNode::Step(run) => {
                    for track in run.tracks.iter_mut() {
                        if track.mark != Mark::Unseen {
                            track.mark = Mark::Rewound;
                        }
                    }
                }
                RunNode::Group(group) => {
                    group.last_epoch = None;
                    group.rewind();
                }
            }
        }
    }

    fn for_each_step(&mut self, f: &mut dyn FnMut(&mut StepRun)) {
        for (_, node) in self.entries.iter_mut() {
            match node {
                RunNode::Step(run) => f(run),
                RunNode::Group(group) => group.for_each_step(f),
            }
        }
    }

    fn track_count(&mut self) -> usize {
        let mut count = 0;
        self.for_each_step(&mut |run| count += run.tracks.len());
        count
    }
}

impl RunNode {
    fn render(&mut self, local: f32, pass: Pass, frame: &mut Frame<'_>) {
        match self {
            RunNode::Step(run) => run.render(local, pass, frame),
            RunNode::Group(group) => group.render(local, pass, frame),
        }
    }
}

// ============================================================================
// Scheduled timelines and tweens
// ============================================================================

struct ScheduledTimeline {
    root: GroupRun,
    elapsed: f32,
    time_scale: f32,
    state: PlayState,
    /// Render on the next tick even when paused (after a seek)
    dirty: bool,
    last_iteration: u64,
}

impl ScheduledTimeline {
    fn span(&self) -> f32 {
        self.root.timing.span
    }

    fn render(&mut self, frame: &mut Frame<'_>) {
        for pass in [Pass::Rewind, Pass::Settle, Pass::Play] {
            self.root.render(self.elapsed, pass, frame);
        }
    }

    fn name(&self) -> &str {
        self.root.label.as_deref().unwrap_or("<unnamed>")
    }
}

/// A standalone tween that replaces any earlier tween on the same property
#[derive(Clone, Debug)]
struct Tween {
    target: ElementId,
    property: String,
    from: Option<AnimValue>,
    to: AnimValue,
    duration: f32,
    easing: Easing,
    elapsed: f32,
}

impl Tween {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Value currently shown, if the tween has started
    fn current(&self) -> Option<AnimValue> {
        self.from
            .map(|from| from.lerp(&self.to, self.easing.apply(self.progress())))
    }
}

// ============================================================================
// Sequencer
// ============================================================================

/// Schedules timelines and tweens and advances them once per frame
pub struct Sequencer {
    timelines: SlotMap<TimelineHandle, ScheduledTimeline>,
    /// Handles in scheduling order; later timelines write last
    order: Vec<TimelineHandle>,
    tweens: SlotMap<TweenId, Tween>,
    tween_index: FxHashMap<(ElementId, String), TweenId>,
    value_source: Box<dyn ValueSource>,
    events: Vec<SequencerEvent>,
    clock: f64,
}

impl Sequencer {
    /// Create a sequencer drawing random values from OS entropy
    pub fn new() -> Self {
        Self::with_value_source(entropy_source())
    }

    /// Create a sequencer with a reproducible random stream
    pub fn with_seed(seed: u64) -> Self {
        Self::with_value_source(seeded_source(seed))
    }

    pub fn with_value_source(source: impl ValueSource + 'static) -> Self {
        Self {
            timelines: SlotMap::with_key(),
            order: Vec::new(),
            tweens: SlotMap::with_key(),
            tween_index: FxHashMap::default(),
            value_source: Box::new(source),
            events: Vec::new(),
            clock: 0.0,
        }
    }

    /// The random stream used for value rules
    ///
    /// Presets draw random durations from here so a seeded sequencer
    /// reproduces a whole scene.
    pub fn value_source(&mut self) -> &mut dyn ValueSource {
        &mut *self.value_source
    }

    /// Resolve a timeline and start playing it on the next tick
    ///
    /// Fails without side effects when the timeline nests itself.
    pub fn schedule(&mut self, timeline: impl Into<TimelineRef>) -> Result<TimelineHandle> {
        let resolved = resolve_shared(&timeline.into())?;
        let root = GroupRun::new(resolved);
        let span = root.timing.span;

        let handle = self.timelines.insert(ScheduledTimeline {
            root,
            elapsed: 0.0,
            time_scale: 1.0,
            state: PlayState::Playing,
            dirty: false,
            last_iteration: 0,
        });
        self.order.push(handle);

        if let Some(scheduled) = self.timelines.get(handle) {
            tracing::debug!(
                "Scheduled timeline '{}' ({:?}), span {:.3}s",
                scheduled.name(),
                handle,
                span
            );
        }
        self.events.push(SequencerEvent::Started(handle));
        Ok(handle)
    }

    /// Schedule a single step as its own timeline
    pub fn schedule_step(&mut self, step: AnimationStep) -> Result<TimelineHandle> {
        self.schedule(Timeline::new().add(step))
    }

    /// Advance every timeline and tween by `dt` seconds and write values
    ///
    /// Returns true while anything is still playing.
    pub fn tick(&mut self, dt: f32, host: &mut dyn ElementHost) -> bool {
        let dt = error::non_negative("dt", dt);
        self.clock += f64::from(dt);

        let Self {
            timelines,
            order,
            tweens,
            tween_index,
            value_source,
            events,
            ..
        } = self;
        let mut frame = Frame {
            host,
            source: &mut **value_source,
        };

        let mut completed: SmallVec<[TimelineHandle; 4]> = SmallVec::new();
        for &handle in order.iter() {
            let Some(scheduled) = timelines.get_mut(handle) else {
                continue;
            };
            let advancing = scheduled.state == PlayState::Playing;
            if advancing {
                scheduled.elapsed += dt * scheduled.time_scale;
                if scheduled.span().is_finite() {
                    scheduled.elapsed = scheduled.elapsed.min(scheduled.span());
                }
            } else if !scheduled.dirty {
                continue;
            }
            scheduled.dirty = false;
            scheduled.render(&mut frame);

            let (_, iteration) = scheduled.root.timing.local_time(scheduled.elapsed);
            if iteration > scheduled.last_iteration {
                scheduled.last_iteration = iteration;
                events.push(SequencerEvent::Repeated { handle, iteration });
            } else if iteration < scheduled.last_iteration {
                scheduled.last_iteration = iteration;
            }

            if advancing && scheduled.elapsed >= scheduled.span() {
                completed.push(handle);
            }
        }

        if !completed.is_empty() {
            order.retain(|h| !completed.contains(h));
        }
        for handle in completed {
            if let Some(scheduled) = timelines.remove(handle) {
                tracing::debug!("Timeline '{}' ({:?}) completed", scheduled.name(), handle);
                events.push(SequencerEvent::Completed(handle));
            }
        }

        // Tweens run after timelines so pointer-driven values win
        let mut finished: SmallVec<[TweenId; 8]> = SmallVec::new();
        for (id, tween) in tweens.iter_mut() {
            let host = &mut *frame.host;
            if !host.is_alive(tween.target) {
                finished.push(id);
                continue;
            }

            let from = match tween.from {
                Some(from) => from,
                None => {
                    let from = host
                        .read(tween.target, &tween.property)
                        .unwrap_or_else(|| AnimValue::default_for(&tween.property, &tween.to));
                    tween.from = Some(from);
                    from
                }
            };

            tween.elapsed += dt;
            let progress = tween.progress();
            let value = from.lerp(&tween.to, tween.easing.apply(progress));
            if let Err(err) = host.write(tween.target, &tween.property, value) {
                tracing::debug!("Dropping tween: {}", err);
                finished.push(id);
                continue;
            }
            if progress >= 1.0 {
                finished.push(id);
            }
        }

        for id in finished {
            if let Some(tween) = tweens.remove(id) {
                let key = (tween.target, tween.property);
                if tween_index.get(&key) == Some(&id) {
                    tween_index.remove(&key);
                }
            }
        }

        self.has_active()
    }

    /// Stop a timeline and all its nested children, leaving values as they are
    pub fn cancel(&mut self, handle: TimelineHandle) -> bool {
        match self.unschedule(handle) {
            Some(scheduled) => {
                tracing::debug!("Cancelled timeline '{}' ({:?})", scheduled.name(), handle);
                self.events.push(SequencerEvent::Cancelled(handle));
                true
            }
            None => false,
        }
    }

    /// Stop a timeline and reset its targets
    pub fn cancel_with(
        &mut self,
        handle: TimelineHandle,
        directive: ResetDirective,
        host: &mut dyn ElementHost,
    ) -> bool {
        let Some(mut scheduled) = self.unschedule(handle) else {
            return false;
        };

        let mut frame = Frame {
            host,
            source: &mut *self.value_source,
        };
        scheduled
            .root
            .for_each_step(&mut |run| run.cancel(directive, &mut frame));

        tracing::debug!(
            "Cancelled timeline '{}' ({:?}) with {:?} reset",
            scheduled.name(),
            handle,
            directive
        );
        self.events.push(SequencerEvent::Cancelled(handle));
        true
    }

    fn unschedule(&mut self, handle: TimelineHandle) -> Option<ScheduledTimeline> {
        let scheduled = self.timelines.remove(handle)?;
        self.order.retain(|h| *h != handle);
        Some(scheduled)
    }

    pub fn pause(&mut self, handle: TimelineHandle) -> bool {
        self.set_state(handle, PlayState::Paused)
    }

    pub fn resume(&mut self, handle: TimelineHandle) -> bool {
        self.set_state(handle, PlayState::Playing)
    }

    fn set_state(&mut self, handle: TimelineHandle, state: PlayState) -> bool {
        match self.timelines.get_mut(handle) {
            Some(scheduled) => {
                scheduled.state = state;
                true
            }
            None => false,
        }
    }

    /// Jump to `seconds` into the timeline; values update on the next tick
    pub fn seek(&mut self, handle: TimelineHandle, seconds: f32) -> bool {
        let seconds = error::non_negative("seek", seconds);
        match self.timelines.get_mut(handle) {
            Some(scheduled) => {
                scheduled.elapsed = seconds.min(scheduled.span());
                scheduled.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Playback speed multiplier, 1.0 is normal speed
    pub fn set_time_scale(&mut self, handle: TimelineHandle, scale: f32) -> bool {
        let scale = error::non_negative("time_scale", scale);
        match self.timelines.get_mut(handle) {
            Some(scheduled) => {
                scheduled.time_scale = scale;
                true
            }
            None => false,
        }
    }

    pub fn state(&self, handle: TimelineHandle) -> Option<PlayState> {
        self.timelines.get(handle).map(|s| s.state)
    }

    /// Seconds played, scaled by the timeline's time scale
    pub fn elapsed(&self, handle: TimelineHandle) -> Option<f32> {
        self.timelines.get(handle).map(|s| s.elapsed)
    }

    /// Total span; infinite for looping timelines
    pub fn duration(&self, handle: TimelineHandle) -> Option<f32> {
        self.timelines.get(handle).map(|s| s.span())
    }

    /// Progress in `0..=1`
    ///
    /// Infinite timelines report progress through their current run.
    pub fn progress(&self, handle: TimelineHandle) -> Option<f32> {
        self.timelines.get(handle).map(|s| {
            let span = s.span();
            let cycle = s.root.timing.cycle;
            if span.is_finite() {
                if span <= 0.0 {
                    1.0
                } else {
                    (s.elapsed / span).clamp(0.0, 1.0)
                }
            } else if cycle.is_finite() && cycle > 0.0 {
                (s.elapsed % cycle) / cycle
            } else {
                0.0
            }
        })
    }

    /// Whether the timeline exists and is playing
    pub fn is_active(&self, handle: TimelineHandle) -> bool {
        self.state(handle) == Some(PlayState::Playing)
    }

    /// Start a tween on one property, replacing any tween already on it
    ///
    /// The new tween starts from whatever the old one was showing, so
    /// retargeting on every pointer move never jumps.
    pub fn tween_to(
        &mut self,
        target: ElementId,
        property: &str,
        to: impl Into<AnimValue>,
        duration: f32,
        easing: Easing,
    ) -> TweenId {
        let key = (target, property.to_string());
        let from = self
            .tween_index
            .remove(&key)
            .and_then(|old| self.tweens.remove(old))
            .and_then(|old| old.current());

        let id = self.tweens.insert(Tween {
            target,
            property: property.to_string(),
            from,
            to: to.into(),
            duration: error::non_negative("duration", duration),
            easing,
            elapsed: 0.0,
        });
        self.tween_index.insert(key, id);
        id
    }

    pub fn cancel_tween(&mut self, id: TweenId) -> bool {
        match self.tweens.remove(id) {
            Some(tween) => {
                let key = (tween.target, tween.property);
                if self.tween_index.get(&key) == Some(&id) {
                    self.tween_index.remove(&key);
                }
                true
            }
            None => false,
        }
    }

    pub fn is_tweening(&self, target: ElementId, property: &str) -> bool {
        self.tween_index
            .contains_key(&(target, property.to_string()))
    }

    /// Forget an element that the host is tearing down
    ///
    /// Timelines that are left without any target are cancelled.
    pub fn release_element(&mut self, id: ElementId) {
        let mut emptied: SmallVec<[TimelineHandle; 4]> = SmallVec::new();

        for &handle in &self.order {
            let Some(scheduled) = self.timelines.get_mut(handle) else {
                continue;
            };
            let mut removed = 0;
            scheduled.root.for_each_step(&mut |run| {
                let before = run.tracks.len();
                run.tracks.retain(|t| t.target != id);
                removed += before - run.tracks.len();
            });
            if removed > 0 && scheduled.root.track_count() == 0 {
                emptied.push(handle);
            }
        }

        for handle in emptied {
            self.cancel(handle);
        }

        let tweens: SmallVec<[TweenId; 4]> = self
            .tweens
            .iter()
            .filter(|(_, t)| t.target == id)
            .map(|(tween_id, _)| tween_id)
            .collect();
        for tween_id in tweens {
            self.cancel_tween(tween_id);
        }
    }

    /// Drop every timeline and tween without touching values
    pub fn clear(&mut self) {
        let handles = self.order.clone();
        for handle in handles {
            self.cancel(handle);
        }
        self.tweens.clear();
        self.tween_index.clear();
    }

    pub fn timeline_count(&self) -> usize {
        self.timelines.len()
    }

    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    /// Whether anything still needs frames
    pub fn has_active(&self) -> bool {
        !self.tweens.is_empty()
            || self
                .timelines
                .values()
                .any(|s| s.state == PlayState::Playing)
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SequencerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events queued and not yet drained
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Seconds of frame time seen so far
    pub fn clock(&self) -> f64 {
        self.clock
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stagger::Stagger;
    use crate::step::Repeat;
    use crate::timeline::Position;
    use folio_core::{Color, ElementStore, Rect};

    fn store_with(n: usize) -> (ElementStore, Vec<ElementId>) {
        let mut store = ElementStore::new();
        let ids = (0..n)
            .map(|i| store.create(format!("el{i}"), Rect::new(0.0, 0.0, 10.0, 10.0)))
            .collect();
        (store, ids)
    }

    fn x(store: &ElementStore, id: ElementId) -> f32 {
        store.get_float(id, "x").unwrap_or(f32::NAN)
    }

    /// Tick in small steps up to `seconds`
    fn run(seq: &mut Sequencer, store: &mut ElementStore, seconds: f32, dt: f32) {
        let steps = (seconds / dt).round() as usize;
        for _ in 0..steps {
            seq.tick(dt, store);
        }
    }

    #[test]
    fn test_linear_step_interpolates() {
        let (mut store, ids) = store_with(1);
        let mut seq = Sequencer::with_seed(1);

        seq.schedule_step(
            AnimationStep::new([ids[0]])
                .property("x", 100.0)
                .duration(1.0)
                .ease("none"),
        )
        .unwrap();

        seq.tick(0.25, &mut store);
        assert!((x(&store, ids[0]) - 25.0).abs() < 1e-3);

        seq.tick(0.5, &mut store);
        assert!((x(&store, ids[0]) - 75.0).abs() < 1e-3);
    }

    #[test]
    fn test_sequential_steps_complete_at_total() {
        let (mut store, ids) = store_with(1);
        let mut seq = Sequencer::with_seed(1);
        let el = ids[0];

        let timeline = Timeline::labeled("intro")
            .add(AnimationStep::new([el]).property("x", 10.0).duration(0.8))
            .add(AnimationStep::new([el]).property("y", 20.0).duration(1.2))
            .add(AnimationStep::new([el]).property("opacity", 0.5).duration(1.0));
        let handle = seq.schedule(timeline).unwrap();
        assert!((seq.duration(handle).unwrap() - 3.0).abs() < 1e-4);

        seq.tick(2.9, &mut store);
        assert!(seq.is_active(handle));

        seq.tick(0.2, &mut store);
        assert!(!seq.is_active(handle));
        assert_eq!(seq.timeline_count(), 0);

        assert!((store.get_float(el, "x").unwrap() - 10.0).abs() < 1e-4);
        assert!((store.get_float(el, "y").unwrap() - 20.0).abs() < 1e-4);
        assert!((store.get_float(el, "opacity").unwrap() - 0.5).abs() < 1e-4);

        let events = seq.drain_events();
        assert_eq!(
            events,
            vec![SequencerEvent::Started(handle), SequencerEvent::Completed(handle)]
        );
    }

    #[test]
    fn test_jumped_over_step_lands_on_end() {
        let (mut store, ids) = store_with(1);
        let mut seq = Sequencer::with_seed(1);

        let timeline = Timeline::new()
            .add(AnimationStep::new([ids[0]]).property("x", 50.0).duration(0.2))
            .add(AnimationStep::new([ids[0]]).property("x", 80.0).duration(1.0).ease("none"));
        seq.schedule(timeline).unwrap();

        // One frame skips the whole first step
        seq.tick(0.7, &mut store);
        assert!((x(&store, ids[0]) - 65.0).abs() < 1e-3);
    }

    #[test]
    fn test_infinite_yoyo_is_symmetric() {
        let (mut store, ids) = store_with(1);
        let d = 2.0;

        let sample = |t: f32| {
            let (mut store, ids) = store_with(1);
            let mut seq = Sequencer::with_seed(3);
            seq.schedule_step(
                AnimationStep::new([ids[0]])
                    .property("x", 100.0)
                    .duration(d)
                    .ease("sine.inOut")
                    .repeat_infinite()
                    .yoyo(true),
            )
            .unwrap();
            seq.tick(t, &mut store);
            x(&store, ids[0])
        };

        for t in [0.3_f32, 0.9, 1.5] {
            assert!((sample(t) - sample(2.0 * d - t)).abs() < 1e-3);
        }

        // Still running after many cycles
        let mut seq = Sequencer::with_seed(3);
        let handle = seq
            .schedule_step(
                AnimationStep::new([ids[0]])
                    .property("x", 100.0)
                    .duration(d)
                    .repeat_infinite()
                    .yoyo(true),
            )
            .unwrap();
        run(&mut seq, &mut store, 20.0, 0.5);
        assert!(seq.is_active(handle));
    }

    #[test]
    fn test_cancel_leaves_current_values() {
        let (mut store, ids) = store_with(1);
        let mut seq = Sequencer::with_seed(1);

        let handle = seq
            .schedule_step(
                AnimationStep::new([ids[0]])
                    .property("x", 100.0)
                    .duration(1.0)
                    .ease("none"),
            )
            .unwrap();
        seq.tick(0.4, &mut store);
        assert!(seq.cancel(handle));

        seq.tick(0.4, &mut store);
        assert!((x(&store, ids[0]) - 40.0).abs() < 1e-3);
        assert!(!seq.cancel(handle));
    }

    #[test]
    fn test_cancel_with_reset() {
        let (mut store, ids) = store_with(1);
        store.set(ids[0], "x", 10.0);
        let mut seq = Sequencer::with_seed(1);

        let step = AnimationStep::new([ids[0]])
            .property("x", 100.0)
            .duration(1.0);
        let first = seq.schedule_step(step.clone()).unwrap();
        seq.tick(0.5, &mut store);
        seq.cancel_with(first, ResetDirective::Initial, &mut store);
        assert!((x(&store, ids[0]) - 10.0).abs() < 1e-4);

        let second = seq.schedule_step(step).unwrap();
        seq.tick(0.5, &mut store);
        seq.cancel_with(second, ResetDirective::Final, &mut store);
        assert!((x(&store, ids[0]) - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_cyclic_schedule_changes_nothing() {
        let (mut store, ids) = store_with(1);
        store.set(ids[0], "x", 5.0);
        let mut seq = Sequencer::with_seed(1);

        let a = Timeline::labeled("a")
            .add(AnimationStep::new([ids[0]]).property("x", 100.0))
            .into_shared();
        let b = Timeline::labeled("b").into_shared();
        a.nest(&b, Position::Sequential);
        b.nest(&a, Position::Sequential);

        let result = seq.schedule(&a);
        assert!(matches!(
            result,
            Err(crate::error::ConfigurationError::CyclicNesting { .. })
        ));

        seq.tick(1.0, &mut store);
        assert_eq!(seq.timeline_count(), 0);
        assert!((x(&store, ids[0]) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_center_stagger_start_order() {
        let (mut store, ids) = store_with(5);
        let mut seq = Sequencer::with_seed(1);

        seq.schedule_step(
            AnimationStep::new(ids.clone())
                .property("x", 10.0)
                .duration(1.0)
                .stagger(Stagger::each(0.5).from_center()),
        )
        .unwrap();

        // Only the center has started
        seq.tick(0.25, &mut store);
        assert!(store.get_float(ids[2], "x").is_some());
        for i in [0, 1, 3, 4] {
            assert!(store.get_float(ids[i], "x").is_none());
        }

        seq.tick(0.5, &mut store);
        assert!(store.get_float(ids[1], "x").is_some());
        assert!(store.get_float(ids[3], "x").is_some());
        assert!(store.get_float(ids[0], "x").is_none());
        assert!(store.get_float(ids[4], "x").is_none());
    }

    #[test]
    fn test_random_redraw_per_cycle() {
        let (mut store, ids) = store_with(1);
        let mut seq = Sequencer::with_seed(11);

        seq.schedule_step(
            AnimationStep::new([ids[0]])
                .property("x", crate::values::ValueRule::random(-200.0, 200.0))
                .duration(1.0)
                .ease("none")
                .repeat_infinite()
                .yoyo(true),
        )
        .unwrap();

        // Outgoing and return legs mirror each other
        seq.tick(0.25, &mut store);
        let out = x(&store, ids[0]);
        seq.tick(1.5, &mut store);
        let back = x(&store, ids[0]);
        assert!((out - back).abs() < 1e-3);
        assert!((-200.0..=200.0).contains(&out));
    }

    #[test]
    fn test_later_schedule_wins_after_slot_reuse() {
        let (mut store, ids) = store_with(1);
        let mut seq = Sequencer::with_seed(1);

        for _ in 0..2 {
            seq.schedule_step(AnimationStep::new([ids[0]]).property("y", 1.0).duration(0.1))
                .unwrap();
        }
        seq.tick(0.2, &mut store);
        assert_eq!(seq.timeline_count(), 0);

        // Both land in recycled slots, the newer one in the lower slot
        let older = seq
            .schedule_step(
                AnimationStep::new([ids[0]])
                    .property_from("x", 50.0, 100.0)
                    .duration(1.0)
                    .ease("none"),
            )
            .unwrap();
        let newer = seq
            .schedule_step(
                AnimationStep::new([ids[0]])
                    .property_from("x", 50.0, 0.0)
                    .duration(1.0)
                    .ease("none"),
            )
            .unwrap();
        seq.tick(0.5, &mut store);
        assert!((x(&store, ids[0]) - 25.0).abs() < 1e-4);

        // Cancelling the newer one hands the property back to the older
        seq.cancel(newer);
        seq.tick(0.25, &mut store);
        assert!(seq.is_active(older));
        assert!((x(&store, ids[0]) - 87.5).abs() < 1e-4);
    }

    #[test]
    fn test_explicit_from_values() {
        let (mut store, ids) = store_with(1);
        store.set(ids[0], "opacity", 0.2);
        let mut seq = Sequencer::with_seed(1);

        seq.schedule_step(
            AnimationStep::new([ids[0]])
                .property_from("opacity", 0.0, 1.0)
                .duration(1.0)
                .ease("none"),
        )
        .unwrap();
        seq.tick(0.5, &mut store);

        assert!((store.get_float(ids[0], "opacity").unwrap() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_relative_offset_rule() {
        let (mut store, ids) = store_with(1);
        store.set(ids[0], "rotation", 45.0);
        let mut seq = Sequencer::with_seed(1);

        seq.schedule_step(
            AnimationStep::new([ids[0]])
                .property("rotation", crate::values::ValueRule::offset(360.0))
                .duration(1.0),
        )
        .unwrap();
        seq.tick(2.0, &mut store);

        assert!((store.get_float(ids[0], "rotation").unwrap() - 405.0).abs() < 1e-3);
    }

    #[test]
    fn test_color_property() {
        let (mut store, ids) = store_with(1);
        store.set(ids[0], "color", Color::rgb(0.0, 0.0, 0.0));
        let mut seq = Sequencer::with_seed(1);

        seq.schedule_step(
            AnimationStep::new([ids[0]])
                .property("color", Color::rgb(1.0, 1.0, 1.0))
                .duration(1.0)
                .ease("none"),
        )
        .unwrap();
        seq.tick(0.5, &mut store);

        let color = store.get(ids[0], "color").and_then(|v| v.as_color()).unwrap();
        assert!((color.r - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_timeline_repeat_events_and_reset() {
        let (mut store, ids) = store_with(1);
        let mut seq = Sequencer::with_seed(1);

        let timeline = Timeline::new()
            .add(AnimationStep::new([ids[0]]).property("x", 100.0).duration(1.0).ease("none"))
            .repeat(Repeat::Count(1));
        let handle = seq.schedule(timeline).unwrap();
        seq.drain_events();

        seq.tick(0.9, &mut store);
        seq.tick(0.35, &mut store);
        // Second run restarted from the captured start
        assert!((x(&store, ids[0]) - 25.0).abs() < 1e-3);
        assert_eq!(
            seq.drain_events(),
            vec![SequencerEvent::Repeated { handle, iteration: 1 }]
        );

        seq.tick(1.0, &mut store);
        assert!((x(&store, ids[0]) - 100.0).abs() < 1e-3);
        assert_eq!(seq.drain_events(), vec![SequencerEvent::Completed(handle)]);
    }

    #[test]
    fn test_yoyo_parent_resets_later_steps_first() {
        let (mut store, ids) = store_with(1);
        let mut seq = Sequencer::with_seed(1);

        let timeline = Timeline::new()
            .add(AnimationStep::new([ids[0]]).property("x", 100.0).duration(1.0).ease("none"))
            .add(AnimationStep::new([ids[0]]).property("x", 200.0).duration(1.0).ease("none"))
            .repeat_infinite()
            .yoyo(true);
        seq.schedule(timeline).unwrap();

        seq.tick(1.5, &mut store);
        assert!((x(&store, ids[0]) - 150.0).abs() < 1e-3);

        // Parent is playing backwards at 0.5 into the first step
        seq.tick(2.0, &mut store);
        assert!((x(&store, ids[0]) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_pause_seek_resume() {
        let (mut store, ids) = store_with(1);
        let mut seq = Sequencer::with_seed(1);

        let handle = seq
            .schedule_step(
                AnimationStep::new([ids[0]])
                    .property("x", 100.0)
                    .duration(2.0)
                    .ease("none"),
            )
            .unwrap();
        seq.tick(0.5, &mut store);
        assert!(seq.pause(handle));
        seq.tick(0.5, &mut store);
        assert!((x(&store, ids[0]) - 25.0).abs() < 1e-3);
        assert_eq!(seq.state(handle), Some(PlayState::Paused));

        seq.seek(handle, 1.5);
        seq.tick(0.5, &mut store);
        assert!((x(&store, ids[0]) - 75.0).abs() < 1e-3);
        assert!((seq.progress(handle).unwrap() - 0.75).abs() < 1e-4);

        seq.resume(handle);
        seq.set_time_scale(handle, 2.0);
        seq.tick(0.125, &mut store);
        assert!((x(&store, ids[0]) - 87.5).abs() < 1e-3);
    }

    #[test]
    fn test_tween_retargets_from_current_value() {
        let (mut store, ids) = store_with(1);
        let mut seq = Sequencer::with_seed(1);
        let el = ids[0];

        seq.tween_to(el, "x", 100.0, 1.0, Easing::Linear);
        seq.tick(0.5, &mut store);
        assert!((x(&store, el) - 50.0).abs() < 1e-3);

        seq.tween_to(el, "x", 0.0, 1.0, Easing::Linear);
        assert_eq!(seq.tween_count(), 1);
        seq.tick(0.0, &mut store);
        assert!((x(&store, el) - 50.0).abs() < 1e-3);

        seq.tick(0.5, &mut store);
        assert!((x(&store, el) - 25.0).abs() < 1e-3);

        seq.tick(1.0, &mut store);
        assert!(x(&store, el).abs() < 1e-3);
        assert!(!seq.is_tweening(el, "x"));
    }

    #[test]
    fn test_tweens_win_over_timelines() {
        let (mut store, ids) = store_with(1);
        let mut seq = Sequencer::with_seed(1);

        seq.schedule_step(AnimationStep::new([ids[0]]).property("x", 100.0).duration(1.0))
            .unwrap();
        seq.tween_to(ids[0], "x", -30.0, 0.0, Easing::Linear);
        seq.tick(0.5, &mut store);

        assert!((x(&store, ids[0]) + 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_gone_target_is_dropped() {
        let (mut store, ids) = store_with(2);
        let mut seq = Sequencer::with_seed(1);

        let handle = seq
            .schedule_step(
                AnimationStep::new(ids.clone())
                    .property("x", 100.0)
                    .duration(1.0),
            )
            .unwrap();
        seq.tick(0.2, &mut store);
        store.remove(ids[0]);
        seq.tick(0.2, &mut store);

        assert!(seq.is_active(handle));
        assert!(store.get_float(ids[1], "x").is_some());
    }

    #[test]
    fn test_release_element_cancels_empty_timelines() {
        let (mut store, ids) = store_with(2);
        let mut seq = Sequencer::with_seed(1);

        let only_first = seq
            .schedule_step(AnimationStep::new([ids[0]]).property("x", 1.0).repeat_infinite())
            .unwrap();
        let both = seq
            .schedule_step(AnimationStep::new(ids.clone()).property("x", 1.0).repeat_infinite())
            .unwrap();
        seq.tween_to(ids[0], "y", 5.0, 1.0, Easing::Linear);
        seq.tick(0.1, &mut store);
        seq.drain_events();

        seq.release_element(ids[0]);
        store.remove(ids[0]);

        assert!(!seq.is_active(only_first));
        assert!(seq.is_active(both));
        assert_eq!(seq.tween_count(), 0);
        assert_eq!(seq.drain_events(), vec![SequencerEvent::Cancelled(only_first)]);
    }

    #[test]
    fn test_empty_step_is_noop() {
        let (mut store, _) = store_with(0);
        let mut seq = Sequencer::with_seed(1);

        let handle = seq
            .schedule_step(AnimationStep::new(Vec::new()).property("x", 1.0).duration(0.5))
            .unwrap();
        seq.tick(0.25, &mut store);
        assert!(seq.is_active(handle));
        seq.tick(0.5, &mut store);
        assert!(!seq.is_active(handle));
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let (mut store, ids) = store_with(1);
        let mut seq = Sequencer::with_seed(1);

        let handle = seq
            .schedule_step(AnimationStep::new([ids[0]]).property("x", 1.0).duration(1.0))
            .unwrap();
        seq.tick(-5.0, &mut store);
        assert_eq!(seq.elapsed(handle), Some(0.0));
    }
}

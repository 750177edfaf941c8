//! Fluent builder for a single CSS transition.
//!
//! An [`Animation`] accumulates style properties and transform functions for
//! one element and commits them together with [`Animation::end`]. The commit
//! protocol is:
//!
//! 1. emit `start` (deferred `add`/`sub` and containment run here and may
//!    still rewrite pending properties)
//! 2. store the composed transform under every vendor prefix, if any
//! 3. store the vendor `transition-properties` declaration
//! 4. push every pending declaration to the element through the [`Host`]
//! 5. schedule `end` after the configured duration
//!
//! `Animation` is a cheap handle: clones share the same state, which lets
//! listeners and chained animations refer back to it.
//!
//! # Usage
//!
//! ```
//! use std::rc::Rc;
//! use glide_core::{Animator, HeadlessHost, VirtualScheduler};
//!
//! let host = Rc::new(HeadlessHost::new());
//! let node = host.add_element("box");
//! let scheduler = Rc::new(VirtualScheduler::new());
//! let animator = Animator::new(host.clone(), scheduler.clone());
//!
//! animator
//!     .animate("#box")
//!     .set("left", 200)
//!     .rotate(45.0)
//!     .duration("1.5")
//!     .end();
//!
//! assert_eq!(host.style_of(node, "left").as_deref(), Some("200px"));
//! scheduler.advance(1500.0);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::animator::Defaults;
use crate::completion::Completion;
use crate::containment::{AxisMetrics, ContainmentPolicy, Edge, EdgeConstraint};
use crate::easing::EasingFunction;
use crate::error::Result;
use crate::events::{EventBus, LifecycleEvent, Listener};
use crate::host::{Host, Measured, Rect, Target};
use crate::properties::{PropertySet, StyleValue, TransitionProperties, leading_int};
use crate::scheduler::{Scheduler, TaskId};
use crate::timing::TimeValue;
use crate::transform::{TransformFunction, TransformStack};

/// Where an animation is in its commit protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Collecting properties and transforms.
    #[default]
    Configuring,
    /// Declarations applied; waiting for the duration to elapse.
    Committed,
    /// `end` has been emitted.
    Complete,
}

struct State<E> {
    element: Option<E>,
    properties: PropertySet,
    transitions: TransitionProperties,
    transforms: TransformStack,
    duration_ms: f64,
    containment: Option<ContainmentPolicy>,
    containment_hooked: bool,
    phase: Phase,
    commits: u64,
    /// Completion timers not yet fired, by commit number. The id is `None`
    /// while the scheduler call that creates it is still running.
    timers: Vec<(u64, Option<TaskId>)>,
}

pub(crate) struct Inner<H: Host> {
    state: RefCell<State<H::Element>>,
    events: RefCell<EventBus<Animation<H>>>,
    parent: Option<Weak<Inner<H>>>,
    host: Rc<H>,
    scheduler: Rc<dyn Scheduler>,
    defaults: Rc<Defaults>,
}

/// Handle to one animation on one element.
pub struct Animation<H: Host> {
    inner: Rc<Inner<H>>,
}

impl<H: Host> Clone for Animation<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Handles compare by identity.
impl<H: Host> PartialEq for Animation<H> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<H: Host> fmt::Debug for Animation<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Animation")
            .field("element", &state.element)
            .field("phase", &state.phase)
            .field("properties", &state.properties.len())
            .field("transforms", &state.transforms.len())
            .field("duration_ms", &state.duration_ms)
            .field("has_parent", &self.inner.parent.is_some())
            .finish()
    }
}

impl<H: Host + 'static> Animation<H> {
    pub(crate) fn create(
        host: Rc<H>,
        scheduler: Rc<dyn Scheduler>,
        defaults: Rc<Defaults>,
        element: Option<H::Element>,
        parent: Option<Weak<Inner<H>>>,
    ) -> Self {
        let animation = Self {
            inner: Rc::new(Inner {
                state: RefCell::new(State {
                    element,
                    properties: PropertySet::new(),
                    transitions: TransitionProperties::new(),
                    transforms: TransformStack::new(),
                    duration_ms: defaults.duration_ms,
                    containment: None,
                    containment_hooked: false,
                    phase: Phase::Configuring,
                    commits: 0,
                    timers: Vec::new(),
                }),
                events: RefCell::new(EventBus::new()),
                parent,
                host,
                scheduler,
                defaults,
            }),
        };
        animation.duration(animation.inner.defaults.duration_ms);
        if let Some(easing) = animation.inner.defaults.easing.clone() {
            animation.ease(&easing);
        }
        animation
    }

    // ----- transforms -----

    /// Append a transform function to the stack.
    pub fn transform(&self, function: impl Into<TransformFunction>) -> &Self {
        self.inner.state.borrow_mut().transforms.push(function);
        self
    }

    /// Skew by `x` and `y` degrees (`y` defaults to 0).
    pub fn skew(&self, x: f64, y: impl Into<Option<f64>>) -> &Self {
        self.transform(TransformFunction::Skew(x, y.into().unwrap_or(0.0)))
    }

    pub fn skew_x(&self, n: f64) -> &Self {
        self.transform(TransformFunction::SkewX(n))
    }

    pub fn skew_y(&self, n: f64) -> &Self {
        self.transform(TransformFunction::SkewY(n))
    }

    /// Translate by `x` and `y` pixels (`y` defaults to 0).
    pub fn translate(&self, x: f64, y: impl Into<Option<f64>>) -> &Self {
        self.transform(TransformFunction::Translate(x, y.into().unwrap_or(0.0)))
    }

    /// Alias of [`translate`](Self::translate).
    pub fn to(&self, x: f64, y: impl Into<Option<f64>>) -> &Self {
        self.translate(x, y)
    }

    pub fn translate_x(&self, n: f64) -> &Self {
        self.transform(TransformFunction::TranslateX(n))
    }

    /// Alias of [`translate_x`](Self::translate_x).
    pub fn x(&self, n: f64) -> &Self {
        self.translate_x(n)
    }

    pub fn translate_y(&self, n: f64) -> &Self {
        self.transform(TransformFunction::TranslateY(n))
    }

    /// Alias of [`translate_y`](Self::translate_y).
    pub fn y(&self, n: f64) -> &Self {
        self.translate_y(n)
    }

    /// Scale by `x` and `y` (`y` defaults to `x`).
    pub fn scale(&self, x: f64, y: impl Into<Option<f64>>) -> &Self {
        self.transform(TransformFunction::Scale(x, y.into().unwrap_or(x)))
    }

    pub fn scale_x(&self, n: f64) -> &Self {
        self.transform(TransformFunction::ScaleX(n))
    }

    pub fn scale_y(&self, n: f64) -> &Self {
        self.transform(TransformFunction::ScaleY(n))
    }

    /// Rotate by `n` degrees.
    pub fn rotate(&self, n: f64) -> &Self {
        self.transform(TransformFunction::Rotate(n))
    }

    // ----- timing -----

    /// Set the timing function by alias (`in`, `out`, `in-out`, `snap`),
    /// configured alias, or CSS value. An empty name means `ease`.
    pub fn ease(&self, name: &str) -> &Self {
        let css = match self.inner.defaults.aliases.get(name) {
            Some(css) => css.clone(),
            None => EasingFunction::from_name(name).to_string(),
        };
        self.set_vendor_property("transition-timing-function", &css)
    }

    /// Set the timing function from a typed [`EasingFunction`].
    pub fn easing(&self, easing: &EasingFunction) -> &Self {
        self.set_vendor_property("transition-timing-function", &easing.to_string())
    }

    /// Set the duration: numbers are milliseconds, strings are seconds.
    ///
    /// The duration is also how long the completion timer waits after a commit.
    /// Unparsable strings are logged and ignored.
    pub fn duration(&self, time: impl Into<TimeValue>) -> &Self {
        let time = time.into();
        match time.to_millis() {
            Ok(ms) => {
                self.inner.state.borrow_mut().duration_ms = ms;
                self.set_vendor_property("transition-duration", &format!("{ms}ms"))
            }
            Err(error) => {
                warn!(%error, "ignoring duration");
                self
            }
        }
    }

    /// Delay the transition: numbers are milliseconds, strings are seconds.
    pub fn delay(&self, time: impl Into<TimeValue>) -> &Self {
        let time = time.into();
        match time.to_millis() {
            Ok(ms) => self.set_vendor_property("transition-delay", &format!("{ms}ms")),
            Err(error) => {
                warn!(%error, "ignoring delay");
                self
            }
        }
    }

    // ----- properties -----

    /// Store `value` under `name` without marking it as a transition property.
    pub fn set_property(&self, name: &str, value: &str) -> &Self {
        self.inner.state.borrow_mut().properties.insert(name, value);
        self
    }

    /// Store `value` under every vendor-prefixed form of `name`.
    pub fn set_vendor_property(&self, name: &str, value: &str) -> &Self {
        self.inner
            .state
            .borrow_mut()
            .properties
            .insert_vendor(name, value);
        self
    }

    /// Set an animated property. Numbers get the property's unit (`px` for
    /// positions, sizes, margins and paddings); text is stored as given.
    pub fn set(&self, name: &str, value: impl Into<StyleValue>) -> &Self {
        let value = value.into();
        let mut state = self.inner.state.borrow_mut();
        state.transitions.register(name);
        state.properties.insert(name, value.for_property(name));
        drop(state);
        self
    }

    /// Increase `name` by `by` pixels relative to its computed value at commit time.
    pub fn add(&self, name: &str, by: f64) -> &Self {
        self.offset(name, by)
    }

    /// Decrease `name` by `by` pixels relative to its computed value at commit time.
    pub fn sub(&self, name: &str, by: f64) -> &Self {
        self.offset(name, -by)
    }

    fn offset(&self, name: &str, delta: f64) -> &Self {
        let name = name.to_string();
        self.on(LifecycleEvent::Start, move |animation| {
            let current = animation.current(&name);
            match leading_int(&current) {
                Some(value) => {
                    animation.set(&name, format!("{}px", value as f64 + delta));
                }
                None => warn!(property = %name, %current, "computed value is not numeric"),
            }
        })
    }

    /// Computed value of `name` on the element, read from the host.
    pub fn current(&self, name: &str) -> String {
        let element = self.inner.state.borrow().element.clone();
        match element {
            Some(element) => self.inner.host.computed_style(&element, name),
            None => String::new(),
        }
    }

    // ----- element -----

    /// Replace the element. Pending properties, transforms and containment are kept.
    pub fn select(&self, target: impl Into<Target<H::Element>>) -> &Self {
        let element = self.inner.host.select(target.into());
        if element.is_none() {
            warn!("selection matched no element");
        }
        self.inner.state.borrow_mut().element = element;
        self
    }

    /// Alias of [`select`](Self::select).
    pub fn move_to(&self, target: impl Into<Target<H::Element>>) -> &Self {
        self.select(target)
    }

    // ----- containment -----

    /// Keep the element's top-left corner inside the box of `selector`.
    ///
    /// The container is resolved and measured once, now. If nothing matches,
    /// no constraint is added.
    pub fn contain(&self, selector: &str) -> &Self {
        let host = &self.inner.host;
        match host.resolve(selector).and_then(|el| host.bounds(&el)) {
            Some(rect) => self.contain_rect(rect),
            None => {
                warn!(selector, "containment target not found");
                self
            }
        }
    }

    /// Keep the element's top-left corner inside `rect`.
    pub fn contain_rect(&self, rect: Rect) -> &Self {
        self.contain_policy(&ContainmentPolicy::within(rect))
    }

    /// Add per-edge constraints; edges set in `policy` replace existing ones.
    pub fn contain_policy(&self, policy: &ContainmentPolicy) -> &Self {
        self.inner
            .state
            .borrow_mut()
            .containment
            .get_or_insert_with(ContainmentPolicy::new)
            .merge(policy);
        self.hook_containment();
        self
    }

    /// Add per-edge constraints in their text form, e.g. `(Edge::Top, "+100-300")`.
    pub fn contain_edges(&self, edges: &[(Edge, &str)]) -> Result<&Self> {
        let mut policy = ContainmentPolicy::new();
        for (edge, text) in edges {
            policy.set(*edge, text.parse::<EdgeConstraint>()?);
        }
        Ok(self.contain_policy(&policy))
    }

    fn hook_containment(&self) {
        let mut state = self.inner.state.borrow_mut();
        if state.containment_hooked {
            return;
        }
        state.containment_hooked = true;
        drop(state);
        self.on(LifecycleEvent::Start, |animation| animation.apply_containment());
    }

    fn apply_containment(&self) {
        let host = &self.inner.host;
        let mut state = self.inner.state.borrow_mut();
        let State {
            element,
            properties,
            transitions,
            containment,
            ..
        } = &mut *state;
        let Some(policy) = containment.as_ref() else {
            return;
        };

        let metrics = |edge: Edge| {
            let document = host.measure(Measured::Document);
            let size = element
                .as_ref()
                .map(|el| host.measure(Measured::Element(el)))
                .unwrap_or_default();
            AxisMetrics {
                container: edge.extent(document),
                element: edge.extent(size),
            }
        };
        for clamp in policy.apply(properties, metrics) {
            transitions.register(clamp.edge.name());
        }
    }

    // ----- events and chaining -----

    /// Listen for a lifecycle event.
    pub fn on(&self, event: LifecycleEvent, listener: impl FnMut(&Self) + 'static) -> &Self {
        self.inner.events.borrow_mut().on(event, listener);
        self
    }

    fn emit(&self, event: LifecycleEvent) {
        let mut listeners = self.inner.events.borrow_mut().detach(event);
        for listener in listeners.iter_mut() {
            listener(self);
        }
        self.inner.events.borrow_mut().restore(event, listeners);
    }

    /// Commit `next` once this animation ends.
    pub fn then_animation(&self, next: &Self) -> &Self {
        let next = next.clone();
        self.on(LifecycleEvent::End, move |_| {
            next.end();
        })
    }

    /// Call `callback` once this animation ends.
    pub fn then_call(&self, callback: impl FnMut(&Self) + 'static) -> &Self {
        self.on(LifecycleEvent::End, callback)
    }

    /// Start a follow-up animation on the same element.
    ///
    /// The new animation inherits a copy of the current transforms, commits
    /// when this one ends, and returns here through [`pop`](Self::pop).
    pub fn then(&self) -> Self {
        let (element, transforms) = {
            let state = self.inner.state.borrow();
            (state.element.clone(), state.transforms.clone())
        };
        let next = Self::create(
            self.inner.host.clone(),
            self.inner.scheduler.clone(),
            self.inner.defaults.clone(),
            element,
            Some(Rc::downgrade(&self.inner)),
        );
        next.inner.state.borrow_mut().transforms = transforms;
        self.then_animation(&next);
        next
    }

    /// The animation that created this one with [`then`](Self::then).
    ///
    /// The back-reference is weak: it only resolves while some caller still
    /// holds a handle to the parent. A parent dropped right after `then()`
    /// (e.g. `animator.animate("#a").then()`) yields `None`.
    pub fn pop(&self) -> Option<Self> {
        self.inner
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Self { inner })
    }

    // ----- commit -----

    /// Commit all pending state to the element and start the transition.
    ///
    /// Calling `end` again re-runs the whole protocol with the current state.
    ///
    /// `start` listeners are detached while they run, so an `end` called from
    /// inside a `start` listener commits without running them: containment
    /// and `add`/`sub` are skipped for that nested commit.
    pub fn end(&self) -> &Self {
        self.commit(None);
        self
    }

    /// Like [`end`](Self::end), also calling `callback` when the transition ends.
    ///
    /// The callback is registered before the completion timer is scheduled.
    pub fn end_with(&self, callback: impl FnMut(&Self) + 'static) -> &Self {
        self.commit(Some(Box::new(callback)));
        self
    }

    fn commit(&self, callback: Option<Listener<Self>>) {
        self.emit(LifecycleEvent::Start);

        let (element, declarations, duration_ms, commit) = {
            let mut state = self.inner.state.borrow_mut();
            if !state.transforms.is_empty() {
                let transform = state.transforms.declaration();
                state.properties.insert_vendor("transform", &transform);
            }
            let transitions = state.transitions.declaration();
            state
                .properties
                .insert_vendor("transition-properties", &transitions);
            state.phase = Phase::Committed;
            state.commits += 1;
            (
                state.element.clone(),
                state.properties.clone(),
                state.duration_ms,
                state.commits,
            )
        };

        debug!(
            element = ?element,
            properties = declarations.len(),
            duration_ms,
            "commit"
        );
        match &element {
            Some(element) => {
                for (name, value) in declarations.iter() {
                    self.inner.host.set_style(element, name, value, "");
                }
            }
            None => warn!("commit without an element; declarations not applied"),
        }

        if let Some(callback) = callback {
            self.then_call(callback);
        }

        self.inner.state.borrow_mut().timers.push((commit, None));
        let this = self.clone();
        let task = self.inner.scheduler.schedule(
            duration_ms,
            Box::new(move || this.complete(commit)),
        );
        // A scheduler may run the task before returning; its entry is gone then.
        let mut state = self.inner.state.borrow_mut();
        if let Some((_, slot)) = state.timers.iter_mut().find(|(c, _)| *c == commit) {
            *slot = Some(task);
        }
    }

    fn complete(&self, commit: u64) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.timers.retain(|(c, _)| *c != commit);
            if state.timers.is_empty() {
                state.phase = Phase::Complete;
            }
        }
        self.emit(LifecycleEvent::End);
    }

    /// Cancel every pending completion timer. Returns whether any was pending.
    ///
    /// A cancelled commit never emits `end`, so chained animations do not start.
    pub fn cancel(&self) -> bool {
        let timers = std::mem::take(&mut self.inner.state.borrow_mut().timers);
        let mut cancelled = false;
        for task in timers.into_iter().filter_map(|(_, task)| task) {
            cancelled |= self.inner.scheduler.cancel(task);
        }
        cancelled
    }

    /// A future resolved by the next `end` emission.
    pub fn finished(&self) -> Completion {
        let (mut resolver, completion) = Completion::channel();
        self.on(LifecycleEvent::End, move |_| resolver.resolve());
        completion
    }

    // ----- inspection -----

    pub fn phase(&self) -> Phase {
        self.inner.state.borrow().phase
    }

    pub fn element(&self) -> Option<H::Element> {
        self.inner.state.borrow().element.clone()
    }

    /// Pending value of `name`.
    pub fn property(&self, name: &str) -> Option<String> {
        self.inner
            .state
            .borrow()
            .properties
            .get(name)
            .map(str::to_string)
    }

    pub fn properties(&self) -> PropertySet {
        self.inner.state.borrow().properties.clone()
    }

    pub fn transition_properties(&self) -> Vec<String> {
        self.inner.state.borrow().transitions.names().to_vec()
    }

    pub fn transforms(&self) -> TransformStack {
        self.inner.state.borrow().transforms.clone()
    }

    pub fn duration_ms(&self) -> f64 {
        self.inner.state.borrow().duration_ms
    }

    pub fn containment(&self) -> Option<ContainmentPolicy> {
        self.inner.state.borrow().containment.clone()
    }

    pub fn host(&self) -> &Rc<H> {
        &self.inner.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::Animator;
    use crate::headless::{HeadlessHost, NodeId};
    use crate::host::Size;
    use crate::scheduler::VirtualScheduler;
    use std::cell::Cell;

    struct Fixture {
        host: Rc<HeadlessHost>,
        scheduler: Rc<VirtualScheduler>,
        animator: Animator<HeadlessHost>,
        node: NodeId,
    }

    fn fixture() -> Fixture {
        let host = Rc::new(HeadlessHost::with_document(Size::new(1000.0, 800.0)));
        let node = host.add_element("box");
        host.set_size(node, Size::new(100.0, 50.0));
        let scheduler = Rc::new(VirtualScheduler::new());
        let animator = Animator::new(host.clone(), scheduler.clone());
        Fixture {
            host,
            scheduler,
            animator,
            node,
        }
    }

    #[test]
    fn test_new_animation_defaults() {
        let f = fixture();
        let anim = f.animator.animate("#box");

        assert_eq!(anim.phase(), Phase::Configuring);
        assert_eq!(anim.element(), Some(f.node));
        assert_eq!(anim.duration_ms(), 500.0);
        assert_eq!(
            anim.property("-webkit-transition-duration").as_deref(),
            Some("500ms")
        );
        assert!(anim.transition_properties().is_empty());
    }

    #[test]
    fn test_set_infers_units_and_registers_transition() {
        let f = fixture();
        let anim = f.animator.animate("#box");
        anim.set("width", 100).set("opacity", 0.5).set("width", "50%");

        assert_eq!(anim.property("width").as_deref(), Some("50%"));
        assert_eq!(anim.property("opacity").as_deref(), Some("0.5"));
        assert_eq!(anim.transition_properties(), ["width", "opacity"]);
    }

    #[test]
    fn test_control_properties_stay_out_of_transition_list() {
        let f = fixture();
        let anim = f.animator.animate("#box");
        anim.ease("in").delay(200).set_property("z-index", "3");

        assert_eq!(
            anim.property("-moz-transition-timing-function").as_deref(),
            Some("ease-in")
        );
        assert_eq!(anim.property("-o-transition-delay").as_deref(), Some("200ms"));
        assert!(anim.transition_properties().is_empty());
    }

    #[test]
    fn test_duration_parsing() {
        let f = fixture();
        let anim = f.animator.animate("#box");

        anim.duration("1.5");
        assert_eq!(anim.duration_ms(), 1500.0);
        anim.duration(1500);
        assert_eq!(anim.duration_ms(), 1500.0);
        anim.duration("soon");
        assert_eq!(anim.duration_ms(), 1500.0);
        assert_eq!(
            anim.property("-ms-transition-duration").as_deref(),
            Some("1500ms")
        );
    }

    #[test]
    fn test_transform_helpers() {
        let f = fixture();
        let anim = f.animator.animate("#box");
        anim.rotate(10.0)
            .scale(2.0, None)
            .skew(5.0, None)
            .to(1.0, 2.0)
            .x(3.0)
            .y(4.0)
            .scale_x(0.5)
            .scale_y(1.5)
            .skew_x(1.0)
            .skew_y(2.0);

        assert_eq!(
            anim.transforms().declaration(),
            "rotate(10deg) scale(2, 2) skew(5deg, 0deg) translate(1px, 2px) \
             translateX(3px) translateY(4px) scaleX(0.5) scaleY(1.5) skewX(1deg) skewY(2deg)"
        );
    }

    #[test]
    fn test_commit_applies_declarations() {
        let f = fixture();
        let anim = f.animator.animate("#box");
        anim.set("left", 200).rotate(10.0).scale(2.0, None).end();

        assert_eq!(anim.phase(), Phase::Committed);
        assert_eq!(f.host.style_of(f.node, "left").as_deref(), Some("200px"));
        assert_eq!(
            f.host.style_of(f.node, "-webkit-transform").as_deref(),
            Some("rotate(10deg) scale(2, 2)")
        );
        assert_eq!(
            f.host.style_of(f.node, "-o-transition-properties").as_deref(),
            Some("left")
        );
        assert!(f.host.applied().iter().all(|w| w.priority.is_empty()));
    }

    #[test]
    fn test_commit_without_transforms_or_properties() {
        let f = fixture();
        let anim = f.animator.animate("#box");
        anim.end();

        assert_eq!(anim.property("-webkit-transform"), None);
        assert_eq!(
            f.host.style_of(f.node, "-webkit-transition-properties").as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_end_fires_after_duration() {
        let f = fixture();
        let anim = f.animator.animate("#box");
        let ended = Rc::new(Cell::new(0));
        let counter = ended.clone();

        anim.duration(300).end_with(move |_| counter.set(counter.get() + 1));

        f.scheduler.advance(299.0);
        assert_eq!(ended.get(), 0);
        assert_eq!(anim.phase(), Phase::Committed);

        f.scheduler.advance(1.0);
        assert_eq!(ended.get(), 1);
        assert_eq!(anim.phase(), Phase::Complete);
    }

    #[test]
    fn test_start_listeners_run_before_apply() {
        let f = fixture();
        let anim = f.animator.animate("#box");
        anim.on(LifecycleEvent::Start, |a| {
            a.set("top", 42);
        });
        anim.end();

        assert_eq!(f.host.style_of(f.node, "top").as_deref(), Some("42px"));
        assert_eq!(anim.transition_properties(), ["top"]);
    }

    #[test]
    fn test_add_and_sub_read_computed_style() {
        let f = fixture();
        f.host.set_computed(f.node, "left", "100px");
        f.host.set_computed(f.node, "top", "40px");

        let anim = f.animator.animate("#box");
        anim.add("left", 25.0).sub("top", 15.0).end();

        assert_eq!(f.host.style_of(f.node, "left").as_deref(), Some("125px"));
        assert_eq!(f.host.style_of(f.node, "top").as_deref(), Some("25px"));
    }

    #[test]
    fn test_add_skips_non_numeric_current() {
        let f = fixture();
        f.host.set_computed(f.node, "left", "auto");

        let anim = f.animator.animate("#box");
        anim.add("left", 25.0).end();
        assert_eq!(anim.property("left"), None);
    }

    #[test]
    fn test_select_keeps_pending_state() {
        let f = fixture();
        let other = f.host.add_element("other");
        let anim = f.animator.animate("#box");
        anim.set("width", 10).rotate(5.0);

        anim.select("#other");
        assert_eq!(anim.element(), Some(other));
        assert_eq!(anim.property("width").as_deref(), Some("10px"));
        assert_eq!(anim.transforms().len(), 1);

        anim.move_to(Target::Element(f.node));
        assert_eq!(anim.element(), Some(f.node));
    }

    #[test]
    fn test_missing_element_still_completes() {
        let f = fixture();
        let anim = f.animator.animate("#nope");
        assert_eq!(anim.element(), None);
        assert_eq!(anim.current("left"), "");

        let mut done = anim.finished();
        anim.set("left", 5).end();
        assert!(f.host.applied().is_empty());

        f.scheduler.advance(500.0);
        assert!(done.is_done());
    }

    #[test]
    fn test_then_chains_and_pops() {
        let f = fixture();
        let first = f.animator.animate("#box");
        first.rotate(90.0);
        let second = first.then();
        second.set("left", 300);

        assert_eq!(second.pop(), Some(first.clone()));
        assert_eq!(first.pop(), None);
        assert_eq!(second.transforms().declaration(), "rotate(90deg)");
        assert_eq!(second.element(), Some(f.node));

        first.end();
        assert_eq!(second.phase(), Phase::Configuring);

        f.scheduler.advance(500.0);
        assert_eq!(first.phase(), Phase::Complete);
        assert_eq!(second.phase(), Phase::Committed);
        assert_eq!(f.host.style_of(f.node, "left").as_deref(), Some("300px"));

        f.scheduler.advance(500.0);
        assert_eq!(second.phase(), Phase::Complete);
    }

    #[test]
    fn test_then_snapshot_is_independent() {
        let f = fixture();
        let first = f.animator.animate("#box");
        first.rotate(90.0);
        let second = first.then();
        first.scale(2.0, None);

        assert_eq!(second.transforms().len(), 1);
        assert_eq!(first.transforms().len(), 2);
    }

    #[test]
    fn test_then_animation_and_callback() {
        let f = fixture();
        let first = f.animator.animate("#box");
        let other = f.animator.animate("#box");
        other.set("opacity", 0);
        let called = Rc::new(Cell::new(false));
        let flag = called.clone();

        first
            .then_animation(&other)
            .then_call(move |_| flag.set(true))
            .end();

        f.scheduler.advance(500.0);
        assert!(called.get());
        assert_eq!(other.phase(), Phase::Committed);
        assert_eq!(f.host.style_of(f.node, "opacity").as_deref(), Some("0"));
    }

    #[test]
    fn test_end_is_reentrant() {
        let f = fixture();
        let anim = f.animator.animate("#box");
        let ended = Rc::new(Cell::new(0));
        let counter = ended.clone();
        anim.on(LifecycleEvent::End, move |_| counter.set(counter.get() + 1));

        anim.set("left", 1).end();
        anim.set("left", 2).end();
        assert_eq!(f.host.style_of(f.node, "left").as_deref(), Some("2px"));

        f.scheduler.advance(500.0);
        assert_eq!(ended.get(), 2);
    }

    #[test]
    fn test_cancel_prevents_end() {
        let f = fixture();
        let anim = f.animator.animate("#box");
        let next = anim.then();
        anim.end();

        assert!(anim.cancel());
        assert!(!anim.cancel());
        f.scheduler.advance(1000.0);
        assert_eq!(anim.phase(), Phase::Committed);
        assert_eq!(next.phase(), Phase::Configuring);
    }

    #[test]
    fn test_containment_runs_on_start() {
        let f = fixture();
        let anim = f.animator.animate("#box");
        anim.set("top", 50)
            .contain_edges(&[(Edge::Top, "+100-300")])
            .unwrap()
            .end();

        assert_eq!(f.host.style_of(f.node, "top").as_deref(), Some("100px"));
    }

    #[test]
    fn test_contain_edges_rejects_bad_input() {
        let f = fixture();
        let anim = f.animator.animate("#box");
        assert!(anim.contain_edges(&[(Edge::Top, "100")]).is_err());
        assert_eq!(anim.containment(), None);
    }

    #[test]
    fn test_contain_selector_uses_container_box() {
        let f = fixture();
        let stage = f.host.add_element("stage");
        f.host
            .set_bounds(stage, Rect::new(10.0, 20.0, 410.0, 320.0));

        let anim = f.animator.animate("#box");
        anim.contain("#stage").set("left", 500).set("top", 0).end();

        assert_eq!(f.host.style_of(f.node, "left").as_deref(), Some("410px"));
        assert_eq!(f.host.style_of(f.node, "top").as_deref(), Some("20px"));
    }

    #[test]
    fn test_contain_unknown_selector_is_noop() {
        let f = fixture();
        let anim = f.animator.animate("#box");
        anim.contain("#ghost");
        assert_eq!(
            anim.inner.events.borrow().listener_count(LifecycleEvent::Start),
            0
        );
        anim.set("left", 5).end();

        assert_eq!(anim.containment(), None);
        assert_eq!(f.host.style_of(f.node, "left").as_deref(), Some("5px"));
    }

    #[test]
    fn test_converse_clamp_registers_transition() {
        let f = fixture();
        let anim = f.animator.animate("#box");
        anim.set_property("left", "600px")
            .contain_edges(&[(Edge::Right, "-200")])
            .unwrap()
            .end();

        // right = 1000 - 600 - 100 = 300 > 200
        assert_eq!(f.host.style_of(f.node, "left").as_deref(), Some("700px"));
        assert_eq!(f.host.style_of(f.node, "right"), None);
        assert_eq!(anim.transition_properties(), ["left"]);
    }

    /// Runs zero-delay tasks inline and drops everything else.
    #[derive(Default)]
    struct InlineScheduler {
        next: Cell<u64>,
    }

    impl Scheduler for InlineScheduler {
        fn schedule(&self, delay_ms: f64, task: crate::scheduler::Task) -> TaskId {
            let id = TaskId(self.next.get());
            self.next.set(id.0 + 1);
            if delay_ms <= 0.0 {
                task();
            }
            id
        }

        fn cancel(&self, _id: TaskId) -> bool {
            false
        }
    }

    #[test]
    fn test_end_with_callback_sees_inline_completion() {
        let host = Rc::new(HeadlessHost::new());
        host.add_element("box");
        let animator = Animator::new(host, Rc::new(InlineScheduler::default()));
        let hit = Rc::new(Cell::new(false));
        let flag = hit.clone();

        let anim = animator.animate("#box");
        anim.duration(0).end_with(move |_| flag.set(true));

        assert!(hit.get());
        assert_eq!(anim.phase(), Phase::Complete);
        assert!(!anim.cancel());
    }

    #[test]
    fn test_phase_waits_for_last_pending_commit() {
        let f = fixture();
        let anim = f.animator.animate("#box");
        anim.end();
        f.scheduler.advance(200.0);
        anim.end();

        f.scheduler.advance(300.0);
        assert_eq!(f.scheduler.pending(), 1);
        assert_eq!(anim.phase(), Phase::Committed);

        f.scheduler.advance(200.0);
        assert_eq!(anim.phase(), Phase::Complete);
    }

    #[test]
    fn test_pop_needs_a_live_parent() {
        let f = fixture();
        let orphan = f.animator.animate("#box").then();
        assert_eq!(orphan.pop(), None);

        let parent = f.animator.animate("#box");
        let child = parent.then();
        assert_eq!(child.pop(), Some(parent));
    }

    #[test]
    fn test_end_inside_start_skips_start_listeners() {
        let f = fixture();
        f.host.set_computed(f.node, "left", "10px");
        let anim = f.animator.animate("#box");
        let nested = Rc::new(Cell::new(false));
        let flag = nested.clone();
        anim.on(LifecycleEvent::Start, move |a| {
            if !flag.replace(true) {
                a.end();
            }
        });
        anim.add("left", 5.0);

        anim.end();

        let declared: Vec<String> = f
            .host
            .applied()
            .into_iter()
            .filter(|w| w.name == "-webkit-transition-properties")
            .map(|w| w.value)
            .collect();
        // the nested commit ran before `add` and without re-running it
        assert_eq!(declared, ["", "left"]);
        assert_eq!(f.host.style_of(f.node, "left").as_deref(), Some("15px"));
        assert_eq!(f.scheduler.pending(), 2);
    }
}

//! Entry point that creates animations bound to one host and scheduler.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use glide_config::{DEFAULT_DURATION_MS, GlideConfig};
use tracing::debug;

use crate::animation::Animation;
use crate::host::{Host, Target};
use crate::scheduler::Scheduler;

/// Settings applied to every animation an [`Animator`] creates.
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    /// Initial duration in milliseconds.
    pub duration_ms: f64,
    /// Initial timing function, passed through [`Animation::ease`].
    pub easing: Option<String>,
    /// Extra easing aliases, looked up before the built-in ones.
    pub aliases: BTreeMap<String, String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            easing: None,
            aliases: BTreeMap::new(),
        }
    }
}

impl From<&GlideConfig> for Defaults {
    fn from(config: &GlideConfig) -> Self {
        Self {
            duration_ms: config.timing.duration_ms,
            easing: config.timing.easing.clone(),
            aliases: config.easing.aliases.clone(),
        }
    }
}

/// Creates [`Animation`]s that share a host, a scheduler and defaults.
pub struct Animator<H: Host> {
    host: Rc<H>,
    scheduler: Rc<dyn Scheduler>,
    defaults: Rc<Defaults>,
}

impl<H: Host> Clone for Animator<H> {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            scheduler: self.scheduler.clone(),
            defaults: self.defaults.clone(),
        }
    }
}

impl<H: Host> fmt::Debug for Animator<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl<H: Host + 'static> Animator<H> {
    pub fn new(host: Rc<H>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self::with_defaults(host, scheduler, Defaults::default())
    }

    pub fn with_defaults(host: Rc<H>, scheduler: Rc<dyn Scheduler>, defaults: Defaults) -> Self {
        Self {
            host,
            scheduler,
            defaults: Rc::new(defaults),
        }
    }

    /// Animator using the timing and easing defaults of a loaded [`GlideConfig`].
    pub fn from_config(host: Rc<H>, scheduler: Rc<dyn Scheduler>, config: &GlideConfig) -> Self {
        Self::with_defaults(host, scheduler, Defaults::from(config))
    }

    /// Start a new animation on `target`.
    ///
    /// A selector that matches nothing still yields an animation; it can be
    /// given an element later with [`Animation::select`].
    pub fn animate(&self, target: impl Into<Target<H::Element>>) -> Animation<H> {
        let element = self.host.select(target.into());
        debug!(element = ?element, "new animation");
        Animation::create(
            self.host.clone(),
            self.scheduler.clone(),
            self.defaults.clone(),
            element,
            None,
        )
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }
}

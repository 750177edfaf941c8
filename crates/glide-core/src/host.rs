//! Boundary to the rendering host.
//!
//! Everything that touches a live element goes through [`Host`]: element
//! lookup, computed-style reads, style writes and measurement. The host is
//! chosen once by whoever builds the [`Animator`](crate::Animator), so there is
//! no runtime feature detection inside the builder.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned box in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Box with its top-left corner at (`left`, `top`) and the given size.
    pub fn from_origin_size(left: f64, top: f64, size: Size) -> Self {
        Self::new(left, top, left + size.width, top + size.height)
    }
}

/// What to measure: one element or the whole document.
#[derive(Debug, Clone, Copy)]
pub enum Measured<'a, E> {
    Element(&'a E),
    Document,
}

/// An element given either directly or by selector.
#[derive(Debug, Clone, PartialEq)]
pub enum Target<E> {
    /// Resolved through [`Host::resolve`].
    Selector(String),
    /// Used as is.
    Element(E),
}

impl<E> From<&str> for Target<E> {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl<E> From<String> for Target<E> {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

/// Platform services an animation needs from its rendering host.
pub trait Host {
    /// Opaque handle to a visual element.
    type Element: Clone + Debug;

    /// Resolve `selector` to a single element, if any matches.
    fn resolve(&self, selector: &str) -> Option<Self::Element>;

    /// Computed value of `property` on `element` (empty when unset).
    fn computed_style(&self, element: &Self::Element, property: &str) -> String;

    /// Apply a style declaration to `element`.
    fn set_style(&self, element: &Self::Element, name: &str, value: &str, priority: &str);

    /// Rendered size of an element or of the document.
    fn measure(&self, target: Measured<'_, Self::Element>) -> Size;

    /// Page-relative box of `element`, if it is laid out.
    fn bounds(&self, element: &Self::Element) -> Option<Rect>;

    /// Resolve a [`Target`] into an element handle.
    fn select(&self, target: Target<Self::Element>) -> Option<Self::Element> {
        match target {
            Target::Selector(selector) => self.resolve(&selector),
            Target::Element(element) => Some(element),
        }
    }
}

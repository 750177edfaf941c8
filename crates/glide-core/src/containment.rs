//! Positional containment for pending moves.
//!
//! A [`ContainmentPolicy`] holds up to one [`EdgeConstraint`] per edge. Each
//! constraint is one or two `(operator, bound)` pairs: [`Operator::AtLeast`]
//! (written `+`) requires the edge value to be `>=` the bound and
//! [`Operator::AtMost`] (written `-`) requires `<=`. The compact text form
//! `"+100-300"` reads "at least 100 and at most 300".
//!
//! Evaluation runs against the pending [`PropertySet`] at the start of a
//! commit. When the pending move sets the constrained edge itself, values are
//! compared directly. When it sets the converse edge instead (constraint on
//! `right`, move sets `left`), the pending value is converted into the
//! constrained edge's frame with
//!
//! ```text
//! translated = container - converse_value - element
//! ```
//!
//! where `container` is the document size and `element` the element's own
//! size along that axis. A violated bound is converted back with the same
//! formula and written to the converse property, so the clamp always lands on
//! the property the move actually set.
//!
//! Bounds parsed from the text form must be non-negative: it uses `-` both as
//! an operator and as a sign, so `"+-50"` is rejected rather than guessed at.
//! Negative bounds built in code (a container scrolled past the origin) are
//! kept, and serialize in structured form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GlideError, Result};
use crate::host::{Rect, Size};
use crate::properties::{PropertySet, leading_int};

/// One edge of an element's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// Evaluation order.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// CSS property name of this edge.
    pub fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }

    /// The opposite edge on the same axis.
    pub fn converse(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Extent of `size` along this edge's axis (height for top/bottom).
    pub fn extent(self, size: Size) -> f64 {
        if self.is_vertical() {
            size.height
        } else {
            size.width
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison applied by a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// `+`: value must be `>=` the bound.
    AtLeast,
    /// `-`: value must be `<=` the bound.
    AtMost,
}

impl Operator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::AtLeast),
            '-' => Some(Self::AtMost),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::AtLeast => '+',
            Self::AtMost => '-',
        }
    }

    /// Whether `value` breaks this operator against `bound`.
    pub fn violated_by(self, value: f64, bound: f64) -> bool {
        match self {
            Self::AtLeast => value < bound,
            Self::AtMost => value > bound,
        }
    }
}

/// A single `(operator, bound)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub operator: Operator,
    pub value: f64,
}

impl Bound {
    pub fn at_least(value: f64) -> Self {
        Self {
            operator: Operator::AtLeast,
            value,
        }
    }

    pub fn at_most(value: f64) -> Self {
        Self {
            operator: Operator::AtMost,
            value,
        }
    }
}

/// One or two bounds on an edge, evaluated independently in order.
///
/// Serialized as its fields so any bound round-trips, negative ones
/// included. Deserializing also accepts the text form (`"+100-300"`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConstraintRepr")]
pub struct EdgeConstraint {
    pub primary: Bound,
    pub secondary: Option<Bound>,
}

impl EdgeConstraint {
    pub fn single(bound: Bound) -> Self {
        Self {
            primary: bound,
            secondary: None,
        }
    }

    /// `low <= value <= high`.
    pub fn range(low: f64, high: f64) -> Self {
        Self {
            primary: Bound::at_least(low),
            secondary: Some(Bound::at_most(high)),
        }
    }

    pub fn bounds(&self) -> impl Iterator<Item = Bound> {
        std::iter::once(self.primary).chain(self.secondary)
    }
}

impl FromStr for EdgeConstraint {
    type Err = GlideError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason| GlideError::InvalidConstraint {
            input: s.to_string(),
            reason,
        };
        let parse_bound = |text: &str| -> Result<f64> {
            let text = text.trim();
            if text.is_empty() || text.starts_with(['+', '-']) {
                return Err(invalid("negative or missing bound"));
            }
            text.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid("bound is not a number"))
        };

        let s_trimmed = s.trim();
        let mut chars = s_trimmed.chars();
        let operator = chars
            .next()
            .and_then(Operator::from_char)
            .ok_or_else(|| invalid("must start with `+` or `-`"))?;
        let rest = chars.as_str();

        let Some(split) = rest.find(['+', '-']) else {
            return Ok(Self::single(Bound {
                operator,
                value: parse_bound(rest)?,
            }));
        };

        let first = parse_bound(&rest[..split])?;
        let second_operator = rest[split..]
            .chars()
            .next()
            .and_then(Operator::from_char)
            .ok_or_else(|| invalid("must start with `+` or `-`"))?;
        let second = parse_bound(&rest[split + 1..])?;

        Ok(Self {
            primary: Bound {
                operator,
                value: first,
            },
            secondary: Some(Bound {
                operator: second_operator,
                value: second,
            }),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConstraintRepr {
    Text(String),
    Fields {
        primary: Bound,
        #[serde(default)]
        secondary: Option<Bound>,
    },
}

impl TryFrom<ConstraintRepr> for EdgeConstraint {
    type Error = GlideError;

    fn try_from(repr: ConstraintRepr) -> Result<Self> {
        match repr {
            ConstraintRepr::Text(s) => s.parse(),
            ConstraintRepr::Fields { primary, secondary } => Ok(Self { primary, secondary }),
        }
    }
}

impl fmt::Display for EdgeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bound in self.bounds() {
            write!(f, "{}{}", bound.operator.symbol(), bound.value)?;
        }
        Ok(())
    }
}

/// Sizes along one axis used to convert between converse edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMetrics {
    /// Document extent along the axis.
    pub container: f64,
    /// Element extent along the axis.
    pub element: f64,
}

/// A pending property rewritten by containment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamp {
    pub edge: Edge,
    pub value: f64,
}

/// Per-edge constraints owned by one animation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainmentPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<EdgeConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<EdgeConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<EdgeConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<EdgeConstraint>,
}

impl ContainmentPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the element's top-left corner inside `rect`.
    pub fn within(rect: Rect) -> Self {
        let mut policy = Self::new();
        policy.set(Edge::Left, EdgeConstraint::range(rect.left, rect.right));
        policy.set(Edge::Top, EdgeConstraint::range(rect.top, rect.bottom));
        policy
    }

    fn slot(&mut self, edge: Edge) -> &mut Option<EdgeConstraint> {
        match edge {
            Edge::Top => &mut self.top,
            Edge::Right => &mut self.right,
            Edge::Bottom => &mut self.bottom,
            Edge::Left => &mut self.left,
        }
    }

    /// Set or replace the constraint on `edge`.
    pub fn set(&mut self, edge: Edge, constraint: EdgeConstraint) -> &mut Self {
        *self.slot(edge) = Some(constraint);
        self
    }

    pub fn get(&self, edge: Edge) -> Option<&EdgeConstraint> {
        match edge {
            Edge::Top => self.top.as_ref(),
            Edge::Right => self.right.as_ref(),
            Edge::Bottom => self.bottom.as_ref(),
            Edge::Left => self.left.as_ref(),
        }
    }

    /// Fold another policy in; its edges replace ours.
    pub fn merge(&mut self, other: &ContainmentPolicy) {
        for (edge, constraint) in other.iter() {
            self.set(edge, *constraint);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Edge, &EdgeConstraint)> + '_ {
        Edge::ALL
            .into_iter()
            .filter_map(|edge| self.get(edge).map(|c| (edge, c)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Clamp pending positions in `pending`, returning every rewrite in order.
    ///
    /// Only edges whose axis already has a pending `top`/`bottom` or
    /// `left`/`right` value are evaluated. Rewritten values are stored with a
    /// `px` suffix; callers register the returned edges as transition
    /// properties.
    pub fn apply(
        &self,
        pending: &mut PropertySet,
        metrics: impl Fn(Edge) -> AxisMetrics,
    ) -> Vec<Clamp> {
        let mut clamps = Vec::new();
        for (edge, constraint) in self.iter() {
            if !pending.contains(edge.name()) && !pending.contains(edge.converse().name()) {
                continue;
            }
            for bound in constraint.bounds() {
                if let Some(clamp) = clamp_edge(edge, bound, pending, &metrics) {
                    pending.insert(clamp.edge.name(), format!("{}px", clamp.value));
                    clamps.push(clamp);
                }
            }
        }
        clamps
    }
}

fn pending_px(pending: &PropertySet, edge: Edge) -> Option<f64> {
    let raw = pending.get(edge.name())?;
    let value = leading_int(raw);
    if value.is_none() {
        warn!(edge = edge.name(), raw, "pending position is not numeric; skipping containment");
    }
    value.map(|v| v as f64)
}

fn clamp_edge(
    edge: Edge,
    bound: Bound,
    pending: &PropertySet,
    metrics: &impl Fn(Edge) -> AxisMetrics,
) -> Option<Clamp> {
    if pending.contains(edge.name()) {
        let value = pending_px(pending, edge)?;
        if bound.operator.violated_by(value, bound.value) {
            debug!(edge = edge.name(), value, bound = bound.value, "containment clamp");
            return Some(Clamp {
                edge,
                value: bound.value,
            });
        }
        return None;
    }

    let converse = edge.converse();
    let converse_value = pending_px(pending, converse)?;
    let AxisMetrics { container, element } = metrics(edge);
    let translated = container - converse_value - element;
    let translated_bound = container - bound.value - element;
    debug!(
        from = converse.name(),
        to = edge.name(),
        converse_value,
        translated,
        container,
        element,
        "converting converse edge"
    );

    if bound.operator.violated_by(translated, bound.value) {
        debug!(
            edge = converse.name(),
            value = translated_bound,
            "containment clamp via converse edge"
        );
        return Some(Clamp {
            edge: converse,
            value: translated_bound,
        });
    }
    None
}

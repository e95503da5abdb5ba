//! Numeric input fields
//!
//! Shapes and modifiers take their parameters from three fields adjusted with
//! the mouse wheel. A left click selects the coarse step, a right click the
//! fine one.

use glam::IVec2;

use crate::geometry::Rect;

/// Step selected by a left click
pub const COARSE_STEP: f64 = 1.0;

/// Step selected by a right click
pub const FINE_STEP: f64 = 0.01;

/// Number of fields carried by every shape and modifier
pub const FIELD_COUNT: usize = 3;

/// Which mouse button produced a click
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Left,
    Right,
}

/// A floating point value with a wheel adjustment step
#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    pub value: f64,
    pub delta: f64,
    pub enabled: bool,
    pub bounds: Rect,
}

impl InputField {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            delta: COARSE_STEP,
            enabled: true,
            bounds: Rect::ZERO,
        }
    }

    /// A field that neither renders nor accepts input
    pub fn disabled() -> Self {
        Self {
            value: 0.0,
            delta: COARSE_STEP,
            enabled: false,
            bounds: Rect::ZERO,
        }
    }

    /// Select the adjustment step for the given button.
    ///
    /// Returns `false` (and changes nothing) when the field is disabled.
    pub fn click(&mut self, button: Button) -> bool {
        if !self.enabled {
            return false;
        }
        self.delta = match button {
            Button::Left => COARSE_STEP,
            Button::Right => FINE_STEP,
        };
        true
    }

    /// Apply wheel ticks: `value += ticks * delta`. A result that is not
    /// finite leaves the value unchanged.
    pub fn scroll(&mut self, ticks: i32) {
        if !self.enabled {
            return;
        }
        let next = self.value + f64::from(ticks) * self.delta;
        if next.is_finite() {
            self.value = next;
        }
    }

    /// Canonical decimal text of the current value
    pub fn text(&self) -> String {
        format_number(self.value)
    }
}

/// Format a number the same way everywhere: shortest round-trip decimal,
/// `.` as separator, no grouping, `-0` folded into `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// The three fields of a shape or modifier, stacked along the bottom of its icon
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    fields: [InputField; FIELD_COUNT],
}

impl Params {
    pub fn new(fields: [InputField; FIELD_COUNT]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[InputField; FIELD_COUNT] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&InputField> {
        self.fields.get(index)
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut InputField> {
        self.fields.get_mut(index)
    }

    pub fn value(&self, index: usize) -> f64 {
        self.fields.get(index).map_or(0.0, |f| f.value)
    }

    /// Set a value directly (used when building programs without gestures).
    /// Values that are not finite are ignored.
    pub fn set_value(&mut self, index: usize, value: f64) {
        if !value.is_finite() {
            return;
        }
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value;
        }
    }

    /// Place the fields inside `owner`, last field flush with its bottom edge
    pub fn layout(&mut self, owner: Rect, field_height: i32) {
        let mut y = owner.bottom() - field_height * FIELD_COUNT as i32;
        for field in &mut self.fields {
            field.bounds = Rect::from_origin_size(
                IVec2::new(owner.left(), y),
                IVec2::new(owner.size.x, field_height),
            );
            y += field_height;
        }
    }

    /// Index of the enabled field under `p`
    pub fn field_at(&self, p: IVec2) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.enabled && f.bounds.contains(p))
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Per-side spacing for padding and margin arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl EdgeInsets {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Total spacing consumed along the horizontal axis.
    pub fn horizontal(self) -> f32 {
        self.left + self.right
    }

    /// Total spacing consumed along the vertical axis.
    pub fn vertical(self) -> f32 {
        self.top + self.bottom
    }
}

impl std::ops::Add for EdgeInsets {
    type Output = EdgeInsets;

    fn add(self, rhs: EdgeInsets) -> EdgeInsets {
        EdgeInsets::new(
            self.left + rhs.left,
            self.right + rhs.right,
            self.top + rhs.top,
            self.bottom + rhs.bottom,
        )
    }
}

/// A (min, max) interval per axis bounding a node's resolved size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoxConstraints {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl PartialEq for BoxConstraints {
    fn eq(&self, other: &Self) -> bool {
        const EPSILON: f32 = 0.01;
        (self.min_width - other.min_width).abs() < EPSILON
            && (self.max_width - other.max_width).abs() < EPSILON
            && (self.min_height - other.min_height).abs() < EPSILON
            && (self.max_height - other.max_height).abs() < EPSILON
    }
}

impl BoxConstraints {
    pub fn new(min_width: f32, max_width: f32, min_height: f32, max_height: f32) -> Self {
        Self {
            min_width,
            max_width,
            min_height,
            max_height,
        }
    }

    /// An interval admitting exactly one size.
    pub fn tight(size: Size) -> Self {
        Self {
            min_width: size.width,
            max_width: size.width,
            min_height: size.height,
            max_height: size.height,
        }
    }

    pub fn loose(size: Size) -> Self {
        Self {
            min_width: 0.0,
            max_width: size.width,
            min_height: 0.0,
            max_height: size.height,
        }
    }

    pub fn is_tight(self) -> bool {
        self.min_width >= self.max_width && self.min_height >= self.max_height
    }

    /// Narrows this interval so it fits inside `outer`: minima are raised,
    /// maxima are lowered. Used by the pre pass to reconcile a node's own
    /// interval with the one imposed by its parent.
    pub fn tighten(&mut self, outer: BoxConstraints) {
        self.min_width = self.min_width.max(outer.min_width);
        self.max_width = self.max_width.min(outer.max_width);
        self.min_height = self.min_height.max(outer.min_height);
        self.max_height = self.max_height.min(outer.max_height);
    }

    /// Drops the minima to zero, keeping the maxima. Wrapper kinds impose
    /// this on their child so intrinsic sizing wins inside a tight parent.
    pub fn loosen(self) -> BoxConstraints {
        BoxConstraints {
            min_width: 0.0,
            max_width: self.max_width,
            min_height: 0.0,
            max_height: self.max_height,
        }
    }

    /// The interval left for a child once `insets` are carved off every side.
    /// Bounds floor at zero, so insets wider than the interval collapse it
    /// instead of inverting it.
    pub fn shrink(self, insets: EdgeInsets) -> BoxConstraints {
        BoxConstraints {
            min_width: (self.min_width - insets.horizontal()).max(0.0),
            max_width: (self.max_width - insets.horizontal()).max(0.0),
            min_height: (self.min_height - insets.vertical()).max(0.0),
            max_height: (self.max_height - insets.vertical()).max(0.0),
        }
    }

    pub fn constrain(self, size: Size) -> Size {
        Size {
            width: size.width.clamp(self.min_width, self.max_width),
            height: size.height.clamp(self.min_height, self.max_height),
        }
    }

    pub fn constrain_width(self, width: f32) -> f32 {
        width.clamp(self.min_width, self.max_width)
    }

    pub fn constrain_height(self, height: f32) -> f32 {
        height.clamp(self.min_height, self.max_height)
    }

    /// True when `size` lies inside the interval on both axes.
    pub fn contains(self, size: Size) -> bool {
        size.width >= self.min_width
            && size.width <= self.max_width
            && size.height >= self.min_height
            && size.height <= self.max_height
    }
}

impl Default for BoxConstraints {
    fn default() -> Self {
        Self {
            min_width: 0.0,
            max_width: f32::INFINITY,
            min_height: 0.0,
            max_height: f32::INFINITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tighten_raises_minima_and_lowers_maxima() {
        let mut own = BoxConstraints::new(10.0, 500.0, 0.0, f32::INFINITY);
        own.tighten(BoxConstraints::new(50.0, 200.0, 30.0, 100.0));

        assert_eq!(own.min_width, 50.0);
        assert_eq!(own.max_width, 200.0);
        assert_eq!(own.min_height, 30.0);
        assert_eq!(own.max_height, 100.0);
    }

    #[test]
    fn tighten_keeps_stricter_own_bounds() {
        let mut own = BoxConstraints::new(80.0, 120.0, 80.0, 120.0);
        own.tighten(BoxConstraints::new(0.0, 1000.0, 0.0, 1000.0));

        assert_eq!(own.min_width, 80.0);
        assert_eq!(own.max_width, 120.0);
    }

    #[test]
    fn shrink_removes_insets_from_both_bounds() {
        let outer = BoxConstraints::new(100.0, 200.0, 50.0, 80.0);
        let inner = outer.shrink(EdgeInsets::new(4.0, 6.0, 5.0, 7.0));

        assert_eq!(inner.min_width, 90.0);
        assert_eq!(inner.max_width, 190.0);
        assert_eq!(inner.min_height, 38.0);
        assert_eq!(inner.max_height, 68.0);
    }

    #[test]
    fn shrink_floors_collapsed_bounds_at_zero() {
        let outer = BoxConstraints::new(0.0, 50.0, 10.0, 120.0);
        let inner = outer.shrink(EdgeInsets::uniform(100.0));

        assert_eq!(inner.min_width, 0.0);
        assert_eq!(inner.max_width, 0.0);
        assert_eq!(inner.min_height, 0.0);
        assert_eq!(inner.max_height, 0.0);
    }

    #[test]
    fn loosen_zeroes_minima_only() {
        let c = BoxConstraints::new(100.0, 200.0, 50.0, 80.0).loosen();
        assert_eq!(c.min_width, 0.0);
        assert_eq!(c.max_width, 200.0);
        assert_eq!(c.min_height, 0.0);
        assert_eq!(c.max_height, 80.0);
    }

    #[test]
    fn constrain_clamps_into_interval() {
        let c = BoxConstraints::new(10.0, 20.0, 10.0, 20.0);
        assert_eq!(c.constrain(Size::new(5.0, 25.0)), Size::new(10.0, 20.0));
        assert_eq!(c.constrain(Size::new(15.0, 15.0)), Size::new(15.0, 15.0));
    }

    #[test]
    fn tight_admits_exactly_one_size() {
        let c = BoxConstraints::tight(Size::new(1262.0, 684.0));
        assert!(c.is_tight());
        assert!(c.contains(Size::new(1262.0, 684.0)));
        assert!(!c.contains(Size::new(1262.0, 683.0)));
    }

    #[test]
    fn edge_insets_axis_sums() {
        let insets = EdgeInsets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(insets.horizontal(), 3.0);
        assert_eq!(insets.vertical(), 7.0);

        let doubled = insets + insets;
        assert_eq!(doubled.horizontal(), 6.0);
    }
}

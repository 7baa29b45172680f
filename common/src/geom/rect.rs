use super::point::Point;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub min: Point<Decimal>,
    pub max: Point<Decimal>,
}

impl Rect {
    pub fn new(min: Point<Decimal>, max: Point<Decimal>) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> Decimal {
        self.max.x - self.min.x
    }
    pub fn height(&self) -> Decimal {
        self.max.y - self.min.y
    }

    /// Interior overlap; rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn shifted_y(&self, dy: Decimal) -> Self {
        Self::new(
            Point::new(self.min.x, self.min.y + dy),
            Point::new(self.max.x, self.max.y + dy),
        )
    }

    /// Lossy corners for float consumers (spatial index, raster output).
    pub fn corners_f64(&self) -> ([f64; 2], [f64; 2]) {
        let f = |d: Decimal| d.to_f64().unwrap_or(0.0);
        (
            [f(self.min.x), f(self.min.y)],
            [f(self.max.x), f(self.max.y)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn r(x0: Decimal, y0: Decimal, x1: Decimal, y1: Decimal) -> Rect {
        Rect::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = r(dec!(0), dec!(0), dec!(2), dec!(1));
        let above = r(dec!(1), dec!(1), dec!(3), dec!(2));
        let right = r(dec!(2), dec!(0), dec!(4), dec!(1));
        assert!(!a.overlaps(&above));
        assert!(!a.overlaps(&right));
        assert!(a.overlaps(&r(dec!(1.5), dec!(0.5), dec!(3), dec!(2))));
    }

    #[test]
    fn dimensions_and_shift() {
        let a = r(dec!(0.25), dec!(1), dec!(0.75), dec!(3));
        assert_eq!(a.width(), dec!(0.5));
        assert_eq!(a.height(), dec!(2));
        let s = a.shifted_y(dec!(10));
        assert_eq!(s.min.y, dec!(11));
        assert_eq!(s.max.y, dec!(13));
        assert_eq!(s.height(), dec!(2));
    }
}

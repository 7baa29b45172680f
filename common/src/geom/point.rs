use std::fmt;

/// A 2D point. Field order makes the derived ordering lexicographic on `(x, y)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: fmt::Display> fmt::Display for Point<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn orders_by_x_then_y() {
        let mut pts = vec![
            Point::new(dec!(1), dec!(0)),
            Point::new(dec!(0), dec!(2)),
            Point::new(dec!(0), dec!(1)),
        ];
        pts.sort();
        assert_eq!(
            pts,
            vec![
                Point::new(dec!(0), dec!(1)),
                Point::new(dec!(0), dec!(2)),
                Point::new(dec!(1), dec!(0)),
            ]
        );
    }

    #[test]
    fn display() {
        assert_eq!(Point::new(dec!(1.5), dec!(0)).to_string(), "(1.5, 0)");
    }
}

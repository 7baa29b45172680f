use crate::db::error::NetError;
use crate::geom::point::Point;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

pub type Pin = Point<Decimal>;

/// A horizontal trunk that must be stacked into a track.
///
/// Geometry is frozen at construction, so every derived attribute is computed
/// once up front. Equality, ordering and hashing look at `name` only: two nets
/// with the same name are the same net whatever their pins.
#[derive(Clone, Debug)]
pub struct Net {
    name: String,
    pins: Vec<Pin>,
    width: Decimal,
    minx: Decimal,
    maxx: Decimal,
    miny: Decimal,
    maxy: Decimal,
    mid_bottom_y: Decimal,
    mid_upper_y: Decimal,
}

impl Net {
    pub fn new(name: impl Into<String>, pins: Vec<Pin>, width: Decimal) -> Result<Self, NetError> {
        let name = name.into();
        let Some(first) = pins.first().copied() else {
            return Err(NetError::NoPins(name));
        };
        if width <= Decimal::ZERO {
            return Err(NetError::NonPositiveWidth { name, width });
        }

        let (mut minx, mut maxx, mut miny, mut maxy) = (first.x, first.x, first.y, first.y);
        for p in &pins[1..] {
            minx = minx.min(p.x);
            maxx = maxx.max(p.x);
            miny = miny.min(p.y);
            maxy = maxy.max(p.y);
        }

        let mut ys: Vec<Decimal> = pins.iter().map(|p| p.y).collect();
        ys.sort();
        let n = ys.len();
        let (mid_bottom_y, mid_upper_y) = if n % 2 == 1 {
            (ys[n / 2], ys[n / 2])
        } else {
            (ys[n / 2 - 1], ys[n / 2])
        };

        Ok(Self {
            name,
            pins,
            width,
            minx,
            maxx,
            miny,
            maxy,
            mid_bottom_y,
            mid_upper_y,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }
    pub fn n_pins(&self) -> usize {
        self.pins.len()
    }
    pub fn width(&self) -> Decimal {
        self.width
    }

    pub fn xs(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.pins.iter().map(|p| p.x)
    }
    pub fn ys(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.pins.iter().map(|p| p.y)
    }

    pub fn minx(&self) -> Decimal {
        self.minx
    }
    pub fn maxx(&self) -> Decimal {
        self.maxx
    }
    pub fn miny(&self) -> Decimal {
        self.miny
    }
    pub fn maxy(&self) -> Decimal {
        self.maxy
    }

    /// Lower median of the pin y-values.
    pub fn mid_bottom_y(&self) -> Decimal {
        self.mid_bottom_y
    }
    /// Upper median of the pin y-values; equals `mid_bottom_y` for odd pin counts.
    pub fn mid_upper_y(&self) -> Decimal {
        self.mid_upper_y
    }
    pub fn midy(&self) -> Decimal {
        (self.mid_bottom_y + self.mid_upper_y) / Decimal::TWO
    }

    pub fn horizontal_wirelength(&self) -> Decimal {
        self.maxx - self.minx
    }

    /// Sum of pin distances to a trunk at `given_midy`, or at `midy()` when `None`.
    pub fn vertical_wirelength(&self, given_midy: Option<Decimal>) -> Decimal {
        let mid = given_midy.unwrap_or_else(|| self.midy());
        self.pins.iter().map(|p| (p.y - mid).abs()).sum()
    }
}

impl PartialEq for Net {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Net {}

impl Hash for Net {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Net {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Net {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pin(x: Decimal, y: Decimal) -> Pin {
        Pin::new(x, y)
    }

    #[test]
    fn extrema_over_pins() {
        let n = Net::new(
            "a",
            vec![pin(dec!(3), dec!(1)), pin(dec!(-1), dec!(4)), pin(dec!(2), dec!(-2))],
            dec!(1),
        )
        .unwrap();
        assert_eq!(n.minx(), dec!(-1));
        assert_eq!(n.maxx(), dec!(3));
        assert_eq!(n.miny(), dec!(-2));
        assert_eq!(n.maxy(), dec!(4));
        assert_eq!(n.horizontal_wirelength(), dec!(4));
        assert_eq!(n.n_pins(), 3);
        assert_eq!(n.xs().collect::<Vec<_>>(), vec![dec!(3), dec!(-1), dec!(2)]);
    }

    #[test]
    fn odd_pin_count_has_single_median() {
        let n = Net::new(
            "odd",
            vec![pin(dec!(0), dec!(5)), pin(dec!(1), dec!(1)), pin(dec!(2), dec!(3))],
            dec!(1),
        )
        .unwrap();
        assert_eq!(n.mid_bottom_y(), dec!(3));
        assert_eq!(n.mid_upper_y(), dec!(3));
        assert_eq!(n.midy(), dec!(3));
        // |5-3| + |1-3| + |3-3|
        assert_eq!(n.vertical_wirelength(None), dec!(4));
    }

    #[test]
    fn even_pin_count_averages_medians() {
        let n = Net::new(
            "even",
            vec![
                pin(dec!(0), dec!(10)),
                pin(dec!(1), dec!(0)),
                pin(dec!(2), dec!(1)),
                pin(dec!(3), dec!(2)),
            ],
            dec!(2),
        )
        .unwrap();
        assert_eq!(n.mid_bottom_y(), dec!(1));
        assert_eq!(n.mid_upper_y(), dec!(2));
        assert_eq!(n.midy(), dec!(1.5));
        assert_eq!(n.vertical_wirelength(None), dec!(8.5) + dec!(1.5) + dec!(0.5) + dec!(0.5));
        assert_eq!(n.vertical_wirelength(Some(dec!(0))), dec!(13));
    }

    #[test]
    fn identity_is_the_name() {
        let a = Net::new("x", vec![pin(dec!(0), dec!(0))], dec!(1)).unwrap();
        let b = Net::new("x", vec![pin(dec!(5), dec!(5)), pin(dec!(6), dec!(5))], dec!(3)).unwrap();
        let c = Net::new("y", vec![pin(dec!(0), dec!(0))], dec!(1)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);

        let set: std::collections::HashSet<Net> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn rejects_empty_and_non_positive() {
        assert_eq!(
            Net::new("e", vec![], dec!(1)),
            Err(NetError::NoPins("e".to_string()))
        );
        assert_eq!(
            Net::new("z", vec![pin(dec!(0), dec!(0))], dec!(0)),
            Err(NetError::NonPositiveWidth {
                name: "z".to_string(),
                width: dec!(0)
            })
        );
    }
}

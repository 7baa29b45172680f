use crate::db::error::GapError;
use crate::db::indices::GapId;
use crate::db::net::Net;
use crate::geom::point::Point;
use crate::geom::rect::Rect;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Vertical slot of one net inside a gap. `max_height` is the top edge.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Assignment {
    net: Arc<Net>,
    max_height: Decimal,
}

impl Assignment {
    pub fn new(net: Arc<Net>, max_height: Decimal) -> Self {
        Self { net, max_height }
    }

    pub fn net(&self) -> &Arc<Net> {
        &self.net
    }

    pub fn max_height(&self) -> Decimal {
        self.max_height
    }

    pub fn min_height(&self) -> Decimal {
        self.max_height - self.net.width()
    }

    /// Footprint in gap-local coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(
            Point::new(self.net.minx(), self.min_height()),
            Point::new(self.net.maxx(), self.max_height),
        )
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}, {}]",
            self.net.name(),
            self.min_height(),
            self.max_height
        )
    }
}

/// One horizontal track.
///
/// Occupancy is tracked on a grid made of the endpoints of the nets the gap
/// was built from. Each grid column holds the assignments covering it in
/// assignment order. A new assignment sits on the tallest column of its span,
/// so tops never decrease along a column and the last entry is the top of
/// the stack.
#[derive(Clone, Debug)]
pub struct Gap {
    id: Option<GapId>,
    // None means unlimited height.
    width: Option<Decimal>,
    base_height: Decimal,
    x_coords: Vec<Decimal>,
    columns: Vec<Vec<Assignment>>,
    net2assignment: BTreeMap<String, Assignment>,
}

impl Gap {
    pub fn new<'a>(nets: impl IntoIterator<Item = &'a Net>, width: Option<Decimal>) -> Self {
        let x_coords: Vec<Decimal> = nets
            .into_iter()
            .flat_map(|n| [n.minx(), n.maxx()])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let columns = vec![Vec::new(); x_coords.len()];
        Self {
            id: None,
            width,
            base_height: Decimal::ZERO,
            x_coords,
            columns,
            net2assignment: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: GapId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_base_height(mut self, base_height: Decimal) -> Self {
        self.base_height = base_height;
        self
    }

    pub fn id(&self) -> Option<GapId> {
        self.id
    }
    pub fn width(&self) -> Option<Decimal> {
        self.width
    }
    pub fn base_height(&self) -> Decimal {
        self.base_height
    }
    pub fn x_coords(&self) -> &[Decimal] {
        &self.x_coords
    }

    pub fn len(&self) -> usize {
        self.net2assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.net2assignment.is_empty()
    }

    pub fn net2assignment(&self) -> &BTreeMap<String, Assignment> {
        &self.net2assignment
    }

    pub fn assignment(&self, net_name: &str) -> Option<&Assignment> {
        self.net2assignment.get(net_name)
    }

    pub fn nets(&self) -> impl Iterator<Item = &Arc<Net>> + '_ {
        self.net2assignment.values().map(|a| a.net())
    }

    /// Every grid column with the assignments stacked on it, bottom first.
    pub fn assignments(&self) -> impl Iterator<Item = (Decimal, &[Assignment])> + '_ {
        self.x_coords
            .iter()
            .zip(&self.columns)
            .map(|(&x, col)| (x, col.as_slice()))
    }

    pub fn assignments_at(&self, x: Decimal) -> Result<&[Assignment], GapError> {
        let idx = self.column(x)?;
        Ok(self.columns[idx].as_slice())
    }

    pub fn max_height(&self, x: Decimal) -> Result<Decimal, GapError> {
        let idx = self.column(x)?;
        Ok(self.column_top(idx))
    }

    /// Grid points within `[lo, hi]`; `None` leaves that side open.
    pub fn range_x(&self, lo: Option<Decimal>, hi: Option<Decimal>) -> &[Decimal] {
        &self.x_coords[self.column_span(lo, hi)]
    }

    pub fn max_height_range(&self, lo: Option<Decimal>, hi: Option<Decimal>) -> Decimal {
        self.column_span(lo, hi)
            .map(|idx| self.column_top(idx))
            .fold(Decimal::ZERO, Decimal::max)
    }

    /// Height of the tallest stack anywhere in the gap.
    pub fn used_height(&self) -> Decimal {
        self.max_height_range(None, None)
    }

    pub fn is_assignable(&self, net: &Net) -> bool {
        self.is_assignable_under(net, None)
    }

    /// Feasibility against `height_limit`, falling back to the gap width.
    pub fn is_assignable_under(&self, net: &Net, height_limit: Option<Decimal>) -> bool {
        match height_limit.or(self.width) {
            None => true,
            Some(limit) => self.stack_base(net) + net.width() <= limit,
        }
    }

    /// Stacks `net` on top of everything already covering its span.
    pub fn assign(&mut self, net: &Arc<Net>) -> Result<Assignment, GapError> {
        let base = self.stack_base(net);
        if let Some(limit) = self.width
            && base + net.width() > limit
        {
            return Err(GapError::NotAssignable {
                net: net.name().to_string(),
                height: base,
                width: net.width(),
                limit,
            });
        }

        let assignment = Assignment::new(Arc::clone(net), base + net.width());
        for idx in self.column_span(Some(net.minx()), Some(net.maxx())) {
            self.columns[idx].push(assignment.clone());
        }
        self.net2assignment
            .insert(net.name().to_string(), assignment.clone());
        log::trace!("gap {:?}: placed {}", self.id, assignment);
        Ok(assignment)
    }

    /// `assignment` in stack coordinates, lifted by this gap's base height.
    pub fn placed_rect(&self, assignment: &Assignment) -> Rect {
        assignment.rect().shifted_y(self.base_height)
    }

    fn stack_base(&self, net: &Net) -> Decimal {
        self.max_height_range(Some(net.minx()), Some(net.maxx()))
    }

    fn column(&self, x: Decimal) -> Result<usize, GapError> {
        self.x_coords
            .binary_search(&x)
            .map_err(|_| GapError::UnknownCoordinate(x))
    }

    fn column_top(&self, idx: usize) -> Decimal {
        self.columns[idx]
            .last()
            .map_or(Decimal::ZERO, |a| a.max_height())
    }

    fn column_span(&self, lo: Option<Decimal>, hi: Option<Decimal>) -> Range<usize> {
        let start = lo.map_or(0, |lo| self.x_coords.partition_point(|&x| x < lo));
        let end = hi.map_or(self.x_coords.len(), |hi| {
            self.x_coords.partition_point(|&x| x <= hi)
        });
        start..end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::net::Pin;
    use rust_decimal_macros::dec;

    fn span(name: &str, minx: Decimal, maxx: Decimal, width: Decimal) -> Arc<Net> {
        Arc::new(
            Net::new(
                name,
                vec![Pin::new(minx, dec!(0)), Pin::new(maxx, dec!(0))],
                width,
            )
            .unwrap(),
        )
    }

    fn gap_over(nets: &[Arc<Net>], width: Option<Decimal>) -> Gap {
        Gap::new(nets.iter().map(|n| n.as_ref()), width)
    }

    #[test]
    fn grid_is_sorted_distinct_endpoints() {
        let nets = [
            span("a", dec!(3), dec!(5), dec!(1)),
            span("b", dec!(0), dec!(3), dec!(1)),
            span("c", dec!(1), dec!(5.0), dec!(1)),
        ];
        let gap = gap_over(&nets, None);
        assert_eq!(gap.x_coords(), &[dec!(0), dec!(1), dec!(3), dec!(5)]);
        assert!(gap.is_empty());
        assert_eq!(gap.used_height(), dec!(0));
    }

    #[test]
    fn range_x_is_inclusive_and_open_ended() {
        let nets = [
            span("a", dec!(0), dec!(2), dec!(1)),
            span("b", dec!(4), dec!(6), dec!(1)),
        ];
        let gap = gap_over(&nets, None);
        assert_eq!(gap.range_x(Some(dec!(2)), Some(dec!(4))), &[dec!(2), dec!(4)]);
        assert_eq!(gap.range_x(Some(dec!(1)), Some(dec!(3))), &[dec!(2)]);
        assert_eq!(gap.range_x(None, Some(dec!(2))), &[dec!(0), dec!(2)]);
        assert_eq!(gap.range_x(Some(dec!(5)), None), &[dec!(6)]);
        assert_eq!(gap.range_x(None, None).len(), 4);
        assert!(gap.range_x(Some(dec!(2.5)), Some(dec!(3.5))).is_empty());
        assert!(gap.range_x(Some(dec!(6)), Some(dec!(0))).is_empty());
    }

    #[test]
    fn assign_stacks_on_tallest_column() {
        let a = span("a", dec!(0), dec!(4), dec!(2));
        let b = span("b", dec!(2), dec!(6), dec!(1));
        let c = span("c", dec!(5), dec!(8), dec!(3));
        let mut gap = gap_over(&[a.clone(), b.clone(), c.clone()], None);

        assert_eq!(gap.assign(&a).unwrap().max_height(), dec!(2));
        // b covers x=2 and x=4 where a tops out at 2.
        let ab = gap.assign(&b).unwrap();
        assert_eq!(ab.min_height(), dec!(2));
        assert_eq!(ab.max_height(), dec!(3));
        // c covers x=5, 6 and 8; b sits on 5 and 6.
        assert_eq!(gap.assign(&c).unwrap().max_height(), dec!(6));

        assert_eq!(gap.max_height(dec!(0)).unwrap(), dec!(2));
        assert_eq!(gap.max_height(dec!(4)).unwrap(), dec!(3));
        assert_eq!(gap.max_height(dec!(8)).unwrap(), dec!(6));
        assert_eq!(gap.max_height_range(Some(dec!(0)), Some(dec!(2))), dec!(3));
        assert_eq!(gap.used_height(), dec!(6));
        assert_eq!(gap.len(), 3);
        assert_eq!(gap.assignment("b"), Some(&ab));
        assert_eq!(gap.assignments_at(dec!(4)).unwrap().len(), 2);
    }

    #[test]
    fn column_tops_never_decrease() {
        let nets = [
            span("a", dec!(0), dec!(3), dec!(1)),
            span("b", dec!(1), dec!(2), dec!(2)),
            span("c", dec!(2), dec!(5), dec!(1)),
            span("d", dec!(0), dec!(5), dec!(0.5)),
            span("e", dec!(4), dec!(5), dec!(3)),
        ];
        let mut gap = gap_over(&nets, None);
        for n in &nets {
            gap.assign(n).unwrap();
            for (_, column) in gap.assignments() {
                for pair in column.windows(2) {
                    assert!(pair[0].max_height() <= pair[1].max_height());
                    assert!(pair[0].max_height() <= pair[1].min_height());
                }
            }
        }
        for (x, column) in gap.assignments() {
            let top = column.last().map_or(dec!(0), |a| a.max_height());
            assert_eq!(gap.max_height(x).unwrap(), top);
        }
    }

    #[test]
    fn capacity_limits_assignment() {
        let a = span("a", dec!(0), dec!(2), dec!(1));
        let twin = span("a", dec!(0), dec!(2), dec!(1));
        let mut gap = gap_over(&[a.clone()], Some(dec!(1)));

        assert!(gap.is_assignable(&a));
        gap.assign(&a).unwrap();
        assert!(!gap.is_assignable(&twin));
        assert_eq!(
            gap.assign(&twin),
            Err(GapError::NotAssignable {
                net: "a".to_string(),
                height: dec!(1),
                width: dec!(1),
                limit: dec!(1),
            })
        );
        // Failed attempts leave the occupancy untouched.
        assert_eq!(gap.assignments_at(dec!(0)).unwrap().len(), 1);
    }

    #[test]
    fn unlimited_gap_always_accepts() {
        let a = span("a", dec!(0), dec!(2), dec!(5));
        let twin = span("a", dec!(0), dec!(2), dec!(5));
        let mut gap = gap_over(&[a.clone()], None);
        gap.assign(&a).unwrap();
        assert!(gap.is_assignable(&twin));
        assert!(!gap.is_assignable_under(&twin, Some(dec!(9))));
        assert!(gap.is_assignable_under(&twin, Some(dec!(10))));
    }

    #[test]
    fn override_limit_takes_precedence() {
        let a = span("a", dec!(0), dec!(2), dec!(2));
        let gap = gap_over(&[a.clone()], Some(dec!(1)));
        assert!(!gap.is_assignable(&a));
        assert!(gap.is_assignable_under(&a, Some(dec!(2))));
    }

    #[test]
    fn off_grid_lookup_is_an_error() {
        let a = span("a", dec!(0), dec!(2), dec!(1));
        let gap = gap_over(&[a], None);
        assert_eq!(
            gap.max_height(dec!(1)),
            Err(GapError::UnknownCoordinate(dec!(1)))
        );
        assert!(gap.assignments_at(dec!(3)).is_err());
    }

    #[test]
    fn nets_outside_the_population_only_touch_grid_points() {
        let a = span("a", dec!(0), dec!(4), dec!(1));
        let mut gap = gap_over(&[a.clone()], None);
        let inner = span("inner", dec!(1), dec!(3), dec!(1));
        gap.assign(&a).unwrap();
        // No grid point inside [1, 3]: nothing to stack on, nothing recorded.
        assert_eq!(gap.assign(&inner).unwrap().max_height(), dec!(1));
        assert_eq!(gap.max_height(dec!(0)).unwrap(), dec!(1));
    }

    #[test]
    fn base_height_only_moves_the_layout() {
        let a = span("a", dec!(0), dec!(2), dec!(1));
        let mut gap = gap_over(&[a.clone()], Some(dec!(4)))
            .with_id(GapId::new(1))
            .with_base_height(dec!(14));
        let assignment = gap.assign(&a).unwrap();
        assert_eq!(gap.id(), Some(GapId::new(1)));
        assert_eq!(assignment.rect().min.y, dec!(0));
        assert_eq!(gap.placed_rect(&assignment).min.y, dec!(14));
        assert_eq!(gap.placed_rect(&assignment).max.y, dec!(15));
        assert_eq!(assignment.to_string(), "a[0, 1]");
    }
}

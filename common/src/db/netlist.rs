use crate::db::indices::NetId;
use crate::db::net::Net;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::ops::Index;
use std::sync::Arc;

/// `(start, end)` of an x-interval sustaining the peak density.
pub type Zone = (Decimal, Decimal);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Event {
    Add,
    Remove,
}

/// State of the sweep after every event at one x has been applied.
struct SweepStep {
    x: Decimal,
    density: Decimal,
    last: Event,
}

/// Input-ordered collection of nets.
#[derive(Clone, Debug, Default)]
pub struct NetList {
    nets: Vec<Arc<Net>>,
}

impl NetList {
    pub fn new() -> Self {
        Self { nets: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nets: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, net: impl Into<Arc<Net>>) -> NetId {
        let id = NetId::new(self.nets.len());
        self.nets.push(net.into());
        id
    }

    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }

    pub fn get(&self, id: NetId) -> Option<&Arc<Net>> {
        self.nets.get(id.index())
    }

    pub fn ids(&self) -> impl Iterator<Item = NetId> + '_ {
        (0..self.nets.len()).map(NetId::new)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Net>> {
        self.nets.iter()
    }

    pub fn horizontal_wirelength(&self) -> Decimal {
        self.nets.iter().map(|n| n.horizontal_wirelength()).sum()
    }

    pub fn vertical_wirelength(&self) -> Decimal {
        self.nets.iter().map(|n| n.vertical_wirelength(None)).sum()
    }

    pub fn n_pins(&self) -> usize {
        self.nets.iter().map(|n| n.n_pins()).sum()
    }

    pub fn sum_height<'a>(nets: impl IntoIterator<Item = &'a Net>) -> Decimal {
        nets.into_iter().map(|n| n.width()).sum()
    }

    /// Peak total width over all x, each net covering `[minx, maxx)`.
    pub fn max_density(&self) -> Decimal {
        self.sweep()
            .iter()
            .filter(|s| s.last == Event::Add)
            .map(|s| s.density)
            .fold(Decimal::ZERO, Decimal::max)
    }

    /// Intervals over which `max_density()` is reached.
    ///
    /// A new maximum discards the zones found so far; an equal density only
    /// moves the start marker. A zone is closed by the next coordinate whose
    /// last event is a removal, unless that coordinate leaves no net active,
    /// in which case the open zone is never reported.
    pub fn max_density_zones(&self) -> Vec<Zone> {
        let mut max_density = Decimal::ZERO;
        let mut start_x: Option<Decimal> = None;
        let mut zones = Vec::new();

        for step in self.sweep() {
            match step.last {
                Event::Add => {
                    if step.density > max_density {
                        max_density = step.density;
                        start_x = Some(step.x);
                        zones.clear();
                    } else if step.density == max_density {
                        start_x = Some(step.x);
                    }
                }
                Event::Remove => {
                    if let Some(start) = start_x.take() {
                        zones.push((start, step.x));
                    }
                }
            }
        }
        zones
    }

    /// Walks the endpoint events in ascending x. Events sharing an x are
    /// applied in net-list order with each net's add queued before its
    /// remove. Coordinates that leave nothing active are skipped.
    fn sweep(&self) -> Vec<SweepStep> {
        let mut events: BTreeMap<Decimal, Vec<(Event, Decimal)>> = BTreeMap::new();
        for net in &self.nets {
            events
                .entry(net.minx())
                .or_default()
                .push((Event::Add, net.width()));
            events
                .entry(net.maxx())
                .or_default()
                .push((Event::Remove, net.width()));
        }

        let mut steps = Vec::with_capacity(events.len());
        let mut active = 0usize;
        let mut density = Decimal::ZERO;
        for (x, at_x) in events {
            let mut last = Event::Add;
            for (event, width) in at_x {
                match event {
                    Event::Add => {
                        active += 1;
                        density += width;
                    }
                    Event::Remove => {
                        active -= 1;
                        density -= width;
                    }
                }
                last = event;
            }
            if active == 0 {
                continue;
            }
            steps.push(SweepStep { x, density, last });
        }
        steps
    }
}

impl Index<NetId> for NetList {
    type Output = Arc<Net>;

    fn index(&self, id: NetId) -> &Arc<Net> {
        &self.nets[id.index()]
    }
}

impl FromIterator<Net> for NetList {
    fn from_iter<I: IntoIterator<Item = Net>>(iter: I) -> Self {
        Self {
            nets: iter.into_iter().map(Arc::new).collect(),
        }
    }
}

impl FromIterator<Arc<Net>> for NetList {
    fn from_iter<I: IntoIterator<Item = Arc<Net>>>(iter: I) -> Self {
        Self {
            nets: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a NetList {
    type Item = &'a Arc<Net>;
    type IntoIter = std::slice::Iter<'a, Arc<Net>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nets.iter()
    }
}

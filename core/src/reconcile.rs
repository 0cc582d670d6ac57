//! Keeps a retained-mode pin layer in step with a desired marker list.
//!
//! The reconciler owns the previously rendered markers and their pins. Each
//! call compares the desired list (and the admin flag) against what was last
//! rendered; an identical input is a no-op. Otherwise pins are matched by
//! place id: a pin whose id and coordinates are unchanged is kept, and only
//! its popup is rebuilt when its content changed. Everything else is created
//! or removed.

use std::collections::HashMap;

use crate::marker::Marker;
use crate::place::PlaceId;
use crate::popup::PopupContent;

/// The side-effecting half of reconciliation, implemented by a map widget.
pub trait MarkerSurface {
    type Pin;

    fn create_pin(&mut self, marker: &Marker, popup: &PopupContent) -> Self::Pin;
    fn refresh_pin(&mut self, pin: &mut Self::Pin, marker: &Marker, popup: &PopupContent);
    fn remove_pin(&mut self, pin: Self::Pin);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Skipped,
    Redrawn {
        kept: usize,
        refreshed: usize,
        created: usize,
        removed: usize,
    },
}

struct RenderedMarker<P> {
    marker: Marker,
    pin: P,
}

pub struct MarkerReconciler<P> {
    rendered: Vec<RenderedMarker<P>>,
    admin_mode: bool,
    initialized: bool,
}

impl<P> Default for MarkerReconciler<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> MarkerReconciler<P> {
    pub fn new() -> Self {
        Self {
            rendered: Vec::new(),
            admin_mode: false,
            initialized: false,
        }
    }

    pub fn needs_redraw(&self, markers: &[Marker], admin_mode: bool) -> bool {
        if !self.initialized || self.admin_mode != admin_mode {
            return true;
        }
        if self.rendered.len() != markers.len() {
            return true;
        }
        self.rendered
            .iter()
            .zip(markers)
            .any(|(rendered, marker)| rendered.marker != *marker)
    }

    pub fn reconcile<S>(
        &mut self,
        surface: &mut S,
        markers: &[Marker],
        admin_mode: bool,
    ) -> ReconcileOutcome
    where
        S: MarkerSurface<Pin = P>,
    {
        if !self.needs_redraw(markers, admin_mode) {
            return ReconcileOutcome::Skipped;
        }
        let admin_changed = self.admin_mode != admin_mode;
        let mut previous: HashMap<PlaceId, RenderedMarker<P>> =
            HashMap::with_capacity(self.rendered.len());
        let mut removed = 0;
        for rendered in self.rendered.drain(..) {
            if let Some(stale) = previous.insert(rendered.marker.id.clone(), rendered) {
                surface.remove_pin(stale.pin);
                removed += 1;
            }
        }

        let mut next = Vec::with_capacity(markers.len());
        let (mut kept, mut refreshed, mut created) = (0, 0, 0);
        for marker in markers {
            let reusable = previous
                .get(&marker.id)
                .is_some_and(|rendered| rendered.marker.same_position(marker));
            let pin = match previous.remove(&marker.id) {
                Some(mut rendered) if reusable => {
                    if admin_changed || rendered.marker != *marker {
                        let popup = PopupContent::build(marker, admin_mode);
                        surface.refresh_pin(&mut rendered.pin, marker, &popup);
                        refreshed += 1;
                    } else {
                        kept += 1;
                    }
                    rendered.pin
                }
                stale => {
                    if let Some(stale) = stale {
                        surface.remove_pin(stale.pin);
                        removed += 1;
                    }
                    let popup = PopupContent::build(marker, admin_mode);
                    created += 1;
                    surface.create_pin(marker, &popup)
                }
            };
            next.push(RenderedMarker {
                marker: marker.clone(),
                pin,
            });
        }
        for (_, rendered) in previous.drain() {
            surface.remove_pin(rendered.pin);
            removed += 1;
        }

        self.rendered = next;
        self.admin_mode = admin_mode;
        self.initialized = true;
        ReconcileOutcome::Redrawn {
            kept,
            refreshed,
            created,
            removed,
        }
    }

    /// Removes every pin; the next reconcile starts from scratch.
    pub fn clear<S>(&mut self, surface: &mut S)
    where
        S: MarkerSurface<Pin = P>,
    {
        for rendered in self.rendered.drain(..) {
            surface.remove_pin(rendered.pin);
        }
        self.initialized = false;
    }

    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }

    pub fn pin(&self, id: &PlaceId) -> Option<&P> {
        self.rendered
            .iter()
            .find(|rendered| &rendered.marker.id == id)
            .map(|rendered| &rendered.pin)
    }
}

use crate::focus::{FocusChange, FocusState};
use crate::geo::LngLat;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CityView {
    pub center: LngLat,
    pub zoom: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraCommand {
    FlyTo { center: LngLat, zoom: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraZooms {
    pub overview: f64,
    pub focus: f64,
}

/// Turns city and focus changes into fly-to commands. Each input is compared
/// with the last one seen; unchanged inputs produce nothing.
#[derive(Clone, Debug)]
pub struct CameraDirector {
    zooms: CameraZooms,
    last_city: Option<CityView>,
    last_focus: FocusState,
}

impl CameraDirector {
    pub fn new(zooms: CameraZooms) -> Self {
        Self {
            zooms,
            last_city: None,
            last_focus: FocusState::default(),
        }
    }

    pub fn update(&mut self, city: Option<CityView>, focus: FocusState) -> Vec<CameraCommand> {
        let mut commands = Vec::new();
        let city_changed = city.is_some() && city != self.last_city;
        if city_changed {
            if let Some(city) = city {
                commands.push(CameraCommand::FlyTo {
                    center: city.center,
                    zoom: city.zoom,
                });
            }
        }
        self.last_city = city.or(self.last_city);

        if focus != self.last_focus {
            match focus.target {
                Some(target) if focus.change == FocusChange::Moved => {
                    commands.push(CameraCommand::FlyTo {
                        center: target,
                        zoom: self.zooms.focus,
                    });
                }
                Some(_) => {}
                None if self.last_focus.target.is_some() => {
                    if let Some(city) = self.last_city {
                        commands.push(CameraCommand::FlyTo {
                            center: city.center,
                            zoom: self.zooms.overview,
                        });
                    }
                }
                None => {}
            }
            self.last_focus = focus;
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::place::PlaceId;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn focus_at(point: LngLat) -> FocusState {
        let id = PlaceId::generate(&mut SmallRng::seed_from_u64(11));
        FocusState::default().focus_on(id, point)
    }

    const ZOOMS: CameraZooms = CameraZooms {
        overview: 13.0,
        focus: 19.0,
    };

    fn city() -> CityView {
        CityView {
            center: LngLat::new(-46.6333, -23.5505),
            zoom: 11.0,
        }
    }

    #[test]
    fn first_update_flies_to_city() {
        let mut director = CameraDirector::new(ZOOMS);
        let commands = director.update(Some(city()), FocusState::default());
        assert_eq!(
            commands,
            vec![CameraCommand::FlyTo {
                center: city().center,
                zoom: 11.0
            }]
        );
        assert!(director.update(Some(city()), FocusState::default()).is_empty());
    }

    #[test]
    fn refocus_same_point_flies_again() {
        let mut director = CameraDirector::new(ZOOMS);
        director.update(Some(city()), FocusState::default());
        let point = LngLat::new(-46.63, -23.55);
        let focus = focus_at(point);
        assert_eq!(director.update(Some(city()), focus.clone()).len(), 1);
        let again = focus.focus_on(PlaceId::generate(&mut SmallRng::seed_from_u64(11)), point);
        assert_eq!(
            director.update(Some(city()), again),
            vec![CameraCommand::FlyTo {
                center: point,
                zoom: 19.0
            }]
        );
    }

    #[test]
    fn refresh_does_not_move_camera() {
        let mut director = CameraDirector::new(ZOOMS);
        director.update(Some(city()), FocusState::default());
        let focus = focus_at(LngLat::new(1.0, 1.0));
        director.update(Some(city()), focus.clone());
        assert!(director.update(Some(city()), focus.refreshed()).is_empty());
    }

    #[test]
    fn clearing_focus_returns_to_overview() {
        let mut director = CameraDirector::new(ZOOMS);
        director.update(Some(city()), FocusState::default());
        director.update(
            Some(city()),
            focus_at(LngLat::new(1.0, 1.0)),
        );
        assert_eq!(
            director.update(Some(city()), FocusState::cleared()),
            vec![CameraCommand::FlyTo {
                center: city().center,
                zoom: 13.0
            }]
        );
    }
}

use crate::catalog::recommender_avatar;
use crate::marker::{star_string, Marker, MarkerActions};

#[derive(Clone, Debug, PartialEq)]
pub struct PopupImage {
    pub src: String,
    pub alt: String,
}

/// Everything a marker popup shows, in display order.
#[derive(Clone, Debug, PartialEq)]
pub struct PopupContent {
    pub title: String,
    pub image: Option<PopupImage>,
    pub rating_line: Option<String>,
    pub category_line: Option<String>,
    pub recommender_line: Option<String>,
    pub recommender_avatar: Option<PopupImage>,
    pub review: Option<String>,
    pub actions: MarkerActions,
}

impl PopupContent {
    pub fn build(marker: &Marker, admin_mode: bool) -> Self {
        let rating_line = marker
            .rating
            .map(star_string)
            .filter(|stars| !stars.is_empty())
            .map(|stars| format!("Rating: {stars}"));
        let recommender_avatar = marker.recommended_by.as_deref().and_then(|name| {
            recommender_avatar(name).map(|src| PopupImage {
                src: src.to_string(),
                alt: name.to_string(),
            })
        });
        Self {
            title: marker.title.clone(),
            image: marker.image.as_ref().map(|src| PopupImage {
                src: src.clone(),
                alt: marker.title.clone(),
            }),
            rating_line,
            category_line: marker
                .category
                .as_ref()
                .map(|category| format!("Category: {category}")),
            recommender_line: marker
                .recommended_by
                .as_ref()
                .map(|name| format!("Recommended by: {name}")),
            recommender_avatar,
            review: marker.review.clone(),
            actions: if admin_mode {
                marker.actions
            } else {
                MarkerActions::NONE
            },
        }
    }

    pub fn has_actions(&self) -> bool {
        self.actions.any()
    }
}

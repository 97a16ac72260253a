use crate::card::Card;

/// Videx VideoTerm 80-column card.
///
/// Display RAM is mapped by the frontend's renderer, not here.
#[derive(Debug, Default)]
pub struct VideoTerm;

impl VideoTerm {
    pub fn new() -> Self {
        Self
    }
}

impl Card for VideoTerm {
    fn name(&self) -> &'static str {
        "VideoTerm"
    }
}

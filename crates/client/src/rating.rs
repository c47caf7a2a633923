/// Star rating widget model: full width (75) corresponds to five stars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarRating {
    pub rating: f64,
}

impl Default for StarRating {
    fn default() -> Self {
        Self { rating: 4.0 }
    }
}

impl StarRating {
    pub const FULL_WIDTH: f64 = 75.0;

    pub fn new(rating: f64) -> Self {
        Self { rating }
    }

    pub fn star_width(&self) -> f64 {
        self.rating * Self::FULL_WIDTH / 5.0
    }
}

use shared::domain::NewMovie;

/// Text typed into the add-movie form.
#[derive(Debug, Default, Clone)]
pub struct MovieForm {
    pub title: String,
    pub opening_text: String,
    pub release_date: String,
}

impl MovieForm {
    pub fn can_submit(&self) -> bool {
        self.draft().is_complete()
    }

    fn draft(&self) -> NewMovie {
        NewMovie::new(
            self.title.trim(),
            self.opening_text.trim(),
            self.release_date.trim(),
        )
    }

    /// Hand the entered movie over and clear the fields, or keep them when incomplete.
    pub fn take_submission(&mut self) -> Option<NewMovie> {
        if !self.can_submit() {
            return None;
        }
        let movie = self.draft();
        *self = Self::default();
        Some(movie)
    }
}

use crate::error::FeedbackError;
use crate::types::{Feedback, FeedbackFilter, FeedbackId, NewFeedback};

pub trait FeedbackRepository {
    fn create(&self, input: NewFeedback) -> Result<Feedback, FeedbackError>;
    fn get(&self, id: FeedbackId) -> Result<Option<Feedback>, FeedbackError>;
    /// Writes the mutable columns of `feedback` and returns the re-read, hydrated row.
    fn save(&self, feedback: &Feedback) -> Result<Feedback, FeedbackError>;
    fn list(&self, filter: &FeedbackFilter) -> Result<Vec<Feedback>, FeedbackError>;
}

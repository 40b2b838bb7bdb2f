pub mod flashcard;
pub mod material;
pub mod preferences;
pub mod project;
pub mod review_data;
pub mod review_session;
pub mod schedule;

pub use flashcard::Flashcard;
pub use material::{Material, MaterialStatus};
pub use preferences::{SummaryLevel, UserPreferences};
pub use project::{DueCard, Project};
pub use review_data::ReviewSchedule;
pub use review_session::ReviewSession;
pub use schedule::{Clock, FixedClock, IntervalTable, Rating, SystemClock};

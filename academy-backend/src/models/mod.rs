mod consent;
mod contact_submission;

pub use consent::{CONSENT_COOKIE, CookiePreferences};
pub use contact_submission::{ContactSubmission, NewContactSubmission};

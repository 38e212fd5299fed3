// Student profile pages: activities form and the dashboard progress checklist.

pub mod handlers;
pub mod progress;

// Recommendation Fetchers: universities, alternative careers, university
// summaries. The roadmap fetcher lives in `crate::roadmap`.

pub mod alternatives;
pub mod handlers;
pub mod summary;
pub mod universities;

pub mod parser;
pub mod scraper;
pub mod types;
pub mod utils;
pub mod writer;

pub use scraper::{RacecardScraper, ScraperError};

pub(crate) const BASE_URL: &str = "https://www.indiarace.com";

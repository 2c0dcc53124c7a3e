pub mod browser;
pub mod linsberg;
pub mod rooms;
pub mod traits;
pub mod types;

pub use linsberg::LinsbergScraper;
pub use traits::OfferScraper;

//! Page Components

mod gift;

pub use gift::GiftPage;

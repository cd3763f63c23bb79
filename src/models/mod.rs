pub mod user;
pub mod favorite;
pub mod quote;
pub mod alert;

pub use user::User;
pub use favorite::Favorite;
pub use quote::{PriceQuote, StayWindow};
pub use alert::AlertEvent;

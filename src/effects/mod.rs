//! Cosmetic pointer, click and image effects. None of these hold state
//! beyond the inline styles they write.

pub mod buttons;
pub mod hover;
pub mod images;
pub mod ripple;

pub use buttons::MissionButtons;
pub use hover::HoverEffects;
pub use images::ImageEffects;

pub mod faq;
pub mod params;
pub mod ranking;
pub mod sanitize;

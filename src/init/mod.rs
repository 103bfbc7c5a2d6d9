mod craft;
pub mod json;

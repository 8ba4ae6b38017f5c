pub mod odysee;
pub mod peertube;

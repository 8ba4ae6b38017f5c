mod builder;
mod models;

pub use builder::{Odysee, Phase, SecondaryFetch};

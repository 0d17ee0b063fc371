pub mod generator;
pub mod jobs;
pub mod keywords;
pub mod params;
pub mod prompt;
pub mod provider;

pub mod auth;
pub mod blogs;
pub mod gallery;
pub mod health;
pub mod milestones;
pub mod news;
pub mod settings;
pub mod stories;
pub mod testimonials;
pub mod upload;

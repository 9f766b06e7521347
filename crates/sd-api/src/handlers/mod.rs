pub mod activities;
pub mod admin;
pub mod clients;
pub mod dashboard;
pub mod finance;
pub mod health;
pub mod jobs;
pub mod prospects;
pub mod scores;

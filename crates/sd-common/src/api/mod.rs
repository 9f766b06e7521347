pub mod activities;
pub mod audit_log;
pub mod clients;
pub mod custom_fields;
pub mod employees;
pub mod finance;
pub mod jobs;
pub mod prospects;
pub mod scores;
pub mod user_roles;

pub mod activity;
pub mod animal;
pub mod medication;
pub mod user_app;
pub mod vital_sign;

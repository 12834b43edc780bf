pub mod avatars;
pub mod health;

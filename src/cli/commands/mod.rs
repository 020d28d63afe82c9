pub mod db;
pub mod health;
pub mod protocol;
pub mod reminders;

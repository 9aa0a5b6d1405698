pub mod auth;
pub mod bot;
pub mod conversations;
pub mod poller;
pub mod telegram;
pub mod whatsapp;

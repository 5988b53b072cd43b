pub mod account;
pub mod booking;
pub mod destination;
pub mod events;
pub mod language;
pub mod post;
pub mod review;

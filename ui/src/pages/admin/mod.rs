pub mod bills;
pub mod complaints;
pub mod contracts;
pub mod dashboard;
pub mod rooms;
pub mod users;

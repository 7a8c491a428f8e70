pub mod auth;
pub mod drawer;
pub mod feed;
pub mod leaderboard;
pub mod notifications;
pub mod richtext;
pub mod thread;

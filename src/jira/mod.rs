pub mod client;
pub mod issue;
pub mod key;

pub use client::JiraClient;

pub mod client;
pub mod dto;
pub mod mapper;

pub use client::{YouTubeClient, YOUTUBE_API_BASE};
pub use mapper::YouTubeMapper;

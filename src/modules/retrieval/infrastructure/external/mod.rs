pub mod proxy;
pub mod youtube;

pub use proxy::HttpProxyClient;
pub use youtube::YouTubeClient;

/// Test data factories using builder pattern
///
/// Provides convenient methods to create test data with sensible defaults
use review_resolver::modules::retrieval::domain::entities::{SearchHit, VideoResult};

pub struct VideoFactory {
    id: String,
    title: String,
    channel: String,
    views: u64,
    likes: Option<u64>,
}

impl VideoFactory {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: format!("Review video {}", id),
            channel: "Test Channel".to_string(),
            views: 1_000,
            likes: None,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn views(mut self, views: u64) -> Self {
        self.views = views;
        self
    }

    pub fn likes(mut self, likes: u64) -> Self {
        self.likes = Some(likes);
        self
    }

    pub fn build(self) -> VideoResult {
        VideoResult {
            thumbnail_url: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", self.id),
            video_id: self.id,
            title: self.title,
            channel_title: self.channel,
            view_count: self.views,
            like_count: self.likes,
            published_at: "2024-03-01T12:00:00Z".to_string(),
        }
    }

    pub fn hit(self) -> SearchHit {
        SearchHit {
            thumbnail_url: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", self.id),
            video_id: Some(self.id),
            title: self.title,
            channel_title: self.channel,
            published_at: "2024-03-01T12:00:00Z".to_string(),
        }
    }
}

pub fn hits(ids: &[&str]) -> Vec<SearchHit> {
    ids.iter().map(|id| VideoFactory::new(id).hit()).collect()
}

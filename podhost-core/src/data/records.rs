//! Content record definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::types::{EpisodeId, Hostname, ShowId, TenantId};

/// Public profile of a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantProfile {
    /// Tenant identifier.
    pub id: TenantId,
    /// Display name.
    pub name: String,
    /// URL-safe slug.
    pub slug: String,
    /// Custom domain, if the tenant has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<Hostname>,
    /// Theme settings.
    #[serde(default)]
    pub branding: Branding,
}

/// Theme settings for a tenant's pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    /// Primary color (hex).
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    /// Logo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// CSS font family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Corner radius in pixels.
    #[serde(default = "default_border_radius")]
    pub border_radius: u32,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            primary_color: default_primary_color(),
            logo_url: None,
            font_family: None,
            border_radius: default_border_radius(),
        }
    }
}

fn default_primary_color() -> String {
    "#3b82f6".to_string()
}

fn default_border_radius() -> u32 {
    8
}

/// A podcast show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    /// Show identifier.
    pub id: ShowId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Author name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// An episode of a show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Episode identifier.
    pub id: EpisodeId,
    /// Parent show.
    pub show_id: ShowId,
    /// Title.
    pub title: String,
    /// Location of the audio asset.
    pub audio_url: String,
    /// Duration in seconds.
    pub duration_seconds: u32,
    /// Publication timestamp; `None` for drafts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Episode {
    /// Listing order: newest published first, drafts last, then newest created.
    #[must_use]
    pub fn listing_order(a: &Self, b: &Self) -> Ordering {
        let published = match (a.published_at, b.published_at) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        published
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn episode(id: &str, published: Option<i64>, created: i64) -> Episode {
        Episode {
            id: EpisodeId::new(id).unwrap(),
            show_id: ShowId::new("show").unwrap(),
            title: id.to_string(),
            audio_url: format!("https://cdn.test/{id}.mp3"),
            duration_seconds: 60,
            published_at: published.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
            created_at: Utc.timestamp_opt(created, 0).unwrap(),
        }
    }

    #[test]
    fn test_episode_listing_order() {
        let mut episodes = vec![
            episode("draft", None, 500),
            episode("old", Some(100), 100),
            episode("new", Some(300), 50),
            episode("same-pub-newer", Some(300), 60),
        ];
        episodes.sort_by(Episode::listing_order);

        let ids: Vec<&str> = episodes.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["same-pub-newer", "new", "old", "draft"]);
    }

    #[test]
    fn test_branding_defaults_from_partial_json() {
        let profile: TenantProfile = serde_json::from_str(
            r#"{"id":"acme","name":"Acme Podcast Network","slug":"acme","branding":{"logo_url":"https://cdn.test/logo.png"}}"#,
        )
        .unwrap();
        assert_eq!(profile.branding.primary_color, "#3b82f6");
        assert_eq!(profile.branding.border_radius, 8);
        assert!(profile.custom_domain.is_none());
    }
}

//! Content models for the admin-managed site entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Editorial page from the `pages` table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageRow {
    pub id: i64,
    pub slug: String,
    pub title: String,
    /// Rendered HTML produced by the back-office editor
    pub content: String,
    pub meta_description: Option<String>,
    pub category: String,
    pub show_in_navbar: bool,
    pub navbar_order: i32,
    pub images: serde_json::Value,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// Customer testimonial
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TestimonialRow {
    pub id: i64,
    pub author: String,
    pub role: Option<String>,
    pub rating: i32,
    pub text: String,
    pub photo_url: Option<String>,
    /// "pending", "approved" or "rejected"
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub const TESTIMONIAL_PENDING: &str = "pending";
pub const TESTIMONIAL_APPROVED: &str = "approved";
pub const TESTIMONIAL_REJECTED: &str = "rejected";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FaqRow {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

/// Pricing plan shown on the tarifs page
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlanRow {
    pub id: i64,
    pub name: String,
    pub price_label: String,
    /// JSON array of selling points
    pub points: serde_json::Value,
    pub popular: bool,
    pub created_at: DateTime<Utc>,
}

impl PlanRow {
    /// Selling points as plain strings; non-string entries are skipped
    pub fn point_list(&self) -> Vec<String> {
        self.points
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Intervention zone (city / area served)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ZoneRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Media asset metadata; the file itself lives in external storage
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MediaRow {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub page_id: Option<i64>,
    pub description: Option<String>,
    pub size: Option<i64>,
    pub mime_type: Option<String>,
    pub image_type: Option<String>,
    pub after_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Key/value site configuration row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteSettingRow {
    pub key: String,
    pub value: serde_json::Value,
}

/// Setting keys the admin API accepts
pub const SETTING_KEYS: &[&str] = &[
    "hero",
    "navbar_config",
    "navbar_colors",
    "homepage_sections",
];

/// Hero banner configuration stored under the `hero` setting key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroSettings {
    pub title: String,
    pub subtitle: String,
    pub primary_button_text: String,
    pub primary_button_link: String,
    pub secondary_button_text: String,
    pub secondary_button_link: String,
    pub slideshow_images: Vec<String>,
    pub slideshow_direction: String,
    pub slideshow_speed: i64,
    pub slideshow_overlay: String,
}

impl Default for HeroSettings {
    fn default() -> Self {
        Self {
            title: "Votre partenaire propreté".to_string(),
            subtitle: "Nettoyage professionnel à domicile et en entreprise".to_string(),
            primary_button_text: "Réserver".to_string(),
            primary_button_link: "/booking".to_string(),
            secondary_button_text: "Nos services".to_string(),
            secondary_button_link: "/services".to_string(),
            slideshow_images: Vec::new(),
            slideshow_direction: "left-to-right".to_string(),
            slideshow_speed: 5,
            slideshow_overlay: "rgba(0,0,0,0.3)".to_string(),
        }
    }
}

impl HeroSettings {
    /// Parse from a stored setting value, falling back to defaults for
    /// missing fields or an absent row
    pub fn from_value(value: Option<serde_json::Value>) -> Self {
        value
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }
}

/// One navigation entry from the `navbar_config` setting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hero_settings_defaults_on_missing_value() {
        let hero = HeroSettings::from_value(None);
        assert_eq!(hero.primary_button_link, "/booking");
        assert_eq!(hero.slideshow_speed, 5);
    }

    #[test]
    fn test_hero_settings_partial_value_keeps_defaults() {
        let hero = HeroSettings::from_value(Some(json!({
            "title": "Nettoyage de printemps",
            "slideshow_speed": 8
        })));
        assert_eq!(hero.title, "Nettoyage de printemps");
        assert_eq!(hero.slideshow_speed, 8);
        assert_eq!(hero.slideshow_direction, "left-to-right");
    }

    #[test]
    fn test_plan_point_list_skips_non_strings() {
        let plan = PlanRow {
            id: 1,
            name: "Essentiel".to_string(),
            price_label: "120 CHF / mois".to_string(),
            points: json!(["2 passages", 42, "Produits inclus"]),
            popular: false,
            created_at: Utc::now(),
        };
        assert_eq!(plan.point_list(), vec!["2 passages", "Produits inclus"]);
    }
}

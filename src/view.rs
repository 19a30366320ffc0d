//! Pure mapping from an explore response to render instructions. Nothing in
//! here touches the terminal, so every display rule is testable directly.

use crate::api::{ExploreResult, TourismSite};
use chrono::{DateTime, Utc};

pub const NO_SITES_PLACEHOLDER: &str = "No famous sites found nearby.";

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SiteRow {
    Entry(SiteEntry),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteEntry {
    pub title: String,
    pub url: String,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
}

/// Everything the presentation layer needs to draw one result, in display
/// order. Rebuilt from scratch for every response.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub fields: Vec<Field>,
    pub icon_url: Option<String>,
    pub image_url: Option<String>,
    pub sites: Vec<SiteRow>,
}

/// Local wall-clock time at the queried location: UTC now shifted by the
/// location's UTC offset, formatted hour:minute. An offset too large to
/// represent falls back to plain UTC instead of panicking.
pub fn local_time(timezone_offset_secs: i64, now_utc: DateTime<Utc>) -> String {
    chrono::Duration::try_seconds(timezone_offset_secs)
        .and_then(|offset| now_utc.checked_add_signed(offset))
        .unwrap_or(now_utc)
        .format("%H:%M")
        .to_string()
}

pub fn build_plan(result: &ExploreResult, now_utc: DateTime<Utc>) -> RenderPlan {
    let weather = &result.weather;

    let fields = vec![
        Field {
            label: "City",
            value: result.city.clone(),
        },
        Field {
            label: "Temperature",
            value: format!("{}°C", weather.temperature.round() as i64),
        },
        Field {
            label: "Conditions",
            value: weather.description.clone(),
        },
        Field {
            label: "Humidity",
            value: format!("{}%", weather.humidity),
        },
        Field {
            label: "Wind",
            value: format!("{} m/s", weather.wind_speed),
        },
        Field {
            label: "Local time",
            value: local_time(weather.timezone_offset, now_utc),
        },
    ];

    let sites = if result.tourism.is_empty() {
        vec![SiteRow::Placeholder]
    } else {
        result.tourism.iter().map(site_row).collect()
    };

    RenderPlan {
        fields,
        icon_url: weather.icon_url(),
        image_url: result.image_url.clone(),
        sites,
    }
}

fn site_row(site: &TourismSite) -> SiteRow {
    SiteRow::Entry(SiteEntry {
        title: site.title.clone(),
        url: site.url.clone(),
        thumbnail: site.thumbnail.clone(),
        description: site.description.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::WeatherSnapshot;
    use chrono::TimeZone;

    fn sample_result(tourism: Vec<TourismSite>) -> ExploreResult {
        ExploreResult {
            city: "Reykjavik, Iceland".to_string(),
            weather: WeatherSnapshot {
                temperature: 4.6,
                description: "light rain".to_string(),
                humidity: 81.0,
                wind_speed: 7.2,
                icon: Some("10d".to_string()),
                timezone_offset: 0,
            },
            image_url: Some("https://images.example.com/reykjavik.jpg".to_string()),
            tourism,
        }
    }

    fn site(title: &str) -> TourismSite {
        TourismSite {
            title: title.to_string(),
            url: format!("https://en.wikipedia.org/wiki/{}", title),
            thumbnail: None,
            description: Some(format!("About {}.", title)),
        }
    }

    #[test]
    fn test_temperature_rounded_to_nearest_integer() {
        let now = Utc::now();
        let plan = build_plan(&sample_result(vec![]), now);
        let temp = plan
            .fields
            .iter()
            .find(|f| f.label == "Temperature")
            .unwrap();
        assert_eq!(temp.value, "5°C");
    }

    #[test]
    fn test_humidity_and_wind_formatting() {
        let plan = build_plan(&sample_result(vec![]), Utc::now());
        let humidity = plan.fields.iter().find(|f| f.label == "Humidity").unwrap();
        let wind = plan.fields.iter().find(|f| f.label == "Wind").unwrap();
        assert_eq!(humidity.value, "81%");
        assert_eq!(wind.value, "7.2 m/s");
    }

    #[test]
    fn test_local_time_zero_offset_is_utc() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(local_time(0, now), "09:26");
    }

    #[test]
    fn test_local_time_positive_offset() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 23, 30, 0).unwrap();
        // +9h wraps past midnight
        assert_eq!(local_time(32400, now), "08:30");
    }

    #[test]
    fn test_local_time_absurd_offset_falls_back_to_utc() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(local_time(i64::MAX, now), "09:26");
        assert_eq!(local_time(i64::MIN, now), "09:26");
    }

    #[test]
    fn test_local_time_negative_offset() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 2, 0, 0).unwrap();
        assert_eq!(local_time(-18000, now), "21:00");
    }

    #[test]
    fn test_empty_tourism_renders_single_placeholder() {
        let plan = build_plan(&sample_result(vec![]), Utc::now());
        assert_eq!(plan.sites, vec![SiteRow::Placeholder]);
    }

    #[test]
    fn test_tourism_entries_preserve_order() {
        let plan = build_plan(
            &sample_result(vec![site("Hallgrimskirkja"), site("Harpa"), site("Perlan")]),
            Utc::now(),
        );
        assert_eq!(plan.sites.len(), 3);
        let titles: Vec<&str> = plan
            .sites
            .iter()
            .map(|row| match row {
                SiteRow::Entry(entry) => entry.title.as_str(),
                SiteRow::Placeholder => panic!("unexpected placeholder"),
            })
            .collect();
        assert_eq!(titles, vec!["Hallgrimskirkja", "Harpa", "Perlan"]);
    }

    #[test]
    fn test_entry_carries_description_and_thumbnail() {
        let mut with_thumb = site("Harpa");
        with_thumb.thumbnail = Some("https://img.example.com/harpa.jpg".to_string());
        let plan = build_plan(&sample_result(vec![with_thumb]), Utc::now());
        match &plan.sites[0] {
            SiteRow::Entry(entry) => {
                assert_eq!(entry.description.as_deref(), Some("About Harpa."));
                assert_eq!(
                    entry.thumbnail.as_deref(),
                    Some("https://img.example.com/harpa.jpg")
                );
            }
            SiteRow::Placeholder => panic!("expected an entry"),
        }
    }

    #[test]
    fn test_icon_and_image_urls_carried() {
        let plan = build_plan(&sample_result(vec![]), Utc::now());
        assert_eq!(
            plan.icon_url.as_deref(),
            Some("https://openweathermap.org/img/wn/10d@2x.png")
        );
        assert_eq!(
            plan.image_url.as_deref(),
            Some("https://images.example.com/reykjavik.jpg")
        );
    }

    #[test]
    fn test_missing_icon_skipped() {
        let mut result = sample_result(vec![]);
        result.weather.icon = None;
        let plan = build_plan(&result, Utc::now());
        assert!(plan.icon_url.is_none());
    }
}

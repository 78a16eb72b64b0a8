//! Sites CRUD through the SDK client.

mod common;

use common::{spawn_app, test_config};
use serde_json::json;
use wedsite_sdk::{CreateWebsite, Photo, SdkError};

fn new_site(bride: &str, groom: &str, template: &str) -> CreateWebsite {
    CreateWebsite {
        template_id: template.to_string(),
        bride_name: bride.to_string(),
        groom_name: groom.to_string(),
        wedding_date: "2030-08-15".to_string(),
        subdomain: None,
    }
}

fn detail_fields(err: &SdkError) -> Vec<String> {
    match err {
        SdkError::Api { details, .. } => details.iter().map(|d| d.field.clone()).collect(),
        SdkError::Http(e) => panic!("unexpected transport error: {}", e),
    }
}

#[tokio::test]
async fn test_create_derives_subdomain_and_template_theme() {
    let app = spawn_app(test_config()).await;

    let site = app
        .client
        .create_website(&new_site("Mary Ann", "John", "rustic-charm"))
        .await
        .unwrap();
    assert_eq!(site.subdomain, "mary-ann-john");
    assert_eq!(site.template_id, "rustic-charm");
    assert!(!site.published);
    assert_eq!(site.content["primaryColor"], "#8B4513");
    assert_eq!(site.content["fontFamily"], "Merriweather");

    let all = app.client.list_websites().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, site.id);
}

#[tokio::test]
async fn test_duplicate_subdomain_conflicts() {
    let app = spawn_app(test_config()).await;
    app.client
        .create_website(&new_site("Mary", "John", "classic-elegance"))
        .await
        .unwrap();

    let err = app
        .client
        .create_website(&new_site("Mary", "John", "modern-minimal"))
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(409));
    assert_eq!(app.store.count(), 1);

    let mut explicit = new_site("Mary", "John", "modern-minimal");
    explicit.subdomain = Some("Mary-And-John".to_string());
    let second = app.client.create_website(&explicit).await.unwrap();
    assert_eq!(second.subdomain, "mary-and-john");
}

#[tokio::test]
async fn test_create_validation_reports_each_field() {
    let app = spawn_app(test_config()).await;
    let mut input = new_site("", "John", "neon-vegas");
    input.wedding_date = "next june".to_string();

    let err = app.client.create_website(&input).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
    let fields = detail_fields(&err);
    for field in ["templateId", "brideName", "weddingDate"] {
        assert!(fields.iter().any(|f| f == field), "{:?}", fields);
    }
    assert_eq!(app.store.count(), 0);
}

#[tokio::test]
async fn test_patch_updates_content() {
    let app = spawn_app(test_config()).await;
    let site = app
        .client
        .create_website(&new_site("Mary", "John", "classic-elegance"))
        .await
        .unwrap();

    let updated = app
        .client
        .update_website(
            &site.id,
            &json!({
                "heroTitle": "Two Become One",
                "primaryColor": "#112233",
                "ceremonyVenue": "St. Mary's",
                "sections": { "countdown": false }
            }),
        )
        .await
        .unwrap();
    assert_eq!(updated.content["heroTitle"], "Two Become One");
    assert_eq!(updated.content["primaryColor"], "#112233");
    assert_eq!(updated.content["ceremony"]["venue"], "St. Mary's");
    assert_eq!(updated.content["sections"]["countdown"], false);
    assert_eq!(updated.content["sections"]["hero"], true);

    let err = app
        .client
        .update_website(&site.id, &json!({ "primaryColor": "red; x" }))
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
    assert_eq!(detail_fields(&err), ["primaryColor"]);

    let stored = app.client.get_website(&site.id).await.unwrap();
    assert_eq!(stored.content["primaryColor"], "#112233");
}

#[tokio::test]
async fn test_photos_are_attached() {
    let app = spawn_app(test_config()).await;
    let site = app
        .client
        .create_website(&new_site("Mary", "John", "modern-minimal"))
        .await
        .unwrap();

    let photo = app
        .client
        .add_photo(
            &site.id,
            &Photo {
                id: String::new(),
                url: "https://cdn.example.com/first-dance.jpg".to_string(),
                caption: Some("First dance".to_string()),
                order: Some(1),
            },
        )
        .await
        .unwrap();
    assert!(!photo.id.is_empty());

    let stored = app.client.get_website(&site.id).await.unwrap();
    assert_eq!(stored.photos.len(), 1);
    assert_eq!(stored.photos[0].caption.as_deref(), Some("First dance"));

    let err = app
        .client
        .add_photo(
            &site.id,
            &Photo {
                id: String::new(),
                url: "not a url".to_string(),
                caption: None,
                order: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
}

#[tokio::test]
async fn test_delete_frees_subdomain() {
    let app = spawn_app(test_config()).await;
    let site = app
        .client
        .create_website(&new_site("Mary", "John", "classic-elegance"))
        .await
        .unwrap();

    app.client.delete_website(&site.id).await.unwrap();
    let err = app.client.get_website(&site.id).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));

    let again = app
        .client
        .create_website(&new_site("Mary", "John", "classic-elegance"))
        .await
        .unwrap();
    assert_eq!(again.subdomain, "mary-john");
}

#[tokio::test]
async fn test_catalog_and_health() {
    let app = spawn_app(test_config()).await;

    let templates = app.client.list_templates().await.unwrap();
    let ids: Vec<_> = templates.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["classic-elegance", "modern-minimal", "rustic-charm"]);
    assert_eq!(templates[1].category, "modern");

    let health = app.client.health().await.unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["sites"], 0);
    assert_eq!(health["cacheConfigured"], false);
}

#[tokio::test]
async fn test_rsvps_listed_per_site() {
    let app = spawn_app(test_config()).await;
    let site = common::seed_site(&app.store, "Mary", "John", true);

    app.client
        .submit_rsvp(&wedsite_sdk::RsvpRequest {
            subdomain: "mary-john".to_string(),
            guest_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            attending: true,
            ..Default::default()
        })
        .await
        .unwrap();

    let rsvps = app.client.list_rsvps(&site.id.to_string()).await.unwrap();
    assert_eq!(rsvps.len(), 1);
    assert_eq!(rsvps[0].guest_name, "Ada");
}

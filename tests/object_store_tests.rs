use image_registry::form::ImageForm;
use image_registry::object_store::{content_type, object_key, LocalStore, UploadError, Uploader};
use image_registry::validation::ImageFile;

const BASE_URL: &str = "http://localhost:8080/files";

#[tokio::test]
async fn test_local_store_upload_returns_public_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path(), BASE_URL).unwrap();

    let url = store
        .upload(&ImageFile::new("cat.PNG", "hello world"))
        .await
        .unwrap();

    let key = url
        .strip_prefix("http://localhost:8080/files/")
        .expect("url should live under the public base");
    assert!(key.ends_with(".png"));

    let stored = std::fs::read(store.object_path(key)).unwrap();
    assert_eq!(stored, b"hello world");
}

#[tokio::test]
async fn test_local_store_trailing_slash_in_base_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path(), "http://cdn.local/").unwrap();

    let url = store.upload(&ImageFile::new("a.jpg", "x")).await.unwrap();
    assert!(url.starts_with("http://cdn.local/"));
    assert!(!url.starts_with("http://cdn.local//"));
}

#[tokio::test]
async fn test_local_store_uploads_get_distinct_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path(), BASE_URL).unwrap();
    let image = ImageFile::new("same.png", "data");

    let first = store.upload(&image).await.unwrap();
    let second = store.upload(&image).await.unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_local_store_rejects_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path(), BASE_URL).unwrap();

    let result = store.upload(&ImageFile::new("empty.png", Vec::new())).await;
    assert!(matches!(result, Err(UploadError::Empty)));
}

#[tokio::test]
async fn test_attach_image_sets_upload_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path(), BASE_URL).unwrap();
    let mut form = ImageForm::new();

    let url = form
        .attach_image(ImageFile::new("dog.webp", "woof"), &store)
        .await
        .unwrap()
        .to_string();

    assert_eq!(form.image_url(), Some(url.as_str()));
    assert!(form.draft().image.is_some());
}

#[tokio::test]
async fn test_attach_image_failure_leaves_url_unset() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path(), BASE_URL).unwrap();
    let mut form = ImageForm::new();
    form.set_image_url("http://old/url.png");

    let result = form
        .attach_image(ImageFile::new("empty.png", Vec::new()), &store)
        .await;

    assert!(matches!(result, Err(UploadError::Empty)));
    assert_eq!(form.image_url(), None);
    assert_eq!(
        form.draft().image.as_ref().map(|image| image.name.as_str()),
        Some("empty.png")
    );
}

#[test]
fn test_object_key_keeps_extension() {
    assert!(object_key("photo.JPEG").ends_with(".jpeg"));
    assert!(!object_key("no_extension").contains('.'));
}

#[test]
fn test_content_type_guess() {
    assert_eq!(content_type("a.png"), "image/png");
    assert_eq!(content_type("mystery"), "application/octet-stream");
}

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::info;

use crate::{BookApi, ClientError, CreateBook, Recommendation, ValidationError};

/// Highest star rating a post can carry.
pub const MAX_RATING: u8 = 5;

/// An image picked for a post, tagged with the media type inferred from its
/// file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl ImageAttachment {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }

    pub fn from_file_name(file_name: &str, bytes: Vec<u8>) -> Self {
        Self::new(bytes, media_type_for(file_name))
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.bytes))
    }
}

/// `image/<ext>` from a file name or URI, `image/jpeg` when there is no
/// extension.
pub fn media_type_for(file_name: &str) -> String {
    let last_segment = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let ext = match last_segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => return "image/jpeg".to_string(),
    };
    match ext.as_str() {
        "jpg" => "image/jpeg".to_string(),
        _ => format!("image/{ext}"),
    }
}

/// The post being composed. `rating == 0` means no stars chosen yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub caption: String,
    pub rating: u8,
    pub image: Option<ImageAttachment>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<CreateBook, ValidationError> {
        let name = self.title.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        let caption = self.caption.trim();
        if caption.is_empty() {
            return Err(ValidationError::MissingField("caption"));
        }
        match self.rating {
            0 => return Err(ValidationError::MissingRating),
            r if r > MAX_RATING => return Err(ValidationError::RatingOutOfRange(r)),
            _ => {}
        }
        let image = self.image.as_ref().ok_or(ValidationError::MissingImage)?;

        Ok(CreateBook {
            name: name.to_string(),
            caption: caption.to_string(),
            ratings: self.rating.to_string(),
            image: image.data_uri(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Validate and post the draft. The draft is cleared only once the server
/// has accepted it.
pub async fn submit<A: BookApi + ?Sized>(
    api: &A,
    token: &str,
    draft: &mut Draft,
) -> Result<Recommendation, ClientError> {
    let body = draft.validate()?;
    let created = api.create_book(token, &body).await?;
    info!(id = %created.id, "recommendation posted");
    draft.clear();
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{book, FakeApi};

    fn complete_draft() -> Draft {
        Draft {
            title: "Dune".into(),
            caption: "Spice must flow".into(),
            rating: 4,
            image: Some(ImageAttachment::from_file_name("cover.PNG", vec![1, 2, 3])),
        }
    }

    #[test]
    fn media_type_follows_extension() {
        assert_eq!(media_type_for("file:///tmp/cover.PNG"), "image/png");
        assert_eq!(media_type_for("photo.jpg"), "image/jpeg");
        assert_eq!(media_type_for("scan.webp"), "image/webp");
        assert_eq!(media_type_for("no-extension"), "image/jpeg");
        assert_eq!(media_type_for("dir.v2/blob"), "image/jpeg");
    }

    #[test]
    fn data_uri_is_base64_tagged() {
        let img = ImageAttachment::new(b"hello".to_vec(), "image/png");
        assert_eq!(img.data_uri(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn validate_builds_request() {
        let body = complete_draft().validate().unwrap();
        assert_eq!(body.name, "Dune");
        assert_eq!(body.ratings, "4");
        assert_eq!(body.image, "data:image/png;base64,AQID");
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let mut d = complete_draft();
        d.title = "   ".into();
        assert_eq!(d.validate(), Err(ValidationError::MissingField("title")));

        let mut d = complete_draft();
        d.caption.clear();
        assert_eq!(d.validate(), Err(ValidationError::MissingField("caption")));

        let mut d = complete_draft();
        d.rating = 0;
        assert_eq!(d.validate(), Err(ValidationError::MissingRating));

        let mut d = complete_draft();
        d.rating = 6;
        assert_eq!(d.validate(), Err(ValidationError::RatingOutOfRange(6)));

        let mut d = complete_draft();
        d.image = None;
        assert_eq!(d.validate(), Err(ValidationError::MissingImage));
    }

    #[tokio::test]
    async fn invalid_draft_makes_no_request() {
        let api = FakeApi::new();
        let mut draft = complete_draft();
        draft.image = None;
        let err = submit(&api, "t", &mut draft).await.unwrap_err();
        assert_eq!(err, ClientError::Validation(ValidationError::MissingImage));
        assert!(api.calls().is_empty());
        assert_eq!(draft.title, "Dune");
    }

    #[tokio::test]
    async fn success_clears_draft() {
        let api = FakeApi::new();
        api.created.borrow_mut().push_back(Ok(book("new")));
        let mut draft = complete_draft();
        let created = submit(&api, "t", &mut draft).await.unwrap();
        assert_eq!(created.id, "new");
        assert_eq!(draft, Draft::default());
        assert_eq!(api.calls(), ["create t Dune"]);
    }

    #[tokio::test]
    async fn failure_keeps_draft_for_retry() {
        let api = FakeApi::new();
        api.created
            .borrow_mut()
            .push_back(Err(ClientError::Network("offline".into())));
        let mut draft = complete_draft();
        assert!(submit(&api, "t", &mut draft).await.is_err());
        assert_eq!(draft, complete_draft());
    }
}

//! Post entity <-> model mapper

use feed_core::{DomainError, Identity, Post};

use crate::models::PostModel;

/// Convert PostModel to Post entity
impl TryFrom<PostModel> for Post {
    type Error = DomainError;

    fn try_from(model: PostModel) -> Result<Self, Self::Error> {
        Ok(Post {
            source: model.source.parse().map_err(DomainError::InternalError)?,
            id: model.id,
            name: Identity::from(model.name),
            text: model.text,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use feed_core::PostSource;

    fn model(source: &str) -> PostModel {
        let now = Utc::now();
        PostModel {
            id: "p1".to_string(),
            name: "alice".to_string(),
            text: "hello".to_string(),
            source: source.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_model_to_entity() {
        let post = Post::try_from(model("GITHUB")).unwrap();
        assert_eq!(post.id, "p1");
        assert_eq!(post.name, Identity::from("alice"));
        assert_eq!(post.source, PostSource::Github);
    }

    #[test]
    fn test_unknown_source_is_internal_error() {
        let err = Post::try_from(model("FAX")).unwrap_err();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }
}

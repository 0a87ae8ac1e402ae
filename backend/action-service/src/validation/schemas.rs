/// Input schemas, one per action
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use super::{parse_id, FieldErrors, Schema};
use crate::domain::ProfileChanges;

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.]+$").expect("username pattern is valid"));

// ============================================================================
// Posts
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostForm {
    #[serde(default, deserialize_with = "form_value")]
    #[validate(required(message = "Required"), url(message = "Invalid url"))]
    pub file_url: Option<String>,
    #[serde(default, deserialize_with = "form_value")]
    #[validate(
        required(message = "Required"),
        length(min = 1, max = 2200, message = "Caption must be between 1 and 2200 characters")
    )]
    pub caption: Option<String>,
    #[serde(default, deserialize_with = "form_value")]
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostInput {
    pub file_url: String,
    pub caption: String,
    pub location: Option<String>,
}

impl Schema for CreatePostForm {
    type Output = CreatePostInput;

    fn into_output(self, _errors: &mut FieldErrors) -> Option<CreatePostInput> {
        Some(CreatePostInput {
            file_url: self.file_url?,
            caption: self.caption?,
            location: self.location,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostForm {
    #[serde(default, deserialize_with = "form_value")]
    #[validate(required(message = "Required"))]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "form_value")]
    #[validate(required(message = "Required"), url(message = "Invalid url"))]
    pub file_url: Option<String>,
    #[serde(default, deserialize_with = "form_value")]
    #[validate(
        required(message = "Required"),
        length(min = 1, max = 2200, message = "Caption must be between 1 and 2200 characters")
    )]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePostInput {
    pub id: Uuid,
    pub file_url: String,
    pub caption: String,
}

impl Schema for UpdatePostForm {
    type Output = UpdatePostInput;

    fn into_output(self, errors: &mut FieldErrors) -> Option<UpdatePostInput> {
        let id = parse_id("id", self.id, errors);
        Some(UpdatePostInput {
            id: id?,
            file_url: self.file_url?,
            caption: self.caption?,
        })
    }
}

/// Identifies a record by id (post delete, comment delete, follow target)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct IdForm {
    #[serde(default, deserialize_with = "form_value")]
    #[validate(required(message = "Required"))]
    pub id: Option<String>,
}

impl IdForm {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }
}

impl Schema for IdForm {
    type Output = Uuid;

    fn into_output(self, errors: &mut FieldErrors) -> Option<Uuid> {
        parse_id("id", self.id, errors)
    }
}

pub type DeletePostForm = IdForm;
pub type DeleteCommentForm = IdForm;
pub type FollowForm = IdForm;

/// Identifies the post targeted by a like or bookmark toggle
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostTargetForm {
    #[serde(default, deserialize_with = "form_value")]
    #[validate(required(message = "Required"))]
    pub post_id: Option<String>,
}

impl PostTargetForm {
    pub fn new(post_id: impl Into<String>) -> Self {
        Self {
            post_id: Some(post_id.into()),
        }
    }
}

impl Schema for PostTargetForm {
    type Output = Uuid;

    fn into_output(self, errors: &mut FieldErrors) -> Option<Uuid> {
        parse_id("postId", self.post_id, errors)
    }
}

pub type LikeForm = PostTargetForm;
pub type BookmarkForm = PostTargetForm;

// ============================================================================
// Comments
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentForm {
    #[serde(default, deserialize_with = "form_value")]
    #[validate(required(message = "Required"))]
    pub post_id: Option<String>,
    #[serde(default, deserialize_with = "form_value")]
    #[validate(
        required(message = "Required"),
        length(min = 1, max = 2200, message = "Comment must be between 1 and 2200 characters")
    )]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentInput {
    pub post_id: Uuid,
    pub body: String,
}

impl Schema for CreateCommentForm {
    type Output = CreateCommentInput;

    fn into_output(self, errors: &mut FieldErrors) -> Option<CreateCommentInput> {
        let post_id = parse_id("postId", self.post_id, errors);
        Some(CreateCommentInput {
            post_id: post_id?,
            body: self.body?,
        })
    }
}

// ============================================================================
// Profile
// ============================================================================

/// Profile form. Blank strings from the client are read as "not provided".
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 50, message = "Name must be at most 50 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        length(min = 3, max = 30, message = "Username must be between 3 and 30 characters"),
        regex(
            path = *USERNAME_PATTERN,
            message = "Username may only contain letters, digits, '_' and '.'"
        )
    )]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 150, message = "Bio must be at most 150 characters"))]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 30, message = "Gender must be at most 30 characters"))]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(url(message = "Invalid url"))]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(url(message = "Invalid url"))]
    pub image: Option<String>,
}

impl Schema for UpdateProfileForm {
    type Output = ProfileChanges;

    fn into_output(self, _errors: &mut FieldErrors) -> Option<ProfileChanges> {
        Some(ProfileChanges {
            name: self.name,
            username: self.username,
            bio: self.bio,
            gender: self.gender,
            website: self.website,
            image: self.image,
        })
    }
}

/// Read a scalar form value as text. Numbers and booleans keep their JSON
/// spelling so the field rules can reject them with a field-level message.
fn form_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::invalid_type(
            de::Unexpected::Other(value_kind(&other)),
            &"a string",
        )),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        _ => "scalar",
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = form_value(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate, INVALID_ID, REQUIRED};

    #[test]
    fn create_post_requires_file_url_and_caption() {
        let errors = validate(CreatePostForm::default()).unwrap_err();
        assert_eq!(errors["fileUrl"], vec![REQUIRED.to_string()]);
        assert_eq!(errors["caption"], vec![REQUIRED.to_string()]);
        assert!(!errors.contains_key("location"));
    }

    #[test]
    fn create_post_rejects_bad_url_and_empty_caption() {
        let errors = validate(CreatePostForm {
            file_url: Some("not a url".into()),
            caption: Some(String::new()),
            location: None,
        })
        .unwrap_err();
        assert_eq!(errors["fileUrl"], vec!["Invalid url".to_string()]);
        assert!(errors.contains_key("caption"));
    }

    #[test]
    fn create_post_accepts_complete_input() {
        let input = validate(CreatePostForm {
            file_url: Some("https://utfs.io/f/abc.png".into()),
            caption: Some("sunset".into()),
            location: Some("Lisbon".into()),
        })
        .unwrap();
        assert_eq!(input.caption, "sunset");
        assert_eq!(input.location.as_deref(), Some("Lisbon"));
    }

    #[test]
    fn update_post_reports_every_bad_field_at_once() {
        let errors = validate(UpdatePostForm {
            id: Some("42".into()),
            file_url: None,
            caption: Some("ok".into()),
        })
        .unwrap_err();
        assert_eq!(errors["id"], vec![INVALID_ID.to_string()]);
        assert_eq!(errors["fileUrl"], vec![REQUIRED.to_string()]);
        assert!(!errors.contains_key("caption"));
    }

    #[test]
    fn post_target_parses_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(validate(PostTargetForm::new(id.to_string())).unwrap(), id);

        let errors = validate(PostTargetForm::default()).unwrap_err();
        assert_eq!(errors["postId"], vec![REQUIRED.to_string()]);
    }

    #[test]
    fn toggle_forms_deserialize_from_camel_case() {
        let id = Uuid::new_v4();
        let form: PostTargetForm =
            serde_json::from_value(serde_json::json!({ "postId": id.to_string() })).unwrap();
        assert_eq!(validate(form).unwrap(), id);
    }

    #[test]
    fn comment_body_must_not_be_empty() {
        let errors = validate(CreateCommentForm {
            post_id: Some(Uuid::new_v4().to_string()),
            body: Some(String::new()),
        })
        .unwrap_err();
        assert!(errors.contains_key("body"));
        assert!(!errors.contains_key("postId"));
    }

    #[test]
    fn profile_fields_are_all_optional() {
        let changes = validate(UpdateProfileForm::default()).unwrap();
        assert!(changes.username.is_none());
        assert!(changes.bio.is_none());
    }

    #[test]
    fn profile_rejects_bad_username_and_long_bio() {
        let errors = validate(UpdateProfileForm {
            username: Some("no spaces allowed".into()),
            bio: Some("x".repeat(151)),
            ..Default::default()
        })
        .unwrap_err();
        assert!(errors.contains_key("username"));
        assert!(errors.contains_key("bio"));
    }

    #[test]
    fn profile_blank_strings_deserialize_as_absent() {
        let form: UpdateProfileForm = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "website": "",
            "bio": "   "
        }))
        .unwrap();
        let changes = validate(form).unwrap();
        assert_eq!(changes.name.as_deref(), Some("Ada"));
        assert!(changes.website.is_none());
        assert!(changes.bio.is_none());
    }

    #[test]
    fn numeric_ids_reach_the_field_rules() {
        let form: PostTargetForm =
            serde_json::from_value(serde_json::json!({ "postId": 42 })).unwrap();
        assert_eq!(form.post_id.as_deref(), Some("42"));
        let errors = validate(form).unwrap_err();
        assert_eq!(errors["postId"], vec![INVALID_ID.to_string()]);
    }

    #[test]
    fn structured_values_are_not_form_values() {
        let result: Result<IdForm, _> =
            serde_json::from_value(serde_json::json!({ "id": ["a", "b"] }));
        assert!(result.is_err());
    }
}

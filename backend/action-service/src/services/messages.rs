//! User-facing messages returned by actions.

pub const DASHBOARD_PATH: &str = "/dashboard";

// Validation summaries
pub const CREATE_POST_INVALID: &str = "Missing fields. Failed to create post.";
pub const UPDATE_POST_INVALID: &str = "Missing fields. Failed to update post.";
pub const DELETE_POST_INVALID: &str = "Missing fields. Failed to delete post.";
pub const LIKE_INVALID: &str = "Missing fields. Failed to like post.";
pub const BOOKMARK_INVALID: &str = "Missing fields. Failed to bookmark post.";
pub const FOLLOW_INVALID: &str = "Missing fields. Failed to follow user.";
pub const CREATE_COMMENT_INVALID: &str = "Missing fields. Failed to create comment.";
pub const DELETE_COMMENT_INVALID: &str = "Missing fields. Failed to delete comment.";
pub const UPDATE_PROFILE_INVALID: &str = "Missing fields. Failed to update profile.";
pub const UPLOAD_INVALID: &str = "Invalid file. Failed to upload image.";

// Not found
pub const POST_NOT_FOUND: &str = "Post not found.";
pub const COMMENT_NOT_FOUND: &str = "Comment not found.";
pub const USER_NOT_FOUND: &str = "User not found.";

// Success
pub const POST_DELETED: &str = "Deleted post.";
pub const POST_LIKED: &str = "Liked post.";
pub const POST_UNLIKED: &str = "Unliked post.";
pub const POST_BOOKMARKED: &str = "Bookmarked post.";
pub const POST_UNBOOKMARKED: &str = "Unbookmarked post.";
pub const USER_FOLLOWED: &str = "Followed user.";
pub const USER_UNFOLLOWED: &str = "Unfollowed user.";
pub const COMMENT_CREATED: &str = "Created comment.";
pub const COMMENT_DELETED: &str = "Deleted comment.";
pub const PROFILE_UPDATED: &str = "Updated profile.";

// Persistence failures
pub const CREATE_POST_FAILED: &str = "Database Error: Failed to create post.";
pub const UPDATE_POST_FAILED: &str = "Database Error: Failed to update post.";
pub const DELETE_POST_FAILED: &str = "Database Error: Failed to delete post.";
pub const LIKE_FAILED: &str = "Database Error: Failed to like post.";
pub const UNLIKE_FAILED: &str = "Database Error: Failed to unlike post.";
pub const BOOKMARK_FAILED: &str = "Database Error: Failed to bookmark post.";
pub const UNBOOKMARK_FAILED: &str = "Database Error: Failed to unbookmark post.";
pub const FOLLOW_FAILED: &str = "Database Error: Failed to follow user.";
pub const UNFOLLOW_FAILED: &str = "Database Error: Failed to unfollow user.";
pub const CREATE_COMMENT_FAILED: &str = "Database Error: Failed to create comment.";
pub const DELETE_COMMENT_FAILED: &str = "Database Error: Failed to delete comment.";
pub const UPDATE_PROFILE_FAILED: &str = "Database Error: Failed to update profile.";
pub const UPLOAD_FAILED: &str = "Storage Error: Failed to upload image.";

//! Fixed names shared by the loader, the renderer and the CLI host.

// Session cache
pub const CACHE_KEY: &str = "works_cache_ucp_v1";

// Navigable address
pub const CATALOG_PATH: &str = "/Our-works";
pub const WORK_QUERY_PARAM: &str = "work";

// Pagination: initial visible counts and reveal increments
pub const PRIMARY_INITIAL_VISIBLE: usize = 3;
pub const SIDEBAR_INITIAL_VISIBLE: usize = 5;
pub const PRIMARY_REVEAL_STEP: usize = 4;
pub const SIDEBAR_REVEAL_STEP: usize = 5;
pub const FEATURED_COUNT: usize = 3;
pub const SHORT_EXCERPT_WORDS: usize = 10;

// Normalization fallbacks
pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_CATEGORY: &str = "General";

// User-visible messages
pub const LOAD_ERROR_MESSAGE: &str = "Unable to load works. Please check your connection.";
pub const SHARE_SUCCESS_MESSAGE: &str = "Link copied to clipboard";
pub const SHARE_ERROR_MESSAGE: &str = "Failed to copy link";
pub const NOTIFICATION_TTL_SECS: u64 = 3;

// Rendering
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.jpg";

/// GROQ query for every work document, newest first.
pub const WORKS_QUERY: &str = r#"*[_type == "work"] | order(date desc) {
  _id,
  title,
  "slug": slug.current,
  date,
  duration,
  excerpt,
  "thumbnail": thumbnail.asset->url,
  "category": category->title,
  "images": images[].asset->url,
  details,
  fullDescription
}"#;

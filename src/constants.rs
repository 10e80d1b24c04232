use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

// https://www.color-hex.com/color-palette/10221
pub const PALETTE: [&str; 5] = ["#ff71ce", "#01cdfe", "#05ffa1", "#b967ff", "#fffb96"];

pub const DEFAULT_TARGET_IMAGE_WIDTH: u32 = 700;

pub const ADMIN_ENTITLEMENT: &str = "admin";
pub const ANNOTATION_CONTRIB_ENTITLEMENT: &str = "annotation-contrib";

pub const EMAIL_HEADER: &str = "X-Authentik-Email";
pub const GROUPS_HEADER: &str = "X-Authentik-Groups";
pub const ENTITLEMENTS_HEADER: &str = "X-Authentik-Entitlements";
pub const HEADER_LIST_SEPARATOR: char = '|';

pub const BOUNDING_BOX_SHAPE: &str = "bounding_box";
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d / %H:%M";
